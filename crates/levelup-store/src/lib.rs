//! Key-value persistence port and checkout-side stores for Level-Up Gamer.
//!
//! The raw port (`StorageBackend` + `KvStore`) returns explicit `Result`s;
//! the domain stores built on top (`CheckoutMemoryStore`, `OrderArchive`)
//! apply the storefront policy of degrading storage failures to logged
//! no-ops, reported through [`PersistOutcome`] so callers can still see
//! which writes landed.
//!
//! # Example
//!
//! ```rust,ignore
//! use levelup_store::{CheckoutMemoryStore, KvStore, MemoryPatch};
//!
//! let store = CheckoutMemoryStore::new(KvStore::in_memory());
//! store.save(MemoryPatch::shipping(details));
//! let memory = store.load(); // empty again 24h later
//! ```

mod archive;
mod checkout_memory;
mod error;
mod kv;

pub use archive::{OrderArchive, ORDER_ARCHIVE_KEY};
pub use checkout_memory::{
    CheckoutMemory, CheckoutMemoryStore, MemoryPatch, PersistOutcome, CHECKOUT_MEMORY_KEY,
    CHECKOUT_MEMORY_TTL_MS,
};
pub use error::StoreError;
pub use kv::{KvStore, MemoryBackend, StorageBackend};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        CheckoutMemory, CheckoutMemoryStore, KvStore, MemoryBackend, MemoryPatch, OrderArchive,
        PersistOutcome, StorageBackend, StoreError,
    };
}
