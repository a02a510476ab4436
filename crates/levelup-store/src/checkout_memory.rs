//! Expiring checkout memory.
//!
//! A single persisted record of in-progress shipping/payment entries,
//! overwritten wholesale on each save and treated as absent once stale.

use crate::kv::KvStore;
use crate::StoreError;
use levelup_commerce::checkout::{PaymentCardDetails, ShippingDetails};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Fixed key the record is persisted under.
pub const CHECKOUT_MEMORY_KEY: &str = "checkout:memory";

/// Records older than this are treated as absent on load.
pub const CHECKOUT_MEMORY_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// The persisted in-progress checkout record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CheckoutMemory {
    /// Shipping details from the shipping form.
    pub shipping: Option<ShippingDetails>,
    /// Card details from the payment form.
    pub payment: Option<PaymentCardDetails>,
    /// Last checkout step the shopper reached.
    pub last_step: Option<String>,
    /// Epoch-millis of the last save.
    pub saved_at: i64,
}

impl CheckoutMemory {
    /// Check if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.shipping.is_none() && self.payment.is_none() && self.last_step.is_none()
    }

    /// Check if stored shipping exists and is complete.
    pub fn has_complete_shipping(&self) -> bool {
        self.shipping.as_ref().map(|s| s.is_complete()).unwrap_or(false)
    }

    /// Check if stored payment exists and is complete.
    pub fn has_complete_payment(&self) -> bool {
        self.payment.as_ref().map(|p| p.is_complete()).unwrap_or(false)
    }
}

/// A partial update merged over the stored record, last write wins per field.
#[derive(Debug, Clone, Default)]
pub struct MemoryPatch {
    /// Replacement shipping details.
    pub shipping: Option<ShippingDetails>,
    /// Replacement card details.
    pub payment: Option<PaymentCardDetails>,
    /// Replacement last-step marker.
    pub last_step: Option<String>,
}

impl MemoryPatch {
    /// Patch carrying shipping details.
    pub fn shipping(details: ShippingDetails) -> Self {
        Self {
            shipping: Some(details),
            ..Self::default()
        }
    }

    /// Patch carrying card details.
    pub fn payment(card: PaymentCardDetails) -> Self {
        Self {
            payment: Some(card),
            ..Self::default()
        }
    }

    /// Also record the step the shopper reached.
    pub fn with_last_step(mut self, step: impl Into<String>) -> Self {
        self.last_step = Some(step.into());
        self
    }
}

/// Whether a best-effort write actually landed.
///
/// Storage failures are never surfaced as errors by the checkout stores;
/// this outcome keeps the degradation visible to callers anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The write reached the backend.
    Persisted,
    /// The backend failed; the operation became a no-op.
    Skipped,
}

impl PersistOutcome {
    /// Check if the write landed.
    pub fn is_persisted(&self) -> bool {
        matches!(self, PersistOutcome::Persisted)
    }
}

/// Store for the expiring checkout memory record.
///
/// Never returns an error: failed reads load as empty, failed writes are
/// logged and reported as [`PersistOutcome::Skipped`].
#[derive(Debug, Clone)]
pub struct CheckoutMemoryStore {
    kv: KvStore,
}

impl CheckoutMemoryStore {
    /// Create a store over the given key-value store.
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    /// Merge a patch over the stored record and persist it.
    ///
    /// `saved_at` is refreshed on every save, so any write renews the
    /// 24-hour window for the whole record.
    pub fn save(&self, patch: MemoryPatch) -> PersistOutcome {
        let mut record = self.load();
        if let Some(shipping) = patch.shipping {
            record.shipping = Some(shipping);
        }
        if let Some(payment) = patch.payment {
            record.payment = Some(payment);
        }
        if let Some(step) = patch.last_step {
            record.last_step = Some(step);
        }
        record.saved_at = current_timestamp_ms();

        match self.kv.set(CHECKOUT_MEMORY_KEY, &record) {
            Ok(()) => PersistOutcome::Persisted,
            Err(e) => {
                warn!(error = %e, "checkout memory save skipped");
                PersistOutcome::Skipped
            }
        }
    }

    /// Load the stored record.
    ///
    /// An absent, unreadable or expired record loads as all-empty;
    /// expiry actively deletes the stale record, so a second load is
    /// equally empty.
    pub fn load(&self) -> CheckoutMemory {
        match self.kv.get::<CheckoutMemory>(CHECKOUT_MEMORY_KEY) {
            Ok(Some(record)) => {
                if current_timestamp_ms() - record.saved_at > CHECKOUT_MEMORY_TTL_MS {
                    self.discard_stale();
                    CheckoutMemory::default()
                } else {
                    record
                }
            }
            Ok(None) => CheckoutMemory::default(),
            Err(e) => {
                warn!(error = %e, "checkout memory load failed, treating as empty");
                CheckoutMemory::default()
            }
        }
    }

    /// Delete the record unconditionally.
    pub fn clear(&self) -> PersistOutcome {
        match self.kv.delete(CHECKOUT_MEMORY_KEY) {
            Ok(()) => PersistOutcome::Persisted,
            Err(e) => {
                warn!(error = %e, "checkout memory clear skipped");
                PersistOutcome::Skipped
            }
        }
    }

    fn discard_stale(&self) {
        if let Err(e) = self.kv.delete(CHECKOUT_MEMORY_KEY) {
            warn!(error = %e, "stale checkout memory could not be deleted");
        }
    }
}

/// Current Unix time in milliseconds.
fn current_timestamp_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
