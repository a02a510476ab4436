//! Checkout pipeline for Level-Up Gamer.
//!
//! Composes the domain, store and gateway crates into the guided
//! multi-step purchase flow:
//!
//! - **Resolver**: where a shopper resumes, from stored data completeness
//! - **Lifecycle**: order creation, best-effort dual-write submission,
//!   payment with a simulated fallback, status updates
//! - **Flow**: the state machine from shipping form to success/failure
//!
//! # Example
//!
//! ```rust,ignore
//! use levelup_checkout::prelude::*;
//!
//! let mut flow = CheckoutFlow::enter(
//!     Some(shopper),
//!     cart,
//!     CheckoutMemoryStore::new(kv.clone()),
//!     OrderLifecycle::new(orders, payments, OrderArchive::new(kv)),
//!     LoyaltyPolicy::default(),
//!     CheckoutConfig::default(),
//! )?;
//!
//! flow.submit_shipping(details, true)?;
//! flow.confirm_summary()?;
//! let step = flow.submit_payment(card).await?;
//! ```

mod error;
mod flow;
mod lifecycle;
mod resolver;

pub use error::CheckoutError;
pub use flow::{CheckoutConfig, CheckoutFlow, CheckoutRedirect};
pub use lifecycle::{
    OrderLifecycle, PaymentOutcome, SimulatedPaymentFallback, StatusUpdateOutcome, SubmitOutcome,
    SIMULATED_DECLINE_MESSAGES,
};
pub use resolver::{resolve_entry_step, CheckoutStep};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        resolve_entry_step, CheckoutConfig, CheckoutError, CheckoutFlow, CheckoutRedirect,
        CheckoutStep, OrderLifecycle, PaymentOutcome, SimulatedPaymentFallback, SubmitOutcome,
    };
}
