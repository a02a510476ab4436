//! Checkout error types.

use levelup_commerce::checkout::CardValidationError;
use thiserror::Error;

/// Errors that can occur while driving the checkout flow.
///
/// These are caller errors (wrong step, invalid form data); remote and
/// storage failures never surface here — the lifecycle layer degrades
/// them into outcome values.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The requested action is not allowed from the current step.
    #[error("Invalid checkout transition: {action} not allowed from {from}")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },

    /// Shipping details are missing mandatory fields.
    #[error("Shipping details incomplete")]
    IncompleteShipping,

    /// The card form failed field validation.
    #[error("Invalid card details")]
    InvalidCard(Vec<CardValidationError>),

    /// Fast checkout needs complete stored shipping and payment.
    #[error("Fast checkout requires stored shipping and payment data")]
    MissingStoredData,
}
