//! Checkout steps and entry-step resolution.

use levelup_commerce::customer::ShopperContext;
use levelup_store::CheckoutMemory;

/// Steps in the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckoutStep {
    /// Shipping form.
    ShippingForm,
    /// Order summary awaiting confirmation.
    Summary,
    /// Payment form.
    Payment,
    /// One-click confirmation for returning shoppers.
    FastCheckout,
    /// Order submission and payment in flight.
    Processing,
    /// Purchase completed.
    Success,
    /// Payment declined.
    Failure,
}

impl CheckoutStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::ShippingForm => "shipping_form",
            CheckoutStep::Summary => "summary",
            CheckoutStep::Payment => "payment",
            CheckoutStep::FastCheckout => "fast_checkout",
            CheckoutStep::Processing => "processing",
            CheckoutStep::Success => "success",
            CheckoutStep::Failure => "failure",
        }
    }

    /// Parse a step string, e.g. from a stored last-step marker.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "shipping_form" => Some(CheckoutStep::ShippingForm),
            "summary" => Some(CheckoutStep::Summary),
            "payment" => Some(CheckoutStep::Payment),
            "fast_checkout" => Some(CheckoutStep::FastCheckout),
            "processing" => Some(CheckoutStep::Processing),
            "success" => Some(CheckoutStep::Success),
            "failure" => Some(CheckoutStep::Failure),
            _ => None,
        }
    }

    /// Check if this step ends the flow instance.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CheckoutStep::Success)
    }
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Decide where a shopper resumes checkout, first match wins:
///
/// 1. Prior completed orders and complete stored shipping and payment
///    resolve to the one-click fast checkout.
/// 2. Incomplete stored shipping resolves to the shipping form.
/// 3. Incomplete stored payment resolves to the summary.
/// 4. Otherwise the payment form.
pub fn resolve_entry_step(memory: &CheckoutMemory, shopper: &ShopperContext) -> CheckoutStep {
    let shipping_complete = memory.has_complete_shipping();
    let payment_complete = memory.has_complete_payment();

    if shopper.has_prior_orders() && shipping_complete && payment_complete {
        CheckoutStep::FastCheckout
    } else if !shipping_complete {
        CheckoutStep::ShippingForm
    } else if !payment_complete {
        CheckoutStep::Summary
    } else {
        CheckoutStep::Payment
    }
}
