//! Checkout-side domain types: shipping, payment cards, orders.

mod order;
mod payment;
mod shipping;

pub use order::{Order, OrderCode, OrderLineItem, OrderStatus};
pub use payment::{CardField, CardValidationError, PaymentCardDetails};
pub use shipping::ShippingDetails;
