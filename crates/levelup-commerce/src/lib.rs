//! Commerce domain types and order math for Level-Up Gamer.
//!
//! This crate provides the storefront's purchase-side domain model:
//!
//! - **Money**: integer minor-unit amounts with currency (CLP by default)
//! - **Cart**: line items with catalog-payload display fallbacks
//! - **Totals**: subtotal, loyalty discount, IVA and grand total
//! - **Checkout**: shipping details, payment card details, orders
//! - **Customers**: shopper context and the loyalty email allow-list
//!
//! # Example
//!
//! ```rust,ignore
//! use levelup_commerce::prelude::*;
//!
//! let mut cart = Cart::new();
//! cart.add_item(CartItem::new(
//!     LineItemId::new("li-1"),
//!     ProductId::new("JM001"),
//!     "Catan",
//!     Money::clp(29_990),
//!     1,
//!     "Juegos de Mesa",
//! ))?;
//!
//! let totals = compute_order_totals(&cart.items, false);
//! println!("Total: {}", totals.total.display());
//! ```

pub mod cart;
pub mod checkout;
pub mod customer;
pub mod error;
pub mod ids;
pub mod money;
pub mod totals;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Cart
    pub use crate::cart::{Cart, CartItem};

    // Totals
    pub use crate::totals::{compute_order_totals, OrderTotals};

    // Checkout
    pub use crate::checkout::{
        CardField, CardValidationError, Order, OrderCode, OrderLineItem, OrderStatus,
        PaymentCardDetails, ShippingDetails,
    };

    // Customers
    pub use crate::customer::{LoyaltyPolicy, ShopperContext};
}
