//! Order types.

use crate::cart::CartItem;
use crate::checkout::ShippingDetails;
use crate::ids::ProductId;
use crate::money::Money;
use crate::totals::OrderTotals;
use chrono::{DateTime, Local, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order created, payment not yet attempted.
    #[default]
    Pending,
    /// Payment in flight.
    Processing,
    /// Payment approved.
    Completed,
    /// Payment declined.
    Failed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Failed => "failed",
        }
    }

    /// Parse a status string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "processing" => Some(OrderStatus::Processing),
            "completed" => Some(OrderStatus::Completed),
            "failed" => Some(OrderStatus::Failed),
            _ => None,
        }
    }

    /// Check if the status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Failed)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Human-readable order code: `YYYYMMDD-HHMMSS-NNNN`.
///
/// The date/time reflect the local clock at generation and the suffix is
/// a zero-padded random number in [0, 9999]. Two calls within the same
/// second can collide; this is a receipt code for humans, not an
/// idempotency key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderCode(String);

impl OrderCode {
    /// Generate a code from the current local time.
    pub fn generate() -> Self {
        let suffix: u16 = rand::thread_rng().gen_range(0..10_000);
        Self(format!(
            "{}-{:04}",
            Local::now().format("%Y%m%d-%H%M%S"),
            suffix
        ))
    }

    /// Get the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check the `\d{8}-\d{6}-\d{4}` shape.
    pub fn is_well_formed(&self) -> bool {
        let parts: Vec<&str> = self.0.split('-').collect();
        parts.len() == 3
            && parts[0].len() == 8
            && parts[1].len() == 6
            && parts[2].len() == 4
            && parts
                .iter()
                .all(|p| p.chars().all(|c| c.is_ascii_digit()))
    }
}

impl fmt::Display for OrderCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for OrderCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A line item snapshotted into an order.
///
/// Decoupled from the live cart: display fallbacks are resolved at
/// snapshot time, so the receipt stays stable even if the catalog entry
/// changes later.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLineItem {
    /// Product identifier.
    pub product_id: ProductId,
    /// Resolved display name.
    pub name: String,
    /// Unit price at order time.
    pub unit_price: Money,
    /// Resolved image URL.
    pub image_url: String,
    /// Quantity ordered.
    pub quantity: i64,
    /// Catalog category.
    pub category: String,
    /// Catalog subcategory.
    pub subcategory: Option<String>,
}

impl OrderLineItem {
    /// Snapshot a cart item, resolving display fallbacks.
    pub fn from_cart_item(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id.clone(),
            name: item.display_name().to_string(),
            unit_price: item.unit_price,
            image_url: item.display_image().to_string(),
            quantity: item.quantity,
            category: item.category.clone(),
            subcategory: item.subcategory.clone(),
        }
    }

    /// Total price for this line.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// An order created by a checkout attempt.
///
/// Created once per attempt; a payment retry creates a fresh order with
/// a fresh code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Unique order code.
    pub code: OrderCode,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last status change timestamp.
    pub updated_at: DateTime<Utc>,
    /// Delivery details.
    pub shipping: ShippingDetails,
    /// Item snapshot.
    pub items: Vec<OrderLineItem>,
    /// Pricing breakdown.
    pub totals: OrderTotals,
    /// Current status.
    pub status: OrderStatus,
}

impl Order {
    /// Create a pending order with a freshly generated code.
    pub fn new(shipping: ShippingDetails, items: Vec<OrderLineItem>, totals: OrderTotals) -> Self {
        let now = Utc::now();
        Self {
            code: OrderCode::generate(),
            created_at: now,
            updated_at: now,
            shipping,
            items,
            totals,
            status: OrderStatus::Pending,
        }
    }

    /// Total item count.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Update order status.
    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Render the receipt for print/email actions.
    ///
    /// Operates on the snapshot only; rendering a receipt never touches
    /// payment state.
    pub fn receipt_text(&self) -> String {
        let mut lines = vec![
            format!("Orden {}", self.code),
            format!("Fecha: {}", self.created_at.format("%Y-%m-%d %H:%M")),
            format!("Cliente: {}", self.shipping.full_name()),
            format!("Envio: {}", self.shipping.one_line()),
            String::new(),
        ];
        for item in &self.items {
            lines.push(format!(
                "{} x{} @ {} = {}",
                item.name,
                item.quantity,
                item.unit_price.display(),
                item.line_total().display()
            ));
        }
        lines.push(String::new());
        lines.push(format!("Subtotal: {}", self.totals.subtotal.display()));
        if self.totals.has_discount() {
            lines.push(format!("Descuento: -{}", self.totals.discount.display()));
        }
        lines.push(format!("IVA: {}", self.totals.tax.display()));
        lines.push(format!("Total: {}", self.totals.total.display()));
        lines.join("\n")
    }
}
