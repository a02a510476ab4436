//! Cart and line item types.
//!
//! Cart items keep the raw catalog fields. Older catalog payloads populate
//! `title`/`thumbnail_url` instead of `name`/`image_url`, and some carry
//! neither, so display accessors resolve through a fallback chain.

use crate::error::CommerceError;
use crate::ids::{LineItemId, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// Label used when a catalog payload has no usable name.
pub const PRODUCT_FALLBACK_NAME: &str = "Producto";

/// Asset path used when a catalog payload has no usable image.
pub const PRODUCT_PLACEHOLDER_IMAGE: &str = "/assets/img/producto-placeholder.png";

/// A line item in the shopping cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Unique line item identifier.
    pub id: LineItemId,
    /// Product identifier from the catalog.
    pub product_id: ProductId,
    /// Product display name.
    pub name: Option<String>,
    /// Alternate title field from older catalog payloads.
    pub title: Option<String>,
    /// Unit price at the time the item was added.
    pub unit_price: Money,
    /// Primary image URL.
    pub image_url: Option<String>,
    /// Alternate thumbnail URL from older catalog payloads.
    pub thumbnail_url: Option<String>,
    /// Quantity in the cart (>= 1).
    pub quantity: i64,
    /// Catalog category.
    pub category: String,
    /// Catalog subcategory.
    pub subcategory: Option<String>,
}

impl CartItem {
    /// Create a new cart item with a known display name.
    pub fn new(
        id: LineItemId,
        product_id: ProductId,
        name: impl Into<String>,
        unit_price: Money,
        quantity: i64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id,
            product_id,
            name: Some(name.into()),
            title: None,
            unit_price,
            image_url: None,
            thumbnail_url: None,
            quantity,
            category: category.into(),
            subcategory: None,
        }
    }

    /// Set the primary image URL.
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Set the subcategory.
    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    /// Resolve the display name: name, then alternate title, then the
    /// generic product label. Blank strings count as missing.
    pub fn display_name(&self) -> &str {
        non_blank(&self.name)
            .or_else(|| non_blank(&self.title))
            .unwrap_or(PRODUCT_FALLBACK_NAME)
    }

    /// Resolve the display image: primary URL, then thumbnail, then the
    /// placeholder asset. Blank strings count as missing.
    pub fn display_image(&self) -> &str {
        non_blank(&self.image_url)
            .or_else(|| non_blank(&self.thumbnail_url))
            .unwrap_or(PRODUCT_PLACEHOLDER_IMAGE)
    }

    /// Total price for this line (unit price x quantity).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

/// A shopping cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Cart {
    /// Items in the cart.
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Create a new empty cart.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add an item to the cart.
    ///
    /// If an item for the same product already exists, quantities are
    /// merged. Returns an error if:
    /// - Quantity is not positive
    /// - Adding would exceed MAX_QUANTITY_PER_ITEM
    /// - Arithmetic overflow would occur
    pub fn add_item(&mut self, item: CartItem) -> Result<(), CommerceError> {
        if item.quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(item.quantity));
        }

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.product_id == item.product_id)
        {
            let new_quantity = existing
                .quantity
                .checked_add(item.quantity)
                .ok_or(CommerceError::Overflow)?;

            if new_quantity > MAX_QUANTITY_PER_ITEM {
                return Err(CommerceError::QuantityExceedsLimit(
                    new_quantity,
                    MAX_QUANTITY_PER_ITEM,
                ));
            }

            existing.quantity = new_quantity;
            return Ok(());
        }

        if item.quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                item.quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        self.items.push(item);
        Ok(())
    }

    /// Total quantity across all line items.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Check if the cart has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove all items.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product: &str, price: i64, quantity: i64) -> CartItem {
        CartItem::new(
            LineItemId::new(format!("li-{}", product)),
            ProductId::new(product),
            format!("Producto {}", product),
            Money::clp(price),
            quantity,
            "Juegos de Mesa",
        )
    }

    #[test]
    fn test_add_item_and_count() {
        let mut cart = Cart::new();
        cart.add_item(item("JM001", 29_990, 1)).unwrap();
        cart.add_item(item("JM002", 24_990, 2)).unwrap();
        assert_eq!(cart.item_count(), 3);
        assert!(!cart.is_empty());
    }

    #[test]
    fn test_add_item_merges_same_product() {
        let mut cart = Cart::new();
        cart.add_item(item("JM001", 29_990, 1)).unwrap();
        cart.add_item(item("JM001", 29_990, 2)).unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 3);
    }

    #[test]
    fn test_add_item_rejects_bad_quantity() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add_item(item("JM001", 29_990, 0)),
            Err(CommerceError::InvalidQuantity(0))
        ));
        assert!(matches!(
            cart.add_item(item("JM001", 29_990, 10_000)),
            Err(CommerceError::QuantityExceedsLimit(..))
        ));
    }

    #[test]
    fn test_display_name_fallback_chain() {
        let mut it = item("JM001", 29_990, 1);
        assert_eq!(it.display_name(), "Producto JM001");

        it.name = Some("  ".to_string());
        it.title = Some("Carcassonne".to_string());
        assert_eq!(it.display_name(), "Carcassonne");

        it.title = None;
        assert_eq!(it.display_name(), PRODUCT_FALLBACK_NAME);
    }

    #[test]
    fn test_display_image_fallback_chain() {
        let mut it = item("JM001", 29_990, 1);
        assert_eq!(it.display_image(), PRODUCT_PLACEHOLDER_IMAGE);

        it.thumbnail_url = Some("/img/thumb.png".to_string());
        assert_eq!(it.display_image(), "/img/thumb.png");

        it.image_url = Some("/img/full.png".to_string());
        assert_eq!(it.display_image(), "/img/full.png");
    }

    #[test]
    fn test_line_total() {
        let it = item("AC001", 150_000, 2);
        assert_eq!(it.line_total().amount, 300_000);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(item("JM001", 29_990, 1)).unwrap();
        cart.clear();
        assert!(cart.is_empty());
    }
}
