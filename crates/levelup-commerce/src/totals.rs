//! Order totals math.

use crate::cart::CartItem;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// IVA applied on the discounted base.
pub const TAX_RATE_PERCENT: f64 = 19.0;

/// Loyalty discount applied to the subtotal.
pub const LOYALTY_DISCOUNT_PERCENT: f64 = 20.0;

/// Complete pricing breakdown for an order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OrderTotals {
    /// Subtotal before discounts.
    pub subtotal: Money,
    /// Loyalty discount amount.
    pub discount: Money,
    /// Tax amount on the discounted base.
    pub tax: Money,
    /// Final total ((subtotal - discount) + tax).
    pub total: Money,
}

impl OrderTotals {
    /// All-zero totals in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self {
            subtotal: Money::zero(currency),
            discount: Money::zero(currency),
            tax: Money::zero(currency),
            total: Money::zero(currency),
        }
    }

    /// Check if a discount is applied.
    pub fn has_discount(&self) -> bool {
        self.discount.is_positive()
    }

    /// Check the totals identity: `total == (subtotal - discount) + tax`.
    pub fn is_consistent(&self) -> bool {
        self.subtotal
            .try_subtract(&self.discount)
            .and_then(|base| base.try_add(&self.tax))
            .map(|expected| expected == self.total)
            .unwrap_or(false)
    }
}

/// Compute order totals from cart line items.
///
/// - `subtotal` is the sum of line totals; an empty list yields all zeros.
/// - `discount` is 20% of the subtotal when the loyalty flag is set,
///   rounded to the nearest minor unit at this step.
/// - `tax` is 19% of the discounted base, rounded.
/// - `total` is `(subtotal - discount) + tax`.
///
/// Prices are taken as-is; callers are responsible for rejecting
/// malformed catalog data before it reaches the cart.
pub fn compute_order_totals(items: &[CartItem], apply_loyalty_discount: bool) -> OrderTotals {
    let currency = items
        .first()
        .map(|i| i.unit_price.currency)
        .unwrap_or_default();

    let subtotal = items
        .iter()
        .fold(Money::zero(currency), |acc, i| acc + i.line_total());

    let discount = if apply_loyalty_discount {
        subtotal.percentage(LOYALTY_DISCOUNT_PERCENT)
    } else {
        Money::zero(currency)
    };

    let taxable = subtotal - discount;
    let tax = taxable.percentage(TAX_RATE_PERCENT);

    OrderTotals {
        subtotal,
        discount,
        tax,
        total: taxable + tax,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{LineItemId, ProductId};

    fn item(price: i64, quantity: i64) -> CartItem {
        CartItem::new(
            LineItemId::new(format!("li-{}", price)),
            ProductId::new(format!("p-{}", price)),
            "Producto",
            Money::clp(price),
            quantity,
            "Consolas",
        )
    }

    #[test]
    fn test_empty_cart_is_all_zeros() {
        let totals = compute_order_totals(&[], true);
        assert_eq!(totals.subtotal.amount, 0);
        assert_eq!(totals.discount.amount, 0);
        assert_eq!(totals.tax.amount, 0);
        assert_eq!(totals.total.amount, 0);
        assert!(totals.is_consistent());
    }

    #[test]
    fn test_totals_without_loyalty() {
        let items = vec![item(500_000, 1), item(150_000, 2)];
        let totals = compute_order_totals(&items, false);
        assert_eq!(totals.subtotal.amount, 800_000);
        assert_eq!(totals.discount.amount, 0);
        assert_eq!(totals.tax.amount, 152_000);
        assert_eq!(totals.total.amount, 952_000);
        assert!(totals.is_consistent());
    }

    #[test]
    fn test_totals_with_loyalty() {
        let items = vec![item(500_000, 1), item(150_000, 2)];
        let totals = compute_order_totals(&items, true);
        assert_eq!(totals.subtotal.amount, 800_000);
        assert_eq!(totals.discount.amount, 160_000);
        assert_eq!(totals.tax.amount, 121_600);
        assert_eq!(totals.total.amount, 761_600);
        assert!(totals.is_consistent());
        assert!(totals.has_discount());
    }

    #[test]
    fn test_totals_identity_holds_with_rounding() {
        // Odd subtotals force rounding at both the discount and tax steps.
        for price in [999, 1001, 33_333, 123_457] {
            for loyalty in [false, true] {
                let totals = compute_order_totals(&[item(price, 3)], loyalty);
                assert!(totals.is_consistent(), "price={} loyalty={}", price, loyalty);
            }
        }
    }

    #[test]
    fn test_discount_rounded_before_tax() {
        // 20% of 1111 = 222.2 -> 222; tax base is 889, not 888.8.
        let totals = compute_order_totals(&[item(1111, 1)], true);
        assert_eq!(totals.discount.amount, 222);
        assert_eq!(totals.tax.amount, 169); // round(889 * 0.19) = round(168.91)
        assert_eq!(totals.total.amount, 1058);
    }
}
