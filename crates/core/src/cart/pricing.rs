//! Order pricing for the checkout summary.
//!
//! Each step is rounded on its own, in order: items, then tax on the rounded
//! items, then the total of the three rounded parts. Rounding only at the end
//! gives different cents on some carts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CartItem;
use crate::types::Price;

/// Orders whose items price is strictly above this ship free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(200, 0, 0, false, 0);

/// Flat shipping charge, in dollars, for orders at or below the threshold.
pub const FLAT_SHIPPING_DOLLARS: u32 = 15;

/// Sales tax rate applied to the items price (15%).
pub const TAX_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

/// Unrounded sum of line totals, as shown next to the cart.
#[must_use]
pub fn subtotal(items: &[CartItem]) -> Price {
    items.iter().map(CartItem::line_total).sum()
}

/// The four prices charged for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub items_price: Price,
    pub shipping_price: Price,
    pub tax_price: Price,
    pub total_price: Price,
}

impl OrderSummary {
    /// Price the given lines.
    #[must_use]
    pub fn for_items(items: &[CartItem]) -> Self {
        let items_price = subtotal(items).round2();
        let shipping_price = if items_price.amount() > FREE_SHIPPING_THRESHOLD {
            Price::ZERO
        } else {
            Price::from_dollars(FLAT_SHIPPING_DOLLARS)
        };
        let tax_price = items_price.times_rate(TAX_RATE).round2();
        let total_price = (shipping_price + tax_price + items_price).round2();

        Self {
            items_price,
            shipping_price,
            tax_price,
            total_price,
        }
    }

    /// Whether this order qualifies for free shipping.
    #[must_use]
    pub fn ships_free(&self) -> bool {
        self.shipping_price == Price::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::item;
    use super::*;

    fn price(s: &str) -> Price {
        s.parse().unwrap_or_else(|e| panic!("bad price {s}: {e}"))
    }

    #[test]
    fn test_reference_cart() {
        let summary = OrderSummary::for_items(&[item("free-shirt", 50, 2), item("fit-pants", 80, 1)]);

        assert_eq!(summary.items_price, price("180.00"));
        assert_eq!(summary.shipping_price, price("15"));
        assert_eq!(summary.tax_price, price("27.00"));
        assert_eq!(summary.total_price, price("222.00"));
        assert!(!summary.ships_free());
    }

    #[test]
    fn test_threshold_is_strict() {
        let at = OrderSummary::for_items(&[item("free-shirt", 100, 2)]);
        assert_eq!(at.items_price, price("200"));
        assert_eq!(at.shipping_price, price("15"));

        let mut above_item = item("free-shirt", 0, 1);
        above_item.price = price("200.01");
        let above = OrderSummary::for_items(&[above_item]);
        assert!(above.ships_free());
        assert_eq!(above.tax_price, price("30.00"));
        assert_eq!(above.total_price, price("230.01"));
    }

    #[test]
    fn test_items_price_rounds_to_cents() {
        let mut line = item("free-shirt", 0, 1);
        line.price = price("123.43456");
        let summary = OrderSummary::for_items(&[line]);

        assert_eq!(summary.items_price, price("123.43"));
        // 123.43 * 0.15 = 18.5145
        assert_eq!(summary.tax_price, price("18.51"));
        assert_eq!(summary.total_price, price("156.94"));
    }

    #[test]
    fn test_tax_half_cent_rounds_up() {
        let mut line = item("free-shirt", 0, 1);
        line.price = price("0.10");
        let summary = OrderSummary::for_items(&[line]);

        // 0.10 * 0.15 = 0.015
        assert_eq!(summary.tax_price, price("0.02"));
        assert_eq!(summary.total_price, price("15.12"));
    }

    #[test]
    fn test_rounding_is_per_step() {
        let mut line = item("free-shirt", 0, 3);
        line.price = price("33.335");
        let summary = OrderSummary::for_items(&[line]);

        // 100.005 rounds to 100.01 before tax is taken.
        assert_eq!(summary.items_price, price("100.01"));
        assert_eq!(summary.tax_price, price("15.00"));
        assert_eq!(summary.total_price, price("130.01"));
    }

    #[test]
    fn test_empty_cart_still_charges_shipping() {
        let summary = OrderSummary::for_items(&[]);
        assert_eq!(summary.items_price, Price::ZERO);
        assert_eq!(summary.total_price, price("15"));
    }

    #[test]
    fn test_oversized_cart_saturates() {
        let mut line = item("free-shirt", 0, 2);
        line.price = Price::new(Decimal::MAX).unwrap_or_default();
        let summary = OrderSummary::for_items(&[line]);

        assert!(summary.ships_free());
        assert_eq!(summary.items_price.amount(), Decimal::MAX);
        assert_eq!(summary.total_price.amount(), Decimal::MAX);
    }

    #[test]
    fn test_subtotal_is_unrounded() {
        let mut line = item("free-shirt", 0, 2);
        line.price = price("0.005");
        assert_eq!(subtotal(&[line]), price("0.010"));
    }
}
