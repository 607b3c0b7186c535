//! The shopping cart aggregate.
//!
//! [`CartState`] is the whole client-side cart: line items, the shipping
//! address and the chosen payment method. It is owned by a single writer and
//! only ever changed through [`transition`] / [`CartState::apply`], so the
//! same action sequence always produces the same cart.
//!
//! Serialized field names follow the persisted cart snapshot (`cartItems`,
//! `shippingAddress`, `countInStock`, ...), so snapshots written by earlier
//! sessions load unchanged.

pub mod action;
pub mod checkout;
pub mod pricing;

use serde::{Deserialize, Serialize};

use crate::types::{PaymentMethod, Price, ProductId, Slug};

pub use action::{CartAction, transition};
pub use checkout::{CheckoutStage, CheckoutStep};
pub use pricing::{OrderSummary, subtotal};

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Catalog id of the product, used for stock lookups.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    /// Identity of the line within the cart.
    pub slug: Slug,
    pub name: String,
    #[serde(default)]
    pub image: String,
    /// Unit price.
    pub price: Price,
    /// Number of units, already resolved by the caller.
    pub quantity: u32,
    /// Stock ceiling reported by the catalog when the item was added.
    #[serde(default)]
    pub count_in_stock: u32,
}

impl CartItem {
    /// Unit price times quantity, unrounded.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }

    /// A copy of this item with a different quantity.
    #[must_use]
    pub fn with_quantity(&self, quantity: u32) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }
}

/// Where the order ships to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingAddress {
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl ShippingAddress {
    /// An address counts as set once its street line is non-empty.
    #[must_use]
    pub fn is_set(&self) -> bool {
        !self.address.is_empty()
    }
}

/// The cart and checkout progress of one shopper.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CartState {
    /// Lines in first-add order, unique by slug.
    pub cart_items: Vec<CartItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
}

impl CartState {
    /// The line with the given slug, if any.
    #[must_use]
    pub fn find(&self, slug: &Slug) -> Option<&CartItem> {
        self.cart_items.iter().find(|item| &item.slug == slug)
    }

    /// Total units across all lines (the cart badge). Saturates at `u32::MAX`.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.cart_items
            .iter()
            .fold(0, |count, item| count.saturating_add(item.quantity))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart_items.is_empty()
    }

    /// Pricing for the current lines.
    #[must_use]
    pub fn summary(&self) -> OrderSummary {
        OrderSummary::for_items(&self.cart_items)
    }

    /// Checkout progress derived from the saved address and payment method.
    #[must_use]
    pub fn stage(&self) -> CheckoutStage {
        CheckoutStage::of(self)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn item(slug: &str, dollars: u32, quantity: u32) -> CartItem {
        CartItem {
            id: Some(ProductId::new(format!("id-{slug}"))),
            slug: Slug::parse(slug).unwrap_or_else(|e| panic!("bad fixture slug {slug}: {e}")),
            name: slug.replace('-', " "),
            image: format!("/images/{slug}.jpg"),
            price: Price::from_dollars(dollars),
            quantity,
            count_in_stock: 10,
        }
    }

    pub fn address() -> ShippingAddress {
        ShippingAddress {
            full_name: "Ada Lovelace".to_owned(),
            address: "12 St James's Square".to_owned(),
            city: "London".to_owned(),
            postal_code: "SW1Y 4JH".to_owned(),
            country: "UK".to_owned(),
        }
    }
}
