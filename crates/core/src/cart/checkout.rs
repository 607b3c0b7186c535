//! Checkout stage graph.
//!
//! ```text
//! Empty --SAVE_SHIPPING_ADDRESS--> HasShippingAddress --SAVE_PAYMENT_METHOD--> HasPaymentMethod --order confirmed--> Placed
//! ```
//!
//! The first three stages are derived from the cart itself. `Placed` is only
//! reached after the order collaborator confirms an order, so it is never
//! derived; callers construct it with [`CheckoutStage::Placed`] directly.

use serde::{Deserialize, Serialize};

use super::CartState;

/// How far through checkout a cart has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStage {
    Empty,
    HasShippingAddress,
    HasPaymentMethod,
    Placed,
}

impl CheckoutStage {
    /// Derive the stage of a cart that has not been placed.
    #[must_use]
    pub fn of(state: &CartState) -> Self {
        if !state.shipping_address.is_set() {
            Self::Empty
        } else if !state.payment_method.is_set() {
            Self::HasShippingAddress
        } else {
            Self::HasPaymentMethod
        }
    }
}

/// A page of the checkout wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    Shipping,
    Payment,
    PlaceOrder,
}

impl CheckoutStep {
    /// Wizard steps in order.
    pub const ALL: [Self; 3] = [Self::Shipping, Self::Payment, Self::PlaceOrder];

    /// Location of the step's page.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Shipping => "/shipping",
            Self::Payment => "/payment",
            Self::PlaceOrder => "/placeorder",
        }
    }

    /// Check whether `state` may enter this step.
    ///
    /// # Errors
    ///
    /// Returns the step the shopper must be sent back to: `Shipping` when no
    /// address is saved, `Payment` when entering `PlaceOrder` without a
    /// payment method.
    pub fn guard(self, state: &CartState) -> Result<(), Self> {
        match self {
            Self::Shipping => Ok(()),
            Self::Payment if !state.shipping_address.is_set() => Err(Self::Shipping),
            Self::Payment => Ok(()),
            Self::PlaceOrder if !state.shipping_address.is_set() => Err(Self::Shipping),
            Self::PlaceOrder if !state.payment_method.is_set() => Err(Self::Payment),
            Self::PlaceOrder => Ok(()),
        }
    }
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}
