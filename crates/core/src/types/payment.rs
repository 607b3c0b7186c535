//! Payment method chosen during checkout.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The payment method saved on the cart.
///
/// The cart treats this as an opaque string: the storefront offers a fixed
/// list ([`PaymentMethod::OFFERED`]) but anything previously persisted is
/// carried through untouched. The empty string means "not chosen yet".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentMethod(String);

impl PaymentMethod {
    /// `PayPal` checkout.
    pub const PAYPAL: &'static str = "PayPal";
    /// Card payment through Stripe.
    pub const STRIPE: &'static str = "Stripe";
    /// Pay the courier on delivery.
    pub const CASH_ON_DELIVERY: &'static str = "CashOnDelivery";

    /// Methods offered on the payment step, in display order.
    pub const OFFERED: [&'static str; 3] = [Self::PAYPAL, Self::STRIPE, Self::CASH_ON_DELIVERY];

    /// Create a payment method from any string.
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self(method.into())
    }

    /// Whether a method has been chosen.
    #[must_use]
    pub fn is_set(&self) -> bool {
        !self.0.is_empty()
    }

    /// Whether this is one of the methods the payment step offers.
    #[must_use]
    pub fn is_offered(&self) -> bool {
        Self::OFFERED.contains(&self.0.as_str())
    }

    /// Returns the method as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PaymentMethod {
    fn from(method: &str) -> Self {
        Self::new(method)
    }
}
