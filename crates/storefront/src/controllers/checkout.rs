//! Checkout wizard handlers: shipping, payment, review and place order.
//!
//! Each step needs a signed-in shopper and is guarded by the checkout stage
//! graph; a shopper who skips ahead is sent back to the first incomplete
//! step via [`AppError::Redirect`].

use serde::{Deserialize, Serialize};
use tracing::instrument;

use az_clothes_core::{
    CartAction, CartItem, CheckoutStage, CheckoutStep, OrderId, OrderSummary, PaymentMethod,
    ShippingAddress,
};

use crate::error::{AppError, FormErrors, Result};
use crate::models::CurrentUser;
use crate::models::session::LOGIN_REDIRECT;
use crate::services::{NewOrder, OrderPlacement};
use crate::state::CartSession;
use crate::store::CartStore;

const MIN_FIELD_LEN: usize = 3;

// =============================================================================
// Forms
// =============================================================================

/// Shipping address form as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingForm {
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl From<&ShippingAddress> for ShippingForm {
    fn from(address: &ShippingAddress) -> Self {
        Self {
            full_name: address.full_name.clone(),
            address: address.address.clone(),
            city: address.city.clone(),
            postal_code: address.postal_code.clone(),
            country: address.country.clone(),
        }
    }
}

impl ShippingForm {
    /// Validate the form into a shipping address.
    ///
    /// # Errors
    ///
    /// Returns every failed field.
    pub fn validate(&self) -> std::result::Result<ShippingAddress, FormErrors> {
        let mut errors = FormErrors::default();

        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            errors.push("fullName", "Please enter full name");
        } else if full_name.chars().count() < MIN_FIELD_LEN {
            errors.push("fullName", "Name is min 3 characters");
        }

        let address = self.address.trim();
        if address.is_empty() {
            errors.push("address", "Please enter address");
        } else if address.chars().count() < MIN_FIELD_LEN {
            errors.push("address", "Enter a valid address");
        }

        let required = [
            ("city", self.city.trim(), "Please enter city"),
            ("postalCode", self.postal_code.trim(), "Please enter postal code"),
            ("country", self.country.trim(), "Please enter Country"),
        ];
        for (field, value, message) in required {
            if value.is_empty() {
                errors.push(field, message);
            }
        }

        errors.into_result()?;

        Ok(ShippingAddress {
            full_name: full_name.to_owned(),
            address: address.to_owned(),
            city: self.city.trim().to_owned(),
            postal_code: self.postal_code.trim().to_owned(),
            country: self.country.trim().to_owned(),
        })
    }
}

/// Payment step display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentForm {
    /// Previously chosen method, empty if none.
    pub selected: PaymentMethod,
    pub offered: [&'static str; 3],
}

// =============================================================================
// Views
// =============================================================================

/// Place-order page display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewView {
    pub items: Vec<CartItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub summary: OrderSummary,
}

/// Result of a successful order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub order_id: OrderId,
    pub stage: CheckoutStage,
}

impl PlacedOrder {
    /// Location of the order details page.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/order/{}", self.order_id)
    }
}

// =============================================================================
// Controller
// =============================================================================

/// Checkout operations for one shopper.
pub struct CheckoutController<'a, S, O> {
    session: &'a mut CartSession<S>,
    orders: &'a O,
    user: Option<&'a CurrentUser>,
}

impl<'a, S: CartStore, O: OrderPlacement> CheckoutController<'a, S, O> {
    pub const fn new(
        session: &'a mut CartSession<S>,
        orders: &'a O,
        user: Option<&'a CurrentUser>,
    ) -> Self {
        Self {
            session,
            orders,
            user,
        }
    }

    fn require_user(&self) -> Result<&'a CurrentUser> {
        self.user.ok_or_else(|| AppError::Unauthenticated {
            redirect: LOGIN_REDIRECT.to_owned(),
        })
    }

    fn enter(&self, step: CheckoutStep) -> Result<()> {
        self.require_user()?;
        step.guard(self.session.state()).map_err(AppError::Redirect)
    }

    /// Shipping form, pre-filled from the saved address.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthenticated` if no shopper is signed in.
    pub fn shipping_form(&self) -> Result<ShippingForm> {
        self.enter(CheckoutStep::Shipping)?;
        Ok(ShippingForm::from(&self.session.state().shipping_address))
    }

    /// Validate and save the shipping address. Returns the next step.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` listing every invalid field.
    #[instrument(skip_all)]
    pub fn save_shipping(&mut self, form: &ShippingForm) -> Result<CheckoutStep> {
        self.enter(CheckoutStep::Shipping)?;
        let address = form.validate()?;

        self.session
            .dispatch(CartAction::SaveShippingAddress(address));
        Ok(CheckoutStep::Payment)
    }

    /// Payment step, only once a shipping address is saved.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Redirect(Shipping)` without a shipping address.
    pub fn payment_form(&self) -> Result<PaymentForm> {
        self.enter(CheckoutStep::Payment)?;
        Ok(PaymentForm {
            selected: self.session.state().payment_method.clone(),
            offered: PaymentMethod::OFFERED,
        })
    }

    /// Save the chosen payment method. Returns the next step.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if no method or an unknown method was
    /// chosen.
    #[instrument(skip_all, fields(method = %method))]
    pub fn save_payment(&mut self, method: &str) -> Result<CheckoutStep> {
        self.enter(CheckoutStep::Payment)?;

        let method = PaymentMethod::new(method.trim());
        let mut errors = FormErrors::default();
        if !method.is_set() {
            errors.push("paymentMethod", "Payment method is required");
        } else if !method.is_offered() {
            errors.push(
                "paymentMethod",
                format!("{method} is not an accepted payment method"),
            );
        }
        errors.into_result()?;

        self.session.dispatch(CartAction::SavePaymentMethod(method));
        Ok(CheckoutStep::PlaceOrder)
    }

    /// Everything the place-order page shows.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Redirect` to the first incomplete step.
    pub fn review(&self) -> Result<ReviewView> {
        self.enter(CheckoutStep::PlaceOrder)?;
        let state = self.session.state();
        Ok(ReviewView {
            items: state.cart_items.clone(),
            shipping_address: state.shipping_address.clone(),
            payment_method: state.payment_method.clone(),
            summary: state.summary(),
        })
    }

    /// Submit the order. On success the cart's items are cleared; the saved
    /// address and payment method are kept for the next order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::EmptyCart` for an empty cart, or the order error.
    /// The cart is untouched on failure.
    #[instrument(skip_all)]
    pub async fn place_order(&mut self) -> Result<PlacedOrder> {
        self.enter(CheckoutStep::PlaceOrder)?;
        if self.session.state().is_empty() {
            return Err(AppError::EmptyCart);
        }

        let order = NewOrder::from_cart(self.session.state());
        let order_id = self.orders.place_order(&order).await?;

        self.session.dispatch(CartAction::ClearItems);
        tracing::info!(order_id = %order_id, total = %order.total_price, "Order placed");

        Ok(PlacedOrder {
            order_id,
            stage: CheckoutStage::Placed,
        })
    }
}
