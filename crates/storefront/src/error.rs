//! Unified error handling with Sentry integration.
//!
//! Controllers return `Result<T, AppError>`. Failures of the shopper's own
//! making (out of stock, invalid form, wrong checkout step) become messages;
//! failures of a collaborator (catalog, order service, snapshot store) are
//! also logged and captured to Sentry by [`AppError::report`].

use std::fmt;

use thiserror::Error;

use az_clothes_core::{CheckoutStep, Slug};

use crate::services::{CatalogError, OrderError};
use crate::store::StoreError;

/// A single invalid form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every invalid field of a submitted form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(pub Vec<FieldError>);

impl FormErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// The message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(())` when nothing failed.
    ///
    /// # Errors
    ///
    /// Returns `self` if any field failed.
    pub fn into_result(self) -> std::result::Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for FormErrors {}

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// The requested quantity exceeds the catalog's stock.
    #[error("Out of stock: {slug} (requested {requested}, available {available})")]
    OutOfStock {
        slug: Slug,
        requested: u32,
        available: u32,
    },

    /// The slug is not in the cart.
    #[error("Not in cart: {0}")]
    ItemNotInCart(Slug),

    /// Checkout was attempted with no items.
    #[error("Cart is empty")]
    EmptyCart,

    /// The shopper must sign in first.
    #[error("Unauthorized: sign in to continue to {redirect}")]
    Unauthenticated { redirect: String },

    /// An earlier checkout step is incomplete.
    #[error("Redirect: {0}")]
    Redirect(CheckoutStep),

    /// A submitted form failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] FormErrors),

    /// Product catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Order placement failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Snapshot store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl AppError {
    /// Whether this error comes from a collaborator rather than the shopper.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Catalog(_) | Self::Order(_) | Self::Store(_))
    }

    /// The toast shown to the shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::OutOfStock { .. } => "Sorry. Product is out of stock".to_owned(),
            Self::ItemNotInCart(_) => "That item is no longer in your cart".to_owned(),
            Self::EmptyCart => "Cart is empty".to_owned(),
            Self::Unauthenticated { .. } => "Signin required".to_owned(),
            Self::Redirect(step) => format!("Please complete {step} first"),
            Self::Validation(errors) => errors.to_string(),
            Self::Catalog(CatalogError::NotFound(_)) => "Product Not Found".to_owned(),
            Self::Order(OrderError::Rejected(message)) => message.clone(),
            Self::Catalog(_) | Self::Order(_) | Self::Store(_) => {
                "Something went wrong, please try again".to_owned()
            }
        }
    }

    /// Log the error and capture collaborator failures to Sentry.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::info!(error = %self, "Request rejected");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of cart
/// actions leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_owned()),
        message: Some(message.to_owned()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_owned(),
                serde_json::Value::String((*value).to_owned()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
