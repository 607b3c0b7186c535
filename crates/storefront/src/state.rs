//! The cart session: application state owned by the top-level shell.
//!
//! A [`CartSession`] is the single writer of a shopper's [`CartState`].
//! Controllers borrow it mutably, dispatch actions, and read the result.
//! After each transition the session runs its persistence hook:
//!
//! | Action | Hook |
//! |---|---|
//! | `CART_RESET` | `store.clear()` |
//! | any other known action | `store.save(state)` |
//! | unknown action | nothing |
//!
//! Persistence failures are logged and otherwise ignored; the in-memory cart
//! is always the result of the transition.

use tracing::{debug, warn};

use az_clothes_core::{CartAction, CartState, CheckoutStage, OrderSummary};

use crate::error::add_breadcrumb;
use crate::store::{CartStore, StoreError};

/// A shopper's cart plus the store it is persisted to.
#[derive(Debug)]
pub struct CartSession<S> {
    state: CartState,
    store: S,
}

impl<S: CartStore> CartSession<S> {
    /// Start a session from whatever `store` holds.
    ///
    /// A missing snapshot starts an empty cart. An unreadable snapshot is
    /// logged and also starts an empty cart.
    pub fn hydrate(store: S) -> Self {
        let state = match store.load() {
            Ok(Some(state)) => {
                debug!(items = state.cart_items.len(), "Cart restored from snapshot");
                state
            }
            Ok(None) => CartState::default(),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable cart snapshot");
                CartState::default()
            }
        };

        Self { state, store }
    }

    /// Apply `action` and persist the result.
    pub fn dispatch(&mut self, action: CartAction) -> &CartState {
        let kind = action.kind();
        let mutating = action.is_mutating();
        let reset = matches!(action, CartAction::Reset);

        self.state.apply(action);
        debug!(action = kind, items = self.state.cart_items.len(), "Cart transition");

        if mutating {
            let items = self.state.cart_items.len().to_string();
            add_breadcrumb("cart", kind, Some(&[("items", items.as_str())][..]));
            let persisted = if reset {
                self.store.clear()
            } else {
                self.store.save(&self.state)
            };
            if let Err(e) = persisted {
                on_persist_error(kind, &e);
            }
        }

        &self.state
    }

    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    #[must_use]
    pub fn stage(&self) -> CheckoutStage {
        self.state.stage()
    }

    #[must_use]
    pub fn summary(&self) -> OrderSummary {
        self.state.summary()
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }
}

fn on_persist_error(kind: &str, error: &StoreError) {
    warn!(action = kind, error = %error, "Failed to persist cart snapshot");
}
