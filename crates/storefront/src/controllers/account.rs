//! Account handlers.

use tracing::instrument;

use az_clothes_core::CartAction;

use crate::state::CartSession;
use crate::store::CartStore;

/// Account operations for one shopper.
pub struct AccountController<'a, S> {
    session: &'a mut CartSession<S>,
}

impl<'a, S: CartStore> AccountController<'a, S> {
    pub const fn new(session: &'a mut CartSession<S>) -> Self {
        Self { session }
    }

    /// Sign out: forget the cart, the saved address and the payment method,
    /// and delete the persisted snapshot.
    #[instrument(skip_all)]
    pub fn logout(&mut self) {
        self.session.dispatch(CartAction::Reset);
        tracing::info!("Signed out");
    }
}
