//! Account commands.

use az_clothes_storefront::controllers::AccountController;

use super::Context;

/// Reset the cart and delete its snapshot.
pub fn logout(ctx: &mut Context) {
    AccountController::new(&mut ctx.session).logout();
    if let Some(user) = &ctx.user {
        tracing::info!(email = %user.email, "Signed out");
    }
}
