//! Cart commands.

use az_clothes_storefront::controllers::{CartController, CartView};
use az_clothes_storefront::services::InMemoryCatalog;

use super::{CommandError, Context, parse_slug, reported};

fn log_view(view: &CartView) {
    if view.is_empty() {
        tracing::info!("Cart is empty");
        return;
    }

    for item in &view.items {
        tracing::info!(
            slug = %item.slug,
            quantity = item.quantity,
            price = %item.price,
            line_total = %item.line_total,
            "{}",
            item.name
        );
    }
    tracing::info!(items = view.item_count, subtotal = %view.subtotal, "Subtotal");
}

/// Show the cart. Needs no catalog.
pub fn show(ctx: &mut Context) {
    let catalog = InMemoryCatalog::default();
    let view = CartController::new(&mut ctx.session, &catalog).view();
    log_view(&view);
}

/// Add one unit of `slug`.
///
/// # Errors
///
/// Returns an error if the slug is invalid, the product is unknown or out
/// of stock.
pub async fn add(ctx: &mut Context, slug: &str) -> Result<(), CommandError> {
    let slug = parse_slug(slug)?;
    let backend = ctx.backend()?;

    let view = CartController::new(&mut ctx.session, &backend)
        .add_product(&slug)
        .await
        .map_err(reported)?;
    log_view(&view);
    Ok(())
}

/// Set the quantity of `slug`.
///
/// # Errors
///
/// Returns an error if the line is missing, the quantity is zero or the
/// stock cannot cover it.
pub async fn set(ctx: &mut Context, slug: &str, quantity: u32) -> Result<(), CommandError> {
    let slug = parse_slug(slug)?;
    let backend = ctx.backend()?;

    let view = CartController::new(&mut ctx.session, &backend)
        .update_quantity(&slug, quantity)
        .await
        .map_err(reported)?;
    log_view(&view);
    Ok(())
}

/// Remove the line for `slug`.
///
/// # Errors
///
/// Returns an error if the line is missing.
pub fn remove(ctx: &mut Context, slug: &str) -> Result<(), CommandError> {
    let slug = parse_slug(slug)?;
    let catalog = InMemoryCatalog::default();

    let view = CartController::new(&mut ctx.session, &catalog)
        .remove(&slug)
        .map_err(reported)?;
    log_view(&view);
    Ok(())
}
