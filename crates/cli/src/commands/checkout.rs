//! Checkout commands.

use clap::Args;

use az_clothes_storefront::controllers::{CheckoutController, ShippingForm};
use az_clothes_storefront::services::InMemoryOrderBook;

use super::{CommandError, Context, reported};

/// Shipping address fields.
#[derive(Debug, Args)]
pub struct ShippingArgs {
    #[arg(long)]
    pub full_name: String,
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub city: String,
    #[arg(long)]
    pub postal_code: String,
    #[arg(long)]
    pub country: String,
}

impl From<ShippingArgs> for ShippingForm {
    fn from(args: ShippingArgs) -> Self {
        Self {
            full_name: args.full_name,
            address: args.address,
            city: args.city,
            postal_code: args.postal_code,
            country: args.country,
        }
    }
}

/// Save the shipping address.
///
/// # Errors
///
/// Returns an error if no shopper is signed in or a field is invalid.
pub fn shipping(ctx: &mut Context, args: ShippingArgs) -> Result<(), CommandError> {
    // Steps before placing an order never reach the order service.
    let orders = InMemoryOrderBook::new();
    let form = ShippingForm::from(args);

    let next = CheckoutController::new(&mut ctx.session, &orders, ctx.user.as_ref())
        .save_shipping(&form)
        .map_err(reported)?;
    tracing::info!(next = %next, "Shipping address saved");
    Ok(())
}

/// Save the payment method.
///
/// # Errors
///
/// Returns an error if no shipping address is saved or the method is not
/// offered.
pub fn payment(ctx: &mut Context, method: &str) -> Result<(), CommandError> {
    let orders = InMemoryOrderBook::new();

    let next = CheckoutController::new(&mut ctx.session, &orders, ctx.user.as_ref())
        .save_payment(method)
        .map_err(reported)?;
    tracing::info!(next = %next, "Payment method saved");
    Ok(())
}

/// Show what would be ordered.
///
/// # Errors
///
/// Returns an error if an earlier step is incomplete.
pub fn review(ctx: &mut Context) -> Result<(), CommandError> {
    let orders = InMemoryOrderBook::new();

    let review = CheckoutController::new(&mut ctx.session, &orders, ctx.user.as_ref())
        .review()
        .map_err(reported)?;

    for item in &review.items {
        tracing::info!(
            slug = %item.slug,
            quantity = item.quantity,
            line_total = %item.line_total(),
            "{}",
            item.name
        );
    }
    let address = &review.shipping_address;
    tracing::info!(
        "Ship to {}, {}, {} {}, {}",
        address.full_name,
        address.address,
        address.city,
        address.postal_code,
        address.country
    );
    tracing::info!(method = %review.payment_method, "Payment");

    let summary = &review.summary;
    tracing::info!(
        items = %summary.items_price,
        shipping = %summary.shipping_price,
        tax = %summary.tax_price,
        total = %summary.total_price,
        "Order summary"
    );
    Ok(())
}

/// Place the order.
///
/// # Errors
///
/// Returns an error if checkout is incomplete, the cart is empty or the
/// order service refuses the order.
pub async fn place(ctx: &mut Context) -> Result<(), CommandError> {
    let backend = ctx.backend()?;

    let placed = CheckoutController::new(&mut ctx.session, &backend, ctx.user.as_ref())
        .place_order()
        .await
        .map_err(reported)?;
    tracing::info!(order_id = %placed.order_id, path = %placed.path(), "Order placed");
    Ok(())
}
