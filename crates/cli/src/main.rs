//! Az Clothes CLI - drive a shopper's cart and checkout from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! az-cli cart show
//!
//! # Add one unit of a product, then set its quantity
//! az-cli cart add free-shirt
//! az-cli cart set free-shirt 3
//!
//! # Check out (requires a signed-in shopper)
//! az-cli --email jane@example.com checkout shipping \
//!     --full-name "Jane Doe" --address "1 Main St" --city Springfield \
//!     --postal-code 12345 --country USA
//! az-cli --email jane@example.com checkout payment PayPal
//! az-cli --email jane@example.com checkout review
//! az-cli --email jane@example.com checkout place
//!
//! # Sign out and forget the cart
//! az-cli logout
//! ```
//!
//! # Commands
//!
//! - `cart` - Show and edit the cart
//! - `checkout` - Shipping, payment, review and place order
//! - `logout` - Reset the cart and delete its snapshot

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use az_clothes_storefront::config::StorefrontConfig;

mod commands;

#[derive(Parser)]
#[command(name = "az-cli")]
#[command(author, version, about = "Az Clothes cart and checkout")]
struct Cli {
    /// Signed-in shopper's email address
    #[arg(long, global = true, env = "AZ_USER_EMAIL")]
    email: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Go through checkout
    Checkout {
        #[command(subcommand)]
        step: CheckoutAction,
    },
    /// Sign out and forget the cart
    Logout,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and subtotal
    Show,
    /// Add one unit of a product
    Add {
        /// Product slug
        slug: String,
    },
    /// Set the quantity of a cart line
    Set {
        /// Product slug
        slug: String,
        /// New quantity (at least 1)
        quantity: u32,
    },
    /// Remove a line from the cart
    Remove {
        /// Product slug
        slug: String,
    },
}

#[derive(Subcommand)]
enum CheckoutAction {
    /// Save the shipping address
    Shipping(commands::checkout::ShippingArgs),
    /// Save the payment method (`PayPal`, `Stripe`, `CashOnDelivery`)
    Payment {
        method: String,
    },
    /// Show the order summary
    Review,
    /// Place the order
    Place,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(2);
        }
    };

    // Sentry must be initialised before the subscriber
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "az_clothes_storefront=info,az_clothes_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = commands::Context::open(config, cli.email.as_deref())?;

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&mut ctx),
            CartAction::Add { slug } => commands::cart::add(&mut ctx, &slug).await?,
            CartAction::Set { slug, quantity } => {
                commands::cart::set(&mut ctx, &slug, quantity).await?;
            }
            CartAction::Remove { slug } => commands::cart::remove(&mut ctx, &slug)?,
        },
        Commands::Checkout { step } => match step {
            CheckoutAction::Shipping(args) => commands::checkout::shipping(&mut ctx, args)?,
            CheckoutAction::Payment { method } => commands::checkout::payment(&mut ctx, &method)?,
            CheckoutAction::Review => commands::checkout::review(&mut ctx)?,
            CheckoutAction::Place => commands::checkout::place(&mut ctx).await?,
        },
        Commands::Logout => commands::account::logout(&mut ctx),
    }
    Ok(())
}
