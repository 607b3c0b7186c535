//! CLI command implementations.
//!
//! Each invocation opens the file-backed cart session, runs one controller
//! operation and logs the result.

pub mod account;
pub mod cart;
pub mod checkout;

use async_trait::async_trait;
use thiserror::Error;

use az_clothes_core::{Email, EmailError, OrderId, ProductId, Slug, SlugError};
use az_clothes_storefront::AppError;
use az_clothes_storefront::config::StorefrontConfig;
use az_clothes_storefront::models::{CurrentUser, Product};
use az_clothes_storefront::services::{
    ApiClient, ApiError, CatalogError, FileOrderBook, InMemoryCatalog, NewOrder, OrderError,
    OrderPlacement, ProductCatalog,
};
use az_clothes_storefront::state::CartSession;
use az_clothes_storefront::store::FileCartStore;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// `--email` is not a valid address.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Product slug argument is malformed.
    #[error("Invalid product slug: {0}")]
    InvalidSlug(#[from] SlugError),

    /// Storefront API client could not be created.
    #[error("API client error: {0}")]
    Api(#[from] ApiError),

    /// Local catalog could not be loaded.
    #[error("{0}")]
    Catalog(#[from] CatalogError),

    /// The storefront refused the operation.
    #[error("{}", .0.user_message())]
    App(AppError),
}

/// Log an application error (and capture it to Sentry when it is ours).
pub fn reported(error: AppError) -> CommandError {
    error.report();
    CommandError::App(error)
}

/// Where products come from and orders go to.
pub enum Backend {
    /// Storefront API at `AZ_API_BASE_URL`.
    Api(ApiClient),
    /// Local catalog file and order book directory.
    Local {
        catalog: InMemoryCatalog,
        orders: FileOrderBook,
    },
}

#[async_trait]
impl ProductCatalog for Backend {
    async fn product(&self, slug: &Slug) -> Result<Product, CatalogError> {
        match self {
            Self::Api(client) => client.product(slug).await,
            Self::Local { catalog, .. } => catalog.product(slug).await,
        }
    }

    async fn current_stock(&self, id: &ProductId) -> Result<u32, CatalogError> {
        match self {
            Self::Api(client) => client.current_stock(id).await,
            Self::Local { catalog, .. } => catalog.current_stock(id).await,
        }
    }
}

#[async_trait]
impl OrderPlacement for Backend {
    async fn place_order(&self, order: &NewOrder) -> Result<OrderId, OrderError> {
        match self {
            Self::Api(client) => client.place_order(order).await,
            Self::Local { orders, .. } => orders.place_order(order).await,
        }
    }
}

/// Everything a command needs.
pub struct Context {
    pub config: StorefrontConfig,
    pub session: CartSession<FileCartStore>,
    pub user: Option<CurrentUser>,
}

impl Context {
    /// Restore the cart from `AZ_CART_PATH` and resolve the shopper.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::InvalidEmail` if `email` is malformed.
    pub fn open(config: StorefrontConfig, email: Option<&str>) -> Result<Self, CommandError> {
        let user = email
            .map(Email::parse)
            .transpose()?
            .map(CurrentUser::with_email);

        let session = CartSession::hydrate(FileCartStore::new(&config.cart_path));
        tracing::debug!(
            cart = %config.cart_path.display(),
            signed_in = user.is_some(),
            "Session opened"
        );

        Ok(Self {
            config,
            session,
            user,
        })
    }

    /// The product and order collaborators for this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be built or the local
    /// catalog cannot be loaded.
    pub fn backend(&self) -> Result<Backend, CommandError> {
        if let Some(api) = &self.config.api {
            return Ok(Backend::Api(ApiClient::new(api)?));
        }

        Ok(Backend::Local {
            catalog: InMemoryCatalog::from_file(&self.config.catalog_path)?,
            orders: FileOrderBook::new(&self.config.orders_dir),
        })
    }
}

/// Parse a slug argument.
///
/// # Errors
///
/// Returns `CommandError::InvalidSlug` if `raw` is not a slug.
pub fn parse_slug(raw: &str) -> Result<Slug, CommandError> {
    Ok(Slug::parse(raw)?)
}
