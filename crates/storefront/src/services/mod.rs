//! Collaborators the storefront talks to.
//!
//! # Services
//!
//! - `catalog` - Product lookup and live stock (`ProductCatalog`)
//! - `orders` - Order placement (`OrderPlacement`)
//! - `api` - HTTP client implementing both against the storefront API

pub mod api;
pub mod catalog;
pub mod orders;

pub use api::{ApiClient, ApiError};
pub use catalog::{CatalogError, InMemoryCatalog, ProductCatalog};
pub use orders::{FileOrderBook, InMemoryOrderBook, NewOrder, OrderError, OrderPlacement};
