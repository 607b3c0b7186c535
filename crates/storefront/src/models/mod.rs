//! Domain models for the storefront layer.
//!
//! - [`product`] - Catalog records as the product collaborators return them
//! - [`session`] - The signed-in shopper

pub mod product;
pub mod session;

pub use product::Product;
pub use session::CurrentUser;
