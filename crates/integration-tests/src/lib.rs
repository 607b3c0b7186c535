//! Integration tests for Az Clothes.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p az-clothes-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - Add to cart through placed order
//! - `cart_persistence` - Snapshot store behaviour across sessions
//!
//! This library holds the fixtures the test files share.

#![cfg_attr(not(test), forbid(unsafe_code))]

use az_clothes_core::{Email, Price, ProductId, Slug};
use az_clothes_storefront::controllers::ShippingForm;
use az_clothes_storefront::models::{CurrentUser, Product};
use az_clothes_storefront::services::InMemoryCatalog;

/// Catalog YAML with a few products, as `AZ_CATALOG_PATH` would hold it.
pub const CATALOG_YAML: &str = "\
products:
  - _id: p1
    name: Free Shirt
    slug: free-shirt
    category: Shirts
    image: /images/shirt1.jpg
    price: 70
    brand: Nike
    rating: 4.5
    numReviews: 8
    countInStock: 20
    description: A popular shirt
  - _id: p2
    name: Fit Shirt
    slug: fit-shirt
    category: Shirts
    image: /images/shirt2.jpg
    price: 80
    brand: Adidas
    rating: 3.2
    numReviews: 10
    countInStock: 2
    description: A slim fit shirt
  - _id: p3
    name: Classic Pants
    slug: classic-pants
    category: Pants
    image: /images/pants3.jpg
    price: 75
    brand: Casely
    rating: 4.5
    numReviews: 10
    countInStock: 0
    description: A classic pants
";

/// Parse a slug known to be valid.
///
/// # Panics
///
/// Panics if `s` is not a slug.
#[must_use]
pub fn slug(s: &str) -> Slug {
    Slug::parse(s).unwrap_or_else(|e| panic!("bad slug {s}: {e}"))
}

/// A catalog product with the given stock.
#[must_use]
pub fn product(id: &str, slug_str: &str, dollars: u32, count_in_stock: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: slug_str.replace('-', " "),
        slug: slug(slug_str),
        category: String::new(),
        image: format!("/images/{slug_str}.jpg"),
        price: Price::from_dollars(dollars),
        brand: String::new(),
        rating: Default::default(),
        num_reviews: 0,
        count_in_stock,
        description: String::new(),
    }
}

/// The catalog described by [`CATALOG_YAML`], loaded through a file.
///
/// # Panics
///
/// Panics if the catalog cannot be written or loaded.
#[must_use]
pub fn catalog_from_yaml(dir: &std::path::Path) -> InMemoryCatalog {
    let path = dir.join("catalog.yaml");
    std::fs::write(&path, CATALOG_YAML).unwrap_or_else(|e| panic!("write catalog: {e}"));
    InMemoryCatalog::from_file(&path).unwrap_or_else(|e| panic!("load catalog: {e}"))
}

/// A signed-in shopper.
///
/// # Panics
///
/// Never; the address is valid.
#[must_use]
pub fn shopper() -> CurrentUser {
    CurrentUser::with_email(
        Email::parse("shopper@example.com").unwrap_or_else(|e| panic!("bad email: {e}")),
    )
}

/// A shipping form that passes validation.
#[must_use]
pub fn shipping_form() -> ShippingForm {
    ShippingForm {
        full_name: "Jane Doe".to_owned(),
        address: "1 Main St".to_owned(),
        city: "Springfield".to_owned(),
        postal_code: "12345".to_owned(),
        country: "USA".to_owned(),
    }
}
