//! Product catalog collaborator.
//!
//! The cart never trusts the `countInStock` it copied into a line: every
//! quantity change asks the catalog for the current stock first.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use az_clothes_core::{ProductId, Slug};

use super::ApiError;
use crate::models::Product;

/// Errors that can occur when reading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product has this slug.
    #[error("Product not found: {0}")]
    NotFound(Slug),

    /// No product has this id.
    #[error("Unknown product id: {0}")]
    UnknownProduct(ProductId),

    /// Catalog file could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog file is not a valid catalog.
    #[error("Invalid catalog {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Storefront API request failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Read access to products and their live stock.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Look up a product by slug.
    async fn product(&self, slug: &Slug) -> Result<Product, CatalogError>;

    /// Units currently in stock for `id`.
    async fn current_stock(&self, id: &ProductId) -> Result<u32, CatalogError>;
}

/// On-disk catalog layout: `products: [...]`.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    products: Vec<Product>,
}

/// Catalog held in memory, optionally loaded from a YAML or JSON file.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<Slug, Product>>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: RwLock::new(
                products
                    .into_iter()
                    .map(|p| (p.slug.clone(), p))
                    .collect(),
            ),
        }
    }

    /// Load a catalog file. `.json` files are read as JSON, anything else
    /// as YAML.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the file cannot be read and
    /// `CatalogError::Parse` if it is not a catalog.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let parsed: Result<CatalogFile, String> = if is_json {
            serde_json::from_str(&raw).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(&raw).map_err(|e| e.to_string())
        };

        let file = parsed.map_err(|message| CatalogError::Parse {
            path: path.to_path_buf(),
            message,
        })?;

        tracing::debug!(path = %path.display(), products = file.products.len(), "Catalog loaded");
        Ok(Self::new(file.products))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.read().map_or(0, |p| p.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Change the stock of a product, as another shopper's order would.
    pub fn set_stock(&self, id: &ProductId, count_in_stock: u32) {
        if let Ok(mut products) = self.products.write()
            && let Some(product) = products.values_mut().find(|p| &p.id == id)
        {
            product.count_in_stock = count_in_stock;
        }
    }
}

#[async_trait]
impl ProductCatalog for InMemoryCatalog {
    async fn product(&self, slug: &Slug) -> Result<Product, CatalogError> {
        self.products
            .read()
            .ok()
            .and_then(|products| products.get(slug).cloned())
            .ok_or_else(|| CatalogError::NotFound(slug.clone()))
    }

    async fn current_stock(&self, id: &ProductId) -> Result<u32, CatalogError> {
        self.products
            .read()
            .ok()
            .and_then(|products| {
                products
                    .values()
                    .find(|p| &p.id == id)
                    .map(|p| p.count_in_stock)
            })
            .ok_or_else(|| CatalogError::UnknownProduct(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use az_clothes_core::Price;

    use super::*;

    const YAML: &str = "\
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
    name: Golf Pants
    slug: golf-pants
    price: 90
    countInStock: 0
";

    fn slug(s: &str) -> Slug {
        Slug::parse(s).unwrap_or_else(|e| panic!("{e}"))
    }

    fn write_catalog(name: &str, contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap_or_else(|e| panic!("{e}"));
        file.write_all(contents.as_bytes())
            .unwrap_or_else(|e| panic!("{e}"));
        (dir, path)
    }

    #[tokio::test]
    async fn test_load_yaml_catalog() {
        let (_dir, path) = write_catalog("catalog.yaml", YAML);
        let catalog = InMemoryCatalog::from_file(&path).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(catalog.len(), 2);

        let shirt = catalog
            .product(&slug("free-shirt"))
            .await
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(shirt.price, Price::from_dollars(70));
        assert_eq!(shirt.brand, "Nike");

        let pants = catalog
            .product(&slug("golf-pants"))
            .await
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(!pants.in_stock());
    }

    #[tokio::test]
    async fn test_load_json_catalog() {
        let json = r#"{"products":[{"_id":"p1","name":"Fit Shirt","slug":"fit-shirt","price":80,"countInStock":3}]}"#;
        let (_dir, path) = write_catalog("catalog.json", json);
        let catalog = InMemoryCatalog::from_file(&path).unwrap_or_else(|e| panic!("{e}"));

        let stock = catalog
            .current_stock(&ProductId::new("p1"))
            .await
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(stock, 3);
    }

    #[test]
    fn test_invalid_catalog_file() {
        let (_dir, path) = write_catalog("catalog.yaml", "products: nope");
        assert!(matches!(
            InMemoryCatalog::from_file(&path),
            Err(CatalogError::Parse { .. })
        ));

        assert!(matches!(
            InMemoryCatalog::from_file("/nonexistent/catalog.yaml"),
            Err(CatalogError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_slug_and_id() {
        let catalog = InMemoryCatalog::default();
        assert!(catalog.is_empty());

        assert!(matches!(
            catalog.product(&slug("missing")).await,
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(
            catalog.current_stock(&ProductId::new("missing")).await,
            Err(CatalogError::UnknownProduct(_))
        ));
    }

    #[tokio::test]
    async fn test_set_stock() {
        let (_dir, path) = write_catalog("catalog.yaml", YAML);
        let catalog = InMemoryCatalog::from_file(&path).unwrap_or_else(|e| panic!("{e}"));

        catalog.set_stock(&ProductId::new("p1"), 1);
        let stock = catalog
            .current_stock(&ProductId::new("p1"))
            .await
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(stock, 1);
    }
}
