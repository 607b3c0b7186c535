//! Catalog product record.

use serde::{Deserialize, Serialize};

use az_clothes_core::{CartItem, Price, ProductId, Slug};

/// A product as the catalog serves it.
///
/// Field names match the catalog API (`_id`, `countInStock`, `numReviews`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    pub slug: Slug,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    pub price: Price,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub rating: rust_decimal::Decimal,
    #[serde(default)]
    pub num_reviews: u32,
    pub count_in_stock: u32,
    #[serde(default)]
    pub description: String,
}

impl Product {
    /// The cart line for `quantity` units of this product.
    #[must_use]
    pub fn to_cart_item(&self, quantity: u32) -> CartItem {
        CartItem {
            id: Some(self.id.clone()),
            slug: self.slug.clone(),
            name: self.name.clone(),
            image: self.image.clone(),
            price: self.price,
            quantity,
            count_in_stock: self.count_in_stock,
        }
    }

    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.count_in_stock > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"{
        "_id": "62f1c0a1",
        "name": "Free Shirt",
        "slug": "free-shirt",
        "category": "Shirts",
        "image": "/images/shirt1.jpg",
        "price": 70,
        "brand": "Nike",
        "rating": 4.5,
        "numReviews": 8,
        "countInStock": 20,
        "description": "A popular shirt"
    }"#;

    #[test]
    fn test_deserialize_catalog_record() {
        let product: Product = serde_json::from_str(RECORD).unwrap_or_else(|e| panic!("{e}"));

        assert_eq!(product.id.as_str(), "62f1c0a1");
        assert_eq!(product.slug.as_str(), "free-shirt");
        assert_eq!(product.price, Price::from_dollars(70));
        assert_eq!(product.num_reviews, 8);
        assert!(product.in_stock());
    }

    #[test]
    fn test_to_cart_item() {
        let product: Product = serde_json::from_str(RECORD).unwrap_or_else(|e| panic!("{e}"));
        let item = product.to_cart_item(3);

        assert_eq!(item.id, Some(ProductId::new("62f1c0a1")));
        assert_eq!(item.quantity, 3);
        assert_eq!(item.count_in_stock, 20);
        assert_eq!(item.line_total(), Price::from_dollars(210));
    }
}
