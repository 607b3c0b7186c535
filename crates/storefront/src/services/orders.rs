//! Order placement collaborator.

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use az_clothes_core::{CartItem, CartState, OrderId, PaymentMethod, Price, ShippingAddress};

use super::ApiError;

/// Errors that can occur when placing an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The order service refused the order; the message is for the shopper.
    #[error("Order rejected: {0}")]
    Rejected(String),

    /// Order book could not be written.
    #[error("Failed to write order {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Order could not be serialized.
    #[error("Failed to serialize order: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Storefront API request failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The order payload sent to the order service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub order_items: Vec<CartItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub items_price: Price,
    pub shipping_price: Price,
    pub tax_price: Price,
    pub total_price: Price,
}

impl NewOrder {
    /// Build the order for everything in `state`, priced by its summary.
    #[must_use]
    pub fn from_cart(state: &CartState) -> Self {
        let summary = state.summary();
        Self {
            order_items: state.cart_items.clone(),
            shipping_address: state.shipping_address.clone(),
            payment_method: state.payment_method.clone(),
            items_price: summary.items_price,
            shipping_price: summary.shipping_price,
            tax_price: summary.tax_price,
            total_price: summary.total_price,
        }
    }
}

/// Places orders on behalf of the checkout.
#[async_trait]
pub trait OrderPlacement: Send + Sync {
    /// Submit `order` and return the id the service assigned to it.
    async fn place_order(&self, order: &NewOrder) -> Result<OrderId, OrderError>;
}

/// An order as written to the local order book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredOrder {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(flatten)]
    pub order: NewOrder,
    pub placed_at: DateTime<Utc>,
}

/// Writes each order to `<dir>/<uuid>.json`.
#[derive(Debug, Clone)]
pub struct FileOrderBook {
    dir: PathBuf,
}

impl FileOrderBook {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn order_path(&self, id: &OrderId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// Read back a placed order.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Io` if the order file cannot be read and
    /// `OrderError::Serialize` if it is not an order.
    pub async fn order(&self, id: &OrderId) -> Result<StoredOrder, OrderError> {
        let path = self.order_path(id);
        let raw = tokio::fs::read(&path)
            .await
            .map_err(|source| OrderError::Io { path, source })?;
        Ok(serde_json::from_slice(&raw)?)
    }
}

#[async_trait]
impl OrderPlacement for FileOrderBook {
    async fn place_order(&self, order: &NewOrder) -> Result<OrderId, OrderError> {
        let stored = StoredOrder {
            id: OrderId::new(Uuid::new_v4().to_string()),
            order: order.clone(),
            placed_at: Utc::now(),
        };
        let json = serde_json::to_vec_pretty(&stored)?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| OrderError::Io {
                path: self.dir.clone(),
                source,
            })?;

        let path = self.order_path(&stored.id);
        tokio::fs::write(&path, json)
            .await
            .map_err(|source| OrderError::Io { path, source })?;

        tracing::info!(order_id = %stored.id, total = %order.total_price, "Order written");
        Ok(stored.id)
    }
}

#[derive(Debug, Default)]
struct OrderBookInner {
    orders: Vec<(OrderId, NewOrder)>,
    failure: Option<String>,
}

/// Keeps placed orders in memory. Can be told to reject orders.
#[derive(Debug, Default)]
pub struct InMemoryOrderBook {
    inner: Mutex<OrderBookInner>,
}

impl InMemoryOrderBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every following order with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.failure = Some(message.into());
        }
    }

    /// Accept orders again.
    pub fn recover(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.failure = None;
        }
    }

    /// Orders placed so far, oldest first.
    #[must_use]
    pub fn orders(&self) -> Vec<(OrderId, NewOrder)> {
        self.inner
            .lock()
            .map(|inner| inner.orders.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl OrderPlacement for InMemoryOrderBook {
    async fn place_order(&self, order: &NewOrder) -> Result<OrderId, OrderError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| OrderError::Rejected("Order book unavailable".to_owned()))?;

        if let Some(message) = &inner.failure {
            return Err(OrderError::Rejected(message.clone()));
        }

        let id = OrderId::new(format!("order-{}", inner.orders.len() + 1));
        inner.orders.push((id.clone(), order.clone()));
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use az_clothes_core::{CartAction, Slug, transition};

    use super::*;

    fn checkout_cart() -> CartState {
        let shirt = CartItem {
            id: None,
            slug: Slug::parse("free-shirt").unwrap_or_else(|e| panic!("{e}")),
            name: "Free Shirt".to_owned(),
            image: "/images/shirt1.jpg".to_owned(),
            price: Price::from_dollars(90),
            quantity: 2,
            count_in_stock: 20,
        };
        let state = transition(CartState::default(), CartAction::AddItem(shirt));
        let state = transition(
            state,
            CartAction::SaveShippingAddress(ShippingAddress {
                full_name: "Jane Doe".to_owned(),
                address: "1 Main St".to_owned(),
                city: "Springfield".to_owned(),
                postal_code: "12345".to_owned(),
                country: "USA".to_owned(),
            }),
        );
        transition(state, CartAction::SavePaymentMethod(PaymentMethod::PAYPAL.into()))
    }

    #[test]
    fn test_new_order_from_cart() {
        let order = NewOrder::from_cart(&checkout_cart());

        assert_eq!(order.order_items.len(), 1);
        assert_eq!(order.items_price, Price::from_dollars(180));
        assert_eq!(order.shipping_price, Price::from_dollars(15));
        assert_eq!(order.tax_price, Price::from_dollars(27));
        assert_eq!(order.total_price, Price::from_dollars(222));
        assert_eq!(order.payment_method.as_str(), "PayPal");
    }

    #[test]
    fn test_new_order_wire_format() {
        let json = serde_json::to_value(NewOrder::from_cart(&checkout_cart()))
            .unwrap_or_else(|e| panic!("{e}"));

        assert!(json.get("orderItems").is_some());
        assert!(json.get("shippingAddress").is_some());
        assert_eq!(json["paymentMethod"], "PayPal");
        assert!(json.get("itemsPrice").is_some());
        assert!(json.get("totalPrice").is_some());
        assert_eq!(json["orderItems"][0]["countInStock"], 20);
    }

    #[tokio::test]
    async fn test_file_order_book() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        let book = FileOrderBook::new(dir.path().join("orders"));
        let order = NewOrder::from_cart(&checkout_cart());

        let id = book
            .place_order(&order)
            .await
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(dir.path().join("orders").join(format!("{id}.json")).exists());

        let stored = book.order(&id).await.unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(stored.id, id);
        assert_eq!(stored.order, order);
    }

    #[tokio::test]
    async fn test_file_order_book_assigns_unique_ids() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        let book = FileOrderBook::new(dir.path());
        let order = NewOrder::from_cart(&checkout_cart());

        let first = book.place_order(&order).await.unwrap_or_else(|e| panic!("{e}"));
        let second = book.place_order(&order).await.unwrap_or_else(|e| panic!("{e}"));
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_in_memory_order_book_failure() {
        let book = InMemoryOrderBook::new();
        let order = NewOrder::from_cart(&checkout_cart());

        book.fail_with("Payment declined");
        let result = book.place_order(&order).await;
        assert!(matches!(result, Err(OrderError::Rejected(ref m)) if m == "Payment declined"));
        assert!(book.orders().is_empty());

        book.recover();
        let id = book.place_order(&order).await.unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(id.as_str(), "order-1");
        assert_eq!(book.orders().len(), 1);
    }
}
