//! Storefront API client.
//!
//! Implements [`ProductCatalog`] and [`OrderPlacement`] over HTTP:
//!
//! | Operation | Request |
//! |---|---|
//! | product by slug | `GET {base}/api/products/slug/{slug}` |
//! | current stock | `GET {base}/api/products/{id}` |
//! | place order | `POST {base}/api/orders` |

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use az_clothes_core::{OrderId, ProductId, Slug};

use super::catalog::{CatalogError, ProductCatalog};
use super::orders::{NewOrder, OrderError, OrderPlacement};
use crate::config::ApiConfig;
use crate::models::Product;

/// Errors that can occur when talking to the storefront API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Token is not a valid header value.
    #[error("Invalid API token")]
    InvalidToken,
}

/// Error body returned by the API: `{ "message": "..." }`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Body returned by `POST /api/orders`.
#[derive(Debug, Deserialize)]
struct CreatedOrder {
    #[serde(rename = "_id")]
    id: OrderId,
}

/// Storefront API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header or the HTTP client
    /// fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();

        if let Some(token) = &config.token {
            let auth_value = format!("Bearer {}", token.expose_secret());
            let mut value =
                HeaderValue::from_str(&auth_value).map_err(|_| ApiError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: with_trailing_slash(config.base_url.clone()),
        })
    }

    /// Absolute URL for an API path such as `api/orders`.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    async fn get_product(&self, path: &str) -> Result<Option<Product>, ApiError> {
        let url = self.endpoint(path)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(Some(response.json().await?))
    }
}

/// `Url::join` replaces the last path segment unless the base ends in `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

async fn error_from_response(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    ApiError::Api {
        status,
        message: parse_error_message(&text),
    }
}

/// The `message` of an API error body, or the raw body.
fn parse_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body).map_or_else(|_| body.to_owned(), |b| b.message)
}

#[async_trait]
impl ProductCatalog for ApiClient {
    #[tracing::instrument(skip_all, fields(slug = %slug))]
    async fn product(&self, slug: &Slug) -> Result<Product, CatalogError> {
        self.get_product(&format!("api/products/slug/{slug}"))
            .await?
            .ok_or_else(|| CatalogError::NotFound(slug.clone()))
    }

    #[tracing::instrument(skip_all, fields(product_id = %id))]
    async fn current_stock(&self, id: &ProductId) -> Result<u32, CatalogError> {
        let path = format!("api/products/{}", urlencoding_segment(id.as_str()));
        self.get_product(&path)
            .await?
            .map(|product| product.count_in_stock)
            .ok_or_else(|| CatalogError::UnknownProduct(id.clone()))
    }
}

#[async_trait]
impl OrderPlacement for ApiClient {
    #[tracing::instrument(skip_all, fields(total = %order.total_price))]
    async fn place_order(&self, order: &NewOrder) -> Result<OrderId, OrderError> {
        let url = self.endpoint("api/orders")?;
        let response = self
            .client
            .post(url)
            .json(order)
            .send()
            .await
            .map_err(ApiError::from)?;
        let status = response.status();

        if status.is_client_error() {
            let text = response.text().await.unwrap_or_default();
            return Err(OrderError::Rejected(parse_error_message(&text)));
        }
        if !status.is_success() {
            return Err(error_from_response(response).await.into());
        }

        let created: CreatedOrder = response.json().await.map_err(ApiError::from)?;
        tracing::info!(order_id = %created.id, "Order accepted");
        Ok(created.id)
    }
}

/// Percent-encode a single path segment.
fn urlencoding_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
