//! Integration tests for the ZAR storefront.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`
//! against a fixed catalog and with AI disabled, so no network access or
//! running server is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p zar-integration-tests
//! ```

use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;
use tower_sessions::SessionManagerLayer;
use zar_core::{Product, ProductId, Style};
use zar_storefront::carts::CartRegistry;
use zar_storefront::catalog::Catalog;
use zar_storefront::middleware::session_store;
use zar_storefront::state::AppState;

/// Upper bound on response bodies read by the tests.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// A small catalog covering every style and a few categories.
#[must_use]
pub fn sample_products() -> Vec<Product> {
    let product = |id, name: &str, category: &str, style, cents, description: &str| Product {
        id: ProductId::new(id),
        name: name.to_string(),
        category: category.to_string(),
        style,
        price: Decimal::new(cents, 2),
        description: description.to_string(),
        image: format!("https://cdn.zar.example/products/{id}.jpg"),
    };

    vec![
        product(1, "Linen Shirt", "Tops", Style::Casual, 4500, "Breathable summer linen"),
        product(2, "Wool Blazer", "Outerwear", Style::Professional, 18_000, "Tailored fit"),
        product(3, "Leather Jacket", "Outerwear", Style::Edgy, 25_000, "Vintage wash"),
        product(4, "Wrap Dress", "Dresses", Style::Feminine, 8900, "Floral print"),
        product(5, "Track Pants", "Bottoms", Style::Sporty, 5500, "Stretch fabric"),
        product(6, "Denim Jeans", "Bottoms", Style::Casual, 7000, "Relaxed fit in blue"),
    ]
}

/// An in-process storefront with a cookie jar of one session.
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
}

impl TestApp {
    /// Storefront over [`sample_products`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(Catalog::fixed(sample_products()))
    }

    /// Storefront over the given catalog, AI disabled.
    #[must_use]
    pub fn with_catalog(catalog: Catalog) -> Self {
        let state = AppState::new(catalog, CartRegistry::new(Duration::from_secs(3600)), None);
        let session_layer = SessionManagerLayer::new(session_store()).with_secure(false);

        Self {
            router: zar_storefront::app(state, session_layer),
            cookie: None,
        }
    }

    /// Forget the session cookie, as a new visitor.
    pub fn clear_cookies(&mut self) {
        self.cookie = None;
    }

    /// Send a request and return the status and the body parsed as JSON.
    ///
    /// Bodies that are not JSON come back as a JSON string.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn send(&mut self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => request.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
        {
            self.cookie = Some(set_cookie.to_string());
        }

        let status = response.status();
        let bytes = to_bytes(response.into_body(), MAX_BODY_BYTES)
            .await
            .expect("Failed to read body");
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        (status, body)
    }

    /// `GET` a path.
    pub async fn get(&mut self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    /// `POST` a JSON body.
    pub async fn post(&mut self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Product ids from a JSON array of products.
#[must_use]
pub fn ids(products: &Value) -> Vec<i64> {
    products
        .as_array()
        .map(|items| items.iter().filter_map(|p| p["id"].as_i64()).collect())
        .unwrap_or_default()
}
