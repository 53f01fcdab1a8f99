//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                  - Health check
//!
//! # Catalog
//! GET    /api/products            - Filtered products (?category=&style=&search=)
//! GET    /api/categories          - Distinct categories
//!
//! # Cart
//! GET    /api/cart                - Cart view
//! DELETE /api/cart                - Clear cart
//! GET    /api/cart/count          - Cart count badge
//! POST   /api/cart/items          - Add item
//! PATCH  /api/cart/items          - Set quantity (<= 0 removes)
//! DELETE /api/cart/items          - Remove item
//!
//! # Assistant
//! POST   /api/ai/chat             - Chat with the fashion assistant
//! POST   /api/ai/recommendations  - Product recommendations (max 6)
//! POST   /api/ai/style-advice     - Styling tips and products (max 3)
//! ```

pub mod ai;
pub mod cart;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/count", get(cart::count))
        .route(
            "/items",
            post(cart::add).patch(cart::update).delete(cart::remove),
        )
}

/// Create the assistant routes router.
pub fn ai_routes() -> Router<AppState> {
    Router::new()
        .route("/chat", post(ai::chat))
        .route("/recommendations", post(ai::recommendations))
        .route("/style-advice", post(ai::style_advice))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/products", get(products::index))
        .route("/api/categories", get(products::categories))
        .nest("/api/cart", cart_routes())
        .nest("/api/ai", ai_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}
