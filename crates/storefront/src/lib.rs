//! ZAR storefront library.
//!
//! JSON API for browsing the catalog, managing a session cart and talking
//! to the AI shopping assistant. Exposed as a library so the router can be
//! driven in-process by the integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod carts;
pub mod catalog;
pub mod config;
pub mod error;
pub mod gemini;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;
use tower_sessions::SessionManagerLayer;
use tower_sessions_moka_store::MokaStore;

use state::AppState;

/// Build the application router.
///
/// Sentry layers are added by the binary so tests run without a client.
#[must_use]
pub fn app(state: AppState, session_layer: SessionManagerLayer<MokaStore>) -> Router {
    routes::routes()
        .layer(session_layer)
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
