//! In-process registry of shopping carts.
//!
//! The session stores only a cart id; the cart itself lives here until it has
//! been idle for the configured timeout. Each cart sits behind its own mutex,
//! so all mutations of one cart go through a single writer.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::Mutex;
use zar_core::{CartEvent, CartStore};

use crate::error::add_breadcrumb;

/// Shared handle to one session's cart.
pub type SharedCart = Arc<Mutex<CartStore>>;

/// Maximum number of live carts kept in memory.
pub const MAX_CARTS: u64 = 100_000;

/// Carts keyed by the id stored in the shopper's session.
#[derive(Clone)]
pub struct CartRegistry {
    carts: Cache<String, SharedCart>,
}

impl CartRegistry {
    /// Create a registry that drops carts after `idle_timeout` without access.
    #[must_use]
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            carts: Cache::builder()
                .max_capacity(MAX_CARTS)
                .time_to_idle(idle_timeout)
                .build(),
        }
    }

    /// The cart for `cart_id`, if it is still live.
    pub async fn get(&self, cart_id: &str) -> Option<SharedCart> {
        self.carts.get(cart_id).await
    }

    /// The cart for `cart_id`, creating an empty one if needed.
    pub async fn get_or_create(&self, cart_id: &str) -> SharedCart {
        let id = cart_id.to_string();
        self.carts
            .get_with(id.clone(), async move {
                tracing::debug!(cart_id = %id, "Creating cart");
                Arc::new(Mutex::new(new_cart(id)))
            })
            .await
    }
}

/// An empty cart that logs its changes.
fn new_cart(cart_id: String) -> CartStore {
    let mut cart = CartStore::new();
    cart.subscribe(move |event, lines| {
        let (message, product_id) = match event {
            CartEvent::ItemAdded { key, .. } => ("Item added", Some(key.product_id)),
            CartEvent::QuantityUpdated { key, .. } => ("Quantity updated", Some(key.product_id)),
            CartEvent::ItemRemoved { key } => ("Item removed", Some(key.product_id)),
            CartEvent::Cleared => ("Cart cleared", None),
        };
        tracing::debug!(cart_id = %cart_id, ?event, lines = lines.len(), "{message}");

        let product_id = product_id.map(|id| id.to_string()).unwrap_or_default();
        add_breadcrumb(
            "cart",
            message,
            Some(&[("cart_id", cart_id.as_str()), ("product_id", product_id.as_str())]),
        );
    });
    cart
}
