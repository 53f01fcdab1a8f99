//! Session keys.

/// Session keys for storefront data.
pub mod keys {
    /// Key for the id of the shopper's cart in the cart registry.
    pub const CART_ID: &str = "cart_id";
}
