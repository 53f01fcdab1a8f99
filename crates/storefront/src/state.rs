//! Application state shared across handlers.

use std::sync::Arc;

use crate::carts::CartRegistry;
use crate::catalog::{Catalog, RemoteCatalog};
use crate::config::StorefrontConfig;
use crate::gemini::{GeminiClient, GeminiError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog, the cart registry and the optional Gemini client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    catalog: Catalog,
    carts: CartRegistry,
    gemini: Option<GeminiClient>,
}

impl AppState {
    /// Build state from configuration, using the remote catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the Gemini client cannot be constructed.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, GeminiError> {
        let gemini = config.gemini.as_ref().map(GeminiClient::new).transpose()?;
        let catalog = Catalog::Remote(RemoteCatalog::new(&config.catalog));
        let carts = CartRegistry::new(config.cart_idle_timeout);

        Ok(Self::new(catalog, carts, gemini))
    }

    /// Assemble state from its parts.
    #[must_use]
    pub fn new(catalog: Catalog, carts: CartRegistry, gemini: Option<GeminiClient>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                catalog,
                carts,
                gemini,
            }),
        }
    }

    /// Get a reference to the catalog source.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the cart registry.
    #[must_use]
    pub fn carts(&self) -> &CartRegistry {
        &self.inner.carts
    }

    /// The Gemini client, or `None` when AI features are disabled.
    #[must_use]
    pub fn gemini(&self) -> Option<&GeminiClient> {
        self.inner.gemini.as_ref()
    }
}
