//! Catalog source: the authoritative product list.
//!
//! Production reads the catalog REST API through [`RemoteCatalog`]. A
//! [`Catalog::Fixed`] snapshot serves tests and local demos.

mod cache;
mod remote;

use std::collections::BTreeSet;
use std::sync::Arc;

use thiserror::Error;
use zar_core::Product;

pub use remote::RemoteCatalog;

/// Errors that can occur when loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Catalog API answered with a non-success status.
    #[error("catalog API returned status {0}")]
    Status(u16),

    /// Response body was not the expected JSON.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Where products come from.
#[derive(Clone)]
pub enum Catalog {
    Remote(RemoteCatalog),
    Fixed(Arc<[Product]>),
}

impl Catalog {
    /// A catalog that always returns `products`.
    #[must_use]
    pub fn fixed(products: Vec<Product>) -> Self {
        Self::Fixed(products.into())
    }

    /// All products, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns an error if a remote catalog cannot be loaded.
    pub async fn products(&self) -> Result<Arc<[Product]>, CatalogError> {
        match self {
            Self::Remote(remote) => remote.products().await,
            Self::Fixed(products) => Ok(Arc::clone(products)),
        }
    }

    /// Products, or an empty list when the catalog is unavailable.
    ///
    /// For callers that must keep working without a catalog.
    pub async fn products_or_empty(&self) -> Arc<[Product]> {
        match self.products().await {
            Ok(products) => products,
            Err(e) => {
                tracing::warn!(error = %e, "Catalog unavailable, continuing with no products");
                Arc::from(Vec::new())
            }
        }
    }

    /// Distinct category names.
    ///
    /// # Errors
    ///
    /// Returns an error if a remote catalog cannot be loaded.
    pub async fn categories(&self) -> Result<Arc<[String]>, CatalogError> {
        match self {
            Self::Remote(remote) => remote.categories().await,
            Self::Fixed(products) => Ok(distinct_categories(products)),
        }
    }
}

/// Sorted, de-duplicated categories of `products`.
fn distinct_categories(products: &[Product]) -> Arc<[String]> {
    products
        .iter()
        .map(|p| p.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
