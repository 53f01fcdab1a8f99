//! HTTP client for the catalog API.
//!
//! Responses are cached with `moka` for the configured TTL.

use std::sync::Arc;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use zar_core::Product;

use crate::config::CatalogConfig;

use super::CatalogError;
use super::cache::{CacheKey, CacheValue};

/// Client for the catalog REST API.
#[derive(Clone)]
pub struct RemoteCatalog {
    inner: Arc<RemoteCatalogInner>,
}

struct RemoteCatalogInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl RemoteCatalog {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            inner: Arc::new(RemoteCatalogInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                cache,
            }),
        }
    }

    /// All products, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog API cannot be reached or answers badly.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Arc<[Product]>, CatalogError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: Arc<[Product]> = self.get_json::<Vec<Product>>("products").await?.into();
        debug!(count = products.len(), "Fetched products");

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(Arc::clone(&products)))
            .await;
        Ok(products)
    }

    /// Distinct category names.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog API cannot be reached or answers badly.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Arc<[String]>, CatalogError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Arc<[String]> = self.get_json::<Vec<String>>("categories").await?.into();

        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(Arc::clone(&categories)),
            )
            .await;
        Ok(categories)
    }

    async fn get_json<T: DeserializeOwned>(&self, resource: &str) -> Result<T, CatalogError> {
        let url = format!("{}/api/{resource}", self.inner.base_url);
        let response = self.inner.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| CatalogError::Parse(e.to_string()))
    }
}
