//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError, Product, Promocode};
use crate::cache::ListCache;
use crate::config::AdminConfig;
use crate::services::{AuthService, ProductService, PromocodeService, RestaurantService};

/// Application state shared across all handlers.
///
/// Cheap to clone; everything lives behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    api: ApiClient,
    promocodes: ListCache<Promocode>,
    products: ListCache<Product>,
}

impl AppState {
    /// Build state with an HTTP API client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: AdminConfig) -> Result<Self, ApiError> {
        let api = ApiClient::http(&config.api)?;
        Ok(Self::with_client(config, api))
    }

    /// Build state around an existing client (tests use a scripted one).
    #[must_use]
    pub fn with_client(config: AdminConfig, api: ApiClient) -> Self {
        let list = config.list;
        Self {
            inner: Arc::new(AppStateInner {
                promocodes: ListCache::new(list.cache_capacity, list.cache_ttl()),
                products: ListCache::new(list.cache_capacity, list.cache_ttl()),
                config,
                api,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    #[must_use]
    pub fn promocode_cache(&self) -> &ListCache<Promocode> {
        &self.inner.promocodes
    }

    #[must_use]
    pub fn product_cache(&self) -> &ListCache<Product> {
        &self.inner.products
    }

    #[must_use]
    pub fn promocodes(&self) -> PromocodeService<'_> {
        PromocodeService::new(
            &self.inner.api,
            &self.inner.promocodes,
            self.inner.config.list.page_size,
        )
    }

    #[must_use]
    pub fn products(&self) -> ProductService<'_> {
        ProductService::new(
            &self.inner.api,
            &self.inner.products,
            self.inner.config.list.page_size,
        )
    }

    #[must_use]
    pub fn restaurants(&self) -> RestaurantService<'_> {
        RestaurantService::new(&self.inner.api)
    }

    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(&self.inner.api)
    }
}
