//! # API State
//!
//! The backend client plus the query cache in front of it.
//!
//! ```text
//!  commands ──► ApiState::products() ──► QueryCache["products"] ──► GET /products
//!                                              │
//!  mutation ──► client().create_product() ──► invalidate("products")
//! ```
//!
//! Reads go through the cache; writes go straight to the client and then
//! invalidate the keys they affect.

use rueda_api::{keys, ApiConfig, ApiResult, HttpClient, QueryCache};
use rueda_core::{Category, Client, Credit, Product, Sale, SaleItem};

#[derive(Debug, Clone)]
pub struct ApiState {
    client: HttpClient,
    cache: QueryCache,
}

impl ApiState {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        Ok(ApiState {
            client: HttpClient::new(config)?,
            cache: QueryCache::new(config.refresh_interval()),
        })
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Drops every cached query under each prefix.
    pub fn invalidate(&self, prefixes: &[&str]) {
        for prefix in prefixes {
            self.cache.invalidate(prefix);
        }
    }

    // =========================================================================
    // Cached Reads
    // =========================================================================

    pub async fn products(&self) -> ApiResult<Vec<Product>> {
        self.cache
            .fetch(keys::PRODUCTS, || self.client.list_products())
            .await
    }

    pub async fn sales(&self) -> ApiResult<Vec<Sale>> {
        self.cache.fetch(keys::SALES, || self.client.list_sales()).await
    }

    pub async fn sale_items(&self) -> ApiResult<Vec<SaleItem>> {
        self.cache
            .fetch(keys::SALE_ITEMS, || self.client.list_sale_items())
            .await
    }

    pub async fn clients(&self) -> ApiResult<Vec<Client>> {
        self.cache
            .fetch(keys::CLIENTS, || self.client.list_clients())
            .await
    }

    pub async fn categories(&self) -> ApiResult<Vec<Category>> {
        self.cache
            .fetch(keys::CATEGORIES, || self.client.list_categories())
            .await
    }

    pub async fn credits(&self, client_id: &str) -> ApiResult<Vec<Credit>> {
        self.cache
            .fetch(&keys::credits(client_id), || self.client.list_credits(client_id))
            .await
    }
}
