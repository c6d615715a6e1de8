//! Catalog source abstraction
//!
//! The loader only needs "give me a page of products" and "give me the
//! categories"; tests drive it with an in-memory source.

use async_trait::async_trait;
use shared::models::{Product, RoomCategory};

use crate::{CatalogClient, ClientResult, ProductQuery};

#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_products(&self, query: &ProductQuery) -> ClientResult<Vec<Product>>;

    async fn fetch_categories(&self) -> ClientResult<Vec<RoomCategory>>;
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn fetch_products(&self, query: &ProductQuery) -> ClientResult<Vec<Product>> {
        CatalogClient::fetch_products(self, query).await
    }

    async fn fetch_categories(&self) -> ClientResult<Vec<RoomCategory>> {
        CatalogClient::fetch_categories(self).await
    }
}
