//! Progressive catalog loading
//!
//! Phase 1 fetches the first product page and the categories together and
//! is the only phase whose failure the user sees. Phase 2 runs detached
//! after a settle delay, fetches the rest of the catalog and merges it in.

use std::sync::Arc;
use std::time::Duration;

use nyumba_client::{CatalogSource, ProductQuery, SortOrder};
use shared::AppError;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::catalog::Catalog;

#[derive(Debug, Clone)]
pub struct LoaderOptions {
    pub initial_page_size: u32,
    /// Total number of products the storefront loads
    pub catalog_cap: u32,
    pub settle_delay: Duration,
    pub order_by: String,
    pub order: SortOrder,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            initial_page_size: 20,
            catalog_cap: 100,
            settle_delay: Duration::from_secs(1),
            order_by: "date".to_string(),
            order: SortOrder::Desc,
        }
    }
}

impl LoaderOptions {
    fn initial_query(&self) -> ProductQuery {
        ProductQuery::new(self.initial_page_size).sorted_by(self.order_by.clone(), self.order)
    }

    /// `None` when phase 1 already covers the cap
    fn background_query(&self) -> Option<ProductQuery> {
        let remaining = self.catalog_cap.checked_sub(self.initial_page_size)?;
        if remaining == 0 {
            return None;
        }
        Some(
            ProductQuery::new(remaining)
                .sorted_by(self.order_by.clone(), self.order)
                .with_offset(self.initial_page_size),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready { products: usize, categories: usize },
    Failed(AppError),
}

impl LoadStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadStatus::Ready { .. })
    }

    pub fn error(&self) -> Option<&AppError> {
        match self {
            LoadStatus::Failed(err) => Some(err),
            _ => None,
        }
    }
}

pub struct ProgressiveLoader {
    source: Arc<dyn CatalogSource>,
    catalog: Catalog,
    options: LoaderOptions,
    status: watch::Sender<LoadStatus>,
}

impl ProgressiveLoader {
    pub fn new(source: Arc<dyn CatalogSource>, catalog: Catalog, options: LoaderOptions) -> Self {
        let (status, _) = watch::channel(LoadStatus::Idle);
        Self {
            source,
            catalog,
            options,
            status,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadStatus> {
        self.status.subscribe()
    }

    pub fn status(&self) -> LoadStatus {
        self.status.borrow().clone()
    }

    /// Phase 1. Both requests must succeed or nothing is merged.
    pub async fn load_initial(&self) -> Result<(), AppError> {
        self.status.send_replace(LoadStatus::Loading);

        let query = self.options.initial_query();
        let fetched = tokio::try_join!(
            self.source.fetch_products(&query),
            self.source.fetch_categories(),
        );

        let (products, categories) = match fetched {
            Ok(pair) => pair,
            Err(e) => {
                let err = AppError::from(e);
                tracing::error!(error = %err, "Initial catalog load failed");
                self.status.send_replace(LoadStatus::Failed(err.clone()));
                return Err(err);
            }
        };

        let category_count = categories.len();
        self.catalog.set_categories(categories);
        let added = self.catalog.merge(products);

        tracing::info!(
            products = added,
            categories = category_count,
            "Initial catalog loaded"
        );
        self.status.send_replace(LoadStatus::Ready {
            products: self.catalog.len(),
            categories: category_count,
        });
        Ok(())
    }

    /// Phase 2, detached. Failures are logged and never reach the caller.
    pub fn spawn_background(&self) -> Option<JoinHandle<()>> {
        let Some(query) = self.options.background_query() else {
            tracing::debug!("Initial page covers the catalog cap, skipping background load");
            return None;
        };

        let source = Arc::clone(&self.source);
        let catalog = self.catalog.clone();
        let delay = self.options.settle_delay;

        Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            match source.fetch_products(&query).await {
                Ok(products) => {
                    let added = catalog.merge(products);
                    tracing::info!(added, total = catalog.len(), "Background catalog load complete");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Background catalog load failed");
                }
            }
        }))
    }

    /// Run phase 1, then schedule phase 2 on success
    pub async fn start(&self) -> Result<Option<JoinHandle<()>>, AppError> {
        self.load_initial().await?;
        Ok(self.spawn_background())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_query_covers_the_rest() {
        let query = LoaderOptions::default().background_query().unwrap();
        assert_eq!(query.per_page, 80);
        assert_eq!(query.offset, Some(20));
    }

    #[test]
    fn test_no_background_query_when_cap_reached() {
        let options = LoaderOptions {
            initial_page_size: 100,
            ..LoaderOptions::default()
        };
        assert!(options.background_query().is_none());

        let options = LoaderOptions {
            initial_page_size: 120,
            ..LoaderOptions::default()
        };
        assert!(options.background_query().is_none());
    }
}
