//! Application context
//!
//! Owns every long-lived piece of state the screens read: configuration,
//! the storage backend, the catalog and the three stores. Pass `&AppContext`
//! to whatever needs them.

use std::sync::Arc;

use nyumba_client::{CatalogSource, OfflineCachePolicy};
use parking_lot::{Mutex, MutexGuard};
use shared::models::Product;
use shared::{AppError, AppResult};

use crate::cart::CartStore;
use crate::catalog::{Catalog, ProductDraft};
use crate::checkout::{self, OrderConfirmation};
use crate::config::AppConfig;
use crate::loader::ProgressiveLoader;
use crate::saved::SavedItemsStore;
use crate::session::SessionStore;
use crate::storage::{FileStorage, SharedStorage};

pub struct AppContext {
    config: AppConfig,
    storage: SharedStorage,
    catalog: Catalog,
    cart: Mutex<CartStore>,
    session: Mutex<SessionStore>,
    saved: Mutex<SavedItemsStore>,
}

impl AppContext {
    /// Build the context over an existing storage backend, restoring each store
    pub fn new(config: AppConfig, storage: SharedStorage) -> Self {
        let cart = CartStore::load(Arc::clone(&storage));
        let session = SessionStore::load(Arc::clone(&storage));
        let saved = SavedItemsStore::load(Arc::clone(&storage));

        tracing::debug!(
            cart_lines = cart.items().len(),
            saved = saved.len(),
            logged_in = session.is_authenticated(),
            "Stores restored"
        );

        Self {
            config,
            storage,
            catalog: Catalog::new(),
            cart: Mutex::new(cart),
            session: Mutex::new(session),
            saved: Mutex::new(saved),
        }
    }

    /// Use file storage under the configured data directory
    pub fn open(config: AppConfig) -> AppResult<Self> {
        let storage = FileStorage::open(config.storage_dir())?;
        Ok(Self::new(config, Arc::new(storage)))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn storage(&self) -> &SharedStorage {
        &self.storage
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> MutexGuard<'_, CartStore> {
        self.cart.lock()
    }

    pub fn session(&self) -> MutexGuard<'_, SessionStore> {
        self.session.lock()
    }

    pub fn saved(&self) -> MutexGuard<'_, SavedItemsStore> {
        self.saved.lock()
    }

    /// Loader fetching from the configured commerce API
    pub fn loader(&self) -> AppResult<ProgressiveLoader> {
        let client = self.config.catalog.build_client()?;
        Ok(self.loader_with(Arc::new(client)))
    }

    pub fn loader_with(&self, source: Arc<dyn CatalogSource>) -> ProgressiveLoader {
        ProgressiveLoader::new(source, self.catalog.clone(), self.config.loader.clone())
    }

    pub fn cache_policy(&self) -> AppResult<OfflineCachePolicy> {
        Ok(OfflineCachePolicy::new(
            &self.config.app_origin,
            &self.config.catalog,
        )?)
    }

    pub fn place_order(&self) -> AppResult<OrderConfirmation> {
        let session = self.session.lock();
        let mut cart = self.cart.lock();
        checkout::place_order(&mut cart, &session, &self.config.delivery)
    }

    /// Submit a product as the logged-in user
    pub fn submit_product(&self, draft: ProductDraft) -> AppResult<Product> {
        let session = self.session.lock();
        let user = session
            .current_user()
            .ok_or_else(AppError::not_authenticated)?;
        self.catalog.submit_local(draft, user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{SUPER_ADMIN_OTP, SUPER_ADMIN_PHONE};
    use crate::storage::MemoryStorage;

    fn context() -> AppContext {
        AppContext::new(AppConfig::from_env(), Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_submit_product_needs_session() {
        let ctx = context();
        let draft: ProductDraft = serde_json::from_value(serde_json::json!({
            "name": "Jute Rug",
            "category": "Living Room",
            "price": 8000.0,
            "variants": [{"color": "#C2B280", "colorName": "Sand", "images": [], "stock": 4}]
        }))
        .unwrap();

        let err = ctx.submit_product(draft.clone()).unwrap_err();
        assert_eq!(err.code, shared::ErrorCode::NotAuthenticated);

        ctx.session()
            .login(SUPER_ADMIN_PHONE, SUPER_ADMIN_OTP)
            .unwrap();
        let product = ctx.submit_product(draft).unwrap();
        assert_eq!(ctx.catalog().get(product.id).map(|p| p.name), Some("Jute Rug".to_string()));
    }

    #[test]
    fn test_stores_share_storage() {
        let storage: SharedStorage = Arc::new(MemoryStorage::new());
        let ctx = AppContext::new(AppConfig::from_env(), Arc::clone(&storage));
        ctx.session().login("+254712345678", crate::session::DEFAULT_OTP).unwrap();

        let reopened = AppContext::new(AppConfig::from_env(), storage);
        assert!(reopened.session().is_authenticated());
    }
}
