//! Nyumba storefront core
//!
//! Catalog loading, cart, session and saved-items state for the storefront,
//! persisted to local storage and wired together by [`AppContext`].

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod context;
pub mod loader;
pub mod logger;
pub mod saved;
pub mod session;
pub mod storage;
pub mod view;

pub use cart::{CartChange, CartStore, InventoryViolation};
pub use catalog::{Catalog, ProductDraft};
pub use checkout::{CheckoutSummary, DeliveryOptions, OrderConfirmation};
pub use config::AppConfig;
pub use context::AppContext;
pub use loader::{LoadStatus, LoaderOptions, ProgressiveLoader};
pub use saved::SavedItemsStore;
pub use session::{AuthFailure, SessionStore};
pub use storage::{FileStorage, LocalStorage, MemoryStorage, SharedStorage, StorageError};
pub use view::Screen;
