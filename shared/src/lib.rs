//! Shared types for the Nyumba storefront
//!
//! Internal data model consumed by the catalog client and the app stores,
//! the unified error system, and small utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCode};
pub use models::{
    CartItem, CartKey, CategoryHero, CategoryTheme, PreOrder, Product, ProductStatus,
    ProductVariant, Review, RoomCategory, Sale, User, UserRole,
};
