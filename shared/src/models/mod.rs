//! Data models
//!
//! Internal storefront model. The catalog client maps external records into
//! these types; nothing loosely typed crosses that boundary.

pub mod cart;
pub mod category;
pub mod product;
pub mod user;

// Re-exports
pub use cart::*;
pub use category::*;
pub use product::*;
pub use user::*;
