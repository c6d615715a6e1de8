//! Nyumba Client - catalog ingestion for the storefront
//!
//! Fetches products and categories from the external commerce API and maps
//! its loosely typed records into the internal [`shared::models`] types.

pub mod cache_policy;
pub mod config;
pub mod error;
pub mod http;
pub mod normalize;
pub mod source;

mod raw;

pub use cache_policy::{CachePolicy, OfflineCachePolicy};
pub use config::CatalogConfig;
pub use error::{ClientError, ClientResult};
pub use http::{CatalogClient, ProductQuery, SortOrder};
pub use normalize::{MalformedRecord, Normalized};
pub use source::CatalogSource;
