//! Offline cache policy contract
//!
//! The service worker in front of the storefront decides per request how the
//! cache is used. The core never branches on this; a cached response is
//! consumed exactly like a fresh one. This module is the shared definition of
//! which requests get which policy.

use reqwest::{Method, Url};

use crate::{CatalogConfig, ClientError, ClientResult};

/// Extensions treated as static build assets
const STATIC_EXTENSIONS: &[&str] = &[
    "js", "css", "html", "png", "jpg", "jpeg", "webp", "svg", "ico", "woff", "woff2",
];

/// App-shell paths cached on install
pub const PRECACHE_PATHS: &[&str] = &["/", "/index.html", "/manifest.json"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Serve the cached copy now, refresh it from the network in the background
    StaleWhileRevalidate,
    /// Serve from cache, fall back to the network on a miss
    CacheFirst,
    /// Never cached
    NetworkOnly,
}

#[derive(Debug, Clone)]
pub struct OfflineCachePolicy {
    app_origin: Url,
    catalog_origin: Url,
}

impl OfflineCachePolicy {
    /// `app_origin` is where the storefront itself is served from
    pub fn new(app_origin: &str, catalog: &CatalogConfig) -> ClientResult<Self> {
        let parse = |s: &str| {
            Url::parse(s).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", s, e)))
        };
        Ok(Self {
            app_origin: parse(app_origin)?,
            catalog_origin: parse(catalog.network_origin())?,
        })
    }

    pub fn classify(&self, method: &Method, url: &Url) -> CachePolicy {
        if *method != Method::GET {
            return CachePolicy::NetworkOnly;
        }

        if url.origin() == self.catalog_origin.origin() {
            return CachePolicy::StaleWhileRevalidate;
        }

        if url.origin() == self.app_origin.origin() && is_static_asset(url.path()) {
            return CachePolicy::CacheFirst;
        }

        CachePolicy::NetworkOnly
    }
}

fn is_static_asset(path: &str) -> bool {
    if PRECACHE_PATHS.contains(&path) {
        return true;
    }
    path.rsplit_once('.')
        .map(|(_, ext)| STATIC_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
