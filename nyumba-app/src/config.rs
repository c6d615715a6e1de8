use std::path::PathBuf;
use std::time::Duration;

use nyumba_client::CatalogConfig;

use crate::checkout::DeliveryOptions;
use crate::loader::LoaderOptions;

/// Storefront configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | NYUMBA_DATA_DIR | ./nyumba-data | local storage and logs |
/// | NYUMBA_CATALOG_URL | http://localhost:8080 | commerce store base URL |
/// | NYUMBA_PROXY_URL | unset | CORS relay |
/// | NYUMBA_CONSUMER_KEY / NYUMBA_CONSUMER_SECRET | empty | API credentials |
/// | NYUMBA_TIMEOUT_SECS | 30 | request timeout |
/// | NYUMBA_INITIAL_PAGE | 20 | phase-1 page size |
/// | NYUMBA_CATALOG_CAP | 100 | products loaded in total |
/// | NYUMBA_SETTLE_MS | 1000 | delay before the background load |
/// | NYUMBA_LOG_LEVEL | info | log level |
/// | NYUMBA_LOG_JSON | false | JSON console logs |
/// | NYUMBA_APP_ORIGIN | http://localhost:5173 | origin the storefront is served from |
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub catalog: CatalogConfig,
    pub loader: LoaderOptions,
    pub delivery: DeliveryOptions,
    pub log_level: String,
    pub log_json: bool,
    pub app_origin: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut catalog = CatalogConfig::new(
            std::env::var("NYUMBA_CATALOG_URL").unwrap_or_else(|_| "http://localhost:8080".into()),
        )
        .with_credentials(
            std::env::var("NYUMBA_CONSUMER_KEY").unwrap_or_default(),
            std::env::var("NYUMBA_CONSUMER_SECRET").unwrap_or_default(),
        )
        .with_timeout(env_parse("NYUMBA_TIMEOUT_SECS", 30));

        if let Some(proxy) = std::env::var("NYUMBA_PROXY_URL")
            .ok()
            .filter(|p| !p.trim().is_empty())
        {
            catalog = catalog.with_proxy(proxy);
        }

        let loader = LoaderOptions {
            initial_page_size: env_parse("NYUMBA_INITIAL_PAGE", 20),
            catalog_cap: env_parse("NYUMBA_CATALOG_CAP", 100),
            settle_delay: Duration::from_millis(env_parse("NYUMBA_SETTLE_MS", 1000)),
            ..LoaderOptions::default()
        };

        Self {
            data_dir: std::env::var("NYUMBA_DATA_DIR")
                .unwrap_or_else(|_| "./nyumba-data".into())
                .into(),
            catalog,
            loader,
            delivery: DeliveryOptions::default(),
            log_level: std::env::var("NYUMBA_LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_parse("NYUMBA_LOG_JSON", false),
            app_origin: std::env::var("NYUMBA_APP_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
        }
    }

    /// Local storage directory
    pub fn storage_dir(&self) -> PathBuf {
        self.data_dir.join("storage")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
