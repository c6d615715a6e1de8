//! Client configuration

use crate::{CatalogClient, ClientResult};

/// Default query parameter the CORS relay reads the target URL from
pub const DEFAULT_PROXY_PARAM: &str = "url";

/// Configuration for reaching the commerce API
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Store base URL (e.g., "https://shop.example.co.ke")
    pub base_url: String,

    /// CORS relay. When set, every request goes to
    /// `{proxy_url}?{proxy_param}=<url-encoded target>`
    pub proxy_url: Option<String>,

    pub proxy_param: String,

    /// HTTP Basic credentials (consumer key / secret)
    pub consumer_key: String,
    pub consumer_secret: String,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl CatalogConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            proxy_url: None,
            proxy_param: DEFAULT_PROXY_PARAM.to_string(),
            consumer_key: String::new(),
            consumer_secret: String::new(),
            timeout: 30,
        }
    }

    /// Route requests through a CORS relay
    pub fn with_proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = Some(proxy_url.into());
        self
    }

    /// Change the query parameter name the relay expects
    pub fn with_proxy_param(mut self, param: impl Into<String>) -> Self {
        self.proxy_param = param.into();
        self
    }

    pub fn with_credentials(
        mut self,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
    ) -> Self {
        self.consumer_key = consumer_key.into();
        self.consumer_secret = consumer_secret.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// The URL whose origin the browser actually talks to
    pub fn network_origin(&self) -> &str {
        self.proxy_url.as_deref().unwrap_or(&self.base_url)
    }

    /// Create a catalog client from this configuration
    pub fn build_client(&self) -> ClientResult<CatalogClient> {
        CatalogClient::new(self)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
