//! HTTP client for the commerce catalog API

use crate::normalize::{normalize_categories, normalize_products};
use crate::{CatalogConfig, ClientError, ClientResult};
use reqwest::{Client, Url, header};
use serde::Deserialize;
use serde_json::Value;
use shared::models::{Product, RoomCategory};

const API_PREFIX: &str = "wp-json/wc/v3";

/// Page size used for the category list; the store has far fewer rooms
const CATEGORY_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// One page of the product listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub per_page: u32,
    /// Service sort field, e.g. "date", "popularity", "price"
    pub order_by: String,
    pub order: SortOrder,
    pub offset: Option<u32>,
}

impl ProductQuery {
    pub fn new(per_page: u32) -> Self {
        Self {
            per_page,
            ..Self::default()
        }
    }

    pub fn sorted_by(mut self, order_by: impl Into<String>, order: SortOrder) -> Self {
        self.order_by = order_by.into();
        self.order = order;
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("per_page", self.per_page.to_string()),
            ("orderby", self.order_by.clone()),
            ("order", self.order.as_str().to_string()),
        ];
        if let Some(offset) = self.offset {
            params.push(("offset", offset.to_string()));
        }
        params
    }
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            per_page: 20,
            order_by: "date".to_string(),
            order: SortOrder::Desc,
            offset: None,
        }
    }
}

/// Error body returned by the service on failure
#[derive(Debug, Deserialize)]
struct ServiceError {
    message: String,
}

/// HTTP client for the product/category endpoints
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    config: CatalogConfig,
}

impl CatalogClient {
    /// Create a new catalog client from configuration
    pub fn new(config: &CatalogConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Build the request URL, wrapping it for the CORS relay when configured
    pub fn endpoint(&self, path: &str, params: &[(&str, String)]) -> ClientResult<Url> {
        let target = format!(
            "{}/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            API_PREFIX,
            path.trim_start_matches('/')
        );
        let target = Url::parse_with_params(&target, params)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", target, e)))?;

        match &self.config.proxy_url {
            Some(proxy) => {
                let mut url = Url::parse(proxy)
                    .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", proxy, e)))?;
                url.query_pairs_mut()
                    .append_pair(&self.config.proxy_param, target.as_str());
                Ok(url)
            }
            None => Ok(target),
        }
    }

    /// GET a listing endpoint and return its raw records
    ///
    /// A success body that is not a JSON array yields no records.
    async fn get_records(&self, url: Url) -> ClientResult<Vec<Value>> {
        if self.config.consumer_key.is_empty() {
            tracing::debug!(url = %url, "No consumer key configured, sending empty credentials");
        }

        let request = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, "application/json")
            .basic_auth(
                &self.config.consumer_key,
                Some(&self.config.consumer_secret),
            );

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ServiceError>(&body) {
                Ok(err) => err.message,
                Err(_) => status.to_string(),
            };
            tracing::error!(status = status.as_u16(), %message, "Catalog request failed");
            return Err(ClientError::Fetch {
                status: status.as_u16(),
                message,
            });
        }

        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Array(records)) => Ok(records),
            Ok(other) => {
                tracing::warn!(
                    url = %url,
                    kind = json_kind(&other),
                    "Catalog response is not an array, treating as empty"
                );
                Ok(Vec::new())
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Catalog response is not JSON, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    // ========== Catalog API ==========

    /// Fetch one page of products
    pub async fn fetch_products(&self, query: &ProductQuery) -> ClientResult<Vec<Product>> {
        let url = self.endpoint("products", &query.params())?;
        let records = self.get_records(url).await?;
        let normalized = normalize_products(&records);

        tracing::debug!(
            received = records.len(),
            kept = normalized.items.len(),
            dropped = normalized.dropped,
            offset = query.offset.unwrap_or(0),
            "Fetched product page"
        );

        Ok(normalized.into_items())
    }

    /// Fetch top-level, non-empty categories
    pub async fn fetch_categories(&self) -> ClientResult<Vec<RoomCategory>> {
        let params = [
            ("per_page", CATEGORY_PAGE_SIZE.to_string()),
            ("parent", "0".to_string()),
            ("hide_empty", "true".to_string()),
        ];
        let url = self.endpoint("products/categories", &params)?;
        let records = self.get_records(url).await?;
        let normalized = normalize_categories(&records);

        tracing::debug!(
            received = records.len(),
            kept = normalized.items.len(),
            dropped = normalized.dropped,
            "Fetched categories"
        );

        Ok(normalized.into_items())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
