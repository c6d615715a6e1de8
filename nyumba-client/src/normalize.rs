//! Normalization of commerce API records into the storefront model
//!
//! Each record is mapped on its own. A record that cannot be mapped is
//! dropped with a warning and the rest of the page is still returned.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use shared::models::{
    ALL_SUBCATEGORY, CategoryHero, Product, ProductStatus, ProductVariant, RoomCategory, Sale,
};
use thiserror::Error;

/// Cover used when a record has no usable image
pub const PLACEHOLDER_IMAGE: &str = "https://placehold.co/600x600/f5f0e8/8b7355?text=Nyumba";

/// Category name used when a product lists none
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Stock assumed for "instock" products without a tracked quantity
pub const UNTRACKED_IN_STOCK: u32 = 100;

/// Name given to products the service returns without one
pub const UNTITLED_PRODUCT: &str = "Untitled product";

const DEFAULT_COLOR_NAME: &str = "Default";
const DEFAULT_COLOR_HEX: &str = "#8B7355";
const STORE_CREATOR_ID: &str = "nyumba-store";
const STORE_CREATOR_NAME: &str = "Nyumba Home";

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag pattern"));
static WHITESPACE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Why a single record was dropped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecord {
    #[error("record is not an object")]
    NotAnObject,

    #[error("record has no integer id")]
    MissingId,

    /// Categories only; nameless products get a default name
    #[error("record {0} has no name")]
    MissingName(i64),
}

/// Result of normalizing one page
#[derive(Debug, Clone)]
pub struct Normalized<T> {
    pub items: Vec<T>,
    /// Records dropped as malformed
    pub dropped: usize,
}

impl<T> Normalized<T> {
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

// =============================================================================
// Products
// =============================================================================

/// Normalize a page of raw product records
pub fn normalize_products(records: &[Value]) -> Normalized<Product> {
    let mut items = Vec::with_capacity(records.len());
    let mut dropped = 0;

    for (index, record) in records.iter().enumerate() {
        match normalize_product(record) {
            Ok(product) => items.push(product),
            Err(e) => {
                dropped += 1;
                tracing::warn!(index, error = %e, "Dropping malformed product record");
            }
        }
    }

    Normalized { items, dropped }
}

/// Map one raw product record
pub fn normalize_product(value: &Value) -> Result<Product, MalformedRecord> {
    let raw = crate::raw::RawRecord::from_value(value).ok_or(MalformedRecord::NotAnObject)?;
    let id = raw.int("id").ok_or(MalformedRecord::MissingId)?;

    let name = raw
        .text("name")
        .map(strip_html)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| UNTITLED_PRODUCT.to_string());

    let regular = match raw.text("regular_price") {
        Some(_) => parse_price(raw.get("regular_price")),
        None => parse_price(raw.get("price")),
    };
    let sale_price = parse_price(raw.get("sale_price"));
    let on_sale = raw.bool("on_sale").unwrap_or(false) && sale_price > 0.0 && sale_price < regular;
    let sale = on_sale.then(|| Sale {
        discount: (regular - sale_price) / regular,
    });

    let mut images: Vec<String> = raw
        .records("images")
        .into_iter()
        .filter_map(|img| img.str("src").map(str::to_string))
        .collect();
    if images.is_empty() {
        images.push(PLACEHOLDER_IMAGE.to_string());
    }

    let stock = match raw.int("stock_quantity") {
        Some(qty) => u32::try_from(qty.max(0)).unwrap_or(u32::MAX),
        None if is_marked_in_stock(&raw) => UNTRACKED_IN_STOCK,
        None => 0,
    };

    let categories: Vec<&str> = raw
        .records("categories")
        .into_iter()
        .filter_map(|c| c.text("name"))
        .collect();
    let category = categories
        .first()
        .map(|c| strip_html(c))
        .unwrap_or_else(|| UNCATEGORIZED.to_string());
    let sub_category = categories
        .get(1)
        .map(|c| strip_html(c))
        .unwrap_or_else(|| ALL_SUBCATEGORY.to_string());

    let color_name = color_option(&raw).unwrap_or_else(|| DEFAULT_COLOR_NAME.to_string());
    let variant = ProductVariant {
        color: color_hex(&color_name).to_string(),
        color_name,
        images,
        stock,
    };

    let status = match raw.str("status") {
        Some("publish") => ProductStatus::Published,
        _ => ProductStatus::Pending,
    };

    Ok(Product {
        id,
        name,
        category,
        sub_category,
        price: regular,
        original_price: None,
        rating: (parse_price(raw.get("average_rating")) as f32).clamp(0.0, 5.0),
        review_count: non_negative(raw.int("rating_count")),
        variants: vec![variant],
        description: raw.str("description").map(strip_html).unwrap_or_default(),
        short_description: raw
            .str("short_description")
            .map(strip_html)
            .unwrap_or_default(),
        status,
        creator_id: STORE_CREATOR_ID.to_string(),
        creator_name: STORE_CREATOR_NAME.to_string(),
        date_added: raw
            .text("date_created")
            .map(str::to_string)
            .unwrap_or_else(shared::util::now_iso),
        sales_count: non_negative(raw.int("total_sales")),
        reviews: Vec::new(),
        sale,
        pre_order: None,
    })
}

fn is_marked_in_stock(raw: &crate::raw::RawRecord<'_>) -> bool {
    raw.str("stock_status") == Some("instock") || raw.bool("in_stock") == Some(true)
}

fn non_negative(value: Option<i64>) -> u32 {
    value
        .map(|v| u32::try_from(v.max(0)).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

/// First option of a "Color"/"Colour" attribute
fn color_option(raw: &crate::raw::RawRecord<'_>) -> Option<String> {
    raw.records("attributes")
        .into_iter()
        .filter(|attr| {
            attr.str("name")
                .is_some_and(|n| n.eq_ignore_ascii_case("color") || n.eq_ignore_ascii_case("colour"))
        })
        .find_map(|attr| {
            attr.array("options")
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .find(|o| !o.is_empty())
                .map(str::to_string)
        })
}

/// Swatch colour for the finishes the store actually sells
fn color_hex(name: &str) -> &'static str {
    match name.to_ascii_lowercase().as_str() {
        "black" => "#1C1C1C",
        "white" => "#FAFAFA",
        "grey" | "gray" => "#8E8E8E",
        "beige" | "cream" => "#F5F0E1",
        "brown" | "walnut" => "#5C4033",
        "oak" => "#C19A6B",
        "teak" => "#A0522D",
        "mahogany" => "#6F2C1F",
        "navy" => "#1F2A44",
        "green" | "olive" => "#556B2F",
        "mustard" => "#D4A017",
        "terracotta" => "#C8553D",
        _ => DEFAULT_COLOR_HEX,
    }
}

// =============================================================================
// Categories
// =============================================================================

/// Normalize a page of raw category records
///
/// The service's default "uncategorized" bucket is filtered out and is not
/// counted as dropped.
pub fn normalize_categories(records: &[Value]) -> Normalized<RoomCategory> {
    let mut items = Vec::with_capacity(records.len());
    let mut dropped = 0;

    for (index, record) in records.iter().enumerate() {
        match normalize_category(record) {
            Ok(Some(category)) => items.push(category),
            Ok(None) => {}
            Err(e) => {
                dropped += 1;
                tracing::warn!(index, error = %e, "Dropping malformed category record");
            }
        }
    }

    Normalized { items, dropped }
}

/// Map one raw category record. `Ok(None)` for the uncategorized bucket.
pub fn normalize_category(value: &Value) -> Result<Option<RoomCategory>, MalformedRecord> {
    let raw = crate::raw::RawRecord::from_value(value).ok_or(MalformedRecord::NotAnObject)?;
    let id = raw.int("id").ok_or(MalformedRecord::MissingId)?;
    let name = raw
        .text("name")
        .map(strip_html)
        .filter(|n| !n.is_empty())
        .ok_or(MalformedRecord::MissingName(id))?;
    let slug = raw
        .text("slug")
        .map(str::to_string)
        .unwrap_or_else(|| slugify(&name));

    if slug.eq_ignore_ascii_case("uncategorized") || name.eq_ignore_ascii_case(UNCATEGORIZED) {
        return Ok(None);
    }

    let image_url = raw
        .record("image")
        .and_then(|img| img.text("src"))
        .unwrap_or(PLACEHOLDER_IMAGE)
        .to_string();

    let description = raw
        .str("description")
        .map(strip_html)
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| format!("Explore our {} collection", name));

    Ok(Some(RoomCategory {
        id,
        hero: CategoryHero {
            title: name.clone(),
            subtitle: description.clone(),
            image_url: image_url.clone(),
        },
        name,
        slug,
        description,
        image_url,
        sub_categories: vec![ALL_SUBCATEGORY.to_string()],
        theme: None,
    }))
}

fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

// =============================================================================
// Field helpers
// =============================================================================

/// Parse a price field. Non-numeric or missing values become 0.
pub fn parse_price(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|p| p.is_finite()).unwrap_or(0.0)
}

/// Strip tags and decode the common entities, collapsing whitespace
pub fn strip_html(html: &str) -> String {
    let without_tags = TAG_PATTERN.replace_all(html, " ");
    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&#8211;", "-")
        .replace("&#8217;", "'")
        .replace("&#039;", "'")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    WHITESPACE_PATTERN
        .replace_all(decoded.trim(), " ")
        .into_owned()
}
