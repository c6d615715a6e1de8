//! Product Model

use serde::{Deserialize, Serialize};

/// Publication state of a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Published,
    /// Submitted by staff, awaiting review
    Pending,
}

/// A purchasable colour configuration of a product
///
/// `color_name` doubles as the variant identity: there is no separate variant id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// Hex colour, e.g. "#8B7355"
    pub color: String,
    pub color_name: String,
    /// First image is the cover
    pub images: Vec<String>,
    pub stock: u32,
}

impl ProductVariant {
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub author: String,
    pub rating: f32,
    pub comment: String,
    pub date: String,
}

/// Active sale. `discount` is a fraction in [0, 1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub discount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreOrder {
    pub discount: f64,
    pub arrival_days: u32,
}

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub sub_category: String,
    /// Base price in KES
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    /// 0 - 5
    pub rating: f32,
    pub review_count: u32,
    /// Never empty for a catalog entry
    pub variants: Vec<ProductVariant>,
    /// Plain text, HTML already stripped
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    pub status: ProductStatus,
    pub creator_id: String,
    pub creator_name: String,
    /// ISO-8601
    pub date_added: String,
    pub sales_count: u32,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale: Option<Sale>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_order: Option<PreOrder>,
}

impl Product {
    /// Discount fraction used for display and cart totals.
    ///
    /// A sale always wins over a pre-order discount when both are present.
    pub fn active_discount(&self) -> Option<f64> {
        self.sale
            .map(|s| s.discount)
            .or_else(|| self.pre_order.map(|p| p.discount))
            .filter(|d| *d > 0.0 && *d < 1.0)
    }

    /// Price after the active discount
    pub fn display_price(&self) -> f64 {
        match self.active_discount() {
            Some(discount) => self.price * (1.0 - discount),
            None => self.price,
        }
    }

    pub fn variant(&self, color_name: &str) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| v.color_name == color_name)
    }

    pub fn default_variant(&self) -> Option<&ProductVariant> {
        self.variants.first()
    }

    pub fn cover_image(&self) -> Option<&str> {
        self.variants.first().and_then(ProductVariant::cover_image)
    }

    pub fn total_stock(&self) -> u32 {
        self.variants.iter().map(|v| v.stock).sum()
    }

    pub fn is_published(&self) -> bool {
        self.status == ProductStatus::Published
    }
}
