//! Cart line model

use serde::{Deserialize, Serialize};

use super::product::{Product, ProductVariant};

/// Cart identity: product id + variant colour name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CartKey {
    pub product_id: i64,
    pub color_name: String,
}

impl CartKey {
    pub fn new(product_id: i64, color_name: impl Into<String>) -> Self {
        Self {
            product_id,
            color_name: color_name.into(),
        }
    }
}

impl std::fmt::Display for CartKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.product_id, self.color_name)
    }
}

/// A cart line
///
/// Holds a snapshot of the product and variant as they were when added,
/// not a live catalog reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product: Product,
    pub selected_variant: ProductVariant,
    /// 1..=selected_variant.stock
    pub quantity: u32,
}

impl CartItem {
    pub fn key(&self) -> CartKey {
        CartKey::new(self.product.id, self.selected_variant.color_name.clone())
    }

    pub fn matches(&self, product_id: i64, color_name: &str) -> bool {
        self.product.id == product_id && self.selected_variant.color_name == color_name
    }

    pub fn unit_price(&self) -> f64 {
        self.product.display_price()
    }

    pub fn line_total(&self) -> f64 {
        self.unit_price() * f64::from(self.quantity)
    }
}
