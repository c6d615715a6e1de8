//! In-memory catalog
//!
//! The loader is the only bulk writer. Merges are append-only and
//! first-write-wins by id, so a reader never sees the catalog shrink or an
//! entry change under it.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shared::models::{
    ALL_SUBCATEGORY, PreOrder, Product, ProductStatus, ProductVariant, RoomCategory, User,
};
use shared::{AppError, AppResult};

#[derive(Debug, Default)]
struct Inner {
    products: Vec<Product>,
    /// product id -> position in `products`
    index: HashMap<i64, usize>,
    categories: Vec<RoomCategory>,
}

/// Shared catalog handle; clones point at the same data
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    inner: Arc<RwLock<Inner>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append products whose id is not yet present. Returns how many were added.
    pub fn merge(&self, products: Vec<Product>) -> usize {
        let mut inner = self.inner.write();
        let mut added = 0;
        for product in products {
            if inner.index.contains_key(&product.id) {
                continue;
            }
            let position = inner.products.len();
            inner.index.insert(product.id, position);
            inner.products.push(product);
            added += 1;
        }
        added
    }

    pub fn set_categories(&self, categories: Vec<RoomCategory>) {
        self.inner.write().categories = categories;
    }

    /// Snapshot of all products in insertion order
    pub fn products(&self) -> Vec<Product> {
        self.inner.read().products.clone()
    }

    pub fn categories(&self) -> Vec<RoomCategory> {
        self.inner.read().categories.clone()
    }

    pub fn get(&self, id: i64) -> Option<Product> {
        let inner = self.inner.read();
        inner.index.get(&id).map(|&i| inner.products[i].clone())
    }

    /// Like [`Catalog::get`], failing with `ProductNotFound`
    pub fn require(&self, id: i64) -> AppResult<Product> {
        self.get(id).ok_or_else(|| AppError::product_not_found(id))
    }

    pub fn len(&self) -> usize {
        self.inner.read().products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().products.is_empty()
    }

    pub fn category(&self, name: &str) -> Option<RoomCategory> {
        self.inner
            .read()
            .categories
            .iter()
            .find(|c| c.name == name)
            .cloned()
    }

    /// Products in a category, optionally narrowed to a sub-category.
    /// `None` and `"All"` both mean no sub-filter.
    pub fn in_category(&self, name: &str, sub_category: Option<&str>) -> Vec<Product> {
        let filter_sub = RoomCategory::is_filtering(sub_category);
        self.inner
            .read()
            .products
            .iter()
            .filter(|p| p.category == name)
            .filter(|p| !filter_sub || Some(p.sub_category.as_str()) == sub_category)
            .cloned()
            .collect()
    }

    /// Case-insensitive match on product name or category
    pub fn search(&self, text: &str) -> Vec<Product> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.inner
            .read()
            .products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.category.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    /// Add a product submitted from the admin screen.
    ///
    /// The entry lives only in this catalog with status pending; nothing is
    /// sent to the commerce service.
    pub fn submit_local(&self, draft: ProductDraft, creator: &User) -> AppResult<Product> {
        if !creator.role.can_manage_catalog() {
            return Err(AppError::permission_denied(format!(
                "{} may not add products",
                creator.role
            )));
        }
        draft.validate()?;

        let product = draft.into_product(creator);
        tracing::info!(
            product_id = product.id,
            name = %product.name,
            creator = %creator.phone,
            "Product submitted for review"
        );
        self.merge(vec![product.clone()]);
        Ok(product)
    }
}

/// Pick a variant by colour name, or the first variant when none is given
pub fn select_variant<'a>(
    product: &'a Product,
    color_name: Option<&str>,
) -> AppResult<&'a ProductVariant> {
    let variant = match color_name {
        Some(name) => product.variant(name),
        None => product.default_variant(),
    };
    variant.ok_or_else(|| {
        AppError::variant_not_found(&product.name, color_name.unwrap_or("default"))
    })
}

/// Form payload of the add-product screen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub sub_category: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    pub variants: Vec<ProductVariant>,
    #[serde(default)]
    pub pre_order: Option<PreOrder>,
}

impl ProductDraft {
    fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Product name is required"));
        }
        if self.category.trim().is_empty() {
            return Err(AppError::validation("Category is required"));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(AppError::validation("Price must be greater than zero")
                .with_detail("price", self.price));
        }
        if self.variants.is_empty() {
            return Err(AppError::validation("At least one variant is required"));
        }
        if let Some(v) = self.variants.iter().find(|v| v.color_name.trim().is_empty()) {
            return Err(AppError::validation("Every variant needs a colour name")
                .with_detail("color", v.color.clone()));
        }
        if let Some(pre_order) = &self.pre_order
            && !(0.0..1.0).contains(&pre_order.discount)
        {
            return Err(AppError::validation("Pre-order discount must be in [0, 1)"));
        }
        Ok(())
    }

    fn into_product(self, creator: &User) -> Product {
        Product {
            id: shared::util::snowflake_id(),
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            sub_category: self
                .sub_category
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| ALL_SUBCATEGORY.to_string()),
            price: self.price,
            original_price: None,
            rating: 0.0,
            review_count: 0,
            variants: self.variants,
            description: self.description,
            short_description: String::new(),
            status: ProductStatus::Pending,
            creator_id: creator.phone.clone(),
            creator_name: creator.name.clone(),
            date_added: shared::util::now_iso(),
            sales_count: 0,
            reviews: Vec::new(),
            sale: None,
            pre_order: self.pre_order,
        }
    }
}
