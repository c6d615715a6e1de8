//! Room Category Model

use serde::{Deserialize, Serialize};

/// Reserved sub-category meaning "no sub-filter"
pub const ALL_SUBCATEGORY: &str = "All";

/// Banner shown at the top of a category page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryHero {
    pub title: String,
    pub subtitle: String,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTheme {
    pub accent: String,
    pub background: String,
}

/// Category entity
///
/// Products reference a category by `name`, there is no foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomCategory {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    pub description: String,
    pub image_url: String,
    /// Ordered, `"All"` first
    pub sub_categories: Vec<String>,
    pub hero: CategoryHero,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<CategoryTheme>,
}

impl RoomCategory {
    /// Whether `sub_category` filters anything for this category
    pub fn is_filtering(sub_category: Option<&str>) -> bool {
        matches!(sub_category, Some(s) if s != ALL_SUBCATEGORY)
    }
}
