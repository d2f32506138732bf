//! # Catalog Store
//!
//! Read-side view of the purchasable food items and their live
//! availability. Consumed by the cart and order components for display
//! enrichment only — it owns no cart/order correctness.

use crate::api::{ApiError, CanteenApi};
use crate::model::{FoodId, FoodItem};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Menu-side filtering: the three toggles of the menu screen.
#[derive(Debug, Clone)]
pub struct MenuFilter {
    /// Case-insensitive match over name and description.
    pub search: Option<String>,
    /// Keep only items in exactly this category.
    pub category: Option<String>,
    /// When false, hide items whose availability flag is off.
    pub include_unavailable: bool,
}

impl Default for MenuFilter {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            include_unavailable: true,
        }
    }
}

impl MenuFilter {
    pub fn matches(&self, item: &FoodItem) -> bool {
        if !self.include_unavailable && !item.available {
            return false;
        }
        if let Some(category) = &self.category {
            if &item.category != category {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !item.name.to_lowercase().contains(&needle)
                && !item.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

/// Locally-held copy of the catalog, refreshed on demand.
pub struct CatalogStore {
    api: Arc<dyn CanteenApi>,
    foods: Vec<FoodItem>,
}

impl CatalogStore {
    pub fn new(api: Arc<dyn CanteenApi>) -> Self {
        Self {
            api,
            foods: Vec::new(),
        }
    }

    /// Re-fetches the catalog. On failure the previous items are kept, so
    /// callers can degrade to the last-known view.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        self.foods = self.api.list_food().await?;
        debug!(items = self.foods.len(), "catalog refreshed");
        Ok(())
    }

    pub fn items(&self) -> &[FoodItem] {
        &self.foods
    }

    pub fn get(&self, id: &FoodId) -> Option<&FoodItem> {
        self.foods.iter().find(|f| &f.id == id)
    }

    /// Unique categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for item in &self.foods {
            if !categories.contains(&item.category.as_str()) {
                categories.push(&item.category);
            }
        }
        categories
    }

    pub fn filtered(&self, filter: &MenuFilter) -> Vec<&FoodItem> {
        self.foods.iter().filter(|f| filter.matches(f)).collect()
    }
}
