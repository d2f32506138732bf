use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for catalog food items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FoodId(pub String);

impl From<&str> for FoodId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for FoodId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A purchasable item in the canteen catalog.
///
/// Prices are non-negative integer currency units. The `available` flag is
/// the sole gate on orderability; there is no quantity-tracked stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    #[serde(alias = "_id")]
    pub id: FoodId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: u64,
    pub category: String,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

// Items missing the flag are treated as orderable; the server still has the
// final say at add time.
fn default_available() -> bool {
    true
}
