use crate::model::{FoodId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for orders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of an order. Exactly one holds at a time.
///
/// The lifecycle is forward-only, one step at a time:
/// `pending → preparing → ready → paid`. `cancelled` is modeled and
/// displayed but no operation in this system drives it; both `paid` and
/// `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Paid,
    Cancelled,
}

impl OrderStatus {
    /// The single legal next step in the fulfillment lifecycle, or `None`
    /// for terminal states. The target of an advance is always computed
    /// from here, never caller-supplied, so the sequence cannot be skipped.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Paid),
            OrderStatus::Paid | OrderStatus::Cancelled => None,
        }
    }

    /// Terminal states have no outgoing transition.
    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Paid => "paid",
            OrderStatus::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// Reference to the ordered food: either a bare id or an embedded document,
/// depending on whether the backend populated the relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FoodRef {
    Item {
        #[serde(alias = "_id")]
        id: FoodId,
        name: String,
    },
    Id(FoodId),
}

impl FoodRef {
    pub fn id(&self) -> &FoodId {
        match self {
            FoodRef::Item { id, .. } => id,
            FoodRef::Id(id) => id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            FoodRef::Item { name, .. } => Some(name),
            FoodRef::Id(_) => None,
        }
    }
}

/// One line of an order snapshot. The price is the price at purchase time
/// and never changes afterwards, even if the catalog entry does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub food: FoodRef,
    pub price: u64,
    #[serde(alias = "qty")]
    pub quantity: u32,
}

impl OrderLine {
    pub fn line_total(&self) -> u64 {
        self.price * u64::from(self.quantity)
    }
}

/// Owner reference the backend populates on orders for staff views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCustomer {
    #[serde(alias = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    pub name: String,
}

/// An immutable snapshot purchase record.
///
/// Created at checkout from the server-held cart; mutated only by status
/// transitions thereafter. Line prices and the total are point-in-time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(alias = "_id")]
    pub id: OrderId,
    /// Populated by the backend for staff/admin listings; may be absent in
    /// a student's own view.
    #[serde(rename = "user", default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<OrderCustomer>,
    pub items: Vec<OrderLine>,
    pub total: u64,
    pub status: OrderStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}
