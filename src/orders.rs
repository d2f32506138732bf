//! # Order Workflow Engine
//!
//! Drives and observes the order lifecycle state machine, gated by role,
//! with eventually-consistent multi-viewer visibility.
//!
//! The lifecycle is forward-only, one step at a time
//! (`pending → preparing → ready → paid`; see
//! [`OrderStatus::next`](crate::model::OrderStatus::next)). The target of
//! an advance is always computed from the caller's *expected* current
//! status, never supplied arbitrarily, so an operator cannot corrupt the
//! sequence; and because the server re-validates against the authoritative
//! status, a stale expectation — a double-click, or another staff member
//! winning the race — fails cleanly with
//! [`OrderError::InvalidTransition`] instead of double-applying.
//!
//! Listings are read projections that may be briefly stale between
//! refreshes (see [`crate::refresh`]); they are never a basis for blind
//! writes.

use crate::api::{ApiError, CanteenApi};
use crate::model::{Cart, Order, OrderId, OrderStatus};
use crate::session::{Permissions, Session};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Errors from order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// Checkout requires a non-empty cart.
    #[error("cannot checkout an empty cart")]
    EmptyCart,

    /// The server rejected the request as malformed.
    #[error("order validation error: {0}")]
    Validation(String),

    /// The caller's role lacks rights for the operation. No partial effect.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Status precondition mismatch: stale view, double-click race, or an
    /// attempt to advance a terminal order. Recoverable — re-fetch and
    /// retry the correct next transition.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    #[error("order not found: {0}")]
    NotFound(String),

    /// Network/server failure; local state was left unmodified.
    #[error("transport error: {0}")]
    Transport(String),
}

fn map_api(error: ApiError) -> OrderError {
    match error {
        ApiError::Status {
            code: 401 | 403,
            message,
        } => OrderError::PermissionDenied(message),
        ApiError::Status { code: 404, message } => OrderError::NotFound(message),
        ApiError::Status { code: 409, message } => OrderError::InvalidTransition(message),
        ApiError::Status { message, .. } => OrderError::Validation(message),
        other => OrderError::Transport(other.to_string()),
    }
}

/// A role-scoped, status-filtered, optionally text-searched order view.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Keep only orders in exactly this status.
    pub status: Option<OrderStatus>,
    /// Exclude terminal orders — the staff "active queue" convention.
    pub active_only: bool,
    /// Case-insensitive match on order id or customer name.
    pub search: Option<String>,
}

impl OrderFilter {
    /// The full-history view.
    pub fn all() -> Self {
        Self::default()
    }

    /// The staff dashboard view: everything still in flight.
    pub fn active_queue() -> Self {
        Self {
            active_only: true,
            ..Self::default()
        }
    }

    fn matches(&self, order: &Order) -> bool {
        if self.active_only && order.status.is_terminal() {
            return false;
        }
        if let Some(status) = self.status {
            if order.status != status {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let id_hit = order.id.0.to_lowercase().contains(&needle);
            let name_hit = order
                .customer
                .as_ref()
                .is_some_and(|c| c.name.to_lowercase().contains(&needle));
            if !id_hit && !name_hit {
                return false;
            }
        }
        true
    }
}

/// The client-side engine for order creation and lifecycle transitions.
///
/// Cheap to clone (shared API handle plus session) so the polling task in
/// [`crate::refresh`] can hold its own copy.
#[derive(Clone)]
pub struct OrderWorkflow {
    api: Arc<dyn CanteenApi>,
    session: Session,
}

impl OrderWorkflow {
    pub fn new(api: Arc<dyn CanteenApi>, session: Session) -> Self {
        Self { api, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The gated operation set for the session role, for any presentation
    /// layer to consume directly.
    pub fn permissions(&self) -> Permissions {
        self.session.permissions()
    }

    /// Creates a `pending` order as an immutable snapshot of the caller's
    /// server-held cart. Precondition: the local cart view is non-empty
    /// (the server re-checks its own copy). The caller should
    /// [`clear`](crate::cart::CartManager::clear) the local cart on
    /// success; the server drains its side during creation.
    #[instrument(skip(self, cart))]
    pub async fn checkout(&self, cart: &Cart) -> Result<Order, OrderError> {
        if cart.is_empty() {
            return Err(OrderError::EmptyCart);
        }
        if !self.permissions().place_orders {
            return Err(OrderError::PermissionDenied(format!(
                "{} role may not place orders",
                self.session.role()
            )));
        }
        let order = self.api.create_order().await.map_err(map_api)?;
        info!(order = %order.id, total = order.total, "order placed");
        Ok(order)
    }

    /// Advances an order one step, given the status the caller believes it
    /// currently has. The target is `expected.next()` — callers never name
    /// the target directly. Fails with [`OrderError::InvalidTransition`]
    /// when `expected` is terminal or no longer matches the authoritative
    /// status, and with [`OrderError::PermissionDenied`] for non-staff
    /// callers regardless of status.
    #[instrument(skip(self))]
    pub async fn advance(&self, id: &OrderId, expected: OrderStatus) -> Result<Order, OrderError> {
        if !self.permissions().advance_orders {
            return Err(OrderError::PermissionDenied(format!(
                "{} role may not advance orders",
                self.session.role()
            )));
        }
        let target = expected.next().ok_or_else(|| {
            OrderError::InvalidTransition(format!("order is already {expected}"))
        })?;
        debug!(%expected, %target, "requesting transition");
        let order = self
            .api
            .set_order_status(id, target)
            .await
            .map_err(map_api)?;
        info!(order = %order.id, status = %order.status, "order advanced");
        Ok(order)
    }

    /// Lists orders for the session role: students see only their own,
    /// staff/admin see all. Filtered per `filter`, sorted
    /// most-recently-created first.
    #[instrument(skip(self, filter))]
    pub async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, OrderError> {
        let mut orders = if self.permissions().view_all_orders {
            self.api.all_orders().await
        } else {
            self.api.my_orders().await
        }
        .map_err(map_api)?;
        orders.retain(|o| filter.matches(o));
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!(count = orders.len(), "order view assembled");
        Ok(orders)
    }

    /// Administrative hard removal. Irreversible; admin only.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &OrderId) -> Result<(), OrderError> {
        if !self.permissions().delete_orders {
            return Err(OrderError::PermissionDenied(format!(
                "{} role may not delete orders",
                self.session.role()
            )));
        }
        self.api.delete_order(id).await.map_err(map_api)?;
        info!(order = %id, "order deleted");
        Ok(())
    }
}
