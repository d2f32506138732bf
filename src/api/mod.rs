//! # Backend Seam
//!
//! Everything that talks to the canteen backend goes through the
//! [`CanteenApi`] trait. The production implementation ([`HttpApi`]) speaks
//! REST via `reqwest`; the in-memory implementation ([`MockApi`]) backs the
//! test-suite and the demo binary with deterministic, shared state.
//!
//! # Architecture Note
//! Why a trait instead of calling `reqwest` directly from the managers?
//! The Cart Manager and Order Workflow Engine contain the invariants worth
//! testing (derived totals, transition rules, role gating). Putting the
//! transport behind an object-safe seam means those components can be
//! exercised against a deterministic backend, while the HTTP flavor stays a
//! thin, mechanical translation layer.
//!
//! One `CanteenApi` instance is scoped to one authenticated user: identity
//! travels with the instance (a bearer token on [`HttpApi`], an explicit
//! [`User`](crate::model::User) on [`MockApi`]), never as a per-call
//! argument.

pub mod http;
pub mod mock;

pub use http::HttpApi;
pub use mock::{MockApi, MockBackend};

use crate::model::{CartPayload, FoodId, FoodItem, Order, OrderId, OrderStatus};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Errors produced at the backend seam.
///
/// The domain layers map these onto their own error types; see
/// [`crate::cart::CartError`] and [`crate::orders::OrderError`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// Network or server failure with no usable response. Timeouts land
    /// here too; they are ordinary failures, not a distinct outcome.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status. Carries the
    /// user-facing message from the body when one is present.
    #[error("request rejected ({code}): {message}")]
    Status { code: u16, message: String },

    /// The response body could not be decoded into the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
}

/// The backend REST surface consumed by the client.
///
/// Success for mutating calls means HTTP 200/201 (or the mock equivalent);
/// any other status or transport error surfaces as [`ApiError`]. Mutations
/// have no partial effect on the client side: callers resynchronize on
/// success and leave local state untouched on failure.
#[async_trait]
pub trait CanteenApi: Send + Sync {
    /// `GET /food` — the full catalog with live availability.
    async fn list_food(&self) -> Result<Vec<FoodItem>, ApiError>;

    /// `GET /cart` — the caller's server-held cart, in whatever shape the
    /// backend returns it.
    async fn fetch_cart(&self) -> Result<CartPayload, ApiError>;

    /// `POST /cart` — add `quantity` of a food item, incrementing any
    /// existing line for the same item.
    async fn add_to_cart(&self, food: &FoodId, quantity: u32) -> Result<(), ApiError>;

    /// `PUT /cart/:id` — absolute-set the quantity of an existing line.
    async fn set_quantity(&self, food: &FoodId, quantity: u32) -> Result<(), ApiError>;

    /// `DELETE /cart/:id` — remove a line.
    async fn remove_from_cart(&self, food: &FoodId) -> Result<(), ApiError>;

    /// `POST /orders` — snapshot the server cart into a new `pending`
    /// order and drain the cart.
    async fn create_order(&self) -> Result<Order, ApiError>;

    /// `GET /orders/myorders` — the caller's own orders.
    async fn my_orders(&self) -> Result<Vec<Order>, ApiError>;

    /// `GET /orders` — all orders (staff/admin).
    async fn all_orders(&self) -> Result<Vec<Order>, ApiError>;

    /// `PUT /orders/:id/status` — request a transition to `status`. The
    /// server validates against the authoritative current status and
    /// rejects anything but the single legal next step.
    async fn set_order_status(&self, id: &OrderId, status: OrderStatus)
        -> Result<Order, ApiError>;

    /// `DELETE /orders/:id` — administrative hard removal.
    async fn delete_order(&self, id: &OrderId) -> Result<(), ApiError>;
}

/// Decodes a response body that may be wrapped in a `{success, data}`
/// envelope or may be the bare payload.
pub(crate) fn decode_envelope<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    if let Value::Object(map) = &body {
        if map.contains_key("success") || map.contains_key("data") {
            if let Some(data) = map.get("data") {
                return serde_json::from_value(data.clone())
                    .map_err(|e| ApiError::Decode(e.to_string()));
            }
        }
    }
    serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Pulls a user-facing message out of an error body, falling back to the
/// transport-level reason.
pub(crate) fn error_message(body: &Value, fallback: &str) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}
