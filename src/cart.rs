//! # Cart Manager
//!
//! Maintains one user's cart as a local mirror of the server-held cart
//! resource and keeps it eventually consistent.
//!
//! # Architecture Note
//! The server is the authority on price and availability at add time, so no
//! purely-local optimistic mutation is ever trusted: every successful
//! mutation triggers a full [`CartManager::fetch`] to resynchronize, and a
//! failed mutation leaves the last known-good state untouched. The total is
//! always derived from the line list on read — it is never cached past a
//! resync, so the displayed total can never disagree with the displayed
//! lines.
//!
//! Overlapping quantity updates are independent absolute-set requests, not
//! deltas. That avoids lost-update races between overlapping requests, at
//! the cost that responses arriving out of send order can apply a stale
//! quantity ("last response processed wins"). See DESIGN.md for the
//! recorded fix opportunity.

use crate::api::{ApiError, CanteenApi};
use crate::model::{Cart, FoodId};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors from cart operations. Server rejections keep the user-facing
/// reason the backend supplied (e.g. "Momo is currently unavailable").
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    /// Quantity below 1 where at least 1 is required.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// The server refused to add the item.
    #[error("failed to add to cart: {0}")]
    AddFailed(String),

    /// The server refused the quantity change.
    #[error("failed to update quantity: {0}")]
    UpdateFailed(String),

    /// The server refused to remove the line.
    #[error("failed to remove item: {0}")]
    RemoveFailed(String),

    /// Network/server failure; local state was left unmodified.
    #[error("transport error: {0}")]
    Transport(String),
}

fn rejection(error: ApiError, wrap: fn(String) -> CartError) -> CartError {
    match error {
        ApiError::Status { message, .. } => wrap(message),
        other => CartError::Transport(other.to_string()),
    }
}

/// Owner of the local cart mirror. One instance per session.
pub struct CartManager {
    api: Arc<dyn CanteenApi>,
    cart: Cart,
}

impl CartManager {
    /// Starts with an empty cart; call [`fetch`](Self::fetch) on session
    /// start to pick up whatever the server already holds.
    pub fn new(api: Arc<dyn CanteenApi>) -> Self {
        Self {
            api,
            cart: Cart::empty(),
        }
    }

    /// The last known-good cart. Never reflects an unconfirmed mutation.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Derived total of the current view. See [`Cart::total`].
    pub fn total(&self) -> u64 {
        self.cart.total()
    }

    /// Retrieves the server cart, normalizes whatever shape came back, and
    /// replaces the local view. The total is recomputed locally whether or
    /// not the backend sent one. Idempotent: with no intervening mutation,
    /// two fetches yield identical carts.
    #[instrument(skip(self))]
    pub async fn fetch(&mut self) -> Result<&Cart, CartError> {
        let payload = self
            .api
            .fetch_cart()
            .await
            .map_err(|e| CartError::Transport(e.to_string()))?;
        self.cart = Cart::from_payload(payload);
        debug!(
            lines = self.cart.len(),
            total = self.cart.total(),
            "cart synchronized"
        );
        Ok(&self.cart)
    }

    /// Asks the server to add (or increment) `quantity` of an item, then
    /// resynchronizes. On failure nothing changes locally and the error
    /// carries the server's reason.
    #[instrument(skip(self))]
    pub async fn add(&mut self, food: &FoodId, quantity: u32) -> Result<(), CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity(i64::from(quantity)));
        }
        self.api
            .add_to_cart(food, quantity)
            .await
            .map_err(|e| rejection(e, CartError::AddFailed))?;
        self.fetch().await?;
        Ok(())
    }

    /// Absolute-sets the quantity of a line, then resynchronizes. A target
    /// below 1 delegates to [`remove`](Self::remove) — a zero or negative
    /// quantity line never persists.
    #[instrument(skip(self))]
    pub async fn update_quantity(&mut self, food: &FoodId, quantity: i64) -> Result<(), CartError> {
        if quantity < 1 {
            return self.remove(food).await;
        }
        let quantity =
            u32::try_from(quantity).map_err(|_| CartError::InvalidQuantity(quantity))?;
        self.api
            .set_quantity(food, quantity)
            .await
            .map_err(|e| rejection(e, CartError::UpdateFailed))?;
        self.fetch().await?;
        Ok(())
    }

    /// Deletes a line on the server, then resynchronizes.
    #[instrument(skip(self))]
    pub async fn remove(&mut self, food: &FoodId) -> Result<(), CartError> {
        self.api
            .remove_from_cart(food)
            .await
            .map_err(|e| rejection(e, CartError::RemoveFailed))?;
        self.fetch().await?;
        Ok(())
    }

    /// Local-only reset, used immediately after a successful checkout so
    /// the display doesn't go stale while the server-side cart drains.
    /// Checkout itself is responsible for the server-side clearing.
    pub fn clear(&mut self) {
        debug!(discarded_lines = self.cart.len(), "clearing local cart view");
        self.cart = Cart::empty();
    }
}
