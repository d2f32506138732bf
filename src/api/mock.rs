//! # Mock Backend
//!
//! An in-memory implementation of [`CanteenApi`] that plays the part of the
//! whole canteen server: one shared, authoritative [`MockBackend`] plus any
//! number of per-user [`MockApi`] handles cloned off it.
//!
//! This is the same testing strategy the crate's managers are designed
//! around: because the backend is the authority on carts and order status,
//! unit- and integration-tests exercise the real manager logic against this
//! deterministic server instead of a network. Multiple handles onto one
//! backend simulate multiple browsers/devices racing on the same orders.
//!
//! The mock enforces the server-side rules the managers rely on:
//! availability gating at add time, role gating on the order endpoints, and
//! the single-legal-next-step check on status updates.

use crate::api::{ApiError, CanteenApi};
use crate::model::{
    CartLine, CartPayload, FoodId, FoodItem, FoodRef, Order, OrderCustomer, OrderId, OrderLine,
    OrderStatus, Role, User, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

struct MockState {
    foods: Vec<FoodItem>,
    carts: HashMap<UserId, Vec<CartLine>>,
    orders: Vec<Order>,
    next_food: u32,
    next_order: u32,
    epoch: DateTime<Utc>,
    fail_next: Option<ApiError>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            foods: Vec::new(),
            carts: HashMap::new(),
            orders: Vec::new(),
            next_food: 1,
            next_order: 1,
            epoch: Utc::now(),
            fail_next: None,
        }
    }
}

fn rejected(code: u16, message: impl Into<String>) -> ApiError {
    ApiError::Status {
        code,
        message: message.into(),
    }
}

/// Shared authoritative state. Clones are cheap handles onto the same
/// server.
#[derive(Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a per-user API handle to this backend, the way a browser
    /// session is bound to one authenticated user.
    pub fn for_user(&self, user: User) -> MockApi {
        MockApi {
            backend: self.clone(),
            user,
        }
    }

    /// Adds a catalog item and returns its server-assigned id.
    pub fn seed_food(
        &self,
        name: &str,
        price: u64,
        category: &str,
        available: bool,
    ) -> FoodId {
        let mut state = self.lock();
        let id = FoodId(format!("food_{}", state.next_food));
        state.next_food += 1;
        state.foods.push(FoodItem {
            id: id.clone(),
            name: name.to_string(),
            description: format!("{name} from the canteen"),
            price,
            category: category.to_string(),
            available,
            image: None,
        });
        id
    }

    /// Flips the availability of a catalog item.
    pub fn set_available(&self, food: &FoodId, available: bool) {
        let mut state = self.lock();
        if let Some(item) = state.foods.iter_mut().find(|f| &f.id == food) {
            item.available = available;
        }
    }

    /// Changes a catalog price. Existing order snapshots must not notice.
    pub fn set_price(&self, food: &FoodId, price: u64) {
        let mut state = self.lock();
        if let Some(item) = state.foods.iter_mut().find(|f| &f.id == food) {
            item.price = price;
        }
    }

    /// Makes the next API call, from any handle, fail with `error`.
    pub fn fail_next(&self, error: ApiError) {
        self.lock().fail_next = Some(error);
    }

    /// Test helper: the authoritative status of an order.
    pub fn order_status(&self, id: &OrderId) -> Option<OrderStatus> {
        self.lock()
            .orders
            .iter()
            .find(|o| &o.id == id)
            .map(|o| o.status)
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // Mutex poisoning only happens if a test panicked mid-call.
        self.state.lock().unwrap()
    }
}

/// One user's view of the [`MockBackend`].
#[derive(Clone)]
pub struct MockApi {
    backend: MockBackend,
    user: User,
}

impl MockApi {
    fn take_failure(&self) -> Result<(), ApiError> {
        match self.backend.lock().fail_next.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn require_staff(&self, action: &str) -> Result<(), ApiError> {
        match self.user.role {
            Role::Staff | Role::Admin => Ok(()),
            Role::Student => Err(rejected(403, format!("Not authorized to {action}"))),
        }
    }
}

#[async_trait]
impl CanteenApi for MockApi {
    async fn list_food(&self) -> Result<Vec<FoodItem>, ApiError> {
        self.take_failure()?;
        Ok(self.backend.lock().foods.clone())
    }

    async fn fetch_cart(&self) -> Result<CartPayload, ApiError> {
        self.take_failure()?;
        let state = self.backend.lock();
        let items = state.carts.get(&self.user.id).cloned().unwrap_or_default();
        // No precomputed total: the client is expected to derive it.
        Ok(CartPayload { items, total: None })
    }

    async fn add_to_cart(&self, food: &FoodId, quantity: u32) -> Result<(), ApiError> {
        self.take_failure()?;
        if quantity < 1 {
            return Err(rejected(400, "Quantity must be at least 1"));
        }
        let mut state = self.backend.lock();
        let item = state
            .foods
            .iter()
            .find(|f| &f.id == food)
            .cloned()
            .ok_or_else(|| rejected(404, "Food item not found"))?;
        if !item.available {
            return Err(rejected(400, format!("{} is currently unavailable", item.name)));
        }
        let lines = state.carts.entry(self.user.id.clone()).or_default();
        match lines.iter_mut().find(|l| &l.food == food) {
            Some(line) => line.quantity += quantity,
            None => lines.push(CartLine {
                food: item.id,
                name: item.name,
                price: item.price,
                image: item.image,
                quantity,
            }),
        }
        Ok(())
    }

    async fn set_quantity(&self, food: &FoodId, quantity: u32) -> Result<(), ApiError> {
        self.take_failure()?;
        if quantity < 1 {
            return Err(rejected(400, "Quantity must be at least 1"));
        }
        let mut state = self.backend.lock();
        let lines = state
            .carts
            .get_mut(&self.user.id)
            .ok_or_else(|| rejected(404, "Item not in cart"))?;
        let line = lines
            .iter_mut()
            .find(|l| &l.food == food)
            .ok_or_else(|| rejected(404, "Item not in cart"))?;
        line.quantity = quantity;
        Ok(())
    }

    async fn remove_from_cart(&self, food: &FoodId) -> Result<(), ApiError> {
        self.take_failure()?;
        let mut state = self.backend.lock();
        let lines = state
            .carts
            .get_mut(&self.user.id)
            .ok_or_else(|| rejected(404, "Item not in cart"))?;
        let before = lines.len();
        lines.retain(|l| &l.food != food);
        if lines.len() == before {
            return Err(rejected(404, "Item not in cart"));
        }
        Ok(())
    }

    async fn create_order(&self) -> Result<Order, ApiError> {
        self.take_failure()?;
        let mut state = self.backend.lock();
        let lines = state
            .carts
            .get_mut(&self.user.id)
            .map(std::mem::take)
            .unwrap_or_default();
        if lines.is_empty() {
            return Err(rejected(400, "Cart is empty"));
        }
        let items: Vec<OrderLine> = lines
            .into_iter()
            .map(|line| OrderLine {
                food: FoodRef::Item {
                    id: line.food,
                    name: line.name,
                },
                price: line.price,
                quantity: line.quantity,
            })
            .collect();
        let total = items.iter().map(OrderLine::line_total).sum();
        let seq = state.next_order;
        state.next_order += 1;
        let order = Order {
            id: OrderId(format!("order_{seq}")),
            customer: Some(OrderCustomer {
                id: Some(self.user.id.clone()),
                name: self.user.name.clone(),
            }),
            items,
            total,
            status: OrderStatus::Pending,
            // Deterministic, strictly increasing creation times.
            created_at: state.epoch + Duration::seconds(i64::from(seq)),
        };
        state.orders.push(order.clone());
        Ok(order)
    }

    async fn my_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.take_failure()?;
        let state = self.backend.lock();
        Ok(state
            .orders
            .iter()
            .filter(|o| {
                o.customer
                    .as_ref()
                    .and_then(|c| c.id.as_ref())
                    .is_some_and(|id| id == &self.user.id)
            })
            .cloned()
            .collect())
    }

    async fn all_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.take_failure()?;
        self.require_staff("view all orders")?;
        Ok(self.backend.lock().orders.clone())
    }

    async fn set_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, ApiError> {
        self.take_failure()?;
        self.require_staff("update order status")?;
        let mut state = self.backend.lock();
        let order = state
            .orders
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or_else(|| rejected(404, "Order not found"))?;
        // Optimistic-concurrency check at single-field granularity: the
        // request is only honored if it names the one legal next step from
        // the authoritative status.
        if order.status.next() != Some(status) {
            return Err(rejected(
                409,
                format!("cannot move {} order to {}", order.status, status),
            ));
        }
        order.status = status;
        Ok(order.clone())
    }

    async fn delete_order(&self, id: &OrderId) -> Result<(), ApiError> {
        self.take_failure()?;
        if self.user.role != Role::Admin {
            return Err(rejected(403, "Not authorized to delete orders"));
        }
        let mut state = self.backend.lock();
        let before = state.orders.len();
        state.orders.retain(|o| &o.id != id);
        if state.orders.len() == before {
            return Err(rejected(404, "Order not found"));
        }
        Ok(())
    }
}
