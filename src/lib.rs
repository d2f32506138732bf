//! # Canteen Client
//!
//! Client-side core for a canteen ordering system: browse a food catalog,
//! maintain a per-user cart, and track orders through a multi-party
//! fulfillment workflow (customer places → staff prepares → staff marks
//! ready → payment settles).
//!
//! The two stateful components carry the interesting invariants:
//!
//! - **[`cart::CartManager`]** — a local, optimistically-rendered mirror of
//!   a server-held cart. Every successful mutation resynchronizes fully;
//!   every failure leaves local state untouched; the total is always
//!   derived from the lines, never cached.
//! - **[`orders::OrderWorkflow`]** — the order lifecycle state machine
//!   (`pending → preparing → ready → paid`, with `cancelled` terminal),
//!   role-gated, with the single legal next step computed from the
//!   caller's expected status and re-validated by the server so concurrent
//!   staff can never double-apply a transition.
//!
//! Around them sit the supporting cast: the [`catalog::CatalogStore`]
//! (display enrichment only), the [`session::Session`] with its explicit
//! [`session::Permissions`] projection, and the [`refresh`] module's
//! polling policy that bounds staleness without push infrastructure.
//!
//! ## The backend seam
//!
//! Everything server-shaped goes through the [`api::CanteenApi`] trait.
//! [`api::HttpApi`] is the production REST implementation (tolerant of the
//! backend's `{success, data}`-or-bare envelope and loose field names);
//! [`api::MockApi`] is a deterministic in-memory backend that the tests
//! and the demo binary share. Swapping one for the other is a constructor
//! argument, not a feature flag.
//!
//! ## Quick start
//!
//! ```rust
//! use canteen_client::api::{CanteenApi, MockBackend};
//! use canteen_client::cart::CartManager;
//! use canteen_client::model::{OrderStatus, Role, User};
//! use canteen_client::orders::OrderWorkflow;
//! use canteen_client::session::Session;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = MockBackend::new();
//! let momo = backend.seed_food("Steam Momo", 120, "snacks", true);
//!
//! let student = User::new("u1", "Alice", Role::Student);
//! let api: Arc<dyn CanteenApi> = Arc::new(backend.for_user(student.clone()));
//!
//! let mut cart = CartManager::new(api.clone());
//! cart.fetch().await?;
//! cart.add(&momo, 2).await?;
//! assert_eq!(cart.total(), 240);
//!
//! let orders = OrderWorkflow::new(api, Session::new(student));
//! let order = orders.checkout(cart.cart()).await?;
//! cart.clear();
//! assert_eq!(order.status, OrderStatus::Pending);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod model;
pub mod observability;
pub mod orders;
pub mod refresh;
pub mod session;

pub use api::{ApiError, CanteenApi, HttpApi, MockApi, MockBackend};
pub use cart::{CartError, CartManager};
pub use catalog::{CatalogStore, MenuFilter};
pub use config::ClientConfig;
pub use model::{Cart, FoodItem, Order, OrderStatus, Role, User};
pub use orders::{OrderError, OrderFilter, OrderWorkflow};
pub use refresh::{spawn_order_refresh, RefreshPolicy};
pub use session::{Permissions, Session};
