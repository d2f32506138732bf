//! # Domain Model
//!
//! Pure data structures shared by every component of the client: the food
//! catalog entry, the cart and its lines, the order snapshot with its
//! lifecycle status, and the user/role pair supplied by the session.
//!
//! All wire-facing types are serde-derived and deliberately tolerant of the
//! backend's loose JSON (field aliases, optional fields, id-or-embedded
//! references). Normalization happens once, at decode time, so the rest of
//! the crate only ever sees the canonical shapes.

pub mod cart;
pub mod food;
pub mod order;
pub mod user;

pub use cart::{Cart, CartLine, CartPayload};
pub use food::{FoodId, FoodItem};
pub use order::{FoodRef, Order, OrderCustomer, OrderId, OrderLine, OrderStatus};
pub use user::{Role, User, UserId};
