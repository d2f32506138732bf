//! # Session & Role Context
//!
//! The session supplies the current user identity and role to the
//! components that gate operations on them. Instead of picking behavior by
//! role at each call site, the role is projected once into an explicit
//! [`Permissions`] allow/deny set that any presentation layer (and the
//! [`OrderWorkflow`](crate::orders::OrderWorkflow) itself) consumes
//! uniformly.

use crate::model::{Role, User};

/// The authenticated context a client instance operates under.
///
/// Constructed once per session from the externally-supplied user (login is
/// session bootstrap, outside the core) and passed by reference to the
/// components that need it. There is no ambient global.
#[derive(Debug, Clone)]
pub struct Session {
    user: User,
}

impl Session {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn permissions(&self) -> Permissions {
        Permissions::for_role(self.user.role)
    }
}

/// Explicit allow/deny projection of a role over the gated operation set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    /// May create an order from their own cart (checkout).
    pub place_orders: bool,
    /// May drive the fulfillment lifecycle forward.
    pub advance_orders: bool,
    /// May hard-delete orders. Irreversible.
    pub delete_orders: bool,
    /// Sees every order rather than only their own.
    pub view_all_orders: bool,
}

impl Permissions {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Student => Self {
                place_orders: true,
                advance_orders: false,
                delete_orders: false,
                view_all_orders: false,
            },
            Role::Staff => Self {
                place_orders: true,
                advance_orders: true,
                delete_orders: false,
                view_all_orders: true,
            },
            Role::Admin => Self {
                place_orders: true,
                advance_orders: true,
                delete_orders: true,
                view_all_orders: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_table() {
        let student = Permissions::for_role(Role::Student);
        assert!(student.place_orders);
        assert!(!student.advance_orders);
        assert!(!student.delete_orders);
        assert!(!student.view_all_orders);

        let staff = Permissions::for_role(Role::Staff);
        assert!(staff.advance_orders);
        assert!(staff.view_all_orders);
        assert!(!staff.delete_orders);

        let admin = Permissions::for_role(Role::Admin);
        assert!(admin.advance_orders);
        assert!(admin.delete_orders);
        assert!(admin.view_all_orders);
    }
}
