use canteen_client::api::{ApiError, CanteenApi, MockBackend};
use canteen_client::cart::{CartError, CartManager};
use canteen_client::model::{FoodId, Role, User};
use std::sync::Arc;

fn student_cart(backend: &MockBackend, id: &str, name: &str) -> CartManager {
    let user = User::new(id, name, Role::Student);
    let api: Arc<dyn CanteenApi> = Arc::new(backend.for_user(user));
    CartManager::new(api)
}

/// Fetch is idempotent: with no intervening mutation, two fetches yield the
/// same lines and the same derived total.
#[tokio::test]
async fn fetch_is_idempotent() {
    let backend = MockBackend::new();
    let momo = backend.seed_food("Momo", 120, "snacks", true);

    let mut cart = student_cart(&backend, "u1", "Alice");
    cart.add(&momo, 2).await.unwrap();

    let first = cart.fetch().await.unwrap().clone();
    let second = cart.fetch().await.unwrap().clone();
    assert_eq!(first.lines(), second.lines());
    assert_eq!(first.total(), second.total());
    assert_eq!(first.total(), 240);
}

/// The displayed total is always the sum of the displayed lines: two of A at
/// 100 plus one of B at 50 totals 250, and removing A drops it to exactly 50.
#[tokio::test]
async fn total_tracks_lines_through_mutations() {
    let backend = MockBackend::new();
    let a = backend.seed_food("Chowmein", 100, "mains", true);
    let b = backend.seed_food("Lassi", 50, "drinks", true);

    let mut cart = student_cart(&backend, "u1", "Alice");
    cart.add(&a, 2).await.unwrap();
    cart.add(&b, 1).await.unwrap();
    assert_eq!(cart.total(), 250);
    assert_eq!(cart.cart().len(), 2);

    cart.remove(&a).await.unwrap();
    assert_eq!(cart.total(), 50);
    assert_eq!(cart.cart().len(), 1);
    assert!(cart.cart().line(&a).is_none());
}

/// Adding the same item twice increments the existing line instead of
/// duplicating it.
#[tokio::test]
async fn repeated_add_merges_into_one_line() {
    let backend = MockBackend::new();
    let momo = backend.seed_food("Momo", 120, "snacks", true);

    let mut cart = student_cart(&backend, "u1", "Alice");
    cart.add(&momo, 1).await.unwrap();
    cart.add(&momo, 2).await.unwrap();

    assert_eq!(cart.cart().len(), 1);
    assert_eq!(cart.cart().line(&momo).unwrap().quantity, 3);
    assert_eq!(cart.total(), 360);
}

/// A quantity below 1 never persists: setting 0 or a negative value removes
/// the line entirely.
#[tokio::test]
async fn quantity_floor_removes_the_line() {
    let backend = MockBackend::new();
    let momo = backend.seed_food("Momo", 120, "snacks", true);
    let lassi = backend.seed_food("Lassi", 50, "drinks", true);

    let mut cart = student_cart(&backend, "u1", "Alice");
    cart.add(&momo, 2).await.unwrap();
    cart.add(&lassi, 1).await.unwrap();

    cart.update_quantity(&momo, 0).await.unwrap();
    assert!(cart.cart().line(&momo).is_none());

    cart.update_quantity(&lassi, -1).await.unwrap();
    assert!(cart.cart().is_empty());
    assert_eq!(cart.total(), 0);
}

/// Adding with quantity 0 is rejected locally before any request is made.
#[tokio::test]
async fn add_with_zero_quantity_is_rejected() {
    let backend = MockBackend::new();
    let momo = backend.seed_food("Momo", 120, "snacks", true);

    let mut cart = student_cart(&backend, "u1", "Alice");
    let err = cart.add(&momo, 0).await.unwrap_err();
    assert_eq!(err, CartError::InvalidQuantity(0));
    assert!(cart.cart().is_empty());
}

/// Adding an unavailable item fails with the server's user-facing reason and
/// leaves the cart exactly as it was.
#[tokio::test]
async fn add_unavailable_item_fails_and_preserves_cart() {
    let backend = MockBackend::new();
    let momo = backend.seed_food("Momo", 120, "snacks", true);
    let sel_roti = backend.seed_food("Sel Roti", 40, "snacks", false);

    let mut cart = student_cart(&backend, "u1", "Alice");
    cart.add(&momo, 2).await.unwrap();

    let err = cart.add(&sel_roti, 1).await.unwrap_err();
    assert_eq!(
        err,
        CartError::AddFailed("Sel Roti is currently unavailable".to_string())
    );
    assert_eq!(cart.cart().len(), 1);
    assert_eq!(cart.total(), 240);
}

/// Updating an item that is not in the cart surfaces the server's reason.
#[tokio::test]
async fn update_missing_line_reports_server_reason() {
    let backend = MockBackend::new();
    backend.seed_food("Momo", 120, "snacks", true);

    let mut cart = student_cart(&backend, "u1", "Alice");
    let err = cart
        .update_quantity(&FoodId::from("food_1"), 3)
        .await
        .unwrap_err();
    assert_eq!(err, CartError::UpdateFailed("Item not in cart".to_string()));
}

/// A transport failure mid-mutation leaves the last known-good view intact.
#[tokio::test]
async fn transport_failure_leaves_local_state_untouched() {
    let backend = MockBackend::new();
    let momo = backend.seed_food("Momo", 120, "snacks", true);
    let lassi = backend.seed_food("Lassi", 50, "drinks", true);

    let mut cart = student_cart(&backend, "u1", "Alice");
    cart.add(&momo, 2).await.unwrap();

    backend.fail_next(ApiError::Transport("connection reset".to_string()));
    let err = cart.add(&lassi, 1).await.unwrap_err();
    assert!(matches!(err, CartError::Transport(_)));

    assert_eq!(cart.cart().len(), 1);
    assert_eq!(cart.total(), 240);
}

/// Carts are per-user: two sessions against the same backend never see each
/// other's lines.
#[tokio::test]
async fn carts_are_isolated_per_user() {
    let backend = MockBackend::new();
    let momo = backend.seed_food("Momo", 120, "snacks", true);

    let mut alice = student_cart(&backend, "u1", "Alice");
    let mut bob = student_cart(&backend, "u2", "Bob");

    alice.add(&momo, 3).await.unwrap();
    bob.fetch().await.unwrap();

    assert_eq!(alice.cart().len(), 1);
    assert!(bob.cart().is_empty());
}
