use canteen_client::api::{CanteenApi, MockBackend};
use canteen_client::cart::CartManager;
use canteen_client::model::{Order, OrderId, OrderStatus, Role, User};
use canteen_client::orders::{OrderError, OrderFilter, OrderWorkflow};
use canteen_client::session::Session;
use std::sync::Arc;

fn workflow_for(backend: &MockBackend, user: &User) -> OrderWorkflow {
    let api: Arc<dyn CanteenApi> = Arc::new(backend.for_user(user.clone()));
    OrderWorkflow::new(api, Session::new(user.clone()))
}

/// Places one pending order for `user` and returns it.
async fn place_order(backend: &MockBackend, user: &User) -> Order {
    let api: Arc<dyn CanteenApi> = Arc::new(backend.for_user(user.clone()));
    let food = backend.seed_food("Momo", 120, "snacks", true);
    let mut cart = CartManager::new(api.clone());
    cart.add(&food, 2).await.unwrap();
    let workflow = OrderWorkflow::new(api, Session::new(user.clone()));
    let order = workflow.checkout(cart.cart()).await.unwrap();
    cart.clear();
    order
}

/// The lifecycle is forward-only, one step at a time: each advance names the
/// expected current status and lands on exactly the next one.
#[tokio::test]
async fn lifecycle_advances_one_step_at_a_time() {
    let backend = MockBackend::new();
    let student = User::new("u1", "Alice", Role::Student);
    let staff = User::new("u2", "Bishal", Role::Staff);
    let order = place_order(&backend, &student).await;
    let workflow = workflow_for(&backend, &staff);

    let expected_walk = [
        (OrderStatus::Pending, OrderStatus::Preparing),
        (OrderStatus::Preparing, OrderStatus::Ready),
        (OrderStatus::Ready, OrderStatus::Paid),
    ];
    for (from, to) in expected_walk {
        let updated = workflow.advance(&order.id, from).await.unwrap();
        assert_eq!(updated.status, to);
        assert_eq!(backend.order_status(&order.id), Some(to));
    }
}

/// A stale expected status — double-click, or a view that hasn't refreshed —
/// is rejected without touching the order.
#[tokio::test]
async fn stale_expected_status_is_rejected() {
    let backend = MockBackend::new();
    let student = User::new("u1", "Alice", Role::Student);
    let staff = User::new("u2", "Bishal", Role::Staff);
    let order = place_order(&backend, &student).await;
    let workflow = workflow_for(&backend, &staff);

    workflow
        .advance(&order.id, OrderStatus::Pending)
        .await
        .unwrap();

    // Second click still believes the order is pending.
    let err = workflow
        .advance(&order.id, OrderStatus::Pending)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::InvalidTransition(_)));
    assert_eq!(backend.order_status(&order.id), Some(OrderStatus::Preparing));
}

/// Skipping a step is impossible: the target is derived from the expected
/// status, and the server only honors its own single legal next step.
#[tokio::test]
async fn transitions_cannot_skip_steps() {
    let backend = MockBackend::new();
    let student = User::new("u1", "Alice", Role::Student);
    let staff = User::new("u2", "Bishal", Role::Staff);
    let order = place_order(&backend, &student).await;
    let workflow = workflow_for(&backend, &staff);

    // Claiming the order is already "ready" would target "paid" directly.
    let err = workflow
        .advance(&order.id, OrderStatus::Ready)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::InvalidTransition(_)));
    assert_eq!(backend.order_status(&order.id), Some(OrderStatus::Pending));
}

/// Terminal orders have no next step; the attempt fails before any request.
#[tokio::test]
async fn terminal_orders_cannot_advance() {
    let backend = MockBackend::new();
    let staff = User::new("u2", "Bishal", Role::Staff);
    let workflow = workflow_for(&backend, &staff);

    for terminal in [OrderStatus::Paid, OrderStatus::Cancelled] {
        let err = workflow
            .advance(&OrderId::from("order_1"), terminal)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            OrderError::InvalidTransition(format!("order is already {terminal}"))
        );
    }
}

/// Students cannot drive the lifecycle, even on their own orders.
#[tokio::test]
async fn students_cannot_advance_orders() {
    let backend = MockBackend::new();
    let student = User::new("u1", "Alice", Role::Student);
    let order = place_order(&backend, &student).await;
    let workflow = workflow_for(&backend, &student);

    let err = workflow
        .advance(&order.id, OrderStatus::Pending)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::PermissionDenied(_)));
    assert_eq!(backend.order_status(&order.id), Some(OrderStatus::Pending));
}

/// Checkout refuses an empty cart before talking to the server.
#[tokio::test]
async fn checkout_requires_non_empty_cart() {
    let backend = MockBackend::new();
    let student = User::new("u1", "Alice", Role::Student);
    let workflow = workflow_for(&backend, &student);
    let cart = CartManager::new(Arc::new(backend.for_user(student)));

    let err = workflow.checkout(cart.cart()).await.unwrap_err();
    assert_eq!(err, OrderError::EmptyCart);
}

/// Listing is role-scoped: students see only their own orders, staff see the
/// whole queue, and both views come back most-recent-first.
#[tokio::test]
async fn listing_is_role_scoped_and_recency_sorted() {
    let backend = MockBackend::new();
    let alice = User::new("u1", "Alice", Role::Student);
    let bob = User::new("u2", "Bob", Role::Student);
    let staff = User::new("u3", "Bishal", Role::Staff);

    let first = place_order(&backend, &alice).await;
    let second = place_order(&backend, &bob).await;
    let third = place_order(&backend, &alice).await;

    let alice_view = workflow_for(&backend, &alice)
        .list(&OrderFilter::all())
        .await
        .unwrap();
    assert_eq!(alice_view.len(), 2);
    assert_eq!(alice_view[0].id, third.id, "newest order comes first");
    assert_eq!(alice_view[1].id, first.id);

    let staff_view = workflow_for(&backend, &staff)
        .list(&OrderFilter::all())
        .await
        .unwrap();
    assert_eq!(staff_view.len(), 3);
    assert_eq!(staff_view[0].id, third.id);
    assert_eq!(staff_view[2].id, first.id);
    assert!(staff_view.iter().any(|o| o.id == second.id));
}

/// The staff active queue drops orders the moment they settle.
#[tokio::test]
async fn active_queue_excludes_settled_orders() {
    let backend = MockBackend::new();
    let student = User::new("u1", "Alice", Role::Student);
    let staff = User::new("u2", "Bishal", Role::Staff);
    let order = place_order(&backend, &student).await;
    let workflow = workflow_for(&backend, &staff);

    assert_eq!(
        workflow.list(&OrderFilter::active_queue()).await.unwrap().len(),
        1
    );

    let mut status = OrderStatus::Pending;
    while let Some(next) = status.next() {
        workflow.advance(&order.id, status).await.unwrap();
        status = next;
    }

    assert!(workflow
        .list(&OrderFilter::active_queue())
        .await
        .unwrap()
        .is_empty());
    assert_eq!(workflow.list(&OrderFilter::all()).await.unwrap().len(), 1);
}

/// Admin search narrows the listing by order id or customer name,
/// case-insensitively.
#[tokio::test]
async fn search_narrows_by_id_or_customer() {
    let backend = MockBackend::new();
    let alice = User::new("u1", "Alice", Role::Student);
    let bob = User::new("u2", "Bob", Role::Student);
    let admin = User::new("u3", "Admin", Role::Admin);

    place_order(&backend, &alice).await;
    let bobs = place_order(&backend, &bob).await;
    let workflow = workflow_for(&backend, &admin);

    let by_name = workflow
        .list(&OrderFilter {
            search: Some("ALI".to_string()),
            ..OrderFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].customer.as_ref().unwrap().name, "Alice");

    let by_id = workflow
        .list(&OrderFilter {
            search: Some(bobs.id.0.clone()),
            ..OrderFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(by_id.len(), 1);
    assert_eq!(by_id[0].id, bobs.id);
}

/// Deletion is admin-only and permanent.
#[tokio::test]
async fn only_admins_delete_orders() {
    let backend = MockBackend::new();
    let student = User::new("u1", "Alice", Role::Student);
    let staff = User::new("u2", "Bishal", Role::Staff);
    let admin = User::new("u3", "Admin", Role::Admin);
    let order = place_order(&backend, &student).await;

    for denied in [&student, &staff] {
        let err = workflow_for(&backend, denied)
            .delete(&order.id)
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::PermissionDenied(_)));
    }
    assert_eq!(backend.order_status(&order.id), Some(OrderStatus::Pending));

    let admin_workflow = workflow_for(&backend, &admin);
    admin_workflow.delete(&order.id).await.unwrap();
    assert_eq!(backend.order_status(&order.id), None);

    let err = admin_workflow.delete(&order.id).await.unwrap_err();
    assert!(matches!(err, OrderError::NotFound(_)));
}
