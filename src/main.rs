//! Demo binary: walks the full canteen flow — student fills a cart and
//! checks out, staff works the queue to `paid` — against the in-memory
//! backend, with structured tracing output.
//!
//! ```bash
//! RUST_LOG=info cargo run
//! RUST_LOG=debug cargo run   # full sync details
//! ```

use canteen_client::api::{CanteenApi, MockBackend};
use canteen_client::cart::CartManager;
use canteen_client::catalog::CatalogStore;
use canteen_client::model::{OrderStatus, Role, User};
use canteen_client::observability::setup_tracing;
use canteen_client::orders::{OrderFilter, OrderWorkflow};
use canteen_client::refresh::{spawn_order_refresh, RefreshPolicy};
use canteen_client::session::Session;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    info!("Starting canteen demo against the in-memory backend");

    // The "server": one shared backend, seeded like a canteen menu.
    let backend = MockBackend::new();
    let momo = backend.seed_food("Steam Momo", 120, "snacks", true);
    let thukpa = backend.seed_food("Thukpa", 150, "mains", true);
    backend.seed_food("Sel Roti", 40, "snacks", false);

    // One browser session per participant.
    let alice = User::new("u1", "Alice", Role::Student);
    let staff = User::new("u2", "Bishal", Role::Staff);

    let student_api: Arc<dyn CanteenApi> = Arc::new(backend.for_user(alice.clone()));
    let staff_api: Arc<dyn CanteenApi> = Arc::new(backend.for_user(staff.clone()));

    // Student side: browse, fill the cart, check out.
    let order = async {
        let mut catalog = CatalogStore::new(student_api.clone());
        catalog.refresh().await?;
        info!(
            items = catalog.items().len(),
            categories = ?catalog.categories(),
            "menu loaded"
        );

        let mut cart = CartManager::new(student_api.clone());
        cart.fetch().await?;
        cart.add(&momo, 2).await?;
        cart.add(&thukpa, 1).await?;
        cart.update_quantity(&thukpa, 2).await?;
        info!(total = cart.total(), lines = cart.cart().len(), "cart ready");

        let workflow = OrderWorkflow::new(student_api.clone(), Session::new(alice.clone()));
        let order = workflow.checkout(cart.cart()).await?;
        cart.clear();
        Ok::<_, Box<dyn std::error::Error>>(order)
    }
    .instrument(tracing::info_span!("student_session"))
    .await?;

    info!(order = %order.id, total = order.total, "order placed");

    // Staff side: watch the active queue and drive the lifecycle.
    let staff_workflow = OrderWorkflow::new(staff_api, Session::new(staff));
    let (mut queue, poller) = spawn_order_refresh(
        staff_workflow.clone(),
        OrderFilter::active_queue(),
        RefreshPolicy::every(Duration::from_millis(50)),
    );

    async {
        queue.changed().await.expect("poller alive");
        let pending = queue.borrow().clone();
        info!(queue = pending.len(), "active queue picked up the order");

        let mut status = OrderStatus::Pending;
        while let Some(next) = status.next() {
            let updated = staff_workflow.advance(&order.id, status).await?;
            info!(order = %updated.id, status = %updated.status, "advanced");
            status = next;
        }
        Ok::<_, Box<dyn std::error::Error>>(())
    }
    .instrument(tracing::info_span!("staff_session"))
    .await?;

    poller.abort();

    let history = staff_workflow.list(&OrderFilter::all()).await?;
    info!(orders = history.len(), final_status = %history[0].status, "demo complete");

    Ok(())
}
