//! # Scheduled Refresh
//!
//! Staff and admin order views bound their staleness by re-fetching on a
//! fixed interval, superimposed on manual refresh and refresh-after-
//! mutation. This is a deliberate trade-off, not a workaround: push
//! infrastructure is out of scope, and a 30-second poll keeps every viewer
//! within one interval of the authoritative state.
//!
//! A failed tick degrades to the last published snapshot rather than
//! propagating upward — read projections are display state, never a basis
//! for writes.

use crate::model::Order;
use crate::orders::{OrderFilter, OrderWorkflow};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// How often a polled view re-fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    pub interval: Duration,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
        }
    }
}

impl RefreshPolicy {
    pub fn every(interval: Duration) -> Self {
        Self { interval }
    }
}

/// Spawns the polling task for an order view.
///
/// The first fetch happens immediately, then once per interval. Each
/// successful fetch is published to the returned `watch` receiver; a failed
/// fetch logs and leaves the previous snapshot in place. The task stops
/// when every receiver is dropped, or abort the handle when the view goes
/// away — in-flight results are simply no longer consumed.
pub fn spawn_order_refresh(
    workflow: OrderWorkflow,
    filter: OrderFilter,
    policy: RefreshPolicy,
) -> (watch::Receiver<Vec<Order>>, JoinHandle<()>) {
    let (tx, rx) = watch::channel(Vec::new());
    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(policy.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match workflow.list(&filter).await {
                Ok(orders) => {
                    debug!(count = orders.len(), "order view refreshed");
                    if tx.send(orders).is_err() {
                        // Every receiver is gone; the view unmounted.
                        break;
                    }
                }
                Err(error) => {
                    warn!(%error, "order refresh failed; keeping last known view");
                }
            }
        }
    });
    (rx, handle)
}
