//! Bounded, cancellable readiness polling.
//!
//! [`wait_until`] is the generic primitive: probe, and if not satisfied,
//! suspend for one interval and decrement the attempt budget. The loop
//! listens on a watch channel so a daemon shutdown cancels the wait
//! instead of burning the rest of the budget. With the default budget
//! (24 × 5s) a create call waits at most about two minutes.
//!
//! The wait suspends only the calling task — concurrent requests poll on
//! their own tasks.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::warn;

use storegrid_cluster::{ClusterClient, all_pods_ready};

/// Attempt budget and interval for one polling loop.
#[derive(Debug, Clone, Copy)]
pub struct PollBudget {
    pub attempts: u32,
    pub interval: Duration,
}

/// Terminal outcome of a polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The probe reported success within the budget.
    Ready,
    /// The budget ran out. Not a failure — the store stays listable and
    /// its status is re-derived on later queries.
    TimedOut,
    /// Shutdown fired mid-wait.
    Cancelled,
}

/// Poll `probe` until it succeeds, the attempt budget is exhausted, or
/// `shutdown` fires. A dropped shutdown sender counts as shutdown.
pub async fn wait_until<F, Fut>(
    budget: PollBudget,
    mut shutdown: watch::Receiver<bool>,
    mut probe: F,
) -> PollOutcome
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = bool> + Send,
{
    for _ in 0..budget.attempts {
        if probe().await {
            return PollOutcome::Ready;
        }
        tokio::select! {
            _ = tokio::time::sleep(budget.interval) => {}
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    return PollOutcome::Cancelled;
                }
            }
        }
    }
    PollOutcome::TimedOut
}

/// Poll a namespace until every pod reports all containers ready.
///
/// A failed cluster query counts as "not ready" for that attempt — the
/// namespace may simply not have pods yet.
pub async fn wait_until_ready(
    cluster: Arc<dyn ClusterClient>,
    namespace: &str,
    budget: PollBudget,
    shutdown: watch::Receiver<bool>,
) -> PollOutcome {
    let namespace = namespace.to_string();
    wait_until(budget, shutdown, move || {
        let cluster = Arc::clone(&cluster);
        let namespace = namespace.clone();
        async move {
            match cluster.list_pods(&namespace).await {
                Ok(pods) => all_pods_ready(&pods),
                Err(e) => {
                    warn!(%namespace, error = %e, "readiness poll failed");
                    false
                }
            }
        }
    })
    .await
}
