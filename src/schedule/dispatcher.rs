// ABOUTME: The task dispatcher - polls the store for due work and invokes
// ABOUTME: the named follow-up action against the owning session.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::info;

use super::{ScheduleKind, ScheduleStore};
use crate::session::SessionHandle;

/// Drives schedule firings against a session.
///
/// Scheduled firings are pre-approved by the act of scheduling: they
/// invoke the session action directly and never pass through the gate.
pub struct TaskDispatcher {
    store: Arc<ScheduleStore>,
    session: Arc<dyn SessionHandle>,
}

impl TaskDispatcher {
    pub fn new(store: Arc<ScheduleStore>, session: Arc<dyn SessionHandle>) -> Self {
        Self { store, session }
    }

    /// Fire everything due at `now`, exactly once per descriptor per
    /// wake. Recurring descriptors are re-armed from `now` afterwards.
    /// Returns the number of firings.
    pub async fn poll_due(&self, now: DateTime<Utc>) -> usize {
        let due = self.store.claim_due(now).await;
        let count = due.len();

        for firing in due {
            info!(id = %firing.id, action = %firing.action, "schedule fired");
            self.session
                .invoke_action(&firing.action, &firing.payload)
                .await;

            if firing.kind == ScheduleKind::RecurringCron {
                self.store.rearm(&firing.id, now).await;
            }
        }
        count
    }

    /// Spawn the background polling loop on a fixed tick.
    pub fn spawn(self: Arc<Self>, tick: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            loop {
                interval.tick().await;
                self.poll_due(Utc::now()).await;
            }
        })
    }
}
