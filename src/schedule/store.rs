// ABOUTME: The schedule store - ordered, serialized collection of pending
// ABOUTME: descriptors with cancel/fire race policy and JSON persistence.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{ScheduleDescriptor, ScheduleKind, ScheduleRequest, Trigger, handler_for};
use crate::error::ScheduleError;

/// What to do with an absolute trigger that has already elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PastDuePolicy {
    /// Refuse the schedule with `PastTimestamp`. The default: a backlog
    /// of surprise fires is worse than asking for a fresh timestamp.
    #[default]
    Reject,

    /// Accept it and fire on the next poll.
    FireImmediately,
}

struct Entry {
    descriptor: ScheduleDescriptor,
    /// Set while a recurring fire is in flight; blocks double-claiming.
    firing: bool,
}

/// A claimed firing handed to the dispatcher.
#[derive(Debug, Clone)]
pub struct Firing {
    pub id: String,
    pub kind: ScheduleKind,
    pub action: String,
    pub payload: String,
}

/// Durable, keyed collection of pending schedules.
///
/// The only mutable state shared between tool calls and scheduled
/// firings; every schedule/cancel/claim/re-arm runs under one lock.
/// Race policy: cancel wins until `claim_due` has claimed a descriptor.
/// After the claim the fire wins: a one-shot is already gone and its
/// cancel observes `UnknownSchedule`, while cancelling a mid-fire cron
/// lets the in-flight firing finish and removes only the future ones.
#[derive(Default)]
pub struct ScheduleStore {
    entries: Arc<Mutex<Vec<Entry>>>,
    past_due: PastDuePolicy,
    persist_path: Option<PathBuf>,
}

impl ScheduleStore {
    /// Create an empty in-memory store with the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the past-due policy for absolute triggers.
    pub fn with_past_due_policy(mut self, policy: PastDuePolicy) -> Self {
        self.past_due = policy;
        self
    }

    /// Persist descriptors to a JSON file on every mutation.
    pub fn with_persistence(mut self, path: impl AsRef<Path>) -> Self {
        self.persist_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Load previously persisted descriptors, replacing current entries.
    /// Returns the number restored. A missing file restores nothing.
    pub async fn load(&self) -> usize {
        let Some(path) = &self.persist_path else {
            return 0;
        };
        let Ok(json) = tokio::fs::read_to_string(path).await else {
            return 0;
        };
        let descriptors: Vec<ScheduleDescriptor> = match serde_json::from_str(&json) {
            Ok(d) => d,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable schedule file");
                return 0;
            }
        };

        let now = Utc::now();
        let mut entries = self.entries.lock().await;
        entries.clear();
        for mut descriptor in descriptors {
            // Recurring schedules re-arm from now; missed occurrences
            // during downtime are not backfilled.
            if descriptor.kind == ScheduleKind::RecurringCron {
                descriptor.next_fire = handler_for(descriptor.kind).next_fire(&descriptor, now);
            }
            entries.push(Entry {
                descriptor,
                firing: false,
            });
        }
        entries.len()
    }

    /// Register a new schedule and return its store-assigned id.
    pub async fn schedule(
        &self,
        kind: ScheduleKind,
        trigger: Trigger,
        action: impl Into<String>,
        payload: impl Into<String>,
    ) -> Result<String, ScheduleError> {
        let now = Utc::now();
        let mut descriptor = ScheduleDescriptor::new(kind, trigger, action, payload, now)?;

        let mut next = handler_for(kind).next_fire(&descriptor, now);
        if let Trigger::At(at) = &descriptor.trigger {
            if *at <= now {
                match self.past_due {
                    PastDuePolicy::Reject => return Err(ScheduleError::PastTimestamp(*at)),
                    PastDuePolicy::FireImmediately => next = Some(now),
                }
            }
        }
        descriptor.next_fire = next;

        let id = descriptor.id.clone();
        debug!(id = %id, kind = ?kind, next_fire = ?descriptor.next_fire, "schedule registered");

        let mut entries = self.entries.lock().await;
        entries.push(Entry {
            descriptor,
            firing: false,
        });
        self.persist(&entries).await;
        Ok(id)
    }

    /// Register a model-issued scheduling request against an action.
    /// Returns `None` for `"no-schedule"`.
    pub async fn schedule_request(
        &self,
        request: &ScheduleRequest,
        action: &str,
    ) -> Result<Option<String>, ScheduleError> {
        let Some((kind, trigger)) = request.trigger()? else {
            return Ok(None);
        };
        self.schedule(kind, trigger, action, request.payload.clone())
            .await
            .map(Some)
    }

    /// All pending descriptors in creation order.
    pub async fn list(&self) -> Vec<ScheduleDescriptor> {
        let entries = self.entries.lock().await;
        entries.iter().map(|e| e.descriptor.clone()).collect()
    }

    /// Cancel a pending schedule.
    ///
    /// Fails with `UnknownSchedule` for ids that never existed or were
    /// already removed, including a one-shot already claimed for
    /// firing, which is how the fire-wins side of the race shows up.
    pub async fn cancel(&self, id: &str) -> Result<(), ScheduleError> {
        let mut entries = self.entries.lock().await;
        let Some(pos) = entries.iter().position(|e| e.descriptor.id == id) else {
            return Err(ScheduleError::UnknownSchedule(id.to_string()));
        };
        entries.remove(pos);
        self.persist(&entries).await;
        debug!(id = %id, "schedule cancelled");
        Ok(())
    }

    /// Claim everything due at `now`.
    ///
    /// One-shot and delayed descriptors are removed at claim time; a
    /// recurring descriptor is flagged in-flight and stays until
    /// [`ScheduleStore::rearm`] runs.
    pub(crate) async fn claim_due(&self, now: DateTime<Utc>) -> Vec<Firing> {
        let mut entries = self.entries.lock().await;
        let mut due = Vec::new();

        let mut i = 0;
        while i < entries.len() {
            let entry = &mut entries[i];
            let is_due =
                !entry.firing && entry.descriptor.next_fire.is_some_and(|t| t <= now);
            if !is_due {
                i += 1;
                continue;
            }

            match entry.descriptor.kind {
                ScheduleKind::OneShot | ScheduleKind::Delayed => {
                    let entry = entries.remove(i);
                    due.push(to_firing(&entry.descriptor));
                }
                ScheduleKind::RecurringCron => {
                    entry.firing = true;
                    due.push(to_firing(&entry.descriptor));
                    i += 1;
                }
            }
        }

        if !due.is_empty() {
            self.persist(&entries).await;
        }
        due
    }

    /// Re-arm a recurring descriptor after its firing completed.
    /// A descriptor cancelled mid-fire is simply gone; nothing happens.
    pub(crate) async fn rearm(&self, id: &str, now: DateTime<Utc>) {
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries.iter_mut().find(|e| e.descriptor.id == id) {
            entry.firing = false;
            entry.descriptor.next_fire =
                handler_for(entry.descriptor.kind).next_fire(&entry.descriptor, now);
            self.persist(&entries).await;
        }
    }

    /// Best-effort write-through; a disk failure is logged, not fatal.
    async fn persist(&self, entries: &[Entry]) {
        let Some(path) = &self.persist_path else {
            return;
        };
        let descriptors: Vec<&ScheduleDescriptor> =
            entries.iter().map(|e| &e.descriptor).collect();
        match serde_json::to_string_pretty(&descriptors) {
            Ok(json) => {
                if let Err(e) = tokio::fs::write(path, json).await {
                    warn!(path = %path.display(), error = %e, "failed to persist schedules");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize schedules"),
        }
    }
}

fn to_firing(descriptor: &ScheduleDescriptor) -> Firing {
    Firing {
        id: descriptor.id.clone(),
        kind: descriptor.kind,
        action: descriptor.action.clone(),
        payload: descriptor.payload.clone(),
    }
}
