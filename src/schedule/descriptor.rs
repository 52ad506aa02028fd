// ABOUTME: Schedule descriptor types - kinds, triggers, the model-facing
// ABOUTME: request shape, and the per-kind next-fire computation.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ScheduleError;

/// The kind of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleKind {
    OneShot,
    Delayed,
    RecurringCron,
}

/// When a schedule fires. Exactly one shape per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Trigger {
    /// Absolute timestamp (one-shot).
    At(DateTime<Utc>),

    /// Seconds after creation (delayed).
    After(u64),

    /// Cron expression (recurring).
    Cron(String),
}

impl Trigger {
    /// The kind this trigger shape belongs to.
    pub fn kind(&self) -> ScheduleKind {
        match self {
            Trigger::At(_) => ScheduleKind::OneShot,
            Trigger::After(_) => ScheduleKind::Delayed,
            Trigger::Cron(_) => ScheduleKind::RecurringCron,
        }
    }
}

/// A durable record of a pending follow-up action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDescriptor {
    /// Unique store-assigned id.
    pub id: String,

    pub kind: ScheduleKind,

    pub trigger: Trigger,

    /// Name of the follow-up action to invoke; opaque to the dispatcher.
    pub action: String,

    /// Opaque payload handed to the action.
    pub payload: String,

    pub created_at: DateTime<Utc>,

    /// Next wake time; recomputed after each firing for cron schedules.
    pub next_fire: Option<DateTime<Utc>>,
}

impl ScheduleDescriptor {
    /// Construct a descriptor, enforcing that the trigger shape matches
    /// the kind and that cron expressions parse. Mismatches are
    /// construction errors, never runtime ones.
    pub fn new(
        kind: ScheduleKind,
        trigger: Trigger,
        action: impl Into<String>,
        payload: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, ScheduleError> {
        if trigger.kind() != kind {
            return Err(ScheduleError::InvalidTrigger(format!(
                "{:?} trigger supplied for a {:?} schedule",
                trigger.kind(),
                kind
            )));
        }
        if let Trigger::Cron(expr) = &trigger {
            parse_cron(expr)?;
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            kind,
            trigger,
            action: action.into(),
            payload: payload.into(),
            created_at: now,
            next_fire: None,
        })
    }
}

/// Scheduling shape accepted from the model.
///
/// `{"type": "scheduled"|"delayed"|"cron"|"no-schedule", "when": ISO
/// date | integer seconds | cron string, "payload": string}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub when: serde_json::Value,

    #[serde(default)]
    pub payload: String,
}

impl ScheduleRequest {
    /// Resolve the request into a kind/trigger pair.
    ///
    /// `"no-schedule"` resolves to `None`: a policy choice surfaced as an
    /// informational result by the scheduling tool, not a hard failure.
    pub fn trigger(&self) -> Result<Option<(ScheduleKind, Trigger)>, ScheduleError> {
        match self.kind.as_str() {
            "no-schedule" => Ok(None),
            "scheduled" => {
                let Some(s) = self.when.as_str() else {
                    return Err(ScheduleError::InvalidTrigger(
                        "'scheduled' requires an ISO-8601 'when' string".into(),
                    ));
                };
                let at = DateTime::parse_from_rfc3339(s)
                    .map_err(|e| {
                        ScheduleError::InvalidTrigger(format!(
                            "'{}' is not an ISO-8601 timestamp: {}",
                            s, e
                        ))
                    })?
                    .with_timezone(&Utc);
                Ok(Some((ScheduleKind::OneShot, Trigger::At(at))))
            }
            "delayed" => {
                let Some(secs) = self.when.as_u64() else {
                    return Err(ScheduleError::InvalidTrigger(
                        "'delayed' requires a non-negative integer of seconds".into(),
                    ));
                };
                Ok(Some((ScheduleKind::Delayed, Trigger::After(secs))))
            }
            "cron" => {
                let Some(expr) = self.when.as_str() else {
                    return Err(ScheduleError::InvalidTrigger(
                        "'cron' requires a cron expression string".into(),
                    ));
                };
                parse_cron(expr)?;
                Ok(Some((
                    ScheduleKind::RecurringCron,
                    Trigger::Cron(expr.to_string()),
                )))
            }
            other => Err(ScheduleError::InvalidTrigger(format!(
                "unknown schedule type '{}'",
                other
            ))),
        }
    }
}

/// Parse a cron expression, accepting standard five-field input by
/// prepending a seconds column.
pub fn parse_cron(expr: &str) -> Result<cron::Schedule, ScheduleError> {
    let normalized = if expr.split_whitespace().count() == 5 {
        format!("0 {}", expr)
    } else {
        expr.to_string()
    };
    cron::Schedule::from_str(&normalized).map_err(|e| ScheduleError::InvalidCron {
        expr: expr.to_string(),
        message: e.to_string(),
    })
}

/// One "next trigger" computation with a handler per kind.
pub trait NextFire: Send + Sync {
    /// The next time this descriptor should fire, or `None` when it has
    /// nothing left to do.
    fn next_fire(
        &self,
        descriptor: &ScheduleDescriptor,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>>;
}

struct OneShotFire;

impl NextFire for OneShotFire {
    fn next_fire(
        &self,
        descriptor: &ScheduleDescriptor,
        _now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        match &descriptor.trigger {
            Trigger::At(at) => Some(*at),
            _ => None,
        }
    }
}

struct DelayedFire;

impl NextFire for DelayedFire {
    fn next_fire(
        &self,
        descriptor: &ScheduleDescriptor,
        _now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        match &descriptor.trigger {
            Trigger::After(secs) => Some(descriptor.created_at + Duration::seconds(*secs as i64)),
            _ => None,
        }
    }
}

struct CronFire;

impl NextFire for CronFire {
    fn next_fire(
        &self,
        descriptor: &ScheduleDescriptor,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        match &descriptor.trigger {
            // Always the next occurrence after `now`: missed fires while
            // the process was down are not backfilled.
            Trigger::Cron(expr) => parse_cron(expr).ok()?.after(&now).next(),
            _ => None,
        }
    }
}

/// Select the next-fire handler for a kind.
pub fn handler_for(kind: ScheduleKind) -> &'static dyn NextFire {
    match kind {
        ScheduleKind::OneShot => &OneShotFire,
        ScheduleKind::Delayed => &DelayedFire,
        ScheduleKind::RecurringCron => &CronFire,
    }
}
