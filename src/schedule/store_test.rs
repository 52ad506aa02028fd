// ABOUTME: Tests for the schedule store - construction errors, ordering,
// ABOUTME: cancellation, past-due policy, and persistence.

use chrono::{Duration, Utc};
use serde_json::json;

use super::*;
use crate::error::ScheduleError;

#[tokio::test]
async fn test_delayed_schedule_sets_trigger() {
    let store = ScheduleStore::new();
    let id = store
        .schedule(ScheduleKind::Delayed, Trigger::After(30), "agent_turn", "p")
        .await
        .unwrap();

    let listed = store.list().await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert_eq!(listed[0].kind, ScheduleKind::Delayed);
    assert_eq!(listed[0].trigger, Trigger::After(30));
    assert_eq!(
        listed[0].next_fire,
        Some(listed[0].created_at + Duration::seconds(30))
    );
}

#[tokio::test]
async fn test_kind_trigger_mismatch_is_construction_error() {
    let store = ScheduleStore::new();
    let err = store
        .schedule(
            ScheduleKind::OneShot,
            Trigger::Cron("0 * * * *".into()),
            "agent_turn",
            "p",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidTrigger(_)));
}

#[tokio::test]
async fn test_invalid_cron_rejected() {
    let store = ScheduleStore::new();
    let err = store
        .schedule(
            ScheduleKind::RecurringCron,
            Trigger::Cron("not a cron".into()),
            "agent_turn",
            "p",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidCron { .. }));
}

#[tokio::test]
async fn test_five_field_cron_accepted() {
    let store = ScheduleStore::new();
    let id = store
        .schedule(
            ScheduleKind::RecurringCron,
            Trigger::Cron("0 * * * *".into()),
            "agent_turn",
            "p",
        )
        .await
        .unwrap();

    let listed = store.list().await;
    assert_eq!(listed[0].id, id);
    assert!(listed[0].next_fire.is_some());
    assert!(listed[0].next_fire.unwrap() > Utc::now() - Duration::seconds(1));
}

#[tokio::test]
async fn test_past_timestamp_rejected_by_default() {
    let store = ScheduleStore::new();
    let yesterday = Utc::now() - Duration::days(1);
    let err = store
        .schedule(ScheduleKind::OneShot, Trigger::At(yesterday), "agent_turn", "p")
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::PastTimestamp(t) if t == yesterday));
}

#[tokio::test]
async fn test_past_timestamp_accepted_when_firing_immediately() {
    let store = ScheduleStore::new().with_past_due_policy(PastDuePolicy::FireImmediately);
    let yesterday = Utc::now() - Duration::days(1);
    store
        .schedule(ScheduleKind::OneShot, Trigger::At(yesterday), "agent_turn", "p")
        .await
        .unwrap();

    // Armed for the next poll rather than the elapsed instant.
    let due = store.claim_due(Utc::now()).await;
    assert_eq!(due.len(), 1);
}

#[tokio::test]
async fn test_list_preserves_creation_order() {
    let store = ScheduleStore::new();
    let a = store
        .schedule(ScheduleKind::Delayed, Trigger::After(300), "agent_turn", "a")
        .await
        .unwrap();
    let b = store
        .schedule(
            ScheduleKind::RecurringCron,
            Trigger::Cron("0 9 * * 1-5".into()),
            "agent_turn",
            "b",
        )
        .await
        .unwrap();
    let c = store
        .schedule(
            ScheduleKind::OneShot,
            Trigger::At(Utc::now() + Duration::hours(2)),
            "agent_turn",
            "c",
        )
        .await
        .unwrap();

    let listed = store.list().await;
    let ids: Vec<_> = listed.iter().map(|d| d.id.clone()).collect();
    assert_eq!(ids, vec![a, b, c]);
    assert_eq!(listed[0].kind, ScheduleKind::Delayed);
    assert_eq!(listed[1].kind, ScheduleKind::RecurringCron);
    assert_eq!(listed[2].kind, ScheduleKind::OneShot);
}

#[tokio::test]
async fn test_cancel_unknown_id() {
    let store = ScheduleStore::new();
    let err = store.cancel("nope").await.unwrap_err();
    assert!(matches!(err, ScheduleError::UnknownSchedule(id) if id == "nope"));
}

#[tokio::test]
async fn test_cancel_twice_fails_second_time() {
    let store = ScheduleStore::new();
    let id = store
        .schedule(ScheduleKind::Delayed, Trigger::After(60), "agent_turn", "p")
        .await
        .unwrap();

    store.cancel(&id).await.unwrap();
    let err = store.cancel(&id).await.unwrap_err();
    assert!(matches!(err, ScheduleError::UnknownSchedule(_)));
}

#[tokio::test]
async fn test_cancel_wins_before_claim() {
    let store = ScheduleStore::new();
    let id = store
        .schedule(ScheduleKind::Delayed, Trigger::After(0), "agent_turn", "p")
        .await
        .unwrap();

    store.cancel(&id).await.unwrap();
    let due = store.claim_due(Utc::now() + Duration::seconds(1)).await;
    assert!(due.is_empty());
}

#[tokio::test]
async fn test_fire_wins_after_claim() {
    let store = ScheduleStore::new();
    let id = store
        .schedule(ScheduleKind::Delayed, Trigger::After(0), "agent_turn", "p")
        .await
        .unwrap();

    let due = store.claim_due(Utc::now() + Duration::seconds(1)).await;
    assert_eq!(due.len(), 1);

    // The one-shot is claimed; a racing cancel observes it as gone.
    let err = store.cancel(&id).await.unwrap_err();
    assert!(matches!(err, ScheduleError::UnknownSchedule(_)));
}

#[tokio::test]
async fn test_cancel_during_cron_fire_removes_future_fires() {
    let store = ScheduleStore::new();
    let id = store
        .schedule(
            ScheduleKind::RecurringCron,
            Trigger::Cron("* * * * *".into()),
            "agent_turn",
            "p",
        )
        .await
        .unwrap();

    let due = store.claim_due(Utc::now() + Duration::seconds(61)).await;
    assert_eq!(due.len(), 1);

    // In-flight firing is not interrupted, but nothing re-arms.
    store.cancel(&id).await.unwrap();
    store.rearm(&id, Utc::now()).await;
    assert!(store.list().await.is_empty());
}

#[tokio::test]
async fn test_schedule_request_shapes() {
    let delayed: ScheduleRequest =
        serde_json::from_value(json!({"type": "delayed", "when": 30, "payload": "p"})).unwrap();
    let (kind, trigger) = delayed.trigger().unwrap().unwrap();
    assert_eq!(kind, ScheduleKind::Delayed);
    assert_eq!(trigger, Trigger::After(30));

    let cron: ScheduleRequest =
        serde_json::from_value(json!({"type": "cron", "when": "0 * * * *", "payload": "p"}))
            .unwrap();
    let (kind, trigger) = cron.trigger().unwrap().unwrap();
    assert_eq!(kind, ScheduleKind::RecurringCron);
    assert_eq!(trigger, Trigger::Cron("0 * * * *".into()));

    let none: ScheduleRequest =
        serde_json::from_value(json!({"type": "no-schedule"})).unwrap();
    assert!(none.trigger().unwrap().is_none());

    let bad: ScheduleRequest =
        serde_json::from_value(json!({"type": "cron", "when": 5})).unwrap();
    assert!(matches!(
        bad.trigger().unwrap_err(),
        ScheduleError::InvalidTrigger(_)
    ));

    let unknown: ScheduleRequest =
        serde_json::from_value(json!({"type": "weekly", "when": "monday"})).unwrap();
    assert!(matches!(
        unknown.trigger().unwrap_err(),
        ScheduleError::InvalidTrigger(_)
    ));
}

#[tokio::test]
async fn test_scheduled_request_parses_iso_timestamp() {
    let req: ScheduleRequest = serde_json::from_value(
        json!({"type": "scheduled", "when": "2031-01-15T09:30:00Z", "payload": "p"}),
    )
    .unwrap();
    let (kind, trigger) = req.trigger().unwrap().unwrap();
    assert_eq!(kind, ScheduleKind::OneShot);
    match trigger {
        Trigger::At(at) => assert_eq!(at.to_rfc3339(), "2031-01-15T09:30:00+00:00"),
        other => panic!("unexpected trigger: {:?}", other),
    }
}

#[tokio::test]
async fn test_persistence_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schedules.json");

    let store = ScheduleStore::new().with_persistence(&path);
    let a = store
        .schedule(ScheduleKind::Delayed, Trigger::After(600), "agent_turn", "a")
        .await
        .unwrap();
    let b = store
        .schedule(
            ScheduleKind::RecurringCron,
            Trigger::Cron("0 * * * *".into()),
            "agent_turn",
            "b",
        )
        .await
        .unwrap();

    let revived = ScheduleStore::new().with_persistence(&path);
    assert_eq!(revived.load().await, 2);

    let listed = revived.list().await;
    assert_eq!(listed[0].id, a);
    assert_eq!(listed[1].id, b);
    assert_eq!(listed[0].payload, "a");
    assert_eq!(listed[1].kind, ScheduleKind::RecurringCron);
}
