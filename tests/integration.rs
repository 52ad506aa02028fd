// ABOUTME: Integration tests verifying modules work together.
// ABOUTME: Registry, gate, store, dispatcher, and API adapter end to end.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use herald::prelude::*;

/// A session double that records everything crossing the seam.
#[derive(Default)]
struct RecordingSession {
    results: std::sync::Mutex<Vec<(String, String, bool)>>,
    pending: std::sync::Mutex<Vec<(String, String)>>,
    actions: std::sync::Mutex<Vec<(String, String)>>,
}

#[async_trait::async_trait]
impl SessionHandle for RecordingSession {
    async fn push_tool_result(&self, call_id: &str, result: &ToolResult) {
        self.results.lock().unwrap().push((
            call_id.to_string(),
            result.content.clone(),
            result.is_error,
        ));
    }

    async fn notify_pending(&self, call: &ToolCall) {
        self.pending
            .lock()
            .unwrap()
            .push((call.id.clone(), call.tool.clone()));
    }

    async fn invoke_action(&self, action: &str, payload: &str) {
        self.actions
            .lock()
            .unwrap()
            .push((action.to_string(), payload.to_string()));
    }
}

async fn wired_up(
    api: ApiClient,
) -> (ConfirmationGate, AgentContext, Arc<RecordingSession>, Arc<ScheduleStore>) {
    let registry = Registry::new();
    herald::tools::install(&registry).await.unwrap();

    let session = Arc::new(RecordingSession::default());
    let store = Arc::new(ScheduleStore::new());
    let ctx = AgentContext::new(session.clone(), Arc::new(api), store.clone());
    (ConfirmationGate::new(registry), ctx, session, store)
}

#[tokio::test]
async fn test_auto_lookup_settles_inline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "prof-1", "email": "ada@example.com", "first_name": "Ada" }]
        })))
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri()).with_api_key("test-key");
    let (gate, ctx, _session, _store) = wired_up(api).await;

    let outcome = gate
        .dispatch(
            ToolCall::new("get_profile", json!({"email": "ada@example.com"})),
            &ctx,
        )
        .await;

    match outcome {
        GateOutcome::Settled { call, result } => {
            assert_eq!(call.state, CallState::Completed);
            assert!(result.content.contains("ada@example.com"));
        }
        GateOutcome::Pending { .. } => panic!("read operations settle inline"),
    }
}

#[tokio::test]
async fn test_confirmation_flow_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/campaigns/c-1/send"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "id": "c-1", "name": "Launch", "status": "sending" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri()).with_api_key("test-key");
    let (gate, ctx, session, _store) = wired_up(api).await;

    // The model asks to send; the call parks and the human is notified.
    let call = ToolCall::new("send_campaign", json!({"campaign_id": "c-1"}));
    let call_id = call.id.clone();
    match gate.dispatch(call, &ctx).await {
        GateOutcome::Pending { call_id: id } => assert_eq!(id, call_id),
        GateOutcome::Settled { .. } => panic!("send_campaign must park"),
    }
    assert_eq!(session.pending.lock().unwrap().len(), 1);

    // Approval runs the confirmed executor and folds the result back.
    let result = gate.resolve(&call_id, Verdict::Approve, &ctx).await.unwrap();
    assert!(!result.is_error);
    assert!(result.content.contains("sending"));

    let results = session.results.lock().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].0, call_id);
}

#[tokio::test]
async fn test_denied_send_touches_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri()).with_api_key("test-key");
    let (gate, ctx, session, _store) = wired_up(api).await;

    let call = ToolCall::new("send_campaign", json!({"campaign_id": "c-1"}));
    let call_id = call.id.clone();
    gate.dispatch(call, &ctx).await;

    let result = gate.resolve(&call_id, Verdict::Deny, &ctx).await.unwrap();
    assert!(result.content.contains("denied"));

    // The denial note reached history; no campaign went out.
    assert_eq!(session.results.lock().unwrap().len(), 1);
    assert!(gate.pending().await.is_empty());
}

#[tokio::test]
async fn test_schedule_list_fire_cycle() {
    let api = ApiClient::new("http://127.0.0.1:1");
    let (gate, ctx, session, store) = wired_up(api).await;

    // Schedule through the tool surface.
    let outcome = gate
        .dispatch(
            ToolCall::new(
                "schedule_task",
                json!({"type": "delayed", "when": 45, "payload": "check campaign stats"}),
            ),
            &ctx,
        )
        .await;
    let GateOutcome::Settled { result, .. } = outcome else {
        panic!("schedule_task is auto");
    };
    assert!(result.content.contains("schedule_id"));

    // Visible through list_tasks.
    let GateOutcome::Settled { result, .. } = gate
        .dispatch(ToolCall::new("list_tasks", json!({})), &ctx)
        .await
    else {
        panic!("list_tasks is auto");
    };
    assert!(result.content.contains("check campaign stats"));

    // The dispatcher fires it once and removes it; the firing bypasses
    // the gate entirely.
    let dispatcher = TaskDispatcher::new(store.clone(), ctx.session.clone());
    assert_eq!(dispatcher.poll_due(Utc::now() + Duration::seconds(46)).await, 1);
    assert!(store.list().await.is_empty());

    let actions = session.actions.lock().unwrap();
    assert_eq!(
        actions.as_slice(),
        &[(
            herald::tools::SCHEDULE_ACTION.to_string(),
            "check campaign stats".to_string()
        )]
    );
}

#[tokio::test]
async fn test_policy_screens_before_parking() {
    let api = ApiClient::new("http://127.0.0.1:1");
    let registry = Registry::new();
    herald::tools::install(&registry).await.unwrap();

    let session = Arc::new(RecordingSession::default());
    let store = Arc::new(ScheduleStore::new());
    let ctx = AgentContext::new(session.clone(), Arc::new(api), store);

    let gate = ConfirmationGate::new(registry)
        .with_policy(Policy::builder().deny_pattern("send_*").build());

    match gate
        .dispatch(
            ToolCall::new("send_campaign", json!({"campaign_id": "c-1"})),
            &ctx,
        )
        .await
    {
        GateOutcome::Settled { call, result } => {
            assert_eq!(call.state, CallState::Denied);
            assert!(result.content.contains("denied by policy"));
        }
        GateOutcome::Pending { .. } => panic!("policy-denied call must not park"),
    }
    assert!(session.pending.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_tool_specs_for_model() {
    let registry = Registry::new();
    herald::tools::install(&registry).await.unwrap();

    let specs = registry.to_specs().await;
    assert_eq!(specs.len(), 12);

    let send = specs.iter().find(|s| s.name == "send_campaign").unwrap();
    assert!(send.description.contains("confirmation"));
    assert!(send.input_schema["properties"]["campaign_id"].is_object());
}
