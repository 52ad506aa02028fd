// ABOUTME: Session seam - the trait the chat host implements, plus the
// ABOUTME: explicit per-call context handed to every executor.

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::ApiClient;
use crate::gate::ToolCall;
use crate::schedule::ScheduleStore;
use crate::tool::ToolResult;

/// The owning chat session, as seen from inside the library.
///
/// The transport and presentation layers live behind this trait. The
/// gate uses it to fold out-of-band outcomes back into conversation
/// history and to surface pending confirmations; the dispatcher uses it
/// to invoke scheduled follow-up actions.
#[async_trait]
pub trait SessionHandle: Send + Sync {
    /// Append a settled tool result to conversation history.
    async fn push_tool_result(&self, call_id: &str, result: &ToolResult);

    /// Surface a confirmation-required call to the human collaborator.
    async fn notify_pending(&self, call: &ToolCall);

    /// Invoke a named follow-up action with a string payload.
    async fn invoke_action(&self, action: &str, payload: &str);
}

/// A session handle that ignores everything. Useful as a placeholder
/// when wiring components that never reach the session seam.
pub struct NoopSession;

#[async_trait]
impl SessionHandle for NoopSession {
    async fn push_tool_result(&self, _call_id: &str, _result: &ToolResult) {}

    async fn notify_pending(&self, _call: &ToolCall) {}

    async fn invoke_action(&self, _action: &str, _payload: &str) {}
}

/// Context passed explicitly into every executor call.
///
/// Executors never reach for globals; everything session-scoped arrives
/// through this handle.
#[derive(Clone)]
pub struct AgentContext {
    pub session: Arc<dyn SessionHandle>,
    pub api: Arc<ApiClient>,
    pub schedules: Arc<ScheduleStore>,
}

impl AgentContext {
    pub fn new(
        session: Arc<dyn SessionHandle>,
        api: Arc<ApiClient>,
        schedules: Arc<ScheduleStore>,
    ) -> Self {
        Self {
            session,
            api,
            schedules,
        }
    }
}
