// ABOUTME: Defines ToolCall and its lifecycle states.
// ABOUTME: Serializable so pending calls survive a durable-session restart.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a model-issued tool call.
///
/// `PendingModel → {AutoRunning | AwaitingConfirmation} → {Completed |
/// Failed | Denied}`; approval passes through `Approved` before the
/// confirmed executor runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallState {
    PendingModel,
    AutoRunning,
    AwaitingConfirmation,
    Approved,
    Denied,
    Completed,
    Failed,
}

impl CallState {
    /// Whether this state ends the call's lifecycle.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Denied)
    }
}

/// A single model-issued tool invocation.
///
/// Created when the model emits a call; mutated only by the gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique per invocation.
    pub id: String,

    /// Name of the tool being invoked.
    pub tool: String,

    /// Raw arguments as emitted by the model.
    pub arguments: serde_json::Value,

    /// Current lifecycle state.
    pub state: CallState,
}

impl ToolCall {
    /// Create a call with a fresh id.
    pub fn new(tool: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), tool, arguments)
    }

    /// Create a call with a caller-supplied id (e.g. the model's own
    /// tool-use id, so results can be correlated).
    pub fn with_id(
        id: impl Into<String>,
        tool: impl Into<String>,
        arguments: serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            tool: tool.into(),
            arguments,
            state: CallState::PendingModel,
        }
    }
}
