// ABOUTME: The confirmation gate - classifies model-issued tool calls,
// ABOUTME: runs auto tools inline, and parks the rest until a decision.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::{CallState, Decision, Policy, ToolCall};
use crate::error::GateError;
use crate::session::AgentContext;
use crate::tool::{Registry, SideEffect, ToolResult};

/// A human decision on a parked call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approve,
    Deny,
}

/// Outcome of dispatching a tool call through the gate.
#[derive(Debug)]
pub enum GateOutcome {
    /// The call settled inline; fold the result into the current turn.
    Settled { call: ToolCall, result: ToolResult },

    /// The call is parked; the model is told only that confirmation is
    /// pending, and the result arrives out-of-band via [`ConfirmationGate::resolve`].
    Pending { call_id: String },
}

#[derive(Default)]
struct PendingTable {
    calls: HashMap<String, ToolCall>,
    order: Vec<String>,
}

impl PendingTable {
    fn insert(&mut self, call: ToolCall) {
        self.order.push(call.id.clone());
        self.calls.insert(call.id.clone(), call);
    }

    fn remove(&mut self, id: &str) -> Option<ToolCall> {
        let call = self.calls.remove(id)?;
        self.order.retain(|x| x != id);
        Some(call)
    }

    fn in_order(&self) -> Vec<ToolCall> {
        self.order
            .iter()
            .filter_map(|id| self.calls.get(id).cloned())
            .collect()
    }
}

/// The state machine at the center of the system.
///
/// Results for calls settled inline are returned to the caller, which
/// folds them into the turn. Results for calls settled out-of-band
/// (approval, denial) are pushed into history through the session
/// handle, so the model sees one uniform contract either way.
pub struct ConfirmationGate {
    registry: Registry,
    policy: Policy,
    pending: Arc<RwLock<PendingTable>>,
}

impl ConfirmationGate {
    /// Create a gate over a registry with a passthrough policy.
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            policy: Policy::default(),
            pending: Arc::new(RwLock::new(PendingTable::default())),
        }
    }

    /// Replace the screening policy.
    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// Dispatch a model-issued tool call.
    ///
    /// Arguments are validated before any executor runs. Auto tools
    /// execute inline and settle as Completed or Failed; confirmation-
    /// required tools are parked and surfaced to the human collaborator.
    /// Executor errors never escape: they become error results so the
    /// conversation continues.
    pub async fn dispatch(&self, mut call: ToolCall, ctx: &AgentContext) -> GateOutcome {
        let args = match self.registry.validate(&call.tool, &call.arguments).await {
            Ok(args) => args,
            Err(e) => {
                debug!(tool = %call.tool, id = %call.id, error = %e, "rejected before execution");
                call.state = CallState::Failed;
                return GateOutcome::Settled {
                    result: ToolResult::error(e.to_string()),
                    call,
                };
            }
        };

        if self.policy.evaluate(&call.tool, &args) == Decision::Deny {
            info!(tool = %call.tool, id = %call.id, "denied by policy");
            call.state = CallState::Denied;
            return GateOutcome::Settled {
                result: ToolResult::error(format!("Tool '{}' denied by policy", call.tool)),
                call,
            };
        }

        // resolve cannot miss here: validate already found the tool.
        let def = match self.registry.resolve(&call.tool).await {
            Ok(def) => def,
            Err(e) => {
                call.state = CallState::Failed;
                return GateOutcome::Settled {
                    result: ToolResult::error(e.to_string()),
                    call,
                };
            }
        };

        match def.side_effect() {
            SideEffect::Auto => {
                call.state = CallState::AutoRunning;
                let Some(exec) = def.executor else {
                    call.state = CallState::Failed;
                    return GateOutcome::Settled {
                        result: ToolResult::error(
                            GateError::ExecutorNotFound(call.tool.clone()).to_string(),
                        ),
                        call,
                    };
                };

                let result = match exec(ctx.clone(), args).await {
                    Ok(r) => r,
                    Err(e) => ToolResult::error(format!("Tool execution failed: {}", e)),
                };
                call.state = if result.is_error {
                    CallState::Failed
                } else {
                    CallState::Completed
                };
                debug!(tool = %call.tool, id = %call.id, state = ?call.state, "auto tool settled");
                GateOutcome::Settled { call, result }
            }
            SideEffect::RequiresConfirmation => {
                call.state = CallState::AwaitingConfirmation;
                call.arguments = args;
                info!(tool = %call.tool, id = %call.id, "awaiting confirmation");

                let call_id = call.id.clone();
                self.pending.write().await.insert(call.clone());
                ctx.session.notify_pending(&call).await;
                GateOutcome::Pending { call_id }
            }
        }
    }

    /// Apply an out-of-band decision to a parked call.
    ///
    /// On approval the confirmed executor runs and the call settles
    /// exactly as an auto tool would; on denial no executor runs and a
    /// denial note becomes the result. Either way the result is pushed
    /// into conversation history through the session handle.
    ///
    /// A tool with no confirmed executor fails the transition with
    /// [`GateError::ExecutorNotFound`] and the call stays parked: that
    /// is a configuration inconsistency to surface, not swallow.
    pub async fn resolve(
        &self,
        call_id: &str,
        verdict: Verdict,
        ctx: &AgentContext,
    ) -> Result<ToolResult, GateError> {
        let mut table = self.pending.write().await;

        match verdict {
            Verdict::Deny => {
                let Some(mut call) = table.remove(call_id) else {
                    return Err(GateError::UnknownCall(call_id.to_string()));
                };
                drop(table);

                call.state = CallState::Denied;
                let result = ToolResult::text(format!(
                    "User denied the '{}' request; no action was taken.",
                    call.tool
                ));
                info!(tool = %call.tool, id = %call.id, "denied by user");
                ctx.session.push_tool_result(&call.id, &result).await;
                Ok(result)
            }
            Verdict::Approve => {
                let Some(tool) = table.calls.get(call_id).map(|c| c.tool.clone()) else {
                    return Err(GateError::UnknownCall(call_id.to_string()));
                };
                let Some(exec) = self.registry.confirmed_executor(&tool).await else {
                    warn!(tool = %tool, id = %call_id, "approved but no confirmed executor");
                    return Err(GateError::ExecutorNotFound(tool));
                };
                let Some(mut call) = table.remove(call_id) else {
                    return Err(GateError::UnknownCall(call_id.to_string()));
                };
                drop(table);

                call.state = CallState::Approved;
                let result = match exec(ctx.clone(), call.arguments.clone()).await {
                    Ok(r) => r,
                    Err(e) => ToolResult::error(format!("Tool execution failed: {}", e)),
                };
                call.state = if result.is_error {
                    CallState::Failed
                } else {
                    CallState::Completed
                };
                info!(tool = %call.tool, id = %call.id, state = ?call.state, "confirmed tool settled");
                ctx.session.push_tool_result(&call.id, &result).await;
                Ok(result)
            }
        }
    }

    /// All parked calls, oldest first.
    pub async fn pending(&self) -> Vec<ToolCall> {
        self.pending.read().await.in_order()
    }

    /// Snapshot parked calls for durable-session persistence.
    pub async fn snapshot(&self) -> Vec<ToolCall> {
        self.pending().await
    }

    /// Restore parked calls from a snapshot, oldest first.
    pub async fn restore(&self, calls: Vec<ToolCall>) {
        let mut table = self.pending.write().await;
        for mut call in calls {
            call.state = CallState::AwaitingConfirmation;
            table.insert(call);
        }
    }
}
