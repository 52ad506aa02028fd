// ABOUTME: Defines ToolDefinition - the registration-time record for a tool,
// ABOUTME: plus the Executor callable type and the model-facing ToolSpec.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use super::ToolResult;
use crate::session::AgentContext;

/// Side-effect class of a tool.
///
/// Derived from registration-time executor presence: a tool registered
/// with an executor runs without approval, one registered without an
/// executor is parked by the gate until a human decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SideEffect {
    Auto,
    RequiresConfirmation,
}

/// An async tool executor.
///
/// Executors receive the session context explicitly; there is no ambient
/// state. Operational failures should be returned as error `ToolResult`s
/// with actionable messages; an `Err` is caught at the gate boundary and
/// converted into one.
pub type Executor = Arc<
    dyn Fn(AgentContext, serde_json::Value) -> BoxFuture<'static, Result<ToolResult, anyhow::Error>>
        + Send
        + Sync,
>;

/// Wrap an async closure as an [`Executor`].
pub fn executor<F, Fut>(f: F) -> Executor
where
    F: Fn(AgentContext, serde_json::Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ToolResult, anyhow::Error>> + Send + 'static,
{
    Arc::new(move |ctx, args| Box::pin(f(ctx, args)))
}

/// Registration-time record for a tool.
///
/// Constructed once at process start and immutable thereafter.
/// Confirmation-required tools carry no executor here; theirs lives in
/// the registry's confirmed-executor table and is resolved by name at
/// approval time.
#[derive(Clone)]
pub struct ToolDefinition {
    /// Unique name the model selects the tool by.
    pub name: String,

    /// Natural-language description for the model.
    pub description: String,

    /// JSON Schema for the tool's input arguments.
    pub input_schema: serde_json::Value,

    /// Auto-executor, present iff the tool runs without confirmation.
    pub executor: Option<Executor>,
}

impl ToolDefinition {
    /// Define an auto-executable tool.
    pub fn auto(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: serde_json::Value,
        executor: Executor,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            executor: Some(executor),
        }
    }

    /// Define a confirmation-required tool.
    pub fn confirmed(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            executor: None,
        }
    }

    /// Side-effect class, derived from executor presence.
    pub fn side_effect(&self) -> SideEffect {
        if self.executor.is_some() {
            SideEffect::Auto
        } else {
            SideEffect::RequiresConfirmation
        }
    }

    /// Project the model-facing contract.
    pub fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.input_schema.clone(),
        }
    }
}

impl fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("side_effect", &self.side_effect())
            .finish_non_exhaustive()
    }
}

/// Model-facing tool contract: name, description, and parameter shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}
