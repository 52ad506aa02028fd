// ABOUTME: Prelude module - convenient imports for common use cases.
// ABOUTME: Use `use herald::prelude::*;` to get started quickly.

pub use crate::api::{
    ApiClient, Campaign, CampaignMetrics, List, Profile, ProfileAttributes, ProfileUpdate,
};
pub use crate::error::{ApiError, GateError, HeraldError, ScheduleError, ToolError};
pub use crate::gate::{
    CallState, ConfirmationGate, Decision, GateOutcome, Policy, PolicyBuilder, ToolCall, Verdict,
};
pub use crate::schedule::{
    PastDuePolicy, ScheduleDescriptor, ScheduleKind, ScheduleRequest, ScheduleStore,
    TaskDispatcher, Trigger,
};
pub use crate::session::{AgentContext, NoopSession, SessionHandle};
pub use crate::tool::{
    Executor, Registry, SideEffect, ToolDefinition, ToolResult, ToolSpec, executor,
};
