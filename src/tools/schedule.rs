// ABOUTME: Scheduling tools - register, list, and cancel follow-up tasks.
// ABOUTME: All three mutate only herald's own store, so they run automatically.

use serde_json::json;

use crate::error::ToolError;
use crate::schedule::ScheduleRequest;
use crate::session::AgentContext;
use crate::tool::{Registry, ToolDefinition, ToolResult, executor};

/// Action invoked by every firing registered through `schedule_task`.
/// The session host decides what an "agent turn" means.
pub const SCHEDULE_ACTION: &str = "agent_turn";

pub async fn install(registry: &Registry) -> Result<(), ToolError> {
    registry
        .register(ToolDefinition::auto(
            "schedule_task",
            "Schedule a follow-up task: at an absolute time, after a delay, \
             or on a recurring cron expression.",
            json!({
                "type": "object",
                "properties": {
                    "type": {
                        "type": "string",
                        "enum": ["scheduled", "delayed", "cron", "no-schedule"],
                        "description": "How to interpret 'when'"
                    },
                    "when": {
                        "description": "ISO-8601 date for 'scheduled', integer seconds \
                                        for 'delayed', cron expression for 'cron'"
                    },
                    "payload": {
                        "type": "string",
                        "description": "Prompt handed to the follow-up task when it fires"
                    }
                },
                "required": ["type"]
            }),
            executor(schedule_task),
        ))
        .await?;

    registry
        .register(ToolDefinition::auto(
            "list_tasks",
            "List all pending scheduled tasks in creation order.",
            json!({
                "type": "object",
                "properties": {}
            }),
            executor(list_tasks),
        ))
        .await?;

    registry
        .register(ToolDefinition::auto(
            "cancel_task",
            "Cancel a pending scheduled task by id.",
            json!({
                "type": "object",
                "properties": {
                    "task_id": { "type": "string", "description": "Id of the task to cancel" }
                },
                "required": ["task_id"]
            }),
            executor(cancel_task),
        ))
        .await?;

    Ok(())
}

async fn schedule_task(
    ctx: AgentContext,
    args: serde_json::Value,
) -> Result<ToolResult, anyhow::Error> {
    let request: ScheduleRequest = serde_json::from_value(args)?;

    match ctx.schedules.schedule_request(&request, SCHEDULE_ACTION).await {
        Ok(Some(id)) => Ok(ToolResult::json(&json!({ "schedule_id": id }))),
        Ok(None) => Ok(ToolResult::text(
            "No schedule requested; nothing was registered.",
        )),
        Err(e) => Ok(ToolResult::error(e.to_string())),
    }
}

async fn list_tasks(
    ctx: AgentContext,
    _args: serde_json::Value,
) -> Result<ToolResult, anyhow::Error> {
    let descriptors = ctx.schedules.list().await;
    Ok(ToolResult::json(&descriptors))
}

async fn cancel_task(
    ctx: AgentContext,
    args: serde_json::Value,
) -> Result<ToolResult, anyhow::Error> {
    let id = args["task_id"].as_str().unwrap_or("");
    match ctx.schedules.cancel(id).await {
        Ok(()) => Ok(ToolResult::text(format!("Cancelled task {}", id))),
        Err(e) => Ok(ToolResult::error(e.to_string())),
    }
}
