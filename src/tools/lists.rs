// ABOUTME: List tools - enumeration runs automatically; list creation and
// ABOUTME: membership changes are gated behind user confirmation.

use serde::Deserialize;
use serde_json::json;

use super::profiles::valid_email;
use crate::error::{ApiError, ToolError};
use crate::session::AgentContext;
use crate::tool::{Registry, ToolDefinition, ToolResult, executor};

pub async fn install(registry: &Registry) -> Result<(), ToolError> {
    registry
        .register(ToolDefinition::auto(
            "list_lists",
            "Enumerate all subscriber lists.",
            json!({
                "type": "object",
                "properties": {}
            }),
            executor(list_lists),
        ))
        .await?;

    registry
        .register(ToolDefinition::confirmed(
            "create_list",
            "Create a new subscriber list. Asks the user for confirmation first.",
            json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Name of the new list" }
                },
                "required": ["name"]
            }),
        ))
        .await?;
    registry
        .register_confirmed("create_list", executor(create_list))
        .await?;

    registry
        .register(ToolDefinition::confirmed(
            "subscribe_profile",
            "Add a subscriber, found by email address, to a list. \
             Asks the user for confirmation first.",
            json!({
                "type": "object",
                "properties": {
                    "email": {
                        "type": "string",
                        "description": "Email of the profile to subscribe"
                    },
                    "list_id": { "type": "string", "description": "Target list id" }
                },
                "required": ["email", "list_id"]
            }),
        ))
        .await?;
    registry
        .register_confirmed("subscribe_profile", executor(subscribe_profile))
        .await?;

    Ok(())
}

async fn list_lists(
    ctx: AgentContext,
    _args: serde_json::Value,
) -> Result<ToolResult, anyhow::Error> {
    match ctx.api.lists().await {
        Ok(lists) => Ok(ToolResult::json(&lists)),
        Err(e) => Ok(ToolResult::error(format!("List retrieval failed: {}", e))),
    }
}

async fn create_list(
    ctx: AgentContext,
    args: serde_json::Value,
) -> Result<ToolResult, anyhow::Error> {
    let name = args["name"].as_str().unwrap_or("");
    if name.trim().is_empty() {
        return Ok(ToolResult::error("List name must not be empty"));
    }

    match ctx.api.create_list(name).await {
        Ok(list) => Ok(ToolResult::json(&list)),
        Err(e) => Ok(ToolResult::error(format!("List creation failed: {}", e))),
    }
}

/// Membership changes go by internal profile id, so the id is resolved
/// by email first; a miss refuses to mutate.
async fn subscribe_profile(
    ctx: AgentContext,
    args: serde_json::Value,
) -> Result<ToolResult, anyhow::Error> {
    #[derive(Deserialize)]
    struct Params {
        email: String,
        list_id: String,
    }

    let params: Params = serde_json::from_value(args)?;
    if !valid_email(&params.email) {
        return Ok(ToolResult::error(format!(
            "'{}' does not look like an email address",
            params.email
        )));
    }

    let profile = match ctx.api.require_profile(&params.email).await {
        Ok(profile) => profile,
        Err(e @ ApiError::NotFound(_)) => {
            return Ok(ToolResult::error(format!("{}; nobody was subscribed", e)));
        }
        Err(e) => return Ok(ToolResult::error(format!("Profile lookup failed: {}", e))),
    };

    match ctx.api.subscribe(&params.list_id, &profile.id).await {
        Ok(()) => Ok(ToolResult::text(format!(
            "Subscribed '{}' to list {}",
            params.email, params.list_id
        ))),
        Err(e) => Ok(ToolResult::error(format!("Subscription failed: {}", e))),
    }
}
