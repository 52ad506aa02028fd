// ABOUTME: Profile tools - lookup by email runs automatically; create and
// ABOUTME: update are gated behind user confirmation.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::json;

use crate::api::{ProfileAttributes, ProfileUpdate};
use crate::error::{ApiError, ToolError};
use crate::session::AgentContext;
use crate::tool::{Registry, ToolDefinition, ToolResult, executor};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

pub(crate) fn valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub async fn install(registry: &Registry) -> Result<(), ToolError> {
    registry
        .register(ToolDefinition::auto(
            "get_profile",
            "Look up a subscriber profile by email address.",
            json!({
                "type": "object",
                "properties": {
                    "email": {
                        "type": "string",
                        "description": "Email address to look up"
                    }
                },
                "required": ["email"]
            }),
            executor(get_profile),
        ))
        .await?;

    registry
        .register(ToolDefinition::confirmed(
            "create_profile",
            "Create a new subscriber profile. Asks the user for confirmation first.",
            json!({
                "type": "object",
                "properties": {
                    "email": { "type": "string", "description": "Email address" },
                    "first_name": { "type": "string" },
                    "last_name": { "type": "string" },
                    "properties": {
                        "type": "object",
                        "description": "Free-form custom properties"
                    }
                },
                "required": ["email"]
            }),
        ))
        .await?;
    registry
        .register_confirmed("create_profile", executor(create_profile))
        .await?;

    registry
        .register(ToolDefinition::confirmed(
            "update_profile",
            "Update an existing subscriber profile, found by email address. \
             Asks the user for confirmation first.",
            json!({
                "type": "object",
                "properties": {
                    "email": {
                        "type": "string",
                        "description": "Email of the profile to update"
                    },
                    "first_name": { "type": "string" },
                    "last_name": { "type": "string" },
                    "properties": { "type": "object" }
                },
                "required": ["email"]
            }),
        ))
        .await?;
    registry
        .register_confirmed("update_profile", executor(update_profile))
        .await?;

    Ok(())
}

async fn get_profile(
    ctx: AgentContext,
    args: serde_json::Value,
) -> Result<ToolResult, anyhow::Error> {
    let email = args["email"].as_str().unwrap_or("");
    if !valid_email(email) {
        return Ok(ToolResult::error(format!(
            "'{}' does not look like an email address",
            email
        )));
    }

    match ctx.api.require_profile(email).await {
        Ok(profile) => Ok(ToolResult::json(&profile)),
        Err(e @ ApiError::NotFound(_)) => Ok(ToolResult::error(e.to_string())),
        Err(e) => Ok(ToolResult::error(format!("Profile lookup failed: {}", e))),
    }
}

async fn create_profile(
    ctx: AgentContext,
    args: serde_json::Value,
) -> Result<ToolResult, anyhow::Error> {
    let attrs: ProfileAttributes = serde_json::from_value(args)?;
    if !valid_email(&attrs.email) {
        return Ok(ToolResult::error(format!(
            "'{}' does not look like an email address",
            attrs.email
        )));
    }

    match ctx.api.create_profile(&attrs).await {
        Ok(profile) => Ok(ToolResult::json(&profile)),
        Err(e) => Ok(ToolResult::error(format!("Profile creation failed: {}", e))),
    }
}

/// The platform only updates profiles by internal id, so this resolves
/// the id by email first and refuses to mutate when the lookup misses.
async fn update_profile(
    ctx: AgentContext,
    args: serde_json::Value,
) -> Result<ToolResult, anyhow::Error> {
    #[derive(Deserialize)]
    struct Params {
        email: String,
        #[serde(flatten)]
        update: ProfileUpdate,
    }

    let params: Params = serde_json::from_value(args)?;

    let profile = match ctx.api.require_profile(&params.email).await {
        Ok(profile) => profile,
        Err(e @ ApiError::NotFound(_)) => {
            return Ok(ToolResult::error(format!("{}; nothing was updated", e)));
        }
        Err(e) => return Ok(ToolResult::error(format!("Profile lookup failed: {}", e))),
    };

    match ctx.api.update_profile(&profile.id, &params.update).await {
        Ok(updated) => Ok(ToolResult::json(&updated)),
        Err(e) => Ok(ToolResult::error(format!("Profile update failed: {}", e))),
    }
}
