// ABOUTME: Campaign tools - enumeration and metrics run automatically;
// ABOUTME: sending a campaign is gated behind user confirmation.

use serde_json::json;

use crate::error::ToolError;
use crate::session::AgentContext;
use crate::tool::{Registry, ToolDefinition, ToolResult, executor};

pub async fn install(registry: &Registry) -> Result<(), ToolError> {
    registry
        .register(ToolDefinition::auto(
            "list_campaigns",
            "Enumerate all campaigns with their current status.",
            json!({
                "type": "object",
                "properties": {}
            }),
            executor(list_campaigns),
        ))
        .await?;

    registry
        .register(ToolDefinition::auto(
            "get_campaign_metrics",
            "Retrieve delivery metrics (delivered, opens, clicks, rates) for a campaign.",
            json!({
                "type": "object",
                "properties": {
                    "campaign_id": { "type": "string", "description": "Campaign id" }
                },
                "required": ["campaign_id"]
            }),
            executor(campaign_metrics),
        ))
        .await?;

    registry
        .register(ToolDefinition::confirmed(
            "send_campaign",
            "Send a campaign to its audience. Asks the user for confirmation first.",
            json!({
                "type": "object",
                "properties": {
                    "campaign_id": { "type": "string", "description": "Campaign id to send" }
                },
                "required": ["campaign_id"]
            }),
        ))
        .await?;
    registry
        .register_confirmed("send_campaign", executor(send_campaign))
        .await?;

    Ok(())
}

async fn list_campaigns(
    ctx: AgentContext,
    _args: serde_json::Value,
) -> Result<ToolResult, anyhow::Error> {
    match ctx.api.campaigns().await {
        Ok(campaigns) => Ok(ToolResult::json(&campaigns)),
        Err(e) => Ok(ToolResult::error(format!(
            "Campaign retrieval failed: {}",
            e
        ))),
    }
}

async fn campaign_metrics(
    ctx: AgentContext,
    args: serde_json::Value,
) -> Result<ToolResult, anyhow::Error> {
    let id = args["campaign_id"].as_str().unwrap_or("");
    match ctx.api.campaign_metrics(id).await {
        Ok(metrics) => Ok(ToolResult::json(&metrics)),
        Err(e) => Ok(ToolResult::error(format!(
            "Metrics retrieval failed: {}",
            e
        ))),
    }
}

async fn send_campaign(
    ctx: AgentContext,
    args: serde_json::Value,
) -> Result<ToolResult, anyhow::Error> {
    let id = args["campaign_id"].as_str().unwrap_or("");
    match ctx.api.send_campaign(id).await {
        Ok(campaign) => Ok(ToolResult::json(&campaign)),
        Err(e) => Ok(ToolResult::error(format!("Campaign send failed: {}", e))),
    }
}
