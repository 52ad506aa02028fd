// ABOUTME: Built-in tools for the marketing agent, grouped by resource.
// ABOUTME: install() registers every tool and confirmed executor.

mod campaigns;
mod lists;
mod profiles;
mod schedule;

pub use schedule::SCHEDULE_ACTION;

use crate::error::ToolError;
use crate::tool::Registry;

/// Register every built-in tool against a registry.
pub async fn install(registry: &Registry) -> Result<(), ToolError> {
    profiles::install(registry).await?;
    lists::install(registry).await?;
    campaigns::install(registry).await?;
    schedule::install(registry).await?;
    Ok(())
}
