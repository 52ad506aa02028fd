// ABOUTME: Implements the Registry - a thread-safe catalog of tool
// ABOUTME: definitions plus the confirmed-executor table.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::{Executor, SideEffect, ToolDefinition, ToolSpec, schema};
use crate::error::ToolError;

#[derive(Default)]
struct Inner {
    tools: HashMap<String, ToolDefinition>,
    confirmed: HashMap<String, Executor>,
}

/// A thread-safe registry of tools.
///
/// Populated once at process start; lookups afterwards never mutate it.
/// Auto tools carry their executor in the definition; confirmation-
/// required tools resolve theirs by name in the confirmed-executor
/// table at approval time.
#[derive(Default)]
pub struct Registry {
    inner: Arc<RwLock<Inner>>,
}

impl Registry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool definition.
    pub async fn register(&self, def: ToolDefinition) -> Result<(), ToolError> {
        let mut inner = self.inner.write().await;
        if inner.tools.contains_key(&def.name) {
            return Err(ToolError::DuplicateName(def.name));
        }
        inner.tools.insert(def.name.clone(), def);
        Ok(())
    }

    /// Register the side-effecting implementation of a confirmation-
    /// required tool. Runs only after an approval decision.
    pub async fn register_confirmed(
        &self,
        name: impl Into<String>,
        exec: Executor,
    ) -> Result<(), ToolError> {
        let name = name.into();
        let mut inner = self.inner.write().await;
        if inner.confirmed.contains_key(&name) {
            return Err(ToolError::DuplicateName(name));
        }
        inner.confirmed.insert(name, exec);
        Ok(())
    }

    /// Resolve a tool definition by name.
    pub async fn resolve(&self, name: &str) -> Result<ToolDefinition, ToolError> {
        let inner = self.inner.read().await;
        inner
            .tools
            .get(name)
            .cloned()
            .ok_or_else(|| ToolError::Unknown(name.to_string()))
    }

    /// Classify a tool by registration-time executor presence.
    pub async fn classify(&self, name: &str) -> Result<SideEffect, ToolError> {
        Ok(self.resolve(name).await?.side_effect())
    }

    /// Validate raw arguments against the tool's input schema.
    ///
    /// Must run before any executor is invoked, for both classes.
    pub async fn validate(
        &self,
        name: &str,
        raw: &serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let def = self.resolve(name).await?;
        schema::validate(&def.input_schema, raw)
    }

    /// Look up the confirmed executor for a tool, if one is registered.
    pub async fn confirmed_executor(&self, name: &str) -> Option<Executor> {
        let inner = self.inner.read().await;
        inner.confirmed.get(name).cloned()
    }

    /// List all tool names, sorted alphabetically.
    pub async fn list(&self) -> Vec<String> {
        let inner = self.inner.read().await;
        let mut names: Vec<_> = inner.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get the number of registered tools.
    pub async fn count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.tools.len()
    }

    /// Project the model-facing contract for every tool, sorted by name.
    pub async fn to_specs(&self) -> Vec<ToolSpec> {
        let inner = self.inner.read().await;
        let mut specs: Vec<_> = inner.tools.values().map(ToolDefinition::spec).collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }
}

impl Clone for Registry {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
