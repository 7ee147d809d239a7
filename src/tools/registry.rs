use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt::Debug;
use tracing::debug;

use super::executor::{ToolError, ToolExecutor};
use crate::providers::types::tool::ToolDeclaration;

type ToolFn = Box<dyn Fn(&Map<String, Value>) -> Result<Value> + Send + Sync>;

/// A tool that can be used by a model.
pub struct Tool {
    pub declaration: ToolDeclaration,
    /// The function that powers the tool
    pub function: ToolFn,
}

impl Tool {
    pub fn new(
        declaration: ToolDeclaration,
        function: impl Fn(&Map<String, Value>) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Tool {
            declaration,
            function: Box::new(function),
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name
    }
}

impl Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("declaration", &self.declaration)
            .field("function", &"<function>")
            .finish()
    }
}

/// Named tools in registration order
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Tool) -> Result<()> {
        if self.get(tool.name()).is_some() {
            return Err(anyhow!("Duplicate tool name: {}", tool.name()));
        }
        self.tools.push(tool);
        Ok(())
    }

    pub fn with_tool(mut self, tool: Tool) -> Result<Self> {
        self.register(tool)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|tool| tool.name() == name)
    }

    pub fn declarations(&self) -> Vec<ToolDeclaration> {
        self.tools.iter().map(|tool| tool.declaration.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[async_trait]
impl ToolExecutor for ToolRegistry {
    async fn execute(&self, name: &str, arguments: &Map<String, Value>) -> Result<Value, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        debug!(tool = name, "executing tool");
        // tools may fail with a typed ToolError; anything else is an execution failure
        (tool.function)(arguments).map_err(|e| {
            e.downcast::<ToolError>()
                .unwrap_or_else(|e| ToolError::ExecutionError(e.to_string()))
        })
    }
}
