use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::content::{Content, ToolUse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One turn of the conversation sent to or received from the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<Content>,
}

impl Message {
    pub fn new(role: Role, content: Vec<Content>) -> Self {
        Self { role, content }
    }

    /// Create an empty user turn
    pub fn user() -> Self {
        Self::new(Role::User, Vec::new())
    }

    /// Create an empty model turn
    pub fn model() -> Self {
        Self::new(Role::Model, Vec::new())
    }

    pub fn with_content(mut self, content: Content) -> Self {
        self.content.push(content);
        self
    }

    pub fn with_text<S: Into<String>>(self, text: S) -> Self {
        self.with_content(Content::text(text))
    }

    pub fn with_tool_use<S: Into<String>>(self, name: S, arguments: Map<String, Value>) -> Self {
        self.with_content(Content::tool_use(name, arguments))
    }

    pub fn with_tool_result<S: Into<String>>(self, name: S, output: Value) -> Self {
        self.with_content(Content::tool_result(name, output))
    }

    /// The first text part, if any
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(Content::as_text)
    }

    pub fn tool_use(&self) -> Vec<ToolUse> {
        self.content
            .iter()
            .filter_map(|content| content.as_tool_use().cloned())
            .collect()
    }

    pub fn has_tool_use(&self) -> bool {
        self.content.iter().any(|c| matches!(c, Content::ToolUse(_)))
    }

    pub fn summary(&self) -> String {
        let content_summaries: Vec<String> = self.content.iter().map(|c| c.summary()).collect();
        format!("message:{:?}\n{}", self.role, content_summaries.join("\n"))
    }
}
