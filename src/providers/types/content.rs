use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Base trait for all content types
pub trait ContentType: Send + Sync {
    fn summary(&self) -> String;
}

// Text content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub text: String,
}

impl ContentType for Text {
    fn summary(&self) -> String {
        format!("content:text\n{}", self.text)
    }
}

/// A function call requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolUse {
    pub name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ContentType for ToolUse {
    fn summary(&self) -> String {
        format!(
            "content:tool_use:{}\narguments:{}",
            self.name,
            serde_json::to_string(&self.arguments).unwrap_or_default()
        )
    }
}

/// The output of an executed tool, keyed by the tool's name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub name: String,
    pub output: Value,
}

impl ContentType for ToolResult {
    fn summary(&self) -> String {
        format!("content:tool_result:{}\noutput:{}", self.name, self.output)
    }
}

// Enum to handle all content types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Content {
    Text(Text),
    ToolUse(ToolUse),
    ToolResult(ToolResult),
}

impl Content {
    pub fn text<S: Into<String>>(text: S) -> Self {
        Content::Text(Text { text: text.into() })
    }

    pub fn tool_use<S: Into<String>>(name: S, arguments: Map<String, Value>) -> Self {
        Content::ToolUse(ToolUse {
            name: name.into(),
            arguments,
        })
    }

    pub fn tool_result<S: Into<String>>(name: S, output: Value) -> Self {
        Content::ToolResult(ToolResult {
            name: name.into(),
            output,
        })
    }

    /// Get the text if this is a Text variant
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text(text) => Some(&text.text),
            _ => None,
        }
    }

    pub fn as_tool_use(&self) -> Option<&ToolUse> {
        match self {
            Content::ToolUse(tool_use) => Some(tool_use),
            _ => None,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Content::Text(t) => t.summary(),
            Content::ToolUse(t) => t.summary(),
            Content::ToolResult(t) => t.summary(),
        }
    }
}
