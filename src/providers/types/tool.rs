use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The schema of a tool the model may call.
///
/// Declarations are handed to the backend as-is; nothing here checks the
/// name or the parameter schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDeclaration {
    /// The name of the tool
    pub name: String,
    /// A description of what the tool does
    pub description: String,
    /// A json schema of the function signature
    pub parameters: Value,
}

impl ToolDeclaration {
    pub fn new<N, D>(name: N, description: D, parameters: Value) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// Decoding settings sent with every request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub temperature: f32,
}

impl GenerationConfig {
    /// Greedy decoding, so the same conversation yields the same answer
    pub fn deterministic() -> Self {
        Self { temperature: 0.0 }
    }
}
