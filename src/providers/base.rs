use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::message::Message;
use super::types::tool::{GenerationConfig, ToolDeclaration};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: Option<i32>,
    pub output_tokens: Option<i32>,
    pub total_tokens: Option<i32>,
}

impl Usage {
    pub fn new(
        input_tokens: Option<i32>,
        output_tokens: Option<i32>,
        total_tokens: Option<i32>,
    ) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens,
        }
    }
}

/// Why the model stopped generating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishReason {
    Stop,
    ToolUse,
    MaxTokens,
    Safety,
    Other(String),
}

impl FinishReason {
    pub fn is_tool_use(&self) -> bool {
        matches!(self, FinishReason::ToolUse)
    }
}

/// A single reply from the backend
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub message: Message,
    pub finish_reason: FinishReason,
    pub usage: Usage,
}

impl ProviderResponse {
    pub fn new(message: Message, finish_reason: FinishReason) -> Self {
        Self {
            message,
            finish_reason,
            usage: Usage::default(),
        }
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = usage;
        self
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Credential rejected: {0}")]
    Unauthorized(String),

    #[error("{0}")]
    Request(String),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProviderError::Malformed(err.to_string())
        } else {
            ProviderError::Request(err.to_string())
        }
    }
}

/// Base trait for model backends
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate the next model turn for the conversation
    async fn complete(
        &self,
        system: &str,
        messages: &[Message],
        tools: &[ToolDeclaration],
        config: &GenerationConfig,
    ) -> Result<ProviderResponse, ProviderError>;
}
