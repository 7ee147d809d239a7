use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::base::{FinishReason, Provider, ProviderError, ProviderResponse};
use super::types::message::Message;
use super::types::tool::{GenerationConfig, ToolDeclaration};

/// A request the mock provider received
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system: String,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolDeclaration>,
    pub config: GenerationConfig,
}

/// A mock provider that returns pre-configured responses and records every call
pub struct MockProvider {
    responses: Arc<Mutex<Vec<Result<ProviderResponse, ProviderError>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockProvider {
    /// Create a new mock provider with a sequence of responses
    pub fn new(responses: Vec<Result<ProviderResponse, ProviderError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(
        &self,
        system: &str,
        messages: &[Message],
        tools: &[ToolDeclaration],
        config: &GenerationConfig,
    ) -> Result<ProviderResponse, ProviderError> {
        self.calls.lock().unwrap().push(RecordedCall {
            system: system.to_string(),
            messages: messages.to_vec(),
            tools: tools.to_vec(),
            config: *config,
        });

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // Return empty response if no more pre-configured responses
            Ok(ProviderResponse::new(Message::model(), FinishReason::Stop))
        } else {
            responses.remove(0)
        }
    }
}
