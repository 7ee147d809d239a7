use std::sync::Arc;
use tracing::{debug, info_span, trace, Instrument};
use uuid::Uuid;

use crate::errors::{GenerateError, GenerateResult, Phase};
use crate::providers::base::{Provider, ProviderResponse};
use crate::providers::configs::gemini::GeminiProviderConfig;
use crate::providers::gemini::GeminiProvider;
use crate::providers::types::message::Message;
use crate::providers::types::tool::{GenerationConfig, ToolDeclaration};
use crate::tools::{ToolError, ToolExecutor};

/// System instruction sent with every request
pub const SYSTEM_PROMPT: &str = "\
You are an assistant for course materials and educational content, with access to a search tool over the course content.

Search tool usage:
- Search only for questions about specific course content or detailed course material
- Search at most once per query
- Turn search results into accurate, factual answers
- If a search returns nothing, say so plainly and do not offer alternatives

Answering:
- General knowledge questions: answer from existing knowledge without searching
- Course-specific questions: search first, then answer
- No meta-commentary: give the answer only, with no reasoning, no description of the search, and no phrases like \"based on the search results\"

Every answer must be:
1. Brief and focused
2. Educational
3. Clear, in accessible language
4. Illustrated with an example when that helps understanding

Answer only what was asked.
";

/// Turns a query (plus optional context and tools) into a single text answer
///
/// A call makes one request to the backend and, when the backend asks for
/// tools, runs them in order and makes exactly one follow-up request. The
/// generator holds no per-call state, so one instance can serve concurrent
/// callers.
#[derive(Clone)]
pub struct ResponseGenerator {
    provider: Arc<dyn Provider>,
    system_prompt: &'static str,
}

impl ResponseGenerator {
    /// Create a generator backed by Gemini
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> GenerateResult<Self> {
        Self::from_config(GeminiProviderConfig::new(api_key.into(), model.into()))
    }

    pub fn from_config(config: GeminiProviderConfig) -> GenerateResult<Self> {
        let provider =
            GeminiProvider::new(config).map_err(|e| GenerateError::AuthConfiguration {
                phase: None,
                message: e.to_string(),
            })?;
        Ok(Self::with_provider(Arc::new(provider)))
    }

    pub fn with_provider(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            system_prompt: SYSTEM_PROMPT,
        }
    }

    pub fn system_prompt(&self) -> &str {
        self.system_prompt
    }

    /// Answer `query`, optionally letting the backend call `tools` through `executor`
    pub async fn generate(
        &self,
        query: &str,
        history: Option<&str>,
        tools: &[ToolDeclaration],
        executor: Option<&dyn ToolExecutor>,
    ) -> GenerateResult<String> {
        if query.trim().is_empty() {
            return Err(GenerateError::EmptyQuery);
        }

        let span = info_span!(
            "generate",
            request_id = %format!("gen_{}", Uuid::new_v4().simple()),
            tools = tools.len()
        );

        async move {
            debug!(state = "building_request");
            let mut messages = Vec::with_capacity(3);
            if let Some(history) = history.filter(|h| !h.is_empty()) {
                messages.push(Message::model().with_text(history));
            }
            messages.push(Message::user().with_text(query));

            debug!(state = "awaiting_first_reply", turns = messages.len());
            let first = self.call(Phase::FirstCall, &messages, tools).await?;
            trace!(reply = %first.message.summary());
            if !first.finish_reason.is_tool_use() {
                debug!(state = "done", finish_reason = ?first.finish_reason);
                return first_text(Phase::FirstCall, &first);
            }

            debug!(state = "executing_tools");
            let results = execute_tools(&first.message, executor).await?;
            if !results.content.is_empty() {
                messages.push(results);
            }

            // No tools on the follow-up, so the backend has to answer
            debug!(state = "awaiting_second_reply", turns = messages.len());
            let second = self.call(Phase::SecondCall, &messages, &[]).await?;
            trace!(reply = %second.message.summary());
            debug!(state = "done", finish_reason = ?second.finish_reason);
            first_text(Phase::SecondCall, &second)
        }
        .instrument(span)
        .await
    }

    async fn call(
        &self,
        phase: Phase,
        messages: &[Message],
        tools: &[ToolDeclaration],
    ) -> GenerateResult<ProviderResponse> {
        self.provider
            .complete(
                self.system_prompt,
                messages,
                tools,
                &GenerationConfig::deterministic(),
            )
            .await
            .map_err(|e| GenerateError::from_provider(phase, e))
    }
}

/// Run every requested tool in order, collecting the results into one user turn
async fn execute_tools(
    reply: &Message,
    executor: Option<&dyn ToolExecutor>,
) -> GenerateResult<Message> {
    let mut results = Message::user();
    for tool_use in reply.tool_use() {
        let executor = executor.ok_or_else(|| GenerateError::ToolExecution {
            tool: tool_use.name.clone(),
            source: ToolError::ExecutionError("no tool executor configured".to_string()),
        })?;

        debug!(tool = %tool_use.name, "dispatching tool call");
        let output = executor
            .execute(&tool_use.name, &tool_use.arguments)
            .await
            .map_err(|source| GenerateError::ToolExecution {
                tool: tool_use.name.clone(),
                source,
            })?;
        results = results.with_tool_result(tool_use.name, output);
    }
    Ok(results)
}

fn first_text(phase: Phase, response: &ProviderResponse) -> GenerateResult<String> {
    response
        .message
        .first_text()
        .map(str::to_string)
        .ok_or_else(|| GenerateError::MalformedResponse {
            phase,
            message: format!(
                "reply has no text part (finish reason {:?})",
                response.finish_reason
            ),
        })
}
