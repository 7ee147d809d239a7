use reqwest::StatusCode;
use serde_json::{json, Map, Value};

use super::base::{FinishReason, ProviderError, ProviderResponse, Usage};
use super::types::{
    content::{Content, Text, ToolResult, ToolUse},
    message::Message,
    tool::{GenerationConfig, ToolDeclaration},
};

/// Convert internal Message format to Gemini's `contents` specification
pub fn messages_to_gemini_spec(messages: &[Message]) -> Vec<Value> {
    messages
        .iter()
        .map(|message| {
            let parts: Vec<Value> = message.content.iter().map(content_to_gemini_part).collect();
            json!({
                "role": message.role,
                "parts": parts,
            })
        })
        .collect()
}

fn content_to_gemini_part(content: &Content) -> Value {
    match content {
        Content::Text(Text { text }) => json!({ "text": text }),
        Content::ToolUse(ToolUse { name, arguments }) => json!({
            "functionCall": {
                "name": name,
                "args": arguments,
            }
        }),
        Content::ToolResult(ToolResult { name, output }) => json!({
            "functionResponse": {
                "name": name,
                "response": { "output": output },
            }
        }),
    }
}

/// Convert tool declarations to Gemini's `tools` specification
pub fn tools_to_gemini_spec(tools: &[ToolDeclaration]) -> Vec<Value> {
    if tools.is_empty() {
        return vec![];
    }

    let declarations: Vec<Value> = tools
        .iter()
        .map(|tool| {
            json!({
                "name": tool.name,
                "description": tool.description,
                "parameters": tool.parameters,
            })
        })
        .collect();

    vec![json!({ "functionDeclarations": declarations })]
}

/// Build the full `generateContent` request body
pub fn build_payload(
    system: &str,
    messages: &[Message],
    tools: &[ToolDeclaration],
    config: &GenerationConfig,
) -> Value {
    let mut payload = json!({
        "systemInstruction": {
            "parts": [{ "text": system }]
        },
        "contents": messages_to_gemini_spec(messages),
        "generationConfig": {
            "temperature": config.temperature,
        }
    });

    let tools_spec = tools_to_gemini_spec(tools);
    if !tools_spec.is_empty() {
        if let Some(object) = payload.as_object_mut() {
            object.insert("tools".to_string(), json!(tools_spec));
        }
    }

    payload
}

pub fn parse_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "STOP" => FinishReason::Stop,
        "TOOL_CODE" | "TOOL_CALLS" => FinishReason::ToolUse,
        "MAX_TOKENS" => FinishReason::MaxTokens,
        "SAFETY" => FinishReason::Safety,
        other => FinishReason::Other(other.to_string()),
    }
}

/// Convert Gemini's `generateContent` response to a ProviderResponse
pub fn gemini_response_to_message(response: &Value) -> Result<ProviderResponse, ProviderError> {
    let candidate = match response
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
    {
        Some(candidate) => candidate,
        None => {
            let reason = response["promptFeedback"]["blockReason"]
                .as_str()
                .map(|reason| format!("prompt blocked: {}", reason))
                .unwrap_or_else(|| "response contained no candidates".to_string());
            return Err(ProviderError::Malformed(reason));
        }
    };

    let mut message = Message::model();
    if let Some(parts) = candidate["content"]["parts"].as_array() {
        for part in parts {
            if let Some(text) = part.get("text").and_then(Value::as_str) {
                message = message.with_text(text);
            } else if let Some(call) = part.get("functionCall") {
                let name = call["name"]
                    .as_str()
                    .ok_or_else(|| ProviderError::Malformed("function call without a name".into()))?;
                let arguments = call
                    .get("args")
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_else(Map::new);
                message = message.with_tool_use(name, arguments);
            }
        }
    }

    let mut finish_reason = candidate["finishReason"]
        .as_str()
        .map(parse_finish_reason)
        .unwrap_or_else(|| FinishReason::Other("UNSPECIFIED".to_string()));

    // The hosted API reports STOP even when the turn is a function call
    if message.has_tool_use() {
        finish_reason = FinishReason::ToolUse;
    }

    Ok(ProviderResponse::new(message, finish_reason).with_usage(get_usage(response)))
}

pub fn get_usage(response: &Value) -> Usage {
    let usage = &response["usageMetadata"];
    // counts that do not fit are dropped rather than wrapped
    let count = |key: &str| {
        usage
            .get(key)
            .and_then(Value::as_i64)
            .and_then(|v| i32::try_from(v).ok())
    };

    let input_tokens = count("promptTokenCount");
    let output_tokens = count("candidatesTokenCount");
    let total_tokens = count("totalTokenCount").or(match (input_tokens, output_tokens) {
        (Some(input), Some(output)) => input.checked_add(output),
        _ => None,
    });

    Usage::new(input_tokens, output_tokens, total_tokens)
}

/// Classify a non-success response from the backend
pub fn check_gemini_error(status: StatusCode, body: &Value) -> ProviderError {
    let message = body["error"]["message"]
        .as_str()
        .unwrap_or("Unknown error")
        .to_string();

    let key_invalid = body["error"]["details"]
        .as_array()
        .map(|details| {
            details
                .iter()
                .any(|detail| detail["reason"].as_str() == Some("API_KEY_INVALID"))
        })
        .unwrap_or(false);

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN || key_invalid {
        ProviderError::Unauthorized(message)
    } else if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        ProviderError::Request(format!("Server error: {}: {}", status, message))
    } else {
        ProviderError::Request(format!("Request failed: {}: {}", status, message))
    }
}
