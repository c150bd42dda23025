//! Decoding of raw model turns into content and tool calls

use crate::llm::{ChatCompletionResponse, FinishReason, RawToolCall};
use crate::tools::{ToolArguments, ToolCall};
use serde_json::Value;

/// A model turn reduced to what the agent loop acts on
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    /// Free text content, if the model produced any
    pub content: Option<String>,

    /// Well-formed tool calls in the order the model emitted them
    pub tool_calls: Vec<ToolCall>,

    /// Why the model stopped
    pub finish_reason: FinishReason,
}

/// Outcome of decoding one serialized argument payload
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentDecode {
    Parsed(ToolArguments),
    Malformed(String),
}

/// Parse the first choice of a completion response.
///
/// Tool calls whose arguments do not decode to a JSON object are dropped
/// individually; the rest of the turn is still returned.
pub fn parse_response(response: &ChatCompletionResponse) -> ParsedResponse {
    let Some(choice) = response.choices.first() else {
        return ParsedResponse {
            content: None,
            tool_calls: Vec::new(),
            finish_reason: FinishReason::Error,
        };
    };

    let finish_reason = choice
        .finish_reason
        .as_deref()
        .map(FinishReason::from)
        .unwrap_or(FinishReason::Stop);

    let tool_calls = choice
        .message
        .tool_calls
        .iter()
        .flatten()
        .filter_map(decode_tool_call)
        .collect();

    ParsedResponse {
        content: choice.message.content.clone(),
        tool_calls,
        finish_reason,
    }
}

fn decode_tool_call(raw: &RawToolCall) -> Option<ToolCall> {
    let id = match raw.id.as_ref() {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        Some(other) => {
            tracing::error!(
                "Dropping tool call with unusable id of type {}",
                json_type_name(other)
            );
            return None;
        }
    };

    let function = raw.function.as_ref();
    let name = match function.and_then(|f| f.name.as_ref()) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(name)) => name.clone(),
        Some(other) => {
            tracing::error!(
                "Dropping tool call (id: {}) whose name is a {}",
                id,
                json_type_name(other)
            );
            return None;
        }
    };
    let arguments = function.and_then(|f| f.arguments.as_ref());

    match decode_arguments(arguments) {
        ArgumentDecode::Parsed(arguments) => Some(ToolCall::new(id, name, arguments)),
        ArgumentDecode::Malformed(reason) => {
            tracing::error!(
                "Failed to parse tool call arguments for '{}' (id: {}): {}",
                name,
                id,
                reason
            );
            None
        }
    }
}

/// Decode a tool call argument payload.
///
/// A missing payload is treated as an empty object.
pub fn decode_arguments(arguments: Option<&Value>) -> ArgumentDecode {
    let value = match arguments {
        None | Some(Value::Null) => return ArgumentDecode::Parsed(ToolArguments::default()),
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
            Ok(value) => value,
            Err(e) => return ArgumentDecode::Malformed(e.to_string()),
        },
        Some(other) => other.clone(),
    };

    match value {
        Value::Object(map) => ArgumentDecode::Parsed(ToolArguments::from(map)),
        other => ArgumentDecode::Malformed(format!(
            "expected a JSON object, got {}",
            json_type_name(&other)
        )),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
