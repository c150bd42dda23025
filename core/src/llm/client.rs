//! LLM client trait and response structures

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::message::LlmMessage;

/// Trait for LLM clients
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a chat completion request and return the raw response envelope
    async fn chat_completion(
        &self,
        messages: Vec<LlmMessage>,
        tools: Option<Vec<ToolDefinition>>,
        options: Option<ChatOptions>,
    ) -> Result<ChatCompletionResponse>;

    /// Get the model name
    fn model_name(&self) -> &str;

    /// Get the provider name
    fn provider_name(&self) -> &str;
}

/// Raw chat completion envelope as returned by an OpenAI-compatible endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    /// Response identifier
    #[serde(default)]
    pub id: Option<String>,

    /// Model used for generation
    #[serde(default)]
    pub model: Option<String>,

    /// Candidate turns; only the first one is consumed
    #[serde(default)]
    pub choices: Vec<Choice>,

    /// Usage statistics
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// One candidate turn
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,

    #[serde(default)]
    pub message: ResponseMessage,

    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Message part of a candidate turn
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub role: Option<String>,

    #[serde(default)]
    pub content: Option<String>,

    #[serde(default)]
    pub tool_calls: Option<Vec<RawToolCall>>,
}

/// Tool call exactly as the model emitted it.
///
/// Scalar fields stay untyped so one odd call cannot fail the whole envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawToolCall {
    #[serde(default)]
    pub id: Option<serde_json::Value>,

    #[serde(default, rename = "type")]
    pub call_type: Option<serde_json::Value>,

    #[serde(default)]
    pub function: Option<RawFunctionCall>,
}

/// Function part of a raw tool call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawFunctionCall {
    #[serde(default)]
    pub name: Option<serde_json::Value>,

    /// Usually a JSON-encoded string; some servers send the object directly
    #[serde(default)]
    pub arguments: Option<serde_json::Value>,
}

/// Usage statistics for a request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    /// Number of tokens in the prompt
    #[serde(default)]
    pub prompt_tokens: u32,

    /// Number of tokens in the completion
    #[serde(default)]
    pub completion_tokens: u32,

    /// Total number of tokens
    #[serde(default)]
    pub total_tokens: u32,
}

/// Reason why generation finished
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Generation completed naturally
    Stop,

    /// Hit the maximum token limit
    Length,

    /// Model decided to call a tool
    ToolCalls,

    /// Content was filtered
    ContentFilter,

    /// The response carried no usable choice
    Error,

    /// Other reason
    Other(String),
}

impl FinishReason {
    pub fn as_str(&self) -> &str {
        match self {
            FinishReason::Stop => "stop",
            FinishReason::Length => "length",
            FinishReason::ToolCalls => "tool_calls",
            FinishReason::ContentFilter => "content_filter",
            FinishReason::Error => "error",
            FinishReason::Other(reason) => reason,
        }
    }
}

impl From<&str> for FinishReason {
    fn from(reason: &str) -> Self {
        match reason {
            "stop" => FinishReason::Stop,
            "length" => FinishReason::Length,
            "tool_calls" | "function_call" => FinishReason::ToolCalls,
            "content_filter" => FinishReason::ContentFilter,
            "error" => FinishReason::Error,
            other => FinishReason::Other(other.to_string()),
        }
    }
}

/// Tool definition for function calling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Type of tool (usually "function")
    #[serde(rename = "type")]
    pub tool_type: String,

    /// Function definition
    pub function: FunctionDefinition,
}

/// Function definition for tool calling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Name of the function
    pub name: String,

    /// Description of what the function does
    pub description: String,

    /// JSON schema for the function parameters
    pub parameters: serde_json::Value,
}

/// Options for chat completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatOptions {
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,

    /// Temperature for generation
    pub temperature: Option<f32>,

    /// Tool choice strategy, only sent alongside tools
    pub tool_choice: Option<ToolChoice>,
}

/// Tool choice strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    /// Let the model decide
    Auto,

    /// Never use tools
    None,

    /// The model must call at least one tool
    Required,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            max_tokens: Some(2048),
            temperature: Some(0.7),
            tool_choice: Some(ToolChoice::Auto),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_tolerates_nulls_and_missing_fields() {
        let raw = serde_json::json!({
            "choices": [{
                "message": {"role": "assistant", "content": null, "tool_calls": null},
                "finish_reason": null
            }]
        });
        let response: ChatCompletionResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(response.choices.len(), 1);
        assert!(response.choices[0].message.content.is_none());
        assert!(response.choices[0].message.tool_calls.is_none());
        assert!(response.usage.is_none());
    }

    #[test]
    fn test_finish_reason_from_str() {
        assert_eq!(FinishReason::from("tool_calls"), FinishReason::ToolCalls);
        assert_eq!(FinishReason::from("function_call"), FinishReason::ToolCalls);
        assert_eq!(
            FinishReason::from("eos"),
            FinishReason::Other("eos".to_string())
        );
        assert_eq!(FinishReason::Error.as_str(), "error");
    }

    #[test]
    fn test_tool_choice_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(ToolChoice::Auto).unwrap(),
            serde_json::json!("auto")
        );
    }
}
