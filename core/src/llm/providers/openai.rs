//! OpenAI-compatible chat completions client (vLLM, llama.cpp, OpenAI, ...)

use crate::config::ResolvedLlmConfig;
use crate::error::{LlmError, Result};
use crate::llm::{
    ChatCompletionResponse, ChatOptions, LlmClient, LlmMessage, MessageRole, ToolChoice,
    ToolDefinition,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

/// Client for any server speaking the OpenAI chat completions protocol
pub struct OpenAiCompatClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    default_options: ChatOptions,
    headers: HashMap<String, String>,
}

/// Request body for `/v1/chat/completions`
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub n: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
}

/// A transcript entry in wire format
#[derive(Debug, Serialize)]
pub struct WireMessage {
    pub role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WireToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub call_type: &'static str,
    pub function: WireFunctionCall,
}

#[derive(Debug, Serialize)]
pub struct WireFunctionCall {
    pub name: String,
    /// JSON-encoded argument object
    pub arguments: String,
}

impl OpenAiCompatClient {
    /// Create a new client from resolved LLM config
    pub fn new(config: &ResolvedLlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.params.timeout_secs))
            .build()
            .map_err(|e| LlmError::InvalidRequest {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|key| !key.is_empty()),
            model: config.model.clone(),
            default_options: ChatOptions {
                max_tokens: Some(config.params.max_tokens),
                temperature: Some(config.params.temperature),
                tool_choice: Some(ToolChoice::Auto),
            },
            headers: config.headers.clone(),
        })
    }

    /// Full URL of the chat completions endpoint
    pub fn endpoint(&self) -> String {
        if self.base_url.ends_with("/v1") {
            format!("{}/chat/completions", self.base_url)
        } else {
            format!("{}/v1/chat/completions", self.base_url)
        }
    }

    /// Build the request body
    pub fn build_request(
        &self,
        messages: Vec<LlmMessage>,
        tools: Option<Vec<ToolDefinition>>,
        options: Option<ChatOptions>,
    ) -> ChatCompletionRequest {
        let options = options.unwrap_or_else(|| self.default_options.clone());

        // Tools are only declared when there is at least one
        let tools = tools.filter(|t| !t.is_empty());
        let tool_choice = if tools.is_some() {
            Some(options.tool_choice.unwrap_or(ToolChoice::Auto))
        } else {
            None
        };

        ChatCompletionRequest {
            model: self.model.clone(),
            messages: messages.into_iter().map(convert_message).collect(),
            n: 1,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            tools,
            tool_choice,
        }
    }
}

/// Convert our internal message format to the wire format
fn convert_message(message: LlmMessage) -> WireMessage {
    let tool_calls = if message.role == MessageRole::Assistant && message.has_tool_use() {
        Some(
            message
                .tool_calls
                .into_iter()
                .map(|call| WireToolCall {
                    id: call.id,
                    call_type: "function",
                    function: WireFunctionCall {
                        name: call.name,
                        arguments: call.arguments.to_json_string(),
                    },
                })
                .collect(),
        )
    } else {
        None
    };

    WireMessage {
        role: message.role.as_str(),
        content: message.content,
        tool_calls,
        tool_call_id: message.tool_call_id,
        name: message.name,
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatClient {
    async fn chat_completion(
        &self,
        messages: Vec<LlmMessage>,
        tools: Option<Vec<ToolDefinition>>,
        options: Option<ChatOptions>,
    ) -> Result<ChatCompletionResponse> {
        let request = self.build_request(messages, tools, options);
        let url = self.endpoint();

        if let Some(tools) = &request.tools {
            tracing::debug!("Chat completion request with {} tools enabled", tools.len());
        }
        tracing::debug!("Sending request to {}", url);

        let mut builder = self.client.post(&url).json(&request);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }
        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!("Chat completion request failed: {}", e);
            LlmError::Network {
                message: e.to_string(),
            }
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Chat completion returned {}: {}", status, error_text);
            return Err(LlmError::ApiError {
                status,
                message: error_text,
            }
            .into());
        }

        let body: ChatCompletionResponse =
            response
                .json()
                .await
                .map_err(|e| LlmError::InvalidResponse {
                    message: e.to_string(),
                })?;

        tracing::debug!("Response: {:?}", body);

        Ok(body)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &str {
        "openai_compat"
    }
}
