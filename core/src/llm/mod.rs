//! LLM client abstractions and implementations

pub mod client;
pub mod message;
pub mod parser;
pub mod providers;

pub use client::{
    ChatCompletionResponse, ChatOptions, Choice, FinishReason, FunctionDefinition, LlmClient,
    RawFunctionCall, RawToolCall, ResponseMessage, ToolChoice, ToolDefinition, Usage,
};
pub use message::{LlmMessage, MessageRole};
pub use parser::{decode_arguments, parse_response, ArgumentDecode, ParsedResponse};
pub use providers::*;
