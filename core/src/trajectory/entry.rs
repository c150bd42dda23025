//! Trajectory entry types

use crate::llm::{LlmMessage, Usage};
use crate::tools::{ToolCall, ToolResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single entry in an execution trajectory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryEntry {
    /// When this entry was recorded
    pub timestamp: DateTime<Utc>,

    /// What happened
    pub entry_type: EntryType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntryType {
    /// A user message opened a turn
    UserMessage { content: String },

    /// Transcript sent to the model
    LlmRequest {
        messages: Vec<LlmMessage>,
        model: String,
        provider: String,
        round: usize,
    },

    /// Decoded model turn
    LlmResponse {
        content: Option<String>,
        tool_calls: Vec<ToolCall>,
        finish_reason: String,
        usage: Option<Usage>,
        round: usize,
    },

    ToolCall { call: ToolCall, round: usize },

    ToolResult { result: ToolResult, round: usize },

    /// The turn ended with an answer or by running out of rounds
    TurnComplete {
        final_result: String,
        rounds: usize,
        answered: bool,
    },
}

impl TrajectoryEntry {
    fn now(entry_type: EntryType) -> Self {
        Self {
            timestamp: Utc::now(),
            entry_type,
        }
    }

    pub fn user_message<S: Into<String>>(content: S) -> Self {
        Self::now(EntryType::UserMessage {
            content: content.into(),
        })
    }

    pub fn llm_request(messages: Vec<LlmMessage>, model: String, provider: String, round: usize) -> Self {
        Self::now(EntryType::LlmRequest {
            messages,
            model,
            provider,
            round,
        })
    }

    pub fn llm_response(
        content: Option<String>,
        tool_calls: Vec<ToolCall>,
        finish_reason: String,
        usage: Option<Usage>,
        round: usize,
    ) -> Self {
        Self::now(EntryType::LlmResponse {
            content,
            tool_calls,
            finish_reason,
            usage,
            round,
        })
    }

    pub fn tool_call(call: ToolCall, round: usize) -> Self {
        Self::now(EntryType::ToolCall { call, round })
    }

    pub fn tool_result(result: ToolResult, round: usize) -> Self {
        Self::now(EntryType::ToolResult { result, round })
    }

    pub fn turn_complete(final_result: String, rounds: usize, answered: bool) -> Self {
        Self::now(EntryType::TurnComplete {
            final_result,
            rounds,
            answered,
        })
    }
}
