//! LLM message structures

use crate::tools::ToolCall;
use serde::{Deserialize, Serialize};

/// Represents one entry in an LLM conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmMessage {
    /// Role of the message sender
    pub role: MessageRole,

    /// Text content of the message, absent for tool-only assistant turns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Operations requested by an assistant turn, in the order the model emitted them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,

    /// Call identifier a tool result answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Name of the tool that produced a tool result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Role of the message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System message (instructions)
    System,

    /// User message (human input)
    User,

    /// Assistant message (AI response)
    Assistant,

    /// Tool message (tool execution result)
    Tool,
}

impl MessageRole {
    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::Tool => "tool",
        }
    }
}

impl LlmMessage {
    fn with_role(role: MessageRole, content: Option<String>) -> Self {
        Self {
            role,
            content,
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }
    }

    /// Create a new system message
    pub fn system<S: Into<String>>(content: S) -> Self {
        Self::with_role(MessageRole::System, Some(content.into()))
    }

    /// Create a new user message
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self::with_role(MessageRole::User, Some(content.into()))
    }

    /// Create a new assistant message
    pub fn assistant(content: Option<String>) -> Self {
        Self::with_role(MessageRole::Assistant, content)
    }

    /// Create an assistant message that requests tool calls
    pub fn assistant_with_tool_calls(content: Option<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::with_role(MessageRole::Assistant, content)
        }
    }

    /// Create a new tool result message
    pub fn tool_result<S: Into<String>>(tool_call_id: S, name: S, content: S) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            name: Some(name.into()),
            ..Self::with_role(MessageRole::Tool, Some(content.into()))
        }
    }

    /// Get the text content of the message
    pub fn get_text(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Check if the message contains tool use
    pub fn has_tool_use(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolArguments;

    #[test]
    fn test_constructors_set_roles() {
        assert_eq!(LlmMessage::system("s").role, MessageRole::System);
        assert_eq!(LlmMessage::user("u").get_text(), Some("u"));

        let result = LlmMessage::tool_result("call_1", "list_fixed_expenses", "none");
        assert_eq!(result.role, MessageRole::Tool);
        assert_eq!(result.tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(result.name.as_deref(), Some("list_fixed_expenses"));
    }

    #[test]
    fn test_assistant_with_tool_calls() {
        let call = ToolCall::new("call_1", "list_fixed_expenses", ToolArguments::default());
        let message = LlmMessage::assistant_with_tool_calls(None, vec![call]);
        assert!(message.has_tool_use());
        assert_eq!(message.get_text(), None);
        assert!(!LlmMessage::assistant(Some("hi".to_string())).has_tool_use());
    }
}
