//! Bounded conversation transcript

use crate::llm::LlmMessage;
use crate::tools::ToolCall;

/// Default number of non-system entries kept in a transcript
pub const DEFAULT_MAX_MESSAGES: usize = 50;

/// Conversation transcript for one session.
///
/// The system prompt is held apart from the entries so trimming never
/// drops it; it is always rendered first.
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    system_prompt: String,
    messages: Vec<LlmMessage>,
    max_messages: usize,
}

impl ConversationMemory {
    pub fn new<S: Into<String>>(system_prompt: S) -> Self {
        Self::with_max_messages(system_prompt, DEFAULT_MAX_MESSAGES)
    }

    pub fn with_max_messages<S: Into<String>>(system_prompt: S, max_messages: usize) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            messages: Vec::new(),
            max_messages,
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Replace the system prompt; entries are untouched
    pub fn set_system_prompt<S: Into<String>>(&mut self, system_prompt: S) {
        self.system_prompt = system_prompt.into();
    }

    pub fn add_user_message<S: Into<String>>(&mut self, content: S) {
        self.push(LlmMessage::user(content));
    }

    /// Append an assistant turn, with the tool calls it requested if any
    pub fn add_assistant_message(&mut self, content: Option<String>, tool_calls: Vec<ToolCall>) {
        let message = if tool_calls.is_empty() {
            LlmMessage::assistant(content)
        } else {
            LlmMessage::assistant_with_tool_calls(content, tool_calls)
        };
        self.push(message);
    }

    pub fn add_tool_result<S: Into<String>>(&mut self, tool_call_id: S, name: S, content: S) {
        self.push(LlmMessage::tool_result(tool_call_id, name, content));
    }

    /// Rendered transcript, system prompt first
    pub fn messages(&self) -> Vec<LlmMessage> {
        let mut rendered = Vec::with_capacity(self.messages.len() + 1);
        rendered.push(LlmMessage::system(self.system_prompt.clone()));
        rendered.extend(self.messages.iter().cloned());
        rendered
    }

    /// Number of non-system entries
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop every entry, keeping the system prompt
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    fn push(&mut self, message: LlmMessage) {
        self.messages.push(message);
        if self.messages.len() > self.max_messages {
            let excess = self.messages.len() - self.max_messages;
            self.messages.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MessageRole;
    use crate::tools::ToolArguments;

    #[test]
    fn test_system_prompt_rendered_first() {
        let mut memory = ConversationMemory::new("be helpful");
        memory.add_user_message("hello");

        let messages = memory.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages[0].get_text(), Some("be helpful"));
        assert_eq!(messages[1].role, MessageRole::User);
    }

    #[test]
    fn test_trims_oldest_to_exact_bound() {
        let mut memory = ConversationMemory::with_max_messages("sys", 5);
        for i in 0..8 {
            memory.add_user_message(format!("message {}", i));
        }

        assert_eq!(memory.len(), 5);
        let messages = memory.messages();
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages[1].get_text(), Some("message 3"));
        assert_eq!(messages[5].get_text(), Some("message 7"));
    }

    #[test]
    fn test_default_bound_is_fifty() {
        let mut memory = ConversationMemory::new("sys");
        for i in 0..60 {
            memory.add_user_message(i.to_string());
        }
        assert_eq!(memory.len(), DEFAULT_MAX_MESSAGES);
        assert_eq!(memory.messages().len(), DEFAULT_MAX_MESSAGES + 1);
    }

    #[test]
    fn test_tool_entries_keep_linkage() {
        let mut memory = ConversationMemory::new("sys");
        let call = ToolCall::new("call_1", "list_fixed_expenses", ToolArguments::default());
        memory.add_assistant_message(None, vec![call]);
        memory.add_tool_result("call_1", "list_fixed_expenses", "No fixed expenses registered.");

        let messages = memory.messages();
        assert!(messages[1].has_tool_use());
        assert_eq!(messages[2].tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(messages[2].name.as_deref(), Some("list_fixed_expenses"));
        assert_eq!(messages[2].role, MessageRole::Tool);
    }

    #[test]
    fn test_replacing_system_prompt_keeps_entries() {
        let mut memory = ConversationMemory::new("old");
        memory.add_user_message("hello");
        memory.set_system_prompt("new");

        let messages = memory.messages();
        assert_eq!(messages[0].content.as_deref(), Some("new"));
        assert_eq!(messages[1].content.as_deref(), Some("hello"));
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn test_clear_keeps_system_prompt() {
        let mut memory = ConversationMemory::new("sys");
        memory.add_user_message("hello");
        memory.add_assistant_message(Some("hi".to_string()), Vec::new());
        memory.clear();

        assert!(memory.is_empty());
        assert_eq!(memory.messages().len(), 1);
        assert_eq!(memory.system_prompt(), "sys");
    }
}
