//! Tool registry: the flat name → handler table the agent dispatches through

use crate::llm::ToolDefinition;
use crate::tools::{Tool, ToolArguments, ToolCall, ToolResult};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Registry of every operation the model may invoke.
///
/// Populated once at startup and shared read-only afterwards.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create a new, empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. A tool with the same name is replaced in place.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        match self.index.get(&name) {
            Some(&position) => self.tools[position] = tool,
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.index.get(name).map(|&position| &self.tools[position])
    }

    /// All tools in registration order
    pub fn get_all(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    /// List all tool names in registration order
    pub fn list_tools(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Get tool definitions for LLM function calling
    pub fn get_tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|tool| tool.definition()).collect()
    }

    /// Execute a tool by name. Never fails: unknown tools and handler
    /// errors are reported as text.
    pub async fn execute(&self, name: &str, arguments: &ToolArguments) -> String {
        let call = ToolCall::new("", name, arguments.clone());
        self.execute_call(&call).await.content
    }

    /// Execute a model-issued call, keeping call id linkage and timing
    pub async fn execute_call(&self, call: &ToolCall) -> ToolResult {
        let start_time = Instant::now();

        let result = match self.get(&call.name) {
            None => ToolResult::error(
                call.id.clone(),
                call.name.clone(),
                format!("Error: Tool '{}' not found", call.name),
            ),
            Some(tool) => match tool.execute(&call.arguments).await {
                Ok(output) => ToolResult::success(call.id.clone(), call.name.clone(), output),
                Err(e) => ToolResult::error(
                    call.id.clone(),
                    call.name.clone(),
                    format!("Error executing tool '{}': {}", call.name, e),
                ),
            },
        };

        result.with_duration(start_time.elapsed().as_millis() as u64)
    }
}
