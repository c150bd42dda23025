//! Tool system and built-in tools

pub mod base;
pub mod builtin;
pub mod registry;

pub use base::{
    parameters_schema, ParameterType, Tool, ToolArguments, ToolCall, ToolParameter, ToolResult,
};
pub use builtin::create_budget_registry;
pub use registry::ToolRegistry;
