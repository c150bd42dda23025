//! Agent loop, transcript and configuration

pub mod config;
pub mod execution;
pub mod executor;
pub mod memory;
pub mod prompt;

pub use config::{AgentBuilder, AgentConfig, DEFAULT_MAX_ITERATIONS};
pub use execution::{AgentExecution, ExecutionOutcome};
pub use executor::{AgentExecutor, FALLBACK_RESPONSE, MAX_ROUNDS_MESSAGE};
pub use memory::{ConversationMemory, DEFAULT_MAX_MESSAGES};
pub use prompt::{build_system_prompt, BUDGET_SYSTEM_PROMPT};
