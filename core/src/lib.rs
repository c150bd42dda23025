//! # budgie core
//!
//! Core library for budgie, a tool-calling assistant that keeps a personal
//! budget ledger.
//!
//! The pieces are an OpenAI-compatible completion client, a registry of
//! budget tools backed by SQLite, a bounded conversation transcript, and the
//! agent loop tying them together. Sessions map conversation ids to agents.

pub mod agent;
pub mod config;
pub mod error;
pub mod ledger;
pub mod llm;
pub mod session;
pub mod tools;
pub mod trajectory;

// Re-export commonly used types
pub use agent::{AgentBuilder, AgentConfig, AgentExecution, AgentExecutor, ExecutionOutcome};
pub use config::{ModelParams, ResolvedLlmConfig};
pub use error::{Error, Result};
pub use ledger::Ledger;
pub use session::{ResetOutcome, SessionRegistry};
pub use tools::{create_budget_registry, ToolRegistry};
pub use trajectory::TrajectoryRecorder;

/// Current version of the budgie-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing at debug or info level; `RUST_LOG` still wins when set
pub fn init_tracing_with_debug(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
