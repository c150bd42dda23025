//! CLI command implementations

pub mod interactive;
pub mod run;
pub mod serve;
pub mod tools;

pub use interactive::interactive_command;
pub use run::run_command;
pub use serve::serve_command;
pub use tools::tools_command;

use crate::config::AppConfig;
use anyhow::{Context, Result};
use budgie_core::{create_budget_registry, AgentBuilder, AgentExecutor, Ledger, TrajectoryRecorder};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Open the ledger and build a single agent for terminal use
pub(crate) fn build_agent(config: AppConfig, trajectory_file: Option<&Path>) -> Result<AgentExecutor> {
    info!("🤖 Using model: {} ({})", config.llm.model, config.llm.base_url);

    let ledger = Ledger::open(&config.database)
        .with_context(|| format!("Failed to open ledger at {}", config.database.display()))?;
    let tools = Arc::new(create_budget_registry(ledger));

    let mut builder = AgentBuilder::new(config.llm)
        .with_agent_config(config.agent)
        .with_tools(tools);

    if let Some(path) = trajectory_file {
        info!("📊 Trajectory file: {}", path.display());
        builder = builder.with_trajectory_recorder(Arc::new(TrajectoryRecorder::with_file(path)));
    }

    Ok(builder.build()?)
}

/// Spinner shown while the agent is working
pub(crate) fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Thinking...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
