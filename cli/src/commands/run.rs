//! Single message command

use super::{build_agent, thinking_spinner};
use crate::config::CliConfigLoader;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{info, warn};

/// Send one message to a fresh agent and print the reply
pub async fn run_command(
    message: String,
    config_loader: CliConfigLoader,
    trajectory_file: Option<PathBuf>,
) -> Result<()> {
    let config = config_loader.load().await?;
    let mut agent = build_agent(config, trajectory_file.as_deref())?;

    let spinner = thinking_spinner();
    let execution = agent.execute(&message).await;
    spinner.finish_and_clear();
    let execution = execution.context("Error processing message")?;

    if !execution.is_answered() {
        warn!("No final answer after {} rounds", execution.rounds);
    }
    info!(
        "✅ Finished in {} round(s), {} ms",
        execution.rounds, execution.duration_ms
    );

    println!("{}", execution.final_result);
    Ok(())
}
