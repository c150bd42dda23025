//! # budgie CLI
//!
//! Command-line interface for budgie, a budget assistant that talks to an
//! OpenAI-compatible model and keeps its ledger in SQLite.
//!
//! ## Usage
//!
//! - `budgie` - Start an interactive chat
//! - `budgie "message"` - Send one message and print the reply
//! - `budgie tools` - Show available tools
//! - `budgie serve` - Start the HTTP API

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod server;

use commands::{interactive_command, run_command, serve_command, tools_command};
use config::CliConfigLoader;

/// budgie - a tool-calling budget assistant
#[derive(Parser)]
#[command(name = "budgie")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A tool-calling personal budget assistant")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file or directory path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API key override
    #[arg(long)]
    api_key: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint
    #[arg(long)]
    base_url: Option<String>,

    /// Model name override
    #[arg(long)]
    model: Option<String>,

    /// SQLite ledger file
    #[arg(long)]
    database: Option<PathBuf>,

    /// Maximum model rounds per message
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Write a JSON trajectory of every round to this file
    #[arg(long)]
    trajectory_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Send this message and exit
    message: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat (default)
    Chat,

    /// Show available tools
    Tools,

    /// Serve the chat and dashboard HTTP API
    Serve {
        /// Address to listen on, e.g. 127.0.0.1:8080
        #[arg(long)]
        bind: Option<String>,
    },
}

/// Build a configuration loader from CLI arguments
fn build_config_loader(cli: &Cli) -> CliConfigLoader {
    let mut loader = CliConfigLoader::new();

    if let Some(config_path) = &cli.config {
        loader = loader.with_config_override(config_path.clone());
    }
    if let Some(api_key) = &cli.api_key {
        loader = loader.with_api_key_override(api_key.clone());
    }
    if let Some(base_url) = &cli.base_url {
        loader = loader.with_base_url_override(base_url.clone());
    }
    if let Some(model) = &cli.model {
        loader = loader.with_model_override(model.clone());
    }
    if let Some(database) = &cli.database {
        loader = loader.with_database_override(database.clone());
    }
    if let Some(max_iterations) = cli.max_iterations {
        loader = loader.with_max_iterations_override(max_iterations);
    }
    if let Some(Commands::Serve { bind: Some(bind) }) = &cli.command {
        loader = loader.with_bind_override(bind.clone());
    }

    loader
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    budgie_core::init_tracing_with_debug(cli.verbose);

    let config_loader = build_config_loader(&cli);

    match (cli.message, cli.command) {
        (Some(message), None) => run_command(message, config_loader, cli.trajectory_file).await,
        (Some(_), Some(_)) => bail!("Cannot specify both a message and a subcommand"),
        (None, Some(Commands::Tools)) => tools_command().await,
        (None, Some(Commands::Serve { .. })) => {
            serve_command(config_loader, cli.trajectory_file).await
        }
        (None, Some(Commands::Chat)) | (None, None) => {
            interactive_command(config_loader, cli.trajectory_file).await
        }
    }
}
