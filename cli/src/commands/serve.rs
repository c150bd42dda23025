//! HTTP server command

use crate::config::CliConfigLoader;
use crate::server::{self, AppState};
use anyhow::{Context, Result};
use budgie_core::llm::{LlmClient, OpenAiCompatClient};
use budgie_core::{
    create_budget_registry, AgentExecutor, Ledger, SessionRegistry, TrajectoryRecorder,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Serve chat sessions over one shared ledger and model client.
///
/// With a trajectory file, each conversation records to its own file next to it.
pub async fn serve_command(
    config_loader: CliConfigLoader,
    trajectory_file: Option<PathBuf>,
) -> Result<()> {
    let config = config_loader.load().await?;
    info!("🤖 Using model: {} ({})", config.llm.model, config.llm.base_url);

    let ledger = Ledger::open(&config.database)
        .with_context(|| format!("Failed to open ledger at {}", config.database.display()))?;
    let tools = Arc::new(create_budget_registry(ledger.clone()));
    let client: Arc<dyn LlmClient> = Arc::new(OpenAiCompatClient::new(&config.llm)?);

    if let Some(path) = &trajectory_file {
        info!("📊 Recording one trajectory per conversation next to {}", path.display());
    }

    let agent_config = config.agent.clone();
    let sessions = SessionRegistry::new(Arc::new(
        move |id: &str| -> budgie_core::Result<AgentExecutor> {
            let mut agent = AgentExecutor::new(agent_config.clone(), client.clone(), tools.clone())?;
            if let Some(path) = &trajectory_file {
                let recorder = TrajectoryRecorder::with_file(session_trajectory_path(path, id));
                agent.set_trajectory_recorder(Arc::new(recorder));
            }
            Ok(agent)
        },
    ));

    let state = AppState {
        sessions,
        ledger,
        model: config.llm.model.clone(),
        base_url: config.llm.base_url.clone(),
    };

    server::serve(state, &config.server.bind, &config.server.allowed_origins).await
}

/// `runs/trace.json` + `abc` -> `runs/trace-abc.json`. Ids come from clients,
/// so anything outside `[A-Za-z0-9_-]` becomes `_`.
fn session_trajectory_path(base: &Path, session_id: &str) -> PathBuf {
    let session_id: String = session_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "trajectory".to_string());
    let extension = base
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "json".to_string());

    base.with_file_name(format!("{}-{}.{}", stem, session_id, extension))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_trajectory_path() {
        assert_eq!(
            session_trajectory_path(Path::new("runs/trace.json"), "abc"),
            PathBuf::from("runs/trace-abc.json")
        );
        assert_eq!(
            session_trajectory_path(Path::new("trace"), "abc"),
            PathBuf::from("trace-abc.json")
        );
        assert_eq!(
            session_trajectory_path(Path::new("runs/trace.json"), "../../etc/x"),
            PathBuf::from("runs/trace-______etc_x.json")
        );
    }
}
