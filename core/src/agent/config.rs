//! Agent configuration structures

use super::executor::AgentExecutor;
use super::memory::DEFAULT_MAX_MESSAGES;
use crate::config::ResolvedLlmConfig;
use crate::error::{AgentError, Result};
use crate::llm::{LlmClient, OpenAiCompatClient};
use crate::tools::ToolRegistry;
use crate::trajectory::TrajectoryRecorder;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default bound on model rounds per user message
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Configuration for an agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum number of model rounds per user message
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Maximum number of transcript entries kept besides the system prompt
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,

    /// Custom system prompt for the agent (optional)
    /// If not provided, the built-in budget prompt is used
    #[serde(default)]
    pub system_prompt: Option<String>,
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

fn default_max_messages() -> usize {
    DEFAULT_MAX_MESSAGES
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_messages: DEFAULT_MAX_MESSAGES,
            system_prompt: None,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(AgentError::InvalidConfig {
                message: "max_iterations must be at least 1".to_string(),
            }
            .into());
        }
        if self.max_messages == 0 {
            return Err(AgentError::InvalidConfig {
                message: "max_messages must be at least 1".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Builder for creating agents with resolved LLM configuration
pub struct AgentBuilder {
    llm_config: ResolvedLlmConfig,
    agent_config: AgentConfig,
    tools: Arc<ToolRegistry>,
    trajectory_recorder: Option<Arc<TrajectoryRecorder>>,
}

impl AgentBuilder {
    /// Create a new agent builder with LLM configuration
    pub fn new(llm_config: ResolvedLlmConfig) -> Self {
        Self {
            llm_config,
            agent_config: AgentConfig::default(),
            tools: Arc::new(ToolRegistry::new()),
            trajectory_recorder: None,
        }
    }

    pub fn with_agent_config(mut self, agent_config: AgentConfig) -> Self {
        self.agent_config = agent_config;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.agent_config.max_iterations = max_iterations;
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: Option<String>) -> Self {
        self.agent_config.system_prompt = system_prompt;
        self
    }

    /// Set the tool registry the agent dispatches through
    pub fn with_tools(mut self, tools: Arc<ToolRegistry>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_trajectory_recorder(mut self, recorder: Arc<TrajectoryRecorder>) -> Self {
        self.trajectory_recorder = Some(recorder);
        self
    }

    /// Build an agent talking to an OpenAI-compatible endpoint
    pub fn build(self) -> Result<AgentExecutor> {
        self.llm_config
            .validate()
            .map_err(|message| AgentError::InvalidConfig { message })?;

        let llm_client: Arc<dyn LlmClient> = Arc::new(OpenAiCompatClient::new(&self.llm_config)?);
        let mut agent = AgentExecutor::new(self.agent_config, llm_client, self.tools)?;
        if let Some(recorder) = self.trajectory_recorder {
            agent.set_trajectory_recorder(recorder);
        }
        Ok(agent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.max_messages, 50);
        assert!(config.validate().is_ok());

        let parsed: AgentConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.max_iterations, 10);
    }

    #[test]
    fn test_zero_bounds_rejected() {
        let config = AgentConfig {
            max_iterations: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builder_rejects_bad_llm_config() {
        let llm_config = ResolvedLlmConfig::new(String::new(), "model".to_string());
        assert!(AgentBuilder::new(llm_config).build().is_err());
    }

    #[test]
    fn test_builder_builds_agent() {
        let agent = AgentBuilder::new(ResolvedLlmConfig::default())
            .with_max_iterations(3)
            .with_system_prompt(Some("custom".to_string()))
            .build()
            .unwrap();
        assert_eq!(agent.config().max_iterations, 3);
        assert!(agent.history()[0].get_text().unwrap().starts_with("custom"));
    }
}
