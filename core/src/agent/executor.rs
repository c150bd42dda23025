//! The tool-calling agent loop

use super::config::AgentConfig;
use super::execution::{AgentExecution, ExecutionOutcome};
use super::memory::ConversationMemory;
use super::prompt::build_system_prompt;
use crate::error::Result;
use crate::llm::{parse_response, LlmClient, LlmMessage};
use crate::tools::ToolRegistry;
use crate::trajectory::{TrajectoryEntry, TrajectoryRecorder};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Returned when the model ends a turn without any text
pub const FALLBACK_RESPONSE: &str = "Sorry, I couldn't generate a response.";

/// Returned when every round requested tools and the bound was reached
pub const MAX_ROUNDS_MESSAGE: &str =
    "Reached the maximum number of processing steps. Please try again.";

/// Runs one conversation: a transcript, a model and a tool registry.
///
/// Turns are strictly sequential. Tool failures and malformed tool calls
/// are absorbed into the transcript; only model endpoint failures are
/// returned as errors.
pub struct AgentExecutor {
    config: AgentConfig,
    llm_client: Arc<dyn LlmClient>,
    tools: Arc<ToolRegistry>,
    memory: ConversationMemory,
    trajectory_recorder: Option<Arc<TrajectoryRecorder>>,
}

impl AgentExecutor {
    pub fn new(
        config: AgentConfig,
        llm_client: Arc<dyn LlmClient>,
        tools: Arc<ToolRegistry>,
    ) -> Result<Self> {
        config.validate()?;

        let memory = ConversationMemory::with_max_messages(String::new(), config.max_messages);
        let mut agent = Self {
            config,
            llm_client,
            tools,
            memory,
            trajectory_recorder: None,
        };
        agent.refresh_date_context(chrono::Local::now().date_naive());
        Ok(agent)
    }

    /// Re-stamp the system prompt with `today`, keeping the directive text
    fn refresh_date_context(&mut self, today: NaiveDate) {
        let system_prompt = build_system_prompt(self.config.system_prompt.as_deref(), today);
        self.memory.set_system_prompt(system_prompt);
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn model_name(&self) -> &str {
        self.llm_client.model_name()
    }

    pub fn set_trajectory_recorder(&mut self, recorder: Arc<TrajectoryRecorder>) {
        self.trajectory_recorder = Some(recorder);
    }

    pub fn trajectory_recorder(&self) -> Option<&TrajectoryRecorder> {
        self.trajectory_recorder.as_deref()
    }

    /// Answer one user message, returning only the final text
    pub async fn run(&mut self, user_input: &str) -> Result<String> {
        Ok(self.execute(user_input).await?.final_result)
    }

    /// Answer one user message
    pub async fn execute(&mut self, user_input: &str) -> Result<AgentExecution> {
        let start_time = Instant::now();
        let max_rounds = self.config.max_iterations;

        // Sessions outlive a day; the date context follows the clock
        self.refresh_date_context(chrono::Local::now().date_naive());
        self.memory.add_user_message(user_input);
        self.record(|| TrajectoryEntry::user_message(user_input)).await;

        let tool_definitions = self.tools.get_tool_definitions();
        let tool_definitions = (!tool_definitions.is_empty()).then_some(tool_definitions);

        for round in 1..=max_rounds {
            info!("Agent round {}/{}", round, max_rounds);

            let messages = self.memory.messages();
            let model = self.llm_client.model_name().to_string();
            let provider = self.llm_client.provider_name().to_string();
            self.record(|| TrajectoryEntry::llm_request(messages.clone(), model, provider, round))
                .await;

            let response = match self
                .llm_client
                .chat_completion(messages, tool_definitions.clone(), None)
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    error!("LLM request failed in round {}: {}", round, e);
                    return Err(e);
                }
            };

            let parsed = parse_response(&response);
            debug!(
                "Parsed response: content={:?}, tool_calls={}, finish_reason={}",
                parsed.content,
                parsed.tool_calls.len(),
                parsed.finish_reason.as_str()
            );
            self.record(|| {
                TrajectoryEntry::llm_response(
                    parsed.content.clone(),
                    parsed.tool_calls.clone(),
                    parsed.finish_reason.as_str().to_string(),
                    response.usage.clone(),
                    round,
                )
            })
            .await;

            if parsed.tool_calls.is_empty() {
                self.memory.add_assistant_message(parsed.content.clone(), Vec::new());

                let final_result = parsed
                    .content
                    .filter(|content| !content.is_empty())
                    .unwrap_or_else(|| FALLBACK_RESPONSE.to_string());

                return Ok(self
                    .finish(final_result, round, ExecutionOutcome::Answered, start_time)
                    .await);
            }

            self.memory
                .add_assistant_message(parsed.content.clone(), parsed.tool_calls.clone());

            for call in &parsed.tool_calls {
                info!("Executing tool '{}' (id: {})", call.name, call.id);
                self.record(|| TrajectoryEntry::tool_call(call.clone(), round))
                    .await;

                let result = self.tools.execute_call(call).await;
                if result.success {
                    debug!("Tool '{}' result: {}", result.name, result.content);
                } else {
                    warn!("Tool '{}' failed: {}", result.name, result.content);
                }

                self.memory.add_tool_result(
                    result.tool_call_id.clone(),
                    result.name.clone(),
                    result.content.clone(),
                );
                self.record(|| TrajectoryEntry::tool_result(result, round))
                    .await;
            }
        }

        warn!("Reached the maximum of {} rounds without an answer", max_rounds);
        Ok(self
            .finish(
                MAX_ROUNDS_MESSAGE.to_string(),
                max_rounds,
                ExecutionOutcome::MaxRoundsExceeded,
                start_time,
            )
            .await)
    }

    /// Start over with an empty transcript and the same system prompt
    pub fn reset(&mut self) {
        self.memory.clear();
    }

    /// Rendered transcript, system prompt first
    pub fn history(&self) -> Vec<LlmMessage> {
        self.memory.messages()
    }

    async fn finish(
        &self,
        final_result: String,
        rounds: usize,
        outcome: ExecutionOutcome,
        start_time: Instant,
    ) -> AgentExecution {
        let answered = outcome == ExecutionOutcome::Answered;
        self.record(|| TrajectoryEntry::turn_complete(final_result.clone(), rounds, answered))
            .await;

        let duration_ms = start_time.elapsed().as_millis() as u64;
        match outcome {
            ExecutionOutcome::Answered => AgentExecution::answered(final_result, rounds, duration_ms),
            ExecutionOutcome::MaxRoundsExceeded => {
                AgentExecution::exhausted(final_result, rounds, duration_ms)
            }
        }
    }

    /// Record a trajectory entry if recording is on. Recording failures are
    /// logged and never interrupt the turn.
    async fn record<F>(&self, entry: F)
    where
        F: FnOnce() -> TrajectoryEntry,
    {
        if let Some(recorder) = &self.trajectory_recorder {
            if let Err(e) = recorder.record(entry()).await {
                warn!("Failed to record trajectory entry: {}", e);
            }
        }
    }
}
