//! Minimal configuration types for Budgie core
//!
//! Core only accepts fully resolved, validated configuration.
//! All discovery, loading, and merging happens in CLI layer.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default endpoint of a local OpenAI-compatible model server
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default model served by the endpoint
pub const DEFAULT_MODEL: &str = "Qwen/Qwen2.5-7B-Instruct";

/// Model parameters for LLM requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelParams {
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Temperature for sampling (0.0 to 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// A fully resolved LLM configuration ready for use by core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedLlmConfig {
    /// Base URL for the API
    pub base_url: String,
    /// API key for authentication (local servers usually need none)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model name/identifier
    pub model: String,
    /// Model parameters
    #[serde(default)]
    pub params: ModelParams,
    /// Additional headers for requests
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl ResolvedLlmConfig {
    /// Create a new resolved LLM config
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            base_url,
            api_key: None,
            model,
            params: ModelParams::default(),
            headers: HashMap::new(),
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Set model parameters
    pub fn with_params(mut self, params: ModelParams) -> Self {
        self.params = params;
        self
    }

    /// Add multiple headers
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.is_empty() {
            return Err("Model name cannot be empty".to_string());
        }

        if self.base_url.is_empty() {
            return Err("Base URL cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("Base URL must start with http:// or https://".to_string());
        }

        if !(0.0..=2.0).contains(&self.params.temperature) {
            return Err("Temperature must be between 0.0 and 2.0".to_string());
        }

        if self.params.max_tokens == 0 {
            return Err("max_tokens must be greater than zero".to_string());
        }

        if self.params.timeout_secs == 0 {
            return Err("timeout_secs must be greater than zero".to_string());
        }

        Ok(())
    }
}

impl Default for ResolvedLlmConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL.to_string(), DEFAULT_MODEL.to_string())
    }
}
