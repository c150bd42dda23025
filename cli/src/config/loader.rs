//! CLI configuration loader for budgie
//!
//! Loads one JSON file, then layers environment variables and flag
//! overrides on top:
//! 1. --config file/dir (highest priority)
//! 2. Current working directory: ./budgie.json or ./.budgie/config.json
//! 3. XDG config: $XDG_CONFIG_HOME/budgie/config.json or ~/.config/budgie/config.json
//! 4. No file: built-in defaults
//!
//! Environment: BUDGIE_BASE_URL (or VLLM_BASE_URL), BUDGIE_MODEL (or
//! VLLM_MODEL), BUDGIE_API_KEY, BUDGIE_DATABASE, BUDGIE_ALLOWED_ORIGINS.

use anyhow::{anyhow, Context, Result};
use budgie_core::config::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use budgie_core::{AgentConfig, ModelParams, ResolvedLlmConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const DEFAULT_DATABASE: &str = "budget.db";
const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:3000"];

/// Raw configuration file format. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawConfig {
    pub base_url: Option<String>,
    pub model: Option<String>,
    /// API key (can be "env:VAR_NAME" for environment variable)
    pub api_key: Option<String>,
    #[serde(default)]
    pub params: ModelParams,
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// SQLite ledger file
    pub database: Option<PathBuf>,
    pub max_iterations: Option<usize>,
    pub max_messages: Option<usize>,
    pub system_prompt: Option<String>,

    #[serde(default)]
    pub server: RawServerConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawServerConfig {
    pub bind: Option<String>,
    pub allowed_origins: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind: String,
    pub allowed_origins: Vec<String>,
}

/// Fully resolved application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm: ResolvedLlmConfig,
    pub agent: AgentConfig,
    pub database: PathBuf,
    pub server: ServerConfig,
}

/// CLI configuration loader
#[derive(Default)]
pub struct CliConfigLoader {
    config_override: Option<PathBuf>,
    search_root: Option<PathBuf>,
    api_key_override: Option<String>,
    base_url_override: Option<String>,
    model_override: Option<String>,
    database_override: Option<PathBuf>,
    max_iterations_override: Option<usize>,
    bind_override: Option<String>,
}

impl CliConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set config file/directory override
    pub fn with_config_override(mut self, path: PathBuf) -> Self {
        self.config_override = Some(path);
        self
    }

    /// Directory searched for ./budgie.json instead of the working directory
    pub fn with_search_root(mut self, path: PathBuf) -> Self {
        self.search_root = Some(path);
        self
    }

    pub fn with_api_key_override(mut self, api_key: String) -> Self {
        self.api_key_override = Some(api_key);
        self
    }

    pub fn with_base_url_override(mut self, base_url: String) -> Self {
        self.base_url_override = Some(base_url);
        self
    }

    pub fn with_model_override(mut self, model: String) -> Self {
        self.model_override = Some(model);
        self
    }

    pub fn with_database_override(mut self, database: PathBuf) -> Self {
        self.database_override = Some(database);
        self
    }

    pub fn with_max_iterations_override(mut self, max_iterations: usize) -> Self {
        self.max_iterations_override = Some(max_iterations);
        self
    }

    pub fn with_bind_override(mut self, bind: String) -> Self {
        self.bind_override = Some(bind);
        self
    }

    /// Load and resolve configuration using the process environment
    pub async fn load(&self) -> Result<AppConfig> {
        self.load_with_env(|name| std::env::var(name).ok()).await
    }

    /// Load and resolve configuration with a custom environment lookup
    pub async fn load_with_env<F>(&self, env: F) -> Result<AppConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Step 1: Find and load base configuration
        let mut config = if let Some(override_path) = &self.config_override {
            self.load_from_path(override_path).await.with_context(|| {
                format!(
                    "Failed to load config from override path: {}",
                    override_path.display()
                )
            })?
        } else {
            self.search_and_load(&env).await?
        };

        // Step 2: Environment
        self.apply_env(&mut config, &env);

        // Step 3: Flag overrides
        if let Some(api_key) = &self.api_key_override {
            config.api_key = Some(api_key.clone());
        }
        if let Some(base_url) = &self.base_url_override {
            config.base_url = Some(base_url.clone());
        }
        if let Some(model) = &self.model_override {
            config.model = Some(model.clone());
        }
        if let Some(database) = &self.database_override {
            config.database = Some(database.clone());
        }
        if let Some(max_iterations) = self.max_iterations_override {
            config.max_iterations = Some(max_iterations);
        }
        if let Some(bind) = &self.bind_override {
            config.server.bind = Some(bind.clone());
        }

        // Step 4: Resolve
        resolve_config(config, &env)
    }

    async fn search_and_load<F>(&self, env: &F) -> Result<RawConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let root = match &self.search_root {
            Some(root) => root.clone(),
            None => std::env::current_dir()?,
        };

        let candidates = [
            Some(root.join("budgie.json")),
            Some(root.join(".budgie").join("config.json")),
            xdg_config_dir(env).map(|dir| dir.join("budgie").join("config.json")),
        ];

        for path in candidates.into_iter().flatten() {
            if path.is_file() {
                tracing::debug!("Loading configuration from {}", path.display());
                return self.load_file(&path).await;
            }
        }

        tracing::debug!("No configuration file found, using defaults");
        Ok(RawConfig::default())
    }

    fn apply_env<F>(&self, config: &mut RawConfig, env: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |names: &[&str]| names.iter().find_map(|name| env(name));

        if let Some(base_url) = first(&["BUDGIE_BASE_URL", "VLLM_BASE_URL"]) {
            config.base_url = Some(base_url);
        }
        if let Some(model) = first(&["BUDGIE_MODEL", "VLLM_MODEL"]) {
            config.model = Some(model);
        }
        if let Some(api_key) = env("BUDGIE_API_KEY") {
            config.api_key = Some(api_key);
        }
        if let Some(database) = env("BUDGIE_DATABASE") {
            config.database = Some(PathBuf::from(database));
        }
        if let Some(origins) = env("BUDGIE_ALLOWED_ORIGINS") {
            config.server.allowed_origins = Some(
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_string)
                    .collect(),
            );
        }
    }

    /// Load configuration from a specific path (file or directory)
    async fn load_from_path(&self, path: &Path) -> Result<RawConfig> {
        if path.is_file() {
            self.load_file(path).await
        } else if path.is_dir() {
            let config_file = path.join("config.json");
            if config_file.exists() {
                self.load_file(&config_file).await
            } else {
                Err(anyhow!(
                    "No config.json found in directory: {}",
                    path.display()
                ))
            }
        } else {
            Err(anyhow!("Config path does not exist: {}", path.display()))
        }
    }

    async fn load_file(&self, path: &Path) -> Result<RawConfig> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

fn xdg_config_dir<F>(env: &F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    env("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
}

fn resolve_config<F>(config: RawConfig, env: &F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    // Resolve API key (handle env: prefix)
    let api_key = match config.api_key {
        Some(key) => match key.strip_prefix("env:") {
            Some(var_name) => Some(
                env(var_name)
                    .ok_or_else(|| anyhow!("Environment variable not found: {}", var_name))?,
            ),
            None => Some(key),
        },
        None => None,
    }
    .filter(|key| !key.is_empty());

    let mut llm = ResolvedLlmConfig::new(
        config.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        config.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
    )
    .with_params(config.params)
    .with_headers(config.headers);
    if let Some(api_key) = api_key {
        llm = llm.with_api_key(api_key);
    }

    llm.validate()
        .map_err(|e| anyhow!("Configuration validation failed: {}", e))?;

    let defaults = AgentConfig::default();
    let agent = AgentConfig {
        max_iterations: config.max_iterations.unwrap_or(defaults.max_iterations),
        max_messages: config.max_messages.unwrap_or(defaults.max_messages),
        system_prompt: config.system_prompt,
    };
    agent
        .validate()
        .map_err(|e| anyhow!("Configuration validation failed: {}", e))?;

    let server = ServerConfig {
        bind: config
            .server
            .bind
            .unwrap_or_else(|| DEFAULT_BIND.to_string()),
        allowed_origins: config.server.allowed_origins.unwrap_or_else(|| {
            DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|o| o.to_string())
                .collect()
        }),
    };

    Ok(AppConfig {
        llm,
        agent,
        database: config
            .database
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE)),
        server,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn isolated_loader(root: &Path) -> CliConfigLoader {
        CliConfigLoader::new().with_search_root(root.to_path_buf())
    }

    /// Environment holding only `pairs`, with XDG pointed inside `root`
    fn isolated_env(root: &Path, pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let mut map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        map.insert(
            "XDG_CONFIG_HOME".to_string(),
            root.join("xdg").to_string_lossy().to_string(),
        );
        move |name| map.get(name).cloned()
    }

    #[tokio::test]
    async fn test_defaults_without_any_source() {
        let dir = tempdir().unwrap();
        let config = isolated_loader(dir.path())
            .load_with_env(isolated_env(dir.path(), &[]))
            .await
            .unwrap();

        assert_eq!(config.llm.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.llm.model, DEFAULT_MODEL);
        assert!(config.llm.api_key.is_none());
        assert_eq!(config.agent.max_iterations, 10);
        assert_eq!(config.database, PathBuf::from("budget.db"));
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.server.allowed_origins.len(), 2);
    }

    #[tokio::test]
    async fn test_cwd_file_then_env_then_flags() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("budgie.json"),
            r#"{
                "base_url": "http://file:8000",
                "model": "file-model",
                "max_iterations": 4,
                "params": {"temperature": 0.2},
                "server": {"allowed_origins": ["http://app.local"]}
            }"#,
        )
        .unwrap();

        let config = isolated_loader(dir.path())
            .with_model_override("flag-model".to_string())
            .load_with_env(isolated_env(
                dir.path(),
                &[("VLLM_BASE_URL", "http://env:9000"), ("VLLM_MODEL", "env-model")],
            ))
            .await
            .unwrap();

        assert_eq!(config.llm.base_url, "http://env:9000");
        assert_eq!(config.llm.model, "flag-model");
        assert_eq!(config.llm.params.temperature, 0.2);
        assert_eq!(config.llm.params.max_tokens, 2048);
        assert_eq!(config.agent.max_iterations, 4);
        assert_eq!(config.server.allowed_origins, vec!["http://app.local"]);
    }

    #[tokio::test]
    async fn test_budgie_env_wins_over_vllm_env() {
        let dir = tempdir().unwrap();
        let config = isolated_loader(dir.path())
            .load_with_env(isolated_env(
                dir.path(),
                &[
                    ("BUDGIE_BASE_URL", "http://budgie:1"),
                    ("VLLM_BASE_URL", "http://vllm:2"),
                    ("BUDGIE_DATABASE", "/tmp/ledger.db"),
                ],
            ))
            .await
            .unwrap();

        assert_eq!(config.llm.base_url, "http://budgie:1");
        assert_eq!(config.database, PathBuf::from("/tmp/ledger.db"));
    }

    #[tokio::test]
    async fn test_dot_dir_and_env_api_key() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".budgie")).unwrap();
        fs::write(
            dir.path().join(".budgie").join("config.json"),
            r#"{"api_key": "env:MY_KEY", "headers": {"X-Team": "home"}}"#,
        )
        .unwrap();

        let config = isolated_loader(dir.path())
            .load_with_env(isolated_env(dir.path(), &[("MY_KEY", "secret")]))
            .await
            .unwrap();
        assert_eq!(config.llm.api_key.as_deref(), Some("secret"));
        assert_eq!(config.llm.headers.get("X-Team").map(String::as_str), Some("home"));

        let err = isolated_loader(dir.path())
            .load_with_env(isolated_env(dir.path(), &[]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("MY_KEY"));
    }

    #[tokio::test]
    async fn test_xdg_config_is_searched_last() {
        let dir = tempdir().unwrap();
        let xdg = dir.path().join("xdg").join("budgie");
        fs::create_dir_all(&xdg).unwrap();
        fs::write(xdg.join("config.json"), r#"{"model": "xdg-model"}"#).unwrap();

        let config = isolated_loader(dir.path())
            .load_with_env(isolated_env(dir.path(), &[]))
            .await
            .unwrap();
        assert_eq!(config.llm.model, "xdg-model");
    }

    #[tokio::test]
    async fn test_explicit_config_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(&path, r#"{"database": "custom.db"}"#).unwrap();

        let config = isolated_loader(dir.path())
            .with_config_override(path)
            .load_with_env(isolated_env(dir.path(), &[]))
            .await
            .unwrap();
        assert_eq!(config.database, PathBuf::from("custom.db"));

        let missing = isolated_loader(dir.path())
            .with_config_override(dir.path().join("nope.json"))
            .load_with_env(isolated_env(dir.path(), &[]))
            .await;
        assert!(missing.is_err());
    }

    #[tokio::test]
    async fn test_invalid_values_rejected() {
        let dir = tempdir().unwrap();
        let err = isolated_loader(dir.path())
            .with_base_url_override("localhost:8000".to_string())
            .load_with_env(isolated_env(dir.path(), &[]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("validation failed"));

        let err = isolated_loader(dir.path())
            .with_max_iterations_override(0)
            .load_with_env(isolated_env(dir.path(), &[]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("max_iterations"));
    }
}
