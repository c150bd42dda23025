//! Error types and handling for Budgie Core

use thiserror::Error;

/// Result type alias for Budgie operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Budgie Core
#[derive(Error, Debug)]
pub enum Error {
    /// LLM client errors
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Tool execution errors
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Agent execution errors
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    /// Ledger storage errors
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Trajectory recording errors
    #[error("Trajectory error: {0}")]
    Trajectory(#[from] TrajectoryError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// LLM client errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },
}

/// Tool execution errors
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Tool execution failed: {name} - {message}")]
    ExecutionFailed { name: String, message: String },

    #[error("Invalid tool parameters: {message}")]
    InvalidParameters { message: String },
}

/// Agent execution errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Invalid agent configuration: {message}")]
    InvalidConfig { message: String },
}

/// Ledger storage errors
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid input for '{field}': {message}")]
    InvalidInput { field: String, message: String },

    #[error("Cannot create ledger directory {path}: {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },

    #[error("Ledger connection is poisoned")]
    Poisoned,
}

/// Trajectory recording errors
#[derive(Error, Debug)]
pub enum TrajectoryError {
    #[error("Failed to record trajectory: {message}")]
    RecordingFailed { message: String },

    #[error("Failed to load trajectory: {path}")]
    LoadFailed { path: String },

    #[error("Invalid trajectory format")]
    InvalidFormat,
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Ledger(LedgerError::Database(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_their_layer() {
        let err: Error = LlmError::ApiError {
            status: 503,
            message: "unavailable".to_string(),
        }
        .into();
        assert!(matches!(err, Error::Llm(_)));
        assert_eq!(err.to_string(), "LLM error: API error: 503 - unavailable");

        let err: Error = ToolError::InvalidParameters {
            message: "Missing parameter: date".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Tool error: Invalid tool parameters: Missing parameter: date"
        );
    }

    #[test]
    fn test_sqlite_error_maps_to_ledger() {
        let err: Error = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, Error::Ledger(LedgerError::Database(_))));
    }
}
