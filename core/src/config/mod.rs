//! Minimal configuration module for budgie core
//!
//! Only exports pure data types. All loading logic is in CLI layer.

pub mod types;

pub use types::{ModelParams, ResolvedLlmConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
