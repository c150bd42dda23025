//! Conversation sessions

pub mod registry;

pub use registry::{AgentFactory, ResetOutcome, SessionId, SessionRegistry};
