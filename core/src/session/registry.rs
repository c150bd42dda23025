//! Registry of live conversations.
//!
//! Each conversation owns one agent behind its own mutex so turns of one
//! conversation run one at a time while distinct conversations proceed
//! concurrently.

use crate::agent::AgentExecutor;
use crate::error::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

pub type SessionId = String;

/// Creates a fresh agent for the conversation with the given id
pub type AgentFactory = Arc<dyn Fn(&str) -> Result<AgentExecutor> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetOutcome {
    Reset(SessionId),
    NotFound,
}

#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<SessionId, Arc<Mutex<AgentExecutor>>>>>,
    factory: AgentFactory,
}

impl SessionRegistry {
    pub fn new(factory: AgentFactory) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            factory,
        }
    }

    /// Resume the conversation with `session_id`, or start one.
    ///
    /// A missing or empty id gets a fresh UUID; an unknown id is adopted
    /// as the new conversation's id.
    pub async fn get_or_create(
        &self,
        session_id: Option<&str>,
    ) -> Result<(Arc<Mutex<AgentExecutor>>, SessionId)> {
        let requested = session_id.filter(|id| !id.is_empty());

        if let Some(id) = requested {
            if let Some(agent) = self.sessions.read().await.get(id) {
                return Ok((agent.clone(), id.to_string()));
            }
        }

        let id = requested
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let mut sessions = self.sessions.write().await;
        // Another request may have created it while we waited for the lock
        if let Some(agent) = sessions.get(&id) {
            return Ok((agent.clone(), id));
        }

        let agent = Arc::new(Mutex::new((self.factory)(&id)?));
        sessions.insert(id.clone(), agent.clone());
        info!("Started conversation {}", id);

        Ok((agent, id))
    }

    /// Clear the transcript of a conversation
    pub async fn reset(&self, session_id: Option<&str>) -> ResetOutcome {
        let Some(id) = session_id.filter(|id| !id.is_empty()) else {
            return ResetOutcome::NotFound;
        };

        let agent = self.sessions.read().await.get(id).cloned();
        match agent {
            Some(agent) => {
                agent.lock().await.reset();
                info!("Reset conversation {}", id);
                ResetOutcome::Reset(id.to_string())
            }
            None => ResetOutcome::NotFound,
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
