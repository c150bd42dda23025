//! Trajectory recorder

use crate::error::{Result, TrajectoryError};
use crate::trajectory::{EntryType, TrajectoryEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;

/// Records conversation trajectories for debugging and analysis
pub struct TrajectoryRecorder {
    id: String,
    entries: RwLock<Vec<TrajectoryEntry>>,
    file_path: Option<PathBuf>,
}

/// Complete trajectory data as written to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trajectory {
    pub metadata: TrajectoryMetadata,
    pub entries: Vec<TrajectoryEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryMetadata {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub version: String,

    /// User messages in the order they arrived
    pub user_messages: Vec<String>,

    /// Turns that finished, answered or not
    pub completed_turns: usize,

    /// Turns that ran out of rounds
    pub exhausted_turns: usize,

    pub duration_ms: Option<u64>,
}

impl TrajectoryRecorder {
    /// Create an in-memory recorder
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            entries: RwLock::new(Vec::new()),
            file_path: None,
        }
    }

    /// Create a recorder that rewrites `path` after every entry
    pub fn with_file<P: AsRef<Path>>(path: P) -> Self {
        Self {
            file_path: Some(path.as_ref().to_path_buf()),
            ..Self::new()
        }
    }

    /// Record a trajectory entry
    pub async fn record(&self, entry: TrajectoryEntry) -> Result<()> {
        self.entries.write().await.push(entry);

        if self.file_path.is_some() {
            self.save().await?;
        }

        Ok(())
    }

    pub async fn get_entries(&self) -> Vec<TrajectoryEntry> {
        self.entries.read().await.clone()
    }

    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Save the trajectory to its file, if one is set
    pub async fn save(&self) -> Result<()> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };

        let trajectory = self.build_trajectory().await;
        let json = serde_json::to_string_pretty(&trajectory).map_err(|e| {
            TrajectoryError::RecordingFailed {
                message: format!("Failed to serialize trajectory: {}", e),
            }
        })?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        fs::write(path, json).await?;
        Ok(())
    }

    /// Load a trajectory from file
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Trajectory> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(TrajectoryError::LoadFailed {
                path: path.to_string_lossy().to_string(),
            }
            .into());
        }

        let content = fs::read_to_string(path).await?;
        let trajectory: Trajectory =
            serde_json::from_str(&content).map_err(|_| TrajectoryError::InvalidFormat)?;

        Ok(trajectory)
    }

    async fn build_trajectory(&self) -> Trajectory {
        let entries = self.entries.read().await.clone();

        let started_at = entries
            .first()
            .map(|e| e.timestamp)
            .unwrap_or_else(Utc::now);
        let completed_at = entries.last().map(|e| e.timestamp);
        let duration_ms = completed_at.map(|end| (end - started_at).num_milliseconds() as u64);

        let mut user_messages = Vec::new();
        let mut completed_turns = 0;
        let mut exhausted_turns = 0;

        for entry in &entries {
            match &entry.entry_type {
                EntryType::UserMessage { content } => user_messages.push(content.clone()),
                EntryType::TurnComplete { answered, .. } => {
                    completed_turns += 1;
                    if !answered {
                        exhausted_turns += 1;
                    }
                }
                _ => {}
            }
        }

        Trajectory {
            metadata: TrajectoryMetadata {
                id: self.id.clone(),
                started_at,
                completed_at,
                version: "1.0".to_string(),
                user_messages,
                completed_turns,
                exhausted_turns,
                duration_ms,
            },
            entries,
        }
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }
}

impl Default for TrajectoryRecorder {
    fn default() -> Self {
        Self::new()
    }
}
