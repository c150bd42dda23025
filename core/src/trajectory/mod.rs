//! Execution trajectory recording

pub mod entry;
pub mod recorder;

pub use entry::{EntryType, TrajectoryEntry};
pub use recorder::{Trajectory, TrajectoryMetadata, TrajectoryRecorder};
