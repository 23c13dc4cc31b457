//! Process runner error types

use std::time::Duration;
use thiserror::Error;

/// Error types for child process operations
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RunnerError {
    /// True when the program itself could not be started
    pub fn is_spawn_failure(&self) -> bool {
        matches!(self, RunnerError::Spawn { .. })
    }
}
