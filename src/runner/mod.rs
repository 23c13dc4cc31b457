//! Child process execution

pub mod error;
pub mod subprocess;

use crate::core::CommandSpec;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use error::RunnerError;
pub use subprocess::SubprocessRunner;

/// Output collected from a captured child process
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Trait for spawning child processes - allows for different implementations
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run a command attached to the launcher's console and wait for it to exit.
    ///
    /// Returns the child's exit code.
    async fn run(&self, command: &CommandSpec) -> Result<i32, RunnerError>;

    /// Run a command with piped output, bounded by `timeout`
    async fn capture(
        &self,
        command: &CommandSpec,
        timeout: Duration,
    ) -> Result<CapturedOutput, RunnerError>;
}
