//! Launch outcome models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exit code reported when a step's program could not be started.
///
/// Matches what the shell reports for an unknown command: 9009 from
/// `cmd.exe`, 127 from POSIX shells. Unix exit statuses are 8 bits wide.
#[cfg(windows)]
pub const SPAWN_FAILURE_EXIT_CODE: i32 = 9009;

#[cfg(not(windows))]
pub const SPAWN_FAILURE_EXIT_CODE: i32 = 127;

/// Exit code reported when a child ended without one (killed by a signal)
pub const NO_EXIT_CODE: i32 = 1;

/// The two steps of a launch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchStep {
    /// `pip install -r <manifest>`
    Install,
    /// `<framework> run <entry>`
    Launch,
}

impl std::fmt::Display for LaunchStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LaunchStep::Install => write!(f, "install"),
            LaunchStep::Launch => write!(f, "launch"),
        }
    }
}

/// How a single step ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepOutcome {
    /// The process ran and exited
    Exited { code: i32 },
    /// The process could not be started
    SpawnFailed { error: String },
}

impl StepOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            StepOutcome::Exited { code } => *code,
            StepOutcome::SpawnFailed { .. } => SPAWN_FAILURE_EXIT_CODE,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StepOutcome::Exited { code: 0 })
    }
}

/// Result of one launcher invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchOutcome {
    /// Correlates the log lines of this invocation
    pub run_id: Uuid,

    pub started_at: DateTime<Utc>,

    pub finished_at: DateTime<Utc>,

    /// Dependency installation result
    pub install: StepOutcome,

    /// Application run result; `None` when the install failed
    pub launch: Option<StepOutcome>,
}

impl LaunchOutcome {
    /// Exit code of whichever step ended the run
    pub fn exit_code(&self) -> i32 {
        match &self.launch {
            Some(launch) => launch.exit_code(),
            None => self.install.exit_code(),
        }
    }

    /// Whether the application was started
    pub fn launched(&self) -> bool {
        self.launch.is_some()
    }

    /// The step that ended the run
    pub fn final_step(&self) -> LaunchStep {
        if self.launch.is_some() {
            LaunchStep::Launch
        } else {
            LaunchStep::Install
        }
    }
}
