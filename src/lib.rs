//! fitai-launcher - installs FitAI's dependencies with a pinned Python and starts the app

pub mod cli;
pub mod core;
pub mod doctor;
pub mod execution;
pub mod pause;
pub mod runner;

// Re-export commonly used types
pub use crate::core::{CommandSpec, LaunchOutcome, LauncherConfig, StepOutcome};
pub use doctor::{diagnose, DoctorReport, InterpreterVerdict};
pub use execution::{LaunchEvent, Launcher};
pub use pause::{ConsolePause, NoPause, Pause};
pub use runner::{CapturedOutput, ProcessRunner, RunnerError, SubprocessRunner};
