//! Interpreter and project health checks
//!
//! Newer Python releases ship before numpy publishes Windows wheels for
//! them, so pip falls back to a source build that fails. The doctor
//! reports which interpreter the launcher would use and whether it matches
//! the pinned version.

pub mod version;

use crate::core::LauncherConfig;
use crate::runner::{ProcessRunner, RunnerError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

pub use version::PythonVersion;

/// Upper bound for `python --version`
pub const VERSION_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

/// How the detected interpreter relates to the pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpreterVerdict {
    /// Same major.minor as the pin
    Pinned,
    /// Newer than the pin
    TooNew,
    /// Older than the pin
    TooOld,
    /// The interpreter could not be started, or the selected version is not installed
    Missing,
    /// The interpreter ran but printed no recognizable version
    Unrecognized,
}

/// Existence check for a project file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCheck {
    pub path: PathBuf,
    pub exists: bool,
}

impl FileCheck {
    fn probe(config: &LauncherConfig, path: &std::path::Path) -> Self {
        let resolved = config.resolve_path(path);
        let exists = resolved.is_file();
        Self {
            path: resolved,
            exists,
        }
    }
}

/// Result of a doctor run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorReport {
    /// Command used to query the interpreter
    pub command: String,

    /// Pinned version, e.g. "3.11"
    pub pinned: String,

    /// Version the interpreter reported
    pub detected: Option<PythonVersion>,

    pub verdict: InterpreterVerdict,

    /// Error text or unparsed output, when relevant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    pub requirements: FileCheck,

    pub entry: FileCheck,
}

impl DoctorReport {
    /// Everything the launcher needs is in place
    pub fn is_healthy(&self) -> bool {
        self.verdict == InterpreterVerdict::Pinned && self.requirements.exists && self.entry.exists
    }

    /// Remediation steps for the operator
    pub fn advice(&self) -> Vec<String> {
        let mut advice = Vec::new();
        let pinned = format!("Python {}", self.pinned);

        match self.verdict {
            InterpreterVerdict::Pinned => {}
            InterpreterVerdict::TooNew => {
                let detected = self
                    .detected
                    .map(|v| format!("Python {}", v))
                    .unwrap_or_else(|| "The detected interpreter".to_string());
                advice.push(format!(
                    "{} is newer than {}. numpy does not publish Windows wheels for it yet, so installing dependencies fails.",
                    detected, pinned
                ));
                advice.push(format!(
                    "Install {} from python.org (any patch release), then rerun the launcher.",
                    pinned
                ));
            }
            InterpreterVerdict::TooOld => {
                advice.push(format!(
                    "The detected interpreter is older than {}; some dependencies may not install.",
                    pinned
                ));
                advice.push(format!("Install {} and rerun the launcher.", pinned));
            }
            InterpreterVerdict::Missing => {
                advice.push(format!("{} was not found.", pinned));
                advice.push(format!(
                    "Install {} from python.org (enable the \"py\" launcher on Windows), then rerun the launcher.",
                    pinned
                ));
            }
            InterpreterVerdict::Unrecognized => {
                advice.push(format!(
                    "Could not determine the interpreter version; check that '{}' runs {}.",
                    self.command, pinned
                ));
            }
        }

        if !self.requirements.exists {
            advice.push(format!(
                "Dependency manifest {} is missing.",
                self.requirements.path.display()
            ));
        }
        if !self.entry.exists {
            advice.push(format!(
                "Application entry file {} is missing.",
                self.entry.path.display()
            ));
        }

        advice
    }
}

/// Query the configured interpreter and check the project files
pub async fn diagnose<R: ProcessRunner + ?Sized>(config: &LauncherConfig, runner: &R) -> DoctorReport {
    let command = config.version_command();
    let requirements = FileCheck::probe(config, &config.requirements);
    let entry = FileCheck::probe(config, &config.entry);

    let (detected, verdict, detail) = match runner.capture(&command, VERSION_CHECK_TIMEOUT).await {
        Ok(output) => {
            debug!(
                "{} exited {} (stdout: {:?}, stderr: {:?})",
                command, output.exit_code, output.stdout, output.stderr
            );
            // Python 2 and early 3.x print the version on stderr
            match PythonVersion::parse(&output.stdout).or_else(|| PythonVersion::parse(&output.stderr)) {
                Some(version) => {
                    let verdict = match config.interpreter.pinned_version() {
                        Some(pin) => match version.cmp_pin(pin) {
                            Ordering::Equal => InterpreterVerdict::Pinned,
                            Ordering::Greater => InterpreterVerdict::TooNew,
                            Ordering::Less => InterpreterVerdict::TooOld,
                        },
                        None => InterpreterVerdict::Unrecognized,
                    };
                    (Some(version), verdict, None)
                }
                None => {
                    let text = first_non_empty(&output.stderr, &output.stdout);
                    let verdict = if output.exit_code != 0 {
                        InterpreterVerdict::Missing
                    } else {
                        InterpreterVerdict::Unrecognized
                    };
                    (None, verdict, text)
                }
            }
        }
        Err(e @ RunnerError::Spawn { .. }) => (None, InterpreterVerdict::Missing, Some(e.to_string())),
        Err(e) => {
            warn!("Version check failed: {}", e);
            (None, InterpreterVerdict::Unrecognized, Some(e.to_string()))
        }
    };

    DoctorReport {
        command: command.to_string(),
        pinned: config.interpreter.version.clone(),
        detected,
        verdict,
        detail,
        requirements,
        entry,
    }
}

fn first_non_empty(a: &str, b: &str) -> Option<String> {
    [a, b]
        .iter()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .map(str::to_string)
}
