//! Subprocess runner backed by tokio::process

use crate::core::{CommandSpec, NO_EXIT_CODE};
use crate::runner::{CapturedOutput, ProcessRunner, RunnerError};
use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Runs commands as real child processes
#[derive(Debug, Clone, Default)]
pub struct SubprocessRunner;

impl SubprocessRunner {
    pub fn new() -> Self {
        Self
    }

    fn command(spec: &CommandSpec) -> Command {
        let mut command = Command::new(&spec.program);
        command.args(&spec.args).kill_on_drop(true);
        if let Some(dir) = &spec.working_dir {
            command.current_dir(dir);
        }
        command
    }

    fn spawn_error(spec: &CommandSpec, source: std::io::Error) -> RunnerError {
        RunnerError::Spawn {
            program: spec.program.clone(),
            source,
        }
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    match status.code() {
        Some(code) => code,
        None => {
            warn!("Child terminated without an exit code ({})", status);
            NO_EXIT_CODE
        }
    }
}

#[async_trait]
impl ProcessRunner for SubprocessRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<i32, RunnerError> {
        debug!("Spawning: {}", spec);

        let mut child = Self::command(spec)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Self::spawn_error(spec, e))?;

        // Ctrl-C reaches the child through the shared console. Keep waiting so
        // the child decides how to exit and the launcher can still pause.
        let status = loop {
            tokio::select! {
                status = child.wait() => break status?,
                interrupt = tokio::signal::ctrl_c() => match interrupt {
                    Ok(()) => info!("Interrupt received, waiting for {} to exit", spec.program),
                    Err(e) => {
                        warn!("Failed to listen for interrupts: {}", e);
                        break child.wait().await?;
                    }
                },
            }
        };
        let code = exit_code(status);
        debug!("{} exited with code {}", spec.program, code);
        Ok(code)
    }

    async fn capture(
        &self,
        spec: &CommandSpec,
        limit: Duration,
    ) -> Result<CapturedOutput, RunnerError> {
        debug!("Capturing: {}", spec);

        let child = Self::command(spec)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Self::spawn_error(spec, e))?;

        let output = timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| RunnerError::Timeout(limit))??;

        Ok(CapturedOutput {
            exit_code: exit_code(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
