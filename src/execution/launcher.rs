//! Bootstrap launcher - install dependencies, then start the app

use crate::{
    core::{CommandSpec, LaunchOutcome, LauncherConfig, StepOutcome},
    pause::Pause,
    runner::ProcessRunner,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Events that can occur during a launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchEvent {
    InstallStarted {
        run_id: Uuid,
        command: CommandSpec,
    },
    InstallFailed {
        run_id: Uuid,
        exit_code: i32,
    },
    LaunchStarted {
        run_id: Uuid,
        app_name: String,
        interpreter: String,
        command: CommandSpec,
    },
    LaunchFinished {
        run_id: Uuid,
        exit_code: i32,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(&LaunchEvent) + Send + Sync>;

/// Runs the install-check-run-pause sequence
pub struct Launcher<R> {
    config: LauncherConfig,
    runner: R,
    pause: Box<dyn Pause>,
    event_handlers: Vec<EventHandler>,
}

impl<R: ProcessRunner> Launcher<R> {
    pub fn new(config: LauncherConfig, runner: R, pause: Box<dyn Pause>) -> Self {
        Self {
            config,
            runner,
            pause,
            event_handlers: Vec::new(),
        }
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(&LaunchEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    fn emit_event(&self, event: LaunchEvent) {
        for handler in &self.event_handlers {
            handler(&event);
        }
    }

    async fn run_step(&self, run_id: Uuid, command: &CommandSpec) -> StepOutcome {
        match self.runner.run(command).await {
            Ok(code) => StepOutcome::Exited { code },
            Err(e) => {
                error!(%run_id, "{}", e);
                StepOutcome::SpawnFailed {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Execute the launch sequence.
    ///
    /// The application is started only when the install step exits 0. The
    /// operator is asked to acknowledge before returning on every path.
    pub async fn run(&self) -> LaunchOutcome {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();

        let install_command = self.config.install_command();
        info!(%run_id, command = %install_command, "Installing dependencies");
        self.emit_event(LaunchEvent::InstallStarted {
            run_id,
            command: install_command.clone(),
        });

        let install = self.run_step(run_id, &install_command).await;

        if !install.is_success() {
            let exit_code = install.exit_code();
            warn!(%run_id, exit_code, "Dependency installation failed");
            self.emit_event(LaunchEvent::InstallFailed { run_id, exit_code });
            self.pause.wait().await;

            return LaunchOutcome {
                run_id,
                started_at,
                finished_at: Utc::now(),
                install,
                launch: None,
            };
        }

        let launch_command = self.config.launch_command();
        info!(%run_id, command = %launch_command, "Starting {}", self.config.app_name);
        self.emit_event(LaunchEvent::LaunchStarted {
            run_id,
            app_name: self.config.app_name.clone(),
            interpreter: self.config.interpreter.label(),
            command: launch_command.clone(),
        });

        let launch = self.run_step(run_id, &launch_command).await;
        let exit_code = launch.exit_code();
        info!(%run_id, exit_code, "{} exited", self.config.app_name);
        self.emit_event(LaunchEvent::LaunchFinished { run_id, exit_code });

        self.pause.wait().await;

        LaunchOutcome {
            run_id,
            started_at,
            finished_at: Utc::now(),
            install,
            launch: Some(launch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SPAWN_FAILURE_EXIT_CODE;
    use crate::pause::NoPause;
    use crate::runner::{CapturedOutput, RunnerError};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Returns scripted exit codes in order; `None` simulates a spawn failure
    struct ScriptedRunner {
        codes: Mutex<VecDeque<Option<i32>>>,
        calls: Arc<Mutex<Vec<CommandSpec>>>,
    }

    impl ScriptedRunner {
        fn new(codes: Vec<Option<i32>>) -> Self {
            Self {
                codes: Mutex::new(codes.into()),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl ProcessRunner for ScriptedRunner {
        async fn run(&self, command: &CommandSpec) -> Result<i32, RunnerError> {
            self.calls.lock().unwrap().push(command.clone());
            match self.codes.lock().unwrap().pop_front().flatten() {
                Some(code) => Ok(code),
                None => Err(RunnerError::Spawn {
                    program: command.program.clone(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
                }),
            }
        }

        async fn capture(
            &self,
            _command: &CommandSpec,
            _timeout: Duration,
        ) -> Result<CapturedOutput, RunnerError> {
            unreachable!("launcher never captures")
        }
    }

    fn launcher(codes: Vec<Option<i32>>) -> (Launcher<ScriptedRunner>, Arc<Mutex<Vec<CommandSpec>>>) {
        let runner = ScriptedRunner::new(codes);
        let calls = runner.calls.clone();
        (
            Launcher::new(LauncherConfig::default(), runner, Box::new(NoPause)),
            calls,
        )
    }

    #[tokio::test]
    async fn test_install_failure_skips_launch() {
        let (launcher, calls) = launcher(vec![Some(1)]);
        let outcome = launcher.run().await;

        assert_eq!(outcome.exit_code(), 1);
        assert!(outcome.launch.is_none());
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_success_launches_once() {
        let (launcher, calls) = launcher(vec![Some(0), Some(0)]);
        let outcome = launcher.run().await;

        assert_eq!(outcome.exit_code(), 0);
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1], LauncherConfig::default().launch_command());
    }

    #[tokio::test]
    async fn test_missing_interpreter_is_install_failure() {
        let (launcher, calls) = launcher(vec![None]);
        let outcome = launcher.run().await;

        assert_eq!(outcome.exit_code(), SPAWN_FAILURE_EXIT_CODE);
        assert!(!outcome.launched());
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_events_in_order() {
        let (mut launcher, _) = launcher(vec![Some(0), Some(2)]);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        launcher.add_event_handler(move |event| sink.lock().unwrap().push(event.clone()));

        let outcome = launcher.run().await;

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(matches!(seen[0], LaunchEvent::InstallStarted { .. }));
        assert!(matches!(seen[1], LaunchEvent::LaunchStarted { .. }));
        assert_eq!(
            seen[2],
            LaunchEvent::LaunchFinished {
                run_id: outcome.run_id,
                exit_code: 2
            }
        );
    }
}
