//! Test utilities for fitai-launcher

#![allow(dead_code)]

use async_trait::async_trait;
use launcher::cli::output::format_launch_event;
use launcher::{
    CapturedOutput, CommandSpec, LaunchEvent, LaunchOutcome, Launcher, LauncherConfig, Pause,
    ProcessRunner, RunnerError,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a scripted command does
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Exit with this code
    Exit(i32),
    /// Fail to start
    NotFound,
    /// Print on stdout/stderr and exit (capture only)
    Output {
        exit_code: i32,
        stdout: String,
        stderr: String,
    },
    /// Exceed the capture timeout
    Hang,
}

/// Mock runner that replays scripted results and records every command
///
/// Clones share the script and the call log.
#[derive(Clone)]
pub struct MockRunner {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    calls: Arc<Mutex<Vec<CommandSpec>>>,
}

impl MockRunner {
    pub fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Runner whose commands exit with the given codes in order
    pub fn exits(codes: &[i32]) -> Self {
        Self::new(codes.iter().copied().map(Scripted::Exit).collect())
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    fn next(&self, command: &CommandSpec) -> Scripted {
        self.calls.lock().unwrap().push(command.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("MockRunner: no scripted result for `{}`", command))
    }

    fn not_found(command: &CommandSpec) -> RunnerError {
        RunnerError::Spawn {
            program: command.program.clone(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "program not found"),
        }
    }
}

#[async_trait]
impl ProcessRunner for MockRunner {
    async fn run(&self, command: &CommandSpec) -> Result<i32, RunnerError> {
        match self.next(command) {
            Scripted::Exit(code) => Ok(code),
            Scripted::Output { exit_code, .. } => Ok(exit_code),
            Scripted::NotFound => Err(Self::not_found(command)),
            Scripted::Hang => panic!("MockRunner: run() has no timeout to hang on"),
        }
    }

    async fn capture(
        &self,
        command: &CommandSpec,
        timeout: Duration,
    ) -> Result<CapturedOutput, RunnerError> {
        match self.next(command) {
            Scripted::Exit(code) => Ok(CapturedOutput {
                exit_code: code,
                ..CapturedOutput::default()
            }),
            Scripted::Output {
                exit_code,
                stdout,
                stderr,
            } => Ok(CapturedOutput {
                exit_code,
                stdout,
                stderr,
            }),
            Scripted::NotFound => Err(Self::not_found(command)),
            Scripted::Hang => Err(RunnerError::Timeout(timeout)),
        }
    }
}

/// Marker written to the console log when the launcher pauses
pub const PAUSE_MARKER: &str = "<pause>";

/// Pause that counts how often the operator was asked to acknowledge
#[derive(Clone, Default)]
pub struct RecordingPause {
    count: Arc<AtomicUsize>,
    log: Option<Arc<Mutex<Vec<String>>>>,
}

impl RecordingPause {
    /// Also append `PAUSE_MARKER` to `log` on every pause
    pub fn with_log(log: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            count: Arc::new(AtomicUsize::new(0)),
            log: Some(log),
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Pause for RecordingPause {
    async fn wait(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
        if let Some(log) = &self.log {
            log.lock().unwrap().push(PAUSE_MARKER.to_string());
        }
    }
}

/// Result of a launcher run under test
pub struct LaunchTestResult {
    pub outcome: LaunchOutcome,
    /// Console lines in order, with pauses recorded as `PAUSE_MARKER`
    pub console: Vec<String>,
    pub events: Vec<LaunchEvent>,
    pub calls: Vec<CommandSpec>,
    pub pauses: usize,
}

/// Config pinned to the Windows `py` launcher so commands are deterministic
pub fn windows_config() -> LauncherConfig {
    let mut config = LauncherConfig::default();
    config.interpreter.program = "py".to_string();
    config.interpreter.args = vec!["-3.11".to_string()];
    config
}

/// Run the launcher against a mock runner
pub async fn run_launcher(config: LauncherConfig, runner: MockRunner) -> LaunchTestResult {
    let console = Arc::new(Mutex::new(Vec::new()));
    let pause = RecordingPause::with_log(console.clone());
    let events = Arc::new(Mutex::new(Vec::new()));

    let mut launcher = Launcher::new(config, runner.clone(), Box::new(pause.clone()));
    {
        let console = console.clone();
        let events = events.clone();
        launcher.add_event_handler(move |event| {
            events.lock().unwrap().push(event.clone());
            if let Some(line) = format_launch_event(event) {
                console.lock().unwrap().push(line);
            }
        });
    }

    let outcome = launcher.run().await;

    let console = console.lock().unwrap().clone();
    let events = events.lock().unwrap().clone();
    LaunchTestResult {
        outcome,
        console,
        events,
        calls: runner.calls(),
        pauses: pause.count(),
    }
}
