//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{DoctorCommand, RunCommand, ShowConfigCommand};
use crate::core::ConfigOverrides;
use std::ffi::OsString;
use std::path::PathBuf;

/// FitAI bootstrap launcher
#[derive(Debug, Parser, Clone)]
#[command(name = "fitai-launcher")]
#[command(author = "FitAI Contributors")]
#[command(version = "0.1.0")]
#[command(
    about = "Installs FitAI's dependencies with the pinned Python and starts the app",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to launcher configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Exit without waiting for a key press
    #[arg(long, global = true)]
    pub no_pause: bool,

    /// Python executable to use instead of the pinned one
    #[arg(long, global = true)]
    pub interpreter: Option<String>,

    /// Dependency manifest to install
    #[arg(long, global = true)]
    pub requirements: Option<PathBuf>,

    /// Application entry file
    #[arg(long, global = true)]
    pub entry: Option<PathBuf>,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Install dependencies and start the app (default)
    Run(RunCommand),

    /// Check the interpreter version and project files
    Doctor(DoctorCommand),

    /// Print the resolved configuration
    ShowConfig(ShowConfigCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }

    /// The subcommand to execute; `run` when none was given
    pub fn resolved_command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Run(RunCommand::default()))
    }

    /// Configuration overrides from the global flags
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            interpreter: self.interpreter.clone(),
            requirements: self.requirements.clone(),
            entry: self.entry.clone(),
            no_pause: self.no_pause,
        }
    }
}
