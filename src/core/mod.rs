//! Core domain models for the launcher
//!
//! This module defines the configuration, the child process commands it
//! produces, and the outcome of a launch.

pub mod command;
pub mod config;
pub mod outcome;

pub use command::*;
pub use config::{ConfigError, ConfigOverrides, InterpreterConfig, LauncherConfig};
pub use outcome::*;
