//! Launcher configuration: built-in pins, optional YAML overrides

use crate::core::CommandSpec;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File name looked up in the working directory when no `--config` is given
pub const LOCAL_CONFIG_FILE: &str = "fitai-launcher.yaml";

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// The pinned Python interpreter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Executable used to start the interpreter
    pub program: String,

    /// Arguments that select the interpreter version (e.g. `-3.11` for the `py` launcher)
    pub args: Vec<String>,

    /// Pinned `MAJOR.MINOR` version
    pub version: String,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        if cfg!(windows) {
            Self {
                program: "py".to_string(),
                args: vec!["-3.11".to_string()],
                version: "3.11".to_string(),
            }
        } else {
            Self {
                program: "python3.11".to_string(),
                args: Vec::new(),
                version: "3.11".to_string(),
            }
        }
    }
}

impl InterpreterConfig {
    /// Human-readable name, e.g. "Python 3.11"
    pub fn label(&self) -> String {
        format!("Python {}", self.version)
    }

    /// Parse the pin into (major, minor)
    pub fn pinned_version(&self) -> Option<(u32, u32)> {
        let (major, minor) = self.version.trim().split_once('.')?;
        Some((major.parse().ok()?, minor.parse().ok()?))
    }

    /// Base command running this interpreter, with its version selector
    pub fn command(&self) -> CommandSpec {
        CommandSpec::new(self.program.clone()).args(self.args.iter().cloned())
    }

    /// `<interp> -m <module> <args...>`
    pub fn module_command<I, S>(&self, module: &str, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command().args(["-m", module]).args(args)
    }
}

/// Top-level launcher configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Application name shown in console messages
    pub app_name: String,

    /// Pinned interpreter
    pub interpreter: InterpreterConfig,

    /// Dependency manifest passed to `pip install -r`
    pub requirements: PathBuf,

    /// Application entry file passed to the framework's `run` subcommand
    pub entry: PathBuf,

    /// Web-app framework module (`python -m <framework> run <entry>`)
    pub framework: String,

    /// Wait for operator acknowledgment before exiting
    pub pause: bool,

    /// Directory to run both steps in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            app_name: "FitAI".to_string(),
            interpreter: InterpreterConfig::default(),
            requirements: PathBuf::from("requirements.txt"),
            entry: PathBuf::from("app.py"),
            framework: "streamlit".to_string(),
            pause: true,
            working_dir: None,
        }
    }
}

/// Command-line overrides applied on top of the file configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub interpreter: Option<String>,
    pub requirements: Option<PathBuf>,
    pub entry: Option<PathBuf>,
    pub no_pause: bool,
}

impl LauncherConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string; missing fields keep their defaults
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not a mapping
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: LauncherConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the effective configuration.
    ///
    /// An explicit path must exist. Otherwise the working-directory file and
    /// then the per-user file are tried, falling back to the built-in pins.
    pub fn resolve(explicit: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::discover() {
                Some(path) => {
                    debug!("Using config file {}", path.display());
                    Self::from_file(path)?
                }
                None => Self::default(),
            },
        };
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    /// First existing config file among the implicit locations
    pub fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }
        dirs::config_dir()
            .map(|dir| dir.join("fitai").join("launcher.yaml"))
            .filter(|path| path.is_file())
    }

    /// Apply command-line overrides
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(program) = &overrides.interpreter {
            // A bare executable replaces the version selector as well
            self.interpreter.program = program.clone();
            self.interpreter.args.clear();
        }
        if let Some(requirements) = &overrides.requirements {
            self.requirements = requirements.clone();
        }
        if let Some(entry) = &overrides.entry {
            self.entry = entry.clone();
        }
        if overrides.no_pause {
            self.pause = false;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interpreter.program.trim().is_empty() {
            return Err(ConfigError::Invalid("interpreter program is empty".to_string()));
        }
        if self.interpreter.pinned_version().is_none() {
            return Err(ConfigError::Invalid(format!(
                "interpreter version '{}' is not MAJOR.MINOR",
                self.interpreter.version
            )));
        }
        if self.requirements.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("requirements path is empty".to_string()));
        }
        if self.entry.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("entry path is empty".to_string()));
        }
        if self.framework.trim().is_empty() {
            return Err(ConfigError::Invalid("framework module is empty".to_string()));
        }
        Ok(())
    }

    /// `<interp> -m pip install -r <requirements>`
    pub fn install_command(&self) -> CommandSpec {
        self.interpreter
            .module_command("pip", ["install".to_string(), "-r".to_string(), path_arg(&self.requirements)])
            .current_dir(self.working_dir.clone())
    }

    /// `<interp> -m <framework> run <entry>`
    pub fn launch_command(&self) -> CommandSpec {
        self.interpreter
            .module_command(&self.framework, ["run".to_string(), path_arg(&self.entry)])
            .current_dir(self.working_dir.clone())
    }

    /// `<interp> --version`
    pub fn version_command(&self) -> CommandSpec {
        self.interpreter.command().arg("--version")
    }

    /// Path as seen from where the child processes run
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.working_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
