//! CLI command definitions

use clap::Args;

/// Install dependencies and start the app
#[derive(Debug, Args, Clone, Default)]
pub struct RunCommand {
    /// Print the launch outcome as JSON after the run
    #[arg(long)]
    pub json: bool,
}

/// Check the interpreter version and project files
#[derive(Debug, Args, Clone, Default)]
pub struct DoctorCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Print the resolved configuration
#[derive(Debug, Args, Clone, Default)]
pub struct ShowConfigCommand {
    /// Output in JSON format instead of YAML
    #[arg(long)]
    pub json: bool,
}
