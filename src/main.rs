use anyhow::{Context, Result};
use launcher::cli::commands::{DoctorCommand, RunCommand, ShowConfigCommand};
use launcher::cli::output::{format_doctor_report, format_duration, format_launch_event};
use launcher::cli::{Cli, Command};
use launcher::{diagnose, pause, LauncherConfig, Launcher, Pause, SubprocessRunner};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging; stderr keeps stdout to the console messages
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    let config = match LauncherConfig::resolve(cli.config.as_deref(), &cli.overrides())
        .context("Failed to load launcher config")
    {
        Ok(config) => config,
        Err(e) => {
            // Report, then hold the console like a failed install does
            eprintln!("Error: {:#}", e);
            if matches!(cli.resolved_command(), Command::Run(_)) {
                pause::for_config(!cli.no_pause).wait().await;
            }
            std::process::exit(1);
        }
    };

    // Execute command
    let exit_code = match cli.resolved_command() {
        Command::Run(cmd) => run_launcher(&cmd, config).await?,
        Command::Doctor(cmd) => run_doctor(&cmd, &config).await?,
        Command::ShowConfig(cmd) => show_config(&cmd, &config)?,
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run_launcher(cmd: &RunCommand, config: LauncherConfig) -> Result<i32> {
    let pause = pause::for_config(config.pause);
    let mut launcher = Launcher::new(config, SubprocessRunner::new(), pause);

    // Set up event handler for console output
    launcher.add_event_handler(|event| {
        if let Some(line) = format_launch_event(event) {
            println!("{}", line);
        }
    });

    let outcome = launcher.run().await;

    if let Ok(elapsed) = (outcome.finished_at - outcome.started_at).to_std() {
        debug!(
            run_id = %outcome.run_id,
            "{} step ended the run after {}",
            outcome.final_step(),
            format_duration(elapsed)
        );
    }

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }

    Ok(outcome.exit_code())
}

async fn run_doctor(cmd: &DoctorCommand, config: &LauncherConfig) -> Result<i32> {
    let report = diagnose(config, &SubprocessRunner::new()).await;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", format_doctor_report(&report));
    }

    Ok(if report.is_healthy() { 0 } else { 1 })
}

fn show_config(cmd: &ShowConfigCommand, config: &LauncherConfig) -> Result<i32> {
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        print!("{}", serde_yaml::to_string(config)?);
    }
    Ok(0)
}
