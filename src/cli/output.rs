//! CLI output formatting

use crate::{
    doctor::{DoctorReport, FileCheck, InterpreterVerdict},
    execution::LaunchEvent,
};
use console::Emoji;
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");

/// Printed when the dependency install exits non-zero
pub const INSTALL_FAILED_MESSAGE: &str = "Failed to install dependencies.";

/// "Starting FitAI with Python 3.11..."
pub fn starting_message(app_name: &str, interpreter: &str) -> String {
    format!("Starting {} with {}...", app_name, interpreter)
}

/// Console line for a launch event, if the operator should see one.
///
/// These lines are plain text: operators and wrapper scripts match on them.
pub fn format_launch_event(event: &LaunchEvent) -> Option<String> {
    match event {
        LaunchEvent::InstallFailed { .. } => Some(INSTALL_FAILED_MESSAGE.to_string()),
        LaunchEvent::LaunchStarted {
            app_name,
            interpreter,
            ..
        } => Some(starting_message(app_name, interpreter)),
        LaunchEvent::InstallStarted { .. } | LaunchEvent::LaunchFinished { .. } => None,
    }
}

/// Format an interpreter verdict for display
pub fn format_verdict(verdict: InterpreterVerdict) -> String {
    match verdict {
        InterpreterVerdict::Pinned => style("OK").green().to_string(),
        InterpreterVerdict::TooNew => style("TOO NEW").red().to_string(),
        InterpreterVerdict::TooOld => style("TOO OLD").yellow().to_string(),
        InterpreterVerdict::Missing => style("MISSING").red().to_string(),
        InterpreterVerdict::Unrecognized => style("UNKNOWN").yellow().to_string(),
    }
}

fn format_file_check(label: &str, check: &FileCheck) -> String {
    let icon = if check.exists { CHECK } else { CROSS };
    format!(
        "{} {}: {}",
        icon,
        label,
        style(check.path.display()).dim()
    )
}

/// Format a doctor report for display
pub fn format_doctor_report(report: &DoctorReport) -> String {
    let mut lines = Vec::new();

    let icon = if report.verdict == InterpreterVerdict::Pinned {
        CHECK
    } else {
        CROSS
    };
    let detected = report
        .detected
        .map(|v| format!("Python {}", v))
        .unwrap_or_else(|| "not detected".to_string());
    lines.push(format!(
        "{} Interpreter: {} (pinned {}) {}",
        icon,
        style(detected).bold(),
        style(&report.pinned).cyan(),
        format_verdict(report.verdict)
    ));
    lines.push(format!("  Command: {}", style(&report.command).dim()));
    if let Some(detail) = &report.detail {
        lines.push(format!("  Output: {}", style(detail).dim()));
    }

    lines.push(format_file_check("Dependency manifest", &report.requirements));
    lines.push(format_file_check("Entry file", &report.entry));

    let advice = report.advice();
    if advice.is_empty() {
        lines.push(format!("\n{} Ready to launch", CHECK));
    } else {
        lines.push(String::new());
        for item in advice {
            lines.push(format!("{} {}", WARN, item));
        }
    }

    lines.join("\n")
}

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
