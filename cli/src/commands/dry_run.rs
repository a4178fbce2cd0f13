//! `--dry-run`: show the plan and each step's check result.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::provision as service;
use crate::domain::StepCheck;

/// Print what a full run would do. Never mutates the host.
///
/// # Errors
///
/// Returns an error if the host cannot be inspected.
pub fn run(app: &AppContext) -> Result<()> {
    app.output.heading("docs-provision plan");
    let checks = service::dry_run(&app.fs, &app.terminal_reporter(), &app.plan())?;

    let pending = checks
        .iter()
        .filter(|(_, check)| *check == StepCheck::Pending)
        .count();
    app.output
        .success(&format!("{pending} of {} steps would run", checks.len()));
    Ok(())
}
