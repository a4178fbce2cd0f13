//! Default invocation: provision the host and build the documentation.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::provision as service;

/// Run every step in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the failing step's error; `main` maps it to the exit code.
pub async fn run(app: &AppContext) -> Result<()> {
    let plan = app.plan();
    tracing::debug!(steps = plan.len(), "starting provisioning run");

    let report = service::provision(
        &app.package_manager(),
        &app.fs,
        &app.doc_generator(),
        &app.terminal_reporter(),
        &plan,
    )
    .await?;

    let skipped = report
        .steps
        .iter()
        .filter(|(_, outcome)| *outcome == service::StepOutcome::AlreadySatisfied)
        .count();
    tracing::info!(steps = report.steps.len(), skipped, "provisioning complete");
    Ok(())
}
