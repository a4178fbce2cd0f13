//! Application service: the provisioning run.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All host mutation is routed through injected port traits, one step at a
//! time, stopping at the first failure.

use std::process::{ExitStatus, Output};

use anyhow::Result;

use crate::application::ports::{DocGenerator, LinkFs, PackageManager, ProgressReporter};
use crate::domain::error::ProvisionError;
use crate::domain::plan::{Blocker, BuildEnv, Step, StepCheck, StepId, check_link};

/// How a step ended in a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Applied,
    AlreadySatisfied,
}

/// Per-step record of a run that reached the end of the plan.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    pub steps: Vec<(StepId, StepOutcome)>,
}

impl ProvisionReport {
    #[must_use]
    pub fn outcome(&self, id: StepId) -> Option<StepOutcome> {
        self.steps.iter().find(|(s, _)| *s == id).map(|(_, o)| *o)
    }
}

/// State threaded from one step to the next.
#[derive(Debug, Default)]
struct RunContext {
    /// Filled by the environment step, read only by the docs step.
    env: BuildEnv,
}

/// Run `plan` against the host.
///
/// Each step is echoed through `reporter`, checked, and applied unless
/// already satisfied. The first failure aborts the run; nothing is rolled back.
///
/// # Errors
///
/// Returns an `anyhow::Error` wrapping the [`ProvisionError`] of the step
/// that failed.
pub async fn provision(
    packages: &impl PackageManager,
    fs: &impl LinkFs,
    docs: &impl DocGenerator,
    reporter: &impl ProgressReporter,
    plan: &[Step],
) -> Result<ProvisionReport> {
    let mut ctx = RunContext::default();
    let mut report = ProvisionReport::default();

    for step in plan {
        let id = step.id();
        reporter.step(&step.describe());

        match check(fs, step)? {
            StepCheck::Satisfied => {
                tracing::info!(step = %id, "already satisfied, skipping");
                reporter.success(&format!("{} already in place", id.name()));
                report.steps.push((id, StepOutcome::AlreadySatisfied));
                continue;
            }
            StepCheck::Blocked(blocker) => return Err(blocked(id, blocker).into()),
            StepCheck::Pending => {}
        }

        apply(packages, fs, docs, step, &mut ctx).await?;
        tracing::info!(step = %id, "applied");
        report.steps.push((id, StepOutcome::Applied));
    }

    reporter.success("documentation build finished");
    Ok(report)
}

/// Run every step's `check()` and report what a real run would do.
///
/// Nothing on the host is mutated. A missing link target is reported as a
/// warning only, since on a fresh host the toolchain step has not run yet.
///
/// # Errors
///
/// Returns an error only if the host cannot be inspected.
pub fn dry_run(
    fs: &impl LinkFs,
    reporter: &impl ProgressReporter,
    plan: &[Step],
) -> Result<Vec<(StepId, StepCheck)>> {
    let mut checks = Vec::with_capacity(plan.len());
    for step in plan {
        let id = step.id();
        let result = check(fs, step)?;
        match &result {
            StepCheck::Pending => reporter.step(&format!("{id}: would run: {}", step.describe())),
            StepCheck::Satisfied => reporter.success(&format!("{id}: already in place")),
            StepCheck::Blocked(blocker) => {
                reporter.warn(&blocked(id, blocker.clone()).to_string());
            }
        }
        checks.push((id, result));
    }
    Ok(checks)
}

fn check(fs: &impl LinkFs, step: &Step) -> Result<StepCheck, ProvisionError> {
    match step {
        Step::CompatSymlink { target, link } => {
            let state = fs.link_state(link).map_err(|e| ProvisionError::LinkFailed {
                step: step.id(),
                link: link.clone(),
                reason: format!("{e:#}"),
            })?;
            Ok(check_link(target, link, fs.exists(target), &state))
        }
        Step::RefreshIndex
        | Step::InstallToolchain { .. }
        | Step::ConfigureEnvironment { .. }
        | Step::GenerateDocs { .. } => Ok(StepCheck::Pending),
    }
}

async fn apply(
    packages: &impl PackageManager,
    fs: &impl LinkFs,
    docs: &impl DocGenerator,
    step: &Step,
    ctx: &mut RunContext,
) -> Result<(), ProvisionError> {
    let id = step.id();
    match step {
        Step::RefreshIndex => {
            let output = packages
                .refresh_index()
                .await
                .map_err(|e| unavailable(id, packages.program(), &e))?;
            ensure_success(id, &output)
        }
        Step::InstallToolchain { package } => {
            let output = packages
                .install(package)
                .await
                .map_err(|e| unavailable(id, packages.program(), &e))?;
            ensure_success(id, &output)
        }
        Step::CompatSymlink { target, link } => {
            fs.symlink(target, link)
                .await
                .map_err(|e| ProvisionError::LinkFailed {
                    step: id,
                    link: link.clone(),
                    reason: format!("{e:#}"),
                })
        }
        Step::ConfigureEnvironment { env } => {
            ctx.env.extend_from(env);
            Ok(())
        }
        Step::GenerateDocs { .. } => {
            let status = docs
                .generate(&ctx.env)
                .await
                .map_err(|e| unavailable(id, docs.program(), &e))?;
            if status.success() {
                Ok(())
            } else {
                Err(ProvisionError::CommandFailed {
                    step: id,
                    code: exit_code_of(status),
                    output: String::new(),
                })
            }
        }
    }
}

/// The package manager's output is captured, so it is logged here on
/// success and carried whole in the error on failure.
fn ensure_success(step: StepId, output: &Output) -> Result<(), ProvisionError> {
    let printed = combined_output(output);
    if output.status.success() {
        if !printed.trim().is_empty() {
            tracing::info!(step = %step, "{}", printed.trim_end());
        }
        return Ok(());
    }
    Err(ProvisionError::CommandFailed {
        step,
        code: exit_code_of(output.status),
        output: printed,
    })
}

/// Stdout followed by stderr, lossily decoded.
fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

fn unavailable(step: StepId, program: &str, err: &anyhow::Error) -> ProvisionError {
    ProvisionError::Unavailable {
        step,
        program: program.to_string(),
        reason: format!("{err:#}"),
    }
}

fn blocked(step: StepId, blocker: Blocker) -> ProvisionError {
    match blocker {
        Blocker::TargetMissing(target) => ProvisionError::LinkTargetMissing { step, target },
        Blocker::Conflict { link, found } => ProvisionError::LinkConflict { step, link, found },
    }
}

/// Exit code of a finished process; `128 + signal` when it was killed.
#[must_use]
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    crate::domain::error::EXIT_FAILURE
}
