//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::application`,
//! `tokio`, `std::fs`, or `std::process`. All error types implement
//! `thiserror::Error` and convert to `anyhow::Error` via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::plan::StepId;

/// Exit code used when an external program cannot be started at all.
pub const EXIT_UNAVAILABLE: i32 = 127;
/// Exit code for every failure that has no process status of its own.
pub const EXIT_FAILURE: i32 = 1;

// ── Provisioning errors ───────────────────────────────────────────────────────

/// Why a provisioning run stopped.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// `output` is everything the command printed, stdout first, untruncated.
    #[error("{step} failed with exit code {code}{}", format_output(.output))]
    CommandFailed {
        step: StepId,
        code: i32,
        output: String,
    },

    #[error("{step} could not run {program}: {reason}")]
    Unavailable {
        step: StepId,
        program: String,
        reason: String,
    },

    #[error(
        "{step} failed: link target {} does not exist (toolchain version drift?)",
        .target.display()
    )]
    LinkTargetMissing { step: StepId, target: PathBuf },

    #[error("{step} failed: {} already exists and {found}", .link.display())]
    LinkConflict {
        step: StepId,
        link: PathBuf,
        found: String,
    },

    #[error("{step} failed: cannot create {}: {reason}", .link.display())]
    LinkFailed {
        step: StepId,
        link: PathBuf,
        reason: String,
    },
}

impl ProvisionError {
    /// The step the run stopped at.
    #[must_use]
    pub fn step(&self) -> StepId {
        match self {
            Self::CommandFailed { step, .. }
            | Self::Unavailable { step, .. }
            | Self::LinkTargetMissing { step, .. }
            | Self::LinkConflict { step, .. }
            | Self::LinkFailed { step, .. } => *step,
        }
    }

    /// Process exit code for this failure.
    ///
    /// A failed command's own code is passed through unchanged.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailed { code, .. } => *code,
            Self::Unavailable { .. } => EXIT_UNAVAILABLE,
            Self::LinkTargetMissing { .. } | Self::LinkConflict { .. } | Self::LinkFailed { .. } => {
                EXIT_FAILURE
            }
        }
    }
}

fn format_output(output: &str) -> String {
    let trimmed = output.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(":\n{trimmed}")
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors in a configuration override file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must not be empty")]
    Empty { key: &'static str },

    #[error("{key} must be a bare file name, got '{value}'")]
    NotAFileName { key: &'static str, value: String },

    #[error("toolchain.lib_dir must be an absolute path, got '{}'", .0.display())]
    RelativeLibDir(PathBuf),

    #[error("toolchain.link_name '{0}' would link the library onto itself")]
    SelfLink(String),

    #[error("invalid environment variable name '{0}'")]
    InvalidEnvName(String),
}
