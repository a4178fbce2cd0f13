//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::app::AppContext;
use crate::commands;

/// Prepare this CI host for a libclang-backed documentation build, then run it.
///
/// With no arguments, refreshes the package index, installs the toolchain,
/// links the unversioned libclang name to the versioned file, and runs the
/// documentation build with full backtraces and the docs-host flag set.
#[derive(Parser)]
#[command(name = "docs-provision", version)]
pub struct Cli {
    /// YAML file overriding the built-in toolchain and command settings
    #[arg(long, value_name = "PATH", env = "DOCS_PROVISION_CONFIG")]
    pub config: Option<PathBuf>,

    /// Check every step and print the plan without changing the host
    #[arg(long)]
    pub dry_run: bool,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    pub no_color: bool,
}

impl Cli {
    /// Execute the provisioning run (or the dry run).
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or any step fails.
    pub async fn run(self) -> Result<()> {
        let app = AppContext::new(&self)?;
        if self.dry_run {
            commands::dry_run::run(&app)
        } else {
            commands::provision::run(&app).await
        }
    }
}
