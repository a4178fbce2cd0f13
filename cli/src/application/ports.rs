//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`
//! or `crate::output`.

use std::path::Path;
use std::process::{ExitStatus, Output};

use anyhow::Result;

use crate::domain::{BuildEnv, LinkState, ProvisionConfig};

// ── Value Types ───────────────────────────────────────────────────────────────

/// A fully specified external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Added on top of the inherited environment for this command only.
    pub env: BuildEnv,
}

impl Invocation {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: BuildEnv::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.set(name, value);
        self
    }

    #[must_use]
    pub fn envs(mut self, env: &BuildEnv) -> Self {
        self.env.extend_from(env);
        self
    }

    /// Shell-style rendering used for log echo, e.g. `sudo apt-get update`.
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut line = String::new();
        for (name, value) in self.env.iter() {
            line.push_str(&format!("{name}={value} "));
        }
        line.push_str(&self.program);
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
///
/// No timeout is applied; the CI harness owns the wall clock.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    async fn run(&self, invocation: &Invocation) -> Result<Output>;
    /// Run a program with inherited stdio and return only its exit status.
    async fn run_status(&self, invocation: &Invocation) -> Result<ExitStatus>;
}

// ── Collaborator Ports ────────────────────────────────────────────────────────

/// The host's system package manager.
#[allow(async_fn_in_trait)]
pub trait PackageManager {
    /// Program name used in error messages.
    fn program(&self) -> &str;
    /// Refresh the catalog of available packages.
    async fn refresh_index(&self) -> Result<Output>;
    /// Install one package by name, non-interactively.
    async fn install(&self, package: &str) -> Result<Output>;
}

/// The filesystem operations the compatibility-link step needs.
///
/// Inspection runs with the provisioner's own credentials. Creating the link
/// may need the same privilege as the package manager, so it is async and
/// may go through an external command.
#[allow(async_fn_in_trait)]
pub trait LinkFs {
    /// Whether `path` exists, following symlinks.
    fn exists(&self, path: &Path) -> bool;
    /// What currently occupies `path`, without following symlinks.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be inspected.
    fn link_state(&self, path: &Path) -> Result<LinkState>;
    /// Create `link` pointing at `target`.
    ///
    /// # Errors
    ///
    /// Implementations must fail, creating nothing, when `target` is missing
    /// or `link` already exists.
    async fn symlink(&self, target: &Path, link: &Path) -> Result<()>;
}

/// The external documentation build tool.
#[allow(async_fn_in_trait)]
pub trait DocGenerator {
    /// Program name used in error messages.
    fn program(&self) -> &str;
    /// Run the build with `env` added to its environment. Output streams
    /// straight to the CI log.
    async fn generate(&self, env: &BuildEnv) -> Result<ExitStatus>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Configuration Port ────────────────────────────────────────────────────────

/// Loads the provisioner configuration.
pub trait ConfigStore {
    /// Load and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an override file cannot be read, parsed, or
    /// fails validation.
    fn load(&self) -> Result<ProvisionConfig>;
}
