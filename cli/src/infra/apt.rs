//! `PackageManager` backed by `apt-get`.

use std::process::Output;

use anyhow::Result;

use crate::application::ports::{CommandRunner, Invocation, PackageManager};
use crate::domain::config::PackageManagerConfig;

/// Runs the package manager through an optional privilege wrapper
/// (`sudo apt-get …`).
pub struct AptPackageManager<R: CommandRunner> {
    runner: R,
    program: String,
    elevate_with: Option<String>,
}

impl<R: CommandRunner> AptPackageManager<R> {
    #[must_use]
    pub fn new(runner: R, config: &PackageManagerConfig) -> Self {
        Self {
            runner,
            program: config.program.clone(),
            elevate_with: config.elevate_with.clone(),
        }
    }

    fn invocation<'a>(&self, args: impl IntoIterator<Item = &'a str>) -> Invocation {
        match &self.elevate_with {
            Some(wrapper) => Invocation::new(wrapper.as_str())
                .arg(self.program.as_str())
                .args(args),
            None => Invocation::new(self.program.as_str()).args(args),
        }
    }

    /// `apt-get update`.
    #[must_use]
    pub fn refresh_invocation(&self) -> Invocation {
        self.invocation(["update"])
    }

    /// `apt-get install -y <package>`, never prompting.
    ///
    /// `DEBIAN_FRONTEND` has to survive the privilege wrapper, so with `sudo`
    /// it is passed as an argument rather than through the environment.
    #[must_use]
    pub fn install_invocation(&self, package: &str) -> Invocation {
        const FRONTEND: &str = "DEBIAN_FRONTEND=noninteractive";
        match &self.elevate_with {
            Some(wrapper) => Invocation::new(wrapper.as_str())
                .arg(FRONTEND)
                .args([self.program.as_str(), "install", "-y", package]),
            None => Invocation::new(self.program.as_str())
                .args(["install", "-y", package])
                .env("DEBIAN_FRONTEND", "noninteractive"),
        }
    }
}

impl<R: CommandRunner> PackageManager for AptPackageManager<R> {
    fn program(&self) -> &str {
        &self.program
    }

    async fn refresh_index(&self) -> Result<Output> {
        self.runner.run(&self.refresh_invocation()).await
    }

    async fn install(&self, package: &str) -> Result<Output> {
        self.runner.run(&self.install_invocation(package)).await
    }
}
