//! `DocGenerator` backed by `cargo doc`.

use std::process::ExitStatus;

use anyhow::Result;

use crate::application::ports::{CommandRunner, DocGenerator, Invocation};
use crate::domain::BuildEnv;
use crate::domain::config::DocsConfig;

/// Runs the configured docs command with inherited stdio so the verbose
/// build log streams straight into the CI output.
pub struct CargoDocGenerator<R: CommandRunner> {
    runner: R,
    program: String,
    args: Vec<String>,
}

impl<R: CommandRunner> CargoDocGenerator<R> {
    #[must_use]
    pub fn new(runner: R, config: &DocsConfig) -> Self {
        Self {
            runner,
            program: config.program.clone(),
            args: config.args.clone(),
        }
    }

    #[must_use]
    pub fn invocation(&self, env: &BuildEnv) -> Invocation {
        Invocation::new(self.program.as_str())
            .args(self.args.iter().map(String::as_str))
            .envs(env)
    }
}

impl<R: CommandRunner> DocGenerator for CargoDocGenerator<R> {
    fn program(&self) -> &str {
        &self.program
    }

    async fn generate(&self, env: &BuildEnv) -> Result<ExitStatus> {
        self.runner.run_status(&self.invocation(env)).await
    }
}
