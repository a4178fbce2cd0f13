//! Application context: the wiring between CLI flags, configuration, and
//! the production port implementations.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::cli::Cli;
use crate::domain::{ProvisionConfig, Step, build_plan};
use crate::infra::apt::AptPackageManager;
use crate::infra::cargo_doc::CargoDocGenerator;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::fs::LocalFs;
use crate::output::{OutputContext, TerminalReporter};

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Validated configuration.
    pub config: ProvisionConfig,
    /// Host filesystem for the compatibility link.
    pub fs: LocalFs<TokioCommandRunner>,
    runner: TokioCommandRunner,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or is invalid.
    pub fn new(cli: &Cli) -> Result<Self> {
        let config = YamlConfigStore::new(cli.config.clone()).load()?;
        let runner = TokioCommandRunner::new();
        Ok(Self {
            output: OutputContext::new(cli.no_color, cli.quiet),
            fs: LocalFs::new(runner, config.package_manager.elevate_with.as_deref()),
            config,
            runner,
        })
    }

    /// The fixed step list for this configuration.
    #[must_use]
    pub fn plan(&self) -> Vec<Step> {
        build_plan(&self.config)
    }

    #[must_use]
    pub fn package_manager(&self) -> AptPackageManager<TokioCommandRunner> {
        AptPackageManager::new(self.runner, &self.config.package_manager)
    }

    #[must_use]
    pub fn doc_generator(&self) -> CargoDocGenerator<TokioCommandRunner> {
        CargoDocGenerator::new(self.runner, &self.config.docs)
    }

    /// Create a `TerminalReporter` for passing to application services.
    #[must_use]
    pub fn terminal_reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }
}
