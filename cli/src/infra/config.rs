//! Infrastructure implementation of the `ConfigStore` port.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::config::ProvisionConfig;

/// Loads the built-in configuration, optionally overridden by a YAML file.
pub struct YamlConfigStore {
    path: Option<PathBuf>,
}

impl YamlConfigStore {
    #[must_use]
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<ProvisionConfig> {
        let config = match &self.path {
            None => ProvisionConfig::builtin(),
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("cannot read {}", path.display()))?;
                let overrides: ProvisionConfig = serde_yaml::from_str(&content)
                    .with_context(|| format!("cannot parse {}", path.display()))?;
                tracing::debug!(path = %path.display(), "loaded config overrides");
                ProvisionConfig::with_overrides(overrides)
            }
        };
        config
            .validate()
            .context("invalid provisioner configuration")?;
        Ok(config)
    }
}
