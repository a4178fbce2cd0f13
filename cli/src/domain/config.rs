//! Domain types and validators for provisioner configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::error::ConfigError;

// ── Defaults ─────────────────────────────────────────────────────────────────

pub const DEFAULT_PACKAGE_MANAGER: &str = "apt-get";
pub const DEFAULT_ELEVATE_WITH: &str = "sudo";
pub const DEFAULT_TOOLCHAIN_PACKAGE: &str = "clang-14";
pub const DEFAULT_LIB_DIR: &str = "/usr/lib/llvm-14/lib";
pub const DEFAULT_VERSIONED_LIBRARY: &str = "libclang-14.so.1";
pub const DEFAULT_LINK_NAME: &str = "libclang.so";
pub const DEFAULT_DOCS_PROGRAM: &str = "cargo";

/// Full backtraces when the documentation build panics.
pub const BACKTRACE_VAR: &str = "RUST_BACKTRACE";
/// Tells the crate's build script it is running on the hosted-docs builder.
pub const DOCS_HOST_VAR: &str = "DOCS_RS";

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration. Every field has a compiled-in default, so an
/// override file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ProvisionConfig {
    pub package_manager: PackageManagerConfig,
    pub toolchain: ToolchainConfig,
    /// Variables handed to the documentation build only.
    pub environment: BTreeMap<String, String>,
    pub docs: DocsConfig,
}

/// How packages are refreshed and installed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackageManagerConfig {
    /// Package manager executable, e.g. `apt-get`.
    pub program: String,
    /// Privilege wrapper prepended to package commands and to `ln` for the
    /// compatibility link. `None` runs them directly.
    pub elevate_with: Option<String>,
}

impl Default for PackageManagerConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PACKAGE_MANAGER.to_string(),
            elevate_with: Some(DEFAULT_ELEVATE_WITH.to_string()),
        }
    }
}

/// The native toolchain and its library layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolchainConfig {
    pub package: String,
    pub lib_dir: PathBuf,
    /// File the toolchain actually ships, e.g. `libclang-14.so.1`.
    pub versioned_library: String,
    /// Name the downstream discovery routine searches for, e.g. `libclang.so`.
    pub link_name: String,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            package: DEFAULT_TOOLCHAIN_PACKAGE.to_string(),
            lib_dir: PathBuf::from(DEFAULT_LIB_DIR),
            versioned_library: DEFAULT_VERSIONED_LIBRARY.to_string(),
            link_name: DEFAULT_LINK_NAME.to_string(),
        }
    }
}

impl ToolchainConfig {
    /// Absolute path of the versioned library the link points at.
    #[must_use]
    pub fn link_target(&self) -> PathBuf {
        self.lib_dir.join(&self.versioned_library)
    }

    /// Absolute path of the compatibility link itself.
    #[must_use]
    pub fn link_path(&self) -> PathBuf {
        self.lib_dir.join(&self.link_name)
    }
}

/// The documentation build command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocsConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_DOCS_PROGRAM.to_string(),
            args: vec!["doc".to_string(), "-vv".to_string()],
        }
    }
}

/// `RUST_BACKTRACE=full` and `DOCS_RS=1`.
#[must_use]
pub fn default_environment() -> BTreeMap<String, String> {
    BTreeMap::from([
        (BACKTRACE_VAR.to_string(), "full".to_string()),
        (DOCS_HOST_VAR.to_string(), "1".to_string()),
    ])
}

impl ProvisionConfig {
    /// Compiled-in configuration used when no override file is given.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            environment: default_environment(),
            ..Self::default()
        }
    }

    /// Applies an override file on top of the built-in configuration.
    ///
    /// Sections present in `overrides` replace the built-in ones, except the
    /// environment map, which is merged key by key.
    #[must_use]
    pub fn with_overrides(overrides: Self) -> Self {
        let mut environment = default_environment();
        environment.extend(overrides.environment);
        Self {
            environment,
            ..overrides
        }
    }

    /// Validates the configuration before any step touches the host.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty("package_manager.program", &self.package_manager.program)?;
        if let Some(wrapper) = &self.package_manager.elevate_with {
            require_non_empty("package_manager.elevate_with", wrapper)?;
        }
        require_non_empty("toolchain.package", &self.toolchain.package)?;
        require_non_empty("docs.program", &self.docs.program)?;

        if !self.toolchain.lib_dir.is_absolute() {
            return Err(ConfigError::RelativeLibDir(self.toolchain.lib_dir.clone()));
        }
        validate_file_name("toolchain.versioned_library", &self.toolchain.versioned_library)?;
        validate_file_name("toolchain.link_name", &self.toolchain.link_name)?;
        if self.toolchain.versioned_library == self.toolchain.link_name {
            return Err(ConfigError::SelfLink(self.toolchain.link_name.clone()));
        }

        for name in self.environment.keys() {
            validate_env_name(name)?;
        }
        Ok(())
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

fn require_non_empty(key: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Empty { key });
    }
    Ok(())
}

/// Library names must be bare file names inside `lib_dir`.
///
/// # Errors
///
/// Returns [`ConfigError::NotAFileName`] for empty names, `.`/`..`, or
/// anything containing a path separator.
pub fn validate_file_name(key: &'static str, name: &str) -> Result<(), ConfigError> {
    let is_bare = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && Path::new(name).file_name().is_some_and(|f| f == name);
    if !is_bare {
        return Err(ConfigError::NotAFileName {
            key,
            value: name.to_string(),
        });
    }
    Ok(())
}

/// Environment variable names must be non-empty and free of `=` and NUL.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvName`] otherwise.
pub fn validate_env_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() || name.contains('=') || name.contains('\0') {
        return Err(ConfigError::InvalidEnvName(name.to_string()));
    }
    Ok(())
}
