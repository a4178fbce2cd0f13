//! The provisioning plan: the fixed, ordered list of steps and the pure
//! decisions each step's `check()` makes.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::config::ProvisionConfig;

// ── Step identity ─────────────────────────────────────────────────────────────

/// Identifies a step independently of its data. Order of declaration is the
/// order of execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StepId {
    RefreshIndex,
    InstallToolchain,
    CompatSymlink,
    ConfigureEnvironment,
    GenerateDocs,
}

impl StepId {
    pub const ALL: [StepId; 5] = [
        StepId::RefreshIndex,
        StepId::InstallToolchain,
        StepId::CompatSymlink,
        StepId::ConfigureEnvironment,
        StepId::GenerateDocs,
    ];

    /// 1-based position in the plan.
    #[must_use]
    pub fn position(self) -> usize {
        match self {
            Self::RefreshIndex => 1,
            Self::InstallToolchain => 2,
            Self::CompatSymlink => 3,
            Self::ConfigureEnvironment => 4,
            Self::GenerateDocs => 5,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::RefreshIndex => "refresh package index",
            Self::InstallToolchain => "install toolchain",
            Self::CompatSymlink => "compatibility symlink",
            Self::ConfigureEnvironment => "configure environment",
            Self::GenerateDocs => "generate documentation",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.position(), self.name())
    }
}

// ── Build environment ─────────────────────────────────────────────────────────

/// Variables scoped to the documentation build. Never applied to the
/// provisioner's own process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildEnv {
    vars: Vec<(String, String)>,
}

impl BuildEnv {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name`, replacing an earlier value in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.vars.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.vars.push((name, value));
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Merges `other` on top of `self`.
    pub fn extend_from(&mut self, other: &BuildEnv) {
        for (name, value) in other.iter() {
            self.set(name, value);
        }
    }
}

impl fmt::Display for BuildEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{name}={value}")?;
            first = false;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for BuildEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = BuildEnv::new();
        for (name, value) in iter {
            env.set(name, value);
        }
        env
    }
}

// ── Steps ─────────────────────────────────────────────────────────────────────

/// One provisioning step and the data it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    RefreshIndex,
    InstallToolchain { package: String },
    CompatSymlink { target: PathBuf, link: PathBuf },
    ConfigureEnvironment { env: BuildEnv },
    GenerateDocs { program: String, args: Vec<String> },
}

impl Step {
    #[must_use]
    pub fn id(&self) -> StepId {
        match self {
            Self::RefreshIndex => StepId::RefreshIndex,
            Self::InstallToolchain { .. } => StepId::InstallToolchain,
            Self::CompatSymlink { .. } => StepId::CompatSymlink,
            Self::ConfigureEnvironment { .. } => StepId::ConfigureEnvironment,
            Self::GenerateDocs { .. } => StepId::GenerateDocs,
        }
    }

    /// The line echoed to the CI log before the step runs.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::RefreshIndex => "refreshing package index".to_string(),
            Self::InstallToolchain { package } => format!("installing {package}"),
            Self::CompatSymlink { target, link } => {
                format!("linking {} -> {}", link.display(), target.display())
            }
            Self::ConfigureEnvironment { env } => format!("exporting {env}"),
            Self::GenerateDocs { program, args } => {
                if args.is_empty() {
                    format!("running {program}")
                } else {
                    format!("running {program} {}", args.join(" "))
                }
            }
        }
    }
}

/// Builds the fixed five-step plan from a validated configuration.
#[must_use]
pub fn build_plan(config: &ProvisionConfig) -> Vec<Step> {
    vec![
        Step::RefreshIndex,
        Step::InstallToolchain {
            package: config.toolchain.package.clone(),
        },
        Step::CompatSymlink {
            target: config.toolchain.link_target(),
            link: config.toolchain.link_path(),
        },
        Step::ConfigureEnvironment {
            env: config.environment.iter().collect(),
        },
        Step::GenerateDocs {
            program: config.docs.program.clone(),
            args: config.docs.args.clone(),
        },
    ]
}

// ── Checks ────────────────────────────────────────────────────────────────────

/// What currently sits at the compatibility link path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    Absent,
    /// A symlink and its raw (unresolved) target.
    Symlink(PathBuf),
    /// Anything that is not a symlink, described by kind.
    Other(&'static str),
}

/// Why a step cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Blocker {
    TargetMissing(PathBuf),
    Conflict { link: PathBuf, found: String },
}

/// Outcome of a step's `check()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepCheck {
    /// Needs to be applied.
    Pending,
    /// Host already in the desired state; `apply()` is skipped.
    Satisfied,
    Blocked(Blocker),
}

/// Decides the compatibility-link step.
///
/// The target is checked first: a missing target blocks the step even when a
/// link is already in place, since that link would dangle.
#[must_use]
pub fn check_link(target: &Path, link: &Path, target_exists: bool, state: &LinkState) -> StepCheck {
    if !target_exists {
        return StepCheck::Blocked(Blocker::TargetMissing(target.to_path_buf()));
    }
    match state {
        LinkState::Absent => StepCheck::Pending,
        LinkState::Symlink(points_to) => {
            if link_resolves_to(link, points_to, target) {
                StepCheck::Satisfied
            } else {
                StepCheck::Blocked(Blocker::Conflict {
                    link: link.to_path_buf(),
                    found: format!("is a symlink to {}", points_to.display()),
                })
            }
        }
        LinkState::Other(kind) => StepCheck::Blocked(Blocker::Conflict {
            link: link.to_path_buf(),
            found: format!("is a {kind}"),
        }),
    }
}

/// Relative link targets are resolved against the link's directory.
fn link_resolves_to(link: &Path, points_to: &Path, target: &Path) -> bool {
    if points_to.is_absolute() {
        return points_to == target;
    }
    link.parent()
        .is_some_and(|dir| dir.join(points_to) == target)
}
