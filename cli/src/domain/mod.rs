//! Domain layer: pure types, plan construction, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::application`,
//! `tokio`, `std::fs`, or `std::process`. All functions are synchronous and
//! take data in, returning data out.

pub mod config;
pub mod error;
pub mod plan;

pub use config::ProvisionConfig;
pub use error::{ConfigError, ProvisionError};
pub use plan::{Blocker, BuildEnv, LinkState, Step, StepCheck, StepId, build_plan, check_link};
