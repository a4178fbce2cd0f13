//! Command implementations

pub mod dry_run;
pub mod provision;
