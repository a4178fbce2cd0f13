//! Unit tests for docs-provision
//!
//! These tests use fake collaborators and never touch the host's packages,
//! library directories, or documentation toolchain.

mod architecture;
mod dry_run_service;
