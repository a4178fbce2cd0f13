//! Integration tests for docs-provision
//!
//! These tests spawn the actual binary and test end-to-end behavior against
//! throwaway library directories and stand-in package-manager and docs
//! scripts. They never call the real package manager.

mod end_to_end;
