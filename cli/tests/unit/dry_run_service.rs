//! Tests for the `dry_run` application service.

#![allow(clippy::expect_used)]

use docs_provision::application::services::provision::dry_run;
use docs_provision::domain::{Blocker, StepCheck, StepId, build_plan};

use crate::fakes::{Harness, LIB_DIR, LINK, TARGET};

#[test]
fn dry_run_never_touches_the_host() {
    let h = Harness::new();

    let checks = dry_run(&h.fs, &h.reporter, &build_plan(&h.config)).expect("dry run");

    assert_eq!(checks.len(), 5);
    assert!(checks.iter().all(|(_, c)| *c == StepCheck::Pending));
    assert!(h.runner.invocations().is_empty());
    assert_eq!(h.fs.symlink_calls(), 0);
    assert_eq!(h.reporter.step_count(), 5);
    assert!(
        h.reporter.steps.lock().expect("lock")[0].contains("would run: refreshing package index")
    );
}

#[test]
fn dry_run_on_fresh_host_warns_about_missing_target() {
    let h = Harness::with_fs(|fs| fs.with_dir(LIB_DIR));

    let checks = dry_run(&h.fs, &h.reporter, &build_plan(&h.config)).expect("dry run");

    let (id, check) = &checks[2];
    assert_eq!(*id, StepId::CompatSymlink);
    assert!(matches!(check, StepCheck::Blocked(Blocker::TargetMissing(_))));
    let warnings = h.reporter.warnings.lock().expect("lock");
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains(TARGET));
}

#[test]
fn dry_run_reports_existing_link_as_in_place() {
    let h = Harness::with_fs(|fs| fs.with_dir(LIB_DIR).with_file(TARGET).with_link(LINK, TARGET));

    let checks = dry_run(&h.fs, &h.reporter, &build_plan(&h.config)).expect("dry run");

    assert_eq!(checks[2].1, StepCheck::Satisfied);
    assert_eq!(h.reporter.step_count(), 4);
}
