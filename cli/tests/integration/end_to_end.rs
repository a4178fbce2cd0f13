//! End-to-end runs of the full sequence with stand-in scripts.
//!
//! The package manager is a shell script that logs its arguments and can be
//! told to fail; the docs command is a script that records the environment
//! it sees. Unix only.

#![cfg(unix)]
#![allow(clippy::expect_used)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Host {
    dir: TempDir,
}

impl Host {
    /// A fake host. `install_exit` is what the fake package manager returns
    /// for `install`.
    fn new(with_target: bool, install_exit: i32) -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = dir.path();
        std::fs::create_dir_all(root.join("lib")).expect("mkdir");
        if with_target {
            std::fs::write(root.join("lib/libclang-14.so.1"), b"elf").expect("write");
        }

        write_script(
            &root.join("apt-get"),
            &format!(
                "#!/bin/sh\n\
                 echo \"$@ DOCS_RS=${{DOCS_RS:-unset}} RUST_BACKTRACE=${{RUST_BACKTRACE:-unset}}\" >> '{log}'\n\
                 if [ \"$1\" = install ]; then\n\
                 \x20 echo \"E: Unable to locate package $3\" >&2\n\
                 \x20 exit {install_exit}\n\
                 fi\n\
                 exit 0\n",
                log = root.join("apt.log").display(),
            ),
        );
        write_script(
            &root.join("build-docs"),
            &format!(
                "#!/bin/sh\n\
                 echo \"$@ DOCS_RS=${{DOCS_RS:-unset}} RUST_BACKTRACE=${{RUST_BACKTRACE:-unset}}\" > '{log}'\n\
                 exit 0\n",
                log = root.join("docs.log").display(),
            ),
        );

        let host = Self { dir };
        host.write_config("null");
        host
    }

    /// Route privileged commands through a pass-through `sudo` that logs
    /// its arguments to `sudo.log`.
    fn with_wrapper(self) -> Self {
        write_script(
            &self.path("sudo"),
            &format!(
                "#!/bin/sh\n\
                 echo \"$@\" >> '{log}'\n\
                 while [ $# -gt 0 ]; do\n\
                 \x20 case \"$1\" in\n\
                 \x20   *=*) export \"$1\"; shift ;;\n\
                 \x20   *) break ;;\n\
                 \x20 esac\n\
                 done\n\
                 exec \"$@\"\n",
                log = self.path("sudo.log").display(),
            ),
        );
        self.write_config(&self.path("sudo").display().to_string());
        self
    }

    fn write_config(&self, elevate_with: &str) {
        std::fs::write(
            self.path("provision.yaml"),
            format!(
                "package_manager:\n  program: {apt}\n  elevate_with: {elevate_with}\n\
                 toolchain:\n  lib_dir: {lib}\n\
                 docs:\n  program: sh\n  args: [{docs}, doc, -vv]\n",
                apt = self.path("apt-get").display(),
                lib = self.path("lib").display(),
                docs = self.path("build-docs").display(),
            ),
        )
        .expect("write config");
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("docs-provision"));
        cmd.env("NO_COLOR", "1")
            .env("DOCS_PROVISION_CONFIG", self.path("provision.yaml"))
            .env_remove("DOCS_RS")
            .env_remove("RUST_BACKTRACE")
            .env_remove("RUST_LOG");
        cmd
    }

    fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.path(rel)).unwrap_or_default()
    }
}

fn write_script(path: &Path, body: &str) {
    std::fs::write(path, body).expect("write script");
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).expect("chmod");
}

#[test]
fn full_run_succeeds_and_scopes_environment() {
    let host = Host::new(true, 0);

    host.command()
        .assert()
        .success()
        .stdout(predicate::str::contains("→ refreshing package index"))
        .stdout(predicate::str::contains("→ running"))
        .stderr(predicate::str::contains("+ "))
        .stderr(predicate::str::contains("\x1b[").not());

    let link = host.path("lib/libclang.so");
    assert_eq!(
        std::fs::read_link(&link).expect("link created"),
        host.path("lib/libclang-14.so.1")
    );

    let apt_log = host.read("apt.log");
    assert_eq!(
        apt_log.lines().collect::<Vec<_>>(),
        vec![
            "update DOCS_RS=unset RUST_BACKTRACE=unset",
            "install -y clang-14 DOCS_RS=unset RUST_BACKTRACE=unset",
        ]
    );
    assert_eq!(host.read("docs.log").trim(), "doc -vv DOCS_RS=1 RUST_BACKTRACE=full");
}

#[test]
fn install_failure_exits_with_package_manager_code() {
    let host = Host::new(true, 100);

    host.command()
        .assert()
        .code(100)
        .stderr(predicate::str::contains("E: Unable to locate package clang-14"));

    assert!(std::fs::symlink_metadata(host.path("lib/libclang.so")).is_err());
    assert!(host.read("docs.log").is_empty(), "docs must not run");
}

#[test]
fn missing_library_aborts_before_docs() {
    let host = Host::new(false, 0);

    host.command()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not exist"))
        .stdout(predicate::str::contains("exporting").not());

    assert!(std::fs::symlink_metadata(host.path("lib/libclang.so")).is_err());
    assert!(host.read("docs.log").is_empty(), "docs must not run");
}

#[test]
fn rerun_with_link_in_place_succeeds() {
    let host = Host::new(true, 0);
    host.command().assert().success();

    host.command()
        .assert()
        .success()
        .stdout(predicate::str::contains("compatibility symlink already in place"));
}

#[test]
fn docs_failure_exit_code_is_propagated() {
    let host = Host::new(true, 0);
    write_script(&host.path("build-docs"), "#!/bin/sh\nexit 101\n");

    host.command()
        .assert()
        .code(101)
        .stderr(predicate::str::contains("step 5 (generate documentation)"));
}

#[cfg(target_os = "linux")]
#[test]
fn wrapped_run_creates_link_through_wrapper() {
    let host = Host::new(true, 0).with_wrapper();

    host.command().assert().success();

    let target = host.path("lib/libclang-14.so.1");
    let link = host.path("lib/libclang.so");
    assert_eq!(std::fs::read_link(&link).expect("link created"), target);

    let sudo_log = host.read("sudo.log");
    let lines: Vec<&str> = sudo_log.lines().collect();
    assert_eq!(lines.len(), 3, "{sudo_log}");
    assert!(lines[0].ends_with("apt-get update"));
    assert!(lines[1].starts_with("DEBIAN_FRONTEND=noninteractive "));
    assert_eq!(
        lines[2],
        format!("ln -s -T -- {} {}", target.display(), link.display())
    );
    assert!(host.read("docs.log").contains("DOCS_RS=1"));
}

#[test]
fn failed_install_shows_everything_it_printed() {
    let host = Host::new(true, 0);
    write_script(
        &host.path("apt-get"),
        "#!/bin/sh\n\
         [ \"$1\" = install ] || exit 0\n\
         echo STDOUT-MARKER\n\
         echo FIRST-STDERR-LINE >&2\n\
         i=0\n\
         while [ $i -lt 30 ]; do echo \"W: noise $i\" >&2; i=$((i+1)); done\n\
         exit 100\n",
    );

    host.command()
        .assert()
        .code(100)
        .stderr(predicate::str::contains("STDOUT-MARKER"))
        .stderr(predicate::str::contains("FIRST-STDERR-LINE"))
        .stderr(predicate::str::contains("W: noise 0\n"))
        .stderr(predicate::str::contains("W: noise 29"));
}
