//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation. It echoes every
//! command line before spawning it so the CI log shows exactly what ran.

use std::process::{ExitStatus, Output, Stdio};

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

use crate::application::ports::{CommandRunner, Invocation};

/// Production `CommandRunner` backed by `tokio::process`.
///
/// The child is killed if the future driving it is dropped, so aborting the
/// provisioner never leaves a package manager running behind it.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn command(invocation: &Invocation) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new(&invocation.program);
    cmd.args(&invocation.args)
        .envs(invocation.env.iter())
        .kill_on_drop(true);
    cmd
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, invocation: &Invocation) -> Result<Output> {
        let program = &invocation.program;
        tracing::info!("+ {}", invocation.command_line());

        let mut child = command(invocation)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        // Drain both pipes while waiting; a chatty child would otherwise block
        // on a full pipe and never exit.
        let (status, stdout, stderr) = tokio::join!(
            child.wait(),
            async {
                let mut buf = Vec::new();
                if let Some(ref mut h) = stdout_handle {
                    let _ = h.read_to_end(&mut buf).await;
                }
                buf
            },
            async {
                let mut buf = Vec::new();
                if let Some(ref mut h) = stderr_handle {
                    let _ = h.read_to_end(&mut buf).await;
                }
                buf
            },
        );

        Ok(Output {
            status: status.with_context(|| format!("waiting for {program}"))?,
            stdout,
            stderr,
        })
    }

    async fn run_status(&self, invocation: &Invocation) -> Result<ExitStatus> {
        let program = &invocation.program;
        tracing::info!("+ {}", invocation.command_line());

        let mut child = command(invocation)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        child
            .wait()
            .await
            .with_context(|| format!("waiting for {program}"))
    }
}
