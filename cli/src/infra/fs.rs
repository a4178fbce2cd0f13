//! Filesystem infrastructure: implements `LinkFs` for the local host.

use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, Invocation, LinkFs};
use crate::domain::LinkState;

/// Production `LinkFs`.
///
/// Inspection is done in-process. The link itself is created with
/// `ln -s` through the privilege wrapper when one is configured, since the
/// library directory belongs to root on a stock CI image.
pub struct LocalFs<R: CommandRunner> {
    runner: R,
    elevate_with: Option<String>,
}

impl<R: CommandRunner> LocalFs<R> {
    #[must_use]
    pub fn new(runner: R, elevate_with: Option<&str>) -> Self {
        Self {
            runner,
            elevate_with: elevate_with.map(str::to_string),
        }
    }

    /// `sudo ln -s -T -- <target> <link>`, or `None` without a wrapper.
    ///
    /// `-T` keeps `ln` from dropping the link inside `link` if a directory
    /// appeared there after the check.
    #[must_use]
    pub fn link_invocation(&self, target: &Path, link: &Path) -> Option<Invocation> {
        let wrapper = self.elevate_with.as_deref()?;
        Some(Invocation::new(wrapper).args([
            "ln".to_string(),
            "-s".to_string(),
            "-T".to_string(),
            "--".to_string(),
            target.display().to_string(),
            link.display().to_string(),
        ]))
    }
}

impl<R: CommandRunner> LinkFs for LocalFs<R> {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn link_state(&self, path: &Path) -> Result<LinkState> {
        let meta = match std::fs::symlink_metadata(path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(LinkState::Absent),
            Err(e) => {
                return Err(e).with_context(|| format!("inspecting {}", path.display()));
            }
        };
        let file_type = meta.file_type();
        if file_type.is_symlink() {
            let points_to = std::fs::read_link(path)
                .with_context(|| format!("reading link {}", path.display()))?;
            return Ok(LinkState::Symlink(points_to));
        }
        let kind = if file_type.is_dir() {
            "directory"
        } else if file_type.is_file() {
            "regular file"
        } else {
            "special file"
        };
        Ok(LinkState::Other(kind))
    }

    async fn symlink(&self, target: &Path, link: &Path) -> Result<()> {
        // Neither std nor ln refuse a dangling link; refuse here.
        if !target.exists() {
            anyhow::bail!("link target {} does not exist", target.display());
        }
        let Some(invocation) = self.link_invocation(target, link) else {
            return create_symlink(target, link).map_err(anyhow::Error::from);
        };
        let output = self.runner.run(&invocation).await?;
        if !output.status.success() {
            anyhow::bail!(
                "{} ln failed ({}): {}",
                invocation.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim_end()
            );
        }
        Ok(())
    }
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
