//! Source resolution: a local path is used as-is, a remote git URL is cloned
//! into a temporary directory that lives as long as the returned checkout.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use crate::config::SourceMode;
use crate::error::ExtractError;

const REMOTE_PREFIXES: [&str; 5] = ["https://", "http://", "ssh://", "git@", "file://"];

pub fn is_remote(location: &str) -> bool {
    REMOTE_PREFIXES.iter().any(|p| location.starts_with(p))
}

/// A tutorial repository available on the local filesystem.
#[derive(Debug)]
pub enum SourceCheckout {
    Local(PathBuf),
    Cloned { _dir: TempDir, path: PathBuf },
}

impl SourceCheckout {
    pub fn path(&self) -> &Path {
        match self {
            SourceCheckout::Local(path) => path,
            SourceCheckout::Cloned { path, .. } => path,
        }
    }
}

/// Resolves `location` to a local checkout.
///
/// Remote sources are cloned with `git clone`, then the requested branch is
/// checked out. A missing branch is fatal in commit-history mode; in steps
/// mode the clone's default branch is read instead.
pub fn resolve_source(
    location: &str,
    branch: &str,
    mode: SourceMode,
) -> Result<SourceCheckout, ExtractError> {
    if !is_remote(location) {
        let path = PathBuf::from(location);
        if !path.is_dir() {
            return Err(ExtractError::configuration(format!(
                "source location {} is not a directory",
                path.display()
            )));
        }
        return Ok(SourceCheckout::Local(path));
    }

    let dir = tempfile::Builder::new().prefix("gitorial-").tempdir()?;
    let full_source_path = dir.path().join("repo");

    // `git clone <repo_url> <full_source_path>`
    let status = Command::new("git")
        .arg("clone")
        .arg("--quiet")
        .arg(location)
        .arg(&full_source_path)
        .status();

    match status {
        Ok(s) if s.success() => {
            tracing::info!(
                repo_url = location,
                path = %full_source_path.display(),
                "Successfully cloned git repository"
            );
        }
        Ok(s) => {
            tracing::error!(
                repo_url = location,
                path = %full_source_path.display(),
                "Git exited with non-zero code: {}", s
            );
            return Err(ExtractError::Git {
                command: format!("clone {location}"),
                message: format!("exited with {s}"),
            });
        }
        Err(e) => {
            tracing::error!(
                error = ?e,
                repo_url = location,
                "Failed to launch git process"
            );
            return Err(ExtractError::Git {
                command: format!("clone {location}"),
                message: format!("failed to launch git: {e}"),
            });
        }
    }

    match (mode, checkout_branch(&full_source_path, location, branch)) {
        (_, Ok(())) => {}
        (SourceMode::Commits, Err(e)) => return Err(e),
        (SourceMode::Steps, Err(e)) => {
            tracing::warn!(
                repo_url = location,
                reference = branch,
                error = %e,
                "Branch not found, reading steps from the default branch"
            );
        }
    }

    Ok(SourceCheckout::Cloned {
        _dir: dir,
        path: full_source_path,
    })
}

/// `git -C <path> checkout <branch>` in a fresh clone.
fn checkout_branch(path: &Path, location: &str, branch: &str) -> Result<(), ExtractError> {
    let checkout_status = Command::new("git")
        .arg("-C")
        .arg(path)
        .arg("checkout")
        .arg("--quiet")
        .arg(branch)
        .status();

    match checkout_status {
        Ok(s) if s.success() => {
            tracing::info!(
                repo_url = location,
                reference = branch,
                "Checked out git reference"
            );
            Ok(())
        }
        Ok(s) => {
            tracing::error!(
                repo_url = location,
                reference = branch,
                "Git checkout exited with non-zero code: {}", s
            );
            Err(ExtractError::Git {
                command: format!("checkout {branch}"),
                message: format!("exited with {s}"),
            })
        }
        Err(e) => {
            tracing::error!(error = ?e, reference = branch, "Failed to launch git checkout");
            Err(ExtractError::Git {
                command: format!("checkout {branch}"),
                message: format!("failed to launch git: {e}"),
            })
        }
    }
}
