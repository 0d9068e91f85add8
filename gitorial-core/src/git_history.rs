//! Commit-history record source.
//!
//! Reads the linear history of one branch, oldest commit first. Each commit is
//! one record: the subject line is its tag and title, the hash its identity.

use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, error, info};

use crate::config::SourceMode;
use crate::contract::{HistoryProvider, RecordStream};
use crate::error::ExtractError;
use crate::model::Record;

const FIELD_SEPARATOR: char = '\u{1f}';

pub struct GitHistoryProvider {
    repo_path: PathBuf,
    branch: String,
}

impl GitHistoryProvider {
    pub fn new(repo_path: impl Into<PathBuf>, branch: impl Into<String>) -> Self {
        Self {
            repo_path: repo_path.into(),
            branch: branch.into(),
        }
    }

    /// Runs `git -C <repo> <args>` and returns stdout.
    fn git(&self, args: &[&str]) -> Result<Vec<u8>, ExtractError> {
        let command = args.join(" ");
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.repo_path)
            .args(args)
            .output()
            .map_err(|e| {
                error!(
                    error = ?e,
                    path = %self.repo_path.display(),
                    "Failed to launch git process"
                );
                ExtractError::Git {
                    command: command.clone(),
                    message: format!("failed to launch git: {e}"),
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            debug!(
                command = %command,
                path = %self.repo_path.display(),
                status = ?output.status,
                stderr = %stderr,
                "Git exited with non-zero code"
            );
            return Err(ExtractError::Git {
                command,
                message: stderr,
            });
        }
        Ok(output.stdout)
    }
}

/// Parses `git log --format=%H%x1f%s` output into records.
pub fn parse_log(stdout: &str) -> Vec<Record> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let (hash, subject) = line.split_once(FIELD_SEPARATOR)?;
            Some(Record {
                position: 0,
                tag: subject.to_string(),
                title: subject.trim().to_string(),
                identity: hash.trim().to_string(),
            })
        })
        .collect()
}

impl HistoryProvider for GitHistoryProvider {
    fn mode(&self) -> SourceMode {
        SourceMode::Commits
    }

    fn list_ordered_records(&self) -> Result<RecordStream, ExtractError> {
        let stdout = self.git(&[
            "log",
            "--reverse",
            "--format=%H%x1f%s",
            self.branch.as_str(),
            "--",
        ])?;
        let stream = RecordStream::new(parse_log(&String::from_utf8_lossy(&stdout)));
        info!(
            branch = %self.branch,
            path = %self.repo_path.display(),
            commits = stream.len(),
            "[SOURCE] Read commit history"
        );
        Ok(stream)
    }

    fn list_tracked_paths(&self, identity: &str) -> Result<Vec<String>, ExtractError> {
        let stdout = self.git(&["ls-tree", "-r", "--name-only", "-z", identity])?;
        Ok(String::from_utf8_lossy(&stdout)
            .split('\0')
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn read_file_at(&self, identity: &str, path: &str) -> Result<String, ExtractError> {
        let object = format!("{identity}:{path}");
        let bytes = self
            .git(&["show", object.as_str()])
            .map_err(|e| ExtractError::ContentRead {
                identity: identity.to_string(),
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        String::from_utf8(bytes).map_err(|_| ExtractError::ContentRead {
            identity: identity.to_string(),
            path: path.to_string(),
            reason: "content is not valid UTF-8".to_string(),
        })
    }
}
