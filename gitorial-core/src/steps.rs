//! Directory-listing record source ("steps layout").
//!
//! Each numerically named directory under `steps/` is one record, ordered by
//! numeric value. The tag comes from the `commitMessage` field of the step's
//! `gitorial_metadata.json`; the title from the first level-1 heading of its
//! `README.md`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::config::SourceMode;
use crate::contract::{HistoryProvider, RecordStream};
use crate::error::ExtractError;
use crate::model::Record;
use crate::snapshot::METADATA_FILENAME;

pub const STEPS_DIR: &str = "steps";
pub const README_FILENAME: &str = "README.md";

/// Sidecar metadata of one step directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepMetadata {
    pub commit_message: String,
}

/// True when `root` carries a `steps/` directory.
pub fn has_steps_layout(root: &Path) -> bool {
    root.join(STEPS_DIR).is_dir()
}

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^#[ \t]+(.+?)[ \t]*\r?$").expect("static regex"))
}

/// Text of the first level-1 heading in a markdown document.
pub fn first_heading(markdown: &str) -> Option<String> {
    heading_re()
        .captures(markdown)
        .map(|c| c[1].trim().to_string())
        .filter(|t| !t.is_empty())
}

/// The document with its first level-1 heading line removed, trimmed.
pub fn body_without_heading(markdown: &str) -> String {
    match heading_re().find(markdown) {
        Some(m) => format!("{}{}", &markdown[..m.start()], &markdown[m.end()..])
            .trim()
            .to_string(),
        None => markdown.trim().to_string(),
    }
}

pub struct StepsProvider {
    steps_dir: PathBuf,
}

impl StepsProvider {
    /// `root` is the tutorial repository; steps are read from `root/steps`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            steps_dir: root.as_ref().join(STEPS_DIR),
        }
    }

    fn step_dir(&self, identity: &str) -> PathBuf {
        self.steps_dir.join(identity)
    }

    /// Numeric step directories, ascending by value.
    fn numbered_dirs(&self) -> Result<Vec<(u64, String)>, ExtractError> {
        let entries = fs::read_dir(&self.steps_dir).map_err(|e| {
            error!(error = ?e, path = %self.steps_dir.display(), "Failed to list steps directory");
            ExtractError::configuration(format!(
                "cannot read steps directory {}: {e}",
                self.steps_dir.display()
            ))
        })?;

        let mut dirs = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
                debug!(name = %name, "[SOURCE] Skipping non-numeric steps entry");
                continue;
            }
            match name.parse::<u64>() {
                Ok(n) => dirs.push((n, name)),
                Err(_) => debug!(name = %name, "[SOURCE] Skipping out-of-range step number"),
            }
        }
        dirs.sort();
        Ok(dirs)
    }

    fn read_metadata(&self, identity: &str) -> Result<StepMetadata, ExtractError> {
        let path = self.step_dir(identity).join(METADATA_FILENAME);
        let raw = fs::read_to_string(&path).map_err(|e| {
            error!(error = ?e, path = %path.display(), "Missing step metadata");
            ExtractError::configuration(format!("missing {}: {e}", path.display()))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            error!(error = ?e, path = %path.display(), "Unparsable step metadata");
            ExtractError::configuration(format!("cannot parse {}: {e}", path.display()))
        })
    }

    fn read_title(&self, identity: &str, number: u64) -> String {
        let readme = self.step_dir(identity).join(README_FILENAME);
        fs::read_to_string(&readme)
            .ok()
            .and_then(|text| first_heading(&text))
            .unwrap_or_else(|| format!("Step {number}"))
    }
}

impl HistoryProvider for StepsProvider {
    fn mode(&self) -> SourceMode {
        SourceMode::Steps
    }

    fn list_ordered_records(&self) -> Result<RecordStream, ExtractError> {
        let dirs = self.numbered_dirs()?;
        if dirs.is_empty() {
            return Err(ExtractError::configuration(format!(
                "no numbered step directories found in {}",
                self.steps_dir.display()
            )));
        }

        let mut records = Vec::with_capacity(dirs.len());
        for (number, name) in dirs {
            let metadata = self.read_metadata(&name)?;
            let title = self.read_title(&name, number);
            records.push(Record {
                position: 0,
                tag: metadata.commit_message,
                title,
                identity: name,
            });
        }
        let stream = RecordStream::new(records);
        info!(
            path = %self.steps_dir.display(),
            steps = stream.len(),
            "[SOURCE] Read steps layout"
        );
        Ok(stream)
    }

    fn list_tracked_paths(&self, identity: &str) -> Result<Vec<String>, ExtractError> {
        fn visit_dir(dir: &Path, base: &Path, results: &mut Vec<String>) -> Result<(), ExtractError> {
            for entry_res in fs::read_dir(dir)? {
                let entry = entry_res?;
                let path = entry.path();
                if entry.file_type()?.is_symlink() {
                    debug!(path = %path.display(), "Skipping symlink");
                    continue;
                }
                if path.is_dir() {
                    if path.file_name().and_then(|n| n.to_str()) == Some(".git") {
                        debug!(path = %path.display(), "Skipping directory");
                        continue;
                    }
                    visit_dir(&path, base, results)?;
                } else if path.is_file() {
                    let Ok(rel_path) = path.strip_prefix(base) else {
                        continue;
                    };
                    let segments: Vec<String> = rel_path
                        .components()
                        .map(|c| c.as_os_str().to_string_lossy().into_owned())
                        .collect();
                    if !segments.is_empty() {
                        results.push(segments.join("/"));
                    }
                }
            }
            Ok(())
        }

        let base = self.step_dir(identity);
        let mut paths = Vec::new();
        visit_dir(&base, &base, &mut paths)?;
        paths.sort();
        Ok(paths)
    }

    fn read_file_at(&self, identity: &str, path: &str) -> Result<String, ExtractError> {
        let full = self.step_dir(identity).join(path);
        fs::read_to_string(&full).map_err(|e| ExtractError::ContentRead {
            identity: identity.to_string(),
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}
