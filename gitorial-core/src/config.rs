use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Branch read in commit-history mode when none is configured.
pub const DEFAULT_BRANCH: &str = "gitorial";

/// Which physical origin the record stream is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Linear commit history of a named branch.
    #[default]
    Commits,
    /// Numbered directories under `steps/`, one per record.
    Steps,
}

/// Inputs of one extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Local path or remote git URL of the tutorial repository.
    pub source: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default)]
    pub mode: SourceMode,
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

impl ExtractConfig {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            branch: default_branch(),
            mode: SourceMode::default(),
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            source = %self.source,
            branch = %self.branch,
            mode = ?self.mode,
            "Loaded ExtractConfig"
        );
        debug!(?self, "ExtractConfig loaded (full debug)");
    }
}
