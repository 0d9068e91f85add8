//! `load_config` module: loads a static YAML config into the CLI's config types
//! and maps it onto the core [`ExtractConfig`].
//!
//! # Responsibilities
//! - Parse user-supplied YAML configuration files into type-safe Rust structs
//! - Apply environment overrides (`GITORIAL_BRANCH`)
//! - Merge command-line overrides on top of file values
//! - Surface clear diagnostics: any failure in loading results in an `anyhow::Error`
//!
//! Accepted schema:
//!
//! ```yaml
//! source:
//!   location: ./my-tutorial     # local path or git URL
//!   branch: gitorial            # optional
//!   mode: commits               # optional: commits | steps
//! output:
//!   path: course.json           # optional, stdout when absent
//!   pretty: true                # optional
//! ```

use anyhow::Result;
use gitorial_core::config::{ExtractConfig, SourceMode, DEFAULT_BRANCH};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const BRANCH_ENV: &str = "GITORIAL_BRANCH";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub source: SourceSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceSection {
    pub location: Option<String>,
    pub branch: Option<String>,
    #[serde(default)]
    pub mode: SourceMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputSection {
    pub path: Option<PathBuf>,
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            path: None,
            pretty: default_pretty(),
        }
    }
}

fn default_pretty() -> bool {
    true
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub source: Option<String>,
    pub branch: Option<String>,
    pub steps: bool,
    pub output: Option<PathBuf>,
}

impl CliConfig {
    /// Applies command-line overrides on top of file and environment values.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(source) = overrides.source {
            self.source.location = Some(source);
        }
        if let Some(branch) = overrides.branch {
            self.source.branch = Some(branch);
        }
        if overrides.steps {
            self.source.mode = SourceMode::Steps;
        }
        if let Some(output) = overrides.output {
            self.output.path = Some(output);
        }
        self
    }

    /// Builds the core extraction config. Fails when no source location is
    /// known.
    pub fn extract_config(&self) -> Result<ExtractConfig> {
        let source = self.source.location.clone().ok_or_else(|| {
            anyhow::anyhow!("No source location given: pass --source or set source.location in the config file")
        })?;
        Ok(ExtractConfig {
            source,
            branch: self
                .source
                .branch
                .clone()
                .unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            mode: self.source.mode,
        })
    }
}

/// Loads a static YAML config file and applies environment overrides.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let mut config: CliConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    apply_env(&mut config);
    Ok(config)
}

/// Config used when no file is given: defaults plus environment overrides.
pub fn default_config() -> CliConfig {
    let mut config = CliConfig::default();
    apply_env(&mut config);
    config
}

fn apply_env(config: &mut CliConfig) {
    if let Ok(branch) = std::env::var(BRANCH_ENV) {
        if !branch.trim().is_empty() {
            info!(branch = %branch, "Branch overridden from {}", BRANCH_ENV);
            config.source.branch = Some(branch.trim().to_string());
        }
    }
}
