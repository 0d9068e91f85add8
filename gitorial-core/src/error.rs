use std::io;

use thiserror::Error;

/// Error type for extraction failures.
///
/// `Configuration`, `Git` and `Io` abort the extraction. `ContentRead` is only
/// ever produced for a single file and is absorbed by the snapshot fetcher.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("`git {command}` failed: {message}")]
    Git { command: String, message: String },
    #[error("failed to read `{path}` at {identity}: {reason}")]
    ContentRead {
        identity: String,
        path: String,
        reason: String,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ExtractError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        ExtractError::Configuration(msg.into())
    }
}
