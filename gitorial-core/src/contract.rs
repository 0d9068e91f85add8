//! # contract: the History/Layout Provider seam
//!
//! The extraction pipeline never shells out or walks the filesystem itself. It
//! talks to a [`HistoryProvider`], which hides whether records come from a
//! linear commit history ([`crate::git_history::GitHistoryProvider`]) or from a
//! numbered steps layout ([`crate::steps::StepsProvider`]).
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`; `MockHistoryProvider` is exported
//!   behind the default `test-export-mocks` feature so integration tests can
//!   script record streams and file contents without git or a filesystem.

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::config::SourceMode;
use crate::error::ExtractError;
use crate::model::Record;

/// Ordered records. Each record carries its own stream position, so later
/// stages never look a position up by identity.
#[derive(Debug, Clone, Default)]
pub struct RecordStream {
    pub records: Vec<Record>,
}

impl RecordStream {
    /// Builds a stream from records already in stream order. Positions are
    /// reassigned from the slice index so they are unique and monotonic.
    pub fn new(records: Vec<Record>) -> Self {
        let records = records
            .into_iter()
            .enumerate()
            .map(|(position, record)| Record { position, ..record })
            .collect();
        Self { records }
    }

    /// Convenience constructor from `(identity, tag, title)` triples.
    pub fn from_tags<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, S, S)>,
        S: Into<String>,
    {
        Self::new(
            entries
                .into_iter()
                .map(|(identity, tag, title)| Record {
                    position: 0,
                    tag: tag.into(),
                    title: title.into(),
                    identity: identity.into(),
                })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read-only access to one tutorial source.
///
/// All calls are blocking and are treated as idempotent reads; nothing in the
/// pipeline retries them.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait HistoryProvider {
    /// Which origin this provider reads from.
    fn mode(&self) -> SourceMode;

    /// The full record stream, oldest first.
    fn list_ordered_records(&self) -> Result<RecordStream, ExtractError>;

    /// Every tracked file path reachable from `identity`, relative and
    /// `/`-separated.
    fn list_tracked_paths(&self, identity: &str) -> Result<Vec<String>, ExtractError>;

    /// Text content of `path` as of `identity`.
    fn read_file_at(&self, identity: &str, path: &str) -> Result<String, ExtractError>;
}
