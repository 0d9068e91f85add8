//! Snapshot fetching: the full file set as of one record.

use tracing::{debug, warn};

use crate::contract::HistoryProvider;
use crate::error::ExtractError;
use crate::model::ContentMap;

/// Sidecar metadata file carried by every step directory.
pub const METADATA_FILENAME: &str = "gitorial_metadata.json";

/// Bookkeeping file names that never belong in a snapshot.
pub const EXCLUDED_NAMES: [&str; 3] = [METADATA_FILENAME, ".gitattributes", ".gitignore"];

/// Content of one record plus the per-file failures that were skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub content: ContentMap,
    pub warnings: Vec<String>,
}

/// True when the file name of `path` contains one of the bookkeeping names.
pub fn is_excluded(path: &str) -> bool {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    EXCLUDED_NAMES.iter().any(|name| file_name.contains(name))
}

/// Reads every tracked, non-bookkeeping file reachable from `identity`.
///
/// Listing failures abort the snapshot. A single unreadable file is logged,
/// recorded in [`Snapshot::warnings`] and skipped.
pub fn fetch_snapshot<P>(provider: &P, identity: &str) -> Result<Snapshot, ExtractError>
where
    P: HistoryProvider + ?Sized,
{
    let paths = provider.list_tracked_paths(identity)?;
    let mut snapshot = Snapshot::default();
    for path in paths {
        if is_excluded(&path) {
            debug!(identity, path = %path, "[SNAPSHOT] Skipping bookkeeping file");
            continue;
        }
        match provider.read_file_at(identity, &path) {
            Ok(text) => {
                snapshot.content.insert(path, text);
            }
            Err(e) => {
                warn!(identity, path = %path, error = %e, "[SNAPSHOT] Skipping unreadable file");
                snapshot.warnings.push(e.to_string());
            }
        }
    }
    debug!(
        identity,
        files = snapshot.content.len(),
        skipped = snapshot.warnings.len(),
        "[SNAPSHOT] Snapshot fetched"
    );
    Ok(snapshot)
}
