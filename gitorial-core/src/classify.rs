//! Tag classification of raw records.

use crate::config::SourceMode;
use crate::model::Record;

/// What a record's tag says it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Section,
    Template,
    Solution,
    Action,
    Unrecognized,
}

const SECTION_PREFIX: &str = "section:";
const TEMPLATE_PREFIX: &str = "template:";
const SOLUTION_PREFIX: &str = "solution:";
const ACTION_PREFIX: &str = "action:";
const README_PREFIX: &str = "readme:";

/// Classifies a raw tag by case-sensitive prefix.
///
/// Returns `None` for `readme:` records, which carry no lesson or section
/// content and are dropped before any further processing. Otherwise returns
/// the kind and the tag text with the prefix and surrounding whitespace
/// stripped.
pub fn classify_tag(tag: &str) -> Option<(TagKind, &str)> {
    let tag = tag.trim_start();
    if tag.starts_with(README_PREFIX) {
        return None;
    }
    let table = [
        (SECTION_PREFIX, TagKind::Section),
        (TEMPLATE_PREFIX, TagKind::Template),
        (SOLUTION_PREFIX, TagKind::Solution),
        (ACTION_PREFIX, TagKind::Action),
    ];
    for (prefix, kind) in table {
        if let Some(rest) = tag.strip_prefix(prefix) {
            return Some((kind, rest.trim()));
        }
    }
    Some((TagKind::Unrecognized, tag.trim()))
}

/// A record together with its classification and working title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub kind: TagKind,
    pub title: String,
    pub record: Record,
}

impl Classified {
    pub fn position(&self) -> usize {
        self.record.position
    }

    pub fn identity(&self) -> &str {
        &self.record.identity
    }
}

/// Classifies every record of a stream, dropping `readme:` records.
///
/// In commit-history mode the working title is the stripped tag. In
/// directory-listing mode it is the record title, which the steps source reads
/// from the step's README heading.
pub fn classify_records(records: &[Record], mode: SourceMode) -> Vec<Classified> {
    records
        .iter()
        .filter_map(|record| {
            let Some((kind, stripped)) = classify_tag(&record.tag) else {
                tracing::debug!(
                    identity = %record.identity,
                    tag = %record.tag,
                    "[CLASSIFY] Dropping readme record"
                );
                return None;
            };
            let title = match mode {
                SourceMode::Commits => stripped.to_string(),
                SourceMode::Steps => record.title.trim().to_string(),
            };
            Some(Classified {
                kind,
                title,
                record: record.clone(),
            })
        })
        .collect()
}
