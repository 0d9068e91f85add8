//! Template/solution pairing.
//!
//! Commit histories pair by title: a template pairs with the first solution,
//! in stream order, carrying the same trimmed title. Templates sharing a title
//! share that solution. Steps layouts pair by adjacency: a template at
//! position `p` pairs with a solution at `p + 1`.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::classify::{Classified, TagKind};
use crate::config::SourceMode;

/// What a lesson unit will be materialized into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitKind {
    Paired {
        primary: String,
        secondary: Option<String>,
    },
    Single {
        identity: String,
    },
}

/// A lesson before section placement and before any content is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonUnit {
    pub title: String,
    /// Stream position of the primary record.
    pub position: usize,
    /// 1-based order across the whole stream. Replaced by the per-section
    /// order once the unit is placed.
    pub provisional_order: usize,
    /// Classification of the primary record.
    pub source_kind: TagKind,
    pub kind: UnitKind,
}

impl LessonUnit {
    fn paired(template: &Classified, secondary: Option<String>) -> Self {
        Self {
            title: template.title.clone(),
            position: template.position(),
            provisional_order: 0,
            source_kind: TagKind::Template,
            kind: UnitKind::Paired {
                primary: template.identity().to_string(),
                secondary,
            },
        }
    }

    fn single(record: &Classified) -> Self {
        Self {
            title: record.title.clone(),
            position: record.position(),
            provisional_order: 0,
            source_kind: record.kind,
            kind: UnitKind::Single {
                identity: record.identity().to_string(),
            },
        }
    }

    pub fn is_paired(&self) -> bool {
        matches!(
            self.kind,
            UnitKind::Paired {
                secondary: Some(_),
                ..
            }
        )
    }
}

/// Builds lesson units from classified records, ordered by stream position.
///
/// Section markers are ignored here; they are consumed by the section
/// assigner.
pub fn pair_lessons(classified: &[Classified], mode: SourceMode) -> Vec<LessonUnit> {
    let mut units = match mode {
        SourceMode::Commits => pair_by_title(classified),
        SourceMode::Steps => pair_by_adjacency(classified),
    };
    units.sort_by_key(|u| u.position);
    for (idx, unit) in units.iter_mut().enumerate() {
        unit.provisional_order = idx + 1;
    }
    info!(
        mode = ?mode,
        units = units.len(),
        paired = units.iter().filter(|u| u.is_paired()).count(),
        "[PAIR] Built lesson units"
    );
    units
}

fn pair_by_title(classified: &[Classified]) -> Vec<LessonUnit> {
    let mut first_solution: HashMap<&str, &Classified> = HashMap::new();
    for record in classified.iter().filter(|c| c.kind == TagKind::Solution) {
        first_solution.entry(record.title.trim()).or_insert(record);
    }

    let mut matched: HashSet<&str> = HashSet::new();
    let mut units = Vec::new();
    for record in classified {
        match record.kind {
            TagKind::Template => {
                let secondary = first_solution.get(record.title.trim()).map(|solution| {
                    matched.insert(solution.identity());
                    solution.identity().to_string()
                });
                if secondary.is_none() {
                    debug!(title = %record.title, "[PAIR] Template has no matching solution");
                }
                units.push(LessonUnit::paired(record, secondary));
            }
            TagKind::Action => units.push(LessonUnit::single(record)),
            TagKind::Unrecognized => {
                debug!(
                    identity = %record.identity(),
                    tag = %record.record.tag,
                    "[PAIR] Ignoring unrecognized commit"
                );
            }
            TagKind::Section | TagKind::Solution => {}
        }
    }

    for leftover in classified
        .iter()
        .filter(|c| c.kind == TagKind::Solution && !matched.contains(c.identity()))
    {
        debug!(
            identity = %leftover.identity(),
            title = %leftover.title,
            "[PAIR] Solution commit matched no template"
        );
    }
    units
}

fn pair_by_adjacency(classified: &[Classified]) -> Vec<LessonUnit> {
    let solutions: HashMap<usize, &Classified> = classified
        .iter()
        .filter(|c| c.kind == TagKind::Solution)
        .map(|c| (c.position(), c))
        .collect();
    let mut consumed: HashSet<usize> = HashSet::new();

    let mut units = Vec::new();
    for record in classified {
        match record.kind {
            TagKind::Template => {
                let next = record.position() + 1;
                let secondary = solutions.get(&next).map(|solution| {
                    consumed.insert(next);
                    solution.identity().to_string()
                });
                units.push(LessonUnit::paired(record, secondary));
            }
            TagKind::Action | TagKind::Unrecognized => units.push(LessonUnit::single(record)),
            TagKind::Section | TagKind::Solution => {}
        }
    }

    // No step content is dropped: solutions that follow no template surface
    // as single lessons.
    for record in classified.iter().filter(|c| c.kind == TagKind::Solution) {
        if !consumed.contains(&record.position()) {
            debug!(
                identity = %record.identity(),
                "[PAIR] Orphan solution step kept as single lesson"
            );
            units.push(LessonUnit::single(record));
        }
    }
    units
}
