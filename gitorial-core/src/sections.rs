//! Section assignment: partitions ordered lesson units into sections using the
//! positions of section markers as boundaries.

use tracing::{info, warn};

use crate::classify::{Classified, TagKind};
use crate::config::SourceMode;
use crate::error::ExtractError;
use crate::pairing::LessonUnit;
use crate::slug::SlugScope;

pub const DEFAULT_SECTION_TITLE: &str = "Getting Started";

/// A section with its placed lessons, before any content is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedSection {
    pub title: String,
    pub slug: String,
    pub order: usize,
    /// `None` for a synthesized section.
    pub boundary_position: Option<usize>,
    /// Identity of the introducing record, used to look up the section README.
    pub identity: Option<String>,
    pub lessons: Vec<PlannedLesson>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedLesson {
    pub slug: String,
    /// Final 1-based order within the owning section.
    pub order: usize,
    pub unit: LessonUnit,
}

/// Summary row used by plan inspection.
#[derive(Debug, Clone)]
pub struct PlannedLessonSummary {
    pub order: usize,
    pub title: String,
    pub slug: String,
    pub kind: TagKind,
    pub paired: bool,
}

impl PlannedSection {
    fn synthesized() -> Self {
        Self::new(DEFAULT_SECTION_TITLE.to_string(), None, None)
    }

    fn from_marker(marker: &Classified) -> Self {
        Self::new(
            marker.title.clone(),
            Some(marker.position()),
            Some(marker.identity().to_string()),
        )
    }

    fn new(title: String, boundary_position: Option<usize>, identity: Option<String>) -> Self {
        Self {
            title,
            slug: String::new(),
            order: 0,
            boundary_position,
            identity,
            lessons: Vec::new(),
        }
    }

    pub fn lesson_summaries(&self) -> Vec<PlannedLessonSummary> {
        self.lessons
            .iter()
            .map(|l| PlannedLessonSummary {
                order: l.order,
                title: l.unit.title.clone(),
                slug: l.slug.clone(),
                kind: l.unit.source_kind,
                paired: l.unit.is_paired(),
            })
            .collect()
    }
}

/// Assigns every lesson unit to exactly one section.
///
/// `markers` must be section markers in stream order and `units` must be
/// sorted by position. Each unit lands in the last section whose boundary is
/// at or before its position; the scan is a single monotonic pass over both
/// lists.
///
/// Without any marker, commit histories get one synthesized
/// "Getting Started" section while steps layouts are rejected. Units that
/// precede the first marker go to a synthesized section placed first.
pub fn assign_sections(
    markers: &[Classified],
    units: Vec<LessonUnit>,
    mode: SourceMode,
) -> Result<Vec<PlannedSection>, ExtractError> {
    debug_assert!(markers.iter().all(|m| m.kind == TagKind::Section));
    debug_assert!(units.windows(2).all(|w| w[0].position < w[1].position));

    let mut sections: Vec<PlannedSection> = Vec::with_capacity(markers.len() + 1);
    if markers.is_empty() {
        match mode {
            SourceMode::Commits => {
                info!("[ASSIGN] No section markers, using a default section");
                sections.push(PlannedSection::synthesized());
            }
            SourceMode::Steps => {
                return Err(ExtractError::configuration(
                    "steps layout contains no section step; at least one is required",
                ));
            }
        }
    } else {
        let first_boundary = markers[0].position();
        if units.first().is_some_and(|u| u.position < first_boundary) {
            warn!(
                first_section = %markers[0].title,
                "[ASSIGN] Lessons precede the first section marker, adding a default section"
            );
            sections.push(PlannedSection::synthesized());
        }
        sections.extend(markers.iter().map(PlannedSection::from_marker));
    }

    let mut current = 0;
    for unit in units {
        while current + 1 < sections.len()
            && sections[current + 1].boundary_position <= Some(unit.position)
        {
            current += 1;
        }
        sections[current].lessons.push(PlannedLesson {
            slug: String::new(),
            order: 0,
            unit,
        });
    }

    finalize_order(&mut sections);
    info!(
        sections = sections.len(),
        lessons = sections.iter().map(|s| s.lessons.len()).sum::<usize>(),
        "[ASSIGN] Placed lessons into sections"
    );
    Ok(sections)
}

/// Second ordering pass: 1-based orders and scoped slugs, computed only after
/// placement is complete.
fn finalize_order(sections: &mut [PlannedSection]) {
    let mut section_slugs = SlugScope::new();
    for (s_idx, section) in sections.iter_mut().enumerate() {
        section.order = s_idx + 1;
        section.slug = section_slugs.claim(&section.title);
        let mut lesson_slugs = SlugScope::new();
        for (l_idx, lesson) in section.lessons.iter_mut().enumerate() {
            lesson.order = l_idx + 1;
            lesson.slug = lesson_slugs.claim(&lesson.unit.title);
        }
    }
}
