//! Extraction orchestrator: record source -> classifier -> pairing -> section
//! assignment -> snapshots.
//!
//! The pipeline runs in two stages. [`plan`] reads only the record stream and
//! decides the full course structure. [`materialize`] then reads file
//! contents, and only for records that ended up in the plan.
//!
//! # Callable From
//! - [`extract`] and [`inspect`] for a configured source location (used by the CLI)
//! - [`extract_from_provider`] for any [`HistoryProvider`], including mocks

use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::classify::{classify_records, Classified, TagKind};
use crate::config::{ExtractConfig, SourceMode};
use crate::contract::HistoryProvider;
use crate::download::resolve_source;
use crate::error::ExtractError;
use crate::git_history::GitHistoryProvider;
use crate::model::{GitorialData, Lesson, PairedLesson, Section, SingleLesson};
use crate::pairing::{pair_lessons, UnitKind};
use crate::sections::{assign_sections, PlannedSection};
use crate::snapshot::fetch_snapshot;
use crate::steps::{body_without_heading, has_steps_layout, StepsProvider, README_FILENAME};

/// Course structure decided from the record stream alone.
#[derive(Debug, Clone)]
pub struct CoursePlan {
    pub mode: SourceMode,
    pub sections: Vec<PlannedSection>,
}

impl CoursePlan {
    pub fn lesson_count(&self) -> usize {
        self.sections.iter().map(|s| s.lessons.len()).sum()
    }
}

/// Result of a full extraction.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub data: GitorialData,
    /// Mode that produced `data`, after any fallback.
    pub mode: SourceMode,
    /// Files skipped because they could not be read.
    pub warnings: Vec<String>,
}

/// Classifies, pairs and places every record of the provider's stream.
/// Reads no file content.
pub fn plan<P>(provider: &P) -> Result<CoursePlan, ExtractError>
where
    P: HistoryProvider + ?Sized,
{
    let mode = provider.mode();
    let stream = provider.list_ordered_records()?;
    let classified = classify_records(&stream.records, mode);
    let markers: Vec<Classified> = classified
        .iter()
        .filter(|c| c.kind == TagKind::Section)
        .cloned()
        .collect();
    let units = pair_lessons(&classified, mode);
    let sections = assign_sections(&markers, units, mode)?;
    Ok(CoursePlan { mode, sections })
}

/// Fetches snapshots for a finished plan and builds the course tree.
pub fn materialize<P>(provider: &P, plan: &CoursePlan) -> Result<Extraction, ExtractError>
where
    P: HistoryProvider + ?Sized,
{
    let mut warnings = Vec::new();
    let mut sections = Vec::with_capacity(plan.sections.len());

    for planned in &plan.sections {
        let description = planned
            .identity
            .as_deref()
            .and_then(|identity| section_description(provider, identity));

        let mut lessons = Vec::with_capacity(planned.lessons.len());
        for lesson in &planned.lessons {
            let unit = &lesson.unit;
            let built = match &unit.kind {
                UnitKind::Paired { primary, secondary } => {
                    let primary_snapshot = fetch_snapshot(provider, primary)?;
                    warnings.extend(primary_snapshot.warnings);
                    let secondary_content = match secondary {
                        Some(identity) => {
                            let snapshot = fetch_snapshot(provider, identity)?;
                            warnings.extend(snapshot.warnings);
                            Some(snapshot.content)
                        }
                        None => None,
                    };
                    Lesson::Paired(PairedLesson {
                        title: unit.title.clone(),
                        slug: lesson.slug.clone(),
                        order: lesson.order,
                        position: unit.position,
                        primary_identity: primary.clone(),
                        secondary_identity: secondary.clone(),
                        primary_content: primary_snapshot.content,
                        secondary_content,
                    })
                }
                UnitKind::Single { identity } => {
                    let snapshot = fetch_snapshot(provider, identity)?;
                    warnings.extend(snapshot.warnings);
                    Lesson::Single(SingleLesson {
                        title: unit.title.clone(),
                        slug: lesson.slug.clone(),
                        order: lesson.order,
                        position: unit.position,
                        identity: identity.clone(),
                        content: snapshot.content,
                    })
                }
            };
            lessons.push(built);
        }

        sections.push(Section {
            title: planned.title.clone(),
            slug: planned.slug.clone(),
            order: planned.order,
            boundary_position: planned.boundary_position,
            lessons,
            description,
        });
    }

    let data = GitorialData { sections };
    info!(
        mode = ?plan.mode,
        sections = data.sections.len(),
        lessons = data.lesson_count(),
        warnings = warnings.len(),
        "[EXTRACT] Course materialized"
    );
    Ok(Extraction {
        data,
        mode: plan.mode,
        warnings,
    })
}

fn section_description<P>(provider: &P, identity: &str) -> Option<String>
where
    P: HistoryProvider + ?Sized,
{
    match provider.read_file_at(identity, README_FILENAME) {
        Ok(text) => Some(body_without_heading(&text)).filter(|body| !body.is_empty()),
        Err(e) => {
            debug!(identity, error = %e, "[EXTRACT] Section has no readable README");
            None
        }
    }
}

/// Plans and materializes a course from one provider, without fallback.
pub fn extract_from_provider<P>(provider: &P) -> Result<Extraction, ExtractError>
where
    P: HistoryProvider + ?Sized,
{
    let plan = plan(provider)?;
    materialize(provider, &plan)
}

/// Extracts the course described by `config`.
///
/// Steps mode runs only when requested and a `steps/` directory exists.
/// Otherwise the commit history is read; if it yields no lessons and a steps
/// layout is present, the pipeline runs once more against the steps layout.
pub fn extract(config: &ExtractConfig) -> Result<Extraction, ExtractError> {
    config.trace_loaded();
    let checkout = resolve_source(&config.source, &config.branch, config.mode)?;
    let (provider, course) = select_plan(checkout.path(), config)?;
    materialize(provider.as_ref(), &course)
}

/// Resolves the source and decides the course structure, reading no file
/// content. Applies the same mode selection and fallback as [`extract`].
pub fn inspect(config: &ExtractConfig) -> Result<CoursePlan, ExtractError> {
    config.trace_loaded();
    let checkout = resolve_source(&config.source, &config.branch, config.mode)?;
    let (_, course) = select_plan(checkout.path(), config)?;
    Ok(course)
}

fn select_plan(
    root: &Path,
    config: &ExtractConfig,
) -> Result<(Box<dyn HistoryProvider>, CoursePlan), ExtractError> {
    let steps_available = has_steps_layout(root);
    info!(
        root = %root.display(),
        steps_available,
        requested = ?config.mode,
        "[EXTRACT] Starting extraction"
    );

    if config.mode == SourceMode::Steps && !steps_available {
        warn!(
            root = %root.display(),
            "[EXTRACT] Steps mode requested but no steps directory found, reading commit history"
        );
    }

    let use_steps = config.mode == SourceMode::Steps && steps_available;
    let mut provider: Box<dyn HistoryProvider> = if use_steps {
        Box::new(StepsProvider::new(root))
    } else {
        Box::new(GitHistoryProvider::new(root, config.branch.clone()))
    };
    let mut course = plan(provider.as_ref())?;

    if course.lesson_count() == 0 {
        if !use_steps && steps_available {
            info!("[EXTRACT] Commit history yielded no lessons, falling back to steps layout");
            provider = Box::new(StepsProvider::new(root));
            course = plan(provider.as_ref())?;
        }
        if course.lesson_count() == 0 {
            error!(
                root = %root.display(),
                mode = ?course.mode,
                "[EXTRACT][ERROR] No lessons found"
            );
            return Err(ExtractError::configuration(format!(
                "no lessons found in {} ({:?} mode)",
                root.display(),
                course.mode
            )));
        }
    }

    Ok((provider, course))
}
