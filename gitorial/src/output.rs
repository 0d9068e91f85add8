//! Writes extraction results: the course as JSON for the document generator,
//! and a human-readable outline for `inspect`.

use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use gitorial_core::{CoursePlan, Extraction, GitorialData, SourceMode};
use serde::Serialize;
use tracing::info;

/// JSON document handed to the document generator.
#[derive(Debug, Serialize)]
pub struct CourseDocument<'a> {
    pub mode: SourceMode,
    #[serde(flatten)]
    pub course: &'a GitorialData,
    #[serde(skip_serializing_if = "no_warnings")]
    pub warnings: &'a [String],
}

fn no_warnings(warnings: &&[String]) -> bool {
    warnings.is_empty()
}

impl<'a> From<&'a Extraction> for CourseDocument<'a> {
    fn from(extraction: &'a Extraction) -> Self {
        Self {
            mode: extraction.mode,
            course: &extraction.data,
            warnings: &extraction.warnings,
        }
    }
}

pub fn render_json(extraction: &Extraction, pretty: bool) -> Result<String> {
    let document = CourseDocument::from(extraction);
    let json = if pretty {
        serde_json::to_string_pretty(&document)
    } else {
        serde_json::to_string(&document)
    }
    .context("Failed to serialize course")?;
    Ok(json)
}

/// Writes the course JSON to `target`, or stdout when `None`.
pub fn write_course(extraction: &Extraction, target: Option<&Path>, pretty: bool) -> Result<()> {
    let json = render_json(extraction, pretty)?;
    match target {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Wrote course JSON");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("Failed to write course to stdout")?;
        }
    }
    Ok(())
}

/// One line per section and lesson, indented.
pub fn render_outline(plan: &CoursePlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "mode: {:?}", plan.mode);
    for section in &plan.sections {
        let _ = writeln!(
            out,
            "{}. {} ({}) [{} lessons]",
            section.order,
            section.title,
            section.slug,
            section.lessons.len()
        );
        for lesson in section.lesson_summaries() {
            let pairing = if lesson.paired { ", paired" } else { "" };
            let _ = writeln!(
                out,
                "   {}. {} ({}) {:?}{}",
                lesson.order, lesson.title, lesson.slug, lesson.kind, pairing
            );
        }
    }
    out
}
