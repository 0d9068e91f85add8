//! Course data model: the output of one extraction pass.
//!
//! Everything here is plain data. Values are built once by the orchestrator and
//! never mutated after being attached to their parent, apart from the `order`
//! fields, which are finalized after section placement.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Relative file path -> full text content at one record.
pub type ContentMap = BTreeMap<String, String>;

/// One raw entry of the ordered record stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// 0-based index in the raw stream.
    pub position: usize,
    /// Raw classification text (commit subject or `commitMessage` sidecar field).
    pub tag: String,
    pub title: String,
    /// Commit hash or step directory name.
    pub identity: String,
}

/// Root output of an extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitorialData {
    pub sections: Vec<Section>,
}

impl GitorialData {
    pub fn lesson_count(&self) -> usize {
        self.sections.iter().map(|s| s.lessons.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub slug: String,
    /// 1-based.
    pub order: usize,
    /// Position of the record that introduced this section. `None` for a
    /// synthesized section, which sits before the start of the stream.
    pub boundary_position: Option<usize>,
    pub lessons: Vec<Lesson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A lesson is either a template (optionally paired with its solution) or a
/// single snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Lesson {
    Paired(PairedLesson),
    Single(SingleLesson),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairedLesson {
    pub title: String,
    pub slug: String,
    pub order: usize,
    pub position: usize,
    pub primary_identity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_identity: Option<String>,
    pub primary_content: ContentMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_content: Option<ContentMap>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleLesson {
    pub title: String,
    pub slug: String,
    pub order: usize,
    pub position: usize,
    pub identity: String,
    pub content: ContentMap,
}

impl Lesson {
    pub fn title(&self) -> &str {
        match self {
            Lesson::Paired(l) => &l.title,
            Lesson::Single(l) => &l.title,
        }
    }

    pub fn slug(&self) -> &str {
        match self {
            Lesson::Paired(l) => &l.slug,
            Lesson::Single(l) => &l.slug,
        }
    }

    pub fn order(&self) -> usize {
        match self {
            Lesson::Paired(l) => l.order,
            Lesson::Single(l) => l.order,
        }
    }

    /// Stream position of the record the lesson was built from (the template
    /// for a paired lesson).
    pub fn position(&self) -> usize {
        match self {
            Lesson::Paired(l) => l.position,
            Lesson::Single(l) => l.position,
        }
    }
}
