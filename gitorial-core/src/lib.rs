#![doc = "gitorial-core: extraction logic for gitorial."]

//! Turns a tutorial repository, authored either as a tagged commit history or
//! as numbered step directories, into a course tree of sections and lessons,
//! each lesson carrying a snapshot of the project files.
//!
//! # Usage
//! Call [`extract::extract`] with an [`config::ExtractConfig`], or
//! [`extract::extract_from_provider`] with any [`contract::HistoryProvider`].

pub mod classify;
pub mod config;
pub mod contract;
pub mod download;
pub mod error;
pub mod extract;
pub mod git_history;
pub mod model;
pub mod pairing;
pub mod sections;
pub mod slug;
pub mod snapshot;
pub mod steps;

pub use config::{ExtractConfig, SourceMode};
pub use error::ExtractError;
pub use extract::{extract, extract_from_provider, inspect, CoursePlan, Extraction};
pub use model::{ContentMap, GitorialData, Lesson, PairedLesson, Record, Section, SingleLesson};
