//! Lesson catalog and document lookup
//!
//! The catalog lists courses, their modules, and lesson summaries; lesson
//! documents themselves live as individual JSON files next to it. Release
//! gating is a pure predicate over the summary and a caller-supplied clock,
//! so nothing in here reads the system time.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::LessonDocument;
use super::schema::{self, SchemaError};

/// Summary of one lesson in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonSummary {
    /// Lesson id; also the document file stem
    pub id: String,
    pub course_id: String,
    pub module_id: u32,
    pub title: String,
    /// Unix seconds after which the lesson unlocks. Absent means no gate.
    pub release_at: Option<i64>,
    /// Display duration like "51:24"
    pub duration: Option<String>,
    /// Hard lock independent of release time
    #[serde(default)]
    pub locked: bool,
}

/// A module groups lessons within a course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub id: u32,
    pub course_id: String,
    pub title: String,
    pub lessons: Vec<LessonSummary>,
}

/// A course groups modules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// The full catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub courses: Vec<Course>,
    pub modules: Vec<Module>,
}

impl Catalog {
    /// Load a catalog from a JSON file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog from {:?}", path))?;
        serde_json::from_str(&contents).with_context(|| "Failed to parse catalog.json")
    }

    /// All lessons in catalog order
    pub fn lessons(&self) -> impl Iterator<Item = &LessonSummary> {
        self.modules.iter().flat_map(|m| m.lessons.iter())
    }

    /// Find a lesson by id
    pub fn find_lesson(&self, id: &str) -> Option<&LessonSummary> {
        self.lessons().find(|l| l.id == id)
    }

    /// Modules belonging to one course, in catalog order
    pub fn modules_for(&self, course_id: &str) -> impl Iterator<Item = &Module> {
        self.modules.iter().filter(move |m| m.course_id == course_id)
    }

    /// The lesson after `id` within the same course
    pub fn next_lesson(&self, id: &str) -> Option<&LessonSummary> {
        self.neighbor(id, 1)
    }

    /// The lesson before `id` within the same course
    pub fn prev_lesson(&self, id: &str) -> Option<&LessonSummary> {
        self.neighbor(id, -1)
    }

    fn neighbor(&self, id: &str, offset: isize) -> Option<&LessonSummary> {
        let current = self.find_lesson(id)?;
        let course: Vec<_> =
            self.lessons().filter(|l| l.course_id == current.course_id).collect();
        let pos = course.iter().position(|l| l.id == id)?;
        let target = pos.checked_add_signed(offset)?;
        course.get(target).copied()
    }
}

/// Whether a lesson's content is unlocked at `now` (unix seconds).
///
/// Hard-locked lessons never unlock here; release-gated lessons unlock once
/// their timestamp passes. What drives the lock is the catalog's business,
/// not the player's.
pub fn is_available(lesson: &LessonSummary, now: i64) -> bool {
    !lesson.locked && lesson.release_at.is_none_or(|t| t <= now)
}

/// Current unix time in seconds
pub fn unix_now() -> i64 {
    SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).map_or(0, |d| d.as_secs() as i64)
}

/// Errors from lesson document lookup
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("lesson \"{0}\" not found")]
    NotFound(String),
    #[error("failed to read lesson \"{id}\"")]
    Io {
        id: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// A directory of lesson documents plus their catalog
#[derive(Debug)]
pub struct LessonLibrary {
    dir: PathBuf,
    catalog: Catalog,
}

impl LessonLibrary {
    /// Open a library directory containing `catalog.json` and one
    /// `<lesson-id>.json` per lesson
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let catalog = Catalog::load_from(&dir.join("catalog.json"))?;
        Ok(Self { dir, catalog })
    }

    /// A library without a catalog, for single-document use
    pub fn without_catalog(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), catalog: Catalog::default() }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Load and normalize the document for a lesson
    pub fn load_document(&self, lesson_id: &str) -> Result<LessonDocument, LibraryError> {
        let path = self.dir.join(format!("{lesson_id}.json"));
        if !path.exists() {
            return Err(LibraryError::NotFound(lesson_id.to_string()));
        }

        let contents = fs::read_to_string(&path)
            .map_err(|source| LibraryError::Io { id: lesson_id.to_string(), source })?;
        Ok(schema::parse_document(&contents)?)
    }
}
