//! Durable progress tracking
//!
//! Completion state, badges, and the derived point total for every lesson,
//! persisted as a single JSON file under the data directory. The store is an
//! explicit handle passed into rendering and event handling; `load`/`save`
//! are its only boundary with the outside world, so tests run it fully
//! in memory.
//!
//! Persistence is write-through: every mutation flushes. The flush is
//! best-effort and a failure is logged, never fatal. All three records
//! (completed map, point total, badge set) live in the one file, so a flush
//! can never leave them torn; the point scalar is additionally recomputed
//! from the completed map whenever it is read, never trusted from disk.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::badges;
use crate::config::Config;
use crate::lesson::model::GamificationSpec;

/// Progress for a single lesson
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LessonProgress {
    /// Completion key -> completed. Monotonic: entries are only ever set to
    /// true and never removed.
    pub completed: BTreeMap<String, bool>,
    /// Earned badge keys, append-only
    pub badges: BTreeSet<String>,
    /// Derived point total, written for external inspection only
    pub points: u64,
}

impl LessonProgress {
    /// Count of completed activities
    pub fn completed_count(&self) -> usize {
        self.completed.values().filter(|&&done| done).count()
    }
}

/// All persisted progress, keyed by lesson id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Progress {
    pub lessons: HashMap<String, LessonProgress>,
}

/// Aggregate numbers for the dashboard and footer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub completed_count: usize,
    pub points: u64,
    /// Percent complete in [0, 100]; zero when the total is zero
    pub progress_percentage: f64,
}

/// Handle to the progress of one lesson
#[derive(Debug)]
pub struct ProgressStore {
    data: Progress,
    lesson_id: String,
    /// Backing file; `None` keeps the store purely in memory
    path: Option<PathBuf>,
}

impl ProgressStore {
    /// Open the store for a lesson, loading persisted state from the data
    /// directory. Missing or corrupt state starts fresh.
    pub fn open(lesson_id: impl Into<String>) -> Result<Self> {
        let path = Config::data_dir()?.join("progress.json");
        Ok(Self::load_from(path, lesson_id))
    }

    /// Open the store against an explicit file path
    pub fn load_from(path: PathBuf, lesson_id: impl Into<String>) -> Self {
        let data = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!("progress file is corrupt, starting fresh: {e}");
                    Progress::default()
                }
            },
            Err(_) => Progress::default(),
        };

        Self { data, lesson_id: lesson_id.into(), path: Some(path) }
    }

    /// A store with no backing file, for tests and embedding hosts
    pub fn in_memory(lesson_id: impl Into<String>) -> Self {
        Self { data: Progress::default(), lesson_id: lesson_id.into(), path: None }
    }

    fn lesson(&self) -> Option<&LessonProgress> {
        self.data.lessons.get(&self.lesson_id)
    }

    fn lesson_mut(&mut self) -> &mut LessonProgress {
        self.data.lessons.entry(self.lesson_id.clone()).or_default()
    }

    /// Whether an activity has been completed
    pub fn is_completed(&self, id: &str) -> bool {
        self.lesson().and_then(|l| l.completed.get(id)).copied().unwrap_or(false)
    }

    /// Count of completed activities for this lesson
    pub fn completed_count(&self) -> usize {
        self.lesson().map(LessonProgress::completed_count).unwrap_or(0)
    }

    /// Earned badge keys
    pub fn badges(&self) -> BTreeSet<String> {
        self.lesson().map(|l| l.badges.clone()).unwrap_or_default()
    }

    /// Mark an activity completed. Idempotent: marking a completed activity
    /// again changes nothing and does not flush. Returns the badge keys
    /// newly earned by this completion.
    pub fn mark_completed(&mut self, id: &str, gamification: &GamificationSpec) -> Vec<String> {
        if self.is_completed(id) {
            return Vec::new();
        }

        let points_per = gamification.points_per_section;
        let lesson = self.lesson_mut();
        lesson.completed.insert(id.to_string(), true);

        let count = lesson.completed_count();
        lesson.points = count as u64 * points_per as u64;

        let fresh = badges::newly_earned(count, &gamification.badges, &lesson.badges);
        lesson.badges = badges::evaluate(count, &gamification.badges, &lesson.badges);

        self.flush();
        fresh
    }

    /// Aggregate numbers derived from the completed map. The persisted
    /// point scalar is not consulted.
    pub fn snapshot(&self, total: usize, points_per: u32) -> ProgressSnapshot {
        let completed_count = self.completed_count();
        let progress_percentage = if total > 0 {
            (completed_count as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        ProgressSnapshot {
            completed_count,
            points: completed_count as u64 * points_per as u64,
            progress_percentage,
        }
    }

    /// Write-through flush, best-effort
    fn flush(&self) {
        if let Err(e) = self.save() {
            tracing::warn!("failed to persist progress: {e:#}");
        }
    }

    /// Save all progress to the backing file, if there is one
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {:?}", parent))?;
        }

        let contents = serde_json::to_string_pretty(&self.data)
            .with_context(|| "Failed to serialize progress")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write progress to {:?}", path))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson::model::{Accent, BadgeSpec};

    fn gamification(points_per: u32, badge_threshold: usize) -> GamificationSpec {
        GamificationSpec {
            points_per_section: points_per,
            badges: BTreeMap::from([(
                "starter".to_string(),
                BadgeSpec {
                    label: "Starter".into(),
                    icon: "🌱".into(),
                    accent: Accent::Green,
                    threshold: badge_threshold,
                },
            )]),
        }
    }

    #[test]
    fn completion_is_monotonic_and_idempotent() {
        let mut store = ProgressStore::in_memory("lesson-1");
        let g = gamification(50, 2);

        store.mark_completed("a", &g);
        assert!(store.is_completed("a"));
        assert_eq!(store.snapshot(3, 50).points, 50);

        store.mark_completed("b", &g);
        assert_eq!(store.snapshot(3, 50).points, 100);
        assert!(store.badges().contains("starter"));

        // Marking "a" again is a no-op
        store.mark_completed("a", &g);
        assert!(store.is_completed("a"));
        assert_eq!(store.snapshot(3, 50).points, 100);
        assert_eq!(store.completed_count(), 2);
    }

    #[test]
    fn badge_earned_exactly_once() {
        let mut store = ProgressStore::in_memory("lesson-1");
        let g = gamification(10, 2);

        assert!(store.mark_completed("a", &g).is_empty());
        assert_eq!(store.mark_completed("b", &g), vec!["starter".to_string()]);
        assert!(store.mark_completed("c", &g).is_empty());
    }

    #[test]
    fn snapshot_percentage_clamps_and_handles_zero_total() {
        let mut store = ProgressStore::in_memory("lesson-1");
        let g = gamification(10, 99);
        store.mark_completed("a", &g);
        store.mark_completed("b", &g);

        assert_eq!(store.snapshot(0, 10).progress_percentage, 0.0);
        assert_eq!(store.snapshot(2, 10).progress_percentage, 100.0);
        // An undercounted total must not push the bar past 100
        assert_eq!(store.snapshot(1, 10).progress_percentage, 100.0);
    }

    #[test]
    fn lessons_are_isolated_namespaces() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("progress.json");
        let g = gamification(10, 1);

        let mut store = ProgressStore::load_from(path.clone(), "lesson-1");
        store.mark_completed("a", &g);

        let other = ProgressStore::load_from(path, "lesson-2");
        assert!(!other.is_completed("a"));
        assert_eq!(other.completed_count(), 0);
    }

    #[test]
    fn progress_survives_reload() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("progress.json");
        let g = gamification(10, 2);

        let mut store = ProgressStore::load_from(path.clone(), "lesson-1");
        store.mark_completed("a", &g);
        store.mark_completed("b", &g);

        let reloaded = ProgressStore::load_from(path, "lesson-1");
        assert!(reloaded.is_completed("a"));
        assert!(reloaded.is_completed("b"));
        assert!(reloaded.badges().contains("starter"));
    }

    #[test]
    fn corrupt_file_starts_fresh() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("progress.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = ProgressStore::load_from(path, "lesson-1");
        assert_eq!(store.completed_count(), 0);
    }

    #[test]
    fn persisted_point_scalar_is_not_trusted() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("progress.json");

        // A crash-shaped file: one completion but a wildly wrong point total
        std::fs::write(
            &path,
            r#"{"lessons": {"lesson-1": {
                "completed": {"a": true}, "badges": [], "points": 9999
            }}}"#,
        )
        .unwrap();

        let store = ProgressStore::load_from(path, "lesson-1");
        assert_eq!(store.snapshot(3, 50).points, 50);
    }
}
