//! Per-document interaction state
//!
//! Everything here is ephemeral session state: the active tab, disclosure
//! toggles, quiz answers, exercise scratch text, and the focus target.
//! Completion itself lives in the progress store, never here.

use std::collections::{BTreeMap, HashSet};

use crate::lesson::model::{LessonDocument, QuizQuestion};

/// In-memory quiz answers and the last submitted result
#[derive(Debug, Clone, Default)]
pub struct QuizState {
    /// Question id -> selected option text
    pub answers: BTreeMap<u32, String>,
    /// Result of the last submit, if any
    pub result: Option<QuizResult>,
}

impl QuizState {
    /// Record an answer selection, replacing any previous choice
    pub fn select(&mut self, question: u32, option: impl Into<String>) {
        self.answers.insert(question, option.into());
    }

    /// Score the current answers. Recomputes from scratch every time, so
    /// resubmitting after changing answers gives a fresh result.
    pub fn submit(&mut self, questions: &[QuizQuestion]) -> QuizResult {
        let correct = questions
            .iter()
            .filter(|q| self.answers.get(&q.id).is_some_and(|a| *a == q.correct_answer))
            .count();

        let result = QuizResult { correct, total: questions.len() };
        self.result = Some(result);
        result
    }
}

/// Outcome of a quiz submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResult {
    pub correct: usize,
    pub total: usize,
}

impl QuizResult {
    /// Human-readable result line
    pub fn message(&self) -> String {
        format!("You got {} of {} questions right!", self.correct, self.total)
    }
}

/// Disclosure state.
///
/// Exercise-style cards are single-open: opening one closes the previous.
/// Expandable sections are multi-open: each toggles independently. Closing
/// either never clears nested completion.
#[derive(Debug, Clone, Default)]
pub struct DisclosureState {
    /// The one open exercise/quiz-style card, if any
    pub expanded_card: Option<String>,
    /// Open expandable sections
    pub expanded_sections: HashSet<String>,
}

impl DisclosureState {
    /// Toggle an exercise-style card open or closed
    pub fn toggle_card(&mut self, id: &str) {
        if self.expanded_card.as_deref() == Some(id) {
            self.expanded_card = None;
        } else {
            self.expanded_card = Some(id.to_string());
        }
    }

    pub fn is_card_expanded(&self, id: &str) -> bool {
        self.expanded_card.as_deref() == Some(id)
    }

    /// Toggle an expandable section open or closed
    pub fn toggle_section(&mut self, id: &str) {
        if !self.expanded_sections.remove(id) {
            self.expanded_sections.insert(id.to_string());
        }
    }

    pub fn is_section_expanded(&self, id: &str) -> bool {
        self.expanded_sections.contains(id)
    }
}

/// Scroll-and-emphasize focus machinery.
///
/// The original deferred cross-tab focus behind a wall-clock timer. Here the
/// target is parked in `pending` instead and promoted on the first render
/// after the tab switch settles; a target that no longer exists is dropped
/// without effect. The emphasis itself decays over draw ticks.
#[derive(Debug, Clone, Default)]
pub struct FocusState {
    /// Target waiting for the next render to settle (after a tab switch)
    pending: Option<String>,
    /// Emphasized target and its remaining emphasis ticks
    active: Option<(String, u8)>,
}

impl FocusState {
    /// Emphasis duration in draw ticks (~1.5s at the 16ms poll cadence)
    pub const EMPHASIS_TICKS: u8 = 90;

    /// Focus a target immediately
    pub fn request(&mut self, id: impl Into<String>) {
        self.active = Some((id.into(), Self::EMPHASIS_TICKS));
    }

    /// Park a target until the next render settles
    pub fn defer(&mut self, id: impl Into<String>) {
        self.pending = Some(id.into());
    }

    /// Promote a parked target after the render that mounted its container
    pub fn settle(&mut self) {
        if let Some(id) = self.pending.take() {
            self.request(id);
        }
    }

    /// Currently emphasized target, if any
    pub fn target(&self) -> Option<&str> {
        self.active.as_ref().map(|(id, _)| id.as_str())
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Decay the emphasis by one draw tick
    pub fn tick(&mut self) {
        if let Some((_, ticks)) = &mut self.active {
            *ticks = ticks.saturating_sub(1);
            if *ticks == 0 {
                self.active = None;
            }
        }
    }
}

/// Full interaction state for one open lesson
#[derive(Debug, Clone, Default)]
pub struct LessonState {
    /// Active tab id; only meaningful while the document has a tab group
    pub active_tab: Option<String>,
    pub disclosure: DisclosureState,
    pub quiz: QuizState,
    pub focus: FocusState,
    /// Exercise scratch text keyed by exercise id, never persisted
    pub scratch: BTreeMap<String, String>,
}

impl LessonState {
    /// Initial state for a document: the first tab in document order starts
    /// active
    pub fn for_document(doc: &LessonDocument) -> Self {
        Self { active_tab: doc.first_tab_id().map(str::to_owned), ..Self::default() }
    }

    /// Switch the active tab. Completion state is untouched.
    pub fn activate_tab(&mut self, id: impl Into<String>) {
        self.active_tab = Some(id.into());
    }
}
