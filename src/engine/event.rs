//! Event handling
//!
//! All mutations flow through [`handle_event`]: the shell translates key
//! presses into [`LessonEvent`]s, the engine updates the interaction state
//! and the progress store, and reports what happened as [`Effect`]s (focus
//! commands, persistence, badge awards) for the shell to act on.

use crate::engine::sequencer::{self, NextStep};
use crate::engine::state::{LessonState, QuizResult};
use crate::lesson::model::{LessonDocument, SectionBody};
use crate::progress::ProgressStore;

/// A user-triggered interaction with the lesson
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LessonEvent {
    /// Complete an activity. No-op when already completed.
    ToggleComplete { id: String },
    /// Activate a tab. Completion state is untouched.
    SelectTab { tab: String },
    /// Open or close an exercise-style disclosure card
    ToggleExercise { id: String },
    /// Open or close an expandable section
    ToggleSection { id: String },
    /// Select a quiz answer
    SelectAnswer { question: u32, option: String },
    /// Score the quiz against the current answers
    SubmitQuiz,
    /// Advance to the activity after `id` in flatten order
    GoToNext { id: String },
    /// Navigation-grid jump to a target, optionally via a tab switch
    Jump { target: String, tab: Option<String> },
    /// Replace the scratch text of an exercise (ephemeral)
    EditScratch { id: String, text: String },
    /// The shell finished the render that follows a tab switch; promote any
    /// parked focus target
    RenderSettled,
}

/// What a handled event asks the shell to do or tells it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Progress was written through to storage
    Persisted,
    /// A badge was newly earned
    BadgeEarned(String),
    /// Bring this target into view with transient emphasis
    Focused(String),
    /// A focus target was parked until the next render settles
    FocusDeferred(String),
    /// The quiz was scored
    QuizScored(QuizResult),
}

/// Apply one event to the state and store
pub fn handle_event(
    doc: &LessonDocument,
    state: &mut LessonState,
    store: &mut ProgressStore,
    event: LessonEvent,
) -> Vec<Effect> {
    match event {
        LessonEvent::ToggleComplete { id } => {
            if store.is_completed(&id) {
                return Vec::new();
            }
            let gamification =
                doc.metadata.as_ref().map(|m| m.gamification.clone()).unwrap_or_default();
            let fresh = store.mark_completed(&id, &gamification);

            let mut effects = vec![Effect::Persisted];
            effects.extend(fresh.into_iter().map(Effect::BadgeEarned));
            effects
        }

        LessonEvent::SelectTab { tab } => {
            state.activate_tab(tab);
            Vec::new()
        }

        LessonEvent::ToggleExercise { id } => {
            state.disclosure.toggle_card(&id);
            Vec::new()
        }

        LessonEvent::ToggleSection { id } => {
            state.disclosure.toggle_section(&id);
            Vec::new()
        }

        LessonEvent::SelectAnswer { question, option } => {
            state.quiz.select(question, option);
            Vec::new()
        }

        LessonEvent::SubmitQuiz => {
            let questions = doc.sections.iter().find_map(|s| match &s.body {
                SectionBody::Quiz { questions } => Some(questions.as_slice()),
                _ => None,
            });
            match questions {
                Some(questions) => vec![Effect::QuizScored(state.quiz.submit(questions))],
                None => Vec::new(),
            }
        }

        LessonEvent::GoToNext { id } => {
            let order = sequencer::flatten(doc);
            match sequencer::next_step(doc, &order, &id, state.active_tab.as_deref()) {
                NextStep::Focus { id } => {
                    state.focus.request(id.clone());
                    vec![Effect::Focused(id)]
                }
                NextStep::SwitchTab { tab, id } => {
                    // Switch synchronously; the focus waits for the new
                    // tab's content to mount
                    state.activate_tab(tab);
                    state.focus.defer(id.clone());
                    vec![Effect::FocusDeferred(id)]
                }
                NextStep::End => {
                    // A genuinely-last activity hands off to the quiz; an
                    // id the order never knew stays a silent no-op
                    let known = order.iter().any(|item| item.id == id);
                    match doc.quiz_section_id() {
                        Some(quiz_id) if known => {
                            let quiz_id = quiz_id.to_string();
                            state.focus.request(quiz_id.clone());
                            vec![Effect::Focused(quiz_id)]
                        }
                        _ => Vec::new(),
                    }
                }
            }
        }

        LessonEvent::Jump { target, tab } => match tab {
            Some(tab) if state.active_tab.as_deref() != Some(tab.as_str()) => {
                state.activate_tab(tab);
                state.focus.defer(target.clone());
                vec![Effect::FocusDeferred(target)]
            }
            _ => {
                state.focus.request(target.clone());
                vec![Effect::Focused(target)]
            }
        },

        LessonEvent::EditScratch { id, text } => {
            state.scratch.insert(id, text);
            Vec::new()
        }

        LessonEvent::RenderSettled => {
            state.focus.settle();
            match state.focus.target() {
                Some(id) => vec![Effect::Focused(id.to_string())],
                None => Vec::new(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson::schema;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_doc() -> LessonDocument {
        schema::normalize(&json!({
            "metadata": {
                "title": "Lesson One",
                "totalSections": 3,
                "gamification": {
                    "pointsPerSection": 50,
                    "badges": {
                        "starter": {"label": "Starter", "icon": "🌱",
                                    "color": "green", "threshold": 2}
                    }
                }
            },
            "sections": [
                {"id": "content", "type": "tabs", "tabs": [
                    {"id": "tab-a", "label": "A", "content": [
                        {"id": "a", "type": "card", "text": "first"},
                        {"id": "a2", "type": "card", "text": "second"},
                    ]},
                    {"id": "tab-b", "label": "B", "content": [
                        {"id": "b", "type": "card", "text": "third"},
                    ]},
                ]},
                {"id": "quiz", "type": "quiz", "questions": [
                    {"id": 1, "question": "Q1?", "options": ["X", "W"], "correctAnswer": "X"},
                    {"id": 2, "question": "Q2?", "options": ["Y", "W"], "correctAnswer": "Y"},
                    {"id": 3, "question": "Q3?", "options": ["Z", "W"], "correctAnswer": "Z"},
                ]},
            ]
        }))
        .unwrap()
    }

    fn setup() -> (LessonDocument, LessonState, ProgressStore) {
        let doc = sample_doc();
        let state = LessonState::for_document(&doc);
        let store = ProgressStore::in_memory("lesson-1");
        (doc, state, store)
    }

    #[test]
    fn completion_awards_points_and_badges_idempotently() {
        let (doc, mut state, mut store) = setup();

        let effects =
            handle_event(&doc, &mut state, &mut store, LessonEvent::ToggleComplete { id: "a".into() });
        assert_eq!(effects, vec![Effect::Persisted]);
        assert_eq!(store.snapshot(3, 50).points, 50);
        assert!(store.badges().is_empty());

        let effects = handle_event(
            &doc,
            &mut state,
            &mut store,
            LessonEvent::ToggleComplete { id: "a2".into() },
        );
        assert_eq!(effects, vec![Effect::Persisted, Effect::BadgeEarned("starter".into())]);
        assert_eq!(store.snapshot(3, 50).points, 100);

        // Completing "a" again changes nothing
        let effects =
            handle_event(&doc, &mut state, &mut store, LessonEvent::ToggleComplete { id: "a".into() });
        assert_eq!(effects, Vec::new());
        assert_eq!(store.snapshot(3, 50).points, 100);
    }

    #[test]
    fn go_to_next_within_tab_focuses_immediately() {
        let (doc, mut state, mut store) = setup();

        let effects =
            handle_event(&doc, &mut state, &mut store, LessonEvent::GoToNext { id: "a".into() });
        assert_eq!(effects, vec![Effect::Focused("a2".into())]);
        assert_eq!(state.active_tab.as_deref(), Some("tab-a"));
        assert_eq!(state.focus.target(), Some("a2"));
    }

    #[test]
    fn go_to_next_across_tabs_switches_then_defers_focus() {
        let (doc, mut state, mut store) = setup();

        let effects =
            handle_event(&doc, &mut state, &mut store, LessonEvent::GoToNext { id: "a2".into() });
        assert_eq!(effects, vec![Effect::FocusDeferred("b".into())]);

        // The tab switch is observable synchronously, the focus is not
        assert_eq!(state.active_tab.as_deref(), Some("tab-b"));
        assert_eq!(state.focus.target(), None);

        let effects = handle_event(&doc, &mut state, &mut store, LessonEvent::RenderSettled);
        assert_eq!(effects, vec![Effect::Focused("b".into())]);
        assert_eq!(state.focus.target(), Some("b"));
    }

    #[test]
    fn go_to_next_on_terminal_id_leaves_tab_alone() {
        let (doc, mut state, mut store) = setup();
        state.activate_tab("tab-b");

        let effects =
            handle_event(&doc, &mut state, &mut store, LessonEvent::GoToNext { id: "b".into() });
        // Past the end of the activities: the quiz becomes the target
        assert_eq!(effects, vec![Effect::Focused("quiz".into())]);
        assert_eq!(state.active_tab.as_deref(), Some("tab-b"));
    }

    #[test]
    fn go_to_next_on_missing_id_is_silent() {
        let (doc, mut state, mut store) = setup();
        let before = state.active_tab.clone();

        let effects = handle_event(
            &doc,
            &mut state,
            &mut store,
            LessonEvent::GoToNext { id: "never-existed".into() },
        );
        assert_eq!(effects, Vec::new());
        assert_eq!(state.active_tab, before);
        assert_eq!(state.focus.target(), None);
    }

    #[test]
    fn quiz_submits_and_resubmits_in_one_session() {
        let (doc, mut state, mut store) = setup();

        for (q, a) in [(1, "X"), (2, "W"), (3, "Z")] {
            handle_event(
                &doc,
                &mut state,
                &mut store,
                LessonEvent::SelectAnswer { question: q, option: a.into() },
            );
        }
        let effects = handle_event(&doc, &mut state, &mut store, LessonEvent::SubmitQuiz);
        let [Effect::QuizScored(result)] = effects.as_slice() else { panic!() };
        assert_eq!((result.correct, result.total), (2, 3));

        handle_event(
            &doc,
            &mut state,
            &mut store,
            LessonEvent::SelectAnswer { question: 2, option: "Y".into() },
        );
        let effects = handle_event(&doc, &mut state, &mut store, LessonEvent::SubmitQuiz);
        let [Effect::QuizScored(result)] = effects.as_slice() else { panic!() };
        assert_eq!((result.correct, result.total), (3, 3));
    }

    #[test]
    fn jump_to_other_tab_defers_like_go_to_next() {
        let (doc, mut state, mut store) = setup();

        let effects = handle_event(
            &doc,
            &mut state,
            &mut store,
            LessonEvent::Jump { target: "b".into(), tab: Some("tab-b".into()) },
        );
        assert_eq!(effects, vec![Effect::FocusDeferred("b".into())]);
        assert_eq!(state.active_tab.as_deref(), Some("tab-b"));

        // Jumping within the active tab focuses directly
        let effects = handle_event(
            &doc,
            &mut state,
            &mut store,
            LessonEvent::Jump { target: "b".into(), tab: Some("tab-b".into()) },
        );
        assert_eq!(effects, vec![Effect::Focused("b".into())]);
    }

    #[test]
    fn tab_switch_never_touches_completion() {
        let (doc, mut state, mut store) = setup();
        handle_event(&doc, &mut state, &mut store, LessonEvent::ToggleComplete { id: "a".into() });

        handle_event(&doc, &mut state, &mut store, LessonEvent::SelectTab { tab: "tab-b".into() });
        handle_event(&doc, &mut state, &mut store, LessonEvent::SelectTab { tab: "tab-a".into() });

        assert!(store.is_completed("a"));
        assert_eq!(store.completed_count(), 1);
    }

    #[test]
    fn scratch_text_stays_in_session_state() {
        let (doc, mut state, mut store) = setup();
        handle_event(
            &doc,
            &mut state,
            &mut store,
            LessonEvent::EditScratch { id: "ex1".into(), text: "my notes".into() },
        );
        assert_eq!(state.scratch.get("ex1").map(String::as_str), Some("my notes"));
    }
}
