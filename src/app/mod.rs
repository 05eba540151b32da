//! Application shell and event loop

pub mod input;
pub mod state;

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::config::Config;
use crate::engine::{self, Effect, LessonEvent};
use crate::lesson::catalog::{self, LessonLibrary};
use crate::progress::ProgressStore;
use crate::ui;
use input::Action;
use state::{AppState, InputMode, ItemKind};

/// The main application
pub struct App {
    /// Application configuration
    config: Config,

    /// Lesson library for cross-lesson navigation
    library: LessonLibrary,

    /// Progress store for the open lesson
    store: ProgressStore,

    /// Current application state
    state: AppState,

    /// Terminal backend
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl App {
    /// Create a new application instance
    pub fn new(
        config: Config,
        library: LessonLibrary,
        store: ProgressStore,
        state: AppState,
    ) -> Result<Self> {
        let terminal = Self::setup_terminal()?;

        Ok(Self { config, library, store, state, terminal })
    }

    /// Set up the terminal for TUI rendering
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    /// Restore the terminal to its original state
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    /// Run the application main loop
    pub fn run(&mut self) -> Result<()> {
        // Set up panic hook to restore terminal
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            original_hook(panic_info);
        }));

        loop {
            // Draw UI
            self.terminal.draw(|frame| {
                ui::draw(frame, &mut self.state, &self.store, &self.config);
            })?;

            // The draw above mounted any freshly-activated tab; a parked
            // focus target can be promoted now
            if self.state.lesson.focus.has_pending() {
                self.dispatch(LessonEvent::RenderSettled);
            }

            // Handle events
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        match self.handle_key(key) {
                            Ok(true) => break, // Exit requested
                            Ok(false) => {}    // Continue
                            Err(e) => {
                                tracing::error!("Error handling key: {}", e);
                            }
                        }
                    }
                }
            }

            // Decay the focus emphasis
            self.state.lesson.focus.tick();
        }

        self.restore_terminal()?;
        Ok(())
    }

    /// Run one engine event and act on its effects
    fn dispatch(&mut self, event: LessonEvent) {
        let effects =
            engine::handle_event(&self.state.doc, &mut self.state.lesson, &mut self.store, event);
        self.apply_effects(effects);
    }

    fn apply_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Focused(id) => {
                    self.state.scroll_to = Some(id);
                }
                // Promoted by the loop after the next draw settles
                Effect::FocusDeferred(_) => {}
                Effect::Persisted => {}
                Effect::BadgeEarned(key) => {
                    let label = self
                        .state
                        .doc
                        .badge_specs()
                        .get(&key)
                        .map(|spec| format!("{} {}", spec.icon, spec.label))
                        .unwrap_or(key);
                    self.state.set_status(format!("Badge earned: {label}"));
                }
                Effect::QuizScored(_) => {
                    self.state.quiz_overlay.show_result = true;
                }
            }
        }
    }

    /// Handle a key press, returns true if should exit
    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if self.state.locked.is_some() {
            // Allow moving to a neighboring lesson from the lock screen
            match key.code {
                KeyCode::Char('[') => {
                    self.switch_lesson(-1);
                    return Ok(false);
                }
                KeyCode::Char(']') => {
                    self.switch_lesson(1);
                    return Ok(false);
                }
                _ => return Ok(matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)),
            }
        }

        if self.state.input_mode == InputMode::Scratch {
            self.handle_scratch_key(key.code);
            return Ok(false);
        }

        if self.state.quiz_overlay.open {
            self.handle_quiz_key(key.code);
            return Ok(false);
        }

        self.state.status = None;

        let Some(action) = input::key_with_modifier_to_action(key.code, key.modifiers) else {
            return Ok(false);
        };

        match action {
            Action::Down => self.state.select_next(),
            Action::Up => self.state.select_prev(),
            Action::PageDown => {
                let half = self.state.content.visible_height / 2;
                self.state.content.scroll_offset += half.max(1);
                self.state.content.clamp_scroll();
            }
            Action::PageUp => {
                let half = self.state.content.visible_height / 2;
                self.state.content.scroll_offset =
                    self.state.content.scroll_offset.saturating_sub(half.max(1));
            }
            Action::Top => {
                self.state.selected = 0;
                self.state.content.scroll_offset = 0;
            }
            Action::Bottom => {
                self.state.selected = self.state.items.len().saturating_sub(1);
                self.state.content.scroll_offset = self.state.content.max_scroll();
            }
            Action::PrevTab => self.switch_tab(-1),
            Action::NextTab => self.switch_tab(1),
            Action::PrevLesson => self.switch_lesson(-1),
            Action::NextLesson => self.switch_lesson(1),
            Action::Select => self.activate_selected(),
            Action::MarkComplete => {
                if let Some(id) = self.completable_selected() {
                    self.dispatch(LessonEvent::ToggleComplete { id });
                }
            }
            Action::GoToNext => {
                if let Some(id) = self.completable_selected() {
                    self.dispatch(LessonEvent::GoToNext { id });
                }
            }
            Action::EditScratch => self.start_scratch_edit(),
            Action::OpenQuiz => {
                if self.state.doc.quiz_section_id().is_some() {
                    self.state.quiz_overlay.open();
                }
            }
            Action::Back => {}
            Action::Quit => return Ok(true),
        }

        Ok(false)
    }

    /// Enter on the selected item: jump, toggle, or complete
    fn activate_selected(&mut self) {
        let Some(item) = self.state.selected_item().cloned() else {
            return;
        };
        match item.kind {
            ItemKind::Nav { target, tab } => self.dispatch(LessonEvent::Jump { target, tab }),
            ItemKind::SectionHeader => {
                // Quiz section headers open the overlay, expandables toggle
                if self.state.doc.quiz_section_id() == Some(item.id.as_str()) {
                    self.state.quiz_overlay.open();
                } else {
                    self.dispatch(LessonEvent::ToggleSection { id: item.id });
                }
            }
            ItemKind::Disclosure => self.dispatch(LessonEvent::ToggleExercise { id: item.id }),
            ItemKind::Card => self.dispatch(LessonEvent::ToggleComplete { id: item.id }),
        }
    }

    /// Selected item id when it is a completable activity
    fn completable_selected(&self) -> Option<String> {
        let item = self.state.selected_item()?;
        matches!(item.kind, ItemKind::Card | ItemKind::Disclosure).then(|| item.id.clone())
    }

    /// Start editing the selected exercise's scratch text
    fn start_scratch_edit(&mut self) {
        let Some(item) = self.state.selected_item().cloned() else {
            return;
        };
        if item.kind != ItemKind::Disclosure {
            return;
        }
        if !self.state.lesson.disclosure.is_card_expanded(&item.id) {
            self.dispatch(LessonEvent::ToggleExercise { id: item.id.clone() });
        }
        self.state.input_mode = InputMode::Scratch;
    }

    fn handle_scratch_key(&mut self, key: KeyCode) {
        let Some(id) = self.state.selected_item().map(|item| item.id.clone()) else {
            self.state.input_mode = InputMode::Normal;
            return;
        };
        let mut text = self.state.lesson.scratch.get(&id).cloned().unwrap_or_default();

        match key {
            KeyCode::Esc | KeyCode::Enter => {
                self.state.input_mode = InputMode::Normal;
                return;
            }
            KeyCode::Char(c) => text.push(c),
            KeyCode::Backspace => {
                text.pop();
            }
            _ => return,
        }

        self.dispatch(LessonEvent::EditScratch { id, text });
    }

    fn handle_quiz_key(&mut self, key: KeyCode) {
        let questions = self.quiz_questions();
        if questions.is_empty() {
            self.state.quiz_overlay.close();
            return;
        }
        let current = self.state.quiz_overlay.current_question.min(questions.len() - 1);
        self.state.quiz_overlay.current_question = current;
        let option_count = questions[current].1.len();

        if self.state.quiz_overlay.show_result {
            match key {
                KeyCode::Enter => self.state.quiz_overlay.show_result = false,
                KeyCode::Esc | KeyCode::Char('q') => self.state.quiz_overlay.close(),
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Esc => self.state.quiz_overlay.close(),
            KeyCode::Char('j') | KeyCode::Down => {
                if option_count > 0 {
                    self.state.quiz_overlay.option_cursor =
                        (self.state.quiz_overlay.option_cursor + 1) % option_count;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if option_count > 0 {
                    self.state.quiz_overlay.option_cursor = self
                        .state
                        .quiz_overlay
                        .option_cursor
                        .checked_sub(1)
                        .unwrap_or(option_count - 1);
                }
            }
            KeyCode::Char('h') | KeyCode::Left => {
                self.state.quiz_overlay.current_question = current.saturating_sub(1);
                self.state.quiz_overlay.option_cursor = 0;
            }
            KeyCode::Char('l') | KeyCode::Right => {
                if current + 1 < questions.len() {
                    self.state.quiz_overlay.current_question = current + 1;
                    self.state.quiz_overlay.option_cursor = 0;
                }
            }
            KeyCode::Enter => {
                let (question_id, options) = &questions[current];
                if let Some(option) = options.get(self.state.quiz_overlay.option_cursor) {
                    self.dispatch(LessonEvent::SelectAnswer {
                        question: *question_id,
                        option: option.clone(),
                    });
                    // Move on to the next unanswered question
                    if current + 1 < questions.len() {
                        self.state.quiz_overlay.current_question = current + 1;
                        self.state.quiz_overlay.option_cursor = 0;
                    }
                }
            }
            KeyCode::Char('s') => self.dispatch(LessonEvent::SubmitQuiz),
            _ => {}
        }
    }

    /// Question ids and options of the document's quiz section
    fn quiz_questions(&self) -> Vec<(u32, Vec<String>)> {
        use crate::lesson::model::SectionBody;
        self.state
            .doc
            .sections
            .iter()
            .find_map(|s| match &s.body {
                SectionBody::Quiz { questions } => Some(
                    questions
                        .iter()
                        .map(|q| (q.id, q.options.clone()))
                        .collect(),
                ),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Move to the previous/next lesson of the same course
    fn switch_lesson(&mut self, offset: isize) {
        let current = self.state.lesson_id.clone();
        let target = if offset < 0 {
            self.library.catalog().prev_lesson(&current)
        } else {
            self.library.catalog().next_lesson(&current)
        };
        let Some(summary) = target.cloned() else {
            return;
        };

        if !catalog::is_available(&summary, catalog::unix_now()) {
            self.state.set_status(format!("\"{}\" is still locked", summary.title));
            return;
        }

        match (self.library.load_document(&summary.id), ProgressStore::open(summary.id.as_str())) {
            (Ok(doc), Ok(store)) => {
                self.store = store;
                self.state = AppState::new(summary.id.as_str(), doc);
            }
            (Err(e), _) => {
                self.state.set_status(format!("Could not open \"{}\": {e}", summary.id));
            }
            (_, Err(e)) => {
                tracing::warn!("failed to open progress for {}: {e:#}", summary.id);
            }
        }
    }

    /// Switch to the previous/next tab in the tab group
    fn switch_tab(&mut self, offset: isize) {
        let target = {
            let Some(tabs) = self.state.doc.tabs() else {
                return;
            };
            if tabs.is_empty() {
                return;
            }
            let current = self.state.lesson.active_tab.as_deref();
            let idx = tabs.iter().position(|t| Some(t.id.as_str()) == current).unwrap_or(0);
            let Some(new_idx) = idx.checked_add_signed(offset).filter(|i| *i < tabs.len()) else {
                return;
            };
            if new_idx == idx {
                return;
            }
            tabs[new_idx].id.clone()
        };
        self.dispatch(LessonEvent::SelectTab { tab: target });
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}
