//! Application state definitions

use crate::engine::LessonState;
use crate::lesson::model::LessonDocument;

/// State for the scrolling content panel
#[derive(Debug, Clone, Default)]
pub struct ContentState {
    /// Current scroll position (lines from top)
    pub scroll_offset: usize,
    /// Total rendered lines (updated on render)
    pub total_lines: usize,
    /// Visible height in lines (updated on render)
    pub visible_height: usize,
}

impl ContentState {
    /// Get the maximum allowed scroll offset
    pub fn max_scroll(&self) -> usize {
        self.total_lines.saturating_sub(self.visible_height / 2)
    }

    /// Clamp scroll offset to valid range
    pub fn clamp_scroll(&mut self) {
        let max = self.max_scroll();
        if self.scroll_offset > max {
            self.scroll_offset = max;
        }
    }

    /// Scroll so that `line` sits near the top of the view
    pub fn scroll_to_line(&mut self, line: usize) {
        self.scroll_offset = line.saturating_sub(1);
        self.clamp_scroll();
    }
}

/// What pressing Enter on an item does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    /// A completable card or multimedia activity
    Card,
    /// A disclosure card: Enter toggles it open or closed
    Disclosure,
    /// An expandable section header
    SectionHeader,
    /// A navigation grid entry jumping to `target`
    Nav { target: String, tab: Option<String> },
}

/// One selectable item in the rendered content, in display order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleItem {
    pub id: String,
    pub kind: ItemKind,
    /// Line offset of the item's header within the rendered content
    pub line: usize,
}

/// State for the quiz overlay
#[derive(Debug, Clone, Default)]
pub struct QuizOverlayState {
    /// Whether the overlay is shown
    pub open: bool,
    /// Index of the question being shown
    pub current_question: usize,
    /// Option cursor within the current question
    pub option_cursor: usize,
    /// Show the result screen instead of questions
    pub show_result: bool,
}

impl QuizOverlayState {
    pub fn open(&mut self) {
        self.open = true;
        self.current_question = 0;
        self.option_cursor = 0;
        self.show_result = false;
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}

/// Keyboard input mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Keys are commands
    #[default]
    Normal,
    /// Keys edit the selected exercise's scratch text
    Scratch,
}

/// Full application state
#[derive(Debug)]
pub struct AppState {
    /// Id of the open lesson (progress namespace)
    pub lesson_id: String,

    /// The normalized lesson document
    pub doc: LessonDocument,

    /// Engine-side interaction state
    pub lesson: LessonState,

    /// Content panel scroll state
    pub content: ContentState,

    /// Selectable items from the last render, in display order
    pub items: Vec<VisibleItem>,

    /// Index of the selected item
    pub selected: usize,

    /// Item to scroll into view on the next render; also moves selection
    pub scroll_to: Option<String>,

    /// Lock message when the lesson's content is unavailable
    pub locked: Option<String>,

    /// Quiz overlay state
    pub quiz_overlay: QuizOverlayState,

    /// Keyboard input mode
    pub input_mode: InputMode,

    /// Transient status line message
    pub status: Option<String>,
}

impl AppState {
    /// State for an opened lesson
    pub fn new(lesson_id: impl Into<String>, doc: LessonDocument) -> Self {
        let lesson = LessonState::for_document(&doc);
        Self {
            lesson_id: lesson_id.into(),
            doc,
            lesson,
            content: ContentState::default(),
            items: Vec::new(),
            selected: 0,
            scroll_to: None,
            locked: None,
            quiz_overlay: QuizOverlayState::default(),
            input_mode: InputMode::default(),
            status: None,
        }
    }

    /// The currently selected item, if any
    pub fn selected_item(&self) -> Option<&VisibleItem> {
        self.items.get(self.selected)
    }

    /// Move selection down and scroll it into view
    pub fn select_next(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1).min(self.items.len() - 1);
            self.scroll_selection_into_view();
        }
    }

    /// Move selection up and scroll it into view
    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.scroll_selection_into_view();
    }

    fn scroll_selection_into_view(&mut self) {
        if let Some(item) = self.items.get(self.selected) {
            let line = item.line;
            let visible = self.content.visible_height;
            if line < self.content.scroll_offset
                || (visible > 0 && line >= self.content.scroll_offset + visible)
            {
                self.content.scroll_to_line(line);
            }
        }
    }

    /// Select the item with the given id, if present
    pub fn select_id(&mut self, id: &str) {
        if let Some(pos) = self.items.iter().position(|item| item.id == id) {
            self.selected = pos;
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }
}
