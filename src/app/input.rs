//! Event handling utilities

use crossterm::event::{KeyCode, KeyModifiers};

/// Vim-style key mapping (basic, without modifiers)
pub fn vim_key_to_action(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Char('j') | KeyCode::Down => Some(Action::Down),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::Up),
        KeyCode::Char('h') | KeyCode::Left => Some(Action::PrevTab),
        KeyCode::Char('l') | KeyCode::Right => Some(Action::NextTab),
        KeyCode::Char('g') | KeyCode::Home => Some(Action::Top),
        KeyCode::Char('G') | KeyCode::End => Some(Action::Bottom),
        KeyCode::Char('d') | KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::Char('u') | KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::Enter => Some(Action::Select),
        KeyCode::Esc => Some(Action::Back),
        KeyCode::Char('m') => Some(Action::MarkComplete),
        KeyCode::Char('n') => Some(Action::GoToNext),
        KeyCode::Char('i') => Some(Action::EditScratch),
        KeyCode::Char('z') => Some(Action::OpenQuiz),
        KeyCode::Char('[') => Some(Action::PrevLesson),
        KeyCode::Char(']') => Some(Action::NextLesson),
        KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}

/// Key mapping with modifiers (for Ctrl combinations)
pub fn key_with_modifier_to_action(key: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        match key {
            KeyCode::Char('d') => Some(Action::PageDown),
            KeyCode::Char('u') => Some(Action::PageUp),
            _ => None,
        }
    } else {
        vim_key_to_action(key)
    }
}

/// Actions that can be taken in the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Navigation
    Up,
    Down,
    Top,
    Bottom,
    PageUp,
    PageDown,

    // Tabs
    PrevTab,
    NextTab,

    // Lessons
    PrevLesson,
    NextLesson,

    // Selection
    Select,
    Back,

    // Progress
    MarkComplete,
    GoToNext,

    // Modes
    EditScratch,
    OpenQuiz,
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vim_j_maps_to_down() {
        assert_eq!(vim_key_to_action(KeyCode::Char('j')), Some(Action::Down));
    }

    #[test]
    fn vim_k_maps_to_up() {
        assert_eq!(vim_key_to_action(KeyCode::Char('k')), Some(Action::Up));
    }

    #[test]
    fn h_and_l_switch_tabs() {
        assert_eq!(vim_key_to_action(KeyCode::Char('h')), Some(Action::PrevTab));
        assert_eq!(vim_key_to_action(KeyCode::Char('l')), Some(Action::NextTab));
    }

    #[test]
    fn m_marks_complete() {
        assert_eq!(vim_key_to_action(KeyCode::Char('m')), Some(Action::MarkComplete));
    }

    #[test]
    fn brackets_switch_lessons() {
        assert_eq!(vim_key_to_action(KeyCode::Char('[')), Some(Action::PrevLesson));
        assert_eq!(vim_key_to_action(KeyCode::Char(']')), Some(Action::NextLesson));
    }

    #[test]
    fn unknown_key_returns_none() {
        assert_eq!(vim_key_to_action(KeyCode::Char('x')), None);
    }

    #[test]
    fn ctrl_d_pages_down() {
        assert_eq!(
            key_with_modifier_to_action(KeyCode::Char('d'), KeyModifiers::CONTROL),
            Some(Action::PageDown)
        );
    }
}
