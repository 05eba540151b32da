//! UI rendering components

pub mod content;
pub mod dashboard;
pub mod layout;
pub mod markup;
pub mod quiz;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::state::{AppState, InputMode};
use crate::config::Config;
use crate::engine;
use crate::progress::ProgressStore;

/// Main draw function
pub fn draw(frame: &mut Frame, state: &mut AppState, store: &ProgressStore, config: &Config) {
    let theme = config.active_theme();

    if let Some(message) = state.locked.clone() {
        layout::draw_placeholder(frame, &message, &theme);
        return;
    }

    let tree = engine::render(&state.doc, store, &state.lesson);

    let mut constraints = Vec::new();
    if tree.dashboard.is_some() {
        constraints.push(Constraint::Length(dashboard::DASHBOARD_HEIGHT));
    }
    constraints.push(Constraint::Min(3));
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    let mut next = 0;
    if let Some(dash) = &tree.dashboard {
        dashboard::draw(frame, chunks[next], dash, &theme);
        next += 1;
    }

    content::draw(frame, chunks[next], state, &tree, &theme);

    draw_hint_line(frame, chunks[next + 1], state, &theme);

    let full = frame.area();
    quiz::draw(frame, full, &state.quiz_overlay, &tree, &theme);
}

/// Status or key hints at the bottom
fn draw_hint_line(frame: &mut Frame, area: ratatui::layout::Rect, state: &AppState, theme: &crate::theme::Theme) {
    let line = match (&state.status, state.input_mode) {
        (_, InputMode::Scratch) => Line::from(vec![
            Span::styled("-- NOTES --", Style::default().fg(theme.warning)),
            Span::styled("  type to edit, Esc to finish", Style::default().fg(theme.fg_muted)),
        ]),
        (Some(status), _) => {
            Line::from(Span::styled(status.clone(), Style::default().fg(theme.success)))
        }
        (None, _) => Line::from(Span::styled(
            "[j/k] move  [h/l] tab  [Enter] open/jump  [m] complete  [n] next  [z] quiz  [i] notes  [q] quit",
            Style::default().fg(theme.fg_muted),
        )),
    };

    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(theme.bg_secondary)),
        area,
    );
}
