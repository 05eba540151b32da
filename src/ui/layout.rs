//! Layout utilities and common components

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    widgets::Paragraph,
};

use crate::theme::Theme;

/// Draw a full-screen placeholder message (locked lessons, empty states)
pub fn draw_placeholder(frame: &mut Frame, message: &str, theme: &Theme) {
    let area = frame.area();

    let style = Style::default().fg(theme.fg_muted).bg(theme.bg_primary);

    let placeholder = Paragraph::new(message).style(style).alignment(Alignment::Center);

    frame.render_widget(placeholder, area);
}

/// Create a centered rectangle with the given percentage of width and height
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}
