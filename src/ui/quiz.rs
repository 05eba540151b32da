//! Quiz panel overlay component

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::layout::centered_rect;
use crate::app::state::QuizOverlayState;
use crate::engine::view::{QuestionView, SectionView, ViewTree};
use crate::theme::Theme;

/// Questions and the result line from the rendered tree, if the document
/// has a quiz section
pub fn quiz_view(tree: &ViewTree) -> Option<(&[QuestionView], Option<&str>)> {
    tree.sections.iter().find_map(|s| match s {
        SectionView::Quiz { questions, result, .. } => {
            Some((questions.as_slice(), result.as_deref()))
        }
        _ => None,
    })
}

/// Draw the quiz panel as a centered overlay
pub fn draw(
    frame: &mut Frame,
    area: Rect,
    overlay: &QuizOverlayState,
    tree: &ViewTree,
    theme: &Theme,
) {
    if !overlay.open {
        return;
    }
    let Some((questions, result)) = quiz_view(tree) else {
        return;
    };

    let overlay_area = centered_rect(70, 70, area);
    frame.render_widget(Clear, overlay_area);

    let title = if overlay.show_result { " Quiz Results " } else { " Quiz " };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg_secondary));

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if overlay.show_result {
        draw_result(frame, inner, result, theme);
    } else {
        draw_question(frame, inner, overlay, questions, theme);
    }
}

/// Draw the result screen
fn draw_result(frame: &mut Frame, area: Rect, result: Option<&str>, theme: &Theme) {
    let message = result.unwrap_or("Submit the quiz to see your score.");
    let text = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] Review answers    [Esc] Close",
            Style::default().fg(theme.fg_muted),
        )),
    ];

    let para = Paragraph::new(text)
        .alignment(ratatui::layout::Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(para, area);
}

/// Draw the current question
fn draw_question(
    frame: &mut Frame,
    area: Rect,
    overlay: &QuizOverlayState,
    questions: &[QuestionView],
    theme: &Theme,
) {
    let current = overlay.current_question;
    let total = questions.len();

    let Some(question) = questions.get(current) else {
        return;
    };

    let mut lines = vec![];

    lines.push(Line::from(Span::styled(
        format!("Question {} of {}", current + 1, total),
        Style::default().fg(theme.fg_muted),
    )));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(
        question.question.clone(),
        Style::default().fg(theme.fg_primary).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(""));

    for (i, option) in question.options.iter().enumerate() {
        let under_cursor = i == overlay.option_cursor;
        let prefix = if option.selected { "\u{25CF}" } else { "\u{25CB}" }; // ● or ○
        let letter = (b'A' + i as u8) as char;

        let style = if under_cursor {
            Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD)
        } else if option.selected {
            Style::default().fg(theme.accent_secondary)
        } else {
            Style::default().fg(theme.fg_secondary)
        };

        lines.push(Line::from(Span::styled(
            format!("  {} {}) {}", prefix, letter, option.text),
            style,
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[j/k] Move    [Enter] Select    [h/l] Question    [s] Submit    [Esc] Close",
        Style::default().fg(theme.fg_muted),
    )));

    let para = Paragraph::new(lines).wrap(Wrap { trim: true });
    frame.render_widget(para, area);
}
