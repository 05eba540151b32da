//! Lesson content renderer
//!
//! Renders the engine's view tree into a scrolling line buffer, recording an
//! anchor for every selectable item so focus and selection can scroll to it.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::markup;
use crate::app::state::{AppState, ItemKind, VisibleItem};
use crate::engine::view::{CardLine, CardStyle, CardView, SectionView, ViewTree};
use crate::theme::Theme;

/// Status indicators for activities
const STATUS_NOT_STARTED: &str = "○";
const STATUS_COMPLETED: &str = "✓";

/// Width of the footer progress bar in characters
const FOOTER_BAR_WIDTH: usize = 30;

/// Draw the content panel
pub fn draw(frame: &mut Frame, area: Rect, state: &mut AppState, tree: &ViewTree, theme: &Theme) {
    let block = Block::default()
        .title(" Lesson ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.bg_primary));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Reserve 1 column for scrollbar
    let content_width = inner.width.saturating_sub(3) as usize;
    let content_area =
        Rect { x: inner.x, y: inner.y, width: inner.width.saturating_sub(1), height: inner.height };
    let scrollbar_x = inner.x + inner.width.saturating_sub(1);

    let selected_id = state.selected_item().map(|item| item.id.clone());
    let focused_id = state.lesson.focus.target().map(str::to_owned);

    let mut builder = Builder {
        theme,
        width: content_width,
        selected_id,
        focused_id,
        lines: Vec::new(),
        items: Vec::new(),
    };
    for section in &tree.sections {
        builder.section(section);
    }

    state.items = builder.items;
    state.content.total_lines = builder.lines.len();
    state.content.visible_height = inner.height as usize;

    // Keep the selection on the same item across re-renders
    if let Some(item) = state.items.get(state.selected) {
        let id = item.id.clone();
        state.select_id(&id);
    } else if !state.items.is_empty() {
        state.selected = state.items.len() - 1;
    }

    // A parked focus target whose element vanished is dropped silently
    if let Some(target) = state.scroll_to.take() {
        if let Some(item) = state.items.iter().find(|i| i.id == target) {
            let line = item.line;
            state.content.scroll_to_line(line);
            state.select_id(&target);
        }
    }

    state.content.clamp_scroll();
    let scroll_offset = state.content.scroll_offset;
    let total_lines = builder.lines.len();
    let visible_height = inner.height as usize;
    let end = (scroll_offset + visible_height).min(total_lines);
    let visible_lines: Vec<Line> =
        builder.lines.into_iter().skip(scroll_offset).take(end.saturating_sub(scroll_offset)).collect();

    let content = Paragraph::new(visible_lines);
    frame.render_widget(content, content_area);

    draw_scrollbar(frame, scrollbar_x, inner.y, inner.height, scroll_offset, total_lines, theme);
}

/// Line and anchor accumulator for one render pass
struct Builder<'a> {
    theme: &'a Theme,
    width: usize,
    selected_id: Option<String>,
    focused_id: Option<String>,
    lines: Vec<Line<'static>>,
    items: Vec<VisibleItem>,
}

impl Builder<'_> {
    fn anchor(&mut self, id: &str, kind: ItemKind) {
        self.items.push(VisibleItem { id: id.to_string(), kind, line: self.lines.len() });
    }

    fn is_selected(&self, id: &str) -> bool {
        self.selected_id.as_deref() == Some(id)
    }

    fn is_focused(&self, id: &str) -> bool {
        self.focused_id.as_deref() == Some(id)
    }

    fn blank(&mut self) {
        self.lines.push(Line::from(""));
    }

    fn heading(&mut self, title: &str, subtitle: Option<&str>) {
        self.lines.push(Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(self.theme.accent_primary).add_modifier(Modifier::BOLD),
        )));
        if let Some(subtitle) = subtitle {
            self.lines.push(Line::from(Span::styled(
                subtitle.to_string(),
                Style::default().fg(self.theme.fg_muted),
            )));
        }
    }

    fn section(&mut self, section: &SectionView) {
        match section {
            SectionView::Intro { title, subtitle, paragraphs, .. } => {
                if let Some(title) = title {
                    self.heading(title, subtitle.as_deref());
                    self.blank();
                }
                for paragraph in paragraphs {
                    self.lines.extend(markup::wrap_markup(
                        paragraph,
                        self.width,
                        Style::default().fg(self.theme.fg_primary),
                    ));
                    self.blank();
                }
            }

            SectionView::Navigation { title, items, .. } => {
                if let Some(title) = title {
                    self.heading(title, None);
                }
                for item in items {
                    let selected = self.is_selected(&item.target);
                    self.anchor(
                        &item.target,
                        ItemKind::Nav { target: item.target.clone(), tab: item.tab.clone() },
                    );
                    let style = if selected {
                        Style::default()
                            .fg(self.theme.bg_primary)
                            .bg(self.theme.accent_primary)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(self.theme.fg_secondary)
                    };
                    self.lines.push(Line::from(Span::styled(
                        format!("  ▸ {}", item.label),
                        style,
                    )));
                }
                self.blank();
            }

            SectionView::Multimedia { cards, .. } => {
                for card in cards {
                    self.card(card);
                }
            }

            SectionView::Tabs { strip, cards, .. } => {
                let mut spans: Vec<Span> = vec![Span::raw(" ")];
                for tab in strip {
                    let style = if tab.active {
                        Style::default()
                            .fg(self.theme.bg_primary)
                            .bg(self.theme.accent_primary)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(self.theme.fg_secondary).bg(self.theme.bg_tertiary)
                    };
                    spans.push(Span::styled(format!(" {} ", tab.label), style));
                    spans.push(Span::raw(" "));
                }
                self.lines.push(Line::from(spans));
                self.blank();
                for card in cards {
                    self.card(card);
                }
            }

            SectionView::Expandable { id, title, expanded, cards } => {
                let glyph = if *expanded { "▼" } else { "▶" };
                let selected = self.is_selected(id);
                self.anchor(id, ItemKind::SectionHeader);
                let style = if selected {
                    Style::default()
                        .fg(self.theme.bg_primary)
                        .bg(self.theme.accent_primary)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.theme.fg_primary).add_modifier(Modifier::BOLD)
                };
                self.lines.push(Line::from(Span::styled(
                    format!("{} {}", glyph, title.clone().unwrap_or_else(|| id.clone())),
                    style,
                )));
                self.blank();
                if *expanded {
                    for card in cards {
                        self.card(card);
                    }
                }
            }

            SectionView::Exercise { title, subtitle, card, .. } => {
                if let Some(title) = title {
                    self.heading(title, subtitle.as_deref());
                    self.blank();
                }
                self.card(card);
            }

            SectionView::Quiz { id, title, questions, result } => {
                self.anchor(id, ItemKind::SectionHeader);
                self.heading(title.as_deref().unwrap_or("Quiz"), None);
                self.blank();
                for question in questions {
                    self.lines.push(Line::from(Span::styled(
                        format!("{}. {}", question.id, question.question),
                        Style::default().fg(self.theme.fg_primary).add_modifier(Modifier::BOLD),
                    )));
                    for option in &question.options {
                        let (glyph, style) = if option.selected {
                            (
                                "●",
                                Style::default()
                                    .fg(self.theme.accent_primary)
                                    .add_modifier(Modifier::BOLD),
                            )
                        } else {
                            ("○", Style::default().fg(self.theme.fg_secondary))
                        };
                        self.lines.push(Line::from(Span::styled(
                            format!("  {} {}", glyph, option.text),
                            style,
                        )));
                    }
                    self.blank();
                }
                match result {
                    Some(result) => self.lines.push(Line::from(Span::styled(
                        result.clone(),
                        Style::default().fg(self.theme.success).add_modifier(Modifier::BOLD),
                    ))),
                    None => self.lines.push(Line::from(Span::styled(
                        "[z] take the quiz".to_string(),
                        Style::default().fg(self.theme.fg_muted),
                    ))),
                }
                self.blank();
            }

            SectionView::Footer { title, subtitle, snapshot, total, celebrate, links, copyright, .. } => {
                if let Some(title) = title {
                    self.heading(title, subtitle.as_deref());
                }
                let percent = snapshot.progress_percentage;
                let filled = ((percent / 100.0) * FOOTER_BAR_WIDTH as f64).round() as usize;
                let filled = filled.min(FOOTER_BAR_WIDTH);
                self.lines.push(Line::from(vec![
                    Span::styled(
                        "█".repeat(filled),
                        Style::default().fg(self.theme.accent_primary),
                    ),
                    Span::styled(
                        "░".repeat(FOOTER_BAR_WIDTH - filled),
                        Style::default().fg(self.theme.bg_tertiary),
                    ),
                    Span::styled(
                        format!(
                            "  {} of {} activities · {:.0}% · {} points",
                            snapshot.completed_count, total, percent, snapshot.points
                        ),
                        Style::default().fg(self.theme.fg_secondary),
                    ),
                ]));
                if *celebrate {
                    self.blank();
                    self.lines.push(Line::from(Span::styled(
                        "🎉 Congratulations! You mastered this lesson.".to_string(),
                        Style::default().fg(self.theme.warning).add_modifier(Modifier::BOLD),
                    )));
                }
                for link in links {
                    self.lines.push(Line::from(Span::styled(
                        format!("{} · {}", link.label, link.url),
                        Style::default().fg(self.theme.fg_muted),
                    )));
                }
                if let Some(copyright) = copyright {
                    self.lines.push(Line::from(Span::styled(
                        copyright.clone(),
                        Style::default().fg(self.theme.fg_muted),
                    )));
                }
                self.blank();
            }

            SectionView::Unsupported { kind, .. } => {
                self.lines.push(Line::from(Span::styled(
                    format!("· Unsupported section \"{}\"", kind),
                    Style::default().fg(self.theme.fg_muted).add_modifier(Modifier::ITALIC),
                )));
                self.blank();
            }
        }
    }

    fn card(&mut self, card: &CardView) {
        let Some(id) = card.id.clone().filter(|_| card.completable) else {
            // Unrenderable placeholder: show it inertly, nothing to select
            self.lines.push(Line::from(Span::styled(
                format!(" · {}", card.title),
                Style::default().fg(self.theme.fg_muted).add_modifier(Modifier::ITALIC),
            )));
            for line in &card.body {
                self.card_line(line, Accented::default());
            }
            self.blank();
            return;
        };

        let kind = if card.expanded.is_some() { ItemKind::Disclosure } else { ItemKind::Card };
        let selected = self.is_selected(&id);
        let focused = card.focused || self.is_focused(&id);
        self.anchor(&id, kind);

        let accent = self.theme.accent(card.accent);
        let status = if card.completed {
            Span::styled(
                format!("{STATUS_COMPLETED} "),
                Style::default().fg(self.theme.success),
            )
        } else {
            Span::styled(
                format!("{STATUS_NOT_STARTED} "),
                Style::default().fg(self.theme.fg_muted),
            )
        };

        let glyph = match card.style {
            CardStyle::Basic => "▪",
            CardStyle::Highlight => "✦",
            CardStyle::Profile => "◈",
            CardStyle::Alert => "⚠",
            CardStyle::Exercise => "✎",
            CardStyle::Quiz => "?",
            CardStyle::Audio => "♪",
            CardStyle::Video => "▣",
            CardStyle::Unsupported => "·",
        };

        let disclosure = match card.expanded {
            Some(true) => "▼ ",
            Some(false) => "▶ ",
            None => "",
        };

        let title_style = if selected {
            Style::default()
                .fg(self.theme.bg_primary)
                .bg(self.theme.accent_primary)
                .add_modifier(Modifier::BOLD)
        } else if focused {
            Style::default().fg(self.theme.accent_secondary).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        };

        let emphasis = if focused {
            Span::styled("▌", Style::default().fg(self.theme.accent_secondary))
        } else {
            Span::raw(" ")
        };

        let mut header = vec![emphasis, status];
        header.push(Span::styled(
            format!("{glyph} {disclosure}{}", card.title),
            title_style,
        ));
        if let Some(subtitle) = &card.subtitle {
            header.push(Span::styled(
                format!("  {subtitle}"),
                Style::default().fg(self.theme.fg_muted),
            ));
        }
        self.lines.push(Line::from(header));

        let accented = Accented { accent: Some(accent) };
        for line in &card.body {
            self.card_line(line, accented);
        }

        if card.completable {
            let button_style = if card.completed {
                Style::default().fg(self.theme.fg_muted)
            } else {
                Style::default().fg(accent).add_modifier(Modifier::BOLD)
            };
            self.lines.push(Line::from(Span::styled(
                format!("   [ {} ]", card.button_label),
                button_style,
            )));
            if card.show_next {
                self.lines.push(Line::from(Span::styled(
                    "   → next activity  [n]".to_string(),
                    Style::default().fg(self.theme.accent_secondary),
                )));
            }
        }
        self.blank();
    }

    fn card_line(&mut self, line: &CardLine, accented: Accented) {
        let body = Style::default().fg(self.theme.fg_secondary);
        let indent_width = self.width.saturating_sub(3);

        match line {
            CardLine::Text(text) => {
                for wrapped in markup::wrap_markup(text, indent_width, body) {
                    let mut spans = vec![Span::raw("   ")];
                    spans.extend(wrapped.spans);
                    self.lines.push(Line::from(spans));
                }
            }
            CardLine::Emphasis(text) => {
                let style = Style::default()
                    .fg(accented.accent.unwrap_or(self.theme.fg_primary))
                    .add_modifier(Modifier::BOLD);
                for wrapped in textwrap::wrap(text, indent_width.max(1)) {
                    self.lines.push(Line::from(Span::styled(format!("   {wrapped}"), style)));
                }
            }
            CardLine::Bullet(text) => {
                let options = textwrap::Options::new(self.width.max(6))
                    .initial_indent("   • ")
                    .subsequent_indent("     ");
                for wrapped in textwrap::wrap(text, options) {
                    self.lines.push(Line::from(Span::styled(wrapped.into_owned(), body)));
                }
            }
            CardLine::Step(n, text) => {
                let initial = format!("   {n}. ");
                let options = textwrap::Options::new(self.width.max(8))
                    .initial_indent(&initial)
                    .subsequent_indent("      ");
                for wrapped in textwrap::wrap(text, options) {
                    self.lines.push(Line::from(Span::styled(wrapped.into_owned(), body)));
                }
            }
            CardLine::Field(label, value) => {
                self.lines.push(Line::from(vec![
                    Span::styled(
                        format!("   {label}: "),
                        Style::default().fg(self.theme.fg_primary).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(value.clone(), body),
                ]));
            }
            CardLine::Quote(text) => {
                let options = textwrap::Options::new(self.width.max(6))
                    .initial_indent("   “")
                    .subsequent_indent("    ");
                let mut wrapped: Vec<String> =
                    textwrap::wrap(text, options).into_iter().map(|l| l.into_owned()).collect();
                if let Some(last) = wrapped.last_mut() {
                    last.push('”');
                }
                for line in wrapped {
                    self.lines.push(Line::from(Span::styled(
                        line,
                        Style::default().fg(self.theme.fg_muted).add_modifier(Modifier::ITALIC),
                    )));
                }
            }
            CardLine::Input { placeholder, value } => {
                let (text, style) = if value.is_empty() {
                    (placeholder.clone(), Style::default().fg(self.theme.fg_muted).add_modifier(Modifier::ITALIC))
                } else {
                    (value.clone(), Style::default().fg(self.theme.fg_primary))
                };
                self.lines.push(Line::from(vec![
                    Span::styled("   ❯ ", Style::default().fg(self.theme.cursor)),
                    Span::styled(text, style),
                ]));
            }
        }
    }
}

/// Accent context passed down to body lines
#[derive(Debug, Clone, Copy, Default)]
struct Accented {
    accent: Option<ratatui::style::Color>,
}

/// Draw a scrollbar indicator
fn draw_scrollbar(
    frame: &mut Frame,
    x: u16,
    y: u16,
    height: u16,
    scroll_offset: usize,
    total_lines: usize,
    theme: &Theme,
) {
    if total_lines == 0 || height == 0 {
        return;
    }

    let height = height as usize;

    // Calculate thumb size and position
    let visible_ratio = (height as f64 / total_lines as f64).min(1.0);
    let thumb_height = ((height as f64 * visible_ratio).ceil() as usize).max(1);

    let max_scroll = total_lines.saturating_sub(height / 2);
    let scroll_ratio = if total_lines <= height || max_scroll == 0 {
        0.0
    } else {
        scroll_offset as f64 / max_scroll as f64
    };
    let thumb_top = ((height - thumb_height) as f64 * scroll_ratio).round() as usize;

    for i in 0..height {
        let in_thumb = i >= thumb_top && i < thumb_top + thumb_height;
        let ch = if in_thumb { "█" } else { "░" };
        let style = if in_thumb {
            Style::default().fg(theme.accent_secondary)
        } else {
            Style::default().fg(theme.bg_tertiary)
        };

        frame.render_widget(
            Paragraph::new(ch).style(style),
            Rect { x, y: y.saturating_add(i as u16), width: 1, height: 1 },
        );
    }
}
