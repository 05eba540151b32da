//! Gamification dashboard component
//!
//! Progress bar, point total, earned badges, and the certificate blurb.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

use crate::engine::view::DashboardView;
use crate::theme::Theme;

/// Height of the dashboard in lines, borders included
pub const DASHBOARD_HEIGHT: u16 = 7;

/// Draw the dashboard
pub fn draw(frame: &mut Frame, area: Rect, dashboard: &DashboardView, theme: &Theme) {
    let block = Block::default()
        .title(format!(" {} ", dashboard.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.bg_secondary));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    // Row 1: progress label and count
    let label = dashboard.progress_label.as_deref().unwrap_or("Progress");
    let count_line = Line::from(vec![
        Span::styled(
            label.to_string(),
            Style::default().fg(theme.fg_primary).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "  {} of {} activities",
                dashboard.snapshot.completed_count, dashboard.total
            ),
            Style::default().fg(theme.fg_muted),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(count_line),
        Rect { height: 1, ..inner },
    );

    // Row 2: progress gauge
    if inner.height >= 2 {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(theme.accent_primary).bg(theme.bg_tertiary))
            .ratio((dashboard.snapshot.progress_percentage / 100.0).clamp(0.0, 1.0))
            .label(format!("{:.0}%", dashboard.snapshot.progress_percentage));
        frame.render_widget(gauge, Rect { y: inner.y + 1, height: 1, ..inner });
    }

    // Row 3: points and badges
    if inner.height >= 3 {
        let mut spans = vec![
            Span::styled("★ ", Style::default().fg(theme.warning)),
            Span::styled(
                format!("{} XP", dashboard.snapshot.points),
                Style::default().fg(theme.fg_primary).add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
        ];
        if dashboard.badges.is_empty() {
            spans.push(Span::styled(
                "Complete activities to earn badges",
                Style::default().fg(theme.fg_muted).add_modifier(Modifier::ITALIC),
            ));
        } else {
            for badge in &dashboard.badges {
                spans.push(Span::styled(
                    format!("{} {}  ", badge.icon, badge.label),
                    Style::default().fg(theme.accent(badge.accent)).add_modifier(Modifier::BOLD),
                ));
            }
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)),
            Rect { y: inner.y + 2, height: 1, ..inner },
        );
    }

    // Row 5: certificate blurb, below a spacer row
    if inner.height >= 5 {
        if let Some((title, text)) = &dashboard.certificate {
            let line = Line::from(vec![
                Span::styled(
                    format!("{title} "),
                    Style::default().fg(theme.info).add_modifier(Modifier::BOLD),
                ),
                Span::styled(text.clone(), Style::default().fg(theme.fg_muted)),
            ]);
            frame.render_widget(
                Paragraph::new(line),
                Rect { y: inner.y + 4, height: 1, ..inner },
            );
        }
    }
}
