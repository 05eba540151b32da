//! Inline markup rendering
//!
//! Lesson paragraphs carry inline `**bold**` emphasis. The original player
//! regex-replaced it into HTML; here it is parsed properly and wrapped into
//! styled terminal lines.

use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

/// Runs of text with an emphasis flag
fn segments(text: &str) -> Vec<(String, bool)> {
    let mut out = Vec::new();
    let mut strong = 0usize;

    for event in Parser::new(text) {
        match event {
            Event::Start(Tag::Strong | Tag::Emphasis) => strong += 1,
            Event::End(TagEnd::Strong | TagEnd::Emphasis) => strong = strong.saturating_sub(1),
            Event::Text(t) => out.push((t.to_string(), strong > 0)),
            Event::Code(t) => out.push((t.to_string(), true)),
            Event::SoftBreak | Event::HardBreak => out.push((" ".to_string(), false)),
            _ => {}
        }
    }

    out
}

/// Wrap markup text to `width` columns, emphasizing `**strong**` runs
pub fn wrap_markup(text: &str, width: usize, base: Style) -> Vec<Line<'static>> {
    let strong_style = base.add_modifier(Modifier::BOLD);
    let mut lines: Vec<Line> = Vec::new();
    let mut current: Vec<Span> = Vec::new();
    let mut used = 0usize;

    for (run, strong) in segments(text) {
        let style = if strong { strong_style } else { base };
        for word in run.split_whitespace() {
            let word_width = word.chars().count();
            let sep = usize::from(!current.is_empty());

            if width > 0 && !current.is_empty() && used + sep + word_width > width {
                lines.push(Line::from(std::mem::take(&mut current)));
                used = 0;
            }
            if !current.is_empty() {
                current.push(Span::styled(" ".to_string(), base));
                used += 1;
            }
            current.push(Span::styled(word.to_string(), style));
            used += word_width;
        }
    }

    if !current.is_empty() {
        lines.push(Line::from(current));
    }
    if lines.is_empty() {
        lines.push(Line::from(""));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect()
    }

    #[test]
    fn bold_runs_get_the_strong_style() {
        let lines = wrap_markup("a **big** deal", 80, Style::default());
        let spans = &lines[0].spans;
        let big = spans.iter().find(|s| s.content == "big").unwrap();
        assert!(big.style.add_modifier.contains(Modifier::BOLD));
        let a = spans.iter().find(|s| s.content == "a").unwrap();
        assert!(!a.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn wraps_at_width() {
        let lines = wrap_markup("one two three four", 9, Style::default());
        assert_eq!(plain(&lines), vec!["one two", "three", "four"]);
    }

    #[test]
    fn empty_text_yields_one_blank_line() {
        let lines = wrap_markup("", 20, Style::default());
        assert_eq!(plain(&lines), vec![""]);
    }

    #[test]
    fn zero_width_never_wraps() {
        let lines = wrap_markup("alpha beta gamma", 0, Style::default());
        assert_eq!(plain(&lines).len(), 1);
    }
}
