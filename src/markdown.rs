//! Markdown to styled terminal text for the output panel.
//!
//! Covers what explanation services actually send back: ATX headings, bullet
//! and numbered lists, block quotes, fenced code, rules, and the inline
//! `code` / **bold** / *italic* spans. Anything else is shown verbatim.

use once_cell::sync::Lazy;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};
use regex::Regex;

use crate::theme::Theme;

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.*?)(?:\s+#+)?\s*$").unwrap());
static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*)[-*+]\s+(.*)$").unwrap());
static NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*)(\d+[.)])\s+(.*)$").unwrap());
static RULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s{0,3}([-*_])(\s*[-*_]){2,}\s*$").unwrap());
static INLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`]+)`|\*\*([^*]+)\*\*|\*([^*\s][^*]*)\*").unwrap());

const RULE_WIDTH: usize = 40;

pub fn render_markdown(src: &str, theme: &Theme) -> Text<'static> {
    let mut lines = Vec::new();
    let mut in_fence = false;

    for raw in src.lines() {
        let trimmed = raw.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            lines.push(Line::from(Span::styled(format!("  {raw}"), theme.code_block)));
            continue;
        }
        lines.push(render_block_line(raw, theme));
    }
    Text::from(lines)
}

fn render_block_line(raw: &str, theme: &Theme) -> Line<'static> {
    if let Some(caps) = HEADING.captures(raw) {
        let mut style = theme.heading;
        if caps[1].len() == 1 {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        return Line::from(render_inline(&caps[2], style, theme));
    }
    if RULE.is_match(raw) {
        return Line::from(Span::styled("─".repeat(RULE_WIDTH), theme.bullet));
    }
    if let Some(quote) = raw.trim_start().strip_prefix('>') {
        let mut spans = vec![Span::styled("│ ", theme.quote)];
        spans.extend(render_inline(quote.trim_start(), theme.quote, theme));
        return Line::from(spans);
    }
    if let Some(caps) = BULLET.captures(raw) {
        let mut spans = vec![Span::raw(caps[1].to_string()), Span::styled("• ", theme.bullet)];
        spans.extend(render_inline(&caps[2], Style::default(), theme));
        return Line::from(spans);
    }
    if let Some(caps) = NUMBERED.captures(raw) {
        let mut spans = vec![
            Span::raw(caps[1].to_string()),
            Span::styled(format!("{} ", &caps[2]), theme.bullet),
        ];
        spans.extend(render_inline(&caps[3], Style::default(), theme));
        return Line::from(spans);
    }
    Line::from(render_inline(raw, Style::default(), theme))
}

/// Splits a line into plain and emphasised spans, all on top of `base`.
fn render_inline(text: &str, base: Style, theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = vec![];
    let mut last = 0;
    for caps in INLINE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            spans.push(Span::styled(text[last..whole.start()].to_owned(), base));
        }
        if let Some(code) = caps.get(1) {
            spans.push(Span::styled(code.as_str().to_owned(), theme.inline_code));
        } else if let Some(bold) = caps.get(2) {
            spans.push(Span::styled(bold.as_str().to_owned(), base.add_modifier(Modifier::BOLD)));
        } else if let Some(italic) = caps.get(3) {
            spans.push(Span::styled(italic.as_str().to_owned(), base.add_modifier(Modifier::ITALIC)));
        }
        last = whole.end();
    }
    if last < text.len() {
        spans.push(Span::styled(text[last..].to_owned(), base));
    }
    spans
}
