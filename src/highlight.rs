//! Editor syntax highlighting via syntect.

use std::sync::OnceLock;

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use syntect::easy::HighlightLines;
use syntect::highlighting::{self, FontStyle, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

use crate::models::{Language, ThemeMode};

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme_set() -> &'static ThemeSet {
    THEME_SET.get_or_init(ThemeSet::load_defaults)
}

/// syntect syntax name and a file extension to fall back on.
/// The bundled set has no TypeScript grammar, JavaScript is close enough.
fn syntax_name(lang: Language) -> (&'static str, &'static str) {
    match lang {
        Language::JavaScript | Language::TypeScript => ("JavaScript", "js"),
        Language::Python => ("Python", "py"),
        Language::Java => ("Java", "java"),
        Language::Cpp => ("C++", "cpp"),
        Language::CSharp => ("C#", "cs"),
        Language::Html => ("HTML", "html"),
        Language::Css => ("CSS", "css"),
        Language::Json => ("JSON", "json"),
        // "PHP" expects an opening `<?php` tag, snippets usually lack one.
        Language::Php => ("PHP Source", "php"),
        Language::Go => ("Go", "go"),
        Language::Rust => ("Rust", "rs"),
        Language::Sql => ("SQL", "sql"),
    }
}

fn syntax_for(lang: Language) -> &'static SyntaxReference {
    let ss = syntax_set();
    let (name, ext) = syntax_name(lang);
    ss.find_syntax_by_name(name)
        .or_else(|| ss.find_syntax_by_extension(ext))
        .unwrap_or_else(|| ss.find_syntax_plain_text())
}

fn syntect_theme(mode: ThemeMode) -> Option<&'static highlighting::Theme> {
    let name = match mode {
        ThemeMode::Light => "InspiredGitHub",
        ThemeMode::Dark => "base16-ocean.dark",
    };
    let themes = &theme_set().themes;
    themes.get(name).or_else(|| themes.values().next())
}

fn to_style(style: highlighting::Style) -> Style {
    let fg = style.foreground;
    let mut out = Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b));
    if style.font_style.contains(FontStyle::BOLD) {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        out = out.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        out = out.add_modifier(Modifier::UNDERLINED);
    }
    out
}

/// Highlights the first `count` lines of the buffer. Parsing always starts at
/// the top so block comments and strings spanning lines stay correct.
pub fn highlight_lines(lines: &[String], lang: Language, mode: ThemeMode, count: usize) -> Vec<Line<'static>> {
    let Some(theme) = syntect_theme(mode) else {
        return lines.iter().take(count).map(|l| Line::from(l.clone())).collect();
    };
    let mut hl = HighlightLines::new(syntax_for(lang), theme);
    let ss = syntax_set();
    lines
        .iter()
        .take(count)
        .map(|line| {
            let with_newline = format!("{line}\n");
            match hl.highlight_line(&with_newline, ss) {
                Ok(ranges) => Line::from(
                    ranges
                        .into_iter()
                        .map(|(style, text)| Span::styled(text.trim_end_matches('\n').to_owned(), to_style(style)))
                        .filter(|span| !span.content.is_empty())
                        .collect::<Vec<_>>(),
                ),
                Err(_) => Line::from(line.clone()),
            }
        })
        .collect()
}
