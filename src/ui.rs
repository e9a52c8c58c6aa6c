use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
};

use crate::app::App;
use crate::highlight::highlight_lines;
use crate::markdown::render_markdown;
use crate::models::{FocusArea, Language};
use crate::theme::Theme;
use crate::utils::{centered_rect, follow, lock};

/// Draws the whole explainer view. The theme travels with `app`, nothing else
/// reads a global style.
pub fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();
    f.render_widget(Block::default().style(app.theme.root()), area);

    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1), Constraint::Length(3)])
        .split(area);

    render_toolbar(f, app, vertical_chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(vertical_chunks[1]);
    render_editor(f, app, columns[0]);
    render_output(f, app, columns[1]);

    let footer = Paragraph::new(footer_text(app.focus))
        .block(Block::default().borders(Borders::ALL).border_style(app.theme.border(false)))
        .style(app.theme.footer);
    f.render_widget(footer, vertical_chunks[2]);

    if app.picker.visible {
        render_language_picker(f, app.picker.cursor, &app.theme);
    }
}

fn render_toolbar(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let button = if app.is_loading() {
        Span::styled(" ⏳ thinking... ", theme.button_disabled)
    } else if app.can_explain() {
        Span::styled(" Explain Code [e] ", theme.button)
    } else {
        Span::styled(" Explain Code [e] ", theme.button_disabled)
    };
    let line = Line::from(vec![
        Span::styled("⚡ Code Explainer", theme.popup_title),
        Span::raw("   "),
        Span::styled(format!("{} [t]", theme.mode.toggle_icon()), Style::default().fg(theme.text)),
        Span::raw("   "),
        Span::styled("Language: ", Style::default().fg(theme.text_secondary)),
        Span::styled(format!("{} [l]", app.language.label()), Style::default().fg(theme.text_highlight)),
        Span::raw("   "),
        button,
    ]);
    let bar = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL).border_style(theme.border(false)));
    f.render_widget(bar, area);
}

fn render_editor(f: &mut Frame, app: &mut App, area: Rect) {
    let editing = app.focus == FocusArea::Editor;
    let title = if editing {
        format!("Code Editor – {} (Esc: commands)", app.language.label())
    } else {
        format!("Code Editor – {} (i: edit)", app.language.label())
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(app.theme.border(editing || app.focus == FocusArea::Code));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let gutter = app.editor.lines().len().to_string().len() as u16 + 1;
    let [numbers, code_area] = Layout::horizontal([Constraint::Length(gutter), Constraint::Min(0)]).areas(inner);

    let (row, col) = app.editor.cursor();
    let (top, left) = app.editor_scroll;
    let top = follow(top, row, code_area.height as usize);
    let left = follow(left, col, code_area.width as usize);
    app.editor_scroll = (top, left);

    let lines = app.editor.lines();
    let bottom = (top + code_area.height as usize).min(lines.len());
    let number_lines: Vec<Line> = (top..bottom)
        .map(|i| Line::from(Span::styled(format!("{:>w$} ", i + 1, w = gutter as usize - 1), app.theme.line_number)))
        .collect();
    f.render_widget(Paragraph::new(number_lines), numbers);

    // Highlighting state depends on every row above, so parse from the top.
    let code: Vec<Line> = highlight_lines(lines, app.language, app.theme.mode, bottom)
        .into_iter()
        .skip(top)
        .collect();
    f.render_widget(Paragraph::new(code).scroll((0, left as u16)), code_area);

    if let Some(((r0, c0), (r1, c1))) = app.editor.selection_range() {
        let style = Style::default().fg(app.theme.selection_fg).bg(app.theme.selection_bg);
        for r in (r0.max(top)..=r1).take_while(|r| *r < bottom) {
            let from = if r == r0 { c0 } else { 0 };
            let to = if r == r1 { c1 } else { lines[r].chars().count() + 1 };
            for c in from.max(left)..to {
                let x = code_area.x as usize + c - left;
                if x >= code_area.right() as usize {
                    break;
                }
                f.buffer_mut()[(x as u16, code_area.y + (r - top) as u16)].set_style(style);
            }
        }
    }

    if editing {
        f.set_cursor_position((code_area.x + (col - left) as u16, code_area.y + (row - top) as u16));
    }
}

fn render_output(f: &mut Frame, app: &mut App, area: Rect) {
    let theme = &app.theme;
    let (text, loading, updated_at) = {
        let state = lock(&app.explanation);
        (state.text.clone(), state.loading, state.updated_at)
    };

    let copy_label = if app.is_copied() {
        Span::styled(" ✅ Copied ", theme.confirmation)
    } else {
        Span::styled(" 📋 Copy [y] ", Style::default().fg(theme.text_secondary))
    };
    let mut block = Block::default()
        .title("AI Explanation")
        .title_top(Line::from(copy_label).right_aligned())
        .borders(Borders::ALL)
        .border_style(theme.border(app.focus == FocusArea::Output));
    if loading {
        block = block.title_bottom(Line::from(Span::styled(" ⏳ thinking... ", theme.confirmation)));
    } else if let Some(at) = updated_at {
        block = block.title_bottom(Line::from(format!(" explained at {} ", at.format("%H:%M:%S"))));
    }

    let body = if text.is_empty() && !loading {
        Text::from(Line::from(Span::styled(
            "Press e to explain the code in the editor.",
            Style::default().fg(theme.text_secondary).add_modifier(Modifier::ITALIC),
        )))
    } else {
        render_markdown(&text, theme)
    };

    let inner = block.inner(area);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);
    f.render_widget(block, area);

    let para = Paragraph::new(body).wrap(Wrap { trim: false });
    // Rows as the word wrapper lays them out, not a width estimate.
    let content_rows = para.line_count(chunks[0].width);
    app.output_viewport = (inner.height, content_rows);
    f.render_widget(para.scroll((app.output_scroll, 0)), chunks[0]);
    let mut sb = ScrollbarState::default()
        .position(app.output_scroll as usize)
        .content_length(content_rows);
    f.render_stateful_widget(Scrollbar::default().orientation(ScrollbarOrientation::VerticalRight), chunks[1], &mut sb);
}

fn render_language_picker(f: &mut Frame, cursor: usize, theme: &Theme) {
    let popup_area = centered_rect(30, 60, f.area());
    f.render_widget(Clear, popup_area);
    let items: Vec<ListItem> = Language::ALL
        .iter()
        .map(|lang| ListItem::new(format!("{:<12}{}", lang.label(), lang.value())))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .title(Span::styled("Language", theme.popup_title))
                .borders(Borders::ALL)
                .style(theme.popup_border),
        )
        .highlight_style(Style::default().fg(theme.selection_fg).bg(theme.selection_bg).add_modifier(Modifier::BOLD))
        .highlight_symbol("→ ");
    let mut state = ListState::default();
    state.select(Some(cursor));
    f.render_stateful_widget(list, popup_area, &mut state);
}

fn footer_text(focus: FocusArea) -> &'static str {
    match focus {
        FocusArea::Editor => "Esc Commands | Ctrl+E Explain | Ctrl+L Language | Ctrl+T Theme | Ctrl+Y Copy | Ctrl+Q Quit",
        FocusArea::Code => "i/Enter Edit | e Explain | l Language | t Theme | y Copy | Tab Output | q Quit",
        FocusArea::Output => "↑/↓ j/k PgUp/PgDn Scroll | y Copy | e Explain | t Theme | Tab Editor | q Quit",
    }
}
