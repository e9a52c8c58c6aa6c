use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::runtime::Handle;

use crate::app::App;
use crate::models::FocusArea;

const PAGE: i32 = 10;

/// Handles one key press. Returns `Ok(false)` when the app should quit.
pub fn handle_key(key: KeyEvent, app: &mut App, rt: &Handle) -> Result<bool> {
    if app.picker.visible {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => app.move_picker(false),
            KeyCode::Down | KeyCode::Char('j') => app.move_picker(true),
            KeyCode::Enter => app.confirm_language(),
            KeyCode::Esc => app.picker.visible = false,
            _ => {}
        }
        return Ok(true);
    }

    // Ctrl chords work everywhere, including while typing in the editor.
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('c') => return Ok(false),
            KeyCode::Char('e') => { app.explain(rt); }
            KeyCode::Char('l') => app.open_language_picker(),
            KeyCode::Char('t') => app.toggle_theme(),
            KeyCode::Char('y') => { app.copy_explanation(rt); }
            _ => {
                if app.focus == FocusArea::Editor {
                    app.editor.input(key);
                }
            }
        }
        return Ok(true);
    }

    if app.focus == FocusArea::Editor {
        if key.code == KeyCode::Esc {
            app.focus = FocusArea::Code;
        } else {
            app.editor.input(key);
        }
        return Ok(true);
    }

    match key.code {
        KeyCode::Char('q') => return Ok(false),
        KeyCode::Char('e') => { app.explain(rt); }
        KeyCode::Char('l') => app.open_language_picker(),
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('y') | KeyCode::Char('c') => { app.copy_explanation(rt); }
        KeyCode::Tab | KeyCode::BackTab => {
            app.focus = match app.focus {
                FocusArea::Output => FocusArea::Code,
                _ => FocusArea::Output,
            };
        }
        KeyCode::Char('i') | KeyCode::Enter if app.focus == FocusArea::Code => {
            app.focus = FocusArea::Editor;
        }
        KeyCode::Up | KeyCode::Char('k') if app.focus == FocusArea::Output => app.scroll_output(-1),
        KeyCode::Down | KeyCode::Char('j') if app.focus == FocusArea::Output => app.scroll_output(1),
        KeyCode::PageUp if app.focus == FocusArea::Output => app.scroll_output(-PAGE),
        KeyCode::PageDown if app.focus == FocusArea::Output => app.scroll_output(PAGE),
        _ => {}
    }
    Ok(true)
}
