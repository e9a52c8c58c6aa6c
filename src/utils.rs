use std::sync::{Mutex, MutexGuard, PoisonError};

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Locks shared UI state. A panicked request task must not take the UI down
/// with it, so poisoning is ignored.
pub fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Moves a scroll offset just enough for `pos` to sit inside a window of `len` cells.
pub fn follow(offset: usize, pos: usize, len: usize) -> usize {
    if len == 0 || pos < offset {
        pos
    } else if pos >= offset + len {
        pos + 1 - len
    } else {
        offset
    }
}

pub fn calculate_max_scroll(content_lines: usize, view_height: u16) -> u16 {
    let content_lines = u16::try_from(content_lines).unwrap_or(u16::MAX);
    content_lines.saturating_sub(view_height)
}

/// Centers a rectangle within another rectangle.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default().direction(Direction::Vertical)
        .constraints([Constraint::Percentage((100-percent_y)/2), Constraint::Percentage(percent_y), Constraint::Percentage((100-percent_y)/2)]).split(r)[1];
    Layout::default().direction(Direction::Horizontal)
        .constraints([Constraint::Percentage((100-percent_x)/2), Constraint::Percentage(percent_x), Constraint::Percentage((100-percent_x)/2)]).split(vertical)[1]
}
