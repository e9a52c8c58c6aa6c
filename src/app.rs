use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Local;
use tokio::{runtime::Handle, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use tui_textarea::TextArea;

use crate::clipboard::ClipboardSink;
use crate::models::{CopyConfirmation, Explanation, FocusArea, Language, LanguagePicker, ThemeMode};
use crate::network::{ExplainClient, REQUEST_FAILED};
use crate::theme::Theme;
use crate::utils::lock;

pub const PLACEHOLDER_CODE: &str = "// Write your code here...";
pub const COPY_FEEDBACK: Duration = Duration::from_millis(2000);

pub struct App {
    pub editor: TextArea<'static>,
    pub language: Language,
    pub theme: Theme,
    pub focus: FocusArea,
    pub picker: LanguagePicker,
    /// First visible row and column of the editor panel.
    pub editor_scroll: (usize, usize),
    pub output_scroll: u16,
    /// Rows of the output panel and of its content at the last draw, for scroll clamping.
    pub output_viewport: (u16, usize),
    pub explanation: Arc<Mutex<Explanation>>,
    pub copy: Arc<Mutex<CopyConfirmation>>,
    client: ExplainClient,
    clipboard: Box<dyn ClipboardSink>,
    session: CancellationToken,
}

impl App {
    pub fn new(
        client: ExplainClient,
        language: Language,
        mode: ThemeMode,
        code: Option<String>,
        clipboard: Box<dyn ClipboardSink>,
    ) -> Self {
        let code = code.unwrap_or_else(|| PLACEHOLDER_CODE.to_string());
        Self {
            editor: TextArea::new(buffer_lines(&code)),
            language,
            theme: Theme::for_mode(mode),
            focus: FocusArea::Editor,
            picker: LanguagePicker { visible: false, cursor: language.index() },
            editor_scroll: (0, 0),
            output_scroll: 0,
            output_viewport: (0, 0),
            explanation: Arc::default(),
            copy: Arc::default(),
            client,
            clipboard,
            session: CancellationToken::new(),
        }
    }

    pub fn code(&self) -> String {
        self.editor.lines().join("\n")
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.explanation).loading
    }

    pub fn is_copied(&self) -> bool {
        lock(&self.copy).copied
    }

    pub fn explanation_text(&self) -> String {
        lock(&self.explanation).text.clone()
    }

    /// The explain control is disabled while a request runs or the buffer is blank.
    pub fn can_explain(&self) -> bool {
        !self.is_loading() && !self.code().trim().is_empty()
    }

    /// Sends the buffer to the explanation service. The previous explanation
    /// stays on screen until the new one arrives. Returns `None` when the
    /// control is disabled.
    pub fn explain(&mut self, rt: &Handle) -> Option<JoinHandle<()>> {
        if !self.can_explain() {
            return None;
        }
        let code = self.code();
        lock(&self.explanation).loading = true;
        self.output_scroll = 0;
        info!(language = self.language.value(), bytes = code.len(), "explain requested");

        let client = self.client.clone();
        let shared = self.explanation.clone();
        let session = self.session.clone();
        Some(rt.spawn(async move {
            let outcome = tokio::select! {
                _ = session.cancelled() => None,
                res = client.explain(&code) => Some(res),
            };
            // The view may be gone by now.
            let Some(outcome) = outcome.filter(|_| !session.is_cancelled()) else {
                debug!("session closed, dropping explanation");
                return;
            };
            let text = match outcome {
                Ok(text) => text,
                Err(e) => {
                    error!(error = %e, "explain request failed");
                    REQUEST_FAILED.to_string()
                }
            };
            let mut state = lock(&shared);
            state.text = text;
            state.loading = false;
            state.updated_at = Some(Local::now());
        }))
    }

    /// Copies the explanation and shows the confirmation for two seconds.
    /// Returns whether anything was copied.
    pub fn copy_explanation(&mut self, rt: &Handle) -> bool {
        let text = self.explanation_text();
        if text.is_empty() {
            return false;
        }
        if let Err(e) = self.clipboard.set_text(&text) {
            error!(error = %e, "copy to clipboard failed");
            return false;
        }
        lock(&self.copy).copied = true;

        // Overlapping timers are fine, each one only clears the flag.
        let copy = self.copy.clone();
        rt.spawn(async move {
            tokio::time::sleep(COPY_FEEDBACK).await;
            lock(&copy).copied = false;
        });
        true
    }

    pub fn toggle_theme(&mut self) {
        self.theme = Theme::for_mode(self.theme.mode.toggled());
        debug!(mode = ?self.theme.mode, "theme toggled");
    }

    pub fn open_language_picker(&mut self) {
        self.picker.cursor = self.language.index();
        self.picker.visible = true;
    }

    pub fn move_picker(&mut self, down: bool) {
        let count = Language::ALL.len();
        self.picker.cursor = if down {
            (self.picker.cursor + 1) % count
        } else {
            (self.picker.cursor + count - 1) % count
        };
    }

    /// Applies the language under the picker cursor. Only highlighting changes.
    pub fn confirm_language(&mut self) {
        if let Some(lang) = Language::ALL.get(self.picker.cursor) {
            self.language = *lang;
        }
        self.picker.visible = false;
    }

    pub fn scroll_output(&mut self, delta: i32) {
        let (view, content) = self.output_viewport;
        let max = crate::utils::calculate_max_scroll(content, view);
        let next = (self.output_scroll as i32 + delta).clamp(0, max as i32);
        self.output_scroll = next as u16;
    }

    /// Cancels in-flight work so late results are not applied.
    pub fn shutdown(&self) {
        self.session.cancel();
    }
}

/// Splits on `\n` only, so a trailing newline survives as an empty last row
/// and `code()` gives back exactly what was loaded.
fn buffer_lines(code: &str) -> Vec<String> {
    code.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l).to_string()).collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::clipboard::test_support::MemoryClipboard;
    use crate::network::NO_EXPLANATION;
    use crate::network::test_support::spawn_server;
    use axum::http::StatusCode;
    use serde_json::json;

    pub(crate) fn test_app(base_url: Option<&str>, clipboard: MemoryClipboard) -> App {
        App::new(
            ExplainClient::new(base_url),
            Language::default(),
            ThemeMode::default(),
            None,
            Box::new(clipboard),
        )
    }

    fn set_code(app: &mut App, code: &str) {
        app.editor = TextArea::new(buffer_lines(code));
    }

    #[test]
    fn starts_with_placeholder() {
        let app = test_app(None, MemoryClipboard::default());
        assert_eq!(app.code(), PLACEHOLDER_CODE);
        assert_eq!(app.explanation_text(), "");
        assert!(!app.is_loading());
        assert_eq!(app.theme.mode, ThemeMode::Light);
        assert_eq!(app.language, Language::JavaScript);
    }

    #[test]
    fn loaded_file_keeps_trailing_newline() {
        let load = |code: &str| {
            App::new(
                ExplainClient::new(None),
                Language::Rust,
                ThemeMode::Light,
                Some(code.to_string()),
                Box::new(MemoryClipboard::default()),
            )
        };
        let app = load("fn main() {}\n");
        assert_eq!(app.code(), "fn main() {}\n");
        assert_eq!(app.editor.lines().len(), 2);

        assert_eq!(load("a\r\nb\r\n").code(), "a\nb\n");
        assert_eq!(load("no newline").code(), "no newline");
    }

    #[tokio::test]
    async fn explains_code_from_output_field() {
        let (base, captured) = spawn_server(StatusCode::OK, json!({"output": "Logs the number 1."})).await;
        let mut app = test_app(Some(&base), MemoryClipboard::default());
        set_code(&mut app, "console.log(1)");

        let task = app.explain(&Handle::current()).expect("explain enabled");
        assert!(app.is_loading());
        assert!(!app.can_explain());
        task.await.unwrap();

        assert_eq!(app.explanation_text(), "Logs the number 1.");
        assert!(!app.is_loading());
        assert!(lock(&app.explanation).updated_at.is_some());
        let seen = captured.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].1, json!({"code": "console.log(1)"}));
    }

    #[tokio::test]
    async fn explanation_field_and_placeholder() {
        let (base, _) = spawn_server(StatusCode::OK, json!({"explanation": "Adds numbers."})).await;
        let mut app = test_app(Some(&base), MemoryClipboard::default());
        app.explain(&Handle::current()).unwrap().await.unwrap();
        assert_eq!(app.explanation_text(), "Adds numbers.");

        let (base, _) = spawn_server(StatusCode::OK, json!({})).await;
        let mut app = test_app(Some(&base), MemoryClipboard::default());
        app.explain(&Handle::current()).unwrap().await.unwrap();
        assert_eq!(app.explanation_text(), NO_EXPLANATION);
    }

    #[tokio::test]
    async fn failures_show_error_and_clear_loading() {
        let mut app = test_app(None, MemoryClipboard::default());
        app.explain(&Handle::current()).unwrap().await.unwrap();
        assert_eq!(app.explanation_text(), REQUEST_FAILED);
        assert!(!app.is_loading());

        let (base, _) = spawn_server(StatusCode::BAD_GATEWAY, json!({"output": "ignored"})).await;
        let mut app = test_app(Some(&base), MemoryClipboard::default());
        app.explain(&Handle::current()).unwrap().await.unwrap();
        assert_eq!(app.explanation_text(), REQUEST_FAILED);
        assert!(!app.is_loading());
    }

    #[tokio::test]
    async fn blank_buffer_disables_explain() {
        let (base, captured) = spawn_server(StatusCode::OK, json!({"output": "x"})).await;
        let mut app = test_app(Some(&base), MemoryClipboard::default());
        set_code(&mut app, "  \n\t\n");
        assert!(!app.can_explain());
        assert!(app.explain(&Handle::current()).is_none());
        assert!(!app.is_loading());
        assert!(captured.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn second_invocation_while_loading_is_ignored() {
        let (base, captured) = spawn_server(StatusCode::OK, json!({"output": "once"})).await;
        let mut app = test_app(Some(&base), MemoryClipboard::default());
        let first = app.explain(&Handle::current()).unwrap();
        assert!(app.explain(&Handle::current()).is_none());
        first.await.unwrap();
        assert_eq!(captured.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn previous_result_stays_while_loading() {
        let (base, _) = spawn_server(StatusCode::OK, json!({"output": "second"})).await;
        let mut app = test_app(Some(&base), MemoryClipboard::default());
        lock(&app.explanation).text = "first".into();
        let task = app.explain(&Handle::current()).unwrap();
        assert_eq!(app.explanation_text(), "first");
        task.await.unwrap();
        assert_eq!(app.explanation_text(), "second");
    }

    #[tokio::test]
    async fn result_after_shutdown_is_dropped() {
        let (base, _) = spawn_server(StatusCode::OK, json!({"output": "late"})).await;
        let mut app = test_app(Some(&base), MemoryClipboard::default());
        let task = app.explain(&Handle::current()).unwrap();
        app.shutdown();
        task.await.unwrap();
        assert_eq!(app.explanation_text(), "");
    }

    #[tokio::test]
    async fn copy_with_empty_result_is_noop() {
        let clipboard = MemoryClipboard::default();
        let mut app = test_app(None, clipboard.clone());
        assert!(!app.copy_explanation(&Handle::current()));
        assert!(!app.is_copied());
        assert!(clipboard.writes.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn copy_confirmation_clears_after_two_seconds() {
        let clipboard = MemoryClipboard::default();
        let mut app = test_app(None, clipboard.clone());
        lock(&app.explanation).text = "Logs the number 1.".into();

        assert!(app.copy_explanation(&Handle::current()));
        assert!(app.is_copied());
        assert_eq!(*clipboard.writes.lock().unwrap(), vec!["Logs the number 1.".to_string()]);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(app.is_copied());
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(!app.is_copied());
    }

    #[tokio::test(start_paused = true)]
    async fn first_timer_clears_a_repeated_copy() {
        let clipboard = MemoryClipboard::default();
        let mut app = test_app(None, clipboard.clone());
        lock(&app.explanation).text = "text".into();

        assert!(app.copy_explanation(&Handle::current()));
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(app.copy_explanation(&Handle::current()));
        assert!(app.is_copied());
        assert_eq!(clipboard.writes.lock().unwrap().len(), 2);

        // Timers are not merged: the first one fires at 2 s regardless.
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(!app.is_copied());
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!app.is_copied());
    }

    #[tokio::test]
    async fn failed_copy_sets_no_confirmation() {
        let clipboard = MemoryClipboard { fail: true, ..Default::default() };
        let mut app = test_app(None, clipboard);
        lock(&app.explanation).text = "text".into();
        assert!(!app.copy_explanation(&Handle::current()));
        assert!(!app.is_copied());
    }

    #[test]
    fn theme_toggle_twice_restores() {
        let mut app = test_app(None, MemoryClipboard::default());
        let original = app.theme.root_bg;
        app.toggle_theme();
        assert_eq!(app.theme.mode, ThemeMode::Dark);
        app.toggle_theme();
        assert_eq!(app.theme.mode, ThemeMode::Light);
        assert_eq!(app.theme.root_bg, original);
    }

    #[test]
    fn language_picker_wraps_and_applies() {
        let mut app = test_app(None, MemoryClipboard::default());
        app.open_language_picker();
        assert!(app.picker.visible);
        app.move_picker(false);
        assert_eq!(app.picker.cursor, Language::ALL.len() - 1);
        app.confirm_language();
        assert_eq!(app.language, Language::Sql);
        assert!(!app.picker.visible);
        assert_eq!(app.code(), PLACEHOLDER_CODE);
    }

    #[test]
    fn output_scroll_is_clamped() {
        let mut app = test_app(None, MemoryClipboard::default());
        app.output_viewport = (10, 14);
        app.scroll_output(100);
        assert_eq!(app.output_scroll, 4);
        app.scroll_output(-100);
        assert_eq!(app.output_scroll, 0);
    }
}
