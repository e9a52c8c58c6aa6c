use arboard::Clipboard;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("system clipboard unavailable: {0}")]
    Unavailable(#[source] arboard::Error),
    #[error("could not write to clipboard: {0}")]
    Write(#[source] arboard::Error),
}

/// Destination for the copy action.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The OS clipboard. Opened on first use and kept alive so that X11/Wayland
/// keep serving the copied text.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<Clipboard>,
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let cb = match self.inner.take() {
            Some(cb) => cb,
            None => Clipboard::new().map_err(ClipboardError::Unavailable)?,
        };
        self.inner.insert(cb).set_text(text.to_owned()).map_err(ClipboardError::Write)
    }
}
