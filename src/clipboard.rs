use crate::error::ClipboardError;

/// Reads the current text content of the system clipboard.
///
/// Non-text or empty clipboards read as `""`; `Err` is reserved for the
/// clipboard itself being unreachable.
pub trait ClipboardReader {
    fn read_text(&mut self) -> Result<String, ClipboardError>;
}

#[cfg(windows)]
pub struct SystemClipboard;

#[cfg(windows)]
impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        Ok(Self)
    }
}

#[cfg(windows)]
impl ClipboardReader for SystemClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        use clipboard_win::{formats, get_clipboard_string, is_format_avail};

        if !is_format_avail(formats::CF_UNICODETEXT) {
            return Ok(String::new());
        }
        get_clipboard_string().map_err(|e| ClipboardError::Read(e.to_string()))
    }
}

#[cfg(not(windows))]
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

#[cfg(not(windows))]
impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        let inner =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        Ok(Self { inner })
    }
}

#[cfg(not(windows))]
impl ClipboardReader for SystemClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        match self.inner.get_text() {
            Ok(text) => Ok(text),
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(e) => Err(ClipboardError::Read(e.to_string())),
        }
    }
}
