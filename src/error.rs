use thiserror::Error;

/// Failure of a single translation request.
///
/// The poll loop renders these as text for the user; the variants stay
/// distinct so the log can tell a bad language from a dead network.
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("unsupported target language: {0}")]
    UnsupportedLanguage(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("service returned {status}: {body}")]
    Service { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("clipboard read failed: {0}")]
    Read(String),
}
