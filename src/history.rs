use std::sync::{Arc, Mutex, MutexGuard};

/// One detected clipboard change and what it was translated to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRecord {
    pub original: String,
    pub translated: String,
    pub target_language: String,
}

impl TranslationRecord {
    pub fn new(
        original: impl Into<String>,
        translated: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            original: original.into(),
            translated: translated.into(),
            target_language: target_language.into(),
        }
    }

    /// Two-line block followed by a blank separator line.
    pub fn render(&self) -> String {
        format!(
            "Original: {}\nTranslation ({}): {}\n\n",
            self.original, self.target_language, self.translated
        )
    }
}

/// Append-only, in-memory translation history.
///
/// Cloning yields another handle to the same log: the poll loop appends from
/// its worker thread while the control panel renders and clears it. There is
/// no capacity limit; the log lives as long as the process.
#[derive(Debug, Clone, Default)]
pub struct TranslationLog {
    entries: Arc<Mutex<Vec<TranslationRecord>>>,
}

impl TranslationLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<TranslationRecord>> {
        // A panic elsewhere cannot leave a Vec half-pushed; keep going.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn append(&self, record: TranslationRecord) {
        self.lock().push(record);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot in chronological order.
    pub fn entries(&self) -> Vec<TranslationRecord> {
        self.lock().clone()
    }

    pub fn render(&self) -> String {
        self.lock().iter().map(TranslationRecord::render).collect()
    }
}
