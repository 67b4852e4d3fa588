//! Document I/O adapter: loads text and overlay for the editor, saves them
//! back as one full-document request.
//!
//! Errors never escape as panics. Load failures leave the adapter in
//! `LoadState::Failed` with an inline message until `reload` succeeds;
//! save failures set the message and are also returned, so a confirmation
//! dialog can stay open and offer a retry.

use std::time::{SystemTime, UNIX_EPOCH};

use labsheet_engine::{DocumentContent, FontSize, StyleOverlay};
use thiserror::Error;

use crate::backend::{BackendError, TemplateBackend};
use crate::payload::{parse_styles_response, SavePayload, DEFAULT_SECTION};
use crate::xlsx::{self, ImportError};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to load styles: {0}")]
    LoadStyles(BackendError),
    #[error("failed to load content: {0}")]
    LoadContent(BackendError),
    #[error("failed to read content: {0}")]
    Import(#[from] ImportError),
    #[error("failed to save: {0}")]
    Save(BackendError),
    #[error("a save is already in progress")]
    SaveInProgress,
    #[error("no save is in progress")]
    NoSaveInProgress,
}

impl DocumentError {
    /// Whether retrying the same call can succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            DocumentError::LoadStyles(e) | DocumentError::LoadContent(e) | DocumentError::Save(e) => {
                !matches!(e, BackendError::Validation(_))
            }
            DocumentError::Import(_) => false,
            DocumentError::SaveInProgress => true,
            DocumentError::NoSaveInProgress => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Result of a successful load
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    pub content: DocumentContent,
    pub overlay: StyleOverlay,
}

pub struct DocumentIo<B> {
    backend: B,
    section: String,
    row_count: usize,
    default_font_size: FontSize,
    clock: fn() -> u64,
    state: LoadState,
    error_message: Option<String>,
    saving: bool,
}

impl<B: TemplateBackend> DocumentIo<B> {
    pub fn new(backend: B, row_count: usize) -> Self {
        Self {
            backend,
            section: DEFAULT_SECTION.to_string(),
            row_count,
            default_font_size: FontSize::default(),
            clock: now_millis,
            state: LoadState::Idle,
            error_message: None,
            saving: false,
        }
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = section.into();
        self
    }

    pub fn with_default_font_size(mut self, size: FontSize) -> Self {
        self.default_font_size = size;
        self
    }

    /// Source of the cache-busting timestamp (milliseconds)
    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Inline error message for the last failed load or save
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Fetch the overlay, then the content. The overlay comes first so the
    /// first content render already has its styles.
    pub fn load(&mut self) -> Result<LoadedDocument, DocumentError> {
        self.state = LoadState::Loading;
        match self.fetch() {
            Ok(doc) => {
                log::info!(
                    "loaded section '{}': {} rows, {} style entries",
                    self.section,
                    doc.content.row_count(),
                    doc.overlay.len()
                );
                self.state = LoadState::Loaded;
                self.error_message = None;
                Ok(doc)
            }
            Err(e) => {
                log::warn!("load of section '{}' failed: {}", self.section, e);
                let message = e.to_string();
                self.state = LoadState::Failed(message.clone());
                self.error_message = Some(message);
                Err(e)
            }
        }
    }

    /// Manual retry after a failed load; same as [`DocumentIo::load`].
    pub fn reload(&mut self) -> Result<LoadedDocument, DocumentError> {
        self.load()
    }

    fn fetch(&self) -> Result<LoadedDocument, DocumentError> {
        let response = self
            .backend
            .fetch_styles(&self.section)
            .map_err(DocumentError::LoadStyles)?;
        let mut overlay = StyleOverlay::new();
        overlay.merge_from(&parse_styles_response(&response));

        let bytes = self
            .backend
            .fetch_content(&self.section, (self.clock)())
            .map_err(DocumentError::LoadContent)?;
        let content = xlsx::import_first_column(&bytes, self.row_count)?;

        Ok(LoadedDocument { content, overlay })
    }

    /// Mark a save as in flight and build its payload. Fails with
    /// `SaveInProgress` while an earlier save has not finished.
    pub fn begin_save(
        &mut self,
        content: &DocumentContent,
        overlay: &StyleOverlay,
    ) -> Result<SavePayload, DocumentError> {
        if self.saving {
            return Err(DocumentError::SaveInProgress);
        }
        self.saving = true;
        Ok(SavePayload::build(content, overlay, &self.section, self.default_font_size))
    }

    /// Record the outcome of the save started by [`DocumentIo::begin_save`].
    pub fn finish_save(&mut self, result: Result<(), BackendError>) -> Result<(), DocumentError> {
        if !self.saving {
            return Err(DocumentError::NoSaveInProgress);
        }
        self.saving = false;
        match result {
            Ok(()) => {
                log::info!("saved section '{}'", self.section);
                self.error_message = None;
                Ok(())
            }
            Err(e) => {
                let err = DocumentError::Save(e);
                log::warn!("{}", err);
                self.error_message = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Send the full content and overlay in one request.
    pub fn save(&mut self, content: &DocumentContent, overlay: &StyleOverlay) -> Result<(), DocumentError> {
        let payload = self.begin_save(content, overlay)?;
        let result = self.backend.save(&payload);
        self.finish_save(result)
    }
}

/// Milliseconds since the Unix epoch
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use labsheet_core::{CellAddr, Selection};
    use labsheet_engine::{FontWeight, StylePatch};

    fn fixed_clock() -> u64 {
        1_700_000_000_000
    }

    #[test]
    fn test_load_empty_backend() {
        let mut io = DocumentIo::new(MemoryBackend::new(), 8).with_clock(fixed_clock);
        let doc = io.load().unwrap();
        assert_eq!(doc.content, DocumentContent::blank(8));
        assert!(doc.overlay.is_empty());
        assert_eq!(io.state(), &LoadState::Loaded);
        assert_eq!(io.backend().last_cache_bust(), Some(fixed_clock()));
    }

    #[test]
    fn test_load_failure_then_reload() {
        let backend = MemoryBackend::new();
        backend.fail_next_loads(1);
        let mut io = DocumentIo::new(backend, 8);

        let err = io.load().unwrap_err();
        assert!(matches!(err, DocumentError::LoadStyles(BackendError::Network(_))));
        assert!(err.is_retryable());
        assert!(matches!(io.state(), LoadState::Failed(_)));
        assert!(io.error_message().unwrap().contains("connection refused"));

        io.reload().unwrap();
        assert_eq!(io.state(), &LoadState::Loaded);
        assert_eq!(io.error_message(), None);
    }

    #[test]
    fn test_content_failure_after_styles() {
        let backend = MemoryBackend::new();
        let mut io = DocumentIo::new(FailingContent(&backend), 8);
        let err = io.load().unwrap_err();
        assert!(matches!(err, DocumentError::LoadContent(BackendError::Http { status: 503, .. })));
        assert!(matches!(io.state(), LoadState::Failed(msg) if msg.contains("503")));
    }

    struct FailingContent<'a>(&'a MemoryBackend);

    impl TemplateBackend for FailingContent<'_> {
        fn fetch_styles(&self, section: &str) -> Result<serde_json::Value, BackendError> {
            self.0.fetch_styles(section)
        }

        fn fetch_content(&self, _section: &str, _cache_bust: u64) -> Result<Vec<u8>, BackendError> {
            Err(BackendError::Http { status: 503, body: "unavailable".into() })
        }

        fn save(&self, payload: &SavePayload) -> Result<(), BackendError> {
            self.0.save(payload)
        }
    }

    #[test]
    fn test_save_failure_is_recorded_and_returned() {
        let backend = MemoryBackend::new();
        backend.fail_next_saves(1);
        let mut io = DocumentIo::new(backend, 2);
        let content = DocumentContent::from_rows(["a", "b"]);

        let err = io.save(&content, &StyleOverlay::new()).unwrap_err();
        assert!(matches!(err, DocumentError::Save(BackendError::Validation(_))));
        assert!(!err.is_retryable());
        assert_eq!(io.error_message(), Some("failed to save: section is locked"));
        assert!(!io.is_saving());

        io.save(&content, &StyleOverlay::new()).unwrap();
        assert_eq!(io.error_message(), None);
        assert_eq!(io.backend().save_count(), 1);
    }

    #[test]
    fn test_second_save_while_in_flight_is_refused() {
        let mut io = DocumentIo::new(MemoryBackend::new(), 2);
        let content = DocumentContent::from_rows(["a", "b"]);

        let payload = io.begin_save(&content, &StyleOverlay::new()).unwrap();
        assert!(io.is_saving());
        assert!(matches!(
            io.save(&content, &StyleOverlay::new()),
            Err(DocumentError::SaveInProgress)
        ));

        let result = io.backend().save(&payload);
        io.finish_save(result).unwrap();
        assert!(!io.is_saving());
        assert!(matches!(io.finish_save(Ok(())), Err(DocumentError::NoSaveInProgress)));
    }

    #[test]
    fn test_save_uses_section_and_default_size() {
        let mut io = DocumentIo::new(MemoryBackend::new(), 1)
            .with_section("footer")
            .with_default_font_size(FontSize::new(12).unwrap());
        let overlay = StyleOverlay::new().apply_patch(
            &Selection::cell(0, 0),
            &StylePatch::weight(FontWeight::Bold),
            1,
            1,
        );
        io.save(&DocumentContent::from_rows(["x"]), &overlay).unwrap();

        let saved = io.backend().saved().unwrap();
        assert_eq!(saved.section, "footer");
        assert_eq!(saved.styles["0-0"]["fontSize"], "12px");

        let doc = io.load().unwrap();
        assert_eq!(doc.overlay.get(CellAddr::new(0, 0)).and_then(|p| p.font_size).map(|s| s.px()), Some(12));
    }
}
