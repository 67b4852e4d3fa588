//! The backend collaborators the document adapter talks to.

use std::cell::{Cell, RefCell};

use labsheet_engine::{DocumentContent, ResolvedStyle, StyleOverlay};
use serde_json::Value;
use thiserror::Error;

use crate::payload::SavePayload;
use crate::xlsx;

/// Error type for backend operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Transport failure (connection refused, timeout, ...)
    #[error("network error: {0}")]
    Network(String),
    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    /// Server rejected the request (400/422)
    #[error("{0}")]
    Validation(String),
    /// Response body could not be decoded
    #[error("parse error: {0}")]
    Parse(String),
}

/// Load/save endpoints for one template document.
pub trait TemplateBackend {
    /// Style overlay as returned by the server: `{ "styles": {...} }`
    fn fetch_styles(&self, section: &str) -> Result<Value, BackendError>;

    /// Spreadsheet file bytes. `cache_bust` goes into the query string.
    fn fetch_content(&self, section: &str, cache_bust: u64) -> Result<Vec<u8>, BackendError>;

    /// Replace content and styles on the server.
    fn save(&self, payload: &SavePayload) -> Result<(), BackendError>;
}

impl<B: TemplateBackend + ?Sized> TemplateBackend for &B {
    fn fetch_styles(&self, section: &str) -> Result<Value, BackendError> {
        (**self).fetch_styles(section)
    }

    fn fetch_content(&self, section: &str, cache_bust: u64) -> Result<Vec<u8>, BackendError> {
        (**self).fetch_content(section, cache_bust)
    }

    fn save(&self, payload: &SavePayload) -> Result<(), BackendError> {
        (**self).save(payload)
    }
}

/// In-process backend that echoes back what was last saved.
///
/// Content is served as a freshly exported xlsx file, so loads go through
/// the same import path as the HTTP backend. Failures can be injected.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    saved: RefCell<Option<SavePayload>>,
    fail_loads: Cell<u32>,
    fail_saves: Cell<u32>,
    saves: Cell<u32>,
    last_cache_bust: Cell<Option<u64>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `n` fetches
    pub fn fail_next_loads(&self, n: u32) {
        self.fail_loads.set(n);
    }

    /// Fail the next `n` saves
    pub fn fail_next_saves(&self, n: u32) {
        self.fail_saves.set(n);
    }

    pub fn saved(&self) -> Option<SavePayload> {
        self.saved.borrow().clone()
    }

    pub fn save_count(&self) -> u32 {
        self.saves.get()
    }

    pub fn last_cache_bust(&self) -> Option<u64> {
        self.last_cache_bust.get()
    }

    fn take_failure(counter: &Cell<u32>) -> bool {
        let n = counter.get();
        if n > 0 {
            counter.set(n - 1);
            true
        } else {
            false
        }
    }
}

impl TemplateBackend for MemoryBackend {
    fn fetch_styles(&self, section: &str) -> Result<Value, BackendError> {
        if Self::take_failure(&self.fail_loads) {
            return Err(BackendError::Network("connection refused".into()));
        }
        let styles = match self.saved.borrow().as_ref() {
            Some(p) if p.section == section => Value::Object(p.styles.clone()),
            _ => Value::Object(Default::default()),
        };
        Ok(serde_json::json!({ "styles": styles }))
    }

    fn fetch_content(&self, section: &str, cache_bust: u64) -> Result<Vec<u8>, BackendError> {
        if Self::take_failure(&self.fail_loads) {
            return Err(BackendError::Http { status: 503, body: "unavailable".into() });
        }
        self.last_cache_bust.set(Some(cache_bust));
        let data = match self.saved.borrow().as_ref() {
            Some(p) if p.section == section => p.data.clone(),
            _ => Vec::new(),
        };
        let content = DocumentContent::from_wire(&data, data.len());
        xlsx::export(&content, &StyleOverlay::new(), &ResolvedStyle::default())
            .map_err(|e| BackendError::Parse(e.to_string()))
    }

    fn save(&self, payload: &SavePayload) -> Result<(), BackendError> {
        if Self::take_failure(&self.fail_saves) {
            return Err(BackendError::Validation("section is locked".into()));
        }
        *self.saved.borrow_mut() = Some(payload.clone());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
