// Document I/O: xlsx content, wire payloads, and the load/save adapter

pub mod backend;
pub mod document;
pub mod payload;
pub mod xlsx;

pub use backend::{BackendError, MemoryBackend, TemplateBackend};
pub use document::{DocumentError, DocumentIo, LoadState, LoadedDocument};
pub use payload::{SavePayload, DEFAULT_SECTION};
