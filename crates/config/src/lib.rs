// Configuration loading

pub mod settings;

pub use settings::{BackendSettings, ConfigError, DocumentSettings, Settings};
