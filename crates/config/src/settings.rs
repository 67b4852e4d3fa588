// Application settings
// Loaded from ~/.config/labsheet/settings.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: String, source: std::io::Error },
    #[error("invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Where the template backend lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// JSON API root (styles and save endpoints)
    pub api_base: String,

    /// Static media root serving the spreadsheet files
    pub media_base: String,

    /// Bearer token; None = anonymous
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    pub timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8000/api".to_string(),
            media_base: "http://localhost:8000/media".to_string(),
            token: None,
            timeout_secs: 60,
        }
    }
}

/// Shape of the edited document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSettings {
    /// Logical document region; the backend only has "header" today
    pub section: String,

    /// Rows read from the spreadsheet and shown in the grid
    pub row_count: usize,

    pub col_count: usize,

    /// Font size (px) used when a cell has none
    pub default_font_size: u32,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            section: "header".to_string(),
            row_count: 8,
            col_count: 1,
            default_font_size: 14,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub backend: BackendSettings,
    pub document: DocumentSettings,
}

impl Settings {
    /// Default settings file location
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("labsheet")
            .join("settings.toml")
    }

    /// Load from the default location; a missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path();
        if !path.exists() {
            log::debug!("no settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let settings: Settings = toml::from_str(&text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.display().to_string(),
                source,
            })?;
        }
        fs::write(path, text).map_err(|source| ConfigError::Write {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.document.row_count == 0 {
            return Err(ConfigError::Invalid("document.row_count must be at least 1".into()));
        }
        if self.document.col_count == 0 {
            return Err(ConfigError::Invalid("document.col_count must be at least 1".into()));
        }
        if self.document.default_font_size == 0 {
            return Err(ConfigError::Invalid("document.default_font_size must be positive".into()));
        }
        if self.document.section.trim().is_empty() {
            return Err(ConfigError::Invalid("document.section must not be empty".into()));
        }
        Ok(())
    }
}
