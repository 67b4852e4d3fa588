//! Token storage.
//!
//! Reads/writes ~/.config/labsheet/auth.json (0600 on Unix). Used when the
//! settings file carries no token.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::client::ClientError;

/// Bearer token saved on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub token: String,
    /// API base the token was issued for; None = any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl StoredToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into(), api_base: None }
    }

    /// Whether this token may be sent to `api_base`
    pub fn applies_to(&self, api_base: &str) -> bool {
        match &self.api_base {
            Some(base) => base.trim_end_matches('/') == api_base.trim_end_matches('/'),
            None => true,
        }
    }
}

pub fn token_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|c| c.join("labsheet").join("auth.json"))
}

/// Load the saved token. None if nothing is saved or the file is invalid.
pub fn load_token() -> Option<StoredToken> {
    load_token_from(&token_file_path()?)
}

pub fn load_token_from(path: &Path) -> Option<StoredToken> {
    let contents = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(token) => Some(token),
        Err(e) => {
            log::warn!("ignoring unreadable token file {}: {}", path.display(), e);
            None
        }
    }
}

/// Write `token` to `path`, creating the parent directory.
pub fn save_token_to(path: &Path, token: &StoredToken) -> Result<(), ClientError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ClientError::Credentials(format!("failed to create config directory: {}", e)))?;
    }

    let contents = serde_json::to_string_pretty(token)
        .map_err(|e| ClientError::Credentials(format!("failed to serialize token: {}", e)))?;
    std::fs::write(path, contents)
        .map_err(|e| ClientError::Credentials(format!("failed to write token file: {}", e)))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .map_err(|e| ClientError::Credentials(format!("failed to set file permissions: {}", e)))?;
    }

    Ok(())
}
