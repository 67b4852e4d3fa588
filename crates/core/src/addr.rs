//! Cell identity for the style overlay.
//!
//! A `CellAddr` names one cell of the template grid. Its string form
//! (`"<row>-<col>"`) is the overlay map key and the key used on the wire.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator between row and column in a cell key.
const KEY_SEPARATOR: char = '-';

/// Address of a cell in the template grid (0-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellAddr {
    /// Row index (0-based)
    pub row: usize,
    /// Column index (0-based)
    pub col: usize,
}

/// Error decoding a cell key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("cell key '{0}' is missing the '-' separator")]
    MissingSeparator(String),
    #[error("cell key '{key}' has an invalid {part} component")]
    InvalidComponent { key: String, part: &'static str },
}

impl CellAddr {
    /// Create a new CellAddr.
    #[inline]
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Encode as the stable overlay key, e.g. `(2, 0)` -> `"2-0"`.
    pub fn key(&self) -> String {
        format!("{}{}{}", self.row, KEY_SEPARATOR, self.col)
    }

    /// Decode an overlay key produced by [`CellAddr::key`].
    ///
    /// Both components must be plain base-10 digits; signs, whitespace and
    /// extra separators are rejected.
    pub fn from_key(key: &str) -> Result<Self, KeyError> {
        let (row, col) = key
            .split_once(KEY_SEPARATOR)
            .ok_or_else(|| KeyError::MissingSeparator(key.to_string()))?;

        Ok(Self {
            row: parse_component(key, row, "row")?,
            col: parse_component(key, col, "column")?,
        })
    }
}

fn parse_component(key: &str, part: &str, name: &'static str) -> Result<usize, KeyError> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(KeyError::InvalidComponent { key: key.to_string(), part: name });
    }
    part.parse()
        .map_err(|_| KeyError::InvalidComponent { key: key.to_string(), part: name })
}

impl std::fmt::Display for CellAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Excel-style: 0=A, 25=Z, 26=AA; rows are 1-based
        write!(f, "{}{}", col_to_letters(self.col), self.row + 1)
    }
}

impl From<(usize, usize)> for CellAddr {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// Convert 0-based column index to Excel-style letter(s).
pub(crate) fn col_to_letters(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}
