//! Document content: the text of each row of the single-column template.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("row {row} is outside the document ({rows} rows)")]
    RowOutOfBounds { row: usize, rows: usize },
}

/// Ordered rows of text, index-aligned with the overlay's row axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentContent {
    rows: Vec<String>,
}

impl DocumentContent {
    /// `row_count` empty rows
    pub fn blank(row_count: usize) -> Self {
        Self { rows: vec![String::new(); row_count] }
    }

    pub fn from_rows<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { rows: rows.into_iter().map(Into::into).collect() }
    }

    /// Build from the wire form (`string[][]`), keeping the first column of
    /// the first `row_count` rows. Short input is padded with empty rows.
    pub fn from_wire(data: &[Vec<String>], row_count: usize) -> Self {
        let mut rows: Vec<String> = data
            .iter()
            .take(row_count)
            .map(|row| row.first().cloned().unwrap_or_default())
            .collect();
        rows.resize(row_count, String::new());
        Self { rows }
    }

    /// Wire form: one single-cell array per row
    pub fn to_wire(&self) -> Vec<Vec<String>> {
        self.rows.iter().map(|text| vec![text.clone()]).collect()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, row: usize) -> Option<&str> {
        self.rows.get(row).map(String::as_str)
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn set(&mut self, row: usize, text: impl Into<String>) -> Result<(), ContentError> {
        let rows = self.rows.len();
        let slot = self
            .rows
            .get_mut(row)
            .ok_or(ContentError::RowOutOfBounds { row, rows })?;
        *slot = text.into();
        Ok(())
    }
}
