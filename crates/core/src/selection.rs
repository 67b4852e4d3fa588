//! Selection descriptors and the classifier that builds them from raw
//! grid-widget selection events.
//!
//! The widget reports a selection as anchor `(row, col)` and extent
//! `(row2, col2)`. Clicking a row header reports `col == -1`, clicking a
//! column header reports `row == -1`. Everything downstream works with the
//! normalized [`Selection`] instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::addr::{col_to_letters, CellAddr};

/// Sentinel the grid widget uses for "entire row" / "entire column".
pub const WHOLE_SPAN: i64 = -1;

/// Raw selection callback arguments, exactly as the widget reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSelection {
    pub row: i64,
    pub col: i64,
    pub row2: i64,
    pub col2: i64,
}

impl RawSelection {
    pub fn new(row: i64, col: i64, row2: i64, col2: i64) -> Self {
        Self { row, col, row2, col2 }
    }
}

/// Normalized selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Selection {
    /// A single cell
    Cell { row: usize, col: usize },
    /// Rectangle with inclusive corners, given in any order
    Range { from_row: usize, from_col: usize, to_row: usize, to_col: usize },
    /// Every column of one row
    Row { row: usize },
    /// Every row of one column
    Column { col: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("selection {0:?} uses the whole-span sentinel on both axes")]
    WholeGrid(RawSelection),
    #[error("selection {0:?} has a negative index")]
    NegativeIndex(RawSelection),
    #[error("selection {selection:?} reaches past the document's {rows} rows")]
    RowOutOfBounds { selection: RawSelection, rows: usize },
    #[error("selection {selection:?} reaches past the document's {cols} columns")]
    ColumnOutOfBounds { selection: RawSelection, cols: usize },
}

/// Classify a raw widget selection against a document of `row_count` rows.
///
/// Sentinels are recognized first and bypass the row-count heuristic: a
/// selection whose anchor column is `-1` is always `Row`, one whose anchor
/// row is `-1` is always `Column`. Otherwise a selection spanning row 0 to
/// the last row of a single column is `Column`, a degenerate one is `Cell`,
/// and anything else is `Range`.
///
/// Row indices at or past `row_count` are rejected. Columns are not
/// checked here; see [`Selection::fits`].
pub fn classify(raw: RawSelection, row_count: usize) -> Result<Selection, SelectionError> {
    let out_of_rows = |row: usize| {
        (row >= row_count).then_some(SelectionError::RowOutOfBounds { selection: raw, rows: row_count })
    };

    match (raw.row == WHOLE_SPAN, raw.col == WHOLE_SPAN) {
        (true, true) => return Err(SelectionError::WholeGrid(raw)),
        (false, true) => {
            let row = index(raw.row, raw)?;
            if let Some(err) = out_of_rows(row) {
                return Err(err);
            }
            return Ok(Selection::Row { row });
        }
        (true, false) => {
            let col = index(raw.col, raw)?;
            return Ok(Selection::Column { col });
        }
        (false, false) => {}
    }

    let row = index(raw.row, raw)?;
    let col = index(raw.col, raw)?;
    let row2 = index(raw.row2, raw)?;
    let col2 = index(raw.col2, raw)?;
    if let Some(err) = out_of_rows(row.max(row2)) {
        return Err(err);
    }

    let spans_all_rows = row_count > 0 && row == 0 && row2 == row_count - 1;
    if spans_all_rows && col == col2 {
        return Ok(Selection::Column { col });
    }
    // A whole-span selection over several columns never comes out of the
    // single-column document; it falls through to Range.
    if !spans_all_rows && row == row2 && col == col2 {
        return Ok(Selection::Cell { row, col });
    }
    Ok(Selection::Range { from_row: row, from_col: col, to_row: row2, to_col: col2 })
}

fn index(value: i64, raw: RawSelection) -> Result<usize, SelectionError> {
    usize::try_from(value).map_err(|_| SelectionError::NegativeIndex(raw))
}

impl Selection {
    pub fn cell(row: usize, col: usize) -> Self {
        Selection::Cell { row, col }
    }

    pub fn range(from_row: usize, from_col: usize, to_row: usize, to_col: usize) -> Self {
        Selection::Range { from_row, from_col, to_row, to_col }
    }

    pub fn row(row: usize) -> Self {
        Selection::Row { row }
    }

    pub fn column(col: usize) -> Self {
        Selection::Column { col }
    }

    /// The single address whose style answers "what does this selection
    /// show". Mixed styles inside a range are not detected.
    pub fn representative(&self) -> CellAddr {
        match *self {
            Selection::Cell { row, col } => CellAddr::new(row, col),
            Selection::Range { from_row, from_col, to_row, to_col } => {
                CellAddr::new(from_row.min(to_row), from_col.min(to_col))
            }
            Selection::Row { row } => CellAddr::new(row, 0),
            Selection::Column { col } => CellAddr::new(0, col),
        }
    }

    /// Inclusive bounds `((min_row, min_col), (max_row, max_col))` clipped
    /// to a `rows` x `cols` grid, or `None` when nothing of the selection
    /// lies inside it.
    pub fn bounds(&self, rows: usize, cols: usize) -> Option<(CellAddr, CellAddr)> {
        if rows == 0 || cols == 0 {
            return None;
        }
        let (min, max) = match *self {
            Selection::Cell { row, col } => (CellAddr::new(row, col), CellAddr::new(row, col)),
            Selection::Range { from_row, from_col, to_row, to_col } => (
                CellAddr::new(from_row.min(to_row), from_col.min(to_col)),
                CellAddr::new(from_row.max(to_row), from_col.max(to_col)),
            ),
            Selection::Row { row } => (CellAddr::new(row, 0), CellAddr::new(row, cols - 1)),
            Selection::Column { col } => (CellAddr::new(0, col), CellAddr::new(rows - 1, col)),
        };
        if min.row >= rows || min.col >= cols {
            return None;
        }
        Some((min, CellAddr::new(max.row.min(rows - 1), max.col.min(cols - 1))))
    }

    /// Whether the whole selection lies inside a `rows` x `cols` grid.
    pub fn fits(&self, rows: usize, cols: usize) -> bool {
        match *self {
            Selection::Cell { row, col } => row < rows && col < cols,
            Selection::Range { from_row, from_col, to_row, to_col } => {
                from_row.max(to_row) < rows && from_col.max(to_col) < cols
            }
            Selection::Row { row } => row < rows && cols > 0,
            Selection::Column { col } => col < cols && rows > 0,
        }
    }

    /// Every address the selection covers, in row-major order.
    ///
    /// `Row` expands over `0..cols`, `Column` over `0..rows`; `Cell` and
    /// `Range` are clipped to the grid.
    pub fn addresses(&self, rows: usize, cols: usize) -> Vec<CellAddr> {
        let Some((min, max)) = self.bounds(rows, cols) else {
            return Vec::new();
        };
        let height = max.row - min.row + 1;
        let width = max.col - min.col + 1;
        let mut out = Vec::with_capacity(height.saturating_mul(width));
        for row in min.row..=max.row {
            for col in min.col..=max.col {
                out.push(CellAddr::new(row, col));
            }
        }
        out
    }

    pub fn contains(&self, addr: CellAddr, rows: usize, cols: usize) -> bool {
        match self.bounds(rows, cols) {
            Some((min, max)) => {
                addr.row >= min.row && addr.row <= max.row && addr.col >= min.col && addr.col <= max.col
            }
            None => false,
        }
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Selection::Cell { row, col } => write!(f, "{}", CellAddr::new(row, col)),
            Selection::Range { from_row, from_col, to_row, to_col } => write!(
                f,
                "{}:{}",
                CellAddr::new(from_row.min(to_row), from_col.min(to_col)),
                CellAddr::new(from_row.max(to_row), from_col.max(to_col)),
            ),
            Selection::Row { row } => write!(f, "row {}", row + 1),
            Selection::Column { col } => write!(f, "column {}", col_to_letters(col)),
        }
    }
}
