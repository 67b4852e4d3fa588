// Selection arguments for `labsheet format`
//
// Rows and columns are 1-based, the way `show` prints them. The raw form
// takes zero-based grid indices with -1 as the whole-span sentinel, exactly
// what the grid widget reports.

use labsheet_core::selection::WHOLE_SPAN;
use labsheet_core::RawSelection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionArg {
    /// `cell:R` or `cell:R,C`
    Cell { row: usize, col: usize },
    /// `row:R`
    Row(usize),
    /// `col:C` (number or letter)
    Column(usize),
    /// `range:R1:R2` in the first column
    Range { from: usize, to: usize },
    /// `raw:r,c,r2,c2`
    Raw(RawSelection),
}

impl SelectionArg {
    pub fn parse(s: &str) -> Result<Self, String> {
        let (kind, rest) = s
            .split_once(':')
            .ok_or_else(|| format!("invalid selection '{}': expected <kind>:<value>", s))?;

        match kind.to_ascii_lowercase().as_str() {
            "cell" => match rest.split_once(',') {
                Some((row, col)) => Ok(SelectionArg::Cell {
                    row: one_based(row, "row")?,
                    col: column(col)?,
                }),
                None => Ok(SelectionArg::Cell { row: one_based(rest, "row")?, col: 0 }),
            },
            "row" => Ok(SelectionArg::Row(one_based(rest, "row")?)),
            "col" | "column" => Ok(SelectionArg::Column(column(rest)?)),
            "range" => {
                let (from, to) = rest
                    .split_once(':')
                    .ok_or_else(|| format!("invalid range '{}': expected R1:R2", rest))?;
                let (from, to) = (one_based(from, "row")?, one_based(to, "row")?);
                Ok(SelectionArg::Range { from: from.min(to), to: from.max(to) })
            }
            "raw" => {
                let parts: Vec<i64> = rest
                    .split(',')
                    .map(|p| p.trim().parse::<i64>())
                    .collect::<Result<_, _>>()
                    .map_err(|_| format!("invalid raw selection '{}': expected r,c,r2,c2", rest))?;
                match parts.as_slice() {
                    &[row, col, row2, col2] => Ok(SelectionArg::Raw(RawSelection::new(row, col, row2, col2))),
                    _ => Err(format!("invalid raw selection '{}': expected 4 numbers", rest)),
                }
            }
            other => Err(format!(
                "unknown selection kind '{}' (expected cell, row, col, range or raw)",
                other
            )),
        }
    }

    /// The grid selection this argument stands for, before classification.
    pub fn to_raw(self, rows: usize, cols: usize) -> RawSelection {
        let last_row = rows.saturating_sub(1) as i64;
        let last_col = cols.saturating_sub(1) as i64;
        match self {
            SelectionArg::Cell { row, col } => {
                RawSelection::new(row as i64, col as i64, row as i64, col as i64)
            }
            SelectionArg::Row(row) => RawSelection::new(row as i64, WHOLE_SPAN, row as i64, last_col),
            SelectionArg::Column(col) => RawSelection::new(WHOLE_SPAN, col as i64, last_row, col as i64),
            SelectionArg::Range { from, to } => RawSelection::new(from as i64, 0, to as i64, 0),
            SelectionArg::Raw(raw) => raw,
        }
    }
}

/// Parse a 1-based number into a zero-based index. Indices stay within
/// `i64` so `to_raw` never wraps.
fn one_based(s: &str, what: &str) -> Result<usize, String> {
    match s.trim().parse::<i64>() {
        Ok(n) if n >= 1 => Ok((n - 1) as usize),
        _ => Err(format!("invalid {} '{}': expected a number starting at 1", what, s)),
    }
}

/// Column as a 1-based number or a letter label (A, B, ..., AA)
fn column(s: &str) -> Result<usize, String> {
    let s = s.trim();
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) {
        let n = s
            .bytes()
            .try_fold(0i64, |acc, c| {
                acc.checked_mul(26)?
                    .checked_add(i64::from(c.to_ascii_uppercase() - b'A' + 1))
            })
            .ok_or_else(|| format!("invalid column '{}': label too long", s))?;
        return Ok((n - 1) as usize);
    }
    one_based(s, "column")
}
