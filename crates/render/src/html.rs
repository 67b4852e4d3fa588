use labsheet_core::CellAddr;
use labsheet_engine::ResolvedStyle;

use crate::surface::{css_text, GridSurface};

/// Renders the grid as a static HTML table with inline styles.
/// Every cell is visible.
#[derive(Debug, Clone)]
pub struct HtmlSurface {
    rows: usize,
    cols: usize,
    cells: Vec<(String, Option<ResolvedStyle>)>,
}

impl HtmlSurface {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![(String::new(), None); rows * cols],
        }
    }

    fn slot(&mut self, addr: CellAddr) -> Option<&mut (String, Option<ResolvedStyle>)> {
        if addr.row >= self.rows || addr.col >= self.cols {
            return None;
        }
        self.cells.get_mut(addr.row * self.cols + addr.col)
    }

    pub fn to_html(&self) -> String {
        let mut out = String::from("<table class=\"labsheet\">\n");
        for row in 0..self.rows {
            out.push_str("  <tr>");
            for col in 0..self.cols {
                let (text, style) = &self.cells[row * self.cols + col];
                match style {
                    Some(style) => {
                        out.push_str(&format!("<td style=\"{}\">", css_text(style)));
                    }
                    None => out.push_str("<td>"),
                }
                out.push_str(&escape_html(text));
                out.push_str("</td>");
            }
            out.push_str("</tr>\n");
        }
        out.push_str("</table>\n");
        out
    }
}

impl GridSurface for HtmlSurface {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn render_default(&mut self, addr: CellAddr, text: &str) {
        if let Some(slot) = self.slot(addr) {
            *slot = (text.to_string(), None);
        }
    }

    fn apply_inline_style(&mut self, addr: CellAddr, style: &ResolvedStyle) {
        if let Some(slot) = self.slot(addr) {
            slot.1 = Some(*style);
        }
    }

    fn visible_cells(&self) -> Vec<CellAddr> {
        (0..self.rows)
            .flat_map(|row| (0..self.cols).map(move |col| CellAddr::new(row, col)))
            .collect()
    }

    fn is_visible(&self, addr: CellAddr) -> bool {
        addr.row < self.rows && addr.col < self.cols
    }
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
