use std::collections::BTreeMap;

use labsheet_core::CellAddr;
use labsheet_engine::ResolvedStyle;

use crate::surface::GridSurface;

/// One rendered cell element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellElement {
    pub text: String,
    /// Inline style; None = widget stylesheet defaults
    pub style: Option<ResolvedStyle>,
    /// Times the default renderer ran for this element
    pub renders: u32,
    /// Times the inline style was patched
    pub style_writes: u32,
}

/// In-memory stand-in for a virtualized grid widget.
///
/// Only rows inside the viewport count as visible. Elements persist after
/// scrolling out, just like recycled DOM nodes, so stale styles stay until
/// the next render of that cell.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    rows: usize,
    cols: usize,
    first_visible_row: usize,
    visible_rows: usize,
    elements: BTreeMap<CellAddr, CellElement>,
}

impl MemorySurface {
    /// Surface with every row visible
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            first_visible_row: 0,
            visible_rows: rows,
            elements: BTreeMap::new(),
        }
    }

    /// Show `visible_rows` rows starting at `first_row`
    pub fn with_viewport(mut self, first_row: usize, visible_rows: usize) -> Self {
        self.scroll_to(first_row, visible_rows);
        self
    }

    pub fn scroll_to(&mut self, first_row: usize, visible_rows: usize) {
        self.first_visible_row = first_row.min(self.rows);
        self.visible_rows = visible_rows;
    }

    pub fn element(&self, addr: CellAddr) -> Option<&CellElement> {
        self.elements.get(&addr)
    }

    pub fn elements(&self) -> impl Iterator<Item = (CellAddr, &CellElement)> {
        self.elements.iter().map(|(a, e)| (*a, e))
    }

    pub fn total_renders(&self) -> u32 {
        self.elements.values().map(|e| e.renders).sum()
    }
}

impl GridSurface for MemorySurface {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn render_default(&mut self, addr: CellAddr, text: &str) {
        let element = self.elements.entry(addr).or_default();
        element.text = text.to_string();
        element.style = None;
        element.renders += 1;
    }

    fn apply_inline_style(&mut self, addr: CellAddr, style: &ResolvedStyle) {
        // Patching a cell the widget never drew is a no-op, as on a real grid
        if let Some(element) = self.elements.get_mut(&addr) {
            element.style = Some(*style);
            element.style_writes += 1;
        }
    }

    fn visible_cells(&self) -> Vec<CellAddr> {
        let end = (self.first_visible_row + self.visible_rows).min(self.rows);
        (self.first_visible_row..end)
            .flat_map(|row| (0..self.cols).map(move |col| CellAddr::new(row, col)))
            .collect()
    }

    fn is_visible(&self, addr: CellAddr) -> bool {
        addr.col < self.cols
            && addr.row >= self.first_visible_row
            && addr.row < (self.first_visible_row + self.visible_rows).min(self.rows)
    }
}
