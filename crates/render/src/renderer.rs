use std::rc::Rc;

use labsheet_core::CellAddr;
use labsheet_engine::{ResolvedStyle, StyleOverlay};

use crate::surface::GridSurface;

/// Per-cell render callback handed to a [`crate::GridView`].
pub trait CellRenderer {
    /// Installation key; installing a renderer with the same name replaces
    /// the previous one.
    fn name(&self) -> &str;

    fn render(&self, surface: &mut dyn GridSurface, addr: CellAddr, text: &str);
}

/// Default text rendering followed by the overlay's inline style.
///
/// Holds the overlay it was built from; the view builds a new one whenever
/// the editor swaps its overlay, so a renderer never reads a stale map.
pub struct OverlayRenderer {
    overlay: Rc<StyleOverlay>,
    defaults: ResolvedStyle,
}

impl OverlayRenderer {
    pub const NAME: &'static str = "styleOverlay";

    pub fn new(overlay: Rc<StyleOverlay>, defaults: ResolvedStyle) -> Self {
        Self { overlay, defaults }
    }

    pub fn overlay(&self) -> &Rc<StyleOverlay> {
        &self.overlay
    }

    /// Resolved style for a cell with an overlay entry, None otherwise.
    pub fn style_for(&self, addr: CellAddr) -> Option<ResolvedStyle> {
        self.overlay.get(addr).map(|patch| patch.resolve(&self.defaults))
    }
}

impl CellRenderer for OverlayRenderer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn render(&self, surface: &mut dyn GridSurface, addr: CellAddr, text: &str) {
        surface.render_default(addr, text);
        if let Some(style) = self.style_for(addr) {
            surface.apply_inline_style(addr, &style);
        }
    }
}
