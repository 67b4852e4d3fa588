use std::rc::Rc;

use labsheet_core::CellAddr;
use labsheet_engine::{DocumentContent, ResolvedStyle, StyleOverlay};

use crate::renderer::{CellRenderer, OverlayRenderer};
use crate::surface::GridSurface;

/// Next-frame redraw request. Requests made before the frame fires
/// collapse into one.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameScheduler {
    pending: bool,
}

impl FrameScheduler {
    /// Returns true if this call scheduled a new frame.
    pub fn request(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the pending request, if any.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedrawStats {
    /// Optimistic passes run
    pub optimistic_passes: u32,
    /// Cells touched by optimistic passes
    pub optimistic_cells: u32,
    /// Authoritative full re-renders
    pub reconciles: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// No renderer with this name was installed before
    Installed,
    /// A renderer with the same name was swapped out
    Replaced,
}

/// Grid widget wrapper: a surface plus its injected cell renderer.
pub struct GridView<S: GridSurface> {
    surface: S,
    renderer: Box<dyn CellRenderer>,
    overlay: Rc<StyleOverlay>,
    defaults: ResolvedStyle,
    scheduler: FrameScheduler,
    stats: RedrawStats,
}

impl<S: GridSurface> GridView<S> {
    /// Build the view with an [`OverlayRenderer`] over `overlay`.
    pub fn new(surface: S, overlay: Rc<StyleOverlay>, defaults: ResolvedStyle) -> Self {
        let renderer = OverlayRenderer::new(Rc::clone(&overlay), defaults);
        Self {
            surface,
            renderer: Box::new(renderer),
            overlay,
            defaults,
            scheduler: FrameScheduler::default(),
            stats: RedrawStats::default(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn renderer_name(&self) -> &str {
        self.renderer.name()
    }

    pub fn stats(&self) -> RedrawStats {
        self.stats
    }

    pub fn has_pending_frame(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Put `renderer` in the single renderer slot and schedule a redraw.
    /// Installing the same name twice leaves one renderer and at most one
    /// pending frame.
    pub fn install_renderer(&mut self, renderer: Box<dyn CellRenderer>) -> InstallOutcome {
        let outcome = if renderer.name() == self.renderer.name() {
            InstallOutcome::Replaced
        } else {
            InstallOutcome::Installed
        };
        log::debug!("renderer '{}' {:?}", renderer.name(), outcome);
        self.renderer = renderer;
        self.scheduler.request();
        outcome
    }

    /// Point the view at a new overlay. Rebuilds the overlay renderer when
    /// the reference actually changed; returns whether it did.
    pub fn set_overlay(&mut self, overlay: &Rc<StyleOverlay>) -> bool {
        if Rc::ptr_eq(&self.overlay, overlay) {
            return false;
        }
        self.overlay = Rc::clone(overlay);
        self.install_renderer(Box::new(OverlayRenderer::new(Rc::clone(overlay), self.defaults)));
        true
    }

    /// Phase one: patch inline styles of the affected cells that are
    /// visible right now. Returns the number of cells patched.
    pub fn paint_optimistic(&mut self, affected: &[CellAddr]) -> usize {
        let mut painted = 0;
        for &addr in affected {
            if !self.surface.is_visible(addr) {
                continue;
            }
            let style = self
                .overlay
                .get(addr)
                .map(|patch| patch.resolve(&self.defaults))
                .unwrap_or(self.defaults);
            self.surface.apply_inline_style(addr, &style);
            painted += 1;
        }
        self.stats.optimistic_passes += 1;
        self.stats.optimistic_cells += painted as u32;
        painted
    }

    /// Phase two, part one: ask for a full re-render on the next frame.
    pub fn request_reconcile(&mut self) -> bool {
        self.scheduler.request()
    }

    /// Phase two, part two: the frame callback. Runs the pending reconcile,
    /// if any; returns whether it did.
    pub fn on_animation_frame(&mut self, content: &DocumentContent) -> bool {
        if !self.scheduler.take() {
            return false;
        }
        self.reconcile(content);
        true
    }

    /// Authoritative redraw of every visible cell through the renderer.
    pub fn reconcile(&mut self, content: &DocumentContent) {
        let visible = self.surface.visible_cells();
        for addr in &visible {
            // Only column 0 carries text in the single-column document
            let text = if addr.col == 0 { content.get(addr.row).unwrap_or("") } else { "" };
            self.renderer.render(&mut self.surface, *addr, text);
        }
        self.stats.reconciles += 1;
        log::debug!("reconciled {} cells", visible.len());
    }

    /// Both phases after a style write: adopt the new overlay, paint the
    /// affected visible cells now, and schedule the reconcile.
    pub fn after_style_change(&mut self, overlay: &Rc<StyleOverlay>, affected: &[CellAddr]) -> usize {
        self.set_overlay(overlay);
        let painted = self.paint_optimistic(affected);
        self.request_reconcile();
        painted
    }
}
