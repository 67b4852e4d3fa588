//! Render bridge between the style overlay and a grid widget.
//!
//! The widget is abstracted as a [`GridSurface`]. A [`GridView`] owns the
//! surface plus the injected cell renderer, and redraws in two named
//! phases: an optimistic inline-style patch of visible cells, then a
//! reconcile pass on the next animation frame.

mod bridge;
mod html;
mod memory;
mod renderer;
mod surface;

pub use bridge::{FrameScheduler, GridView, InstallOutcome, RedrawStats};
pub use html::HtmlSurface;
pub use memory::{CellElement, MemorySurface};
pub use renderer::{CellRenderer, OverlayRenderer};
pub use surface::{css_text, GridSurface};
