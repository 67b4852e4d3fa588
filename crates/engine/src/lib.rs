pub mod content;
pub mod editor;
pub mod events;
pub mod overlay;
pub mod style;

pub use content::{ContentError, DocumentContent};
pub use editor::{TemplateEditor, ToolbarState};
pub use overlay::StyleOverlay;
pub use style::{FontSize, FontStyle, FontWeight, ResolvedStyle, StyleError, StylePatch};
