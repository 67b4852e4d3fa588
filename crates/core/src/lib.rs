//! Core types shared by every labsheet crate: cell addresses, the style
//! key codec, and selection descriptors.

pub mod addr;
pub mod selection;

pub use addr::{CellAddr, KeyError};
pub use selection::{classify, RawSelection, Selection, SelectionError};
