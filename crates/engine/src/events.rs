//! Event types for editor change notifications.
//!
//! The render bridge listens to these to decide what to repaint; tests use
//! [`EventCollector`] to check ordering and revision numbering.

use labsheet_core::{CellAddr, Selection};

/// Events emitted by the template editor.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// The current selection changed (None = cleared).
    SelectionChanged(Option<Selection>),

    /// A formatting action replaced the overlay.
    StylesChanged(StylesChangedEvent),

    /// The text of one row changed.
    ContentChanged(ContentChangedEvent),

    /// Content and overlay were replaced wholesale (load/reload).
    DocumentReplaced { revision: u64 },
}

/// Emitted once per formatting action.
#[derive(Debug, Clone, PartialEq)]
pub struct StylesChangedEvent {
    /// Overlay revision produced by this action.
    /// INVARIANT: strictly increasing across StylesChanged/DocumentReplaced.
    pub revision: u64,
    /// Selection the action was applied to.
    pub selection: Selection,
    /// Every address the patch was merged into, row-major.
    pub cells: Vec<CellAddr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentChangedEvent {
    pub row: usize,
    pub text: String,
}

/// Callback type for receiving editor events.
pub type EventCallback = Box<dyn FnMut(&EditorEvent)>;

/// Simple event collector for testing.
#[derive(Default)]
pub struct EventCollector {
    events: Vec<EditorEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: EditorEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[EditorEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Filter to only StylesChanged events.
    pub fn styles_changed(&self) -> Vec<&StylesChangedEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                EditorEvent::StylesChanged(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    /// Filter to only ContentChanged events.
    pub fn content_changed(&self) -> Vec<&ContentChangedEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                EditorEvent::ContentChanged(c) => Some(c),
                _ => None,
            })
            .collect()
    }
}
