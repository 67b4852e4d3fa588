//! Template editor state: document text, style overlay, and the live
//! selection, plus the formatting actions the toolbar drives.

use std::rc::Rc;

use labsheet_core::{classify, RawSelection, Selection, SelectionError};

use crate::content::{ContentError, DocumentContent};
use crate::events::{ContentChangedEvent, EditorEvent, EventCallback, StylesChangedEvent};
use crate::overlay::StyleOverlay;
use crate::style::{FontSize, ResolvedStyle, StyleError, StylePatch};

/// What the toolbar shows for the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarState {
    /// False when nothing is selected; every button is disabled then
    pub enabled: bool,
    pub bold: bool,
    pub italic: bool,
    pub font_size: FontSize,
}

pub struct TemplateEditor {
    content: DocumentContent,
    /// Replaced, never mutated in place; renderers hold clones of the Rc.
    overlay: Rc<StyleOverlay>,
    selection: Option<Selection>,
    cols: usize,
    defaults: ResolvedStyle,
    revision: u64,
    listeners: Vec<EventCallback>,
}

impl TemplateEditor {
    pub fn new(content: DocumentContent, overlay: StyleOverlay, cols: usize) -> Self {
        Self {
            content,
            overlay: Rc::new(overlay),
            selection: None,
            cols,
            defaults: ResolvedStyle::default(),
            revision: 0,
            listeners: Vec::new(),
        }
    }

    /// Override the base style used when resolving absent fields.
    pub fn with_defaults(mut self, defaults: ResolvedStyle) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn subscribe(&mut self, callback: EventCallback) {
        self.listeners.push(callback);
    }

    pub fn content(&self) -> &DocumentContent {
        &self.content
    }

    pub fn overlay(&self) -> &Rc<StyleOverlay> {
        &self.overlay
    }

    pub fn defaults(&self) -> &ResolvedStyle {
        &self.defaults
    }

    pub fn rows(&self) -> usize {
        self.content.row_count()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Classify a raw widget selection and make it the live selection.
    /// Selections reaching outside the grid are rejected and the previous
    /// selection is kept.
    pub fn select_raw(&mut self, raw: RawSelection) -> Result<Selection, SelectionError> {
        let selection = classify(raw, self.rows())?;
        if !selection.fits(self.rows(), self.cols) {
            return Err(SelectionError::ColumnOutOfBounds { selection: raw, cols: self.cols });
        }
        self.select(selection);
        Ok(selection)
    }

    pub fn select(&mut self, selection: Selection) {
        log::debug!("selection: {}", selection);
        self.selection = Some(selection);
        self.emit(EditorEvent::SelectionChanged(Some(selection)));
    }

    pub fn clear_selection(&mut self) {
        if self.selection.take().is_some() {
            self.emit(EditorEvent::SelectionChanged(None));
        }
    }

    /// Stored style of the selection's representative cell.
    pub fn effective_style(&self) -> Option<StylePatch> {
        self.selection.map(|sel| self.overlay.effective_style(&sel))
    }

    pub fn toolbar_state(&self) -> ToolbarState {
        let resolved = self
            .effective_style()
            .unwrap_or_default()
            .resolve(&self.defaults);
        ToolbarState {
            enabled: self.selection.is_some(),
            bold: resolved.is_bold(),
            italic: resolved.is_italic(),
            font_size: resolved.font_size,
        }
    }

    // =========================================================================
    // Formatting actions
    // =========================================================================

    /// Flip bold based on the representative cell and apply the flipped
    /// weight to the whole selection. No-op without a selection.
    pub fn toggle_bold(&mut self) -> Option<StylesChangedEvent> {
        let selection = self.selection?;
        let current = self.overlay.effective_style(&selection).resolve(&self.defaults);
        self.apply(selection, StylePatch::weight(current.font_weight.toggled()))
    }

    pub fn toggle_italic(&mut self) -> Option<StylesChangedEvent> {
        let selection = self.selection?;
        let current = self.overlay.effective_style(&selection).resolve(&self.defaults);
        self.apply(selection, StylePatch::style(current.font_style.toggled()))
    }

    /// Assign an absolute font size to the whole selection.
    pub fn set_font_size(&mut self, px: u32) -> Result<Option<StylesChangedEvent>, StyleError> {
        let size = FontSize::new(px)?;
        Ok(match self.selection {
            Some(selection) => self.apply(selection, StylePatch::size(size)),
            None => None,
        })
    }

    /// Merge an arbitrary patch into the selection.
    pub fn apply(&mut self, selection: Selection, patch: StylePatch) -> Option<StylesChangedEvent> {
        if patch.is_empty() {
            return None;
        }
        let next = self.overlay.apply_patch(&selection, &patch, self.rows(), self.cols);
        self.overlay = Rc::new(next);
        self.revision += 1;

        let event = StylesChangedEvent {
            revision: self.revision,
            selection,
            cells: selection.addresses(self.rows(), self.cols),
        };
        log::debug!(
            "styles r{}: {:?} -> {} ({} cells)",
            event.revision,
            patch,
            selection,
            event.cells.len()
        );
        self.emit(EditorEvent::StylesChanged(event.clone()));
        Some(event)
    }

    // =========================================================================
    // Content
    // =========================================================================

    pub fn set_cell_text(&mut self, row: usize, text: &str) -> Result<(), ContentError> {
        self.content.set(row, text)?;
        self.emit(EditorEvent::ContentChanged(ContentChangedEvent {
            row,
            text: text.to_string(),
        }));
        Ok(())
    }

    /// Replace content and overlay after a load. The loaded overlay is
    /// merged into an empty map; the selection is kept if still in range.
    pub fn replace_document(&mut self, content: DocumentContent, loaded: &StyleOverlay) {
        let mut overlay = StyleOverlay::new();
        overlay.merge_from(loaded);
        self.content = content;
        self.overlay = Rc::new(overlay);
        self.revision += 1;

        let rows = self.rows();
        if let Some(sel) = self.selection {
            if !sel.fits(rows, self.cols) {
                self.selection = None;
            }
        }
        self.emit(EditorEvent::DocumentReplaced { revision: self.revision });
    }

    fn emit(&mut self, event: EditorEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventCollector;
    use crate::style::{FontStyle, FontWeight};
    use labsheet_core::CellAddr;
    use std::cell::RefCell;

    fn editor() -> TemplateEditor {
        TemplateEditor::new(DocumentContent::blank(8), StyleOverlay::new(), 1)
    }

    fn collect(editor: &mut TemplateEditor) -> Rc<RefCell<EventCollector>> {
        let collector = Rc::new(RefCell::new(EventCollector::new()));
        let sink = Rc::clone(&collector);
        editor.subscribe(Box::new(move |e| sink.borrow_mut().push(e.clone())));
        collector
    }

    #[test]
    fn test_actions_without_selection_are_noops() {
        let mut ed = editor();
        assert!(ed.toggle_bold().is_none());
        assert!(ed.toggle_italic().is_none());
        assert_eq!(ed.set_font_size(18), Ok(None));
        assert!(ed.overlay().is_empty());
        assert!(!ed.toolbar_state().enabled);
    }

    #[test]
    fn test_toggle_bold_twice_leaves_explicit_normal() {
        let mut ed = editor();
        ed.select(Selection::cell(3, 0));

        ed.toggle_bold();
        assert_eq!(
            ed.overlay().get(CellAddr::new(3, 0)).and_then(|p| p.font_weight),
            Some(FontWeight::Bold)
        );
        assert!(ed.toolbar_state().bold);

        ed.toggle_bold();
        assert_eq!(
            ed.overlay().get(CellAddr::new(3, 0)).and_then(|p| p.font_weight),
            Some(FontWeight::Normal)
        );
        assert!(!ed.toolbar_state().bold);
    }

    #[test]
    fn test_toggle_uses_representative_cell() {
        let mut ed = editor();
        ed.select(Selection::cell(2, 0));
        ed.toggle_bold();

        // Range anchored on the bold cell: whole range goes normal
        ed.select(Selection::range(4, 0, 2, 0));
        ed.toggle_bold();
        for row in 2..=4 {
            assert_eq!(
                ed.overlay().get(CellAddr::new(row, 0)).and_then(|p| p.font_weight),
                Some(FontWeight::Normal)
            );
        }
    }

    #[test]
    fn test_row_bold_then_cell_italic() {
        let mut ed = editor();
        ed.select_raw(RawSelection::new(2, -1, 2, 0)).unwrap();
        ed.toggle_bold();
        ed.select_raw(RawSelection::new(2, 0, 2, 0)).unwrap();
        ed.toggle_italic();

        let style = ed.effective_style().unwrap();
        assert_eq!(style.font_weight, Some(FontWeight::Bold));
        assert_eq!(style.font_style, Some(FontStyle::Italic));
        let toolbar = ed.toolbar_state();
        assert!(toolbar.bold && toolbar.italic);
    }

    #[test]
    fn test_font_size_is_absolute() {
        let mut ed = editor();
        ed.select(Selection::column(0));
        ed.set_font_size(20).unwrap();
        ed.select(Selection::cell(5, 0));
        ed.set_font_size(11).unwrap();

        assert_eq!(ed.toolbar_state().font_size.px(), 11);
        ed.select(Selection::cell(4, 0));
        assert_eq!(ed.toolbar_state().font_size.px(), 20);
        assert_eq!(ed.set_font_size(0), Err(StyleError::ZeroFontSize));
    }

    #[test]
    fn test_toolbar_uses_configured_default_size() {
        let mut ed = editor().with_defaults(ResolvedStyle::with_font_size(FontSize::new(12).unwrap()));
        ed.select(Selection::cell(0, 0));
        assert_eq!(ed.toolbar_state().font_size.px(), 12);
    }

    #[test]
    fn test_overlay_reference_replaced_on_write() {
        let mut ed = editor();
        ed.select(Selection::cell(0, 0));
        let before = Rc::clone(ed.overlay());
        ed.toggle_italic();
        assert!(!Rc::ptr_eq(&before, ed.overlay()));
        assert!(before.is_empty());
    }

    #[test]
    fn test_events_and_revisions() {
        let mut ed = editor();
        let events = collect(&mut ed);

        ed.select(Selection::row(1));
        ed.toggle_bold();
        ed.set_font_size(16).unwrap();
        ed.set_cell_text(1, "Sample ID").unwrap();

        let events = events.borrow();
        let styles = events.styles_changed();
        assert_eq!(styles.len(), 2);
        assert_eq!(styles[0].revision, 1);
        assert_eq!(styles[1].revision, 2);
        assert_eq!(styles[0].cells, vec![CellAddr::new(1, 0)]);
        assert_eq!(events.content_changed()[0].text, "Sample ID");
        assert_eq!(events.events()[0], EditorEvent::SelectionChanged(Some(Selection::row(1))));
    }

    #[test]
    fn test_select_raw_errors_keep_previous_selection() {
        let mut ed = editor();
        ed.select(Selection::cell(1, 0));
        assert!(ed.select_raw(RawSelection::new(-1, -1, 7, 0)).is_err());
        assert_eq!(ed.selection(), Some(Selection::cell(1, 0)));
    }

    #[test]
    fn test_select_raw_rejects_selections_outside_the_grid() {
        let mut ed = editor();
        ed.select(Selection::cell(1, 0));
        for raw in [
            RawSelection::new(0, 0, i64::MAX, 0),
            RawSelection::new(100, 0, 100, 0),
            RawSelection::new(8, -1, 8, 0),
        ] {
            assert!(matches!(ed.select_raw(raw), Err(SelectionError::RowOutOfBounds { rows: 8, .. })));
        }
        for raw in [RawSelection::new(2, 1, 2, 1), RawSelection::new(0, 0, 3, 4), RawSelection::new(-1, 5, 7, 5)] {
            assert_eq!(
                ed.select_raw(raw),
                Err(SelectionError::ColumnOutOfBounds { selection: raw, cols: 1 })
            );
        }
        assert_eq!(ed.selection(), Some(Selection::cell(1, 0)));
    }

    #[test]
    fn test_apply_outside_grid_writes_nothing() {
        let mut ed = editor();
        let event = ed.apply(Selection::cell(100, 0), StylePatch::weight(FontWeight::Bold));
        assert_eq!(event.map(|e| e.cells.len()), Some(0));
        assert!(ed.overlay().is_empty());
        ed.apply(Selection::range(6, 0, usize::MAX, 0), StylePatch::weight(FontWeight::Bold));
        assert_eq!(ed.overlay().len(), 2);
        assert!(ed.overlay().get(CellAddr::new(8, 0)).is_none());
    }

    #[test]
    fn test_replace_document_drops_range_reaching_past_new_rows() {
        let mut ed = editor();
        ed.select(Selection::range(0, 0, 5, 0));
        ed.replace_document(DocumentContent::from_rows(["a", "b"]), &StyleOverlay::new());
        assert_eq!(ed.selection(), None);

        ed.select(Selection::range(0, 0, 1, 0));
        ed.replace_document(DocumentContent::from_rows(["a", "b", "c"]), &StyleOverlay::new());
        assert_eq!(ed.selection(), Some(Selection::range(0, 0, 1, 0)));
    }

    #[test]
    fn test_replace_document_drops_out_of_range_selection() {
        let mut ed = editor();
        ed.select(Selection::cell(6, 0));
        let loaded = StyleOverlay::new().apply_patch(
            &Selection::cell(0, 0),
            &StylePatch::weight(FontWeight::Bold),
            2,
            1,
        );
        ed.replace_document(DocumentContent::from_rows(["a", "b"]), &loaded);
        assert_eq!(ed.selection(), None);
        assert_eq!(ed.rows(), 2);
        assert_eq!(ed.overlay().len(), 1);
        assert_eq!(ed.revision(), 1);
    }
}
