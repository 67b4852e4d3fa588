//! Sparse style overlay: cell address -> partial style.
//!
//! The overlay is independent of cell text. Writes expand a selection to
//! its addresses and merge a patch into each entry; reads answer for the
//! selection's representative cell only.

use std::collections::BTreeMap;

use labsheet_core::{CellAddr, Selection};
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::style::StylePatch;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleOverlay {
    entries: BTreeMap<CellAddr, StylePatch>,
}

impl StyleOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, addr: CellAddr) -> Option<&StylePatch> {
        self.entries.get(&addr)
    }

    /// Entries in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (CellAddr, &StylePatch)> {
        self.entries.iter().map(|(addr, patch)| (*addr, patch))
    }

    /// Stored style of the selection's representative cell, or an empty
    /// patch (all defaults) when that cell has no entry.
    pub fn effective_style(&self, selection: &Selection) -> StylePatch {
        self.entries
            .get(&selection.representative())
            .copied()
            .unwrap_or_default()
    }

    /// Merge `patch` into every address covered by `selection` and return
    /// the resulting overlay. `self` is left untouched.
    ///
    /// `rows`/`cols` bound the expansion of whole-row and whole-column
    /// selections.
    pub fn apply_patch(
        &self,
        selection: &Selection,
        patch: &StylePatch,
        rows: usize,
        cols: usize,
    ) -> StyleOverlay {
        let mut next = self.clone();
        if patch.is_empty() {
            return next;
        }
        for addr in selection.addresses(rows, cols) {
            next.merge_at(addr, patch);
        }
        next
    }

    /// Merge into a single entry, creating it when absent.
    pub fn merge_at(&mut self, addr: CellAddr, patch: &StylePatch) {
        if patch.is_empty() {
            return;
        }
        self.entries.entry(addr).or_default().merge(patch);
    }

    /// Merge every entry of `other` into this overlay.
    pub fn merge_from(&mut self, other: &StyleOverlay) {
        for (addr, patch) in other.iter() {
            self.merge_at(addr, patch);
        }
    }
}

impl FromIterator<(CellAddr, StylePatch)> for StyleOverlay {
    fn from_iter<I: IntoIterator<Item = (CellAddr, StylePatch)>>(iter: I) -> Self {
        let mut overlay = StyleOverlay::new();
        for (addr, patch) in iter {
            overlay.merge_at(addr, &patch);
        }
        overlay
    }
}

impl Serialize for StyleOverlay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (addr, patch) in &self.entries {
            map.serialize_entry(&addr.key(), patch)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StyleOverlay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, StylePatch>::deserialize(deserializer)?;
        let mut overlay = StyleOverlay::new();
        for (key, patch) in raw {
            let addr = CellAddr::from_key(&key).map_err(D::Error::custom)?;
            overlay.merge_at(addr, &patch);
        }
        Ok(overlay)
    }
}
