//! Wire payloads for the style endpoint and the save endpoint.
//!
//! Incoming style maps are parsed leniently: a malformed key or field is
//! logged and skipped, the rest of the entry still loads. Outgoing maps
//! always carry a canonical `"<n>px"` font size on every entry.

use labsheet_core::CellAddr;
use labsheet_engine::{DocumentContent, FontSize, FontStyle, FontWeight, StyleOverlay, StylePatch};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The only document region the backend currently knows about
pub const DEFAULT_SECTION: &str = "header";

/// Body of the save request. Always the full document: content and the
/// whole overlay replace what the backend has.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavePayload {
    pub data: Vec<Vec<String>>,
    pub styles: Map<String, Value>,
    pub section: String,
}

impl SavePayload {
    pub fn build(
        content: &DocumentContent,
        overlay: &StyleOverlay,
        section: &str,
        default_size: FontSize,
    ) -> Self {
        let mut styles = Map::new();
        for (addr, patch) in overlay.iter() {
            styles.insert(addr.key(), patch_to_wire(patch));
        }
        normalize_font_sizes(&mut styles, default_size);

        Self {
            data: content.to_wire(),
            styles,
            section: section.to_string(),
        }
    }
}

fn patch_to_wire(patch: &StylePatch) -> Value {
    let mut obj = Map::new();
    if let Some(w) = patch.font_weight {
        obj.insert("fontWeight".into(), Value::String(w.as_str().into()));
    }
    if let Some(s) = patch.font_style {
        obj.insert("fontStyle".into(), Value::String(s.as_str().into()));
    }
    if let Some(size) = patch.font_size {
        obj.insert("fontSize".into(), Value::String(size.to_css()));
    }
    Value::Object(obj)
}

/// Rewrite every entry's `fontSize` to `"<n>px"`.
///
/// Bare numbers get the unit, strings are re-canonicalized, and a missing
/// or unreadable size becomes `default_size`.
pub fn normalize_font_sizes(styles: &mut Map<String, Value>, default_size: FontSize) {
    for (key, entry) in styles.iter_mut() {
        let Some(obj) = entry.as_object_mut() else {
            log::warn!("style entry '{}' is not an object, sent as-is", key);
            continue;
        };
        let size = obj
            .get("fontSize")
            .and_then(wire_font_size)
            .unwrap_or(default_size);
        obj.insert("fontSize".into(), Value::String(size.to_css()));
    }
}

fn wire_font_size(value: &Value) -> Option<FontSize> {
    match value {
        Value::Number(n) => n.as_f64().and_then(|n| FontSize::from_f64(n).ok()),
        Value::String(s) => FontSize::parse_css(s).ok(),
        _ => None,
    }
}

/// Parse the style endpoint's response (`{ "styles": { "<row>-<col>": {...} } }`)
/// into an overlay. A missing or null `styles` means a fresh template.
pub fn parse_styles_response(response: &Value) -> StyleOverlay {
    let mut overlay = StyleOverlay::new();
    let Some(styles) = response.get("styles").and_then(Value::as_object) else {
        if !response.get("styles").map_or(true, Value::is_null) {
            log::warn!("style response has a non-object 'styles' field, ignoring");
        }
        return overlay;
    };

    for (key, entry) in styles {
        let addr = match CellAddr::from_key(key) {
            Ok(addr) => addr,
            Err(e) => {
                log::warn!("skipping style entry: {}", e);
                continue;
            }
        };
        let Some(fields) = entry.as_object() else {
            log::warn!("skipping style entry '{}': not an object", key);
            continue;
        };
        overlay.merge_at(addr, &patch_from_wire(key, fields));
    }
    overlay
}

fn patch_from_wire(key: &str, fields: &Map<String, Value>) -> StylePatch {
    let mut patch = StylePatch::new();
    if let Some(v) = fields.get("fontWeight") {
        patch.font_weight = v.as_str().and_then(FontWeight::parse);
        if patch.font_weight.is_none() {
            log::warn!("'{}': ignoring fontWeight {}", key, v);
        }
    }
    if let Some(v) = fields.get("fontStyle") {
        patch.font_style = v.as_str().and_then(FontStyle::parse);
        if patch.font_style.is_none() {
            log::warn!("'{}': ignoring fontStyle {}", key, v);
        }
    }
    if let Some(v) = fields.get("fontSize") {
        patch.font_size = wire_font_size(v);
        if patch.font_size.is_none() {
            log::warn!("'{}': ignoring fontSize {}", key, v);
        }
    }
    patch
}
