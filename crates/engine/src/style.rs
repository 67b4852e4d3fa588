use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Font size used when a cell carries no explicit size
pub const DEFAULT_FONT_SIZE_PX: u32 = 14;

/// Unit suffix for font sizes on the wire
pub const FONT_SIZE_UNIT: &str = "px";

/// Font weight
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    /// Flip for the toolbar toggle: bold -> normal, normal -> bold
    pub fn toggled(self) -> Self {
        match self {
            FontWeight::Bold => FontWeight::Normal,
            FontWeight::Normal => FontWeight::Bold,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(FontWeight::Normal),
            "bold" => Some(FontWeight::Bold),
            _ => None,
        }
    }
}

/// Font style
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl FontStyle {
    pub fn toggled(self) -> Self {
        match self {
            FontStyle::Italic => FontStyle::Normal,
            FontStyle::Normal => FontStyle::Italic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(FontStyle::Normal),
            "italic" => Some(FontStyle::Italic),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    #[error("font size must be positive")]
    ZeroFontSize,
    #[error("invalid font size '{0}'")]
    InvalidFontSize(String),
}

/// Font size in pixels. Always positive.
///
/// Serialized as `"<n>px"`; deserializes from a bare number, `"<n>"` or
/// `"<n>px"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontSize(u32);

impl FontSize {
    pub fn new(px: u32) -> Result<Self, StyleError> {
        if px == 0 {
            return Err(StyleError::ZeroFontSize);
        }
        Ok(Self(px))
    }

    pub fn px(&self) -> u32 {
        self.0
    }

    /// Canonical wire form, e.g. `"14px"`
    pub fn to_css(&self) -> String {
        format!("{}{}", self.0, FONT_SIZE_UNIT)
    }

    /// Parse `"14px"`, `"14"` or `"14.0px"`. Fractional sizes round to the
    /// nearest pixel.
    pub fn parse_css(s: &str) -> Result<Self, StyleError> {
        let trimmed = s.trim();
        let number = trimmed.strip_suffix(FONT_SIZE_UNIT).unwrap_or(trimmed).trim_end();
        if let Ok(px) = number.parse::<u32>() {
            return Self::new(px);
        }
        match number.parse::<f64>() {
            Ok(n) => Self::from_f64(n).map_err(|_| StyleError::InvalidFontSize(s.to_string())),
            Err(_) => Err(StyleError::InvalidFontSize(s.to_string())),
        }
    }

    pub fn from_f64(n: f64) -> Result<Self, StyleError> {
        if !n.is_finite() || n > u32::MAX as f64 {
            return Err(StyleError::InvalidFontSize(n.to_string()));
        }
        let px = n.round();
        if px < 1.0 {
            return Err(StyleError::ZeroFontSize);
        }
        Self::new(px as u32)
    }
}

impl Default for FontSize {
    fn default() -> Self {
        Self(DEFAULT_FONT_SIZE_PX)
    }
}

impl std::fmt::Display for FontSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.0, FONT_SIZE_UNIT)
    }
}

impl Serialize for FontSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

impl<'de> Deserialize<'de> for FontSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawSize {
            Int(u64),
            Float(f64),
            Text(String),
        }

        let parsed = match RawSize::deserialize(deserializer)? {
            RawSize::Int(n) => u32::try_from(n)
                .map_err(|_| StyleError::InvalidFontSize(n.to_string()))
                .and_then(FontSize::new),
            RawSize::Float(n) => FontSize::from_f64(n),
            RawSize::Text(s) => FontSize::parse_css(&s),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}

/// Partial style record stored in the overlay.
///
/// A `None` field means "inherit the default"; defaults are never stored.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(default, rename_all = "camelCase")]
pub struct StylePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<FontSize>,
}

impl StylePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weight(font_weight: FontWeight) -> Self {
        Self { font_weight: Some(font_weight), ..Self::default() }
    }

    pub fn style(font_style: FontStyle) -> Self {
        Self { font_style: Some(font_style), ..Self::default() }
    }

    pub fn size(font_size: FontSize) -> Self {
        Self { font_size: Some(font_size), ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.font_weight.is_none() && self.font_style.is_none() && self.font_size.is_none()
    }

    /// Shallow merge: every field present in `other` overwrites ours,
    /// absent fields leave ours untouched.
    pub fn merge(&mut self, other: &StylePatch) {
        if let Some(w) = other.font_weight {
            self.font_weight = Some(w);
        }
        if let Some(s) = other.font_style {
            self.font_style = Some(s);
        }
        if let Some(size) = other.font_size {
            self.font_size = Some(size);
        }
    }

    /// Fill absent fields from `defaults`
    pub fn resolve(&self, defaults: &ResolvedStyle) -> ResolvedStyle {
        ResolvedStyle {
            font_weight: self.font_weight.unwrap_or(defaults.font_weight),
            font_style: self.font_style.unwrap_or(defaults.font_style),
            font_size: self.font_size.unwrap_or(defaults.font_size),
        }
    }
}

/// Fully defaulted style, produced only at the render/toolbar boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ResolvedStyle {
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub font_size: FontSize,
}

impl ResolvedStyle {
    /// Defaults with a custom base font size
    pub fn with_font_size(font_size: FontSize) -> Self {
        Self { font_size, ..Self::default() }
    }

    pub fn is_bold(&self) -> bool {
        self.font_weight == FontWeight::Bold
    }

    pub fn is_italic(&self) -> bool {
        self.font_style == FontStyle::Italic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_defaults() {
        let style = ResolvedStyle::default();
        assert_eq!(style.font_weight, FontWeight::Normal);
        assert_eq!(style.font_style, FontStyle::Normal);
        assert_eq!(style.font_size.px(), DEFAULT_FONT_SIZE_PX);
    }

    #[test]
    fn test_toggle_flips() {
        assert_eq!(FontWeight::Normal.toggled(), FontWeight::Bold);
        assert_eq!(FontWeight::Bold.toggled(), FontWeight::Normal);
        assert_eq!(FontStyle::Normal.toggled(), FontStyle::Italic);
        assert_eq!(FontStyle::Italic.toggled(), FontStyle::Normal);
    }

    #[test]
    fn test_font_size_parse() {
        assert_eq!(FontSize::parse_css("18px").unwrap().px(), 18);
        assert_eq!(FontSize::parse_css("18").unwrap().px(), 18);
        assert_eq!(FontSize::parse_css(" 12.6px ").unwrap().px(), 13);
        assert_eq!(FontSize::parse_css("0px"), Err(StyleError::ZeroFontSize));
        assert!(matches!(FontSize::parse_css("large"), Err(StyleError::InvalidFontSize(_))));
        assert!(FontSize::parse_css("-4px").is_err());
    }

    #[test]
    fn test_font_size_serde() {
        let size = FontSize::new(18).unwrap();
        assert_eq!(serde_json::to_value(size).unwrap(), serde_json::json!("18px"));

        let from_number: FontSize = serde_json::from_value(serde_json::json!(18)).unwrap();
        let from_bare: FontSize = serde_json::from_value(serde_json::json!("18")).unwrap();
        let from_css: FontSize = serde_json::from_value(serde_json::json!("18px")).unwrap();
        assert_eq!(from_number, size);
        assert_eq!(from_bare, size);
        assert_eq!(from_css, size);

        assert!(serde_json::from_value::<FontSize>(serde_json::json!(0)).is_err());
        assert!(serde_json::from_value::<FontSize>(serde_json::json!("big")).is_err());
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let patch = StylePatch::weight(FontWeight::Bold);
        assert_eq!(
            serde_json::to_value(patch).unwrap(),
            serde_json::json!({ "fontWeight": "bold" })
        );
        assert_eq!(serde_json::to_value(StylePatch::new()).unwrap(), serde_json::json!({}));
    }

    #[test]
    fn test_patch_deserializes_wire_form() {
        let patch: StylePatch = serde_json::from_value(serde_json::json!({
            "fontWeight": "bold",
            "fontStyle": "italic",
            "fontSize": "16px",
        }))
        .unwrap();
        assert_eq!(patch.font_weight, Some(FontWeight::Bold));
        assert_eq!(patch.font_style, Some(FontStyle::Italic));
        assert_eq!(patch.font_size, Some(FontSize::new(16).unwrap()));
    }

    #[test]
    fn test_merge_overwrites_present_fields_only() {
        let mut base = StylePatch::weight(FontWeight::Bold);
        base.merge(&StylePatch::style(FontStyle::Italic));
        assert_eq!(base.font_weight, Some(FontWeight::Bold));
        assert_eq!(base.font_style, Some(FontStyle::Italic));

        base.merge(&StylePatch::weight(FontWeight::Normal));
        assert_eq!(base.font_weight, Some(FontWeight::Normal));
        assert_eq!(base.font_style, Some(FontStyle::Italic));
        assert_eq!(base.font_size, None);
    }

    #[test]
    fn test_resolve_fills_defaults() {
        let patch = StylePatch::style(FontStyle::Italic);
        let defaults = ResolvedStyle::with_font_size(FontSize::new(12).unwrap());
        let resolved = patch.resolve(&defaults);
        assert!(!resolved.is_bold());
        assert!(resolved.is_italic());
        assert_eq!(resolved.font_size.px(), 12);
    }
}
