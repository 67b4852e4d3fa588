use labsheet_core::CellAddr;
use labsheet_engine::ResolvedStyle;

/// The grid widget as the bridge sees it.
pub trait GridSurface {
    fn rows(&self) -> usize;
    fn cols(&self) -> usize;

    /// The widget's own text renderer. Resets the element, including any
    /// inline style left from an earlier pass.
    fn render_default(&mut self, addr: CellAddr, text: &str);

    /// Overwrite the inline style of an already rendered element.
    fn apply_inline_style(&mut self, addr: CellAddr, style: &ResolvedStyle);

    /// Cells the widget currently has materialized, row-major.
    fn visible_cells(&self) -> Vec<CellAddr>;

    fn is_visible(&self, addr: CellAddr) -> bool {
        self.visible_cells().contains(&addr)
    }
}

/// Inline CSS for a resolved style
pub fn css_text(style: &ResolvedStyle) -> String {
    format!(
        "font-weight: {}; font-style: {}; font-size: {}",
        style.font_weight.as_str(),
        style.font_style.as_str(),
        style.font_size.to_css()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use labsheet_engine::{FontSize, FontWeight};

    #[test]
    fn test_css_text() {
        let style = ResolvedStyle {
            font_weight: FontWeight::Bold,
            font_size: FontSize::new(18).unwrap(),
            ..ResolvedStyle::default()
        };
        assert_eq!(css_text(&style), "font-weight: bold; font-style: normal; font-size: 18px");
    }
}
