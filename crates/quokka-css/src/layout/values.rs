//! Used-value resolution for layout.
//!
//! [§ 6.1.3 Used values](https://www.w3.org/TR/CSS2/cascade.html#used-value)
//!
//! "Computed values are processed as far as possible without formatting the
//! document. Some values, however, can only be determined when the document
//! is being laid out."

use crate::style::{AutoLength, BorderSide, ComputedStyle, LengthValue, Sides};

use super::box_model::{EdgeSizes, Rect};

/// [§ 10.1 Definition of "containing block"](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)
///
/// The rectangle a box resolves percentages and positions against.
/// `height` is `None` while it still depends on content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainingBlock {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width, always definite.
    pub width: f32,
    /// Height, if definite.
    pub height: Option<f32>,
}

impl ContainingBlock {
    /// A containing block with a definite height.
    #[must_use]
    pub const fn from_rect(rect: Rect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: Some(rect.height),
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// The rectangle, with an indefinite height taken as zero.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height.unwrap_or(0.0))
    }
}

/// Padding widths. Percentages refer to the containing block's width;
/// negative values are ignored.
///
/// [§ 8.4 Padding properties](https://www.w3.org/TR/CSS2/box.html#padding-properties)
///
/// "Unlike margin properties, values for padding values cannot be negative."
#[must_use]
pub fn resolve_padding(style: &ComputedStyle, cb_width: f32) -> EdgeSizes {
    let p = style.padding.map(|len| len.resolve(cb_width).max(0.0));
    EdgeSizes {
        top: p.top,
        right: p.right,
        bottom: p.bottom,
        left: p.left,
    }
}

/// Used border widths; `none` and `hidden` sides are zero.
#[must_use]
pub fn resolve_border(style: &ComputedStyle) -> EdgeSizes {
    let b = style.border.map(BorderSide::used_width);
    EdgeSizes {
        top: b.top,
        right: b.right,
        bottom: b.bottom,
        left: b.left,
    }
}

/// Margins with `auto` preserved as `None`.
///
/// [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
///
/// "The percentage is calculated with respect to the width of the generated
/// box's containing block. Note that this is true for 'margin-top' and
/// 'margin-bottom' as well."
#[must_use]
pub fn resolve_margins(style: &ComputedStyle, cb_width: f32) -> Sides<Option<f32>> {
    style.margin.map(|m| m.resolve(cb_width))
}

/// Margins with `auto` treated as zero.
#[must_use]
pub fn resolve_margins_or_zero(style: &ComputedStyle, cb_width: f32) -> EdgeSizes {
    let m = resolve_margins(style, cb_width);
    EdgeSizes {
        top: m.top.unwrap_or(0.0),
        right: m.right.unwrap_or(0.0),
        bottom: m.bottom.unwrap_or(0.0),
        left: m.left.unwrap_or(0.0),
    }
}

/// Specified `width`, or `None` for `auto`.
///
/// [§ 10.2 Content width](https://www.w3.org/TR/CSS2/visudet.html#the-width-property)
///
/// "Negative values for 'width' are illegal." They are treated as `auto`.
#[must_use]
pub fn specified_width(style: &ComputedStyle, cb_width: f32) -> Option<f32> {
    style.width.resolve(cb_width).filter(|w| *w >= 0.0)
}

/// Specified `height`, or `None` when `auto` or a percentage of an
/// indefinite containing block height.
///
/// [§ 10.5 Content height](https://www.w3.org/TR/CSS2/visudet.html#the-height-property)
///
/// "Negative values for 'height' are illegal."
#[must_use]
pub fn specified_height(style: &ComputedStyle, cb_height: Option<f32>) -> Option<f32> {
    style
        .height
        .resolve_definite(cb_height)
        .filter(|h| *h >= 0.0)
}

/// [§ 10.4 Minimum and maximum widths](https://www.w3.org/TR/CSS2/visudet.html#min-max-widths)
///
/// Clamp a tentative content width. "If the resulting width is smaller than
/// 'min-width', the rules above are applied again, but this time using the
/// value of 'min-width' as the computed value for 'width'." Min wins over max.
#[must_use]
pub fn clamp_width(style: &ComputedStyle, width: f32, cb_width: f32) -> f32 {
    let max = style
        .max_width
        .map(|m| m.resolve(cb_width))
        .filter(|m| *m >= 0.0);
    let min = style.min_width.resolve(cb_width).max(0.0);
    let capped = max.map_or(width, |m| width.min(m));
    capped.max(min)
}

/// [§ 10.7 Minimum and maximum heights](https://www.w3.org/TR/CSS2/visudet.html#min-max-heights)
///
/// Percentages of an indefinite containing block height are ignored
/// (`min-height` becomes 0, `max-height` becomes none).
#[must_use]
pub fn clamp_height(style: &ComputedStyle, height: f32, cb_height: Option<f32>) -> f32 {
    let max = style
        .max_height
        .and_then(|m| m.resolve_definite(cb_height))
        .filter(|m| *m >= 0.0);
    let min = style
        .min_height
        .resolve_definite(cb_height)
        .unwrap_or(0.0)
        .max(0.0);
    let capped = max.map_or(height, |m| height.min(m));
    capped.max(min)
}

/// Whether a length resolves to exactly zero for every basis.
#[must_use]
pub fn is_zero_length(len: LengthValue) -> bool {
    match len {
        LengthValue::Px(px) => px == 0.0,
        LengthValue::Percent(pct) => pct == 0.0,
    }
}

/// `height` is `auto` or zero.
#[must_use]
pub fn is_auto_or_zero_height(style: &ComputedStyle) -> bool {
    match style.height {
        AutoLength::Auto => true,
        AutoLength::Length(len) => is_zero_length(len),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Display;

    #[test]
    fn test_negative_width_is_auto() {
        let mut style = ComputedStyle::with_display(Display::Block);
        style.width = AutoLength::px(-10.0);
        assert_eq!(specified_width(&style, 100.0), None);
    }

    #[test]
    fn test_min_wins_over_max() {
        let mut style = ComputedStyle::with_display(Display::Block);
        style.min_width = LengthValue::Px(200.0);
        style.max_width = Some(LengthValue::Px(100.0));
        assert!((clamp_width(&style, 150.0, 400.0) - 200.0).abs() < 0.01);
    }

    #[test]
    fn test_percent_height_needs_definite_basis() {
        let mut style = ComputedStyle::with_display(Display::Block);
        style.height = AutoLength::percent(50.0);
        assert_eq!(specified_height(&style, None), None);
        assert_eq!(specified_height(&style, Some(300.0)), Some(150.0));
    }
}
