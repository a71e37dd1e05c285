//! Font metrics provider contract.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."
//!
//! Layout never shapes or rasterizes glyphs. It asks a [`FontMetrics`]
//! implementation for advances and vertical metrics and treats the answers
//! as a pure function of `(text, font)`.

use crate::style::FontRef;

/// Text measurement interface used during layout.
///
/// Implementations must be deterministic for the duration of a layout pass.
pub trait FontMetrics {
    /// Total advance width of `text` set in `font`, without letter or word
    /// spacing.
    fn text_width(&self, text: &str, font: &FontRef) -> f32;

    /// Distance from the baseline to the top of the font's content area.
    fn ascent(&self, font: &FontRef) -> f32;

    /// Distance from the baseline to the bottom of the content area,
    /// positive downward.
    fn descent(&self, font: &FontRef) -> f32;

    /// Extra gap the font recommends between lines.
    fn line_gap(&self, font: &FontRef) -> f32;

    /// [§ 4.3.2 Lengths](https://www.w3.org/TR/CSS2/syndata.html#length-units)
    ///
    /// "The 'x-height' is so called because it is often equal to the height
    /// of the lowercase 'x'. However, an 'ex' is defined even for fonts that
    /// do not contain an 'x'." Used for `vertical-align: middle`.
    fn x_height(&self, font: &FontRef) -> f32 {
        font.size * 0.5
    }

    /// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
    ///
    /// Used value of `line-height: normal`: ascent plus descent plus the
    /// font's line gap.
    fn normal_line_height(&self, font: &FontRef) -> f32 {
        self.ascent(font) + self.descent(font) + self.line_gap(font)
    }
}

/// Approximate font metrics using fixed ratios of the font size.
///
/// Every character advances 0.6em; ascent is 0.8em, descent 0.2em and the
/// line gap 0.2em, so `line-height: normal` is 1.2em. Used when no font data
/// is available and in tests, where predictable geometry matters more than
/// fidelity.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateFontMetrics;

impl ApproximateFontMetrics {
    const CHAR_WIDTH_RATIO: f32 = 0.6;
    const ASCENT_RATIO: f32 = 0.8;
    const DESCENT_RATIO: f32 = 0.2;
    const LINE_GAP_RATIO: f32 = 0.2;
}

impl FontMetrics for ApproximateFontMetrics {
    fn text_width(&self, text: &str, font: &FontRef) -> f32 {
        text.chars().count() as f32 * font.size * Self::CHAR_WIDTH_RATIO
    }

    fn ascent(&self, font: &FontRef) -> f32 {
        font.size * Self::ASCENT_RATIO
    }

    fn descent(&self, font: &FontRef) -> f32 {
        font.size * Self::DESCENT_RATIO
    }

    fn line_gap(&self, font: &FontRef) -> f32 {
        font.size * Self::LINE_GAP_RATIO
    }
}
