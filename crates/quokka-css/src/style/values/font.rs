//! Font and text values
//!
//! [§ 15 Fonts](https://www.w3.org/TR/CSS2/fonts.html)
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)

use serde::{Deserialize, Serialize};

use super::length::{DEFAULT_FONT_SIZE_PX, LengthValue};

/// Reference to a resolved font face at a size.
///
/// The engine never loads fonts; this is the key handed to the metrics
/// provider and copied into text draw commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontRef {
    /// [§ 15.3 'font-family'](https://www.w3.org/TR/CSS2/fonts.html#font-family-prop)
    pub family: String,
    /// [§ 15.7 'font-size'](https://www.w3.org/TR/CSS2/fonts.html#font-size-props), in px.
    pub size: f32,
    /// [§ 15.6 'font-weight'](https://www.w3.org/TR/CSS2/fonts.html#font-boldness), 100-900.
    pub weight: u16,
    /// [§ 15.4 'font-style'](https://www.w3.org/TR/CSS2/fonts.html#font-styling): italic or oblique.
    pub italic: bool,
}

impl Default for FontRef {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: DEFAULT_FONT_SIZE_PX,
            weight: 400,
            italic: false,
        }
    }
}

impl FontRef {
    /// Same face at a different size.
    #[must_use]
    pub fn with_size(&self, size: f32) -> Self {
        Self {
            size,
            ..self.clone()
        }
    }
}

/// [§ 10.8.1 'line-height'](https://www.w3.org/TR/CSS2/visudet.html#propdef-line-height)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineHeight {
    /// "Tells user agents to set the used value to a 'reasonable' value
    /// based on the font of the element."
    #[default]
    Normal,
    /// "The used value of the property is this number multiplied by the
    /// element's font size."
    Number(f32),
    /// "The specified length is used in the calculation of the line box
    /// height." Percentages are relative to the element's font size.
    Length(LengthValue),
}

impl LineHeight {
    /// Used line height for an element with `font_size`, given the font's
    /// `normal` line height from the metrics provider.
    #[must_use]
    pub fn resolve(self, font_size: f32, normal: f32) -> f32 {
        match self {
            Self::Normal => normal,
            Self::Number(n) => (n * font_size).max(0.0),
            Self::Length(len) => len.resolve(font_size).max(0.0),
        }
    }
}

/// [§ 10.8.1 'vertical-align'](https://www.w3.org/TR/CSS2/visudet.html#propdef-vertical-align)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerticalAlign {
    /// "Align the baseline of the box with the baseline of the parent box."
    #[default]
    Baseline,
    /// "Lower the baseline of the box to the proper position for subscripts
    /// of the parent's box."
    Sub,
    /// "Raise the baseline of the box to the proper position for
    /// superscripts of the parent's box."
    Super,
    /// "Align the top of the box with the top of the parent's content area."
    TextTop,
    /// "Align the bottom of the box with the bottom of the parent's content area."
    TextBottom,
    /// "Align the vertical midpoint of the box with the baseline of the
    /// parent box plus half the x-height of the parent."
    Middle,
    /// "Align the top of the aligned subtree with the top of the line box."
    Top,
    /// "Align the bottom of the aligned subtree with the bottom of the line box."
    Bottom,
    /// Raise (positive) or lower (negative) by a length; percentages refer
    /// to the element's own line height.
    Length(LengthValue),
}

/// [§ 16.3.1 'text-decoration'](https://www.w3.org/TR/CSS2/text.html#lining-striking-props)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextDecoration {
    /// "Each line of text is underlined."
    pub underline: bool,
    /// "Each line of text has a line above it."
    pub overline: bool,
    /// "Each line of text has a line through the middle."
    pub line_through: bool,
}

impl TextDecoration {
    /// `text-decoration: none`.
    pub const NONE: Self = Self {
        underline: false,
        overline: false,
        line_through: false,
    };

    /// `text-decoration: underline`.
    pub const UNDERLINE: Self = Self {
        underline: true,
        overline: false,
        line_through: false,
    };

    /// Returns true when no line is drawn.
    #[must_use]
    pub const fn is_none(self) -> bool {
        !self.underline && !self.overline && !self.line_through
    }
}
