//! CSS length values
//!
//! [§ 4.3.2 Lengths](https://www.w3.org/TR/CSS2/syndata.html#length-units)
//!
//! Computed lengths reach layout as absolute pixels or as percentages that
//! still need a basis. Relative units are resolved by the host's cascade.

use serde::{Deserialize, Serialize};

/// User agent default font size.
/// [§ 15.7 Font size](https://www.w3.org/TR/CSS2/fonts.html#font-size-props)
pub const DEFAULT_FONT_SIZE_PX: f32 = 16.0;

/// [§ 4.3.2 Lengths](https://www.w3.org/TR/CSS2/syndata.html#length-units)
/// "Lengths refer to horizontal or vertical measurements."
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LengthValue {
    /// Absolute pixels.
    Px(f32),
    /// [§ 4.3.3 Percentages](https://www.w3.org/TR/CSS2/syndata.html#percentage-units)
    /// "Percentage values are always relative to another value, for example
    /// a length."
    Percent(f32),
}

impl Default for LengthValue {
    fn default() -> Self {
        Self::ZERO
    }
}

impl LengthValue {
    /// `0px`.
    pub const ZERO: Self = Self::Px(0.0);

    /// Resolve against a basis (percentages), producing pixels.
    #[must_use]
    pub fn resolve(self, basis: f32) -> f32 {
        match self {
            Self::Px(px) => px,
            Self::Percent(pct) => basis * pct / 100.0,
        }
    }

    /// Resolve against a basis that may be indefinite.
    ///
    /// [§ 10.5 Content height](https://www.w3.org/TR/CSS2/visudet.html#the-height-property)
    ///
    /// "If the height of the containing block is not specified explicitly
    /// (i.e., it depends on content height), and this element is not
    /// absolutely positioned, the value computes to 'auto'."
    #[must_use]
    pub fn resolve_definite(self, basis: Option<f32>) -> Option<f32> {
        match self {
            Self::Px(px) => Some(px),
            Self::Percent(pct) => basis.map(|b| b * pct / 100.0),
        }
    }

    /// Whether the length is a percentage.
    #[must_use]
    pub const fn is_percent(self) -> bool {
        matches!(self, Self::Percent(_))
    }
}

/// A length that may be `auto`.
///
/// [§ 10.2 Content width](https://www.w3.org/TR/CSS2/visudet.html#the-width-property)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutoLength {
    /// "The width depends on the values of other properties."
    #[default]
    Auto,
    /// An explicit length or percentage.
    Length(LengthValue),
}

impl AutoLength {
    /// Shorthand for an absolute pixel length.
    #[must_use]
    pub const fn px(px: f32) -> Self {
        Self::Length(LengthValue::Px(px))
    }

    /// Shorthand for a percentage.
    #[must_use]
    pub const fn percent(pct: f32) -> Self {
        Self::Length(LengthValue::Percent(pct))
    }

    /// Returns true for `auto`.
    #[must_use]
    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Resolve to pixels, or `None` for `auto`.
    #[must_use]
    pub fn resolve(self, basis: f32) -> Option<f32> {
        match self {
            Self::Auto => None,
            Self::Length(len) => Some(len.resolve(basis)),
        }
    }

    /// Resolve against a possibly indefinite basis; indefinite percentages
    /// behave as `auto`.
    #[must_use]
    pub fn resolve_definite(self, basis: Option<f32>) -> Option<f32> {
        match self {
            Self::Auto => None,
            Self::Length(len) => len.resolve_definite(basis),
        }
    }
}
