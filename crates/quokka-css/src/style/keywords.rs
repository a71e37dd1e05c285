//! Keyword-valued CSS 2.1 properties.
//!
//! Every enum here serializes with the exact CSS spelling (`pre-wrap`,
//! `line-through`, ...) both through serde and through `Display`.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// [§ 9.3.1 'position'](https://www.w3.org/TR/CSS2/visuren.html#choose-position)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Position {
    /// "The box is a normal box, laid out according to the normal flow."
    #[default]
    Static,
    /// "The box's position is calculated according to the normal flow.
    /// Then the box is offset relative to its normal position."
    Relative,
    /// "The box's position (and possibly size) is specified with the 'top',
    /// 'right', 'bottom', and 'left' properties."
    Absolute,
    /// "The box's position is calculated according to the 'absolute' model,
    /// but in addition, the box is fixed with respect to some reference."
    Fixed,
}

impl Position {
    /// `absolute` or `fixed`: out of flow.
    #[must_use]
    pub const fn is_absolutely_positioned(self) -> bool {
        matches!(self, Self::Absolute | Self::Fixed)
    }

    /// Anything but `static`.
    #[must_use]
    pub const fn is_positioned(self) -> bool {
        !matches!(self, Self::Static)
    }
}

/// [§ 9.5.1 'float'](https://www.w3.org/TR/CSS2/visuren.html#float-position)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Float {
    /// "The box is not floated."
    #[default]
    None,
    /// "The element generates a block box that is floated to the left."
    Left,
    /// "The element generates a block box that is floated to the right."
    Right,
}

/// [§ 9.5.2 'clear'](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Clear {
    /// "No constraint on the box's position with respect to floats."
    #[default]
    None,
    /// "Requires that the top border edge of the box be below the bottom
    /// outer edge of any left-floating boxes."
    Left,
    /// "Requires that the top border edge of the box be below the bottom
    /// outer edge of any right-floating boxes."
    Right,
    /// "Requires that the top border edge of the box be below the bottom
    /// outer edge of any right-floating and left-floating boxes."
    Both,
}

/// [§ 11.1.1 'overflow'](https://www.w3.org/TR/CSS2/visufx.html#overflow)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Overflow {
    /// "Content is not clipped."
    #[default]
    Visible,
    /// "Content is clipped and no scrolling user interface should be provided."
    Hidden,
    /// "Content is clipped and ... a scrolling mechanism should be provided."
    Scroll,
    /// "The behavior of the 'auto' value is user agent-dependent."
    Auto,
}

/// [§ 11.2 'visibility'](https://www.w3.org/TR/CSS2/visufx.html#visibility)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Visibility {
    /// "The generated box is visible."
    #[default]
    Visible,
    /// "The generated box is invisible (fully transparent, nothing is
    /// drawn), but still affects layout."
    Hidden,
    /// "Used for dynamic row/column effects in tables."
    Collapse,
}

/// [§ 16.2 'text-align'](https://www.w3.org/TR/CSS2/text.html#alignment-prop)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TextAlign {
    /// Lines start at the left edge of the line box.
    #[default]
    Left,
    /// Lines end at the right edge of the line box.
    Right,
    /// Lines are centered within the line box.
    Center,
    /// Extra space is distributed between words, except on the last line.
    Justify,
}

/// [§ 16.6 'white-space'](https://www.w3.org/TR/CSS2/text.html#white-space-prop)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum WhiteSpace {
    /// "This value directs user agents to collapse sequences of white space,
    /// and break lines as necessary to fill line boxes."
    #[default]
    Normal,
    /// "This value prevents user agents from collapsing sequences of white
    /// space. Lines are only broken at preserved newline characters."
    Pre,
    /// "This value collapses white space as for 'normal', but suppresses
    /// line breaks within text."
    Nowrap,
    /// "This value prevents user agents from collapsing sequences of white
    /// space. Lines are broken at preserved newline characters, and as
    /// necessary to fill line boxes."
    PreWrap,
    /// "This value directs user agents to collapse sequences of white space.
    /// Lines are broken at preserved newline characters, and as necessary
    /// to fill line boxes."
    PreLine,
}

impl WhiteSpace {
    /// Spaces and tabs collapse.
    #[must_use]
    pub const fn collapses_spaces(self) -> bool {
        matches!(self, Self::Normal | Self::Nowrap | Self::PreLine)
    }

    /// Newlines are forced breaks.
    #[must_use]
    pub const fn preserves_newlines(self) -> bool {
        matches!(self, Self::Pre | Self::PreWrap | Self::PreLine)
    }

    /// Lines may break at soft wrap opportunities.
    #[must_use]
    pub const fn wraps(self) -> bool {
        matches!(self, Self::Normal | Self::PreWrap | Self::PreLine)
    }
}

/// [§ 16.5 'text-transform'](https://www.w3.org/TR/CSS2/text.html#caps-prop)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TextTransform {
    /// "No capitalization effects."
    #[default]
    None,
    /// "Puts the first character of each word in uppercase."
    Capitalize,
    /// "Puts all characters of each word in uppercase."
    Uppercase,
    /// "Puts all characters of each word in lowercase."
    Lowercase,
}

/// [§ 9.10 'direction'](https://www.w3.org/TR/CSS2/visuren.html#direction)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Direction {
    /// Left-to-right.
    #[default]
    Ltr,
    /// Right-to-left.
    Rtl,
}

/// [§ 8.5.3 'border-style'](https://www.w3.org/TR/CSS2/box.html#border-style-properties)
///
/// Variants are declared in ascending border-conflict priority, so the
/// derived iteration order is the §17.6.2.1 ranking.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum BorderStyle {
    /// "No border; the computed border width is zero."
    #[default]
    None,
    /// "Same as 'none', except in terms of border conflict resolution for
    /// table elements."
    Hidden,
    /// "The border makes the box look as though it were embedded in the canvas."
    Inset,
    /// "The border looks as though it were carved into the canvas."
    Groove,
    /// "The opposite of 'inset'."
    Outset,
    /// "The opposite of 'groove'."
    Ridge,
    /// "The border is a series of dots."
    Dotted,
    /// "The border is a series of short line segments."
    Dashed,
    /// "The border is a single line segment."
    Solid,
    /// "The border is two solid lines."
    Double,
}

impl BorderStyle {
    /// Whether the style draws anything at all.
    #[must_use]
    pub const fn is_visible(self) -> bool {
        !matches!(self, Self::None | Self::Hidden)
    }

    /// [§ 17.6.2.1 Border conflict resolution](https://www.w3.org/TR/CSS2/tables.html#border-conflict-resolution)
    ///
    /// "If the border styles differ only in color, ... the style with the
    /// highest priority wins: 'double', 'solid', 'dashed', 'dotted', 'ridge',
    /// 'outset', 'groove', and the lowest: 'inset'."
    #[must_use]
    pub const fn collapse_priority(self) -> u8 {
        match self {
            Self::None | Self::Hidden => 0,
            Self::Inset => 1,
            Self::Groove => 2,
            Self::Outset => 3,
            Self::Ridge => 4,
            Self::Dotted => 5,
            Self::Dashed => 6,
            Self::Solid => 7,
            Self::Double => 8,
        }
    }
}

/// [§ 17.6 'border-collapse'](https://www.w3.org/TR/CSS2/tables.html#borders)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum BorderCollapse {
    /// "The separated borders model."
    #[default]
    Separate,
    /// "The collapsing borders model."
    Collapse,
}

/// [§ 17.4.1 'caption-side'](https://www.w3.org/TR/CSS2/tables.html#caption-position)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CaptionSide {
    /// "Positions the caption box above the table box."
    #[default]
    Top,
    /// "Positions the caption box below the table box."
    Bottom,
}

/// [§ 17.6.1.1 'empty-cells'](https://www.w3.org/TR/CSS2/tables.html#empty-and-invisible)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum EmptyCells {
    /// Borders and backgrounds are drawn around empty cells.
    #[default]
    Show,
    /// "No borders or backgrounds are drawn around/behind empty cells."
    Hide,
}

/// [§ 17.5.2 'table-layout'](https://www.w3.org/TR/CSS2/tables.html#width-layout)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TableLayout {
    /// "Use any automatic table layout algorithm."
    #[default]
    Auto,
    /// "Use the fixed table layout algorithm."
    Fixed,
}

/// [§ 12.6.2 'list-style-type'](https://www.w3.org/TR/CSS2/generate.html#list-style)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ListStyleType {
    /// A filled circle.
    #[default]
    Disc,
    /// A hollow circle.
    Circle,
    /// A filled square.
    Square,
    /// "Decimal numbers, beginning with 1."
    Decimal,
    /// "Lowercase ascii letters (a, b, c, ... z)."
    LowerAlpha,
    /// "Uppercase ascii letters (A, B, C, ... Z)."
    UpperAlpha,
    /// "Lowercase roman numerals (i, ii, iii, iv, v, etc.)."
    LowerRoman,
    /// "Uppercase roman numerals (I, II, III, IV, V, etc.)."
    UpperRoman,
    /// No marker.
    None,
}
