//! CSS Computed Style
//!
//! [§ 6.1.2 Computed values](https://www.w3.org/TR/CSS2/cascade.html#computed-value)
//!
//! "Specified values are resolved to computed values during the cascade."
//!
//! The cascade runs outside this crate. Layout receives one immutable
//! [`ComputedStyle`] per box and never writes to it.

use serde::{Deserialize, Serialize};

use super::display::Display;
use super::keywords::{
    BorderCollapse, CaptionSide, Clear, Direction, EmptyCells, Float, ListStyleType, Overflow,
    Position, TableLayout, TextAlign, TextTransform, Visibility, WhiteSpace,
};
use super::values::{
    AutoLength, BorderSide, BorderSpacing, ColorValue, FontRef, LengthValue, LineHeight, Sides,
    TextDecoration, VerticalAlign,
};

/// Computed styles for one box.
///
/// Every field holds its CSS 2.1 initial value by default, so a document
/// only needs to state what differs (`#[serde(default)]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputedStyle {
    /// [§ 9.2.4 'display'](https://www.w3.org/TR/CSS2/visuren.html#display-prop)
    pub display: Display,
    /// [§ 9.3.1 'position'](https://www.w3.org/TR/CSS2/visuren.html#choose-position)
    pub position: Position,
    /// [§ 9.5.1 'float'](https://www.w3.org/TR/CSS2/visuren.html#float-position)
    pub float: Float,
    /// [§ 9.5.2 'clear'](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
    pub clear: Clear,
    /// [§ 11.1.1 'overflow'](https://www.w3.org/TR/CSS2/visufx.html#overflow)
    pub overflow: Overflow,
    /// [§ 11.2 'visibility'](https://www.w3.org/TR/CSS2/visufx.html#visibility)
    ///
    /// Inherited: yes
    pub visibility: Visibility,
    /// [§ 9.9.1 'z-index'](https://www.w3.org/TR/CSS2/visuren.html#z-index), `None` is `auto`.
    pub z_index: Option<i32>,
    /// Group opacity in `0.0..=1.0`.
    pub opacity: f32,

    /// [§ 10.2 'width'](https://www.w3.org/TR/CSS2/visudet.html#the-width-property)
    pub width: AutoLength,
    /// [§ 10.5 'height'](https://www.w3.org/TR/CSS2/visudet.html#the-height-property)
    pub height: AutoLength,
    /// [§ 10.4 'min-width'](https://www.w3.org/TR/CSS2/visudet.html#min-max-widths)
    pub min_width: LengthValue,
    /// [§ 10.4 'max-width'](https://www.w3.org/TR/CSS2/visudet.html#min-max-widths), `None` is `none`.
    pub max_width: Option<LengthValue>,
    /// [§ 10.7 'min-height'](https://www.w3.org/TR/CSS2/visudet.html#min-max-heights)
    pub min_height: LengthValue,
    /// [§ 10.7 'max-height'](https://www.w3.org/TR/CSS2/visudet.html#min-max-heights), `None` is `none`.
    pub max_height: Option<LengthValue>,

    /// [§ 9.3.2 Box offsets](https://www.w3.org/TR/CSS2/visuren.html#position-props):
    /// 'top', 'right', 'bottom', 'left'.
    pub inset: Sides<AutoLength>,
    /// [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
    pub margin: Sides<AutoLength>,
    /// [§ 8.4 Padding properties](https://www.w3.org/TR/CSS2/box.html#padding-properties)
    pub padding: Sides<LengthValue>,
    /// [§ 8.5 Border properties](https://www.w3.org/TR/CSS2/box.html#border-properties)
    pub border: Sides<BorderSide>,
    /// Uniform corner radius in px, carried through to border draw commands.
    pub border_radius: f32,

    /// [§ 14.1 'color'](https://www.w3.org/TR/CSS2/colors.html#colors)
    ///
    /// Inherited: yes
    pub color: ColorValue,
    /// [§ 14.2.1 'background-color'](https://www.w3.org/TR/CSS2/colors.html#background-properties)
    pub background_color: ColorValue,
    /// [§ 14.2.1 'background-image'](https://www.w3.org/TR/CSS2/colors.html#background-properties),
    /// as an image provider reference.
    pub background_image: Option<String>,

    /// Resolved font face and size.
    ///
    /// Inherited: yes
    pub font: FontRef,
    /// [§ 10.8.1 'line-height'](https://www.w3.org/TR/CSS2/visudet.html#propdef-line-height)
    ///
    /// Inherited: yes
    pub line_height: LineHeight,
    /// [§ 10.8.1 'vertical-align'](https://www.w3.org/TR/CSS2/visudet.html#propdef-vertical-align)
    pub vertical_align: VerticalAlign,
    /// [§ 16.2 'text-align'](https://www.w3.org/TR/CSS2/text.html#alignment-prop)
    ///
    /// Inherited: yes
    pub text_align: TextAlign,
    /// [§ 16.1 'text-indent'](https://www.w3.org/TR/CSS2/text.html#indentation-prop)
    ///
    /// Inherited: yes
    pub text_indent: LengthValue,
    /// [§ 16.6 'white-space'](https://www.w3.org/TR/CSS2/text.html#white-space-prop)
    ///
    /// Inherited: yes
    pub white_space: WhiteSpace,
    /// [§ 16.4 'letter-spacing'](https://www.w3.org/TR/CSS2/text.html#spacing-props), px
    /// added after each character; `normal` is `0`.
    ///
    /// Inherited: yes
    pub letter_spacing: f32,
    /// [§ 16.4 'word-spacing'](https://www.w3.org/TR/CSS2/text.html#spacing-props), px
    /// added to each space; `normal` is `0`.
    ///
    /// Inherited: yes
    pub word_spacing: f32,
    /// [§ 16.5 'text-transform'](https://www.w3.org/TR/CSS2/text.html#caps-prop)
    ///
    /// Inherited: yes
    pub text_transform: TextTransform,
    /// [§ 16.3.1 'text-decoration'](https://www.w3.org/TR/CSS2/text.html#lining-striking-props)
    pub text_decoration: TextDecoration,
    /// [§ 9.10 'direction'](https://www.w3.org/TR/CSS2/visuren.html#direction)
    ///
    /// Inherited: yes
    pub direction: Direction,

    /// [§ 17.6 'border-collapse'](https://www.w3.org/TR/CSS2/tables.html#borders)
    ///
    /// Inherited: yes
    pub border_collapse: BorderCollapse,
    /// [§ 17.6.1 'border-spacing'](https://www.w3.org/TR/CSS2/tables.html#separated-borders)
    ///
    /// Inherited: yes
    pub border_spacing: BorderSpacing,
    /// [§ 17.4.1 'caption-side'](https://www.w3.org/TR/CSS2/tables.html#caption-position)
    ///
    /// Inherited: yes
    pub caption_side: CaptionSide,
    /// [§ 17.6.1.1 'empty-cells'](https://www.w3.org/TR/CSS2/tables.html#empty-and-invisible)
    ///
    /// Inherited: yes
    pub empty_cells: EmptyCells,
    /// [§ 17.5.2 'table-layout'](https://www.w3.org/TR/CSS2/tables.html#width-layout)
    pub table_layout: TableLayout,

    /// [§ 12.6.2 'list-style-type'](https://www.w3.org/TR/CSS2/generate.html#list-style)
    ///
    /// Inherited: yes
    pub list_style_type: ListStyleType,
    /// First ordinal of an ordered list; `None` counts from 1 (or from the
    /// item count when reversed).
    pub list_start: Option<i32>,
    /// Ordered list counts down instead of up.
    pub list_reversed: bool,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: Display::Inline,
            position: Position::Static,
            float: Float::None,
            clear: Clear::None,
            overflow: Overflow::Visible,
            visibility: Visibility::Visible,
            z_index: None,
            opacity: 1.0,
            width: AutoLength::Auto,
            height: AutoLength::Auto,
            min_width: LengthValue::ZERO,
            max_width: None,
            min_height: LengthValue::ZERO,
            max_height: None,
            inset: Sides::all(AutoLength::Auto),
            margin: Sides::all(AutoLength::px(0.0)),
            padding: Sides::all(LengthValue::ZERO),
            border: Sides::all(BorderSide::NONE),
            border_radius: 0.0,
            color: ColorValue::BLACK,
            background_color: ColorValue::TRANSPARENT,
            background_image: None,
            font: FontRef::default(),
            line_height: LineHeight::Normal,
            vertical_align: VerticalAlign::Baseline,
            text_align: TextAlign::Left,
            text_indent: LengthValue::ZERO,
            white_space: WhiteSpace::Normal,
            letter_spacing: 0.0,
            word_spacing: 0.0,
            text_transform: TextTransform::None,
            text_decoration: TextDecoration::NONE,
            direction: Direction::Ltr,
            border_collapse: BorderCollapse::Separate,
            border_spacing: BorderSpacing::default(),
            caption_side: CaptionSide::Top,
            empty_cells: EmptyCells::Show,
            table_layout: TableLayout::Auto,
            list_style_type: ListStyleType::Disc,
            list_start: None,
            list_reversed: false,
        }
    }
}

impl ComputedStyle {
    /// Initial values with the given `display`.
    #[must_use]
    pub fn with_display(display: Display) -> Self {
        Self {
            display,
            ..Self::default()
        }
    }

    /// [§ 6.2 Inheritance](https://www.w3.org/TR/CSS2/cascade.html#inheritance)
    ///
    /// Style for an anonymous box: inherited properties come from `parent`,
    /// everything else takes its initial value.
    ///
    /// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    ///
    /// "The properties of anonymous boxes are inherited from the enclosing
    /// non-anonymous box. Non-inherited properties have their initial value."
    #[must_use]
    pub fn inherit_from(parent: &Self, display: Display) -> Self {
        Self {
            display,
            visibility: parent.visibility,
            color: parent.color,
            font: parent.font.clone(),
            line_height: parent.line_height,
            text_align: parent.text_align,
            text_indent: parent.text_indent,
            white_space: parent.white_space,
            letter_spacing: parent.letter_spacing,
            word_spacing: parent.word_spacing,
            text_transform: parent.text_transform,
            direction: parent.direction,
            border_collapse: parent.border_collapse,
            border_spacing: parent.border_spacing,
            caption_side: parent.caption_side,
            empty_cells: parent.empty_cells,
            list_style_type: parent.list_style_type,
            ..Self::default()
        }
    }

    /// Floated or absolutely positioned: removed from normal flow.
    ///
    /// [§ 9.3 Positioning schemes](https://www.w3.org/TR/CSS2/visuren.html#positioning-scheme)
    #[must_use]
    pub const fn is_out_of_flow(&self) -> bool {
        self.is_floated() || self.position.is_absolutely_positioned()
    }

    /// `float` is `left` or `right`.
    #[must_use]
    pub const fn is_floated(&self) -> bool {
        !matches!(self.float, Float::None)
    }

    /// [§ 9.9.1 Specifying the stack level](https://www.w3.org/TR/CSS2/visuren.html#z-index)
    ///
    /// Positioned boxes with an integer `z-index` establish a stacking
    /// context; so does group opacity.
    #[must_use]
    pub fn creates_stacking_context(&self) -> bool {
        (self.position.is_positioned() && self.z_index.is_some()) || self.opacity < 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_inherits_only_inherited_properties() {
        let mut parent = ComputedStyle::with_display(Display::Block);
        parent.color = ColorValue::rgb(255, 0, 0);
        parent.white_space = WhiteSpace::Pre;
        parent.background_color = ColorValue::rgb(0, 0, 255);
        parent.padding = Sides::all(LengthValue::Px(10.0));

        let anon = ComputedStyle::inherit_from(&parent, Display::Block);
        assert_eq!(anon.color, parent.color);
        assert_eq!(anon.white_space, WhiteSpace::Pre);
        assert!(anon.background_color.is_transparent());
        assert_eq!(anon.padding.left, LengthValue::ZERO);
    }

    #[test]
    fn test_partial_json_uses_initial_values() {
        let style: ComputedStyle =
            serde_json::from_str(r#"{"display":"block","width":{"length":{"px":120.0}}}"#)
                .unwrap();
        assert_eq!(style.display, Display::Block);
        assert_eq!(style.width, AutoLength::px(120.0));
        assert_eq!(style.position, Position::Static);
        assert!((style.opacity - 1.0).abs() < f32::EPSILON);
    }
}
