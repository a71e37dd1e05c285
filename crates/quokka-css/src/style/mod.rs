//! Computed style representation
//!
//! The per-box record layout reads. Values arrive already cascaded and
//! inherited; nothing in this module parses CSS text.
//!
//! - [CSS 2.1 § 6 Assigning property values](https://www.w3.org/TR/CSS2/cascade.html)
//! - [CSS 2.1 § 9.2.4 The 'display' property](https://www.w3.org/TR/CSS2/visuren.html#display-prop)

pub mod computed;
mod display;
pub mod keywords;
mod values;

// Re-export all public types
pub use computed::ComputedStyle;
pub use display::Display;
pub use keywords::{
    BorderCollapse, BorderStyle, CaptionSide, Clear, Direction, EmptyCells, Float, ListStyleType,
    Overflow, Position, TableLayout, TextAlign, TextTransform, Visibility, WhiteSpace,
};
pub use values::{
    AutoLength, BorderSide, BorderSpacing, ColorValue, DEFAULT_FONT_SIZE_PX, FontRef,
    LengthValue, LineHeight, Sides, TextDecoration, VerticalAlign,
};
