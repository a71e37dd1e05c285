//! CSS value types
//!
//! - [§ 4.3 Values](https://www.w3.org/TR/CSS2/syndata.html#values)
//! - [§ 8 Box model](https://www.w3.org/TR/CSS2/box.html)
//! - [§ 15 Fonts](https://www.w3.org/TR/CSS2/fonts.html)

mod border;
mod color;
mod font;
mod length;

pub use border::{BorderSide, BorderSpacing, Sides};
pub use color::ColorValue;
pub use font::{FontRef, LineHeight, TextDecoration, VerticalAlign};
pub use length::{AutoLength, DEFAULT_FONT_SIZE_PX, LengthValue};
