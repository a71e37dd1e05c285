//! Box edge and border values
//!
//! [§ 8 Box model](https://www.w3.org/TR/CSS2/box.html)

use serde::{Deserialize, Serialize};

use super::color::ColorValue;
use crate::style::keywords::BorderStyle;

/// A top/right/bottom/left quad of any per-side value.
///
/// Used for margins (`Sides<AutoLength>`), padding (`Sides<LengthValue>`),
/// borders (`Sides<BorderSide>`) and the `top`/`right`/`bottom`/`left`
/// offsets of positioned boxes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Sides<T> {
    /// Top side.
    pub top: T,
    /// Right side.
    pub right: T,
    /// Bottom side.
    pub bottom: T,
    /// Left side.
    pub left: T,
}

impl<T: Clone> Sides<T> {
    /// The same value on all four sides.
    pub fn all(value: T) -> Self {
        Self {
            top: value.clone(),
            right: value.clone(),
            bottom: value.clone(),
            left: value,
        }
    }
}

impl<T> Sides<T> {
    /// Apply `f` to every side.
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> Sides<U> {
        Sides {
            top: f(&self.top),
            right: f(&self.right),
            bottom: f(&self.bottom),
            left: f(&self.left),
        }
    }
}

/// [§ 8.5 Border properties](https://www.w3.org/TR/CSS2/box.html#border-properties)
///
/// One side's computed border: width, style and resolved color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderSide {
    /// [§ 8.5.1 'border-width'](https://www.w3.org/TR/CSS2/box.html#border-width-properties)
    pub width: f32,
    /// [§ 8.5.3 'border-style'](https://www.w3.org/TR/CSS2/box.html#border-style-properties)
    pub style: BorderStyle,
    /// [§ 8.5.2 'border-color'](https://www.w3.org/TR/CSS2/box.html#border-color-properties)
    pub color: ColorValue,
}

impl Default for BorderSide {
    fn default() -> Self {
        Self::NONE
    }
}

impl BorderSide {
    /// `border: none`.
    pub const NONE: Self = Self {
        width: 0.0,
        style: BorderStyle::None,
        color: ColorValue::BLACK,
    };

    /// A solid border of the given width and color.
    #[must_use]
    pub const fn solid(width: f32, color: ColorValue) -> Self {
        Self {
            width,
            style: BorderStyle::Solid,
            color,
        }
    }

    /// [§ 8.5.3](https://www.w3.org/TR/CSS2/box.html#border-style-properties)
    ///
    /// "none: No border; the computed border width is zero."
    /// "hidden: Same as 'none', except in terms of border conflict resolution
    /// for table elements."
    #[must_use]
    pub fn used_width(&self) -> f32 {
        if self.style.is_visible() {
            self.width.max(0.0)
        } else {
            0.0
        }
    }
}

/// [§ 17.6.1 'border-spacing'](https://www.w3.org/TR/CSS2/tables.html#separated-borders)
///
/// "The lengths specify the distance that separates adjoining cell borders."
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderSpacing {
    /// Horizontal spacing between columns.
    pub horizontal: f32,
    /// Vertical spacing between rows.
    pub vertical: f32,
}
