//! Box model geometry.
//!
//! [§ 8.1 Box dimensions](https://www.w3.org/TR/CSS2/box.html#box-dimensions)
//!
//! "Each box has a content area (e.g., text, an image, etc.) and optional
//! surrounding padding, border, and margin areas; the size of each area is
//! specified by properties defined below."

use serde::{Deserialize, Serialize};

/// A rectangle positioned in the initial containing block's coordinate space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Horizontal position of the top-left corner.
    pub x: f32,
    /// Vertical position of the top-left corner.
    pub y: f32,
    /// Width of the rectangle.
    pub width: f32,
    /// Height of the rectangle.
    pub height: f32,
}

impl Rect {
    /// Construct from origin and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// The same rectangle moved by `(dx, dy)`.
    #[must_use]
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Grow outward by `edges`.
    #[must_use]
    pub fn inflated(&self, edges: EdgeSizes) -> Self {
        Self {
            x: self.x - edges.left,
            y: self.y - edges.top,
            width: self.width + edges.horizontal(),
            height: self.height + edges.vertical(),
        }
    }

    /// Smallest rectangle containing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }
}

/// Edge sizes for padding, border, or margin.
///
/// Padding and border widths are never negative after resolution; margins
/// may be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EdgeSizes {
    /// Top edge size.
    pub top: f32,
    /// Right edge size.
    pub right: f32,
    /// Bottom edge size.
    pub bottom: f32,
    /// Left edge size.
    pub left: f32,
}

impl EdgeSizes {
    /// All four sides zero.
    pub const ZERO: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    /// `left + right`.
    #[must_use]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// `top + bottom`.
    #[must_use]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Side-wise sum.
    #[must_use]
    pub fn plus(&self, other: Self) -> Self {
        Self {
            top: self.top + other.top,
            right: self.right + other.right,
            bottom: self.bottom + other.bottom,
            left: self.left + other.left,
        }
    }
}

/// Resolved geometry of one box.
///
/// ```text
///   margin box ⊇ border box ⊇ padding box ⊇ content box
/// ```
///
/// Only `content` is positioned; the outer boxes are derived by inflating
/// it through `padding`, `border` and `margin` in that order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BoxDimensions {
    /// Content area.
    pub content: Rect,
    /// Padding widths around the content area.
    pub padding: EdgeSizes,
    /// Border widths around the padding area.
    pub border: EdgeSizes,
    /// Margin widths around the border area.
    pub margin: EdgeSizes,
}

impl BoxDimensions {
    /// [§ 8.1](https://www.w3.org/TR/CSS2/box.html#box-dimensions)
    ///
    /// "The padding edge surrounds the box padding."
    #[must_use]
    pub fn padding_box(&self) -> Rect {
        self.content.inflated(self.padding)
    }

    /// "The border edge surrounds the box's border."
    ///
    /// This is a fragment's own rectangle.
    #[must_use]
    pub fn border_box(&self) -> Rect {
        self.padding_box().inflated(self.border)
    }

    /// "The margin edge surrounds the box margin."
    #[must_use]
    pub fn margin_box(&self) -> Rect {
        self.border_box().inflated(self.margin)
    }

    /// `padding + border` on every side.
    #[must_use]
    pub fn padding_and_border(&self) -> EdgeSizes {
        self.padding.plus(self.border)
    }

    /// Move the whole box.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.content = self.content.translated(dx, dy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_boxes_inflate_outward() {
        let dims = BoxDimensions {
            content: Rect::new(30.0, 30.0, 100.0, 50.0),
            padding: EdgeSizes {
                top: 5.0,
                right: 5.0,
                bottom: 5.0,
                left: 5.0,
            },
            border: EdgeSizes {
                top: 2.0,
                right: 2.0,
                bottom: 2.0,
                left: 2.0,
            },
            margin: EdgeSizes {
                top: 10.0,
                right: 0.0,
                bottom: 10.0,
                left: 0.0,
            },
        };
        assert_eq!(dims.padding_box(), Rect::new(25.0, 25.0, 110.0, 60.0));
        assert_eq!(dims.border_box(), Rect::new(23.0, 23.0, 114.0, 64.0));
        assert_eq!(dims.margin_box(), Rect::new(23.0, 13.0, 114.0, 84.0));
    }

    #[test]
    fn test_union_covers_both() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, -5.0, 10.0, 5.0);
        assert_eq!(a.union(&b), Rect::new(0.0, -5.0, 15.0, 15.0));
    }
}
