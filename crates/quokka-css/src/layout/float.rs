//! CSS Float Layout.
//!
//! [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
//!
//! "A float is a box that is shifted to the left or right on the current line.
//! The most interesting characteristic of a float is that content may flow along
//! its side (or be prohibited from doing so by the 'clear' property)."
//!
//! One [`FloatContext`] exists per block formatting context. All rectangles
//! it stores are margin boxes in the initial containing block's coordinate
//! space, so nested blocks that share the context can query it directly.

use serde::Serialize;

use crate::style::{Clear, Float};

use super::box_model::Rect;

/// [§ 9.5.1 Positioning the float](https://www.w3.org/TR/CSS2/visuren.html#float-position)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FloatSide {
    /// "The element generates a block box that is floated to the left."
    Left,
    /// "The element generates a block box that is floated to the right."
    Right,
}

impl FloatSide {
    /// The side a computed `float` value floats to, if any.
    #[must_use]
    pub const fn from_float(float: Float) -> Option<Self> {
        match float {
            Float::Left => Some(Self::Left),
            Float::Right => Some(Self::Right),
            Float::None => None,
        }
    }
}

/// A single float that has been placed in the flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacedFloat {
    /// Which side this float is on.
    pub side: FloatSide,
    /// The margin box of the float.
    pub margin_box: Rect,
}

/// Horizontal space left between floats over a vertical band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Left edge of the free space.
    pub left: f32,
    /// Right edge of the free space.
    pub right: f32,
}

impl Band {
    /// Free width, never negative.
    #[must_use]
    pub fn width(&self) -> f32 {
        (self.right - self.left).max(0.0)
    }
}

/// Tracks placed floats within a block formatting context.
///
/// [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
///
/// "Since a float is not in the flow, non-positioned block boxes created
/// before and after the float box flow vertically as if the float did not
/// exist. However, the current and subsequent line boxes created next to
/// the float are shortened as necessary to make room for the margin box
/// of the float."
#[derive(Debug, Clone)]
pub struct FloatContext {
    floats: Vec<PlacedFloat>,
    /// Outer top of the most recently placed float (rule 3 below).
    last_top: f32,
}

impl Default for FloatContext {
    fn default() -> Self {
        Self::new()
    }
}

impl FloatContext {
    /// Create an empty float context.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            floats: Vec::new(),
            last_top: f32::NEG_INFINITY,
        }
    }

    /// Returns true if no float has been placed in this context.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.floats.is_empty()
    }

    /// All floats in placement order.
    #[must_use]
    pub fn floats(&self) -> &[PlacedFloat] {
        &self.floats
    }

    /// Return the maximum bottom margin edge of all placed floats.
    ///
    /// [§ 10.6.7 'Auto' heights for block formatting context roots](https://www.w3.org/TR/CSS2/visudet.html#root-height)
    ///
    /// "If the element has any floating descendants whose bottom margin edge
    /// is below the element's bottom content edge, then the height is
    /// increased to include those edges."
    #[must_use]
    pub fn max_float_bottom(&self) -> Option<f32> {
        self.floats
            .iter()
            .map(|f| f.margin_box.bottom())
            .reduce(f32::max)
    }

    /// [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
    ///
    /// Free horizontal space over `[y, y + height)` inside the containing
    /// block edges `cb_left..cb_right`. A zero-height band still sees floats
    /// whose margin box contains `y`.
    #[must_use]
    pub fn band(&self, y: f32, height: f32, cb_left: f32, cb_right: f32) -> Band {
        let bottom = y + height.max(0.0);
        let mut band = Band {
            left: cb_left,
            right: cb_right,
        };
        for f in &self.floats {
            let top = f.margin_box.y;
            let f_bottom = f.margin_box.bottom();
            let overlaps = if height > 0.0 {
                top < bottom && f_bottom > y
            } else {
                top <= y && f_bottom > y
            };
            if !overlaps || f.margin_box.height <= 0.0 {
                continue;
            }
            match f.side {
                FloatSide::Left => band.left = band.left.max(f.margin_box.right()),
                FloatSide::Right => band.right = band.right.min(f.margin_box.x),
            }
        }
        band
    }

    /// Whether any float intrudes into `cb_left..cb_right` over the band.
    #[must_use]
    pub fn is_band_narrowed(&self, y: f32, height: f32, cb_left: f32, cb_right: f32) -> bool {
        let band = self.band(y, height, cb_left, cb_right);
        band.left > cb_left || band.right < cb_right
    }

    /// Smallest float bottom edge strictly below `y`.
    #[must_use]
    pub fn next_float_bottom_after(&self, y: f32) -> Option<f32> {
        self.floats
            .iter()
            .map(|f| f.margin_box.bottom())
            .filter(|&bottom| bottom > y)
            .reduce(f32::min)
    }

    /// Room beside earlier floats at the highest position a new float may
    /// take at or below `y`. Rule 3 keeps it from rising above the last one.
    #[must_use]
    pub fn float_band(&self, y: f32, cb_left: f32, cb_right: f32) -> Band {
        self.band(y.max(self.last_top), 0.0, cb_left, cb_right)
    }

    /// Find the highest `y >= y_min` where a box `width` wide and `height`
    /// tall fits between floats. Returns the position and the band there.
    ///
    /// When no such position exists the box is placed below every float.
    #[must_use]
    pub fn find_space(
        &self,
        width: f32,
        height: f32,
        y_min: f32,
        cb_left: f32,
        cb_right: f32,
    ) -> (f32, Band) {
        let mut y = y_min;
        loop {
            let band = self.band(y, height, cb_left, cb_right);
            let narrowed = band.left > cb_left || band.right < cb_right;
            if band.width() >= width || !narrowed {
                return (y, band);
            }
            match self.next_float_bottom_after(y) {
                Some(next) => y = next,
                None => return (y, band),
            }
        }
    }

    /// [§ 9.5.1 Positioning the float: the 'float' property](https://www.w3.org/TR/CSS2/visuren.html#float-position)
    ///
    /// Place a float's margin box and record it. Returns the margin box.
    ///
    /// - Rule 1: "The left outer edge of a left-floating box may not be to
    ///   the left of the left edge of its containing block."
    /// - Rules 2 and 7: floats on the same line stack against each other.
    /// - Rule 3: "The outer top of a floating box may not be higher than the
    ///   outer top of any block or floated box generated by an element
    ///   earlier in the source document."
    /// - Rules 4, 5 and 8: "A floating box must be placed as high as possible."
    /// - Rule 9: "A left-floating box must be put as far to the left as
    ///   possible, a right-floating box as far to the right as possible."
    pub fn place_float(
        &mut self,
        side: FloatSide,
        width: f32,
        height: f32,
        y_min: f32,
        cb_left: f32,
        cb_right: f32,
    ) -> Rect {
        // STEP 1: Start at the highest allowed position.
        let start = y_min.max(self.last_top);

        // STEP 2: Move down past floats until the margin box fits.
        let (y, band) = self.find_space(width, height, start, cb_left, cb_right);

        // STEP 3: Push toward the float's side.
        let x = match side {
            FloatSide::Left => band.left,
            FloatSide::Right => band.right - width,
        };
        let margin_box = Rect::new(x, y, width, height);
        self.floats.push(PlacedFloat { side, margin_box });
        self.last_top = y;
        margin_box
    }

    /// [§ 9.5.2 Controlling flow next to floats: the 'clear' property](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
    ///
    /// "This property indicates which sides of an element's box(es) may not
    /// be adjacent to an earlier floating box."
    ///
    /// Returns the lowest bottom outer edge among floats on the cleared
    /// side(s), or `None` if nothing needs clearing.
    #[must_use]
    pub fn clearance_floor(&self, clear: Clear) -> Option<f32> {
        self.floats
            .iter()
            .filter(|f| match clear {
                Clear::None => false,
                Clear::Left => f.side == FloatSide::Left,
                Clear::Right => f.side == FloatSide::Right,
                Clear::Both => true,
            })
            .map(|f| f.margin_box.bottom())
            .reduce(f32::max)
    }

    /// The y a box must start at to clear floats: at least `y`.
    #[must_use]
    pub fn clear(&self, clear: Clear, y: f32) -> f32 {
        self.clearance_floor(clear).map_or(y, |floor| floor.max(y))
    }
}
