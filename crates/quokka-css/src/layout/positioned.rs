//! CSS Positioned Layout.
//!
//! [§ 9.3 Positioning schemes](https://www.w3.org/TR/CSS2/visuren.html#positioning-scheme)
//!
//! "In CSS 2, a box may be laid out according to three positioning schemes:
//!
//! 1. Normal flow. In CSS 2, normal flow includes block formatting of block-level
//!    boxes, inline formatting of inline-level boxes, and relative positioning of
//!    block-level and inline-level boxes.
//!
//! 2. Floats. In the float model, a box is first laid out according to the normal
//!    flow, then taken out of the flow and shifted to the left or right as far as
//!    possible.
//!
//! 3. Absolute positioning. In the absolute positioning model, a box is removed
//!    from the normal flow entirely and assigned a position with respect to a
//!    containing block."
//!
//! Absolutely positioned boxes are found during normal flow layout, which
//! records their static position in a [`PendingAbsolute`]. They are laid
//! out once their containing block is complete: when the nearest positioned
//! ancestor finishes, or at the root for boxes without one. Fixed boxes
//! always travel up to the root.

use quokka_tree::NodeId;

use crate::style::{ComputedStyle, Direction, Position};

use super::LayoutContext;
use super::block::{Placement, finish_box, layout_block_box};
use super::box_model::EdgeSizes;
use super::float::FloatContext;
use super::fragment::Fragment;
use super::intrinsic::shrink_to_fit;
use super::replaced::{layout_replaced, replaced_size};
use super::table::layout_table;
use super::values::{
    ContainingBlock, clamp_height, clamp_width, resolve_border, resolve_margins,
    resolve_margins_or_zero, resolve_padding, specified_height, specified_width,
};

/// An absolutely positioned box waiting for its containing block.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PendingAbsolute {
    /// The positioned box.
    pub id: NodeId,
    /// "The static position for 'left' is the distance from the left edge of
    /// the containing block to the left margin edge of a hypothetical box
    /// that would have been the first box of the element if its 'position'
    /// property had been 'static'". Stored as an absolute coordinate.
    pub static_x: f32,
    /// Top margin edge of the hypothetical static box.
    pub static_y: f32,
    /// `position: fixed`: the viewport is the containing block.
    pub fixed: bool,
}

impl PendingAbsolute {
    pub(crate) fn new(ctx: &LayoutContext<'_>, id: NodeId, static_x: f32, static_y: f32) -> Self {
        Self {
            id,
            static_x,
            static_y,
            fixed: ctx.tree[id].style.position == Position::Fixed,
        }
    }
}

/// Move the static positions recorded since `mark` along with the box that
/// recorded them.
pub(crate) fn translate_pending(pending: &mut [PendingAbsolute], mark: usize, dx: f32, dy: f32) {
    for entry in pending.iter_mut().skip(mark) {
        entry.static_x += dx;
        entry.static_y += dy;
    }
}

/// [§ 9.3.2 Box offsets: 'top', 'right', 'bottom', 'left'](https://www.w3.org/TR/CSS2/visuren.html#position-props)
///
/// "An element is said to be positioned if its 'position' property has
/// a value other than 'static'. Positioned elements generate positioned
/// boxes, laid out according to four properties: top, right, bottom, left."
///
/// "`<percentage>`: The offset is a percentage of the containing block's
/// width (for 'left' or 'right') or height (for 'top' or 'bottom')."
/// `None` is `auto`; a percentage of an indefinite height is `auto` too.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxOffsets {
    /// "how far the top margin edge of the box is offset below the top edge
    /// of the box's containing block."
    pub top: Option<f32>,
    /// "how far the right margin edge of the box is offset to the left of
    /// the right edge of the box's containing block."
    pub right: Option<f32>,
    /// "how far the bottom margin edge of the box is offset above the
    /// bottom edge of the box's containing block."
    pub bottom: Option<f32>,
    /// "how far the left margin edge of the box is offset to the right of
    /// the left edge of the box's containing block."
    pub left: Option<f32>,
}

impl BoxOffsets {
    /// Resolve the `inset` properties of `style` against a containing block.
    #[must_use]
    pub fn resolve(style: &ComputedStyle, cb_width: f32, cb_height: Option<f32>) -> Self {
        Self {
            top: style.inset.top.resolve_definite(cb_height),
            right: style.inset.right.resolve(cb_width),
            bottom: style.inset.bottom.resolve_definite(cb_height),
            left: style.inset.left.resolve(cb_width),
        }
    }
}

/// [§ 9.4.3 Relative positioning](https://www.w3.org/TR/CSS2/visuren.html#relative-positioning)
///
/// Offset of a `position: relative` box from its normal flow position;
/// `(0, 0)` for every other box.
///
/// "If neither 'left' nor 'right' is 'auto', the position is
/// over-constrained, and one of them has to be ignored. If the 'direction'
/// property of the containing block is 'ltr', the value of 'left' wins and
/// 'right' becomes -'left'. If 'direction' of the containing block is
/// 'rtl', 'right' wins and 'left' is ignored."
///
/// "If neither 'top' nor 'bottom' is 'auto', 'bottom' is ignored".
pub(crate) fn relative_offset(style: &ComputedStyle, cb: &ContainingBlock) -> (f32, f32) {
    if style.position != Position::Relative {
        return (0.0, 0.0);
    }
    let offsets = BoxOffsets::resolve(style, cb.width, cb.height);
    let dx = match (offsets.left, offsets.right) {
        (None, None) => 0.0,
        (Some(left), None) => left,
        (None, Some(right)) => -right,
        (Some(left), Some(right)) => match style.direction {
            Direction::Ltr => left,
            Direction::Rtl => -right,
        },
    };
    let dy = match (offsets.top, offsets.bottom) {
        (None, None) => 0.0,
        (Some(top), _) => top,
        (None, Some(bottom)) => -bottom,
    };
    (dx, dy)
}

/// [§ 10.1 Definition of "containing block"](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)
///
/// Lay out the absolutely positioned boxes recorded since `mark` whose
/// containing block is `fragment`, and append them to its children.
///
/// "If the element has 'position: absolute', the containing block is
/// established by the nearest ancestor with a 'position' of 'absolute',
/// 'relative' or 'fixed' ... the containing block is formed by the padding
/// edge of the ancestor. ... If there is no such ancestor, the containing
/// block is the initial containing block."
///
/// Fixed boxes stay pending until `is_root`.
pub(crate) fn resolve_pending(
    ctx: &LayoutContext<'_>,
    fragment: &mut Fragment,
    pending: &mut Vec<PendingAbsolute>,
    mark: usize,
    is_root: bool,
) {
    let own = if is_root && !fragment.style.position.is_positioned() {
        ctx.viewport
    } else {
        fragment.padding_box()
    };

    // Laying out a batch can record new fixed descendants; the root keeps
    // going until none are left.
    loop {
        let (batch, kept): (Vec<_>, Vec<_>) = pending
            .drain(mark.min(pending.len())..)
            .partition(|entry| is_root || !entry.fixed);
        pending.extend(kept);
        if batch.is_empty() {
            break;
        }
        for entry in batch {
            let rect = if entry.fixed { ctx.viewport } else { own };
            let cb = ContainingBlock::from_rect(rect);
            log::debug!(
                target: "layout",
                "absolute {:?} against {rect:?} (fixed={})",
                entry.id,
                entry.fixed
            );
            fragment.children.push(layout_absolute(ctx, &entry, &cb, pending));
        }
    }
}

/// One axis of the absolute positioning constraint:
///
/// "'left' + 'margin-left' + 'border-left-width' + 'padding-left' + 'width'
/// + 'padding-right' + 'border-right-width' + 'margin-right' + 'right' =
/// width of containing block"
#[derive(Debug, Clone, Copy)]
struct Axis {
    start: Option<f32>,
    end: Option<f32>,
    size: Option<f32>,
    margin_start: Option<f32>,
    margin_end: Option<f32>,
    /// Padding and border on both sides.
    edges: f32,
    cb_size: f32,
    /// Static position, relative to the containing block's start edge.
    static_start: f32,
    /// With both margins `auto`, a negative remainder goes to the end
    /// margin instead of being split.
    split_negative: bool,
    /// `direction: rtl`: over-constraint drops `start` instead of `end`.
    rtl: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Solved {
    start: f32,
    size: f32,
    margin_start: f32,
    margin_end: f32,
}

/// Solve one axis. `fit` gives the size of an `auto` dimension from the
/// space available to it (shrink-to-fit widths, content heights).
fn solve_axis(axis: &Axis, fit: impl Fn(f32) -> f32) -> Solved {
    if let (Some(start), Some(end), Some(size)) = (axis.start, axis.end, axis.size) {
        let remaining = axis.cb_size - start - end - size - axis.edges;
        return match (axis.margin_start, axis.margin_end) {
            // "If both 'margin-left' and 'margin-right' are 'auto', solve the
            // equation under the extra constraint that the two margins get
            // equal values, unless this would make them negative, in which
            // case when direction of the containing block is 'ltr' ('rtl'),
            // set 'margin-left' ('margin-right') to zero and solve for
            // 'margin-right' ('margin-left')."
            (None, None) if remaining >= 0.0 || axis.split_negative => Solved {
                start,
                size,
                margin_start: remaining / 2.0,
                margin_end: remaining / 2.0,
            },
            (None, None) if axis.rtl => Solved {
                start,
                size,
                margin_start: remaining,
                margin_end: 0.0,
            },
            (None, None) => Solved {
                start,
                size,
                margin_start: 0.0,
                margin_end: remaining,
            },
            // "If one of 'margin-left' or 'margin-right' is 'auto', solve the
            // equation for that value."
            (None, Some(me)) => Solved {
                start,
                size,
                margin_start: remaining - me,
                margin_end: me,
            },
            (Some(ms), None) => Solved {
                start,
                size,
                margin_start: ms,
                margin_end: remaining - ms,
            },
            // "If the values are over-constrained, ignore the value for
            // 'left' (in case the 'direction' property of the containing
            // block is 'rtl') or 'right' (in case 'direction' is 'ltr') and
            // solve for that value."
            (Some(ms), Some(me)) => {
                let start = if axis.rtl {
                    axis.cb_size - end - me - axis.edges - size - ms
                } else {
                    start
                };
                Solved {
                    start,
                    size,
                    margin_start: ms,
                    margin_end: me,
                }
            }
        };
    }

    // "Otherwise, set 'auto' values for 'margin-left' and 'margin-right' to
    // 0, and pick the one of the following six rules that applies."
    let ms = axis.margin_start.unwrap_or(0.0);
    let me = axis.margin_end.unwrap_or(0.0);
    let outer = ms + me + axis.edges;
    let (start, size) = match (axis.start, axis.size, axis.end) {
        // "If all three of 'left', 'width', and 'right' are 'auto': First
        // set any 'auto' values for 'margin-left' and 'margin-right' to 0.
        // Then, if the 'direction' property of the element establishing the
        // static-position containing block is 'ltr' set 'left' to the
        // static position and apply rule number three below"
        (None, None, None) => {
            let size = fit(axis.cb_size - axis.static_start - outer);
            (axis.static_start, size)
        }
        // 1. "'left' and 'width' are 'auto' and 'right' is not 'auto', then
        // the width is shrink-to-fit. Then solve for 'left'"
        (None, None, Some(end)) => {
            let size = fit(axis.cb_size - end - outer);
            (axis.cb_size - end - outer - size, size)
        }
        // 2. "'left' and 'right' are 'auto' and 'width' is not 'auto', then
        // ... set 'left' to the static position. Then solve for 'right'"
        (None, Some(size), None) => (axis.static_start, size),
        // 3. "'width' and 'right' are 'auto' and 'left' is not 'auto', then
        // the width is shrink-to-fit . Then solve for 'right'"
        (Some(start), None, None) => (start, fit(axis.cb_size - start - outer)),
        // 4. "'left' is 'auto', 'width' and 'right' are not 'auto', then
        // solve for 'left'"
        (None, Some(size), Some(end)) => (axis.cb_size - end - outer - size, size),
        // 5. "'width' is 'auto', 'left' and 'right' are not 'auto', then
        // solve for 'width'"
        (Some(start), None, Some(end)) => (start, (axis.cb_size - start - end - outer).max(0.0)),
        // 6. "'right' is 'auto', 'left' and 'width' are not 'auto', then
        // solve for 'right'"
        (Some(start), Some(size), _) => (start, size),
    };
    Solved {
        start,
        size,
        margin_start: ms,
        margin_end: me,
    }
}

/// [§ 10.3.7 Absolutely positioned, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#abs-non-replaced-width),
/// [§ 10.3.8 Absolutely positioned, replaced elements](https://www.w3.org/TR/CSS2/visudet.html#abs-replaced-width),
/// [§ 10.6.4](https://www.w3.org/TR/CSS2/visudet.html#abs-non-replaced-height)
/// and [§ 10.6.5](https://www.w3.org/TR/CSS2/visudet.html#abs-replaced-height).
fn layout_absolute(
    ctx: &LayoutContext<'_>,
    entry: &PendingAbsolute,
    cb: &ContainingBlock,
    pending: &mut Vec<PendingAbsolute>,
) -> Fragment {
    let node = &ctx.tree[entry.id];
    let style = &node.style;
    let offsets = BoxOffsets::resolve(style, cb.width, cb.height);
    let margins = resolve_margins(style, cb.width);
    let padding = resolve_padding(style, cb.width);
    let border = resolve_border(style);
    let rtl = style.direction == Direction::Rtl;

    if node.display().is_table() {
        return place_absolute_table(ctx, entry, cb, &offsets, pending);
    }

    // STEP 1: Width.
    let replaced = node.is_replaced().then(|| replaced_size(ctx, entry.id, cb.width, cb.height));
    let horizontal = |size: Option<f32>| Axis {
        start: offsets.left,
        end: offsets.right,
        size,
        margin_start: margins.left,
        margin_end: margins.right,
        edges: padding.horizontal() + border.horizontal(),
        cb_size: cb.width,
        static_start: entry.static_x - cb.x,
        split_negative: false,
        rtl,
    };
    let fit = |available: f32| shrink_to_fit(ctx, entry.id, cb.width, available.max(0.0));
    let width = replaced
        .as_ref()
        .map(|r| r.width)
        .or_else(|| specified_width(style, cb.width));
    let mut h = solve_axis(&horizontal(width), fit);
    // [§ 10.4](https://www.w3.org/TR/CSS2/visudet.html#min-max-widths):
    // "If the tentative used width is greater than 'max-width', the rules
    // above are applied again, but this time using the computed value of
    // 'max-width' as the computed value for 'width'."
    if replaced.is_none() {
        let clamped = clamp_width(style, h.size, cb.width);
        if (clamped - h.size).abs() > f32::EPSILON {
            h = solve_axis(&horizontal(Some(clamped)), fit);
        }
    }

    // STEP 2: Height, when it does not depend on the content.
    let vertical = |size: Option<f32>| Axis {
        start: offsets.top,
        end: offsets.bottom,
        size,
        margin_start: margins.top,
        margin_end: margins.bottom,
        edges: padding.vertical() + border.vertical(),
        cb_size: cb.height.unwrap_or(0.0),
        static_start: entry.static_y - cb.y,
        split_negative: true,
        rtl: false,
    };
    let height = replaced
        .as_ref()
        .map(|r| r.height)
        .or_else(|| specified_height(style, cb.height));
    let content_sized = height.is_none() && (offsets.top.is_none() || offsets.bottom.is_none());

    let border_x = cb.x + h.start + h.margin_start;
    let placement_for = |v: &Solved, height: Option<f32>| Placement {
        border_x,
        border_y: cb.y + v.start + v.margin_start,
        content_width: h.size,
        margin: EdgeSizes {
            top: v.margin_start,
            right: h.margin_end,
            bottom: v.margin_end,
            left: h.margin_start,
        },
        height,
        border: None,
    };

    if let Some(replaced) = replaced {
        let v = solve_axis(&vertical(Some(replaced.height)), |_| replaced.height);
        let placement = placement_for(&v, Some(replaced.height));
        let mark = pending.len();
        let mut fragment = layout_replaced(ctx, entry.id, cb, &placement, replaced.image);
        finish_box(ctx, entry.id, &mut fragment, cb, pending, mark);
        return fragment;
    }

    if !content_sized {
        let mut v = solve_axis(&vertical(height), |_| 0.0);
        let clamped = clamp_height(style, v.size, cb.height);
        if (clamped - v.size).abs() > f32::EPSILON {
            v = solve_axis(&vertical(Some(clamped)), |_| clamped);
        }
        let placement = placement_for(&v, Some(v.size));
        let mut floats = FloatContext::new();
        return layout_block_box(ctx, entry.id, cb, &placement, &mut floats, pending).fragment;
    }

    // STEP 3: Content height. Lay out at a tentative position, then move
    // the box once the equation can be solved.
    let tentative = solve_axis(&vertical(Some(0.0)), |_| 0.0);
    let placement = placement_for(&tentative, None);
    let mark = pending.len();
    let mut floats = FloatContext::new();
    let mut fragment =
        layout_block_box(ctx, entry.id, cb, &placement, &mut floats, pending).fragment;
    let content_height = fragment.dimensions.content.height;
    let v = solve_axis(&vertical(Some(content_height)), |_| content_height);
    let dy = (cb.y + v.start + v.margin_start) - placement.border_y;
    fragment.translate(0.0, dy);
    fragment.dimensions.margin.top = v.margin_start;
    fragment.dimensions.margin.bottom = v.margin_end;
    translate_pending(pending, mark, 0.0, dy);
    fragment
}

/// An absolutely positioned table sizes itself like any table and is then
/// moved by its offsets, or left at its static position.
fn place_absolute_table(
    ctx: &LayoutContext<'_>,
    entry: &PendingAbsolute,
    cb: &ContainingBlock,
    offsets: &BoxOffsets,
    pending: &mut Vec<PendingAbsolute>,
) -> Fragment {
    let mark = pending.len();
    let margin_top = resolve_margins_or_zero(&ctx.tree[entry.id].style, cb.width).top;
    let mut fragment = layout_table(ctx, entry.id, cb, cb.y + margin_top, false, pending);
    let margin_box = fragment.margin_box();
    let x = match (offsets.left, offsets.right) {
        (Some(left), _) => cb.x + left,
        (None, Some(right)) => cb.right() - right - margin_box.width,
        (None, None) => entry.static_x,
    };
    let y = match (offsets.top, offsets.bottom, cb.height) {
        (Some(top), _, _) => cb.y + top,
        (None, Some(bottom), Some(height)) => cb.y + height - bottom - margin_box.height,
        _ => entry.static_y,
    };
    let (dx, dy) = (x - margin_box.x, y - margin_box.y);
    fragment.translate(dx, dy);
    translate_pending(pending, mark, dx, dy);
    fragment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::AutoLength;

    fn axis() -> Axis {
        Axis {
            start: None,
            end: None,
            size: None,
            margin_start: Some(0.0),
            margin_end: Some(0.0),
            edges: 0.0,
            cb_size: 500.0,
            static_start: 40.0,
            split_negative: false,
            rtl: false,
        }
    }

    #[test]
    fn test_all_auto_uses_static_position_and_fit() {
        let solved = solve_axis(&axis(), |available| available.min(100.0));
        assert!((solved.start - 40.0).abs() < 0.01);
        assert!((solved.size - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_left_and_right_solve_width() {
        let a = Axis {
            start: Some(50.0),
            end: Some(150.0),
            ..axis()
        };
        let solved = solve_axis(&a, |_| 0.0);
        assert!((solved.size - 300.0).abs() < 0.01);
    }

    #[test]
    fn test_over_constrained_ignores_end() {
        let a = Axis {
            start: Some(50.0),
            end: Some(50.0),
            size: Some(100.0),
            ..axis()
        };
        let solved = solve_axis(&a, |_| 0.0);
        assert!((solved.start - 50.0).abs() < 0.01);
        assert!((solved.margin_end).abs() < 0.01);
    }

    #[test]
    fn test_auto_margins_center_between_offsets() {
        let a = Axis {
            start: Some(0.0),
            end: Some(0.0),
            size: Some(100.0),
            margin_start: None,
            margin_end: None,
            ..axis()
        };
        let solved = solve_axis(&a, |_| 0.0);
        assert!((solved.margin_start - 200.0).abs() < 0.01);
    }

    #[test]
    fn test_right_only_solves_left() {
        let a = Axis {
            end: Some(100.0),
            size: Some(50.0),
            ..axis()
        };
        let solved = solve_axis(&a, |_| 0.0);
        assert!((solved.start - 350.0).abs() < 0.01);
    }

    #[test]
    fn test_relative_offset_prefers_left_and_top() {
        let mut style = ComputedStyle::default();
        style.position = Position::Relative;
        style.inset.left = AutoLength::px(10.0);
        style.inset.right = AutoLength::px(30.0);
        style.inset.bottom = AutoLength::px(5.0);
        let cb = ContainingBlock {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: None,
        };
        assert_eq!(relative_offset(&style, &cb), (10.0, -5.0));
    }
}
