//! Block formatting context layout.
//!
//! [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
//!
//! "In a block formatting context, boxes are laid out one after the other,
//! vertically, beginning at the top of a containing block. The vertical
//! distance between two sibling boxes is determined by the 'margin'
//! properties. Vertical margins between adjacent block-level boxes in a
//! block formatting context collapse."
//!
//! Layout is top-down: a parent decides where a child's border box starts
//! and how wide its containing block is, the child lays out its own
//! content, and the parent reads the resulting height back. All positions
//! are absolute, so nested non-root blocks share their formatting
//! context's [`FloatContext`] directly.

#[cfg(feature = "layout-trace")]
use std::cell::Cell;
use std::sync::Arc;

use quokka_common::image::load_or_placeholder;
use quokka_tree::NodeId;

use crate::style::{Clear, ComputedStyle, Direction, Display, Position};

use super::LayoutContext;
use super::box_model::{BoxDimensions, EdgeSizes, Rect};
use super::float::{FloatContext, FloatSide};
use super::fragment::{Fragment, MarkerFragment};
use super::inline::layout_inline;
use super::intrinsic::{outer_widths, shrink_to_fit};
use super::list::marker_text;
use super::margins::{
    MarginStrut, collapses_through, collapses_with_first_child, collapses_with_last_child,
    establishes_bfc, has_inline_content, through_strut, top_chain,
};
use super::positioned::{PendingAbsolute, relative_offset, resolve_pending, translate_pending};
use super::replaced::{layout_replaced, replaced_size};
use super::table::layout_table;
use super::text::{InlineMetrics, measure};
use super::values::{
    ContainingBlock, clamp_height, clamp_width, resolve_border, resolve_margins,
    resolve_margins_or_zero, resolve_padding, specified_height, specified_width,
};

/// Slack when comparing a measured width against the room for it.
const FIT_EPSILON: f32 = 0.01;

#[cfg(feature = "layout-trace")]
thread_local! {
    static LAYOUT_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Logs entry and exit of a box, indented by nesting depth.
#[cfg(feature = "layout-trace")]
struct TraceGuard {
    id: NodeId,
}

#[cfg(feature = "layout-trace")]
impl TraceGuard {
    fn enter(ctx: &LayoutContext<'_>, id: NodeId) -> Self {
        let depth = LAYOUT_DEPTH.with(|d| {
            let current = d.get();
            d.set(current + 1);
            current
        });
        let node = &ctx.tree[id];
        log::trace!(
            target: "layout",
            "{:indent$}enter {id:?} kind={} display={} children={}",
            "",
            node.kind,
            node.display(),
            ctx.tree.children(id).len(),
            indent = depth * 2
        );
        Self { id }
    }
}

#[cfg(feature = "layout-trace")]
impl Drop for TraceGuard {
    fn drop(&mut self) {
        let depth = LAYOUT_DEPTH.with(|d| {
            let current = d.get().saturating_sub(1);
            d.set(current);
            current
        });
        log::trace!(target: "layout", "{:indent$}leave {:?}", "", self.id, indent = depth * 2);
    }
}

/// A laid out block-level box.
pub(crate) struct BlockResult {
    /// The box's fragment.
    pub fragment: Fragment,
    /// Bottom margins of the last in-flow descendants that collapse through
    /// the box's own bottom margin and must be collapsed by the parent.
    pub trailing: MarginStrut,
}

impl BlockResult {
    const fn new(fragment: Fragment) -> Self {
        Self {
            fragment,
            trailing: MarginStrut::new(),
        }
    }
}

/// Where a box goes and how wide its content is, decided by the caller.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Placement {
    /// Left border edge.
    pub border_x: f32,
    /// Top border edge.
    pub border_y: f32,
    /// Used content width.
    pub content_width: f32,
    /// Used margins.
    pub margin: EdgeSizes,
    /// Content height decided by the caller, overriding `height`.
    pub height: Option<f32>,
    /// Used border widths overriding the style's (cells in the collapsing
    /// border model).
    pub border: Option<EdgeSizes>,
}

/// Resolved horizontal geometry: used margins and content width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Horizontal {
    pub margin_left: f32,
    pub width: f32,
    pub margin_right: f32,
}

/// [§ 10.3.3 Block-level, non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
///
/// "'margin-left' + 'border-left-width' + 'padding-left' + 'width' +
/// 'padding-right' + 'border-right-width' + 'margin-right' = width of
/// containing block"
///
/// `width` overrides the specified width; replaced elements pass their
/// used width (§ 10.3.4).
pub(crate) fn solve_block_width(
    style: &ComputedStyle,
    cb_width: f32,
    width: Option<f32>,
) -> Horizontal {
    let margins = resolve_margins(style, cb_width);
    let edges = resolve_padding(style, cb_width).horizontal() + resolve_border(style).horizontal();

    let solve = |width: Option<f32>| -> Horizontal {
        let Some(width) = width else {
            // "If 'width' is set to 'auto', any other 'auto' values become
            // '0' and 'width' follows from the resulting equality."
            let margin_left = margins.left.unwrap_or(0.0);
            let margin_right = margins.right.unwrap_or(0.0);
            return Horizontal {
                margin_left,
                width: (cb_width - margin_left - margin_right - edges).max(0.0),
                margin_right,
            };
        };
        let remaining = cb_width - width - edges;
        match (margins.left, margins.right) {
            // "If both 'margin-left' and 'margin-right' are 'auto', their
            // used values are equal. This horizontally centers the element
            // with respect to the edges of the containing block."
            (None, None) if remaining >= 0.0 => Horizontal {
                margin_left: remaining / 2.0,
                width,
                margin_right: remaining / 2.0,
            },
            // "If 'width' is not 'auto' and 'border-left-width' + ... is
            // larger than the width of the containing block, then any
            // 'auto' values for 'margin-left' or 'margin-right' are, for
            // the following rules, treated as zero."
            (None, None) => over_constrained(style, 0.0, width, 0.0, remaining),
            // "If there is exactly one value specified as 'auto', its used
            // value follows from the equality."
            (None, Some(right)) => Horizontal {
                margin_left: remaining - right,
                width,
                margin_right: right,
            },
            (Some(left), None) => Horizontal {
                margin_left: left,
                width,
                margin_right: remaining - left,
            },
            (Some(left), Some(right)) => over_constrained(style, left, width, right, remaining),
        }
    };

    let tentative = solve(width.or_else(|| specified_width(style, cb_width)));
    let clamped = clamp_width(style, tentative.width, cb_width);
    if (clamped - tentative.width).abs() > f32::EPSILON {
        solve(Some(clamped))
    } else {
        tentative
    }
}

/// "If all of the above have a computed value other than 'auto', the
/// values are said to be "over-constrained" and one of the used values will
/// have to be different from its computed value. If the 'direction'
/// property of the containing block has the value 'ltr', the specified
/// value of 'margin-right' is ignored and the value is calculated so as to
/// make the equality true. If the value of 'direction' is 'rtl', this
/// happens to 'margin-left' instead."
fn over_constrained(
    style: &ComputedStyle,
    left: f32,
    width: f32,
    right: f32,
    remaining: f32,
) -> Horizontal {
    match style.direction {
        Direction::Ltr => Horizontal {
            margin_left: left,
            width,
            margin_right: remaining - left,
        },
        Direction::Rtl => Horizontal {
            margin_left: remaining - right,
            width,
            margin_right: right,
        },
    }
}

/// Lay out an in-flow block-level box whose top border edge is at
/// `border_y`.
pub(crate) fn layout_in_flow(
    ctx: &LayoutContext<'_>,
    id: NodeId,
    cb: &ContainingBlock,
    border_y: f32,
    floats: &mut FloatContext,
    pending: &mut Vec<PendingAbsolute>,
) -> BlockResult {
    let tree = ctx.tree;
    let node = &tree[id];
    let style = &node.style;
    let is_root = tree.parent(id).is_none();

    // [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
    //
    // "The border box of a table, a block-level replaced element, or an
    // element in the normal flow that establishes a new block formatting
    // context (such as an element with 'overflow' other than 'visible')
    // must not overlap the margin box of any floats in the same block
    // formatting context as the element itself. If necessary,
    // implementations should clear the said element by placing it below any
    // preceding floats, but may place it adjacent to such floats if there
    // is sufficient space."
    let mut cb = *cb;
    let mut border_y = border_y;
    if !is_root && !floats.is_empty() && (establishes_bfc(node, false) || node.is_replaced()) {
        let margins = resolve_margins_or_zero(style, cb.width);
        let needed = specified_width(style, cb.width).map_or(0.0, |w| {
            w + margins.horizontal()
                + resolve_padding(style, cb.width).horizontal()
                + resolve_border(style).horizontal()
        });
        let (y, band) = floats.find_space(needed, 0.0, border_y, cb.x, cb.right());
        border_y = y;
        if floats.is_band_narrowed(y, 0.0, cb.x, cb.right()) {
            cb.x = band.left;
            cb.width = band.width().max(0.0);
        }
    }

    if node.display() == Display::Table {
        let fragment = layout_table(ctx, id, &cb, border_y, true, pending);
        return BlockResult::new(fragment);
    }

    let margins = resolve_margins_or_zero(style, cb.width);
    if node.is_replaced() {
        let size = replaced_size(ctx, id, cb.width, cb.height);
        let h = solve_block_width(style, cb.width, Some(size.width));
        let placement = Placement {
            border_x: cb.x + h.margin_left,
            border_y,
            content_width: size.width,
            margin: EdgeSizes {
                left: h.margin_left,
                right: h.margin_right,
                ..margins
            },
            height: Some(size.height),
            border: None,
        };
        let mark = pending.len();
        let mut fragment = layout_replaced(ctx, id, &cb, &placement, size.image);
        finish_box(ctx, id, &mut fragment, &cb, pending, mark);
        return BlockResult::new(fragment);
    }

    let h = solve_block_width(style, cb.width, None);
    let placement = Placement {
        border_x: cb.x + h.margin_left,
        border_y,
        content_width: h.width,
        margin: EdgeSizes {
            left: h.margin_left,
            right: h.margin_right,
            ..margins
        },
        height: None,
        border: None,
    };
    layout_block_box(ctx, id, &cb, &placement, floats, pending)
}

/// Lay out a box that is not in normal flow (float, inline-block,
/// inline-table) with its margin box's top-left corner at the containing
/// block's origin. Auto widths shrink to fit `available_width`: the
/// containing block width, or for a float the room it is placed into.
///
/// The caller moves the returned fragment into place.
pub(crate) fn layout_detached(
    ctx: &LayoutContext<'_>,
    id: NodeId,
    cb: &ContainingBlock,
    available_width: f32,
    pending: &mut Vec<PendingAbsolute>,
) -> Fragment {
    let node = &ctx.tree[id];
    let style = &node.style;

    let margins = resolve_margins_or_zero(style, cb.width);
    if node.display().is_table() {
        return layout_table(ctx, id, cb, cb.y + margins.top, false, pending);
    }

    let edges = resolve_padding(style, cb.width).horizontal() + resolve_border(style).horizontal();
    let border_x = cb.x + margins.left;
    let border_y = cb.y + margins.top;

    if node.is_replaced() {
        let size = replaced_size(ctx, id, cb.width, cb.height);
        let placement = Placement {
            border_x,
            border_y,
            content_width: size.width,
            margin: margins,
            height: Some(size.height),
            border: None,
        };
        let mark = pending.len();
        let mut fragment = layout_replaced(ctx, id, cb, &placement, size.image);
        finish_box(ctx, id, &mut fragment, cb, pending, mark);
        return fragment;
    }

    // [§ 10.3.5 Floating, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#float-width)
    //
    // "If 'margin-left', or 'margin-right' are computed as 'auto', their
    // used value is '0'. If 'width' is computed as 'auto', the used value
    // is the "shrink-to-fit" width."
    let available = (available_width - margins.horizontal() - edges).max(0.0);
    let placement = Placement {
        border_x,
        border_y,
        content_width: shrink_to_fit(ctx, id, cb.width, available),
        margin: margins,
        height: None,
        border: None,
    };
    let mut floats = FloatContext::new();
    layout_block_box(ctx, id, cb, &placement, &mut floats, pending).fragment
}

/// Lay out a block container (or a cell, caption, inline-block) at a
/// decided placement.
pub(crate) fn layout_block_box(
    ctx: &LayoutContext<'_>,
    id: NodeId,
    cb: &ContainingBlock,
    placement: &Placement,
    floats: &mut FloatContext,
    pending: &mut Vec<PendingAbsolute>,
) -> BlockResult {
    #[cfg(feature = "layout-trace")]
    let _trace = TraceGuard::enter(ctx, id);

    let tree = ctx.tree;
    let node = &tree[id];
    let style = &node.style;
    let is_root = tree.parent(id).is_none();

    // STEP 1: Box edges and the containing block for children.
    let padding = resolve_padding(style, cb.width);
    let border = placement.border.unwrap_or_else(|| resolve_border(style));
    let content_x = placement.border_x + border.left + padding.left;
    let content_y = placement.border_y + border.top + padding.top;
    let specified = placement
        .height
        .or_else(|| specified_height(style, cb.height))
        .map(|h| clamp_height(style, h, cb.height));
    let child_cb = ContainingBlock {
        x: content_x,
        y: content_y,
        width: placement.content_width,
        height: specified,
    };

    // STEP 2: A new block formatting context gets its own float ledger.
    //
    // [§ 9.4.1](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
    let bfc = establishes_bfc(node, is_root);
    let mut own_floats = FloatContext::new();
    let floats = if bfc { &mut own_floats } else { floats };

    // STEP 3: Lay out children.
    let mark = pending.len();
    let mut fragment = Fragment::new(Some(id), node.kind, Arc::clone(style));
    let (content_bottom, trailing) = if has_inline_content(tree, id) {
        let result = layout_inline(ctx, id, &child_cb, floats, pending);
        fragment.lines = result.lines;
        fragment.children = result.floats;
        (content_y + result.height, MarginStrut::new())
    } else {
        layout_block_children(ctx, id, &child_cb, floats, pending, &mut fragment.children)
    };

    // STEP 4: Height.
    //
    // [§ 10.6.3 Block-level non-replaced elements in normal flow when
    // 'overflow' computes to 'visible'](https://www.w3.org/TR/CSS2/visudet.html#normal-block)
    //
    // [§ 10.6.7 'Auto' heights for block formatting context roots](https://www.w3.org/TR/CSS2/visudet.html#root-height)
    let height = specified.unwrap_or_else(|| {
        let mut bottom = content_bottom;
        if bfc && let Some(float_bottom) = floats.max_float_bottom() {
            bottom = bottom.max(float_bottom);
        }
        clamp_height(style, (bottom - content_y).max(0.0), cb.height)
    });

    fragment.dimensions = BoxDimensions {
        content: Rect::new(content_x, content_y, placement.content_width, height),
        padding,
        border,
        margin: placement.margin,
    };

    // STEP 5: Marker, out-of-flow descendants, relative offset.
    if node.display() == Display::ListItem {
        fragment.marker = list_marker(ctx, id, &fragment);
    }
    finish_box(ctx, id, &mut fragment, cb, pending, mark);

    let trailing = if specified.is_some() {
        MarginStrut::new()
    } else {
        trailing
    };
    BlockResult { fragment, trailing }
}

/// Stack the block-level children of `parent` inside `cb`, collapsing
/// margins as they go. Returns the bottom of the content and the margins
/// that collapse through the parent's bottom margin.
fn layout_block_children(
    ctx: &LayoutContext<'_>,
    parent: NodeId,
    cb: &ContainingBlock,
    floats: &mut FloatContext,
    pending: &mut Vec<PendingAbsolute>,
    out: &mut Vec<Fragment>,
) -> (f32, MarginStrut) {
    let tree = ctx.tree;
    let is_root = tree.parent(parent).is_none();
    let collapse_last = collapses_with_last_child(tree, parent, is_root);

    let mut cursor = cb.y;
    let mut strut = MarginStrut::new();
    // While true, children's top margins already went into the parent's
    // own collapsed top margin and they sit at the content top.
    let mut leading = collapses_with_first_child(tree, parent, is_root);

    for &child in tree.children(parent) {
        let node = &tree[child];
        if node.is_text() {
            continue;
        }

        // [§ 10.3.7](https://www.w3.org/TR/CSS2/visudet.html#abs-non-replaced-width)
        //
        // The static position is where the box would have been in flow.
        if node.style.position.is_absolutely_positioned() {
            let y = if leading { cb.y } else { cursor + strut.collapse() };
            pending.push(PendingAbsolute::new(ctx, child, cb.x, y));
            continue;
        }

        if node.style.is_floated() {
            let y = if leading { cb.y } else { cursor + strut.collapse() };
            out.push(place_float(ctx, child, cb, y, floats, pending));
            continue;
        }

        let margins = resolve_margins_or_zero(&node.style, cb.width);
        let clear = node.style.clear;

        if leading && clear == Clear::None {
            let result = layout_in_flow(ctx, child, cb, cb.y, floats, pending);
            if !collapses_through(tree, child) {
                leading = false;
                cursor = result.fragment.border_box().bottom();
                strut = MarginStrut::from_margin(margins.bottom);
                strut.merge(result.trailing);
            }
            out.push(result.fragment);
            continue;
        }
        leading = false;

        // "If the top and bottom margins of a box are adjoining, then it is
        // possible for margins to collapse through it."
        if clear == Clear::None && collapses_through(tree, child) {
            strut.merge(through_strut(tree, child, cb.width));
            let result = layout_in_flow(ctx, child, cb, cursor + strut.collapse(), floats, pending);
            out.push(result.fragment);
            continue;
        }

        strut.merge(top_chain(tree, child, cb.width));
        let mut y = cursor + strut.collapse();

        // [§ 9.5.2 Controlling flow next to floats](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
        //
        // "Clearance is introduced as spacing above the margin-top of an
        // element. It is used to push the element vertically past the
        // float."
        if clear != Clear::None {
            y = floats.clear(clear, y);
        }

        let result = layout_in_flow(ctx, child, cb, y, floats, pending);
        cursor = result.fragment.border_box().bottom();
        strut = MarginStrut::from_margin(margins.bottom);
        strut.merge(result.trailing);
        out.push(result.fragment);
    }

    if collapse_last {
        (cursor, strut)
    } else {
        (cursor + strut.collapse(), MarginStrut::new())
    }
}

/// [§ 9.5.1 Positioning the float](https://www.w3.org/TR/CSS2/visuren.html#float-position)
///
/// Lay out a float at the origin, then move it to where the float rules
/// put its margin box, no higher than `y`.
pub(crate) fn place_float(
    ctx: &LayoutContext<'_>,
    id: NodeId,
    cb: &ContainingBlock,
    y: f32,
    floats: &mut FloatContext,
    pending: &mut Vec<PendingAbsolute>,
) -> Fragment {
    let (y, room) = float_room(ctx, id, cb, y, floats);
    let mark = pending.len();
    let mut fragment = layout_detached(ctx, id, cb, room, pending);
    let (dx, dy) = settle_float(&mut fragment, cb, y, floats);
    translate_pending(pending, mark, dx, dy);
    fragment
}

/// Where a float may start and the width its auto width shrinks to fit.
///
/// [§ 9.5.2 Controlling flow next to floats](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
///
/// "When the property is set on floating elements, it results in a
/// modification of the rules for positioning the float. An extra
/// constraint (#10) is added: The top outer edge of the float must be
/// below the bottom outer edge of all earlier left-floating boxes (in the
/// case of 'clear: left')".
///
/// The float shrinks into the room beside earlier floats when its
/// narrowest layout fits there. Otherwise it will drop below them and may
/// use the whole containing block.
pub(crate) fn float_room(
    ctx: &LayoutContext<'_>,
    id: NodeId,
    cb: &ContainingBlock,
    y: f32,
    floats: &FloatContext,
) -> (f32, f32) {
    let y = floats.clear(ctx.tree[id].style.clear, y);
    let band = floats.float_band(y, cb.x, cb.right());
    let narrowest = outer_widths(ctx, id, 0).min;
    let room = if narrowest <= band.width() + FIT_EPSILON {
        band.width()
    } else {
        cb.width
    };
    (y, room)
}

/// Record a float laid out at the origin in `floats` and move it to its
/// place. Returns the offset applied, for the float's pending boxes.
pub(crate) fn settle_float(
    fragment: &mut Fragment,
    cb: &ContainingBlock,
    y: f32,
    floats: &mut FloatContext,
) -> (f32, f32) {
    let margin_box = flow_margin_box(fragment, cb);
    let side = FloatSide::from_float(fragment.style.float).unwrap_or(FloatSide::Left);
    let placed = floats.place_float(
        side,
        margin_box.width,
        margin_box.height,
        y,
        cb.x,
        cb.right(),
    );
    let (dx, dy) = (placed.x - margin_box.x, placed.y - margin_box.y);
    fragment.translate(dx, dy);
    (dx, dy)
}

/// The margin box a fragment occupies in flow: its margin box without any
/// relative offset.
pub(crate) fn flow_margin_box(fragment: &Fragment, cb: &ContainingBlock) -> Rect {
    let (dx, dy) = relative_offset(&fragment.style, cb);
    fragment.margin_box().translated(-dx, -dy)
}

/// Work common to every box once its geometry is known: the background
/// image, absolutely positioned descendants that use it as containing
/// block, and the relative offset.
pub(crate) fn finish_box(
    ctx: &LayoutContext<'_>,
    id: NodeId,
    fragment: &mut Fragment,
    cb: &ContainingBlock,
    pending: &mut Vec<PendingAbsolute>,
    mark: usize,
) {
    let style = Arc::clone(&fragment.style);
    if let Some(src) = &style.background_image {
        let info = load_or_placeholder(ctx.images, src, ctx.warnings);
        fragment.background_image = Some(info.handle().clone());
    }

    let is_root = ctx.tree.parent(id).is_none();
    if is_root || style.position.is_positioned() {
        resolve_pending(ctx, fragment, pending, mark, is_root);
    }

    // [§ 9.4.3 Relative positioning](https://www.w3.org/TR/CSS2/visuren.html#relative-positioning)
    //
    // "Once a box has been laid out according to the normal flow or
    // floated, it may be shifted relative to this position."
    if style.position == Position::Relative {
        let (dx, dy) = relative_offset(&style, cb);
        fragment.translate(dx, dy);
        translate_pending(pending, mark, dx, dy);
    }
}

/// [§ 12.5.1 Lists](https://www.w3.org/TR/CSS2/generate.html#lists)
///
/// An outside marker, right-aligned half an em left of the principal box
/// and sharing the baseline of its first line.
fn list_marker(ctx: &LayoutContext<'_>, id: NodeId, fragment: &Fragment) -> Option<MarkerFragment> {
    let node = &ctx.tree[id];
    let style = &node.style;
    let text = marker_text(style.list_style_type, node.list_ordinal.unwrap_or(1))?;
    let metrics = InlineMetrics::of(ctx.metrics, style);
    let width = measure(ctx.metrics, &text, style);
    let gap = style.font.size * 0.5;
    let content = fragment.dimensions.content;
    let baseline = fragment
        .first_baseline()
        .unwrap_or(content.y + metrics.half_leading_ascent());
    let left = fragment.border_box().x - gap - width;
    Some(MarkerFragment {
        text,
        rect: Rect::new(
            left,
            baseline - metrics.ascent,
            width,
            metrics.ascent + metrics.descent,
        ),
        baseline,
        font: style.font.clone(),
        color: style.color,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{AutoLength, LengthValue, Sides};

    #[test]
    fn test_auto_margins_center() {
        let mut style = ComputedStyle::with_display(Display::Block);
        style.width = AutoLength::px(200.0);
        style.margin = Sides::all(AutoLength::Auto);
        let h = solve_block_width(&style, 400.0, None);
        assert!((h.margin_left - 100.0).abs() < 0.01);
        assert!((h.margin_right - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_over_constrained_rtl_adjusts_left_margin() {
        let mut style = ComputedStyle::with_display(Display::Block);
        style.width = AutoLength::px(200.0);
        style.margin = Sides::all(AutoLength::px(10.0));
        style.direction = Direction::Rtl;
        let h = solve_block_width(&style, 400.0, None);
        assert!((h.margin_left - 190.0).abs() < 0.01);
        assert!((h.margin_right - 10.0).abs() < 0.01);
    }

    #[test]
    fn test_max_width_reruns_the_equation() {
        let mut style = ComputedStyle::with_display(Display::Block);
        style.max_width = Some(LengthValue::Px(100.0));
        style.margin.left = AutoLength::Auto;
        let h = solve_block_width(&style, 400.0, None);
        assert!((h.width - 100.0).abs() < 0.01);
        assert!((h.margin_left - 300.0).abs() < 0.01);
    }
}
