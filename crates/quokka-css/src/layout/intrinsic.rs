//! Intrinsic widths and shrink-to-fit.
//!
//! [§ 10.3.5 Floating, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#float-width)
//!
//! "Calculation of the shrink-to-fit width is similar to calculating the
//! width of a table cell using the automatic table layout algorithm.
//! Roughly: calculate the preferred width by formatting the content without
//! breaking lines other than where explicit line breaks occur, and also
//! calculate the preferred minimum width, e.g., by trying all possible line
//! breaks."

use quokka_tree::NodeId;

use crate::style::{AutoLength, ComputedStyle, LengthValue};

use super::LayoutContext;
use super::inline::inline_content_widths;
use super::margins::has_inline_content;
use super::replaced::replaced_size;
use super::table::table_widths;
use super::values::{clamp_width, resolve_border, specified_width};

/// Nesting depth past which intrinsic sizing gives up and reports zero.
const MAX_DEPTH: usize = 64;

/// Preferred minimum and preferred widths.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Widths {
    pub min: f32,
    pub max: f32,
}

impl Widths {
    pub(crate) const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub(crate) fn max_of(self, other: Self) -> Self {
        Self {
            min: self.min.max(other.min),
            max: self.max.max(other.max),
        }
    }

    pub(crate) fn plus(self, extra: f32) -> Self {
        Self {
            min: self.min + extra,
            max: self.max + extra,
        }
    }
}

/// Horizontal margins with percentages and `auto` taken as zero.
fn horizontal_margins(style: &ComputedStyle) -> f32 {
    let margin = |m: AutoLength| match m {
        AutoLength::Length(len) if !len.is_percent() => len.resolve(0.0),
        _ => 0.0,
    };
    margin(style.margin.left) + margin(style.margin.right)
}

/// Horizontal padding, border and margin with percentages and `auto`
/// taken as zero.
pub(crate) fn horizontal_edges(style: &ComputedStyle) -> f32 {
    let padding = |p: LengthValue| if p.is_percent() { 0.0 } else { p.resolve(0.0) };
    horizontal_margins(style)
        + padding(style.padding.left)
        + padding(style.padding.right)
        + resolve_border(style).horizontal()
}

/// Widths of a box's content box. Tables report their border box, since
/// their padding and borders take part in the column algorithm.
pub(crate) fn content_widths(ctx: &LayoutContext<'_>, id: NodeId, depth: usize) -> Widths {
    if depth > MAX_DEPTH {
        return Widths::default();
    }
    let tree = ctx.tree;
    let node = &tree[id];

    if node.is_replaced() {
        let w = replaced_size(ctx, id, 0.0, None).width;
        return Widths::new(w, w);
    }
    if node.display().is_table() {
        return table_widths(ctx, id, depth + 1);
    }
    if has_inline_content(tree, id) {
        return inline_content_widths(ctx, id, depth + 1);
    }

    // Block children stack, so the widest one wins. Consecutive floats sit
    // side by side in the preferred width.
    let mut widths = Widths::default();
    let mut float_run = Widths::default();
    for &child in tree.children(id) {
        let child_node = &tree[child];
        if child_node.is_text() || child_node.style.position.is_absolutely_positioned() {
            continue;
        }
        let outer = outer_widths(ctx, child, depth + 1);
        if child_node.style.is_floated() {
            float_run = Widths::new(float_run.min.max(outer.min), float_run.max + outer.max);
            widths = widths.max_of(float_run);
        } else {
            float_run = Widths::default();
            widths = widths.max_of(outer);
        }
    }
    widths
}

/// Widths a box contributes to its parent: its margin box.
pub(crate) fn outer_widths(ctx: &LayoutContext<'_>, id: NodeId, depth: usize) -> Widths {
    let node = &ctx.tree[id];
    let style = &node.style;
    let edges = horizontal_edges(style);

    if node.display().is_table() {
        return content_widths(ctx, id, depth).plus(horizontal_margins(style));
    }

    if let AutoLength::Length(len) = style.width
        && !len.is_percent()
        && !node.is_replaced()
    {
        let w = clamp_width(style, len.resolve(0.0).max(0.0), 0.0);
        return Widths::new(w, w).plus(edges);
    }

    let content = content_widths(ctx, id, depth);
    Widths::new(
        clamp_width(style, content.min, 0.0),
        clamp_width(style, content.max, 0.0),
    )
    .plus(edges)
}

/// "the shrink-to-fit width is: min(max(preferred minimum width, available
/// width), preferred width)."
///
/// Returns the used content width for a box whose `width` may be `auto`.
/// `available` is the containing block width minus the box's margins,
/// borders and padding.
pub(crate) fn shrink_to_fit(
    ctx: &LayoutContext<'_>,
    id: NodeId,
    cb_width: f32,
    available: f32,
) -> f32 {
    let style = &ctx.tree[id].style;
    if let Some(w) = specified_width(style, cb_width) {
        return clamp_width(style, w, cb_width);
    }
    let content = content_widths(ctx, id, 0);
    let fit = content.min.max(available).min(content.max);
    clamp_width(style, fit, cb_width)
}
