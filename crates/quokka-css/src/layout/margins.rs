//! Vertical margin collapsing.
//!
//! [§ 8.3.1 Collapsing margins](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)
//!
//! "In CSS, the adjoining margins of two or more boxes (which might or might
//! not be siblings) can combine to form a single margin. Margins that
//! combine this way are said to collapse, and the resulting combined margin
//! is called a collapsed margin."
//!
//! Margins are accumulated in a [`MarginStrut`] and only resolved into a
//! distance once the box that follows them is positioned.

use quokka_tree::NodeId;

use crate::style::{Clear, Display, Overflow};

use super::block::solve_block_width;
use super::box_tree::{BoxKind, BoxNode, BoxTree};
use super::values::{is_auto_or_zero_height, is_zero_length, resolve_margins_or_zero};

/// Margins that are adjoining but not yet collapsed.
///
/// Holds the largest positive and the most negative margin seen so far.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarginStrut {
    positive: f32,
    negative: f32,
}

impl MarginStrut {
    /// No margins yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            positive: 0.0,
            negative: 0.0,
        }
    }

    /// A strut holding one margin.
    #[must_use]
    pub fn from_margin(margin: f32) -> Self {
        let mut strut = Self::new();
        strut.append(margin);
        strut
    }

    /// Add a margin to the adjoining set.
    pub fn append(&mut self, margin: f32) {
        if margin > 0.0 {
            self.positive = self.positive.max(margin);
        } else if margin < 0.0 {
            self.negative = self.negative.min(margin);
        }
    }

    /// Merge another set of adjoining margins into this one.
    pub fn merge(&mut self, other: Self) {
        self.positive = self.positive.max(other.positive);
        self.negative = self.negative.min(other.negative);
    }

    /// "the maximum of the absolute values of the negative adjoining margins
    /// is deducted from the maximum of the positive adjoining margins."
    #[must_use]
    pub fn collapse(&self) -> f32 {
        self.positive + self.negative
    }

    /// No margin accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positive == 0.0 && self.negative == 0.0
    }
}

/// Collapse two adjoining margins.
///
/// "When two or more margins collapse, the resulting margin width is the
/// maximum of the collapsing margins' widths. In the case of negative
/// margins, the maximum of the absolute values of the negative adjoining
/// margins is deducted from the maximum of the positive adjoining margins.
/// If there are no positive margins, the maximum of the absolute values of
/// the adjoining margins is deducted from zero."
#[must_use]
pub fn collapse_two_margins(a: f32, b: f32) -> f32 {
    let mut strut = MarginStrut::from_margin(a);
    strut.append(b);
    strut.collapse()
}

/// [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
///
/// "Floats, absolutely positioned elements, block containers (such as
/// inline-blocks, table-cells, and table-captions) that are not block boxes,
/// and block boxes with 'overflow' other than 'visible' (except when that
/// value has been propagated to the viewport) establish new block formatting
/// contexts for their contents."
#[must_use]
pub fn establishes_bfc(node: &BoxNode, is_root: bool) -> bool {
    let style = &node.style;
    is_root
        || style.is_out_of_flow()
        || !matches!(style.display, Display::Block | Display::ListItem)
        || style.overflow != Overflow::Visible
}

/// Block container whose children are inline-level (it generates line
/// boxes if any content is rendered).
#[must_use]
pub fn has_inline_content(tree: &BoxTree, id: NodeId) -> bool {
    tree.children(id).iter().any(|&c| tree[c].is_inline_level())
}

/// Whether the container's inline content would produce a line box.
///
/// [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
///
/// "Line boxes that contain no text, no preserved white space, no inline
/// elements with non-zero margins, padding, or borders or other in-flow
/// content (such as images, inline blocks or inline tables), and do not
/// end with a preserved newline must be treated as zero-height line boxes
/// for the purposes of determining the positions of any elements inside of
/// them, and must be treated as not existing for any other purpose."
#[must_use]
pub fn generates_line_boxes(tree: &BoxTree, id: NodeId) -> bool {
    tree.children(id).iter().any(|&c| {
        let node = &tree[c];
        if node.is_text() {
            return !node.is_collapsible_whitespace();
        }
        if !node.is_inline_level() {
            return false;
        }
        if node.is_atomic_inline() || node.kind == BoxKind::LineBreak {
            return true;
        }
        let style = &node.style;
        let edges = !is_zero_length(style.padding.left)
            || !is_zero_length(style.padding.right)
            || style.border.left.used_width() > 0.0
            || style.border.right.used_width() > 0.0
            || matches!(style.margin.left.resolve(0.0), Some(m) if m != 0.0)
            || matches!(style.margin.right.resolve(0.0), Some(m) if m != 0.0);
        edges || generates_line_boxes(tree, c)
    })
}

fn has_top_border_or_padding(node: &BoxNode) -> bool {
    node.style.border.top.used_width() > 0.0 || !is_zero_length(node.style.padding.top)
}

fn has_bottom_border_or_padding(node: &BoxNode) -> bool {
    node.style.border.bottom.used_width() > 0.0 || !is_zero_length(node.style.padding.bottom)
}

fn is_block_box(node: &BoxNode) -> bool {
    !node.is_replaced() && matches!(node.display(), Display::Block | Display::ListItem)
}

/// "The top margin of an in-flow block element collapses with its first
/// in-flow block-level child's top margin value if the element has no top
/// border, no top padding, and the child has no clearance."
#[must_use]
pub fn collapses_with_first_child(tree: &BoxTree, id: NodeId, is_root: bool) -> bool {
    let node = &tree[id];
    is_block_box(node)
        && !establishes_bfc(node, is_root)
        && !has_top_border_or_padding(node)
        && !has_inline_content(tree, id)
}

/// "The bottom margin of an in-flow block box with a 'height' of 'auto' and
/// a 'min-height' of zero collapses with its last in-flow block-level
/// child's bottom margin if the box has no bottom padding and no bottom
/// border and the child's bottom margin does not collapse with a top margin
/// that has clearance."
#[must_use]
pub fn collapses_with_last_child(tree: &BoxTree, id: NodeId, is_root: bool) -> bool {
    let node = &tree[id];
    is_block_box(node)
        && !establishes_bfc(node, is_root)
        && !has_bottom_border_or_padding(node)
        && node.style.height.is_auto()
        && is_zero_length(node.style.min_height)
        && !has_inline_content(tree, id)
}

/// "A box's own margins collapse if the 'min-height' property is computed
/// as zero, the 'height' property is computed as zero or 'auto', it does not
/// establish a new block formatting context, and it contains no in-flow
/// content (i.e., has no in-flow line boxes and no in-flow block-level
/// children)."
///
/// Children that themselves collapse through do not count as content.
#[must_use]
pub fn collapses_through(tree: &BoxTree, id: NodeId) -> bool {
    let node = &tree[id];
    is_block_box(node)
        && !establishes_bfc(node, tree.parent(id).is_none())
        && !has_top_border_or_padding(node)
        && !has_bottom_border_or_padding(node)
        && is_auto_or_zero_height(&node.style)
        && is_zero_length(node.style.min_height)
        && !generates_line_boxes(tree, id)
        && tree.children(id).iter().all(|&c| {
            let child = &tree[c];
            child.is_out_of_flow() || child.is_text() || collapses_through(tree, c)
        })
}

/// Margins of a box that collapses through, together with all of its
/// in-flow descendants' margins.
///
/// `cb_width` is the width of `id`'s containing block. Descendants resolve
/// percentages against their own containing block, the content width of
/// the level above.
#[must_use]
pub fn through_strut(tree: &BoxTree, id: NodeId, cb_width: f32) -> MarginStrut {
    let style = &tree[id].style;
    let margins = resolve_margins_or_zero(style, cb_width);
    let mut strut = MarginStrut::from_margin(margins.top);
    strut.append(margins.bottom);
    let inner_width = solve_block_width(style, cb_width, None).width;
    for &child in tree.children(id) {
        if tree[child].is_in_flow_block_level() {
            strut.merge(through_strut(tree, child, inner_width));
        }
    }
    strut
}

/// The set of margins adjoining the top border edge of `id`: its own top
/// margin plus, when it collapses with its first child, the leading
/// children's margins down to the first child with content.
///
/// Percentages resolve against `cb_width` for `id` and against the content
/// width of each enclosing level below it.
#[must_use]
pub fn top_chain(tree: &BoxTree, id: NodeId, cb_width: f32) -> MarginStrut {
    let style = &tree[id].style;
    let margins = resolve_margins_or_zero(style, cb_width);
    let mut strut = MarginStrut::from_margin(margins.top);
    if !collapses_with_first_child(tree, id, tree.parent(id).is_none()) {
        return strut;
    }
    let inner_width = solve_block_width(style, cb_width, None).width;
    for &child in tree.children(id) {
        let node = &tree[child];
        if !node.is_in_flow_block_level() {
            continue;
        }
        if node.style.clear != Clear::None {
            break;
        }
        if collapses_through(tree, child) {
            strut.merge(through_strut(tree, child, inner_width));
            continue;
        }
        strut.merge(top_chain(tree, child, inner_width));
        break;
    }
    strut
}
