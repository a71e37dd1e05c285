//! CSS Layout Engine
//!
//! This module implements the CSS 2.1 Visual Formatting Model: it turns a
//! normalized box tree into a tree of positioned [`Fragment`]s.
//!
//! # Relevant Specifications
//!
//! - [CSS 2.1 Box Model](https://www.w3.org/TR/CSS2/box.html)
//! - [CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html)
//! - [CSS 2.1 Visual Formatting Model Details](https://www.w3.org/TR/CSS2/visudet.html)
//! - [CSS 2.1 Tables](https://www.w3.org/TR/CSS2/tables.html)
//!
//! # Module Structure
//!
//! - [`box_tree`] - Styled input tree and anonymous box normalization
//! - [`box_model`] - Box dimensions, rectangles, and edge sizes
//! - [`values`] - Used-value resolution of lengths and percentages
//! - [`margins`] - Margin collapsing
//! - [`float`] - Float placement and clearance
//! - [`font`] - The font metrics contract
//! - [`text`] - White space processing and text measurement
//! - [`list`] - List marker text
//! - [`fragment`] - Layout output
//!
//! Block, inline, table, replaced and positioned layout are internal: the
//! only way in is [`layout`].
//!
//! # Coordinates
//!
//! Every fragment carries absolute coordinates in the space of the initial
//! containing block, whose origin is the top-left corner of the viewport.

pub mod box_model;
pub mod box_tree;
pub mod float;
pub mod font;
pub mod fragment;
pub mod list;
pub mod margins;
pub mod text;
pub mod values;

mod block;
mod inline;
mod intrinsic;
mod positioned;
mod replaced;
mod table;

pub use box_model::{BoxDimensions, EdgeSizes, Rect};
pub use box_tree::{BoxKind, BoxNode, BoxTree, StyledNode, normalize};
pub use font::{ApproximateFontMetrics, FontMetrics};
pub use fragment::{Fragment, FragmentTree, InvariantError};
pub use positioned::BoxOffsets;
pub use values::ContainingBlock;

use quokka_common::image::ImageProvider;
use quokka_common::warning::Warnings;
use serde::{Deserialize, Serialize};

use crate::style::ColorValue;

use block::layout_in_flow;
use float::FloatContext;
use values::resolve_margins_or_zero;

/// Highlight color used when the host does not pick one.
pub const DEFAULT_SELECTION_COLOR: ColorValue = ColorValue {
    r: 179,
    g: 215,
    b: 255,
    a: 255,
};

/// Inputs to a layout pass besides the tree itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LayoutOptions {
    /// Width of the viewport, and of the initial containing block.
    pub viewport_width: f32,
    /// Height of the viewport, and of the initial containing block.
    pub viewport_height: f32,
    /// Fill painted beneath selected text.
    pub selection_color: ColorValue,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
            selection_color: DEFAULT_SELECTION_COLOR,
        }
    }
}

impl LayoutOptions {
    /// [§ 10.1 Definition of "containing block"](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)
    ///
    /// "The containing block in which the root element lives is a rectangle
    /// called the initial containing block. For continuous media, it has the
    /// dimensions of the viewport and is anchored at the canvas origin".
    #[must_use]
    pub fn viewport(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            self.viewport_width.max(0.0),
            self.viewport_height.max(0.0),
        )
    }
}

/// Shared, read-only state of one layout pass.
pub(crate) struct LayoutContext<'a> {
    pub tree: &'a BoxTree,
    pub metrics: &'a dyn FontMetrics,
    pub images: &'a dyn ImageProvider,
    pub warnings: &'a Warnings,
    pub viewport: Rect,
}

/// Normalize `root` and lay it out.
#[must_use]
pub fn layout(
    root: &StyledNode,
    metrics: &dyn FontMetrics,
    images: &dyn ImageProvider,
    options: &LayoutOptions,
) -> FragmentTree {
    let tree = normalize(root);
    layout_tree(&tree, metrics, images, options, &Warnings::new())
}

/// Lay out an already normalized box tree.
///
/// The pass is a pure function of its inputs: the float ledger and the
/// list of pending absolutely positioned boxes live on this call's stack.
/// Degraded input (an image that fails to load, a table without columns)
/// is reported once per message into `warnings`.
#[must_use]
pub fn layout_tree(
    tree: &BoxTree,
    metrics: &dyn FontMetrics,
    images: &dyn ImageProvider,
    options: &LayoutOptions,
    warnings: &Warnings,
) -> FragmentTree {
    let viewport = options.viewport();
    let ctx = LayoutContext {
        tree,
        metrics,
        images,
        warnings,
        viewport,
    };

    let root = tree.root();
    let cb = ContainingBlock::from_rect(viewport);
    let margin_top = resolve_margins_or_zero(&tree[root].style, cb.width).top;

    // The root establishes the initial block formatting context and is the
    // containing block of last resort for absolutely positioned boxes.
    let mut floats = FloatContext::new();
    let mut pending = Vec::new();
    let result = layout_in_flow(&ctx, root, &cb, cb.y + margin_top, &mut floats, &mut pending);

    let fragments = FragmentTree {
        root: result.fragment,
        viewport,
    };

    #[cfg(debug_assertions)]
    if let Err(err) = fragments.check_invariants() {
        log::error!(target: "layout", "fragment tree invariant violated: {err}");
    }

    fragments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{AutoLength, ComputedStyle, Display};
    use quokka_common::image::NoImages;

    #[test]
    fn test_root_fills_viewport_width() {
        let root = StyledNode::element(
            BoxKind::Block,
            ComputedStyle::with_display(Display::Block),
            vec![],
        );
        let options = LayoutOptions {
            viewport_width: 640.0,
            ..LayoutOptions::default()
        };
        let tree = layout(&root, &ApproximateFontMetrics, &NoImages, &options);
        assert!((tree.root.dimensions.content.width - 640.0).abs() < 0.01);
        assert!(tree.check_invariants().is_ok());
    }

    #[test]
    fn test_root_margin_offsets_border_box() {
        let mut style = ComputedStyle::with_display(Display::Block);
        style.margin.top = AutoLength::px(12.0);
        style.margin.left = AutoLength::px(8.0);
        let root = StyledNode::element(BoxKind::Block, style, vec![]);
        let tree = layout(&root, &ApproximateFontMetrics, &NoImages, &LayoutOptions::default());
        let border = tree.root.border_box();
        assert!((border.y - 12.0).abs() < 0.01);
        assert!((border.x - 8.0).abs() < 0.01);
    }
}
