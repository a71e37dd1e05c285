//! CSS Backgrounds
//!
//! [§ 14.2 The background](https://www.w3.org/TR/CSS2/colors.html#background)
//!
//! This module implements the special rules for canvas background
//! propagation.

use quokka_common::image::ImageHandle;
use quokka_tree::NodeId;

use crate::layout::{Fragment, FragmentTree, Rect};
use crate::style::{ColorValue, ComputedStyle};

/// The background that fills the whole canvas, and the box it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasBackground {
    /// Color filling the viewport.
    pub color: ColorValue,
    /// Image painted over the color, positioned by the source box.
    pub image: Option<ImageHandle>,
    /// Padding box of the source box, where the image goes.
    pub image_area: Rect,
    /// Box whose own background is not painted again at its position.
    pub source: NodeId,
}

/// Whether a box has a background worth painting.
#[must_use]
pub fn has_background(style: &ComputedStyle, image: Option<&ImageHandle>) -> bool {
    !style.background_color.is_transparent() || image.is_some()
}

/// [§ 14.2 The background](https://www.w3.org/TR/CSS2/colors.html#background)
///
/// "The background of the root element becomes the background of the
/// canvas and covers the entire canvas".
///
/// "For HTML documents whose root HTML element has computed values of
/// 'transparent' for 'background-color' and 'none' for 'background-image',
/// user agents must instead use the computed value of the background
/// properties from that element's first BODY element child when painting
/// backgrounds for the canvas, and must not paint a background for that
/// BODY element."
///
/// The body stands for the root's first in-flow child. Returns `None` when
/// neither box has a background.
#[must_use]
pub fn canvas_background(tree: &FragmentTree) -> Option<CanvasBackground> {
    let root = &tree.root;
    if let Some(canvas) = from_fragment(root) {
        return Some(canvas);
    }
    let body = root.children.iter().find(|child| child.is_in_flow_block())?;
    from_fragment(body)
}

fn from_fragment(fragment: &Fragment) -> Option<CanvasBackground> {
    let source = fragment.node?;
    if !has_background(&fragment.style, fragment.background_image.as_ref()) {
        return None;
    }
    Some(CanvasBackground {
        color: fragment.style.background_color,
        image: fragment.background_image.clone(),
        image_area: fragment.padding_box(),
        source,
    })
}
