//! Replaced elements.
//!
//! [§ 10.3.2 Inline, replaced elements](https://www.w3.org/TR/CSS2/visudet.html#inline-replaced-width)
//!
//! "A replaced element is an element whose content is outside the scope of
//! the CSS formatting model, such as an image, embedded document, or
//! applet."

use std::sync::Arc;

use quokka_common::image::{ImageHandle, load_or_placeholder};
use quokka_tree::NodeId;

use super::LayoutContext;
use super::block::Placement;
use super::box_model::{BoxDimensions, Rect};
use super::fragment::Fragment;
use super::values::{
    ContainingBlock, clamp_height, clamp_width, resolve_border, resolve_padding, specified_height,
    specified_width,
};

/// "Otherwise, if 'width' has a computed value of 'auto', and the element
/// has an intrinsic width, then that intrinsic width is the used value of
/// 'width'. ... Otherwise, if 'width' has a computed value of 'auto', ...
/// the used value of 'width' becomes 300px."
const DEFAULT_WIDTH: f32 = 300.0;

/// "Otherwise, if 'height' has a computed value of 'auto', ... the used
/// value of 'height' must be set to the height of the largest rectangle
/// that has a 2:1 ratio, has a height not greater than 150px".
const DEFAULT_HEIGHT: f32 = 150.0;

/// Used content size of a replaced box.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ReplacedSize {
    pub width: f32,
    pub height: f32,
    pub image: Option<ImageHandle>,
}

/// [§ 10.3.2](https://www.w3.org/TR/CSS2/visudet.html#inline-replaced-width)
/// and [§ 10.6.2 Inline replaced elements, block-level replaced elements in
/// normal flow, 'inline-block' replaced elements in normal flow and
/// floating replaced elements](https://www.w3.org/TR/CSS2/visudet.html#inline-replaced-height)
///
/// Width and height from the specified values, the intrinsic size, and the
/// intrinsic ratio, then clamped by min/max.
pub(crate) fn replaced_size(
    ctx: &LayoutContext<'_>,
    id: NodeId,
    cb_width: f32,
    cb_height: Option<f32>,
) -> ReplacedSize {
    let node = &ctx.tree[id];
    let style = &node.style;

    let (intrinsic, image) = match &node.image {
        Some(src) => {
            let info = load_or_placeholder(ctx.images, src, ctx.warnings);
            (info.dimensions_f32(), Some(info.handle().clone()))
        }
        None => ((DEFAULT_WIDTH, DEFAULT_HEIGHT), None),
    };
    let (iw, ih) = intrinsic;
    let ratio = (ih > 0.0).then(|| iw / ih);

    let width = specified_width(style, cb_width);
    let height = specified_height(style, cb_height);
    let (mut w, mut h) = match (width, height) {
        (Some(w), Some(h)) => (w, h),
        // "if 'width' has a computed value of 'auto', 'height' has some
        // other computed value, and the element does have an intrinsic
        // ratio then the used value of 'width' is: (used height) *
        // (intrinsic ratio)"
        (None, Some(h)) => (ratio.map_or(iw, |r| h * r), h),
        (Some(w), None) => (w, ratio.map_or(ih, |r| if r > 0.0 { w / r } else { ih })),
        (None, None) => (iw, ih),
    };

    // [§ 10.4](https://www.w3.org/TR/CSS2/visudet.html#min-max-widths)
    //
    // Clamp the width, and keep the ratio when the height was derived.
    let clamped = clamp_width(style, w, cb_width);
    if (clamped - w).abs() > f32::EPSILON {
        w = clamped;
        if height.is_none()
            && let Some(r) = ratio.filter(|r| *r > 0.0)
        {
            h = w / r;
        }
    }
    h = clamp_height(style, h, cb_height);

    ReplacedSize {
        width: w.max(0.0),
        height: h.max(0.0),
        image,
    }
}

/// Build the fragment of a replaced box at `placement`. The content height
/// comes from `placement.height`.
pub(crate) fn layout_replaced(
    ctx: &LayoutContext<'_>,
    id: NodeId,
    cb: &ContainingBlock,
    placement: &Placement,
    image: Option<ImageHandle>,
) -> Fragment {
    let node = &ctx.tree[id];
    let style = &node.style;
    let padding = resolve_padding(style, cb.width);
    let border = resolve_border(style);

    let mut fragment = Fragment::new(Some(id), node.kind, Arc::clone(style));
    fragment.dimensions = BoxDimensions {
        content: Rect::new(
            placement.border_x + border.left + padding.left,
            placement.border_y + border.top + padding.top,
            placement.content_width,
            placement.height.unwrap_or(0.0),
        ),
        padding,
        border,
        margin: placement.margin,
    };
    fragment.image = image;
    fragment.source_rect = node.source_rect;
    fragment
}
