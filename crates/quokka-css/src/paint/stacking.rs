//! CSS Stacking Contexts and Painting Order.
//!
//! [§ 9.9 Layered presentation](https://www.w3.org/TR/CSS2/visuren.html#layers)
//!
//! "An element in CSS 2 may have a stack level, which describes its position
//! within a set of elements sharing the same stacking context."
//!
//! [CSS 2.1 Appendix E: Elaborate description of Stacking Contexts](https://www.w3.org/TR/CSS2/zindex.html)

use crate::layout::fragment::InlineFragment;
use crate::layout::{Fragment, Rect};
use crate::style::{ComputedStyle, Overflow, Position};

/// A box painted as a unit at its stack level instead of in tree order.
#[derive(Debug, Clone)]
pub(super) struct Layer<'a> {
    /// The layered box.
    pub fragment: &'a Fragment,
    /// [§ 9.9.1 Specifying the stack level: the 'z-index' property](https://www.w3.org/TR/CSS2/visuren.html#z-index)
    ///
    /// "auto: The stack level of the generated box in the current stacking
    /// context is 0."
    pub stack_level: i32,
    /// Whether the box establishes its own stacking context. A positioned
    /// box with `z-index: auto` does not, so its positioned descendants
    /// join the enclosing context.
    pub is_context: bool,
    /// Padding boxes of the `overflow` clipping ancestors between the
    /// stacking context root and this box, outermost first.
    pub clips: Vec<Rect>,
}

/// [§ 11.1.1 Overflow: the 'overflow' property](https://www.w3.org/TR/CSS2/visufx.html#overflow)
///
/// "hidden: This value indicates that the content is clipped and that no
/// scrolling user interface should be provided to view the content outside
/// the clipping region."
pub(super) fn clips_overflow(style: &ComputedStyle) -> bool {
    style.overflow != Overflow::Visible
}

/// Positioned boxes and stacking context roots paint in their own layer.
pub(super) fn is_layered(style: &ComputedStyle) -> bool {
    style.position.is_positioned() || style.creates_stacking_context()
}

/// Fragments nested directly in `fragment`: block-level children and the
/// atomic inlines of its line boxes.
pub(super) fn child_fragments(fragment: &Fragment) -> impl Iterator<Item = &Fragment> {
    let atomics = fragment.lines.iter().flat_map(|line| {
        line.items.iter().filter_map(|item| match item {
            InlineFragment::Atomic(atomic) => Some(atomic.as_ref()),
            _ => None,
        })
    });
    fragment.children.iter().chain(atomics)
}

/// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
///
/// Collect the layers of the stacking context rooted at `root`, sorted
/// back to front.
///
/// "Boxes with the same stack level in a stacking context are stacked
/// back-to-front according to document tree order."
///
/// Within one stack level, positioned boxes that do not form a context
/// paint before the contexts. `clip_root` records the root's own overflow
/// clip on every layer; the root of the whole tree has nothing to clip
/// against.
pub(super) fn collect_layers(root: &Fragment, clip_root: bool) -> Vec<Layer<'_>> {
    let mut clips = Vec::new();
    if clip_root && clips_overflow(&root.style) {
        clips.push(root.padding_box());
    }
    let mut layers = Vec::new();
    collect_into(root, &mut clips, &mut layers);
    // Stable, so tree order survives within a stack level.
    layers.sort_by_key(|layer| (layer.stack_level, layer.is_context));
    layers
}

fn collect_into<'a>(fragment: &'a Fragment, clips: &mut Vec<Rect>, layers: &mut Vec<Layer<'a>>) {
    for child in child_fragments(fragment) {
        let style = &child.style;
        if !is_layered(style) {
            descend(child, clips, layers);
            continue;
        }
        let is_context = style.creates_stacking_context();
        // [§ 11.1.1](https://www.w3.org/TR/CSS2/visufx.html#overflow)
        //
        // "[overflow] affects the clipping of all of the element's content
        // except any descendant elements (and their respective content and
        // descendants) whose containing block is the viewport or an ancestor
        // of the element"
        //
        // Absolute fragments hang under their containing block, so only
        // fixed boxes escape the clips collected on the way down.
        let clips_here = if style.position == Position::Fixed {
            Vec::new()
        } else {
            clips.clone()
        };
        layers.push(Layer {
            fragment: child,
            stack_level: if style.position.is_positioned() {
                style.z_index.unwrap_or(0)
            } else {
                0
            },
            is_context,
            clips: clips_here,
        });
        // A positioned box without its own context hands its positioned
        // descendants to ours.
        if !is_context {
            descend(child, clips, layers);
        }
    }
}

/// Recurse into `fragment`, adding its clip for the layers found below.
fn descend<'a>(fragment: &'a Fragment, clips: &mut Vec<Rect>, layers: &mut Vec<Layer<'a>>) {
    let clipping = clips_overflow(&fragment.style);
    if clipping {
        clips.push(fragment.padding_box());
    }
    collect_into(fragment, clips, layers);
    if clipping {
        let _ = clips.pop();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::layout::BoxKind;
    use crate::style::Display;

    fn fragment(position: Position, z_index: Option<i32>) -> Fragment {
        let mut style = ComputedStyle::with_display(Display::Block);
        style.position = position;
        style.z_index = z_index;
        Fragment::new(None, BoxKind::Block, Arc::new(style))
    }

    #[test]
    fn test_layers_sorted_by_z_index_then_tree_order() {
        let mut root = fragment(Position::Static, None);
        root.children.push(fragment(Position::Relative, Some(2)));
        root.children.push(fragment(Position::Absolute, Some(-1)));
        root.children.push(fragment(Position::Relative, None));
        root.children.push(fragment(Position::Static, None));

        let levels: Vec<i32> = collect_layers(&root, false).iter().map(|l| l.stack_level).collect();
        assert_eq!(levels, vec![-1, 0, 2]);
    }

    #[test]
    fn test_auto_z_index_box_passes_descendants_up() {
        let mut outer = fragment(Position::Relative, None);
        outer.children.push(fragment(Position::Absolute, Some(5)));
        let mut context = fragment(Position::Relative, Some(1));
        context.children.push(fragment(Position::Absolute, Some(9)));

        let mut root = fragment(Position::Static, None);
        root.children.push(outer);
        root.children.push(context);

        let layers = collect_layers(&root, false);
        let levels: Vec<i32> = layers.iter().map(|l| l.stack_level).collect();
        // The z-index 9 box belongs to the z-index 1 context, not the root.
        assert_eq!(levels, vec![0, 1, 5]);
        assert!(!layers[0].is_context);
        assert!(layers[1].is_context);
    }

    #[test]
    fn test_layers_record_clipping_ancestors_except_for_fixed_boxes() {
        let mut clipper = fragment(Position::Static, None);
        let mut style = (*clipper.style).clone();
        style.overflow = Overflow::Hidden;
        clipper.style = Arc::new(style);
        clipper.children.push(fragment(Position::Relative, Some(1)));
        clipper.children.push(fragment(Position::Fixed, None));

        let mut root = fragment(Position::Static, None);
        root.children.push(clipper);

        let layers = collect_layers(&root, false);
        assert_eq!(layers.len(), 2);
        let fixed = layers.iter().find(|l| l.fragment.style.position == Position::Fixed);
        let relative = layers.iter().find(|l| l.fragment.style.position == Position::Relative);
        assert_eq!(fixed.map(|l| l.clips.len()), Some(0));
        assert_eq!(relative.map(|l| l.clips.len()), Some(1));
    }

    #[test]
    fn test_auto_z_index_sorts_before_contexts_at_level_zero() {
        let mut root = fragment(Position::Static, None);
        root.children.push(fragment(Position::Relative, Some(0)));
        root.children.push(fragment(Position::Relative, None));

        let contexts: Vec<bool> = collect_layers(&root, false)
            .iter()
            .map(|l| l.is_context)
            .collect();
        assert_eq!(contexts, vec![false, true]);
    }
}
