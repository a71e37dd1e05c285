//! Integration tests for relative, absolute and fixed positioning.

use std::sync::Arc;

use quokka_common::image::NoImages;
use quokka_css::layout::Fragment;
use quokka_css::{
    ApproximateFontMetrics, AutoLength, BoxKind, ComputedStyle, Display, FragmentTree,
    LayoutOptions, LengthValue, Position, Sides, StyledNode, layout,
};

const EPSILON: f32 = 0.01;

fn block(tweak: impl FnOnce(&mut ComputedStyle), children: Vec<StyledNode>) -> StyledNode {
    let mut style = ComputedStyle::with_display(Display::Block);
    tweak(&mut style);
    StyledNode::element(BoxKind::Block, style, children)
}

/// Helper: a 400x200 `position: relative` container.
fn relative_container(children: Vec<StyledNode>) -> StyledNode {
    block(
        |s| {
            s.position = Position::Relative;
            s.width = AutoLength::px(400.0);
            s.height = AutoLength::px(200.0);
        },
        children,
    )
}

fn absolute(tweak: impl FnOnce(&mut ComputedStyle), children: Vec<StyledNode>) -> StyledNode {
    block(
        |s| {
            s.position = Position::Absolute;
            tweak(s);
        },
        children,
    )
}

fn layout_root(children: Vec<StyledNode>) -> FragmentTree {
    layout(
        &block(|_| {}, children),
        &ApproximateFontMetrics,
        &NoImages,
        &LayoutOptions::default(),
    )
}

fn assert_near(actual: f32, expected: f32, what: &str) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "{what}: expected {expected}, got {actual}"
    );
}

fn find_positioned(fragment: &Fragment, position: Position) -> &Fragment {
    fragment
        .children
        .iter()
        .find(|c| c.style.position == position)
        .expect("positioned child")
}

/// The only absolutely positioned box inside the first relative container.
fn positioned_in_container(tree: &FragmentTree) -> &Fragment {
    find_positioned(&tree.root.children[0], Position::Absolute)
}

// ---------------------------------------------------------------------------
// Absolute positioning
//
// [§ 10.3.7 Absolutely positioned, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#abs-non-replaced-width)
//
// "'left' + 'margin-left' + 'border-left-width' + 'padding-left' + 'width' +
// 'padding-right' + 'border-right-width' + 'margin-right' + 'right' = width
// of containing block"
// ---------------------------------------------------------------------------

#[test]
fn test_left_top_place_box_in_positioned_ancestor() {
    let abs = absolute(
        |s| {
            s.inset.left = AutoLength::px(10.0);
            s.inset.top = AutoLength::px(20.0);
            s.width = AutoLength::px(50.0);
            s.height = AutoLength::px(30.0);
        },
        vec![],
    );
    let tree = layout_root(vec![relative_container(vec![abs])]);
    let b = positioned_in_container(&tree).border_box();
    assert_near(b.x, 10.0, "x");
    assert_near(b.y, 20.0, "y");
    assert_near(b.width, 50.0, "width");
    assert_near(b.height, 30.0, "height");
}

#[test]
fn test_containing_block_is_the_padding_box() {
    let abs = absolute(
        |s| {
            s.inset.left = AutoLength::px(0.0);
            s.inset.top = AutoLength::px(0.0);
            s.width = AutoLength::px(10.0);
            s.height = AutoLength::px(10.0);
        },
        vec![],
    );
    let mut container = relative_container(vec![abs]);
    let mut style = (*container.style).clone();
    style.padding = Sides::all(LengthValue::Px(15.0));
    container.style = Arc::new(style);

    let tree = layout_root(vec![container]);
    let b = positioned_in_container(&tree).border_box();
    assert_near(b.x, 0.0, "at the padding edge, not the content edge");
    assert_near(b.y, 0.0, "at the padding edge, not the content edge");
}

#[test]
fn test_right_bottom_anchor_to_far_edges() {
    let abs = absolute(
        |s| {
            s.inset.right = AutoLength::px(10.0);
            s.inset.bottom = AutoLength::px(10.0);
            s.width = AutoLength::px(50.0);
            s.height = AutoLength::px(30.0);
        },
        vec![],
    );
    let tree = layout_root(vec![relative_container(vec![abs])]);
    let b = positioned_in_container(&tree).border_box();
    assert_near(b.x, 340.0, "400 - 10 - 50");
    assert_near(b.y, 160.0, "200 - 10 - 30");
}

#[test]
fn test_left_and_right_solve_width() {
    let abs = absolute(
        |s| {
            s.inset.left = AutoLength::px(10.0);
            s.inset.right = AutoLength::px(30.0);
            s.height = AutoLength::px(10.0);
        },
        vec![],
    );
    let tree = layout_root(vec![relative_container(vec![abs])]);
    assert_near(positioned_in_container(&tree).border_box().width, 360.0, "width");
}

#[test]
fn test_over_constrained_ignores_right() {
    let abs = absolute(
        |s| {
            s.inset.left = AutoLength::px(10.0);
            s.inset.right = AutoLength::px(10.0);
            s.width = AutoLength::px(100.0);
            s.height = AutoLength::px(10.0);
        },
        vec![],
    );
    let tree = layout_root(vec![relative_container(vec![abs])]);
    assert_near(positioned_in_container(&tree).border_box().x, 10.0, "left wins");
}

#[test]
fn test_auto_margins_center_between_offsets() {
    let abs = absolute(
        |s| {
            s.inset.left = AutoLength::px(0.0);
            s.inset.right = AutoLength::px(0.0);
            s.width = AutoLength::px(100.0);
            s.height = AutoLength::px(10.0);
            s.margin.left = AutoLength::Auto;
            s.margin.right = AutoLength::Auto;
        },
        vec![],
    );
    let tree = layout_root(vec![relative_container(vec![abs])]);
    assert_near(positioned_in_container(&tree).border_box().x, 150.0, "centered");
}

#[test]
fn test_auto_width_and_height_fit_the_content() {
    let abs = absolute(
        |s| {
            s.inset.left = AutoLength::px(0.0);
            s.inset.bottom = AutoLength::px(0.0);
        },
        vec![StyledNode::text("hi")],
    );
    let tree = layout_root(vec![relative_container(vec![abs])]);
    let b = positioned_in_container(&tree).border_box();
    assert_near(b.width, 19.2, "shrink-to-fit");
    assert_near(b.height, 19.2, "one line");
    assert_near(b.y, 200.0 - 19.2, "bottom edge on the container bottom");
}

// ---------------------------------------------------------------------------
// Static position and the initial containing block
//
// "If there is no such ancestor, the containing block is the initial
// containing block."
// ---------------------------------------------------------------------------

#[test]
fn test_auto_offsets_use_static_position() {
    let abs = absolute(
        |s| {
            s.width = AutoLength::px(10.0);
            s.height = AutoLength::px(10.0);
        },
        vec![],
    );
    let tree = layout_root(vec![
        block(|s| s.height = AutoLength::px(40.0), vec![]),
        block(|s| s.padding = Sides::all(LengthValue::Px(20.0)), vec![abs]),
    ]);

    // No positioned ancestor: the box ends up on the root.
    let b = find_positioned(&tree.root, Position::Absolute).border_box();
    assert_near(b.x, 20.0, "static x inside the padding");
    assert_near(b.y, 60.0, "static y below the first block");
}

#[test]
fn test_absolute_without_positioned_ancestor_uses_viewport() {
    let abs = absolute(
        |s| {
            s.inset.right = AutoLength::px(0.0);
            s.inset.bottom = AutoLength::px(0.0);
            s.width = AutoLength::px(100.0);
            s.height = AutoLength::px(100.0);
        },
        vec![],
    );
    let tree = layout_root(vec![abs]);
    let b = find_positioned(&tree.root, Position::Absolute).border_box();
    assert_near(b.x, 700.0, "800 - 100");
    assert_near(b.y, 500.0, "600 - 100");
}

#[test]
fn test_absolute_box_moves_with_relative_ancestor() {
    let abs = absolute(
        |s| {
            s.inset.left = AutoLength::px(0.0);
            s.inset.top = AutoLength::px(0.0);
            s.width = AutoLength::px(10.0);
            s.height = AutoLength::px(10.0);
        },
        vec![],
    );
    let mut container = relative_container(vec![abs]);
    let mut style = (*container.style).clone();
    style.inset.left = AutoLength::px(25.0);
    style.inset.top = AutoLength::px(35.0);
    container.style = Arc::new(style);

    let tree = layout_root(vec![container]);
    let b = positioned_in_container(&tree).border_box();
    assert_near(b.x, 25.0, "shifted with the container");
    assert_near(b.y, 35.0, "shifted with the container");
}

// ---------------------------------------------------------------------------
// Relative and fixed positioning
//
// [§ 9.4.3 Relative positioning](https://www.w3.org/TR/CSS2/visuren.html#relative-positioning)
// [§ 9.6.1 Fixed positioning](https://www.w3.org/TR/CSS2/visuren.html#fixed-positioning)
// ---------------------------------------------------------------------------

#[test]
fn test_relative_offset_does_not_move_siblings() {
    let shifted = block(
        |s| {
            s.position = Position::Relative;
            s.inset.left = AutoLength::px(20.0);
            s.inset.top = AutoLength::px(10.0);
            s.height = AutoLength::px(30.0);
        },
        vec![],
    );
    let next = block(|s| s.height = AutoLength::px(30.0), vec![]);
    let tree = layout_root(vec![shifted, next]);

    let shifted = tree.root.children[0].border_box();
    assert_near(shifted.x, 20.0, "shifted x");
    assert_near(shifted.y, 10.0, "shifted y");
    assert_near(tree.root.children[1].border_box().y, 30.0, "sibling keeps its place");
}

#[test]
fn test_relative_bottom_right_move_up_and_left() {
    let shifted = block(
        |s| {
            s.position = Position::Relative;
            s.inset.right = AutoLength::px(5.0);
            s.inset.bottom = AutoLength::px(5.0);
            s.height = AutoLength::px(10.0);
        },
        vec![],
    );
    let tree = layout_root(vec![shifted]);
    let b = tree.root.children[0].border_box();
    assert_near(b.x, -5.0, "moved left");
    assert_near(b.y, -5.0, "moved up");
}

#[test]
fn test_fixed_box_ignores_positioned_ancestors() {
    let fixed = block(
        |s| {
            s.position = Position::Fixed;
            s.inset.right = AutoLength::px(0.0);
            s.inset.bottom = AutoLength::px(0.0);
            s.width = AutoLength::px(50.0);
            s.height = AutoLength::px(50.0);
        },
        vec![],
    );
    let mut container = relative_container(vec![fixed]);
    let mut style = (*container.style).clone();
    style.margin.left = AutoLength::px(100.0);
    container.style = Arc::new(style);

    let tree = layout_root(vec![container]);
    assert!(
        tree.root.children[0]
            .children
            .iter()
            .all(|c| c.style.position != Position::Fixed),
        "fixed boxes are not kept by the relative container"
    );
    let b = find_positioned(&tree.root, Position::Fixed).border_box();
    assert_near(b.x, 750.0, "against the viewport's right edge");
    assert_near(b.y, 550.0, "against the viewport's bottom edge");
}
