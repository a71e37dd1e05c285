//! Integration tests for the paint walk: canvas background, stacking order,
//! clipping, table layers and text.

use quokka_common::image::NoImages;
use quokka_css::style::{Float, Overflow, Visibility};
use quokka_css::{
    ApproximateFontMetrics, AutoLength, BoxKind, ColorValue, ComputedStyle, Display,
    DisplayCommand, DisplayList, LayoutOptions, Position, Rect, StyledNode, layout, paint,
};

const WHITE: ColorValue = ColorValue::rgb(255, 255, 255);
const RED: ColorValue = ColorValue::rgb(255, 0, 0);
const GREEN: ColorValue = ColorValue::rgb(0, 128, 0);
const BLUE: ColorValue = ColorValue::rgb(0, 0, 255);
const YELLOW: ColorValue = ColorValue::rgb(255, 255, 0);

fn element(
    kind: BoxKind,
    display: Display,
    tweak: impl FnOnce(&mut ComputedStyle),
    children: Vec<StyledNode>,
) -> StyledNode {
    let mut style = ComputedStyle::with_display(display);
    tweak(&mut style);
    StyledNode::element(kind, style, children)
}

fn block(tweak: impl FnOnce(&mut ComputedStyle), children: Vec<StyledNode>) -> StyledNode {
    element(BoxKind::Block, Display::Block, tweak, children)
}

/// Helper: a 10px tall block with a background.
fn colored(color: ColorValue, tweak: impl FnOnce(&mut ComputedStyle)) -> StyledNode {
    block(
        |s| {
            s.background_color = color;
            s.width = AutoLength::px(10.0);
            s.height = AutoLength::px(10.0);
            tweak(s);
        },
        vec![],
    )
}

fn render(root: &StyledNode) -> DisplayList {
    let options = LayoutOptions::default();
    let tree = layout(root, &ApproximateFontMetrics, &NoImages, &options);
    paint(&tree, &options)
}

/// Colors of every `FillRect`, in painting order.
fn fills(list: &DisplayList) -> Vec<ColorValue> {
    list.iter()
        .filter_map(|command| match command {
            DisplayCommand::FillRect { color, .. } => Some(*color),
            _ => None,
        })
        .collect()
}

fn texts(list: &DisplayList) -> Vec<&str> {
    list.iter()
        .filter_map(|command| match command {
            DisplayCommand::DrawText { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

fn position_of(list: &DisplayList, pred: impl Fn(&DisplayCommand) -> bool) -> usize {
    list.iter().position(pred).expect("command present")
}

// ---------------------------------------------------------------------------
// Canvas background
//
// [§ 14.2 The background](https://www.w3.org/TR/CSS2/colors.html#background)
//
// "The background of the root element becomes the background of the canvas
// and covers the entire canvas"
// ---------------------------------------------------------------------------

#[test]
fn test_root_background_fills_the_viewport_once() {
    let root = block(
        |s| s.background_color = RED,
        vec![block(|s| s.height = AutoLength::px(50.0), vec![])],
    );
    let list = render(&root);

    assert_eq!(
        list.commands()[0],
        DisplayCommand::FillRect {
            rect: Rect::new(0.0, 0.0, 800.0, 600.0),
            color: RED,
            radius: 0.0,
        }
    );
    assert_eq!(fills(&list), vec![RED], "the root box itself is not filled again");
}

#[test]
fn test_transparent_root_takes_first_child_background() {
    let root = block(
        |_| {},
        vec![block(
            |s| {
                s.background_color = BLUE;
                s.height = AutoLength::px(50.0);
            },
            vec![],
        )],
    );
    let list = render(&root);
    assert!(matches!(
        list.commands()[0],
        DisplayCommand::FillRect { color, rect, .. }
            if color == BLUE && rect == Rect::new(0.0, 0.0, 800.0, 600.0)
    ));
    assert_eq!(fills(&list), vec![BLUE], "the body box is not painted again");
}

#[test]
fn test_no_background_paints_no_canvas() {
    let list = render(&block(|_| {}, vec![StyledNode::text("plain")]));
    assert!(fills(&list).is_empty());
    assert_eq!(texts(&list), vec!["plain"]);
}

// ---------------------------------------------------------------------------
// Stacking order
//
// [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
// ---------------------------------------------------------------------------

#[test]
fn test_negative_flow_zero_then_positive_levels() {
    let root = block(
        |s| s.background_color = WHITE,
        vec![
            colored(BLUE, |s| {
                s.position = Position::Absolute;
                s.z_index = Some(1);
            }),
            colored(RED, |s| {
                s.position = Position::Absolute;
                s.z_index = Some(-1);
            }),
            colored(YELLOW, |s| s.position = Position::Relative),
            colored(GREEN, |_| {}),
        ],
    );
    let list = render(&root);
    assert_eq!(fills(&list), vec![WHITE, RED, GREEN, YELLOW, BLUE]);
}

#[test]
fn test_floats_paint_after_in_flow_blocks() {
    let root = block(
        |s| s.background_color = WHITE,
        vec![
            colored(RED, |s| s.float = Float::Left),
            colored(GREEN, |_| {}),
        ],
    );
    assert_eq!(fills(&render(&root)), vec![WHITE, GREEN, RED]);
}

#[test]
fn test_equal_z_index_keeps_tree_order() {
    let root = block(
        |s| s.background_color = WHITE,
        vec![
            colored(RED, |s| {
                s.position = Position::Relative;
                s.z_index = Some(3);
            }),
            colored(GREEN, |s| {
                s.position = Position::Relative;
                s.z_index = Some(3);
            }),
        ],
    );
    assert_eq!(fills(&render(&root)), vec![WHITE, RED, GREEN]);
}

#[test]
fn test_auto_z_index_boxes_paint_before_level_zero_contexts() {
    let root = block(
        |s| s.background_color = WHITE,
        vec![
            colored(RED, |s| {
                s.position = Position::Relative;
                s.z_index = Some(0);
            }),
            colored(GREEN, |s| s.position = Position::Relative),
        ],
    );
    assert_eq!(fills(&render(&root)), vec![WHITE, GREEN, RED]);
}

// ---------------------------------------------------------------------------
// Visual effects
//
// [§ 11.1.1 Overflow](https://www.w3.org/TR/CSS2/visufx.html#overflow)
// [§ 11.2 Visibility](https://www.w3.org/TR/CSS2/visufx.html#visibility)
// ---------------------------------------------------------------------------

#[test]
fn test_overflow_hidden_clips_its_content() {
    let root = block(
        |_| {},
        vec![block(
            |s| {
                s.overflow = Overflow::Hidden;
                s.width = AutoLength::px(20.0);
                s.height = AutoLength::px(10.0);
            },
            vec![StyledNode::text("clipped")],
        )],
    );
    let list = render(&root);

    let push = position_of(&list, |c| matches!(c, DisplayCommand::PushClip { .. }));
    let text = position_of(&list, |c| matches!(c, DisplayCommand::DrawText { .. }));
    let restore = position_of(&list, |c| matches!(c, DisplayCommand::Restore));
    assert!(push < text && text < restore);
    assert_eq!(
        list.commands()[push],
        DisplayCommand::PushClip {
            rect: Rect::new(0.0, 0.0, 20.0, 10.0)
        }
    );
}

/// Helper: a 50x50 `overflow: hidden` box holding one oversized red child.
fn clipper(
    tweak: impl FnOnce(&mut ComputedStyle),
    child: impl FnOnce(&mut ComputedStyle),
) -> StyledNode {
    block(
        |s| {
            s.overflow = Overflow::Hidden;
            s.width = AutoLength::px(50.0);
            s.height = AutoLength::px(50.0);
            tweak(s);
        },
        vec![colored(RED, |s| {
            s.width = AutoLength::px(500.0);
            s.height = AutoLength::px(500.0);
            child(s);
        })],
    )
}

fn red_fill(list: &DisplayList) -> usize {
    position_of(
        list,
        |c| matches!(c, DisplayCommand::FillRect { color, .. } if *color == RED),
    )
}

#[test]
fn test_overflow_hidden_clips_layered_descendants() {
    let root = block(
        |s| s.background_color = WHITE,
        vec![clipper(
            |_| {},
            |s| {
                s.position = Position::Relative;
                s.z_index = Some(1);
            },
        )],
    );
    let list = render(&root);

    let red = red_fill(&list);
    assert_eq!(
        list.commands()[red - 1],
        DisplayCommand::PushClip {
            rect: Rect::new(0.0, 0.0, 50.0, 50.0)
        }
    );
    assert_eq!(list.commands()[red + 1], DisplayCommand::Restore);
}

#[test]
fn test_overflow_hidden_clips_auto_z_index_and_absolute_children() {
    let root = block(
        |_| {},
        vec![clipper(
            |s| s.position = Position::Relative,
            |s| s.position = Position::Absolute,
        )],
    );
    let list = render(&root);

    let red = red_fill(&list);
    assert!(matches!(
        list.commands()[red - 1],
        DisplayCommand::PushClip { rect } if rect == Rect::new(0.0, 0.0, 50.0, 50.0)
    ));
    assert_eq!(list.commands()[red + 1], DisplayCommand::Restore);
}

#[test]
fn test_boxes_positioned_outside_the_clipping_box_escape_it() {
    // The absolute box's containing block is the root, the fixed box's is
    // the viewport: neither is inside the clipping box.
    for position in [Position::Absolute, Position::Fixed] {
        let root = block(|_| {}, vec![clipper(|_| {}, |s| s.position = position)]);
        let list = render(&root);

        let red = red_fill(&list);
        let clips = list
            .iter()
            .filter(|c| matches!(c, DisplayCommand::PushClip { .. }))
            .count();
        let restore = position_of(&list, |c| matches!(c, DisplayCommand::Restore));
        assert_eq!(clips, 1, "{position}: only the flow content clip");
        assert!(restore < red, "{position}: painted after the clip ends");
    }
}

#[test]
fn test_opacity_groups_the_box() {
    let root = block(
        |s| s.background_color = WHITE,
        vec![colored(RED, |s| s.opacity = 0.5)],
    );
    let list = render(&root);

    let push = position_of(&list, |c| matches!(c, DisplayCommand::PushOpacity { .. }));
    let fill = position_of(
        &list,
        |c| matches!(c, DisplayCommand::FillRect { color, .. } if *color == RED),
    );
    assert!(matches!(
        list.commands()[push],
        DisplayCommand::PushOpacity { alpha } if (alpha - 0.5).abs() < f32::EPSILON
    ));
    assert!(push < fill);
    assert!(matches!(list.commands()[fill + 1], DisplayCommand::Restore));
}

#[test]
fn test_hidden_box_paints_nothing_but_keeps_its_space() {
    let root = block(
        |s| s.background_color = WHITE,
        vec![
            colored(RED, |s| s.visibility = Visibility::Hidden),
            colored(GREEN, |_| {}),
        ],
    );
    let options = LayoutOptions::default();
    let tree = layout(&root, &ApproximateFontMetrics, &NoImages, &options);
    assert!((tree.root.children[1].border_box().y - 10.0).abs() < 0.01);
    assert_eq!(fills(&paint(&tree, &options)), vec![WHITE, GREEN]);
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

#[test]
fn test_selection_and_decoration_surround_the_text() {
    let mut text = StyledNode::text("select");
    text.selection = Some((0, 3));
    let root = block(
        |s| {
            s.text_decoration.underline = true;
            s.color = BLUE;
        },
        vec![text],
    );
    let list = render(&root);

    let highlight = position_of(&list, |c| matches!(c, DisplayCommand::FillRect { .. }));
    let glyphs = position_of(&list, |c| matches!(c, DisplayCommand::DrawText { .. }));
    let underline = position_of(&list, |c| matches!(c, DisplayCommand::DrawLine { .. }));
    assert!(highlight < glyphs && glyphs < underline);
    assert_eq!(fills(&list), vec![LayoutOptions::default().selection_color]);
    assert!(matches!(
        list.commands()[underline],
        DisplayCommand::DrawLine { color, .. } if color == BLUE
    ));
}

// ---------------------------------------------------------------------------
// Table layers
//
// [§ 17.5.1 Table layers and transparency](https://www.w3.org/TR/CSS2/tables.html#table-layers)
// ---------------------------------------------------------------------------

fn table(children: Vec<StyledNode>) -> StyledNode {
    element(
        BoxKind::Table,
        Display::Table,
        |s| s.background_color = WHITE,
        children,
    )
}

fn row(tweak: impl FnOnce(&mut ComputedStyle), cells: Vec<StyledNode>) -> StyledNode {
    element(BoxKind::TableRow, Display::TableRow, tweak, cells)
}

fn cell(tweak: impl FnOnce(&mut ComputedStyle), text: &str) -> StyledNode {
    element(
        BoxKind::TableCell,
        Display::TableCell,
        tweak,
        vec![StyledNode::text(text)],
    )
}

#[test]
fn test_table_layers_paint_bottom_up() {
    let column = element(
        BoxKind::Block,
        Display::TableColumn,
        |s| s.background_color = RED,
        vec![],
    );
    let root = block(
        |_| {},
        vec![table(vec![
            column,
            row(
                |s| s.background_color = GREEN,
                vec![cell(|s| s.background_color = BLUE, "cell")],
            ),
        ])],
    );
    let list = render(&root);
    assert_eq!(fills(&list), vec![WHITE, RED, GREEN, BLUE]);

    let last_fill = list
        .iter()
        .rposition(|c| matches!(c, DisplayCommand::FillRect { .. }))
        .expect("fills");
    let text = position_of(&list, |c| matches!(c, DisplayCommand::DrawText { .. }));
    assert!(last_fill < text, "cell content above every background");
}

#[test]
fn test_collapsed_row_is_not_painted() {
    let root = block(
        |_| {},
        vec![table(vec![
            row(|_| {}, vec![cell(|_| {}, "shown")]),
            row(
                |s| {
                    s.visibility = Visibility::Collapse;
                    s.background_color = RED;
                },
                vec![cell(|s| s.background_color = GREEN, "gone")],
            ),
        ])],
    );
    let list = render(&root);
    assert_eq!(texts(&list), vec!["shown"]);
    assert_eq!(fills(&list), vec![WHITE]);
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[test]
fn test_display_list_serialization_is_deterministic() {
    let root = block(
        |s| s.background_color = WHITE,
        vec![
            colored(RED, |s| s.position = Position::Relative),
            block(|_| {}, vec![StyledNode::text("words here")]),
        ],
    );
    let first = serde_json::to_string(&render(&root)).unwrap();
    let second = serde_json::to_string(&render(&root)).unwrap();
    assert_eq!(first, second);
    assert!(first.contains(r#""op":"fill-rect""#), "{first}");
    assert!(first.contains(r#""op":"draw-text""#), "{first}");
}
