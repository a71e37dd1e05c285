//! Integration tests for inline formatting contexts.
//!
//! Text geometry follows `ApproximateFontMetrics` at 16px: every glyph is
//! 9.6px wide and a normal line is 19.2px tall with its baseline 14.4px
//! below the line top.

use quokka_common::image::NoImages;
use quokka_css::layout::Fragment;
use quokka_css::layout::fragment::{DecorationLine, InlineBoxFragment, InlineFragment, TextRun};
use quokka_css::style::{Float, LineHeight, TextAlign, TextTransform, VerticalAlign, WhiteSpace};
use quokka_css::{
    ApproximateFontMetrics, AutoLength, BoxKind, ColorValue, ComputedStyle, Display,
    FragmentTree, LayoutOptions, LengthValue, Rect, StyledNode, layout,
};

const EPSILON: f32 = 0.01;
const GLYPH: f32 = 9.6;
const LINE: f32 = 19.2;

fn block(tweak: impl FnOnce(&mut ComputedStyle), children: Vec<StyledNode>) -> StyledNode {
    let mut style = ComputedStyle::with_display(Display::Block);
    tweak(&mut style);
    StyledNode::element(BoxKind::Block, style, children)
}

fn inline(tweak: impl FnOnce(&mut ComputedStyle), children: Vec<StyledNode>) -> StyledNode {
    let mut style = ComputedStyle::with_display(Display::Inline);
    tweak(&mut style);
    StyledNode::element(BoxKind::Inline, style, children)
}

/// Helper: lay out `paragraph` as the only child of the root and return
/// the tree.
fn layout_paragraph(paragraph: StyledNode) -> FragmentTree {
    layout(
        &block(|_| {}, vec![paragraph]),
        &ApproximateFontMetrics,
        &NoImages,
        &LayoutOptions::default(),
    )
}

fn paragraph(tree: &FragmentTree) -> &Fragment {
    &tree.root.children[0]
}

fn runs(fragment: &Fragment) -> Vec<&TextRun> {
    fragment.text_runs().collect()
}

fn assert_near(actual: f32, expected: f32, what: &str) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "{what}: expected {expected}, got {actual}"
    );
}

fn texts<'a>(runs: &[&'a TextRun]) -> Vec<&'a str> {
    runs.iter().map(|r| r.text.as_str()).collect()
}

/// Text runs on line `line` of `fragment`.
fn line_runs(fragment: &Fragment, line: usize) -> Vec<&TextRun> {
    fragment.lines[line]
        .items
        .iter()
        .filter_map(|item| match item {
            InlineFragment::Text(run) => Some(run),
            _ => None,
        })
        .collect()
}

/// Right edge of the last visible glyph on line `line`.
fn line_end(fragment: &Fragment, line: usize) -> f32 {
    line_runs(fragment, line)
        .iter()
        .filter(|r| !r.text.trim().is_empty())
        .map(|r| r.rect.right())
        .fold(f32::MIN, f32::max)
}

// ---------------------------------------------------------------------------
// Line boxes
//
// [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
// ---------------------------------------------------------------------------

#[test]
fn test_single_line_height_and_baseline() {
    let tree = layout_paragraph(block(|_| {}, vec![StyledNode::text("hello")]));
    let p = paragraph(&tree);

    assert_eq!(p.lines.len(), 1);
    assert_near(p.dimensions.content.height, LINE, "block height");
    assert_near(p.lines[0].rect.height, LINE, "line height");
    assert_near(p.lines[0].baseline, 14.4, "baseline");

    let run = runs(p)[0];
    assert_eq!(run.text, "hello");
    assert_near(run.rect.width, 5.0 * GLYPH, "run width");
}

#[test]
fn test_text_wraps_at_spaces() {
    let tree = layout_paragraph(block(
        |s| s.width = AutoLength::px(100.0),
        vec![StyledNode::text("aaaa bbbb cccc")],
    ));
    let p = paragraph(&tree);

    assert_eq!(p.lines.len(), 2);
    assert_near(p.dimensions.content.height, 2.0 * LINE, "two lines");
    let texts: Vec<&str> = runs(p).iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["aaaa bbbb", "cccc"]);
    assert_near(p.lines[1].rect.y, LINE, "second line top");
}

#[test]
fn test_long_word_overflows_instead_of_breaking() {
    let tree = layout_paragraph(block(
        |s| s.width = AutoLength::px(30.0),
        vec![StyledNode::text("abcdefgh")],
    ));
    let p = paragraph(&tree);
    assert_eq!(p.lines.len(), 1);
    assert_near(runs(p)[0].rect.width, 8.0 * GLYPH, "unbroken word");
}

#[test]
fn test_nowrap_keeps_text_on_one_line() {
    let tree = layout_paragraph(block(
        |s| {
            s.width = AutoLength::px(50.0);
            s.white_space = WhiteSpace::Nowrap;
        },
        vec![StyledNode::text("aaaa bbbb cccc")],
    ));
    assert_eq!(paragraph(&tree).lines.len(), 1);
}

#[test]
fn test_white_space_collapses() {
    let tree = layout_paragraph(block(|_| {}, vec![StyledNode::text("  a   b  ")]));
    let p = paragraph(&tree);
    assert_eq!(runs(p)[0].text, "a b");
}

#[test]
fn test_line_break_element_forces_new_line() {
    let br = StyledNode::element(
        BoxKind::LineBreak,
        ComputedStyle::with_display(Display::Inline),
        vec![],
    );
    let tree = layout_paragraph(block(
        |_| {},
        vec![StyledNode::text("one"), br, StyledNode::text("two")],
    ));
    assert_eq!(paragraph(&tree).lines.len(), 2);
}

#[test]
fn test_pre_preserves_newlines() {
    let tree = layout_paragraph(block(
        |s| s.white_space = WhiteSpace::Pre,
        vec![StyledNode::text("first\nsecond")],
    ));
    let p = paragraph(&tree);
    assert_eq!(p.lines.len(), 2);
    let texts: Vec<&str> = runs(p).iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second"]);
}

#[test]
fn test_whitespace_only_block_has_no_lines() {
    let tree = layout_paragraph(block(|_| {}, vec![StyledNode::text("   \n  ")]));
    let p = paragraph(&tree);
    assert!(p.lines.is_empty());
    assert_near(p.dimensions.content.height, 0.0, "empty block height");
}

#[test]
fn test_pre_wrap_keeps_spaces_and_still_wraps() {
    let text = || vec![StyledNode::text("aaaa  bbbb  cccc")];
    let tree = layout_paragraph(block(
        |s| {
            s.width = AutoLength::px(100.0);
            s.white_space = WhiteSpace::PreWrap;
        },
        text(),
    ));
    let p = paragraph(&tree);
    assert_eq!(p.lines.len(), 2);
    let first = line_runs(p, 0);
    assert!(first[0].text.starts_with("aaaa  bbbb"), "{:?}", first[0].text);
    assert_eq!(texts(&line_runs(p, 1)), vec!["cccc"]);

    // The same text under `pre` never wraps.
    let tree = layout_paragraph(block(
        |s| {
            s.width = AutoLength::px(100.0);
            s.white_space = WhiteSpace::Pre;
        },
        text(),
    ));
    assert_eq!(paragraph(&tree).lines.len(), 1);
}

#[test]
fn test_pre_line_collapses_spaces_but_keeps_newlines() {
    let tree = layout_paragraph(block(
        |s| {
            s.width = AutoLength::px(100.0);
            s.white_space = WhiteSpace::PreLine;
        },
        vec![StyledNode::text("aaaa   bbbb cccc\n  dd")],
    ));
    let p = paragraph(&tree);
    assert_eq!(p.lines.len(), 3, "a soft wrap and a preserved newline");
    assert_eq!(texts(&runs(p)), vec!["aaaa bbbb", "cccc", "dd"]);
}

// ---------------------------------------------------------------------------
// Line height
//
// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
//
// "Half the leading is added above A and the other half below D"
// ---------------------------------------------------------------------------

/// Line box height and baseline of one line of text at `line_height`.
fn line_with(line_height: LineHeight) -> (f32, f32) {
    let tree = layout_paragraph(block(
        |s| s.line_height = line_height,
        vec![StyledNode::text("x")],
    ));
    let line = &paragraph(&tree).lines[0];
    (line.rect.height, line.baseline)
}

#[test]
fn test_line_height_number_length_and_percentage() {
    // A + D is 16px; the rest of the line height is split around it.
    let (height, baseline) = line_with(LineHeight::Number(2.0));
    assert_near(height, 32.0, "2 x 16px");
    assert_near(baseline, 20.0, "12.8 + 16 / 2");

    let (height, baseline) = line_with(LineHeight::Length(LengthValue::Px(30.0)));
    assert_near(height, 30.0, "30px");
    assert_near(baseline, 19.0, "12.8 + 14 / 2");

    let (height, baseline) = line_with(LineHeight::Length(LengthValue::Percent(150.0)));
    assert_near(height, 24.0, "150% of 16px");
    assert_near(baseline, 16.0, "12.8 + 8 / 2");
}

#[test]
fn test_small_line_height_shrinks_the_block() {
    let tree = layout_paragraph(block(
        |s| {
            s.width = AutoLength::px(100.0);
            s.line_height = LineHeight::Length(LengthValue::Px(10.0));
        },
        vec![StyledNode::text("aaaa bbbb cccc")],
    ));
    let p = paragraph(&tree);
    assert_eq!(p.lines.len(), 2);
    assert_near(p.dimensions.content.height, 20.0, "two 10px lines");
    assert_near(p.lines[1].rect.y, 10.0, "second line top");
}

// ---------------------------------------------------------------------------
// Horizontal alignment
//
// [§ 16.2 Alignment: the 'text-align' property](https://www.w3.org/TR/CSS2/text.html#alignment-prop)
// ---------------------------------------------------------------------------

fn aligned(align: TextAlign) -> f32 {
    let tree = layout_paragraph(block(
        |s| {
            s.width = AutoLength::px(200.0);
            s.text_align = align;
        },
        vec![StyledNode::text("hi")],
    ));
    runs(paragraph(&tree))[0].rect.x
}

#[test]
fn test_text_align_left_right_center() {
    assert_near(aligned(TextAlign::Left), 0.0, "left");
    assert_near(aligned(TextAlign::Right), 200.0 - 2.0 * GLYPH, "right");
    assert_near(aligned(TextAlign::Center), 90.4, "center");
}

#[test]
fn test_text_indent_applies_to_first_line_only() {
    let tree = layout_paragraph(block(
        |s| {
            s.width = AutoLength::px(100.0);
            s.text_indent = LengthValue::Px(20.0);
        },
        vec![StyledNode::text("aaaa bbbb cccc")],
    ));
    let runs = runs(paragraph(&tree));
    assert_near(runs[0].rect.x, 20.0, "indented first line");
    assert_near(runs.last().map_or(-1.0, |r| r.rect.x), 0.0, "second line");
}

#[test]
fn test_justify_fills_every_line_but_the_last_and_forced_breaks() {
    let br = StyledNode::element(
        BoxKind::LineBreak,
        ComputedStyle::with_display(Display::Inline),
        vec![],
    );
    let tree = layout_paragraph(block(
        |s| {
            s.width = AutoLength::px(100.0);
            s.text_align = TextAlign::Justify;
        },
        vec![
            StyledNode::text("aaaa bbbb"),
            br,
            StyledNode::text("cccc dddd eeee ffff gggg"),
        ],
    ));
    let p = paragraph(&tree);
    assert_eq!(p.lines.len(), 4);

    assert_near(line_end(p, 0), 9.0 * GLYPH, "ended by a forced break");
    assert_near(line_end(p, 1), 100.0, "wrapped line is justified");
    assert_near(line_end(p, 2), 100.0, "wrapped line is justified");
    assert_near(line_end(p, 3), 4.0 * GLYPH, "last line");

    // The extra 13.6px goes into the one space between the words.
    let second = line_runs(p, 1);
    assert_near(second[0].rect.x, 0.0, "first word stays put");
    let dddd = second
        .iter()
        .find(|r| r.text == "dddd")
        .expect("second word has its own run");
    assert_near(dddd.rect.x, 100.0 - 4.0 * GLYPH, "second word flush right");
}

// ---------------------------------------------------------------------------
// Inline boxes
//
// [§ 10.6.1 Inline, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#inline-non-replaced)
// ---------------------------------------------------------------------------

fn inline_boxes(fragment: &Fragment, line: usize) -> Vec<&InlineBoxFragment> {
    fragment.lines[line]
        .items
        .iter()
        .filter_map(|item| match item {
            InlineFragment::InlineBox(b) => Some(b),
            _ => None,
        })
        .collect()
}

#[test]
fn test_inline_padding_offsets_text() {
    let span = inline(
        |s| {
            s.padding.left = LengthValue::Px(5.0);
            s.padding.right = LengthValue::Px(5.0);
        },
        vec![StyledNode::text("ab")],
    );
    let tree = layout_paragraph(block(|_| {}, vec![span]));
    let p = paragraph(&tree);

    let boxes = inline_boxes(p, 0);
    assert_eq!(boxes.len(), 1);
    assert_near(boxes[0].dimensions.content.x, 5.0, "content after padding");
    assert_near(boxes[0].dimensions.content.width, 2.0 * GLYPH, "content width");
    assert_near(runs(p)[0].rect.x, 5.0, "text after padding");
}

#[test]
fn test_split_inline_box_has_edges_on_outer_ends_only() {
    let span = inline(
        |s| {
            s.padding.left = LengthValue::Px(10.0);
            s.padding.right = LengthValue::Px(10.0);
        },
        vec![StyledNode::text("aaaa bbbb")],
    );
    let tree = layout_paragraph(block(|s| s.width = AutoLength::px(60.0), vec![span]));
    let p = paragraph(&tree);
    assert_eq!(p.lines.len(), 2);

    let first = inline_boxes(p, 0);
    let last = inline_boxes(p, 1);
    assert_near(first[0].dimensions.padding.left, 10.0, "first: left edge");
    assert_near(first[0].dimensions.padding.right, 0.0, "first: no right edge");
    assert_near(last[0].dimensions.padding.left, 0.0, "last: no left edge");
    assert_near(last[0].dimensions.padding.right, 10.0, "last: right edge");
}

#[test]
fn test_inline_block_sits_on_baseline() {
    let inline_block = block(
        |s| {
            s.display = Display::InlineBlock;
            s.width = AutoLength::px(50.0);
            s.height = AutoLength::px(30.0);
        },
        vec![],
    );
    let tree = layout_paragraph(block(
        |_| {},
        vec![StyledNode::text("a"), inline_block],
    ));
    let line = &paragraph(&tree).lines[0];

    // Without line boxes its baseline is the bottom margin edge: 30px above
    // the baseline, plus the strut's 4.8px below it.
    assert_near(line.rect.height, 34.8, "line grows to fit");
    let atomic = line
        .items
        .iter()
        .find_map(|item| match item {
            InlineFragment::Atomic(f) => Some(f),
            _ => None,
        })
        .expect("inline-block on the line");
    assert_near(atomic.border_box().bottom(), line.baseline, "bottom on baseline");
    assert_near(atomic.border_box().x, GLYPH, "after the text");
}

/// Line box holding "a" and a 50x30 inline-block aligned by `align`, and
/// the inline-block's border box.
fn aligned_block(align: VerticalAlign) -> (f32, f32, Rect) {
    let inline_block = block(
        |s| {
            s.display = Display::InlineBlock;
            s.width = AutoLength::px(50.0);
            s.height = AutoLength::px(30.0);
            s.vertical_align = align;
        },
        vec![],
    );
    let tree = layout_paragraph(block(
        |_| {},
        vec![StyledNode::text("a"), inline_block],
    ));
    let line = &paragraph(&tree).lines[0];
    let atomic = line
        .items
        .iter()
        .find_map(|item| match item {
            InlineFragment::Atomic(f) => Some(f.border_box()),
            _ => None,
        })
        .expect("inline-block on the line");
    (line.rect.height, line.baseline, atomic)
}

#[test]
fn test_vertical_align_top_and_bottom_use_the_line_box() {
    // The strut reaches 14.4px above the baseline and 4.8px below it.
    let (height, baseline, atomic) = aligned_block(VerticalAlign::Top);
    assert_near(height, 30.0, "top: line is as tall as the box");
    assert_near(atomic.y, 0.0, "top: at the line top");
    assert_near(baseline, 14.4, "top: text stays at the top");

    let (height, baseline, atomic) = aligned_block(VerticalAlign::Bottom);
    assert_near(height, 30.0, "bottom: line is as tall as the box");
    assert_near(atomic.bottom(), 30.0, "bottom: at the line bottom");
    assert_near(baseline, 25.2, "bottom: text sits at the bottom");
}

#[test]
fn test_vertical_align_text_top_meets_the_parent_content_top() {
    let (height, baseline, atomic) = aligned_block(VerticalAlign::TextTop);
    assert_near(baseline, 14.4, "strut keeps the baseline");
    assert_near(atomic.y, baseline - 12.8, "top of the parent's ascent");
    assert_near(height, 1.6 + 30.0, "box hangs below the strut");
}

// ---------------------------------------------------------------------------
// Text decoration and selection
//
// [§ 16.3.1 Underlining, overlining, striking, and blinking](https://www.w3.org/TR/CSS2/text.html#lining-striking-props)
// ---------------------------------------------------------------------------

#[test]
fn test_decoration_propagates_in_declaring_color() {
    let red = ColorValue::rgb(255, 0, 0);
    let span = inline(|s| s.color = ColorValue::BLACK, vec![StyledNode::text("inner")]);
    let tree = layout_paragraph(block(
        |s| {
            s.text_decoration.underline = true;
            s.color = red;
        },
        vec![StyledNode::text("outer "), span],
    ));
    for run in runs(paragraph(&tree)) {
        assert_eq!(run.decorations.len(), 1, "run {:?}", run.text);
        assert_eq!(run.decorations[0].line, DecorationLine::Underline);
        assert_eq!(run.decorations[0].color, red);
    }
}

#[test]
fn test_decoration_does_not_reach_floats() {
    let floated = block(|s| s.float = Float::Left, vec![StyledNode::text("side")]);
    let tree = layout_paragraph(block(
        |s| s.text_decoration.line_through = true,
        vec![floated, StyledNode::text("main")],
    ));
    let p = paragraph(&tree);
    assert!(runs(&p.children[0]).iter().all(|r| r.decorations.is_empty()));
    assert!(runs(p).iter().all(|r| !r.decorations.is_empty()));
}

#[test]
fn test_selection_span_covers_selected_characters() {
    let mut text = StyledNode::text("hello");
    text.selection = Some((1, 3));
    let tree = layout_paragraph(block(|_| {}, vec![text]));

    let run = runs(paragraph(&tree))[0];
    let (start, end) = run.selection.expect("selected run");
    assert_near(start, run.rect.x + GLYPH, "selection start");
    assert_near(end, run.rect.x + 3.0 * GLYPH, "selection end");
}

#[test]
fn test_unselected_text_has_no_span() {
    let tree = layout_paragraph(block(|_| {}, vec![StyledNode::text("hello")]));
    assert!(runs(paragraph(&tree))[0].selection.is_none());
}

// ---------------------------------------------------------------------------
// Spacing and capitalization
//
// [§ 16.4 Letter and word spacing](https://www.w3.org/TR/CSS2/text.html#spacing-props)
// [§ 16.5 Capitalization](https://www.w3.org/TR/CSS2/text.html#caps-prop)
// ---------------------------------------------------------------------------

fn run_width(text: &str, tweak: impl FnOnce(&mut ComputedStyle)) -> f32 {
    let tree = layout_paragraph(block(tweak, vec![StyledNode::text(text)]));
    runs(paragraph(&tree)).iter().map(|r| r.rect.width).sum()
}

#[test]
fn test_letter_spacing_is_added_after_every_character() {
    assert_near(run_width("abc", |s| s.letter_spacing = 2.0), 3.0 * GLYPH + 6.0, "wider");
    assert_near(run_width("abc", |s| s.letter_spacing = -1.0), 3.0 * GLYPH - 3.0, "tighter");
}

#[test]
fn test_word_spacing_is_added_to_every_space() {
    assert_near(run_width("a b c", |s| s.word_spacing = 5.0), 5.0 * GLYPH + 10.0, "wider");
    assert_near(run_width("a b c", |s| s.word_spacing = -4.0), 5.0 * GLYPH - 8.0, "tighter");
}

#[test]
fn test_letter_spacing_moves_the_wrap_point() {
    // Nine glyphs fit in 100px until each gains 2px.
    let tree = layout_paragraph(block(
        |s| {
            s.width = AutoLength::px(100.0);
            s.letter_spacing = 2.0;
        },
        vec![StyledNode::text("aaaa bbbb")],
    ));
    assert_eq!(texts(&runs(paragraph(&tree))), vec!["aaaa", "bbbb"]);
}

#[test]
fn test_text_transform_changes_run_text() {
    let transformed = |transform: TextTransform| {
        let tree = layout_paragraph(block(
            |s| s.text_transform = transform,
            vec![StyledNode::text("hello  wOrld")],
        ));
        let runs = runs(paragraph(&tree));
        (runs[0].text.clone(), runs[0].rect.width)
    };

    let (text, width) = transformed(TextTransform::Uppercase);
    assert_eq!(text, "HELLO WORLD");
    assert_near(width, 11.0 * GLYPH, "collapsed before measuring");
    assert_eq!(transformed(TextTransform::Lowercase).0, "hello world");
    assert_eq!(transformed(TextTransform::Capitalize).0, "Hello WOrld");
}
