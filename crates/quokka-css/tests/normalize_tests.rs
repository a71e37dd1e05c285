//! Integration tests for box tree normalization.

use quokka_css::layout::{BoxTree, normalize};
use quokka_css::style::Float;
use quokka_css::{BoxKind, ComputedStyle, Display, Position, StyledNode};
use quokka_tree::NodeId;

fn element(kind: BoxKind, display: Display, children: Vec<StyledNode>) -> StyledNode {
    StyledNode::element(kind, ComputedStyle::with_display(display), children)
}

fn block(children: Vec<StyledNode>) -> StyledNode {
    element(BoxKind::Block, Display::Block, children)
}

fn inline(children: Vec<StyledNode>) -> StyledNode {
    element(BoxKind::Inline, Display::Inline, children)
}

fn cell(text: &str) -> StyledNode {
    element(
        BoxKind::TableCell,
        Display::TableCell,
        vec![StyledNode::text(text)],
    )
}

fn root_children(tree: &BoxTree) -> Vec<NodeId> {
    tree.children(tree.root()).to_vec()
}

// ---------------------------------------------------------------------------
// Anonymous block boxes
//
// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
// ---------------------------------------------------------------------------

#[test]
fn test_inline_runs_beside_blocks_get_anonymous_wrappers() {
    let tree = normalize(&block(vec![
        StyledNode::text("hello"),
        block(vec![]),
        StyledNode::text("world"),
    ]));

    let children = root_children(&tree);
    assert_eq!(children.len(), 3);
    assert!(tree[children[0]].anonymous);
    assert_eq!(tree[children[0]].display(), Display::Block);
    assert!(!tree[children[1]].anonymous);
    assert!(tree[children[2]].anonymous);
}

#[test]
fn test_only_inline_children_need_no_wrapper() {
    let tree = normalize(&block(vec![
        StyledNode::text("a "),
        inline(vec![StyledNode::text("b")]),
    ]));
    let children = root_children(&tree);
    assert_eq!(children.len(), 2);
    assert!(tree[children[0]].is_text());
    assert_eq!(tree[children[1]].kind, BoxKind::Inline);
}

#[test]
fn test_block_inside_inline_splits_the_inline() {
    let tree = normalize(&block(vec![inline(vec![
        StyledNode::text("before"),
        block(vec![]),
        StyledNode::text("after"),
    ])]));

    let children = root_children(&tree);
    assert_eq!(children.len(), 3, "anonymous, block, anonymous");
    assert!(tree[children[0]].anonymous);
    assert_eq!(tree[children[1]].kind, BoxKind::Block);
    assert!(tree[children[2]].anonymous);

    // Each anonymous block holds one half of the split inline.
    for wrapper in [children[0], children[2]] {
        let halves = tree.children(wrapper);
        assert_eq!(halves.len(), 1);
        assert_eq!(tree[halves[0]].kind, BoxKind::Inline);
    }
}

// ---------------------------------------------------------------------------
// display: none and blockification
// ---------------------------------------------------------------------------

#[test]
fn test_display_none_subtree_is_removed() {
    let hidden = element(BoxKind::Block, Display::None, vec![block(vec![])]);
    let tree = normalize(&block(vec![hidden, block(vec![])]));
    assert_eq!(root_children(&tree).len(), 1);
    assert_eq!(tree.len(), 2);
}

#[test]
fn test_float_is_blockified() {
    let mut style = ComputedStyle::with_display(Display::Inline);
    style.float = Float::Left;
    let floated = StyledNode::element(BoxKind::Inline, style, vec![StyledNode::text("x")]);

    let tree = normalize(&block(vec![floated]));
    let children = root_children(&tree);
    assert_eq!(tree[children[0]].display(), Display::Block);
}

#[test]
fn test_absolutely_positioned_inline_table_becomes_table() {
    let mut style = ComputedStyle::with_display(Display::InlineTable);
    style.position = Position::Absolute;
    let table = StyledNode::element(BoxKind::Table, style, vec![]);

    let tree = normalize(&block(vec![table]));
    let children = root_children(&tree);
    assert_eq!(tree[children[0]].display(), Display::Table);
}

#[test]
fn test_inline_root_is_blockified() {
    let tree = normalize(&inline(vec![StyledNode::text("x")]));
    assert_eq!(tree[tree.root()].display(), Display::Block);
}

// ---------------------------------------------------------------------------
// Anonymous table objects
//
// [§ 17.2.1 Anonymous table objects](https://www.w3.org/TR/CSS2/tables.html#anonymous-boxes)
// ---------------------------------------------------------------------------

#[test]
fn test_misparented_cell_gets_row_and_table() {
    let tree = normalize(&block(vec![cell("a"), cell("b")]));

    let children = root_children(&tree);
    assert_eq!(children.len(), 1);
    let table = children[0];
    assert!(tree[table].anonymous);
    assert_eq!(tree[table].display(), Display::Table);

    let rows = tree.children(table);
    assert_eq!(rows.len(), 1);
    assert_eq!(tree[rows[0]].display(), Display::TableRow);
    assert_eq!(tree.children(rows[0]).len(), 2, "both cells share the row");
}

#[test]
fn test_cell_directly_in_table_gets_anonymous_row() {
    let table = element(
        BoxKind::Table,
        Display::Table,
        vec![StyledNode::text("\n  "), cell("a"), StyledNode::text("\n")],
    );
    let tree = normalize(&block(vec![table]));

    let table = root_children(&tree)[0];
    let rows = tree.children(table);
    assert_eq!(rows.len(), 1, "white space between table parts is dropped");
    assert!(tree[rows[0]].anonymous);
    assert_eq!(tree[tree.children(rows[0])[0]].kind, BoxKind::TableCell);
}

#[test]
fn test_text_in_row_gets_anonymous_cell() {
    let row = element(
        BoxKind::TableRow,
        Display::TableRow,
        vec![StyledNode::text("loose"), cell("a")],
    );
    let table = element(BoxKind::Table, Display::Table, vec![row]);
    let tree = normalize(&block(vec![table]));

    let table = root_children(&tree)[0];
    let row = tree.children(table)[0];
    let cells = tree.children(row);
    assert_eq!(cells.len(), 2);
    assert!(tree[cells[0]].anonymous);
    assert_eq!(tree[cells[0]].display(), Display::TableCell);
    assert!(!tree[cells[1]].anonymous);
}

#[test]
fn test_cell_inside_inline_gets_inline_table() {
    let tree = normalize(&block(vec![inline(vec![cell("a")])]));
    let inline = root_children(&tree)[0];
    assert_eq!(tree[inline].kind, BoxKind::Inline);
    let table = tree.children(inline)[0];
    assert_eq!(tree[table].display(), Display::InlineTable);
}

// ---------------------------------------------------------------------------
// List numbering
//
// [§ 12.5 Lists](https://www.w3.org/TR/CSS2/generate.html#lists)
// ---------------------------------------------------------------------------

fn item() -> StyledNode {
    element(BoxKind::ListItem, Display::ListItem, vec![StyledNode::text("item")])
}

#[test]
fn test_list_items_count_from_start_value() {
    let mut style = ComputedStyle::with_display(Display::Block);
    style.list_start = Some(5);
    let tree = normalize(&StyledNode::element(
        BoxKind::OrderedList,
        style,
        vec![item(), item()],
    ));
    let ordinals: Vec<_> = root_children(&tree)
        .iter()
        .map(|&id| tree[id].list_ordinal)
        .collect();
    assert_eq!(ordinals, vec![Some(5), Some(6)]);
}

#[test]
fn test_non_list_items_are_not_numbered() {
    let tree = normalize(&block(vec![item(), block(vec![]), item()]));
    let ordinals: Vec<_> = root_children(&tree)
        .iter()
        .map(|&id| tree[id].list_ordinal)
        .collect();
    assert_eq!(ordinals, vec![Some(1), None, Some(2)]);
}
