//! Styled input tree and the box tree normalizer.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! The host hands layout a [`StyledNode`] tree: element kind, computed
//! style, children, and raw text. [`normalize`] rewrites it into a
//! [`BoxTree`] where every parent/child pairing is one the layout routines
//! accept:
//!
//! - `display: none` subtrees are gone;
//! - floats, absolutely positioned boxes, and the root are blockified
//!   ([§ 9.7](https://www.w3.org/TR/CSS2/visuren.html#dis-pos-flo));
//! - table parts have their missing table/row/cell wrappers
//!   ([§ 17.2.1](https://www.w3.org/TR/CSS2/tables.html#anonymous-boxes));
//! - inline boxes containing blocks are split
//!   ([§ 9.2.1.1](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level));
//! - inline runs next to blocks sit in anonymous block boxes.
//!
//! The input is never mutated; the output is a fresh arena.

use std::sync::Arc;

use quokka_tree::{NodeId, Tree};
use serde::{Deserialize, Serialize};
use strum_macros::Display as KeywordDisplay;

use crate::style::{ComputedStyle, Display, WhiteSpace};

use super::box_model::Rect;

/// What kind of element produced a box.
///
/// `display` decides the formatting behavior; the kind adds what `display`
/// cannot say, such as "this box is an image" or "this is a forced break".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, KeywordDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum BoxKind {
    /// Generated wrapper with no element behind it.
    #[default]
    Anonymous,
    /// Generic block element.
    Block,
    /// Generic inline element.
    Inline,
    /// A run of character data.
    Text,
    /// Image or iframe: content outside the CSS formatting model.
    Replaced,
    /// Table element.
    Table,
    /// Table row element.
    TableRow,
    /// Table cell element.
    TableCell,
    /// List item element.
    ListItem,
    /// Ordered list container.
    OrderedList,
    /// Unordered list container.
    UnorderedList,
    /// Forced line break.
    LineBreak,
    /// Horizontal rule.
    HorizontalRule,
    /// Hyperlink.
    Anchor,
    /// Form control, laid out as an inline-block around its value text.
    Input,
}

/// One node of the host-provided styled tree.
///
/// Text nodes carry their raw, unprocessed character data and take their
/// style from their parent element.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyledNode {
    /// Element kind.
    pub kind: BoxKind,
    /// Computed style, shared with the fragments built from this node.
    pub style: Arc<ComputedStyle>,
    /// Children in document order.
    pub children: Vec<StyledNode>,
    /// Raw text for [`BoxKind::Text`] (and the value of an input).
    pub text: Option<String>,
    /// Image reference for replaced elements.
    pub image: Option<String>,
    /// Crop rectangle inside the image, in image pixels.
    pub source_rect: Option<Rect>,
    /// Columns spanned by a table cell, or columns described by a column.
    #[serde(default = "one")]
    pub col_span: usize,
    /// Rows spanned by a table cell.
    #[serde(default = "one")]
    pub row_span: usize,
    /// Selected character range `[start, end)` of a text node.
    pub selection: Option<(usize, usize)>,
}

const fn one() -> usize {
    1
}

impl StyledNode {
    /// An element node.
    #[must_use]
    pub fn element(kind: BoxKind, style: ComputedStyle, children: Vec<Self>) -> Self {
        Self {
            kind,
            style: Arc::new(style),
            children,
            col_span: 1,
            row_span: 1,
            ..Self::default()
        }
    }

    /// A text node.
    #[must_use]
    pub fn text(text: &str) -> Self {
        Self {
            kind: BoxKind::Text,
            text: Some(text.to_string()),
            col_span: 1,
            row_span: 1,
            ..Self::default()
        }
    }

    /// A replaced element showing `image`.
    #[must_use]
    pub fn image(style: ComputedStyle, image: Option<&str>) -> Self {
        Self {
            kind: BoxKind::Replaced,
            style: Arc::new(style),
            image: image.map(str::to_string),
            col_span: 1,
            row_span: 1,
            ..Self::default()
        }
    }
}

/// A node of the normalized box tree.
#[derive(Debug, Clone)]
pub struct BoxNode {
    /// Element kind; [`BoxKind::Anonymous`] for generated boxes.
    pub kind: BoxKind,
    /// Computed style. Display is already blockified where required.
    pub style: Arc<ComputedStyle>,
    /// True for boxes the normalizer generated.
    pub anonymous: bool,
    /// Character data of text boxes.
    pub text: Option<String>,
    /// Image reference of replaced boxes.
    pub image: Option<String>,
    /// Crop rectangle of replaced boxes.
    pub source_rect: Option<Rect>,
    /// Column span (cells) or column count (columns).
    pub col_span: usize,
    /// Row span of cells.
    pub row_span: usize,
    /// Selected character range of text boxes.
    pub selection: Option<(usize, usize)>,
    /// [§ 12.5 Lists](https://www.w3.org/TR/CSS2/generate.html#lists)
    /// ordinal of a list item among its siblings.
    pub list_ordinal: Option<i32>,
}

impl BoxNode {
    fn from_styled(node: &StyledNode, style: Arc<ComputedStyle>) -> Self {
        Self {
            kind: node.kind,
            style,
            anonymous: false,
            text: node.text.clone(),
            image: node.image.clone(),
            source_rect: node.source_rect,
            col_span: node.col_span.max(1),
            row_span: node.row_span.max(1),
            selection: node.selection,
            list_ordinal: None,
        }
    }

    fn anonymous(parent: &ComputedStyle, display: Display) -> Self {
        Self {
            kind: BoxKind::Anonymous,
            style: Arc::new(ComputedStyle::inherit_from(parent, display)),
            anonymous: true,
            text: None,
            image: None,
            source_rect: None,
            col_span: 1,
            row_span: 1,
            selection: None,
            list_ordinal: None,
        }
    }

    /// The box's `display`.
    #[must_use]
    pub fn display(&self) -> Display {
        self.style.display
    }

    /// Text box.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.kind == BoxKind::Text
    }

    /// Replaced box (image or iframe).
    #[must_use]
    pub fn is_replaced(&self) -> bool {
        self.kind == BoxKind::Replaced
    }

    /// Floated or absolutely positioned.
    #[must_use]
    pub fn is_out_of_flow(&self) -> bool {
        self.style.is_out_of_flow()
    }

    /// Block-level box that takes part in normal flow.
    #[must_use]
    pub fn is_in_flow_block_level(&self) -> bool {
        !self.is_out_of_flow() && !self.is_text() && self.display().is_block_level()
    }

    /// Inline-level content: text, inline boxes, atomic inlines, breaks.
    #[must_use]
    pub fn is_inline_level(&self) -> bool {
        self.is_text() || (!self.is_out_of_flow() && self.display().is_inline_level())
    }

    /// An inline-level box laid out as one unbreakable unit.
    #[must_use]
    pub fn is_atomic_inline(&self) -> bool {
        !self.is_text()
            && self.display().is_inline_level()
            && (self.display().is_atomic_inline() || self.is_replaced())
    }

    /// Collapsible white space only; renders nothing between blocks.
    #[must_use]
    pub fn is_collapsible_whitespace(&self) -> bool {
        self.is_text()
            && self
                .text
                .as_deref()
                .is_none_or(|t| is_collapsible_whitespace(t, self.style.white_space))
    }
}

/// The normalized box tree.
pub type BoxTree = Tree<BoxNode>;

/// [§ 16.6.1 The 'white-space' processing model](https://www.w3.org/TR/CSS2/text.html#white-space-model)
///
/// Text made only of spaces, tabs and line feeds that the white-space mode
/// would collapse away entirely.
#[must_use]
pub fn is_collapsible_whitespace(text: &str, white_space: WhiteSpace) -> bool {
    let blank = text
        .chars()
        .all(|c| matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{c}'));
    match white_space {
        WhiteSpace::Normal | WhiteSpace::Nowrap => blank,
        WhiteSpace::PreLine => blank && !text.contains('\n'),
        WhiteSpace::Pre | WhiteSpace::PreWrap => text.is_empty(),
    }
}

/// Owned intermediate form used while rewriting.
struct Draft {
    node: BoxNode,
    children: Vec<Draft>,
}

impl Draft {
    const fn leaf(node: BoxNode) -> Self {
        Self {
            node,
            children: Vec::new(),
        }
    }

    fn display(&self) -> Display {
        self.node.display()
    }
}

/// Rewrite a styled tree into a normalized box tree.
///
/// The root always exists: a root with `display: none` becomes an empty
/// anonymous block.
#[must_use]
pub fn normalize(root: &StyledNode) -> BoxTree {
    let mut drafts = build(root, None, true);
    let draft = if drafts.len() == 1 && !drafts[0].node.is_text() {
        drafts.pop()
    } else {
        None
    };
    let draft = draft.unwrap_or_else(|| {
        let mut wrapper = Draft::leaf(BoxNode::anonymous(&root.style, Display::Block));
        wrapper.children = drafts;
        wrapper
    });

    let Draft { node, children } = draft;
    let mut tree = Tree::new(node);
    let root_id = tree.root();
    for child in children {
        attach(&mut tree, root_id, child);
    }
    tree
}

fn attach(tree: &mut BoxTree, parent: NodeId, draft: Draft) {
    let Draft { node, children } = draft;
    let id = tree.alloc(node);
    tree.append_child(parent, id);
    for child in children {
        attach(tree, id, child);
    }
}

/// Build the boxes for one styled node. Returns several boxes when an
/// inline box is split around block-level children, none for
/// `display: none`.
fn build(node: &StyledNode, parent: Option<&ComputedStyle>, is_root: bool) -> Vec<Draft> {
    // STEP 1: Text takes its parent's inherited style.
    if node.kind == BoxKind::Text {
        let style = parent.map_or_else(
            || ComputedStyle::with_display(Display::Inline),
            |p| ComputedStyle::inherit_from(p, Display::Inline),
        );
        return vec![Draft::leaf(BoxNode::from_styled(node, Arc::new(style)))];
    }

    // [§ 9.2.4](https://www.w3.org/TR/CSS2/visuren.html#display-prop)
    //
    // "This value causes an element to not appear in the formatting
    // structure (i.e., in visual media the element generates no boxes and
    // has no effect on layout)."
    if node.style.display == Display::None {
        return Vec::new();
    }

    // STEP 2: Blockify per § 9.7; inputs are inline-blocks.
    let style = used_style(node, is_root);
    let mut draft = Draft::leaf(BoxNode::from_styled(node, style));

    // STEP 3: Build children. Replaced elements and breaks have none.
    let mut children = Vec::new();
    if !matches!(node.kind, BoxKind::Replaced | BoxKind::LineBreak) {
        if node.kind == BoxKind::Input
            && let Some(value) = &node.text
        {
            let text = StyledNode::text(value);
            children.extend(build(&text, Some(&draft.node.style), false));
        }
        for child in &node.children {
            children.extend(build(child, Some(&draft.node.style), false));
        }
    }

    // STEP 4: Table fixups, then block-level structure.
    let style = Arc::clone(&draft.node.style);
    children = fix_table_children(&style, children);

    if style.display == Display::Inline {
        return split_inline(draft, children);
    }

    if is_block_container(style.display) {
        children = wrap_inline_runs(&style, children);
    }
    number_list_items(&style, &mut children);
    draft.children = children;
    vec![draft]
}

fn used_style(node: &StyledNode, is_root: bool) -> Arc<ComputedStyle> {
    let style = &node.style;
    let mut display = style.display;
    if node.kind == BoxKind::Input && display == Display::Inline {
        display = Display::InlineBlock;
    }
    if is_root || style.is_floated() || style.position.is_absolutely_positioned() {
        display = display.blockified();
    }
    if display == style.display {
        Arc::clone(style)
    } else {
        let mut used = ComputedStyle::clone(style);
        used.display = display;
        Arc::new(used)
    }
}

/// [§ 9.2.1 Block-level elements and block boxes](https://www.w3.org/TR/CSS2/visuren.html#block-boxes)
///
/// Displays whose boxes contain either only block-level or only
/// inline-level boxes once normalized.
const fn is_block_container(display: Display) -> bool {
    matches!(
        display,
        Display::Block
            | Display::ListItem
            | Display::InlineBlock
            | Display::TableCell
            | Display::TableCaption
    )
}

/// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
///
/// "When an inline box contains an in-flow block-level box, the inline box
/// (and its inline ancestors within the same line box) are broken around
/// the block-level box (and any block-level siblings that are consecutive
/// or separated only by collapsible whitespace and/or out-of-flow
/// elements), splitting the inline box into two boxes (even if either side
/// is empty), one on each side of the block-level box(es)."
fn split_inline(draft: Draft, children: Vec<Draft>) -> Vec<Draft> {
    if !children.iter().any(|c| c.node.is_in_flow_block_level()) {
        let mut draft = draft;
        draft.children = children;
        return vec![draft];
    }

    let template = draft.node;
    let mut out = Vec::new();
    let mut run = Vec::new();
    for child in children {
        if child.node.is_in_flow_block_level() {
            out.push(Draft {
                node: template.clone(),
                children: std::mem::take(&mut run),
            });
            out.push(child);
        } else {
            run.push(child);
        }
    }
    out.push(Draft {
        node: template,
        children: run,
    });
    out
}

/// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
///
/// "if a block container box has a block-level box inside it, then we
/// force it to have only block-level boxes inside it."
///
/// Runs of inline-level content between blocks go into anonymous block
/// boxes. Runs holding nothing but collapsible white space are dropped.
/// Out-of-flow boxes join an open run and otherwise stay where they are.
fn wrap_inline_runs(style: &ComputedStyle, children: Vec<Draft>) -> Vec<Draft> {
    if !children.iter().any(|c| c.node.is_in_flow_block_level()) {
        return children;
    }

    let mut out = Vec::new();
    let mut run: Vec<Draft> = Vec::new();
    for child in children {
        if child.node.is_in_flow_block_level() {
            flush_run(style, &mut run, &mut out);
            out.push(child);
        } else {
            run.push(child);
        }
    }
    flush_run(style, &mut run, &mut out);
    out
}

fn flush_run(style: &ComputedStyle, run: &mut Vec<Draft>, out: &mut Vec<Draft>) {
    let items = std::mem::take(run);
    let significant = items
        .iter()
        .any(|d| d.node.is_inline_level() && !d.node.is_collapsible_whitespace());
    if significant {
        let mut wrapper = Draft::leaf(BoxNode::anonymous(style, Display::Block));
        wrapper.children = items;
        out.push(wrapper);
    } else {
        out.extend(items.into_iter().filter(|d| d.node.is_out_of_flow()));
    }
}

/// [§ 17.2.1 Anonymous table objects](https://www.w3.org/TR/CSS2/tables.html#anonymous-boxes)
fn fix_table_children(style: &ComputedStyle, children: Vec<Draft>) -> Vec<Draft> {
    let display = style.display;

    // STEP 1: Remove irrelevant boxes.
    //
    // "If a child C of a 'table-column' parent is not a 'table-column' box,
    // then it is treated as if it had 'display: none'."
    let children: Vec<Draft> = match display {
        Display::TableColumn => Vec::new(),
        Display::TableColumnGroup => children
            .into_iter()
            .filter(|c| c.display() == Display::TableColumn && !c.node.is_text())
            .collect(),
        d if d.is_table() || d.is_row_group() || d == Display::TableRow => children
            .into_iter()
            .filter(|c| !c.node.is_collapsible_whitespace())
            .collect(),
        _ => children,
    };

    // STEP 2: Generate missing child wrappers.
    let children = match display {
        // "If a child C of a 'table' or 'inline-table' box is not a proper
        // table child, then generate an anonymous 'table-row' box around C
        // and all consecutive siblings of C that are not proper table
        // children."
        d if d.is_table() => wrap_runs(
            children,
            |c| !is_proper_table_child(c),
            |run| anonymous_row(style, run),
        ),
        // "If a child C of a row group box is not a 'table-row' box, then
        // generate an anonymous 'table-row' box around C and all
        // consecutive siblings of C that are not 'table-row' boxes."
        d if d.is_row_group() => wrap_runs(
            children,
            |c| c.node.is_text() || c.display() != Display::TableRow,
            |run| anonymous_row(style, run),
        ),
        Display::TableRow => wrap_cells(style, children),
        _ => children,
    };

    if display.is_table() || display.is_row_group() || display == Display::TableRow {
        return children;
    }

    // STEP 3: Generate missing parents.
    //
    // "For each 'table-cell' box C in a sequence of consecutive internal
    // table and 'table-caption' siblings, if C's parent is not a
    // 'table-row' then generate an anonymous 'table-row' box around C and
    // all consecutive siblings of C that are 'table-cell' boxes."
    let children = wrap_runs(
        children,
        |c| !c.node.is_text() && c.display() == Display::TableCell,
        |run| {
            let mut row = Draft::leaf(BoxNode::anonymous(style, Display::TableRow));
            row.children = run;
            row
        },
    );

    // "For each proper table child C, if C is misparented then generate an
    // anonymous 'table' or 'inline-table' box T around C and all
    // consecutive siblings of C that are proper table children. If C's
    // parent is an 'inline' box, then T must be an 'inline-table' box;
    // otherwise it must be a 'table' box."
    let table_display = if display == Display::Inline {
        Display::InlineTable
    } else {
        Display::Table
    };
    wrap_runs(
        children,
        is_proper_table_child,
        |run| {
            let mut table = Draft::leaf(BoxNode::anonymous(style, table_display));
            table.children = run;
            table
        },
    )
}

fn is_proper_table_child(draft: &Draft) -> bool {
    !draft.node.is_text() && draft.display().is_proper_table_child()
}

fn anonymous_row(style: &ComputedStyle, run: Vec<Draft>) -> Draft {
    let mut row = Draft::leaf(BoxNode::anonymous(style, Display::TableRow));
    row.children = wrap_cells(style, run);
    row
}

/// "If a child C of a 'table-row' box is not a 'table-cell', then generate
/// an anonymous 'table-cell' box around C and all consecutive siblings of
/// C that are not 'table-cell' boxes."
fn wrap_cells(style: &ComputedStyle, children: Vec<Draft>) -> Vec<Draft> {
    wrap_runs(
        children,
        |c| c.node.is_text() || c.display() != Display::TableCell,
        |run| {
            let mut cell = Draft::leaf(BoxNode::anonymous(style, Display::TableCell));
            cell.children = wrap_inline_runs(&cell.node.style, run);
            cell
        },
    )
}

/// Replace every maximal run of children matching `in_run` by `wrap(run)`.
fn wrap_runs(
    children: Vec<Draft>,
    in_run: impl Fn(&Draft) -> bool,
    wrap: impl Fn(Vec<Draft>) -> Draft,
) -> Vec<Draft> {
    let mut out = Vec::with_capacity(children.len());
    let mut run = Vec::new();
    for child in children {
        if in_run(&child) {
            run.push(child);
        } else {
            if !run.is_empty() {
                out.push(wrap(std::mem::take(&mut run)));
            }
            out.push(child);
        }
    }
    if !run.is_empty() {
        out.push(wrap(run));
    }
    out
}

/// [§ 12.5 Lists](https://www.w3.org/TR/CSS2/generate.html#lists)
///
/// Number `list-item` children. Counting starts at the list's start value
/// (default 1); a reversed list counts down from its item count.
fn number_list_items(style: &ComputedStyle, children: &mut [Draft]) {
    let count = children
        .iter()
        .filter(|c| c.display() == Display::ListItem)
        .count();
    let count = i32::try_from(count).unwrap_or(i32::MAX);
    let (mut ordinal, step) = if style.list_reversed {
        (style.list_start.unwrap_or(count), -1)
    } else {
        (style.list_start.unwrap_or(1), 1)
    };
    for child in children.iter_mut() {
        if child.display() == Display::ListItem {
            child.node.list_ordinal = Some(ordinal);
            ordinal = ordinal.saturating_add(step);
        }
    }
}
