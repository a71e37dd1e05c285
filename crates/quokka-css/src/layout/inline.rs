//! Inline formatting contexts.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "In an inline formatting context, boxes are laid out horizontally, one
//! after the other, beginning at the top of a containing block. Horizontal
//! margins, borders, and padding are respected between these boxes."
//!
//! The content of a block container is flattened into items (text, the two
//! edges of every inline box, atomic inlines, forced breaks and out-of-flow
//! boxes). Items are split into measured tokens, tokens are grouped into
//! chunks that may not be broken, and lines are filled greedily with
//! chunks. A finished line is then aligned horizontally (`text-align`) and
//! vertically (`vertical-align`) and turned into a [`LineFragment`].

use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

use quokka_tree::NodeId;

use crate::style::{ComputedStyle, Direction, Overflow, TextAlign, VerticalAlign, WhiteSpace};

use super::LayoutContext;
use super::block::{flow_margin_box, float_room, layout_detached, settle_float};
use super::box_model::{BoxDimensions, Rect};
use super::box_tree::BoxKind;
use super::float::FloatContext;
use super::fragment::{
    Decoration, DecorationLine, Fragment, InlineBoxFragment, InlineFragment, LineFragment,
    TextRun, is_visible,
};
use super::intrinsic::{Widths, outer_widths};
use super::positioned::{PendingAbsolute, relative_offset, translate_pending};
use super::text::{CollapseState, InlineMetrics, ProcessedText, TextPiece, measure, process};
use super::values::{ContainingBlock, resolve_border, resolve_margins_or_zero, resolve_padding};

/// Slack allowed when testing whether content fits on a line.
const EPSILON: f32 = 0.01;

/// Line boxes and floats produced by one inline formatting context.
pub(crate) struct InlineResult {
    /// Line boxes in order. Lines without content are omitted.
    pub lines: Vec<LineFragment>,
    /// Floats whose placeholders sit in the inline content.
    pub floats: Vec<Fragment>,
    /// Distance from the content top to the bottom of the last line.
    pub height: f32,
}

#[derive(Debug)]
enum ItemKind {
    Text {
        text: ProcessedText,
        selection: Option<(usize, usize)>,
        decorations: Vec<Decoration>,
    },
    /// Start of an inline box; `edge` is its left margin, border and padding.
    Open { edge: f32 },
    /// End of the inline box opened by item `open`.
    Close { open: usize, edge: f32 },
    Atomic,
    Break,
    Float,
    Absolute,
}

#[derive(Debug)]
struct Item {
    node: NodeId,
    style: Arc<ComputedStyle>,
    kind: ItemKind,
    /// `Open` item of the innermost enclosing inline box.
    parent: Option<usize>,
    /// Accumulated offset of relatively positioned inline boxes around the
    /// item (including the box itself for `Open` and `Close`).
    rel: (f32, f32),
}

/// Flatten the inline content of `container` in document order.
fn collect(ctx: &LayoutContext<'_>, container: NodeId, cb: &ContainingBlock) -> Vec<Item> {
    let mut items = Vec::new();
    let mut state = CollapseState::default();
    collect_children(ctx, container, cb, None, (0.0, 0.0), &mut state, &mut items);
    items
}

fn collect_children(
    ctx: &LayoutContext<'_>,
    parent_id: NodeId,
    cb: &ContainingBlock,
    parent: Option<usize>,
    rel: (f32, f32),
    state: &mut CollapseState,
    items: &mut Vec<Item>,
) {
    let tree = ctx.tree;
    for &child in tree.children(parent_id) {
        let node = &tree[child];
        let style = &node.style;
        let item = |kind: ItemKind, rel: (f32, f32)| Item {
            node: child,
            style: Arc::clone(style),
            kind,
            parent,
            rel,
        };

        if node.is_text() {
            let Some(text) = node.text.as_deref() else {
                continue;
            };
            let decorations = decorations(ctx, child);
            for piece in process(text, style.white_space, style.text_transform, state) {
                let kind = match piece {
                    TextPiece::Text(text) => ItemKind::Text {
                        text,
                        selection: node.selection,
                        decorations: decorations.clone(),
                    },
                    TextPiece::Break => ItemKind::Break,
                };
                items.push(item(kind, rel));
            }
        } else if style.position.is_absolutely_positioned() {
            items.push(item(ItemKind::Absolute, rel));
        } else if style.is_floated() {
            items.push(item(ItemKind::Float, rel));
        } else if node.kind == BoxKind::LineBreak {
            items.push(item(ItemKind::Break, rel));
            *state = CollapseState::default();
        } else if node.is_atomic_inline() || !node.display().is_inline_level() {
            items.push(item(ItemKind::Atomic, rel));
            state.break_collapse();
        } else {
            // [§ 9.4.3 Relative positioning](https://www.w3.org/TR/CSS2/visuren.html#relative-positioning)
            // moves the inline box and everything inside it.
            let (dx, dy) = relative_offset(style, cb);
            let inner = (rel.0 + dx, rel.1 + dy);
            let margin = resolve_margins_or_zero(style, cb.width);
            let padding = resolve_padding(style, cb.width);
            let border = resolve_border(style);

            let open = items.len();
            items.push(item(
                ItemKind::Open {
                    edge: margin.left + border.left + padding.left,
                },
                inner,
            ));
            collect_children(ctx, child, cb, Some(open), inner, state, items);
            items.push(item(
                ItemKind::Close {
                    open,
                    edge: margin.right + border.right + padding.right,
                },
                inner,
            ));
        }
    }
}

/// [§ 16.3.1 Underlining, overlining, striking, and blinking](https://www.w3.org/TR/CSS2/text.html#lining-striking-props)
///
/// "When specified on or propagated to an inline element, it affects all
/// the boxes generated by that element, and is further propagated to any
/// in-flow block-level boxes that split the inline ... Note that text
/// decorations are not propagated to any out-of-flow descendants, nor to
/// the contents of atomic inline-level descendants such as inline blocks
/// and inline tables."
fn decorations(ctx: &LayoutContext<'_>, text: NodeId) -> Vec<Decoration> {
    let tree = ctx.tree;
    let mut out = Vec::new();
    for id in tree.ancestors(text) {
        let node = &tree[id];
        let style = &node.style;
        let declared = style.text_decoration;
        for (on, line) in [
            (declared.underline, DecorationLine::Underline),
            (declared.overline, DecorationLine::Overline),
            (declared.line_through, DecorationLine::LineThrough),
        ] {
            if on {
                out.push(Decoration {
                    line,
                    color: style.color,
                });
            }
        }
        if style.is_out_of_flow() || node.is_atomic_inline() {
            break;
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Word,
    Space,
    Open,
    Close,
    Atomic,
    Break,
    Float,
    Absolute,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    item: usize,
    /// Byte range in the item's processed text.
    bytes: Range<usize>,
    /// Character range in the item's processed text.
    chars: Range<usize>,
    width: f32,
}

impl Token {
    const fn marker(kind: TokenKind, item: usize, width: f32) -> Self {
        Self {
            kind,
            item,
            bytes: 0..0,
            chars: 0..0,
            width,
        }
    }
}

fn white_space(items: &[Item], token: &Token) -> WhiteSpace {
    items[token.item].style.white_space
}

/// A space removed at the start and end of a line.
fn is_collapsible(items: &[Item], token: &Token) -> bool {
    token.kind == TokenKind::Space && white_space(items, token).collapses_spaces()
}

/// A space that does not count toward the line's width at its end.
fn hangs(items: &[Item], token: &Token) -> bool {
    token.kind == TokenKind::Space
        && (white_space(items, token).collapses_spaces()
            || white_space(items, token) == WhiteSpace::PreWrap)
}

/// "A soft wrap opportunity exists at the boundary of whitespace" unless
/// `white-space` suppresses wrapping.
fn is_breakable(items: &[Item], token: &Token) -> bool {
    token.kind == TokenKind::Space && white_space(items, token).wraps()
}

/// Split items into measured tokens. `atomic_width` gives the margin box
/// width of an atomic inline item.
fn tokenize(
    ctx: &LayoutContext<'_>,
    items: &[Item],
    atomic_width: impl Fn(usize) -> f32,
) -> Vec<Token> {
    let mut tokens = Vec::new();
    for (index, item) in items.iter().enumerate() {
        match &item.kind {
            ItemKind::Text { text, .. } => split_text(ctx, index, &item.style, &text.text, &mut tokens),
            ItemKind::Open { edge } => tokens.push(Token::marker(TokenKind::Open, index, *edge)),
            ItemKind::Close { edge, .. } => {
                tokens.push(Token::marker(TokenKind::Close, index, *edge));
            }
            ItemKind::Atomic => {
                tokens.push(Token::marker(TokenKind::Atomic, index, atomic_width(index)));
            }
            ItemKind::Break => tokens.push(Token::marker(TokenKind::Break, index, 0.0)),
            ItemKind::Float => tokens.push(Token::marker(TokenKind::Float, index, 0.0)),
            ItemKind::Absolute => tokens.push(Token::marker(TokenKind::Absolute, index, 0.0)),
        }
    }
    tokens
}

/// Alternating runs of spaces and non-spaces.
fn split_text(
    ctx: &LayoutContext<'_>,
    item: usize,
    style: &ComputedStyle,
    text: &str,
    out: &mut Vec<Token>,
) {
    let mut emit = |bytes: Range<usize>, chars: Range<usize>, space: bool| {
        out.push(Token {
            kind: if space { TokenKind::Space } else { TokenKind::Word },
            item,
            width: measure(ctx.metrics, &text[bytes.clone()], style),
            bytes,
            chars,
        });
    };

    let mut start = (0, 0);
    let mut current: Option<bool> = None;
    let mut count = 0;
    for (char_index, (byte, c)) in text.char_indices().enumerate() {
        let space = c == ' ';
        if let Some(previous) = current
            && previous != space
        {
            emit(start.0..byte, start.1..char_index, previous);
            start = (byte, char_index);
        }
        current = Some(space);
        count = char_index + 1;
    }
    if let Some(space) = current {
        emit(start.0..text.len(), start.1..count, space);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkKind {
    Content,
    Break,
    Float,
    Absolute,
}

/// Tokens that go on the same line.
#[derive(Debug, Clone)]
struct Chunk {
    kind: ChunkKind,
    tokens: Range<usize>,
    width: f32,
    /// Collapsible spaces at the start, removed at the start of a line.
    leading: f32,
    /// Spaces at the end that may hang past the end of the line.
    trailing: f32,
    /// Holds text, an atomic inline or preserved white space.
    content: bool,
}

fn push_chunk(
    chunks: &mut Vec<Chunk>,
    items: &[Item],
    tokens: &[Token],
    range: Range<usize>,
    kind: ChunkKind,
) {
    if range.is_empty() {
        return;
    }
    let slice = &tokens[range.clone()];
    let leading = slice
        .iter()
        .take_while(|t| t.kind == TokenKind::Open || is_collapsible(items, t))
        .filter(|t| t.kind == TokenKind::Space)
        .map(|t| t.width)
        .sum();
    let trailing = slice
        .iter()
        .rev()
        .take_while(|t| t.kind == TokenKind::Close || hangs(items, t))
        .filter(|t| t.kind == TokenKind::Space)
        .map(|t| t.width)
        .sum();
    chunks.push(Chunk {
        kind,
        width: slice.iter().map(|t| t.width).sum(),
        leading,
        trailing,
        content: slice.iter().any(|t| match t.kind {
            TokenKind::Word | TokenKind::Atomic => true,
            TokenKind::Space => !is_collapsible(items, t),
            _ => false,
        }),
        tokens: range,
    });
}

/// [§ 5.5 Line Breaking](https://www.w3.org/TR/css-text-3/#line-breaking)
///
/// Soft wrap opportunities exist after breakable spaces and around atomic
/// inlines. Forced breaks, floats and absolutely positioned boxes form
/// chunks of their own.
fn chunk(items: &[Item], tokens: &[Token]) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut break_before_next = false;

    for (index, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Break | TokenKind::Float | TokenKind::Absolute => {
                push_chunk(&mut chunks, items, tokens, start..index, ChunkKind::Content);
                let kind = match token.kind {
                    TokenKind::Break => ChunkKind::Break,
                    TokenKind::Float => ChunkKind::Float,
                    _ => ChunkKind::Absolute,
                };
                push_chunk(&mut chunks, items, tokens, index..index + 1, kind);
                start = index + 1;
                break_before_next = false;
            }
            TokenKind::Word | TokenKind::Open => {
                if break_before_next {
                    push_chunk(&mut chunks, items, tokens, start..index, ChunkKind::Content);
                    start = index;
                    break_before_next = false;
                }
            }
            TokenKind::Atomic => {
                let wraps = items[token.item].style.white_space.wraps();
                let started = tokens[start..index]
                    .iter()
                    .any(|t| t.kind != TokenKind::Open);
                if break_before_next || (wraps && started) {
                    push_chunk(&mut chunks, items, tokens, start..index, ChunkKind::Content);
                    start = index;
                }
                break_before_next = wraps;
            }
            TokenKind::Space => {
                if is_breakable(items, token) {
                    break_before_next = true;
                }
            }
            TokenKind::Close => {}
        }
    }
    push_chunk(&mut chunks, items, tokens, start..tokens.len(), ChunkKind::Content);
    chunks
}

/// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
///
/// Baseline shift of a box relative to its parent's baseline, positive
/// downward. `ascent` and `descent` are the box's extent around its own
/// baseline; `top` and `bottom` are resolved against the line box later
/// and shift nothing here.
fn align_shift(
    align: VerticalAlign,
    ascent: f32,
    descent: f32,
    line_height: f32,
    parent: &InlineMetrics,
) -> f32 {
    match align {
        VerticalAlign::Baseline | VerticalAlign::Top | VerticalAlign::Bottom => 0.0,
        VerticalAlign::Sub => parent.font_size / 5.0,
        VerticalAlign::Super => -parent.font_size / 3.0,
        // "Align the top of the box with the top of the parent's content
        // area."
        VerticalAlign::TextTop => ascent - parent.ascent,
        VerticalAlign::TextBottom => parent.descent - descent,
        // "Align the vertical midpoint of the box with the baseline of the
        // parent box plus half the x-height of the parent."
        VerticalAlign::Middle => (ascent - descent) / 2.0 - parent.x_height / 2.0,
        // "<percentage>: Raise (positive) or lower (negative) the box by this
        // distance (a percentage of the 'line-height' value)."
        VerticalAlign::Length(len) => -len.resolve(line_height),
    }
}

/// [§ 10.8.1](https://www.w3.org/TR/CSS2/visudet.html#leading)
///
/// "The baseline of an 'inline-block' is the baseline of its last line box
/// in the normal flow, unless it has either no in-flow line boxes or if its
/// 'overflow' property has a computed value other than 'visible', in which
/// case the baseline is the bottom margin edge."
fn atomic_ascent(fragment: &Fragment) -> f32 {
    let margin_box = fragment.margin_box();
    let baseline = if fragment.style.overflow == Overflow::Visible && fragment.image.is_none() {
        fragment.last_baseline()
    } else {
        None
    };
    baseline.map_or(margin_box.height, |b| b - margin_box.y)
}

/// An atomic inline or float laid out at the containing block origin,
/// waiting to be moved into place.
struct Detached {
    fragment: Fragment,
    pending: Vec<PendingAbsolute>,
}

/// How an atomic inline sits on its line.
#[derive(Debug, Clone, Copy)]
enum AtomicAlign {
    Baseline { shift: f32, ascent: f32 },
    Top,
    Bottom { height: f32 },
}

/// The line being filled.
#[derive(Debug, Clone, Copy)]
struct PendingLine {
    top: f32,
    start: usize,
    end: usize,
    width: f32,
    content: bool,
}

impl PendingLine {
    const fn new(top: f32, start: usize) -> Self {
        Self {
            top,
            start,
            end: start,
            width: 0.0,
            content: false,
        }
    }
}

/// Part of an inline box whose start has been placed on the current line.
struct OpenBox {
    item: usize,
    slot: usize,
    content_x: f32,
    left: bool,
}

/// Text being merged into one run.
struct RunBuilder {
    item: usize,
    bytes: Range<usize>,
    chars: Range<usize>,
    x: f32,
    width: f32,
}

struct InlineFormatter<'a> {
    ctx: &'a LayoutContext<'a>,
    style: Arc<ComputedStyle>,
    cb: ContainingBlock,
    items: Vec<Item>,
    tokens: Vec<Token>,
    /// [§ 10.8.1](https://www.w3.org/TR/CSS2/visudet.html#leading): "each
    /// line box starts with a zero-width inline box with the element's font
    /// and line height properties. We call that imaginary box a 'strut.'"
    strut: InlineMetrics,
    indent: f32,
    detached: HashMap<usize, Detached>,
}

/// Lay out the inline-level children of `id` into line boxes inside `cb`.
///
/// Floats among the children are placed into `floats`, absolutely
/// positioned children get their static position and go to `pending`.
pub(crate) fn layout_inline(
    ctx: &LayoutContext<'_>,
    id: NodeId,
    cb: &ContainingBlock,
    floats: &mut FloatContext,
    pending: &mut Vec<PendingAbsolute>,
) -> InlineResult {
    let style = Arc::clone(&ctx.tree[id].style);
    let items = collect(ctx, id, cb);

    // STEP 1: Atomic inlines and floats are laid out first; their margin
    // boxes are what the line breaker sees.
    let mut detached = HashMap::new();
    for (index, item) in items.iter().enumerate() {
        if matches!(item.kind, ItemKind::Atomic | ItemKind::Float) {
            let mut local = Vec::new();
            let fragment = layout_detached(ctx, item.node, cb, cb.width, &mut local);
            let _ = detached.insert(
                index,
                Detached {
                    fragment,
                    pending: local,
                },
            );
        }
    }

    // STEP 2: Tokens and unbreakable chunks.
    let tokens = tokenize(ctx, &items, |index| {
        detached
            .get(&index)
            .map_or(0.0, |d| flow_margin_box(&d.fragment, cb).width)
    });
    let chunks = chunk(&items, &tokens);

    // STEP 3: Fill lines.
    let formatter = InlineFormatter {
        ctx,
        strut: InlineMetrics::of(ctx.metrics, &style),
        indent: style.text_indent.resolve(cb.width),
        style,
        cb: *cb,
        items,
        tokens,
        detached,
    };
    formatter.run(&chunks, floats, pending)
}

impl InlineFormatter<'_> {
    fn run(
        mut self,
        chunks: &[Chunk],
        floats: &mut FloatContext,
        pending: &mut Vec<PendingAbsolute>,
    ) -> InlineResult {
        let mut result = InlineResult {
            lines: Vec::new(),
            floats: Vec::new(),
            height: 0.0,
        };
        let mut line = PendingLine::new(self.cb.y, 0);
        // Inline boxes that are open at the start of `line`.
        let mut stack: Vec<usize> = Vec::new();
        // Floats that did not fit on the line they appear in.
        let mut deferred: Vec<usize> = Vec::new();

        let mut index = 0;
        while let Some(chunk) = chunks.get(index) {
            let (left, available) = self.available(floats, line.top, result.lines.is_empty());
            match chunk.kind {
                // [§ 9.5.1](https://www.w3.org/TR/CSS2/visuren.html#float-position)
                //
                // "If a float is placed on a line that already contains
                // content and there is not enough room, the float is
                // shifted below the line."
                ChunkKind::Float => {
                    let item = self.tokens[chunk.tokens.start].item;
                    let width = self
                        .detached
                        .get(&item)
                        .map_or(0.0, |d| flow_margin_box(&d.fragment, &self.cb).width);
                    if !line.content || line.width + width <= available + EPSILON {
                        self.place_float(item, line.top, floats, pending, &mut result.floats);
                    } else {
                        deferred.push(item);
                    }
                    line.end = chunk.tokens.end;
                    index += 1;
                }
                ChunkKind::Absolute => {
                    let item = &self.items[self.tokens[chunk.tokens.start].item];
                    pending.push(PendingAbsolute::new(
                        self.ctx,
                        item.node,
                        left + line.width,
                        line.top,
                    ));
                    line.end = chunk.tokens.end;
                    index += 1;
                }
                ChunkKind::Break => {
                    line.end = chunk.tokens.end;
                    self.finish_line(&mut line, &mut stack, true, floats, pending, &mut result);
                    self.place_deferred(&mut deferred, line.top, floats, pending, &mut result);
                    index += 1;
                }
                ChunkKind::Content => {
                    let width = if line.content {
                        chunk.width
                    } else {
                        chunk.width - chunk.leading
                    };
                    let fits = line.width + width - chunk.trailing <= available + EPSILON;
                    if line.content && !fits {
                        self.finish_line(&mut line, &mut stack, false, floats, pending, &mut result);
                        self.place_deferred(&mut deferred, line.top, floats, pending, &mut result);
                        continue;
                    }
                    // Nothing fits beside the floats here: move the line
                    // down past the next float bottom.
                    if !fits
                        && floats.is_band_narrowed(
                            line.top,
                            self.strut.line_height,
                            self.cb.x,
                            self.cb.right(),
                        )
                        && let Some(next) = floats.next_float_bottom_after(line.top)
                    {
                        line.top = next;
                        continue;
                    }
                    line.end = chunk.tokens.end;
                    line.width += width;
                    line.content |= chunk.content;
                    index += 1;
                }
            }
        }

        if line.end > line.start {
            self.finish_last_line(&mut line, &mut stack, floats, pending, &mut result);
        }
        self.place_deferred(&mut deferred, line.top, floats, pending, &mut result);

        result.height = result
            .lines
            .last()
            .map_or(0.0, |l| (l.rect.bottom() - self.cb.y).max(0.0));
        result
    }

    /// Left edge and width available to the line starting at `top`.
    fn available(&self, floats: &FloatContext, top: f32, first: bool) -> (f32, f32) {
        let band = floats.band(top, self.strut.line_height, self.cb.x, self.cb.right());
        let indent = if first { self.indent } else { 0.0 };
        (band.left + indent, band.width() - indent)
    }

    fn finish_line(
        &mut self,
        line: &mut PendingLine,
        stack: &mut Vec<usize>,
        forced: bool,
        floats: &FloatContext,
        pending: &mut Vec<PendingAbsolute>,
        result: &mut InlineResult,
    ) {
        // "If an element has a computed value of 'justify' for 'text-align',
        // ... the last line ... and lines ended by a forced break are not
        // justified."
        self.emit_line(line, stack, !forced, floats, pending, result);
    }

    fn finish_last_line(
        &mut self,
        line: &mut PendingLine,
        stack: &mut Vec<usize>,
        floats: &FloatContext,
        pending: &mut Vec<PendingAbsolute>,
        result: &mut InlineResult,
    ) {
        self.emit_line(line, stack, false, floats, pending, result);
    }

    fn emit_line(
        &mut self,
        line: &mut PendingLine,
        stack: &mut Vec<usize>,
        justify: bool,
        floats: &FloatContext,
        pending: &mut Vec<PendingAbsolute>,
        result: &mut InlineResult,
    ) {
        let range = line.start..line.end;
        let first = result.lines.is_empty();
        let mut top = line.top;
        if let Some(fragment) =
            self.build_line(range.clone(), stack, top, first, justify, floats, pending)
        {
            top = fragment.rect.bottom();
            result.lines.push(fragment);
        }
        self.advance_stack(stack, range);
        *line = PendingLine::new(top, line.end);
    }

    /// Update the open inline box stack past the tokens of a line.
    fn advance_stack(&self, stack: &mut Vec<usize>, range: Range<usize>) {
        for token in &self.tokens[range] {
            match (token.kind, &self.items[token.item].kind) {
                (TokenKind::Open, _) => stack.push(token.item),
                (TokenKind::Close, ItemKind::Close { open, .. }) => {
                    if let Some(pos) = stack.iter().rposition(|o| o == open) {
                        stack.truncate(pos);
                    }
                }
                _ => {}
            }
        }
    }

    fn place_float(
        &mut self,
        item: usize,
        y: f32,
        floats: &mut FloatContext,
        pending: &mut Vec<PendingAbsolute>,
        out: &mut Vec<Fragment>,
    ) {
        let Some(Detached {
            mut fragment,
            pending: mut local,
        }) = self.detached.remove(&item)
        else {
            return;
        };
        let node = self.items[item].node;
        let (y, room) = float_room(self.ctx, node, &self.cb, y, floats);
        if (room - self.cb.width).abs() > EPSILON {
            // Earlier floats narrow the room: shrink-to-fit again.
            local.clear();
            fragment = layout_detached(self.ctx, node, &self.cb, room, &mut local);
        }
        let (dx, dy) = settle_float(&mut fragment, &self.cb, y, floats);
        translate_pending(&mut local, 0, dx, dy);
        pending.append(&mut local);
        out.push(fragment);
    }

    fn place_deferred(
        &mut self,
        deferred: &mut Vec<usize>,
        y: f32,
        floats: &mut FloatContext,
        pending: &mut Vec<PendingAbsolute>,
        result: &mut InlineResult,
    ) {
        for item in std::mem::take(deferred) {
            self.place_float(item, y, floats, pending, &mut result.floats);
        }
    }

    /// Shift and metrics of the box whose `Open` item is `parent`, or of
    /// the strut.
    fn parent_of(
        &self,
        parent: Option<usize>,
        shifts: &HashMap<usize, (f32, InlineMetrics)>,
    ) -> (f32, InlineMetrics) {
        parent
            .and_then(|p| shifts.get(&p).copied())
            .unwrap_or((0.0, self.strut))
    }

    /// Turn the tokens of one line into a line box at `top`. Returns `None`
    /// for a line that must be treated as not existing.
    #[allow(clippy::too_many_arguments)]
    fn build_line(
        &mut self,
        range: Range<usize>,
        carried: &[usize],
        top: f32,
        first: bool,
        justify: bool,
        floats: &FloatContext,
        pending: &mut Vec<PendingAbsolute>,
    ) -> Option<LineFragment> {
        let tokens = &self.tokens[range];
        let items = &self.items;

        // STEP 1: White space at the line edges.
        //
        // [§ 16.6.1](https://www.w3.org/TR/CSS2/text.html#white-space-model)
        //
        // "As each line is laid out, ... If a space (U+0020) at the
        // beginning of a line has 'white-space' set to 'normal', 'nowrap',
        // or 'pre-line', it is removed. ... If a space (U+0020) at the end
        // of a line has 'white-space' set to 'normal', 'nowrap', or
        // 'pre-line', it is also removed. If spaces (U+0020) or tabs
        // (U+0009) at the end of a line have 'white-space' set to
        // 'pre-wrap', UAs may visually collapse them."
        let mut skip = vec![false; tokens.len()];
        let mut hang = vec![false; tokens.len()];
        for (k, token) in tokens.iter().enumerate() {
            match token.kind {
                TokenKind::Space if is_collapsible(items, token) => skip[k] = true,
                TokenKind::Open | TokenKind::Close | TokenKind::Float | TokenKind::Absolute => {}
                _ => break,
            }
        }
        for (k, token) in tokens.iter().enumerate().rev() {
            match token.kind {
                TokenKind::Space if is_collapsible(items, token) => skip[k] = true,
                TokenKind::Space if white_space(items, token) == WhiteSpace::PreWrap => {
                    hang[k] = true;
                }
                TokenKind::Open
                | TokenKind::Close
                | TokenKind::Float
                | TokenKind::Absolute
                | TokenKind::Break => {}
                _ => break,
            }
        }

        // STEP 2: Empty lines.
        //
        // [§ 9.4.2](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
        //
        // "Line boxes that contain no text, no preserved white space, no
        // inline elements with non-zero margins, padding, or borders or
        // other in-flow content (such as images, inline blocks or inline
        // tables), and do not end with a preserved newline must be treated
        // as zero-height line boxes ... and must be treated as not existing
        // for any other purpose."
        let has_content = tokens.iter().zip(&skip).any(|(t, &skipped)| {
            !skipped
                && match t.kind {
                    TokenKind::Word | TokenKind::Atomic | TokenKind::Break | TokenKind::Space => {
                        true
                    }
                    TokenKind::Open | TokenKind::Close => t.width > 0.0,
                    TokenKind::Float | TokenKind::Absolute => false,
                }
        });
        if !has_content {
            return None;
        }

        // STEP 3: Vertical alignment.
        //
        // [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
        //
        // "The line box height is the distance between the uppermost box
        // top and the lowermost box bottom."
        let mut shifts: HashMap<usize, (f32, InlineMetrics)> = HashMap::new();
        let mut min_top = -self.strut.half_leading_ascent();
        let mut max_bottom = self.strut.half_leading_descent();
        let opened = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Open)
            .map(|t| t.item);
        for open in carried.iter().copied().chain(opened) {
            let item = &items[open];
            let metrics = InlineMetrics::of(self.ctx.metrics, &item.style);
            let (parent_shift, parent) = self.parent_of(item.parent, &shifts);
            let ascent = metrics.half_leading_ascent();
            let descent = metrics.half_leading_descent();
            let shift = parent_shift
                + align_shift(
                    item.style.vertical_align,
                    ascent,
                    descent,
                    metrics.line_height,
                    &parent,
                );
            min_top = min_top.min(shift - ascent);
            max_bottom = max_bottom.max(shift + descent);
            let _ = shifts.insert(open, (shift, metrics));
        }

        let mut aligned: HashMap<usize, AtomicAlign> = HashMap::new();
        for token in tokens.iter().filter(|t| t.kind == TokenKind::Atomic) {
            let Some(detached) = self.detached.get(&token.item) else {
                continue;
            };
            let item = &items[token.item];
            let height = detached.fragment.margin_box().height;
            let ascent = atomic_ascent(&detached.fragment);
            let descent = height - ascent;
            let align = match item.style.vertical_align {
                VerticalAlign::Top => AtomicAlign::Top,
                VerticalAlign::Bottom => AtomicAlign::Bottom { height },
                align => {
                    let (parent_shift, parent) = self.parent_of(item.parent, &shifts);
                    let line_height = InlineMetrics::of(self.ctx.metrics, &item.style).line_height;
                    let shift =
                        parent_shift + align_shift(align, ascent, descent, line_height, &parent);
                    min_top = min_top.min(shift - ascent);
                    max_bottom = max_bottom.max(shift + descent);
                    AtomicAlign::Baseline { shift, ascent }
                }
            };
            let _ = aligned.insert(token.item, align);
        }

        // "top: Align the top of the aligned subtree with the top of the
        // line box. bottom: Align the bottom of the aligned subtree with the
        // bottom of the line box."
        for token in tokens.iter().filter(|t| t.kind == TokenKind::Atomic) {
            if let (Some(AtomicAlign::Top), Some(d)) =
                (aligned.get(&token.item), self.detached.get(&token.item))
            {
                max_bottom = max_bottom.max(min_top + d.fragment.margin_box().height);
            }
        }
        for align in aligned.values() {
            if let AtomicAlign::Bottom { height } = align {
                min_top = min_top.min(max_bottom - height);
            }
        }
        let line_height = max_bottom - min_top;
        let baseline = top - min_top;

        // STEP 4: Horizontal alignment.
        //
        // [§ 16.2 Alignment](https://www.w3.org/TR/CSS2/text.html#alignment-prop)
        let band = floats.band(top, self.strut.line_height, self.cb.x, self.cb.right());
        let indent = if first { self.indent } else { 0.0 };
        let counted = || {
            tokens
                .iter()
                .enumerate()
                .filter(|(k, _)| !skip[*k] && !hang[*k])
                .map(|(_, t)| t)
        };
        let used: f32 = counted().map(|t| t.width).sum();
        let extra = band.width() - indent - used;
        let spaces = counted().filter(|t| t.kind == TokenKind::Space).count();
        let gap = if justify
            && self.style.text_align == TextAlign::Justify
            && extra > 0.0
            && spaces > 0
        {
            extra / spaces as f32
        } else {
            0.0
        };
        let justified = gap > 0.0;
        let offset = match self.style.text_align {
            TextAlign::Left | TextAlign::Justify => 0.0,
            TextAlign::Right => extra.max(0.0),
            TextAlign::Center => extra.max(0.0) / 2.0,
        };
        let mut x = band.left + indent + offset;

        // STEP 5: Fragments in paint order.
        let mut out: Vec<InlineFragment> = Vec::new();
        let mut open: Vec<OpenBox> = Vec::new();
        for &item in carried {
            open.push(self.begin_box(item, x, false, &mut out));
        }
        let mut run: Option<RunBuilder> = None;
        for (k, token) in tokens.iter().enumerate() {
            if skip[k] {
                continue;
            }
            match token.kind {
                TokenKind::Word | TokenKind::Space => {
                    let width = if token.kind == TokenKind::Space && !hang[k] {
                        token.width + gap
                    } else {
                        token.width
                    };
                    let extends = !justified
                        && run
                            .as_ref()
                            .is_some_and(|r| r.item == token.item && r.chars.end == token.chars.start);
                    if extends && let Some(r) = run.as_mut() {
                        r.bytes.end = token.bytes.end;
                        r.chars.end = token.chars.end;
                        r.width += width;
                    } else {
                        self.flush_run(run.take(), baseline, &shifts, &mut out);
                        run = Some(RunBuilder {
                            item: token.item,
                            bytes: token.bytes.clone(),
                            chars: token.chars.clone(),
                            x,
                            width,
                        });
                    }
                    x += width;
                }
                TokenKind::Open => {
                    self.flush_run(run.take(), baseline, &shifts, &mut out);
                    open.push(self.begin_box(token.item, x + token.width, true, &mut out));
                    x += token.width;
                }
                TokenKind::Close => {
                    self.flush_run(run.take(), baseline, &shifts, &mut out);
                    if let ItemKind::Close { open: opened, .. } = items[token.item].kind
                        && let Some(pos) = open.iter().rposition(|b| b.item == opened)
                    {
                        let b = open.remove(pos);
                        self.end_box(&b, x, true, baseline, &shifts, &mut out);
                    }
                    x += token.width;
                }
                TokenKind::Atomic => {
                    self.flush_run(run.take(), baseline, &shifts, &mut out);
                    let Some(Detached {
                        mut fragment,
                        pending: mut local,
                    }) = self.detached.remove(&token.item)
                    else {
                        continue;
                    };
                    let margin_box = flow_margin_box(&fragment, &self.cb);
                    let y = match aligned.get(&token.item) {
                        Some(AtomicAlign::Baseline { shift, ascent }) => baseline + shift - ascent,
                        Some(AtomicAlign::Bottom { height }) => top + line_height - height,
                        Some(AtomicAlign::Top) | None => top,
                    };
                    let (rx, ry) = items[token.item].rel;
                    let (dx, dy) = (x - margin_box.x + rx, y - margin_box.y + ry);
                    fragment.translate(dx, dy);
                    translate_pending(&mut local, 0, dx, dy);
                    pending.append(&mut local);
                    out.push(InlineFragment::Atomic(Box::new(fragment)));
                    x += token.width;
                }
                TokenKind::Break | TokenKind::Float | TokenKind::Absolute => {}
            }
        }
        self.flush_run(run, baseline, &shifts, &mut out);
        for b in open {
            self.end_box(&b, x, false, baseline, &shifts, &mut out);
        }

        Some(LineFragment {
            rect: Rect::new(band.left, top, band.width().max(0.0), line_height),
            baseline,
            items: out,
        })
    }

    /// Reserve the paint slot of an inline box ahead of its contents.
    fn begin_box(
        &self,
        item: usize,
        content_x: f32,
        left: bool,
        out: &mut Vec<InlineFragment>,
    ) -> OpenBox {
        let it = &self.items[item];
        let slot = out.len();
        out.push(InlineFragment::InlineBox(InlineBoxFragment {
            node: it.node,
            style: Arc::clone(&it.style),
            dimensions: BoxDimensions::default(),
        }));
        OpenBox {
            item,
            slot,
            content_x,
            left,
        }
    }

    /// [§ 10.6.1 Inline, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#inline-non-replaced)
    ///
    /// "The height of the content area should be based on the font ... The
    /// vertical padding, border and margin of an inline, non-replaced box
    /// start at the top and bottom of the content area, and has nothing to
    /// do with the 'line-height'."
    ///
    /// A box split over lines has its left edges on the first part only and
    /// its right edges on the last part only.
    fn end_box(
        &self,
        b: &OpenBox,
        content_end: f32,
        right: bool,
        baseline: f32,
        shifts: &HashMap<usize, (f32, InlineMetrics)>,
        out: &mut [InlineFragment],
    ) {
        let item = &self.items[b.item];
        let style = &item.style;
        let (shift, metrics) = shifts.get(&b.item).copied().unwrap_or((0.0, self.strut));
        let mut padding = resolve_padding(style, self.cb.width);
        let mut border = resolve_border(style);
        let mut margin = resolve_margins_or_zero(style, self.cb.width);
        margin.top = 0.0;
        margin.bottom = 0.0;
        if !b.left {
            padding.left = 0.0;
            border.left = 0.0;
            margin.left = 0.0;
        }
        if !right {
            padding.right = 0.0;
            border.right = 0.0;
            margin.right = 0.0;
        }
        let (dx, dy) = item.rel;
        let dimensions = BoxDimensions {
            content: Rect::new(
                b.content_x + dx,
                baseline + shift - metrics.ascent + dy,
                (content_end - b.content_x).max(0.0),
                metrics.ascent + metrics.descent,
            ),
            padding,
            border,
            margin,
        };
        if let Some(InlineFragment::InlineBox(fragment)) = out.get_mut(b.slot) {
            fragment.dimensions = dimensions;
        }
    }

    fn flush_run(
        &self,
        run: Option<RunBuilder>,
        baseline: f32,
        shifts: &HashMap<usize, (f32, InlineMetrics)>,
        out: &mut Vec<InlineFragment>,
    ) {
        let Some(run) = run else {
            return;
        };
        let item = &self.items[run.item];
        let ItemKind::Text {
            text,
            selection,
            decorations,
        } = &item.kind
        else {
            return;
        };
        let style = &item.style;
        let (shift, _) = self.parent_of(item.parent, shifts);
        let ascent = self.ctx.metrics.ascent(&style.font);
        let descent = self.ctx.metrics.descent(&style.font);
        let (dx, dy) = item.rel;
        let x = run.x + dx;
        let baseline = baseline + shift + dy;
        let slice = &text.text[run.bytes.clone()];
        let selection = selection
            .and_then(|sel| self.selection_span(text, slice, &run, sel, style))
            .map(|(start, end)| (x + start, x + end));

        out.push(InlineFragment::Text(TextRun {
            node: item.node,
            text: slice.to_string(),
            rect: Rect::new(x, baseline - ascent, run.width, ascent + descent),
            baseline,
            font: style.font.clone(),
            color: style.color,
            ascent,
            descent,
            selection,
            decorations: decorations.clone(),
            rtl: style.direction == Direction::Rtl,
            visible: is_visible(style),
        }));
    }

    /// Horizontal extent, relative to the run start, of the selected source
    /// characters that fall in the run.
    fn selection_span(
        &self,
        text: &ProcessedText,
        slice: &str,
        run: &RunBuilder,
        (start, end): (usize, usize),
        style: &ComputedStyle,
    ) -> Option<(f32, f32)> {
        let source = text.source.get(run.chars.clone())?;
        let lo = source.iter().position(|&s| s >= start)?;
        let hi = source.iter().position(|&s| s >= end).unwrap_or(source.len());
        if lo >= hi {
            return None;
        }
        let prefix = |n: usize| -> f32 {
            let head: String = slice.chars().take(n).collect();
            measure(self.ctx.metrics, &head, style)
        };
        Some((prefix(lo), prefix(hi)))
    }
}

/// Preferred minimum and preferred widths of the inline content of `id`.
///
/// The preferred width breaks lines only at forced breaks; the preferred
/// minimum width is the widest chunk that cannot be broken.
pub(crate) fn inline_content_widths(ctx: &LayoutContext<'_>, id: NodeId, depth: usize) -> Widths {
    let cb = ContainingBlock {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: None,
    };
    let items = collect(ctx, id, &cb);
    let outer: HashMap<usize, Widths> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| matches!(item.kind, ItemKind::Atomic | ItemKind::Float))
        .map(|(index, item)| (index, outer_widths(ctx, item.node, depth + 1)))
        .collect();
    let tokens = tokenize(ctx, &items, |index| outer.get(&index).map_or(0.0, |w| w.max));
    let indent = ctx.tree[id].style.text_indent.resolve(0.0);

    let mut widths = Widths::default();
    let mut line = indent;
    let mut trailing = 0.0;
    let mut float_width = 0.0;
    for token in &tokens {
        match token.kind {
            TokenKind::Break => {
                widths.max = widths.max.max(line - trailing);
                line = 0.0;
                trailing = 0.0;
            }
            TokenKind::Float => {
                let w = outer.get(&token.item).copied().unwrap_or_default();
                float_width += w.max;
                widths.min = widths.min.max(w.min);
            }
            TokenKind::Space => {
                line += token.width;
                if hangs(&items, token) {
                    trailing += token.width;
                }
            }
            TokenKind::Open | TokenKind::Close => line += token.width,
            TokenKind::Word | TokenKind::Atomic | TokenKind::Absolute => {
                line += token.width;
                trailing = 0.0;
            }
        }
    }
    widths.max = widths.max.max(line - trailing) + float_width;

    let mut first = true;
    for chunk in chunk(&items, &tokens) {
        if chunk.kind != ChunkKind::Content {
            continue;
        }
        let width: f32 = tokens[chunk.tokens.clone()]
            .iter()
            .map(|t| match t.kind {
                TokenKind::Atomic => outer.get(&t.item).map_or(0.0, |w| w.min),
                _ => t.width,
            })
            .sum();
        let mut width = width - chunk.leading - chunk.trailing;
        if first {
            width += indent;
            first = false;
        }
        widths.min = widths.min.max(width);
    }
    widths.max = widths.max.max(widths.min);
    widths
}
