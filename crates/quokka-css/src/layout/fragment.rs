//! Fragment tree: the output of layout.
//!
//! One [`Fragment`] per generated box, with final geometry, a shared
//! reference to its computed style, exclusively owned children, and for
//! block containers with inline content, the line boxes.
//!
//! All geometry is in the initial containing block's coordinate space.

use std::sync::Arc;

use quokka_common::image::ImageHandle;
use quokka_tree::NodeId;
use serde::Serialize;
use thiserror::Error;

use crate::style::{BorderStyle, ColorValue, ComputedStyle, Display, FontRef, Position, Visibility};

use super::box_model::{BoxDimensions, Rect};
use super::box_tree::BoxKind;

/// Geometry for one box.
#[derive(Debug, Clone, Serialize)]
pub struct Fragment {
    /// Box tree node, `None` for the table wrapper.
    pub node: Option<NodeId>,
    /// Element kind of the box.
    pub kind: BoxKind,
    /// Computed style of the box.
    #[serde(skip)]
    pub style: Arc<ComputedStyle>,
    /// Content, padding, border and margin geometry.
    pub dimensions: BoxDimensions,
    /// Block-level, floated and absolutely positioned children.
    pub children: Vec<Fragment>,
    /// Line boxes of a block container with inline content.
    pub lines: Vec<LineFragment>,
    /// Replaced content.
    pub image: Option<ImageHandle>,
    /// Crop rectangle for [`Self::image`].
    pub source_rect: Option<Rect>,
    /// Loaded `background-image`.
    pub background_image: Option<ImageHandle>,
    /// List marker placed outside the principal box.
    pub marker: Option<MarkerFragment>,
    /// Grid geometry of a table box.
    pub table: Option<Box<TableInfo>>,
    /// Grid position of a table cell.
    pub cell: Option<CellInfo>,
}

impl Fragment {
    /// An empty fragment for a box.
    #[must_use]
    pub fn new(node: Option<NodeId>, kind: BoxKind, style: Arc<ComputedStyle>) -> Self {
        Self {
            node,
            kind,
            style,
            dimensions: BoxDimensions::default(),
            children: Vec::new(),
            lines: Vec::new(),
            image: None,
            source_rect: None,
            background_image: None,
            marker: None,
            table: None,
            cell: None,
        }
    }

    /// [§ 8.1 Box dimensions](https://www.w3.org/TR/CSS2/box.html#box-dimensions)
    ///
    /// The fragment's own rectangle: content inflated by padding and border.
    #[must_use]
    pub fn border_box(&self) -> Rect {
        self.dimensions.border_box()
    }

    /// Margin box, used for flow spacing.
    #[must_use]
    pub fn margin_box(&self) -> Rect {
        self.dimensions.margin_box()
    }

    /// Padding box, the clip and absolute containing block rectangle.
    #[must_use]
    pub fn padding_box(&self) -> Rect {
        self.dimensions.padding_box()
    }

    /// Block-level box in normal flow (not floated, not absolutely
    /// positioned, not inline-level).
    #[must_use]
    pub fn is_in_flow_block(&self) -> bool {
        !self.style.is_out_of_flow()
            && (self.style.display.is_block_level() || self.node.is_none())
    }

    /// Move the fragment and everything inside it.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        self.dimensions.translate(dx, dy);
        for child in &mut self.children {
            child.translate(dx, dy);
        }
        for line in &mut self.lines {
            line.translate(dx, dy);
        }
        if let Some(marker) = &mut self.marker {
            marker.rect = marker.rect.translated(dx, dy);
            marker.baseline += dy;
        }
        if let Some(table) = &mut self.table {
            table.translate(dx, dy);
        }
    }

    /// Baseline of the first line box inside the fragment.
    #[must_use]
    pub fn first_baseline(&self) -> Option<f32> {
        if let Some(line) = self.lines.first() {
            return Some(line.baseline);
        }
        self.children
            .iter()
            .filter(|c| c.is_in_flow_block() || is_table_part(c.style.display))
            .find_map(Self::first_baseline)
    }

    /// Baseline of the last line box inside the fragment.
    #[must_use]
    pub fn last_baseline(&self) -> Option<f32> {
        if let Some(line) = self.lines.last() {
            return Some(line.baseline);
        }
        self.children
            .iter()
            .rev()
            .filter(|c| c.is_in_flow_block() || is_table_part(c.style.display))
            .find_map(Self::last_baseline)
    }

    /// Whether the box has rendered content of its own: line boxes, an
    /// image, or in-flow children.
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.lines.is_empty()
            || self.image.is_some()
            || self.children.iter().any(|c| !c.style.position.is_absolutely_positioned())
    }

    /// Find the first fragment generated for `node` (depth first, including
    /// atomic inlines inside line boxes).
    #[must_use]
    pub fn find(&self, node: NodeId) -> Option<&Self> {
        if self.node == Some(node) {
            return Some(self);
        }
        for child in &self.children {
            if let Some(found) = child.find(node) {
                return Some(found);
            }
        }
        for line in &self.lines {
            for item in &line.items {
                if let InlineFragment::Atomic(atomic) = item
                    && let Some(found) = atomic.find(node)
                {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Text runs of every line box in this fragment, in order.
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.lines.iter().flat_map(|line| {
            line.items.iter().filter_map(|item| match item {
                InlineFragment::Text(run) => Some(run),
                _ => None,
            })
        })
    }
}

/// [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
///
/// "The rectangular area that contains the boxes that form a line is called
/// a line box."
#[derive(Debug, Clone, Serialize)]
pub struct LineFragment {
    /// Line box rectangle: the width available between floats and the line
    /// height.
    pub rect: Rect,
    /// Absolute y of the line's baseline.
    pub baseline: f32,
    /// Inline content in paint order. An inline box precedes its contents.
    pub items: Vec<InlineFragment>,
}

impl LineFragment {
    pub(crate) fn translate(&mut self, dx: f32, dy: f32) {
        self.rect = self.rect.translated(dx, dy);
        self.baseline += dy;
        for item in &mut self.items {
            match item {
                InlineFragment::Text(run) => run.translate(dx, dy),
                InlineFragment::InlineBox(b) => b.dimensions.translate(dx, dy),
                InlineFragment::Atomic(f) => f.translate(dx, dy),
            }
        }
    }
}

/// Content placed on a line.
#[derive(Debug, Clone, Serialize)]
pub enum InlineFragment {
    /// A run of text in one style.
    Text(TextRun),
    /// The part of a non-atomic inline box that lies on this line.
    InlineBox(InlineBoxFragment),
    /// An inline-block, inline-table or inline replaced element.
    Atomic(Box<Fragment>),
}

/// A run of glyphs sharing one font and color.
#[derive(Debug, Clone, Serialize)]
pub struct TextRun {
    /// Text box this run came from.
    pub node: NodeId,
    /// Text after white-space processing and `text-transform`.
    pub text: String,
    /// Content area of the run: advance width by ascent plus descent.
    pub rect: Rect,
    /// Absolute y of the baseline.
    pub baseline: f32,
    /// Font used for the run.
    pub font: FontRef,
    /// Text color.
    pub color: ColorValue,
    /// Font ascent.
    pub ascent: f32,
    /// Font descent.
    pub descent: f32,
    /// Horizontal extent of the selected part of the run.
    pub selection: Option<(f32, f32)>,
    /// Decoration lines drawn over the run.
    pub decorations: Vec<Decoration>,
    /// Right-to-left run.
    pub rtl: bool,
    /// Whether the run is visible (`visibility` of its element).
    pub visible: bool,
}

impl TextRun {
    fn translate(&mut self, dx: f32, dy: f32) {
        self.rect = self.rect.translated(dx, dy);
        self.baseline += dy;
        if let Some((start, end)) = &mut self.selection {
            *start += dx;
            *end += dx;
        }
    }
}

/// [§ 16.3.1 Underlining, overlining, striking, and blinking](https://www.w3.org/TR/CSS2/text.html#lining-striking-props)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DecorationLine {
    /// "Each line of text is underlined."
    Underline,
    /// "Each line of text has a line above it."
    Overline,
    /// "Each line of text has a line through the middle."
    LineThrough,
}

/// One decoration line, in the color of the box that declared it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Decoration {
    /// Which line.
    pub line: DecorationLine,
    /// Color of the declaring box.
    pub color: ColorValue,
}

/// The part of an inline box on one line.
#[derive(Debug, Clone, Serialize)]
pub struct InlineBoxFragment {
    /// The inline box.
    pub node: NodeId,
    /// Style of the inline box.
    #[serde(skip)]
    pub style: Arc<ComputedStyle>,
    /// Content area on this line with the edges that apply on this line.
    pub dimensions: BoxDimensions,
}

/// [§ 12.5.1 Lists](https://www.w3.org/TR/CSS2/generate.html#lists)
///
/// "The marker box is outside the principal block box."
#[derive(Debug, Clone, Serialize)]
pub struct MarkerFragment {
    /// Marker string, such as `"3."` or a bullet.
    pub text: String,
    /// Marker rectangle.
    pub rect: Rect,
    /// Absolute y of the baseline shared with the first line.
    pub baseline: f32,
    /// Marker font.
    pub font: FontRef,
    /// Marker color.
    pub color: ColorValue,
}

/// Table grid geometry needed by the paint walker.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TableInfo {
    /// Column and column group boxes, in the order they must be painted
    /// (all groups first, then all columns).
    pub columns: Vec<ColumnFragment>,
    /// Width of every grid column.
    pub column_widths: Vec<f32>,
    /// Height of every grid row.
    pub row_heights: Vec<f32>,
    /// Grid columns with `visibility: collapse`.
    pub collapsed_columns: Vec<usize>,
    /// Resolved border segments under `border-collapse: collapse`.
    pub collapsed_borders: Vec<BorderSegment>,
    /// Whether the collapsing border model is in use.
    pub border_collapse: bool,
}

impl TableInfo {
    fn translate(&mut self, dx: f32, dy: f32) {
        for col in &mut self.columns {
            col.rect = col.rect.translated(dx, dy);
        }
        for seg in &mut self.collapsed_borders {
            seg.rect = seg.rect.translated(dx, dy);
        }
    }
}

/// Background area of a column or column group.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnFragment {
    /// Column element.
    pub node: NodeId,
    /// Style of the column or group.
    #[serde(skip)]
    pub style: Arc<ComputedStyle>,
    /// Area covered: spanned columns by all rows.
    pub rect: Rect,
    /// Whether this is a column group.
    pub group: bool,
}

/// One resolved edge segment of the collapsing border model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BorderSegment {
    /// Area the border covers, centered on the grid line.
    pub rect: Rect,
    /// Winning style.
    pub style: BorderStyle,
    /// Winning color.
    pub color: ColorValue,
    /// Horizontal grid line (as opposed to vertical).
    pub horizontal: bool,
    /// Grid row (or row boundary) the segment belongs to.
    pub row: usize,
    /// Grid column (or column boundary) the segment belongs to.
    pub column: usize,
}

/// Grid placement of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellInfo {
    /// First grid row.
    pub row: usize,
    /// First grid column.
    pub column: usize,
    /// Rows spanned.
    pub row_span: usize,
    /// Columns spanned.
    pub col_span: usize,
    /// [§ 17.6.1.1 Borders and Backgrounds around empty cells](https://www.w3.org/TR/CSS2/tables.html#empty-cells)
    /// The cell is empty and `empty-cells: hide` applies.
    pub hide_empty: bool,
}

/// A violated fragment tree postcondition.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvariantError {
    /// A content box with negative width or height.
    #[error("fragment {node:?} has a negative size {width}x{height}")]
    NegativeSize {
        /// Offending box.
        node: Option<NodeId>,
        /// Content width.
        width: f32,
        /// Content height.
        height: f32,
    },
    /// A coordinate that is NaN or infinite.
    #[error("fragment {node:?} has a non-finite coordinate")]
    NonFinite {
        /// Offending box.
        node: Option<NodeId>,
    },
    /// In-flow block children out of vertical order.
    #[error("fragment {node:?} starts at y={found}, above its previous sibling at y={previous}")]
    OutOfOrder {
        /// Offending box.
        node: Option<NodeId>,
        /// Top of the previous in-flow sibling.
        previous: f32,
        /// Top of this box.
        found: f32,
    },
}

/// The complete result of one layout pass.
#[derive(Debug, Clone, Serialize)]
pub struct FragmentTree {
    /// Fragment of the root box.
    pub root: Fragment,
    /// The initial containing block.
    pub viewport: Rect,
}

const TOLERANCE: f32 = 0.01;

impl FragmentTree {
    /// First fragment generated for `node`.
    #[must_use]
    pub fn find(&self, node: NodeId) -> Option<&Fragment> {
        self.root.find(node)
    }

    /// Verify the structural postconditions of layout.
    ///
    /// - Every content box has a non-negative, finite size.
    /// - Static in-flow block children whose adjoining margins are not
    ///   negative appear in non-decreasing vertical order.
    ///
    /// # Errors
    ///
    /// Returns the first violation found in tree order.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        check_fragment(&self.root)
    }
}

fn check_fragment(fragment: &Fragment) -> Result<(), InvariantError> {
    let content = fragment.dimensions.content;
    if ![content.x, content.y, content.width, content.height]
        .iter()
        .all(|v| v.is_finite())
    {
        return Err(InvariantError::NonFinite {
            node: fragment.node,
        });
    }
    if content.width < -TOLERANCE || content.height < -TOLERANCE {
        return Err(InvariantError::NegativeSize {
            node: fragment.node,
            width: content.width,
            height: content.height,
        });
    }

    let mut previous: Option<&Fragment> = None;
    for child in &fragment.children {
        check_fragment(child)?;
        if !child.is_in_flow_block() || child.style.position != Position::Static {
            continue;
        }
        if let Some(prev) = previous
            && prev.dimensions.margin.bottom >= 0.0
            && child.dimensions.margin.top >= 0.0
            && child.border_box().y + TOLERANCE < prev.border_box().y
        {
            return Err(InvariantError::OutOfOrder {
                node: child.node,
                previous: prev.border_box().y,
                found: child.border_box().y,
            });
        }
        previous = Some(child);
    }

    for line in &fragment.lines {
        for item in &line.items {
            if let InlineFragment::Atomic(atomic) = item {
                check_fragment(atomic)?;
            }
        }
    }
    Ok(())
}

/// Table boxes whose baseline comes from their rows.
const fn is_table_part(display: Display) -> bool {
    display.is_table() || display.is_internal_table()
}

/// Visible for painting: not `visibility: hidden` or `collapse`.
#[must_use]
pub fn is_visible(style: &ComputedStyle) -> bool {
    style.visibility == Visibility::Visible
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_at(y: f32, height: f32) -> Fragment {
        let mut f = Fragment::new(
            Some(NodeId(1)),
            BoxKind::Block,
            Arc::new(ComputedStyle::with_display(Display::Block)),
        );
        f.dimensions.content = Rect::new(0.0, y, 100.0, height);
        f
    }

    #[test]
    fn test_out_of_order_children_are_reported() {
        let mut root = block_at(0.0, 100.0);
        root.children.push(block_at(50.0, 10.0));
        root.children.push(block_at(20.0, 10.0));
        let tree = FragmentTree {
            root,
            viewport: Rect::new(0.0, 0.0, 100.0, 100.0),
        };
        assert!(matches!(
            tree.check_invariants(),
            Err(InvariantError::OutOfOrder { .. })
        ));
    }

    #[test]
    fn test_translate_moves_lines_and_children() {
        let mut root = block_at(0.0, 10.0);
        root.children.push(block_at(0.0, 5.0));
        root.translate(3.0, 4.0);
        assert!((root.children[0].dimensions.content.y - 4.0).abs() < TOLERANCE);
        assert!((root.dimensions.content.x - 3.0).abs() < TOLERANCE);
    }
}
