//! CSS Table Layout.
//!
//! [§ 17 Tables](https://www.w3.org/TR/CSS2/tables.html)
//!
//! "The CSS table model is based on the HTML4 table model, in which the
//! structure of a table closely parallels the visual layout of the table."
//!
//! A table is laid out in these passes:
//! - the box tree under the table is turned into a grid of slots
//!   (§ 17.2, § 17.5), with header groups first and footer groups last
//! - under `border-collapse: collapse`, every grid line gets its winning
//!   border (§ 17.6.2.1)
//! - column widths, by the fixed (§ 17.5.2.1) or automatic (§ 17.5.2.2)
//!   algorithm
//! - cells are laid out at their column widths, then rows get their heights
//!   (§ 17.5.3) and cells move into place
//!
//! The result is an anonymous wrapper fragment holding the captions and the
//! table box. The wrapper carries the table's margins.

use std::ops::Range;
use std::sync::Arc;

use quokka_tree::NodeId;

use crate::style::{
    AutoLength, BorderCollapse, BorderSide, BorderStyle, CaptionSide, ComputedStyle, Display,
    EmptyCells, LengthValue, Sides, TableLayout, VerticalAlign, Visibility,
};

use super::LayoutContext;
use super::block::{Placement, finish_box, flow_margin_box, layout_block_box, solve_block_width};
use super::box_model::{BoxDimensions, EdgeSizes, Rect};
use super::box_tree::{BoxKind, BoxTree};
use super::float::FloatContext;
use super::fragment::{BorderSegment, CellInfo, ColumnFragment, Fragment, TableInfo};
use super::intrinsic::{Widths, content_widths, outer_widths};
use super::positioned::{PendingAbsolute, translate_pending};
use super::values::{
    ContainingBlock, clamp_width, resolve_border, resolve_margins, resolve_margins_or_zero,
    resolve_padding, specified_height, specified_width,
};

/// A row group, or a run of rows placed directly in the table.
#[derive(Debug)]
struct GridSection {
    group: Option<NodeId>,
    rows: Range<usize>,
}

#[derive(Debug)]
struct GridRow {
    id: NodeId,
    section: usize,
}

#[derive(Debug)]
struct GridCell {
    id: NodeId,
    row: usize,
    column: usize,
    row_span: usize,
    col_span: usize,
}

/// Column and column group elements covering one grid column.
#[derive(Debug, Clone, Copy, Default)]
struct GridColumn {
    column: Option<NodeId>,
    group: Option<NodeId>,
}

/// A column or column group element and the grid columns it covers.
#[derive(Debug)]
struct ColumnBox {
    id: NodeId,
    columns: Range<usize>,
    group: bool,
}

/// [§ 17.5 Visual layout of table contents](https://www.w3.org/TR/CSS2/tables.html#table-layout)
///
/// "Each box occupies a whole number of grid cells, determined according to
/// the following rules."
#[derive(Debug, Default)]
struct Grid {
    captions: Vec<NodeId>,
    sections: Vec<GridSection>,
    rows: Vec<GridRow>,
    cells: Vec<GridCell>,
    columns: Vec<GridColumn>,
    column_boxes: Vec<ColumnBox>,
    /// Cell index occupying each slot, by row then column.
    slots: Vec<Vec<Option<usize>>>,
}

/// Where a section's rows come from.
enum SectionSource {
    Group(NodeId),
    Rows(Vec<NodeId>),
}

impl Grid {
    fn build(tree: &BoxTree, table: NodeId) -> Self {
        let mut grid = Self::default();
        let mut headers = Vec::new();
        let mut bodies = Vec::new();
        let mut footers = Vec::new();
        let mut loose_rows = Vec::new();

        for &child in tree.children(table) {
            let node = &tree[child];
            if node.is_text() || node.is_out_of_flow() {
                continue;
            }
            let display = node.display();
            if display != Display::TableRow && !loose_rows.is_empty() {
                bodies.push(SectionSource::Rows(std::mem::take(&mut loose_rows)));
            }
            match display {
                Display::TableCaption => grid.captions.push(child),
                Display::TableColumnGroup => grid.add_column_group(tree, child),
                Display::TableColumn => grid.add_column(tree, child, None),
                // [§ 17.2 The CSS table model](https://www.w3.org/TR/CSS2/tables.html#table-display)
                //
                // "table-header-group ... the user agent may repeat header
                // rows on each page spanned by a table. ... table-footer-group
                // ... is always displayed after all other rows and row groups"
                Display::TableHeaderGroup => headers.push(SectionSource::Group(child)),
                Display::TableFooterGroup => footers.push(SectionSource::Group(child)),
                Display::TableRowGroup => bodies.push(SectionSource::Group(child)),
                Display::TableRow => loose_rows.push(child),
                _ => {}
            }
        }
        if !loose_rows.is_empty() {
            bodies.push(SectionSource::Rows(loose_rows));
        }

        for source in headers.into_iter().chain(bodies).chain(footers) {
            grid.add_section(tree, source);
        }

        let count = grid
            .slots
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(grid.columns.len());
        grid.columns.resize(count, GridColumn::default());
        grid
    }

    fn add_column(&mut self, tree: &BoxTree, id: NodeId, group: Option<NodeId>) {
        let start = self.columns.len();
        for _ in 0..tree[id].col_span {
            self.columns.push(GridColumn {
                column: Some(id),
                group,
            });
        }
        self.column_boxes.push(ColumnBox {
            id,
            columns: start..self.columns.len(),
            group: false,
        });
    }

    /// "If the column group has no column children, it spans as many
    /// columns as its `span` says."
    fn add_column_group(&mut self, tree: &BoxTree, id: NodeId) {
        let start = self.columns.len();
        let columns: Vec<NodeId> = tree
            .children(id)
            .iter()
            .copied()
            .filter(|&c| tree[c].display() == Display::TableColumn)
            .collect();
        if columns.is_empty() {
            for _ in 0..tree[id].col_span {
                self.columns.push(GridColumn {
                    column: None,
                    group: Some(id),
                });
            }
        } else {
            for column in columns {
                self.add_column(tree, column, Some(id));
            }
        }
        self.column_boxes.push(ColumnBox {
            id,
            columns: start..self.columns.len(),
            group: true,
        });
    }

    fn add_section(&mut self, tree: &BoxTree, source: SectionSource) {
        let (group, rows) = match source {
            SectionSource::Group(id) => {
                let rows = tree
                    .children(id)
                    .iter()
                    .copied()
                    .filter(|&r| tree[r].display() == Display::TableRow)
                    .collect();
                (Some(id), rows)
            }
            SectionSource::Rows(rows) => (None, rows),
        };

        let section = self.sections.len();
        let start = self.rows.len();
        for &id in &rows {
            self.rows.push(GridRow { id, section });
            self.slots.push(Vec::new());
        }
        let end = self.rows.len();
        self.sections.push(GridSection {
            group,
            rows: start..end,
        });

        for (offset, &row) in rows.iter().enumerate() {
            let r = start + offset;
            let mut column = 0;
            for &cell in tree.children(row) {
                let node = &tree[cell];
                if node.is_text() || node.display() != Display::TableCell {
                    continue;
                }
                while self.slot(r, column).is_some() {
                    column += 1;
                }
                // Row spans stop at the end of their row group.
                let row_span = node.row_span.clamp(1, end - r);
                let col_span = node.col_span.max(1);
                let index = self.cells.len();
                self.cells.push(GridCell {
                    id: cell,
                    row: r,
                    column,
                    row_span,
                    col_span,
                });
                for rr in r..r + row_span {
                    for cc in column..column + col_span {
                        self.occupy(rr, cc, index);
                    }
                }
                column += col_span;
            }
        }
    }

    fn occupy(&mut self, row: usize, column: usize, cell: usize) {
        let slots = &mut self.slots[row];
        if slots.len() <= column {
            slots.resize(column + 1, None);
        }
        slots[column] = Some(cell);
    }

    fn slot(&self, row: usize, column: usize) -> Option<usize> {
        self.slots.get(row).and_then(|r| r.get(column)).copied().flatten()
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Precedence of a border's origin, lowest first.
///
/// "If border styles differ only in color, then a style set on a cell wins
/// over one on a row, which wins over a row group, column, column group and,
/// lastly, table."
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum BorderSource {
    Table,
    ColumnGroup,
    Column,
    RowGroup,
    Row,
    Cell,
}

/// [§ 17.6.2.1 Border conflict resolution](https://www.w3.org/TR/CSS2/tables.html#border-conflict-resolution)
///
/// Candidates are listed left to right and top to bottom, so on a full tie
/// the earlier one wins.
fn resolve_conflict(candidates: &[(BorderSide, BorderSource)]) -> BorderSide {
    // "Borders with the 'border-style' of 'hidden' take precedence over all
    // other conflicting borders."
    if let Some((hidden, _)) = candidates
        .iter()
        .find(|(side, _)| side.style == BorderStyle::Hidden)
    {
        return BorderSide {
            width: 0.0,
            ..*hidden
        };
    }

    let beats = |side: &BorderSide, source: BorderSource, best: &(BorderSide, BorderSource)| {
        // "If none of the styles is 'hidden' and at least one of them is
        // not 'none', then narrow borders are discarded in favor of wider
        // ones."
        let (width, best_width) = (side.used_width(), best.0.used_width());
        if (width - best_width).abs() > f32::EPSILON {
            return width > best_width;
        }
        let (priority, best_priority) =
            (side.style.collapse_priority(), best.0.style.collapse_priority());
        if priority != best_priority {
            return priority > best_priority;
        }
        source > best.1
    };

    let mut best: Option<(BorderSide, BorderSource)> = None;
    for &(side, source) in candidates {
        if best.as_ref().is_none_or(|current| beats(&side, source, current)) {
            best = Some((side, source));
        }
    }
    best.map_or(BorderSide::NONE, |(side, _)| side)
}

fn borders(tree: &BoxTree, id: NodeId) -> &Sides<BorderSide> {
    &tree[id].style.border
}

/// Border candidates on the outer edge of the grid, from the column, its
/// group and the table.
fn push_outer(
    candidates: &mut Vec<(BorderSide, BorderSource)>,
    tree: &BoxTree,
    column: GridColumn,
    table: NodeId,
    pick: fn(&Sides<BorderSide>) -> BorderSide,
) {
    if let Some(id) = column.column {
        candidates.push((pick(borders(tree, id)), BorderSource::Column));
    }
    if let Some(id) = column.group {
        candidates.push((pick(borders(tree, id)), BorderSource::ColumnGroup));
    }
    candidates.push((pick(borders(tree, table)), BorderSource::Table));
}

fn half_widest<'a>(sides: impl IntoIterator<Item = &'a BorderSide>) -> f32 {
    sides
        .into_iter()
        .map(BorderSide::used_width)
        .fold(0.0_f32, f32::max)
        / 2.0
}

/// Winning border of every grid line segment.
#[derive(Debug)]
struct CollapsedBorders {
    /// `horizontal[r][c]`: the line above row `r` (or below the last row)
    /// in column `c`.
    horizontal: Vec<Vec<BorderSide>>,
    /// `vertical[r][c]`: the line left of column `c` (or right of the last
    /// column) in row `r`.
    vertical: Vec<Vec<BorderSide>>,
}

impl CollapsedBorders {
    fn resolve(tree: &BoxTree, table: NodeId, grid: &Grid) -> Self {
        let rows = grid.rows.len();
        let cols = grid.column_count();
        let style = |id: NodeId| borders(tree, id);
        let table_border = style(table);

        let mut horizontal = vec![vec![BorderSide::NONE; cols]; rows + 1];
        for (r, line) in horizontal.iter_mut().enumerate() {
            for (c, segment) in line.iter_mut().enumerate() {
                let above = if r > 0 { grid.slot(r - 1, c) } else { None };
                let below = if r < rows { grid.slot(r, c) } else { None };
                if above.is_some() && above == below {
                    continue;
                }
                let mut candidates = Vec::new();
                if let Some(cell) = above {
                    candidates.push((style(grid.cells[cell].id).bottom, BorderSource::Cell));
                }
                if let Some(cell) = below {
                    candidates.push((style(grid.cells[cell].id).top, BorderSource::Cell));
                }
                if r > 0 {
                    candidates.push((style(grid.rows[r - 1].id).bottom, BorderSource::Row));
                }
                if r < rows {
                    candidates.push((style(grid.rows[r].id).top, BorderSource::Row));
                }
                if r > 0 {
                    let section = &grid.sections[grid.rows[r - 1].section];
                    if section.rows.end == r
                        && let Some(group) = section.group
                    {
                        candidates.push((style(group).bottom, BorderSource::RowGroup));
                    }
                }
                if r < rows {
                    let section = &grid.sections[grid.rows[r].section];
                    if section.rows.start == r
                        && let Some(group) = section.group
                    {
                        candidates.push((style(group).top, BorderSource::RowGroup));
                    }
                }
                let column = grid.columns[c];
                if r == 0 {
                    push_outer(&mut candidates, tree, column, table, |s| s.top);
                }
                if r == rows {
                    push_outer(&mut candidates, tree, column, table, |s| s.bottom);
                }
                *segment = resolve_conflict(&candidates);
            }
        }

        let mut vertical = vec![vec![BorderSide::NONE; cols + 1]; rows];
        for (r, line) in vertical.iter_mut().enumerate() {
            let row = &grid.rows[r];
            let section = &grid.sections[row.section];
            for (c, segment) in line.iter_mut().enumerate() {
                let left = if c > 0 { grid.slot(r, c - 1) } else { None };
                let right = if c < cols { grid.slot(r, c) } else { None };
                if left.is_some() && left == right {
                    continue;
                }
                let mut candidates = Vec::new();
                if let Some(cell) = left {
                    candidates.push((style(grid.cells[cell].id).right, BorderSource::Cell));
                }
                if let Some(cell) = right {
                    candidates.push((style(grid.cells[cell].id).left, BorderSource::Cell));
                }
                if c == 0 {
                    candidates.push((style(row.id).left, BorderSource::Row));
                    if let Some(group) = section.group {
                        candidates.push((style(group).left, BorderSource::RowGroup));
                    }
                }
                if c == cols {
                    candidates.push((style(row.id).right, BorderSource::Row));
                    if let Some(group) = section.group {
                        candidates.push((style(group).right, BorderSource::RowGroup));
                    }
                }
                let before = (c > 0).then(|| grid.columns[c - 1]);
                let after = (c < cols).then(|| grid.columns[c]);
                let (before_col, after_col) = (
                    before.and_then(|b| b.column),
                    after.and_then(|a| a.column),
                );
                if before_col != after_col {
                    if let Some(id) = before_col {
                        candidates.push((style(id).right, BorderSource::Column));
                    }
                    if let Some(id) = after_col {
                        candidates.push((style(id).left, BorderSource::Column));
                    }
                }
                let (before_group, after_group) = (
                    before.and_then(|b| b.group),
                    after.and_then(|a| a.group),
                );
                if before_group != after_group {
                    if let Some(id) = before_group {
                        candidates.push((style(id).right, BorderSource::ColumnGroup));
                    }
                    if let Some(id) = after_group {
                        candidates.push((style(id).left, BorderSource::ColumnGroup));
                    }
                }
                if c == 0 {
                    candidates.push((table_border.left, BorderSource::Table));
                }
                if c == cols {
                    candidates.push((table_border.right, BorderSource::Table));
                }
                *segment = resolve_conflict(&candidates);
            }
        }

        Self {
            horizontal,
            vertical,
        }
    }

    /// "Borders are centered on the grid lines between the cells": each
    /// cell takes half of the widest segment along each of its edges.
    fn cell_border(&self, cell: &GridCell) -> EdgeSizes {
        let columns = cell.column..cell.column + cell.col_span;
        let rows = cell.row..cell.row + cell.row_span;
        EdgeSizes {
            top: half_widest(&self.horizontal[cell.row][columns.clone()]),
            bottom: half_widest(&self.horizontal[rows.end][columns.clone()]),
            left: half_widest(rows.clone().map(|r| &self.vertical[r][columns.start])),
            right: half_widest(rows.map(|r| &self.vertical[r][columns.end])),
        }
    }

    /// "the table's border box includes half the table border": the widest
    /// outer segment on each side.
    fn table_border(&self) -> EdgeSizes {
        EdgeSizes {
            top: self.horizontal.first().map_or(0.0, |l| half_widest(l)),
            bottom: self.horizontal.last().map_or(0.0, |l| half_widest(l)),
            left: half_widest(self.vertical.iter().filter_map(|l| l.first())),
            right: half_widest(self.vertical.iter().filter_map(|l| l.last())),
        }
    }
}

/// Structure and border model of one table, shared by intrinsic sizing
/// and layout.
struct TableContext {
    grid: Grid,
    collapsed: Option<CollapsedBorders>,
    /// Used border of each cell.
    cell_borders: Vec<EdgeSizes>,
    /// Used border of the table box.
    border: EdgeSizes,
    /// Horizontal and vertical `border-spacing`.
    spacing: (f32, f32),
}

impl TableContext {
    fn new(tree: &BoxTree, id: NodeId) -> Self {
        let style = &tree[id].style;
        let grid = Grid::build(tree, id);

        // [§ 17.6.2 The collapsing border model](https://www.w3.org/TR/CSS2/tables.html#collapsing-borders)
        if style.border_collapse == BorderCollapse::Collapse {
            let collapsed = CollapsedBorders::resolve(tree, id, &grid);
            let cell_borders = grid.cells.iter().map(|c| collapsed.cell_border(c)).collect();
            let border = collapsed.table_border();
            return Self {
                grid,
                collapsed: Some(collapsed),
                cell_borders,
                border,
                spacing: (0.0, 0.0),
            };
        }

        let cell_borders = grid
            .cells
            .iter()
            .map(|c| resolve_border(&tree[c.id].style))
            .collect();
        Self {
            grid,
            collapsed: None,
            cell_borders,
            border: resolve_border(style),
            spacing: (
                style.border_spacing.horizontal.max(0.0),
                style.border_spacing.vertical.max(0.0),
            ),
        }
    }

    /// "In this model, a table does not have padding".
    fn padding(&self, style: &ComputedStyle, cb_width: f32) -> EdgeSizes {
        if self.collapsed.is_some() {
            EdgeSizes::default()
        } else {
            resolve_padding(style, cb_width)
        }
    }

    /// Horizontal space of the table box that is not column width.
    fn horizontal_extra(&self, padding: EdgeSizes) -> f32 {
        let columns = self.grid.column_count();
        let spacing = if columns > 0 {
            self.spacing.0 * (columns + 1) as f32
        } else {
            0.0
        };
        spacing + self.border.horizontal() + padding.horizontal()
    }

    /// Width of `span` columns from `first`, with the spacing between them.
    fn span_width(&self, widths: &[f32], first: usize, span: usize) -> f32 {
        let end = (first + span).min(widths.len());
        let sum: f32 = widths[first..end].iter().sum();
        sum + self.spacing.0 * span.saturating_sub(1) as f32
    }
}

/// A non-negative pixel `width`.
fn px_width(style: &ComputedStyle) -> Option<f32> {
    match style.width {
        AutoLength::Length(LengthValue::Px(w)) if w >= 0.0 => Some(w),
        _ => None,
    }
}

/// Border-box widths of a cell. An explicit width is a floor for both.
fn cell_widths(ctx: &LayoutContext<'_>, table: &TableContext, index: usize, depth: usize) -> Widths {
    let cell = &table.grid.cells[index];
    let style = &ctx.tree[cell.id].style;
    let content = content_widths(ctx, cell.id, depth + 1);
    let padding = |p: LengthValue| if p.is_percent() { 0.0 } else { p.resolve(0.0).max(0.0) };
    let edges = padding(style.padding.left)
        + padding(style.padding.right)
        + table.cell_borders[index].horizontal();
    let widths = match px_width(style) {
        Some(w) => Widths::new(content.min.max(w), content.max.max(w)),
        None => content,
    };
    widths.plus(edges)
}

/// [§ 17.5.2.2 Automatic table layout](https://www.w3.org/TR/CSS2/tables.html#auto-table-layout)
///
/// "Calculate the minimum content width (MCW) of each cell ... For each
/// column, determine a maximum and minimum column width from the cells
/// that span only that column. ... For each cell that spans more than one
/// column, increase the minimum widths of the columns it spans so that
/// together, they are at least as wide as the cell."
fn intrinsic_columns(ctx: &LayoutContext<'_>, table: &TableContext, depth: usize) -> Vec<Widths> {
    let grid = &table.grid;
    let mut columns = vec![Widths::default(); grid.column_count()];

    for (i, column) in grid.columns.iter().enumerate() {
        if let Some(id) = column.column
            && let Some(w) = px_width(&ctx.tree[id].style)
        {
            columns[i] = columns[i].max_of(Widths::new(w, w));
        }
    }

    let mut spanning = Vec::new();
    for (index, cell) in grid.cells.iter().enumerate() {
        let widths = cell_widths(ctx, table, index, depth);
        if cell.col_span == 1 {
            columns[cell.column] = columns[cell.column].max_of(widths);
        } else {
            spanning.push((index, widths));
        }
    }

    spanning.sort_by_key(|(index, _)| grid.cells[*index].col_span);
    for (index, widths) in spanning {
        let cell = &grid.cells[index];
        let end = (cell.column + cell.col_span).min(columns.len());
        let spanned = &mut columns[cell.column..end];
        if spanned.is_empty() {
            continue;
        }
        let gaps = table.spacing.0 * (spanned.len() - 1) as f32;
        let count = spanned.len() as f32;
        let have_min: f32 = spanned.iter().map(|w| w.min).sum::<f32>() + gaps;
        if widths.min > have_min {
            let share = (widths.min - have_min) / count;
            for w in spanned.iter_mut() {
                w.min += share;
            }
        }
        let have_max: f32 = spanned.iter().map(|w| w.max).sum::<f32>() + gaps;
        if widths.max > have_max {
            let share = (widths.max - have_max) / count;
            for w in spanned.iter_mut() {
                w.max += share;
            }
        }
        for w in spanned.iter_mut() {
            w.max = w.max.max(w.min);
        }
    }
    columns
}

/// Share `area` between columns: every column gets its minimum, the
/// remainder up to the maxima goes in proportion to each column's range,
/// and anything beyond the maxima in proportion to the maxima.
fn distribute(columns: &[Widths], area: f32) -> Vec<f32> {
    let min: f32 = columns.iter().map(|w| w.min).sum();
    let max: f32 = columns.iter().map(|w| w.max).sum();
    if area <= min {
        return columns.iter().map(|w| w.min).collect();
    }
    if area <= max {
        let t = if max > min { (area - min) / (max - min) } else { 0.0 };
        return columns.iter().map(|w| w.min + (w.max - w.min) * t).collect();
    }
    let extra = area - max;
    if max > 0.0 {
        columns.iter().map(|w| w.max + extra * w.max / max).collect()
    } else {
        let share = extra / columns.len() as f32;
        columns.iter().map(|w| w.max + share).collect()
    }
}

/// [§ 17.5.2.1 Fixed table layout](https://www.w3.org/TR/CSS2/tables.html#fixed-table-layout)
///
/// "1. A column element with a value other than 'auto' for the 'width'
/// property sets the width for that column.
/// 2. Otherwise, a cell in the first row with a value other than 'auto' for
/// the 'width' property determines the width for that column. If the cell
/// spans more than one column, the width is divided over the columns.
/// 3. Any remaining columns equally divide the remaining horizontal table
/// space (minus borders or cell spacing)."
fn fixed_columns(ctx: &LayoutContext<'_>, table: &TableContext, area: f32) -> Vec<f32> {
    let grid = &table.grid;
    let tree = ctx.tree;
    let count = grid.column_count();
    let mut widths: Vec<Option<f32>> = vec![None; count];

    for (i, column) in grid.columns.iter().enumerate() {
        if let Some(id) = column.column
            && let AutoLength::Length(len) = tree[id].style.width
        {
            widths[i] = Some(len.resolve(area).max(0.0));
        }
    }

    let first_row = grid.cells.iter().enumerate().filter(|(_, c)| c.row == 0);
    for (index, cell) in first_row {
        let style = &tree[cell.id].style;
        let AutoLength::Length(len) = style.width else {
            continue;
        };
        let border_box = len.resolve(area).max(0.0)
            + resolve_padding(style, area).horizontal()
            + table.cell_borders[index].horizontal();
        let gaps = table.spacing.0 * (cell.col_span - 1) as f32;
        let share = ((border_box - gaps) / cell.col_span as f32).max(0.0);
        for w in widths.iter_mut().skip(cell.column).take(cell.col_span) {
            if w.is_none() {
                *w = Some(share);
            }
        }
    }

    let assigned: f32 = widths.iter().flatten().sum();
    let auto = widths.iter().filter(|w| w.is_none()).count();
    let remaining = (area - assigned).max(0.0);
    if auto > 0 {
        let share = remaining / auto as f32;
        return widths.iter().map(|w| w.unwrap_or(share)).collect();
    }
    // "If the table is wider than the columns, the extra space should be
    // distributed over the columns."
    let extra = if count > 0 { remaining / count as f32 } else { 0.0 };
    widths.iter().map(|w| w.unwrap_or(0.0) + extra).collect()
}

/// Preferred minimum and preferred widths of a table's border box, widened
/// by its captions.
pub(crate) fn table_widths(ctx: &LayoutContext<'_>, id: NodeId, depth: usize) -> Widths {
    let style = &ctx.tree[id].style;
    let table = TableContext::new(ctx.tree, id);
    let padding = |p: LengthValue| if p.is_percent() { 0.0 } else { p.resolve(0.0).max(0.0) };
    let padding = if table.collapsed.is_some() {
        EdgeSizes::default()
    } else {
        EdgeSizes {
            top: 0.0,
            right: padding(style.padding.right),
            bottom: 0.0,
            left: padding(style.padding.left),
        }
    };
    let extra = table.horizontal_extra(padding);

    let columns = intrinsic_columns(ctx, &table, depth);
    let mut widths = Widths::new(
        columns.iter().map(|w| w.min).sum(),
        columns.iter().map(|w| w.max).sum(),
    )
    .plus(extra);
    if let Some(w) = px_width(style) {
        let w = w.max(widths.min);
        widths = Widths::new(w, w);
    }

    for &caption in &table.grid.captions {
        let caption = outer_widths(ctx, caption, depth + 1);
        widths = Widths::new(widths.min.max(caption.min), widths.max.max(caption.min));
    }
    widths
}

/// [§ 17.5.3 Table height algorithms](https://www.w3.org/TR/CSS2/tables.html#height-layout)
///
/// "Cells in the row that are not aligned on the baseline, ... 'baseline':
/// The baseline of the cell is put at the same height as the baseline of
/// the first of the rows it spans". Unsupported values behave as baseline.
fn aligns_to_baseline(style: &ComputedStyle) -> bool {
    !matches!(
        style.vertical_align,
        VerticalAlign::Top | VerticalAlign::Middle | VerticalAlign::Bottom
    )
}

/// Lowest margin edge of the fragment's in-flow content.
fn content_extent(fragment: &Fragment) -> Option<f32> {
    let children = fragment
        .children
        .iter()
        .filter(|c| !c.style.position.is_absolutely_positioned())
        .map(|c| c.margin_box().bottom());
    let lines = fragment.lines.last().map(|l| l.rect.bottom());
    children.chain(lines).reduce(f32::max)
}

/// Move what is inside a cell without moving the cell. Boxes positioned
/// against the cell stay where they are.
fn shift_contents(fragment: &mut Fragment, dy: f32) {
    for child in &mut fragment.children {
        if !child.style.position.is_absolutely_positioned() {
            child.translate(0.0, dy);
        }
    }
    for line in &mut fragment.lines {
        line.translate(0.0, dy);
    }
}

/// A cell laid out at its final x and a provisional y.
struct LaidCell {
    fragment: Fragment,
    /// Absolute boxes recorded while laying out the cell.
    pending: Range<usize>,
    /// Border-box height.
    height: f32,
    /// Baseline offset from the top of the border box.
    baseline: f32,
}

/// [§ 17.4 Tables in the visual formatting model](https://www.w3.org/TR/CSS2/tables.html#model)
///
/// "the table generates a principal block container box called the table
/// wrapper box that contains the table box itself and any caption boxes".
///
/// `border_y` is the top border edge of the wrapper. In flow, `auto`
/// margins center the table in `cb`; otherwise the wrapper's left margin
/// edge sits at `cb.x`.
pub(crate) fn layout_table(
    ctx: &LayoutContext<'_>,
    id: NodeId,
    cb: &ContainingBlock,
    border_y: f32,
    in_flow: bool,
    pending: &mut Vec<PendingAbsolute>,
) -> Fragment {
    let tree = ctx.tree;
    let node = &tree[id];
    let style = &node.style;
    let table = TableContext::new(tree, id);
    let grid = &table.grid;
    if grid.column_count() == 0 {
        ctx.warnings.warn_once("layout", &format!("table {} has no columns", id.0));
    }
    let mark = pending.len();
    let (column_gap, row_gap) = table.spacing;

    // STEP 1: Table width and column widths.
    let padding = table.padding(style, cb.width);
    let border = table.border;
    let extra = table.horizontal_extra(padding);
    let margins = resolve_margins(style, cb.width);
    let margin_sum = margins.left.unwrap_or(0.0) + margins.right.unwrap_or(0.0);
    let specified = specified_width(style, cb.width).map(|w| clamp_width(style, w, cb.width));

    let (width, columns) = if style.table_layout == TableLayout::Fixed
        && let Some(w) = specified
    {
        let columns = fixed_columns(ctx, &table, (w - extra).max(0.0));
        let used: f32 = columns.iter().sum::<f32>() + extra;
        (w.max(used), columns)
    } else {
        let intrinsic = intrinsic_columns(ctx, &table, 0);
        let min = intrinsic.iter().map(|w| w.min).sum::<f32>() + extra;
        let max = intrinsic.iter().map(|w| w.max).sum::<f32>() + extra;
        let caption_min = grid
            .captions
            .iter()
            .map(|&c| outer_widths(ctx, c, 1).min)
            .fold(0.0_f32, f32::max);
        let width = match specified {
            Some(w) => w.max(min),
            None => (cb.width - margin_sum).min(max).max(min).max(caption_min),
        };
        (width, distribute(&intrinsic, width - extra))
    };
    log::debug!(target: "layout", "table {id:?} width={width} columns={columns:?}");

    // STEP 2: Horizontal position.
    //
    // [§ 10.3.3](https://www.w3.org/TR/CSS2/visudet.html#blockwidth) for the
    // wrapper, whose width is the table's.
    let border_x = if in_flow {
        let remaining = cb.width - width;
        match (margins.left, margins.right) {
            (None, None) => cb.x + (remaining / 2.0).max(0.0),
            (None, Some(right)) => cb.x + (remaining - right).max(0.0),
            (Some(left), _) => cb.x + left,
        }
    } else {
        cb.x + margins.left.unwrap_or(0.0)
    };
    let margin_left = border_x - cb.x;
    let margin_right = if in_flow {
        cb.width - width - margin_left
    } else {
        margins.right.unwrap_or(0.0)
    };
    let wrapper_cb = ContainingBlock {
        x: border_x,
        y: border_y,
        width,
        height: None,
    };

    // STEP 3: Captions above the table.
    let wrapper_style = Arc::new(ComputedStyle::inherit_from(style, Display::Block));
    let mut wrapper = Fragment::new(None, BoxKind::Anonymous, wrapper_style);
    let mut y = border_y;
    for &caption in &grid.captions {
        if tree[caption].style.caption_side == CaptionSide::Top {
            let fragment = layout_caption(ctx, caption, &wrapper_cb, y, pending);
            y = flow_margin_box(&fragment, &wrapper_cb).bottom();
            wrapper.children.push(fragment);
        }
    }

    // STEP 4: Lay out every cell at its column and the first row's top.
    let table_y = y;
    let content_x = border_x + border.left + padding.left;
    let content_y = table_y + border.top + padding.top;
    let content_width = (width - border.horizontal() - padding.horizontal()).max(0.0);
    let mut column_x = Vec::with_capacity(columns.len());
    let mut x = content_x + column_gap;
    for w in &columns {
        column_x.push(x);
        x += w + column_gap;
    }
    let grid_left = column_x.first().copied().unwrap_or(content_x);
    let grid_right = column_x
        .last()
        .zip(columns.last())
        .map_or(content_x, |(x, w)| x + w);

    let provisional_y = content_y + row_gap;
    let cell_cb = ContainingBlock {
        x: content_x,
        y: content_y,
        width: content_width,
        height: None,
    };
    let mut laid = Vec::with_capacity(grid.cells.len());
    for (index, cell) in grid.cells.iter().enumerate() {
        let cell_style = &tree[cell.id].style;
        let cell_padding = resolve_padding(cell_style, content_width);
        let cell_border = table.cell_borders[index];
        let span = table.span_width(&columns, cell.column, cell.col_span);
        let placement = Placement {
            border_x: column_x.get(cell.column).copied().unwrap_or(content_x),
            border_y: provisional_y,
            content_width: (span - cell_padding.horizontal() - cell_border.horizontal()).max(0.0),
            margin: EdgeSizes::default(),
            height: None,
            border: Some(cell_border),
        };
        let start = pending.len();
        let mut floats = FloatContext::new();
        let mut fragment =
            layout_block_box(ctx, cell.id, &cell_cb, &placement, &mut floats, pending).fragment;

        // A cell's `height` is a minimum.
        let content = fragment.dimensions.content;
        if let Some(bottom) = content_extent(&fragment)
            && bottom - content.y > content.height
        {
            fragment.dimensions.content.height = bottom - content.y;
        }
        let border_box = fragment.border_box();
        let baseline = fragment
            .first_baseline()
            .unwrap_or_else(|| fragment.dimensions.content.bottom())
            - border_box.y;
        laid.push(LaidCell {
            fragment,
            pending: start..pending.len(),
            height: border_box.height,
            baseline,
        });
    }

    // STEP 5: Row heights.
    //
    // "the height of a 'table-row' element's box is calculated once the
    // user agent has all the cells in the row available: it is the maximum
    // of the row's computed 'height', the computed 'height' of each cell in
    // the row, and the minimum height (MIN) required by the cells."
    let row_count = grid.rows.len();
    let mut heights: Vec<f32> = grid
        .rows
        .iter()
        .map(|row| specified_height(&tree[row.id].style, None).unwrap_or(0.0))
        .collect();
    let mut baselines = vec![0.0_f32; row_count];
    let mut below = vec![0.0_f32; row_count];
    for (cell, laid) in grid.cells.iter().zip(&laid) {
        let baseline_aligned = aligns_to_baseline(&tree[cell.id].style);
        if baseline_aligned {
            baselines[cell.row] = baselines[cell.row].max(laid.baseline);
        }
        if cell.row_span == 1 {
            heights[cell.row] = heights[cell.row].max(laid.height);
            if baseline_aligned {
                below[cell.row] = below[cell.row].max(laid.height - laid.baseline);
            }
        }
    }
    for ((height, baseline), below) in heights.iter_mut().zip(&baselines).zip(&below) {
        *height = height.max(baseline + below);
    }

    // A row-spanning cell taller than its rows adds the difference to them
    // in equal shares.
    let mut spanning: Vec<usize> = (0..grid.cells.len())
        .filter(|&i| grid.cells[i].row_span > 1)
        .collect();
    spanning.sort_by_key(|&i| grid.cells[i].row_span);
    for index in spanning {
        let cell = &grid.cells[index];
        let rows = cell.row..cell.row + cell.row_span;
        let have = heights[rows.clone()].iter().sum::<f32>() + row_gap * (cell.row_span - 1) as f32;
        if laid[index].height > have {
            let share = (laid[index].height - have) / cell.row_span as f32;
            for h in &mut heights[rows] {
                *h += share;
            }
        }
    }

    // "The height of a table is given by the 'height' property for the
    // 'table' or 'inline-table' element". Surplus height goes to the rows
    // in equal shares.
    let grid_height = |heights: &[f32]| {
        if heights.is_empty() {
            0.0
        } else {
            heights.iter().sum::<f32>() + row_gap * (heights.len() + 1) as f32
        }
    };
    let edges_y = border.vertical() + padding.vertical();
    let specified_height = specified_height(style, cb.height).map(|h| (h - edges_y).max(0.0));
    if let Some(h) = specified_height
        && row_count > 0
    {
        let surplus = h - grid_height(&heights);
        if surplus > 0.0 {
            let share = surplus / row_count as f32;
            for height in &mut heights {
                *height += share;
            }
        }
    }
    let content_height = specified_height.map_or(grid_height(&heights), |h| h.max(grid_height(&heights)));

    let mut row_y = Vec::with_capacity(row_count);
    let mut cursor = content_y + row_gap;
    for h in &heights {
        row_y.push(cursor);
        cursor += h + row_gap;
    }

    // STEP 6: Move cells into their rows and align their content.
    let mut cells_by_row: Vec<Vec<Fragment>> = (0..row_count).map(|_| Vec::new()).collect();
    let mut grid_info = TableInfo {
        column_widths: columns.clone(),
        row_heights: heights.clone(),
        border_collapse: table.collapsed.is_some(),
        ..TableInfo::default()
    };
    for (cell, laid) in grid.cells.iter().zip(laid) {
        let cell_style = &tree[cell.id].style;
        let LaidCell {
            mut fragment,
            pending: range,
            height,
            baseline,
        } = laid;
        let dy = row_y[cell.row] - provisional_y;
        fragment.translate(0.0, dy);
        translate_pending(&mut pending[range.clone()], 0, 0.0, dy);

        // [§ 17.5.4 Vertical alignment in columns](https://www.w3.org/TR/CSS2/tables.html#height-layout)
        let rows = cell.row..cell.row + cell.row_span;
        let span_height =
            heights[rows].iter().sum::<f32>() + row_gap * (cell.row_span - 1) as f32;
        let room = (span_height - height).max(0.0);
        let shift = match cell_style.vertical_align {
            VerticalAlign::Top => 0.0,
            VerticalAlign::Middle => room / 2.0,
            VerticalAlign::Bottom => room,
            _ => (baselines[cell.row] - baseline).clamp(0.0, room),
        };
        shift_contents(&mut fragment, shift);
        translate_pending(&mut pending[range], 0, 0.0, shift);
        fragment.dimensions.content.height += room;

        // [§ 17.6.1.1 Borders and Backgrounds around empty cells](https://www.w3.org/TR/CSS2/tables.html#empty-cells)
        //
        // "In the separated borders model, the 'empty-cells' property
        // controls the rendering of borders and backgrounds around cells
        // that have no visible content."
        let hide_empty = table.collapsed.is_none()
            && cell_style.empty_cells == EmptyCells::Hide
            && !fragment.has_content();
        fragment.cell = Some(CellInfo {
            row: cell.row,
            column: cell.column,
            row_span: cell.row_span,
            col_span: cell.col_span,
            hide_empty,
        });
        cells_by_row[cell.row].push(fragment);
    }

    // STEP 7: Rows, row groups and the table box.
    let mut table_fragment = Fragment::new(Some(id), node.kind, Arc::clone(style));
    let mut section_top = content_y + row_gap;
    for section in &grid.sections {
        let mut rows = Vec::with_capacity(section.rows.len());
        for r in section.rows.clone() {
            let row = &tree[grid.rows[r].id];
            let mut fragment = Fragment::new(Some(grid.rows[r].id), row.kind, Arc::clone(&row.style));
            fragment.dimensions.content = Rect::new(grid_left, row_y[r], grid_right - grid_left, heights[r]);
            fragment.children = std::mem::take(&mut cells_by_row[r]);
            rows.push(fragment);
        }
        let bottom = section
            .rows
            .clone()
            .last()
            .map_or(section_top, |r| row_y[r] + heights[r]);
        let top = section.rows.clone().next().map_or(section_top, |r| row_y[r]);
        match section.group {
            Some(group) => {
                let node = &tree[group];
                let mut fragment = Fragment::new(Some(group), node.kind, Arc::clone(&node.style));
                fragment.dimensions.content =
                    Rect::new(grid_left, top, grid_right - grid_left, bottom - top);
                fragment.children = rows;
                table_fragment.children.push(fragment);
            }
            None => table_fragment.children.extend(rows),
        }
        section_top = bottom + row_gap;
    }

    let grid_top = row_y.first().copied().unwrap_or(content_y);
    let grid_bottom = row_y
        .last()
        .zip(heights.last())
        .map_or(content_y, |(y, h)| y + h);
    let column_rect = |range: &Range<usize>| {
        let left = column_x.get(range.start).copied().unwrap_or(grid_left);
        let right = range
            .end
            .checked_sub(1)
            .and_then(|last| column_x.get(last).zip(columns.get(last)))
            .map_or(left, |(x, w)| x + w);
        Rect::new(left, grid_top, right - left, grid_bottom - grid_top)
    };
    let (groups, singles): (Vec<_>, Vec<_>) = grid.column_boxes.iter().partition(|c| c.group);
    grid_info.columns = groups
        .into_iter()
        .chain(singles)
        .filter(|c| !c.columns.is_empty())
        .map(|c| ColumnFragment {
            node: c.id,
            style: Arc::clone(&tree[c.id].style),
            rect: column_rect(&c.columns),
            group: c.group,
        })
        .collect();

    // [§ 17.5.5 Dynamic row and column effects](https://www.w3.org/TR/CSS2/tables.html#dynamic-effects)
    //
    // Collapsed columns keep their width; painting skips them.
    grid_info.collapsed_columns = grid
        .columns
        .iter()
        .enumerate()
        .filter(|(_, c)| {
            [c.column, c.group]
                .into_iter()
                .flatten()
                .any(|id| tree[id].style.visibility == Visibility::Collapse)
        })
        .map(|(i, _)| i)
        .collect();

    if let Some(collapsed) = &table.collapsed {
        grid_info.collapsed_borders = border_segments(collapsed, &column_x, &columns, &row_y, &heights);
    }
    table_fragment.table = Some(Box::new(grid_info));
    table_fragment.dimensions = BoxDimensions {
        content: Rect::new(content_x, content_y, content_width, content_height),
        padding,
        border,
        margin: EdgeSizes::default(),
    };
    let table_bottom = table_fragment.border_box().bottom();
    for &child in tree.children(id) {
        if tree[child].style.position.is_absolutely_positioned() {
            pending.push(PendingAbsolute::new(ctx, child, content_x, content_y));
        }
    }
    finish_box(ctx, id, &mut table_fragment, cb, pending, mark);
    wrapper.children.push(table_fragment);

    // STEP 8: Captions below the table.
    let mut y = table_bottom;
    for &caption in &grid.captions {
        if tree[caption].style.caption_side == CaptionSide::Bottom {
            let fragment = layout_caption(ctx, caption, &wrapper_cb, y, pending);
            y = flow_margin_box(&fragment, &wrapper_cb).bottom();
            wrapper.children.push(fragment);
        }
    }

    let margins = resolve_margins_or_zero(style, cb.width);
    wrapper.dimensions = BoxDimensions {
        content: Rect::new(border_x, border_y, width, y - border_y),
        padding: EdgeSizes::default(),
        border: EdgeSizes::default(),
        margin: EdgeSizes {
            top: margins.top,
            right: margin_right,
            bottom: margins.bottom,
            left: margin_left,
        },
    };
    wrapper
}

/// [§ 17.4.1 Caption position and alignment](https://www.w3.org/TR/CSS2/tables.html#caption-position)
///
/// A caption is a block box as wide as the table, stacked at `y`.
fn layout_caption(
    ctx: &LayoutContext<'_>,
    id: NodeId,
    cb: &ContainingBlock,
    y: f32,
    pending: &mut Vec<PendingAbsolute>,
) -> Fragment {
    let style = &ctx.tree[id].style;
    let margins = resolve_margins_or_zero(style, cb.width);
    let h = solve_block_width(style, cb.width, None);
    let placement = Placement {
        border_x: cb.x + h.margin_left,
        border_y: y + margins.top,
        content_width: h.width,
        margin: EdgeSizes {
            left: h.margin_left,
            right: h.margin_right,
            ..margins
        },
        height: None,
        border: None,
    };
    let mut floats = FloatContext::new();
    layout_block_box(ctx, id, cb, &placement, &mut floats, pending).fragment
}

/// Visible collapsed-border segments, centered on the grid lines.
fn border_segments(
    collapsed: &CollapsedBorders,
    column_x: &[f32],
    columns: &[f32],
    row_y: &[f32],
    heights: &[f32],
) -> Vec<BorderSegment> {
    let line_x = |c: usize| {
        column_x
            .get(c)
            .copied()
            .or_else(|| column_x.last().zip(columns.last()).map(|(x, w)| x + w))
            .unwrap_or(0.0)
    };
    let line_y = |r: usize| {
        row_y
            .get(r)
            .copied()
            .or_else(|| row_y.last().zip(heights.last()).map(|(y, h)| y + h))
            .unwrap_or(0.0)
    };

    let mut segments = Vec::new();
    for (r, line) in collapsed.horizontal.iter().enumerate() {
        for (c, side) in line.iter().enumerate() {
            let width = side.used_width();
            if width <= 0.0 {
                continue;
            }
            segments.push(BorderSegment {
                rect: Rect::new(line_x(c), line_y(r) - width / 2.0, columns[c], width),
                style: side.style,
                color: side.color,
                horizontal: true,
                row: r,
                column: c,
            });
        }
    }
    for (r, line) in collapsed.vertical.iter().enumerate() {
        for (c, side) in line.iter().enumerate() {
            let width = side.used_width();
            if width <= 0.0 {
                continue;
            }
            segments.push(BorderSegment {
                rect: Rect::new(line_x(c) - width / 2.0, row_y[r], width, heights[r]),
                style: side.style,
                color: side.color,
                horizontal: false,
                row: r,
                column: c,
            });
        }
    }
    segments
}
