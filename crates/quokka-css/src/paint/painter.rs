//! Painter - generates display list from fragment tree
//!
//! [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
//!
//! The painter walks the fragment tree and generates drawing commands in the
//! correct painting order (back to front).

use quokka_tree::NodeId;

use crate::backgrounds::{CanvasBackground, canvas_background};
use crate::layout::fragment::{
    DecorationLine, InlineBoxFragment, InlineFragment, LineFragment, TableInfo, TextRun,
    is_visible,
};
use crate::layout::{BoxDimensions, Fragment, FragmentTree, LayoutOptions, Rect};
use crate::style::{BorderSide, BorderStyle, ColorValue, ComputedStyle, Sides, Visibility};

use super::stacking::{Layer, child_fragments, clips_overflow, collect_layers, is_layered};
use super::{DisplayCommand, DisplayList};

/// Painter that generates a display list from a fragment tree.
///
/// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
///
/// The painter implements the CSS painting order algorithm, which determines
/// what gets drawn and in what order.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    /// Fill beneath selected text.
    selection_color: ColorValue,
}

impl Painter {
    /// Create a painter using the selection color of `options`.
    #[must_use]
    pub const fn new(options: &LayoutOptions) -> Self {
        Self {
            selection_color: options.selection_color,
        }
    }

    /// Paint a fragment tree and return the display list.
    ///
    /// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
    ///
    /// This is the main entry point for painting. The root box forms the
    /// root stacking context; the canvas background goes first.
    #[must_use]
    pub fn paint(&self, tree: &FragmentTree) -> DisplayList {
        let mut walk = Walk {
            selection_color: self.selection_color,
            list: DisplayList::new(),
            canvas_source: None,
        };

        if let Some(canvas) = canvas_background(tree) {
            walk.canvas(&canvas, tree.viewport);
            walk.canvas_source = Some(canvas.source);
        }
        walk.stacking_context(&tree.root, true);
        walk.list
    }
}

/// State of one paint pass.
struct Walk {
    selection_color: ColorValue,
    list: DisplayList,
    /// Box whose background was promoted to the canvas.
    canvas_source: Option<NodeId>,
}

impl Walk {
    fn push(&mut self, command: DisplayCommand) {
        self.list.push(command);
    }

    /// "The background of the root element becomes the background of the
    /// canvas and covers the entire canvas".
    fn canvas(&mut self, canvas: &CanvasBackground, viewport: Rect) {
        if !canvas.color.is_transparent() {
            self.push(DisplayCommand::FillRect {
                rect: viewport,
                color: canvas.color,
                radius: 0.0,
            });
        }
        if let Some(image) = &canvas.image {
            self.push(DisplayCommand::DrawImage {
                rect: canvas.image_area,
                image: image.clone(),
                source: None,
            });
        }
    }

    /// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
    ///
    /// "Within each stacking context, the following layers are painted in
    /// back-to-front order:
    ///
    /// 1. the background and borders of the element forming the stacking
    ///    context.
    /// 2. the child stacking contexts with negative stack levels (most
    ///    negative first).
    /// 3. the in-flow, non-inline-level, non-positioned descendants.
    /// 4. the non-positioned floats.
    /// 5. the in-flow, inline-level, non-positioned descendants, including
    ///    inline tables and inline blocks.
    /// 6. the child stacking contexts with stack level 0 and the positioned
    ///    descendants with stack level 0.
    /// 7. the child stacking contexts with positive stack levels (least
    ///    positive first)."
    ///
    /// The root of the whole tree clips nothing beyond its own flow; a
    /// nested context also clips its layers to its padding box.
    fn stacking_context(&mut self, fragment: &Fragment, is_root: bool) {
        let opacity = fragment.style.opacity.clamp(0.0, 1.0);
        if opacity < 1.0 {
            self.push(DisplayCommand::PushOpacity { alpha: opacity });
        }

        let layers = collect_layers(fragment, !is_root);
        let (negative, rest): (Vec<Layer<'_>>, Vec<Layer<'_>>) =
            layers.into_iter().partition(|layer| layer.stack_level < 0);

        // STEP 1: Background and borders of the context root. A table paints
        // them as its first layer.
        if fragment.table.is_none() {
            self.background(fragment);
            self.border(fragment);
        }

        // STEP 2: Negative stack levels.
        for layer in &negative {
            self.layer(layer);
        }

        // STEPS 3-5: Normal flow.
        self.flow_contents(fragment);

        // STEPS 6-7: Stack level zero, then positive levels.
        for layer in &rest {
            self.layer(layer);
        }

        if opacity < 1.0 {
            self.push(DisplayCommand::Restore);
        }
    }

    /// Paint one layer inside the overflow clips of the ancestors it sits in.
    /// Those clips were popped when the ancestors' flow content finished.
    fn layer(&mut self, layer: &Layer<'_>) {
        for &rect in &layer.clips {
            self.push(DisplayCommand::PushClip { rect });
        }
        if layer.is_context {
            self.stacking_context(layer.fragment, false);
        } else {
            // "treat the element as if it created a new stacking context, but
            // any positioned descendants and descendants which actually
            // create a new stacking context should be considered part of the
            // parent stacking context, not this new one."
            self.flow_box(layer.fragment);
        }
        for _ in &layer.clips {
            self.push(DisplayCommand::Restore);
        }
    }

    /// A box painted in tree order, and the flow content inside it.
    fn flow_box(&mut self, fragment: &Fragment) {
        if fragment.table.is_none() {
            self.background(fragment);
            self.border(fragment);
        }
        self.flow_contents(fragment);
    }

    /// Everything inside a box except its own background and border:
    /// replaced content, block-level children, floats, then line boxes.
    /// Layered descendants are skipped; their stacking context paints them.
    fn flow_contents(&mut self, fragment: &Fragment) {
        if let Some(table) = fragment.table.as_deref() {
            self.table(fragment, table);
            return;
        }

        let clips = clips_overflow(&fragment.style);
        if clips {
            self.push(DisplayCommand::PushClip {
                rect: fragment.padding_box(),
            });
        }

        self.replaced_content(fragment);

        // [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
        //
        // In-flow block-level descendants first, then floats.
        let (floats, blocks): (Vec<&Fragment>, Vec<&Fragment>) = fragment
            .children
            .iter()
            .filter(|child| !is_layered(&child.style))
            .partition(|child| child.style.is_floated());
        for child in blocks {
            self.flow_box(child);
        }
        for child in floats {
            self.flow_box(child);
        }

        for line in &fragment.lines {
            self.line(line);
        }
        self.marker(fragment);

        if clips {
            self.push(DisplayCommand::Restore);
        }
    }

    /// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
    /// "the background color of the element", then its background image.
    fn background(&mut self, fragment: &Fragment) {
        let style = &fragment.style;
        if !is_visible(style) || self.is_canvas_source(fragment) {
            return;
        }
        fill_background(
            &mut self.list,
            style,
            fragment.border_box(),
            style.border_radius,
        );
        if let Some(image) = &fragment.background_image {
            self.push(DisplayCommand::DrawImage {
                rect: fragment.padding_box(),
                image: image.clone(),
                source: None,
            });
        }
    }

    fn is_canvas_source(&self, fragment: &Fragment) -> bool {
        fragment.node.is_some() && fragment.node == self.canvas_source
    }

    /// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
    /// "the border of the element"
    fn border(&mut self, fragment: &Fragment) {
        if !is_visible(&fragment.style) {
            return;
        }
        if let Some(command) = border_command(&fragment.style, &fragment.dimensions) {
            self.push(command);
        }
    }

    /// "the replaced content of replaced inline-level elements"
    fn replaced_content(&mut self, fragment: &Fragment) {
        if let Some(image) = &fragment.image
            && is_visible(&fragment.style)
        {
            self.push(DisplayCommand::DrawImage {
                rect: fragment.dimensions.content,
                image: image.clone(),
                source: fragment.source_rect,
            });
        }
    }

    /// [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
    ///
    /// Items of a line in order. An inline box's background and border come
    /// before the content it wraps.
    fn line(&mut self, line: &LineFragment) {
        for item in &line.items {
            match item {
                InlineFragment::InlineBox(inline) => self.inline_box(inline),
                InlineFragment::Text(run) => self.text_run(run),
                InlineFragment::Atomic(atomic) => {
                    if !is_layered(&atomic.style) {
                        // "each inline-block and inline-table element is
                        // painted as if it created a new stacking context"
                        self.flow_box(atomic);
                    }
                }
            }
        }
    }

    fn inline_box(&mut self, inline: &InlineBoxFragment) {
        let style = &inline.style;
        if !is_visible(style) {
            return;
        }
        fill_background(&mut self.list, style, inline.dimensions.border_box(), 0.0);
        if let Some(command) = border_command(style, &inline.dimensions) {
            self.push(command);
        }
    }

    /// Selection highlight, glyphs, then decoration lines.
    fn text_run(&mut self, run: &TextRun) {
        if !run.visible || run.text.is_empty() {
            return;
        }

        if let Some((start, end)) = run.selection
            && end > start
        {
            self.push(DisplayCommand::FillRect {
                rect: Rect::new(start, run.rect.y, end - start, run.rect.height),
                color: self.selection_color,
                radius: 0.0,
            });
        }

        self.push(DisplayCommand::DrawText {
            x: run.rect.x,
            y: run.baseline,
            text: run.text.clone(),
            font: run.font.clone(),
            color: run.color,
        });

        // [§ 16.3.1 Underlining, overlining, striking, and blinking](https://www.w3.org/TR/CSS2/text.html#lining-striking-props)
        let thickness = (run.font.size / 16.0).max(1.0);
        for decoration in &run.decorations {
            let y = match decoration.line {
                DecorationLine::Underline => run.baseline + run.descent / 2.0,
                DecorationLine::Overline => run.baseline - run.ascent,
                DecorationLine::LineThrough => run.baseline - run.ascent * 0.35,
            };
            self.push(DisplayCommand::DrawLine {
                rect: Rect::new(run.rect.x, y, run.rect.width, thickness),
                style: BorderStyle::Solid,
                color: decoration.color,
            });
        }
    }

    /// [§ 12.5.1 Lists](https://www.w3.org/TR/CSS2/generate.html#lists)
    fn marker(&mut self, fragment: &Fragment) {
        if let Some(marker) = &fragment.marker
            && is_visible(&fragment.style)
        {
            self.push(DisplayCommand::DrawText {
                x: marker.rect.x,
                y: marker.baseline,
                text: marker.text.clone(),
                font: marker.font.clone(),
                color: marker.color,
            });
        }
    }

    /// [§ 17.5.1 Table layers and transparency](https://www.w3.org/TR/CSS2/tables.html#table-layers)
    ///
    /// "Table cells may be transparent or opaque. The following six layers
    /// are drawn, one on top of the other, in the order listed."
    ///
    /// Each layer is painted once for the whole table before any cell
    /// content.
    fn table(&mut self, fragment: &Fragment, info: &TableInfo) {
        let grid = TableGrid::collect(fragment);
        let skip_cell = |cell: &Fragment| {
            cell.cell.is_some_and(|c| {
                grid.collapsed_rows.contains(&c.row) || info.collapsed_columns.contains(&c.column)
            })
        };

        // STEP 1: "The lowest layer is a single plane, representing the
        // table box itself."
        self.background(fragment);

        // STEP 2: "The next layer contains the column groups."
        // STEP 3: "On top of the column groups are the areas representing
        // the column boxes."
        for column in &info.columns {
            if is_visible(&column.style) {
                fill_background(&mut self.list, &column.style, column.rect, 0.0);
            }
        }

        // STEP 4: "Next is the layer containing the row groups."
        for group in &grid.groups {
            self.background(group);
        }

        // STEP 5: "The next to last layer contains the rows."
        for row in &grid.rows {
            self.background(row);
        }

        // STEP 6: "The topmost layer contains the cells themselves."
        //
        // [§ 17.6.1.1 Borders and Backgrounds around empty cells](https://www.w3.org/TR/CSS2/tables.html#empty-cells)
        //
        // "a value of 'hide' means that no borders or backgrounds are drawn
        // around/behind empty cells".
        let cells: Vec<&Fragment> = grid
            .rows
            .iter()
            .flat_map(|row| row.children.iter())
            .filter(|cell| !is_layered(&cell.style) && !skip_cell(cell))
            .collect();
        for cell in &cells {
            if !cell.cell.is_some_and(|c| c.hide_empty) {
                self.background(cell);
            }
        }

        // Borders above every background.
        if info.border_collapse {
            // [§ 17.6.2 The collapsing border model](https://www.w3.org/TR/CSS2/tables.html#collapsing-borders)
            for segment in &info.collapsed_borders {
                let collapsed = if segment.horizontal {
                    info.collapsed_columns.contains(&segment.column)
                } else {
                    grid.collapsed_rows.contains(&segment.row)
                };
                if !collapsed {
                    self.push(DisplayCommand::DrawLine {
                        rect: segment.rect,
                        style: segment.style,
                        color: segment.color,
                    });
                }
            }
        } else {
            self.border(fragment);
            for cell in &cells {
                if !cell.cell.is_some_and(|c| c.hide_empty) {
                    self.border(cell);
                }
            }
        }

        // Cell content last.
        for cell in cells {
            self.flow_contents(cell);
        }
    }
}

/// Row groups and rows of a table fragment in grid order.
struct TableGrid<'a> {
    groups: Vec<&'a Fragment>,
    rows: Vec<&'a Fragment>,
    /// [§ 17.5.5 Dynamic row and column effects](https://www.w3.org/TR/CSS2/tables.html#dynamic-effects)
    ///
    /// "the entire row or column is removed from the display".
    collapsed_rows: Vec<usize>,
}

impl<'a> TableGrid<'a> {
    fn collect(table: &'a Fragment) -> Self {
        let mut groups = Vec::new();
        let mut rows = Vec::new();
        for child in child_fragments(table) {
            if child.style.display.is_row_group() {
                groups.push(child);
                rows.extend(child.children.iter());
            } else if child.cell.is_none() && !child.style.position.is_absolutely_positioned() {
                rows.push(child);
            }
        }
        let collapsed_rows = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.style.visibility == Visibility::Collapse)
            .map(|(i, _)| i)
            .collect();
        // Collapsed rows paint nothing at all.
        rows.retain(|row| row.style.visibility != Visibility::Collapse);
        Self {
            groups,
            rows,
            collapsed_rows,
        }
    }
}

/// [§ 14.2.1 Background properties](https://www.w3.org/TR/CSS2/colors.html#background-properties)
///
/// "the background of an element is the total size of the element,
/// including padding and border (but not margin)."
fn fill_background(list: &mut DisplayList, style: &ComputedStyle, rect: Rect, radius: f32) {
    if style.background_color.is_transparent() || rect.width <= 0.0 || rect.height <= 0.0 {
        return;
    }
    list.push(DisplayCommand::FillRect {
        rect,
        color: style.background_color,
        radius,
    });
}

/// [§ 8.5 Border properties](https://www.w3.org/TR/CSS2/box.html#border-properties)
///
/// One command for the whole box, or `None` when no side is visible. Widths
/// come from the laid out box: they differ from the style on inline box
/// fragments that do not carry every edge.
fn border_command(style: &ComputedStyle, dimensions: &BoxDimensions) -> Option<DisplayCommand> {
    let widths = dimensions.border;
    let side = |side: &BorderSide, width: f32| {
        if side.style.is_visible() && width > 0.0 {
            BorderSide { width, ..*side }
        } else {
            BorderSide::NONE
        }
    };
    let sides = Sides {
        top: side(&style.border.top, widths.top),
        right: side(&style.border.right, widths.right),
        bottom: side(&style.border.bottom, widths.bottom),
        left: side(&style.border.left, widths.left),
    };
    let visible = [sides.top, sides.right, sides.bottom, sides.left]
        .iter()
        .any(|s| s.width > 0.0);
    visible.then(|| DisplayCommand::DrawBorder {
        rect: dimensions.border_box(),
        sides,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Display;

    #[test]
    fn test_border_command_skips_invisible_sides() {
        let mut style = ComputedStyle::with_display(Display::Block);
        style.border.left = BorderSide::solid(3.0, ColorValue::BLACK);
        style.border.right = BorderSide {
            style: BorderStyle::Hidden,
            ..BorderSide::solid(3.0, ColorValue::BLACK)
        };
        let mut dims = BoxDimensions::default();
        dims.border.left = 3.0;
        dims.border.right = 3.0;
        let Some(DisplayCommand::DrawBorder { sides, .. }) = border_command(&style, &dims) else {
            panic!("expected a border command");
        };
        assert!((sides.left.width - 3.0).abs() < 0.01);
        assert!(sides.right.width.abs() < 0.01);
    }

    #[test]
    fn test_no_border_command_without_widths() {
        let style = ComputedStyle::with_display(Display::Block);
        assert!(border_command(&style, &BoxDimensions::default()).is_none());
    }
}
