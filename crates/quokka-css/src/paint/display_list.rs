//! Display List - a sequence of drawing commands
//!
//! [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html)
//!
//! The display list is the output of the painting phase. It contains all the
//! drawing commands needed to render a page, in the correct z-order. A
//! backend executes the commands in sequence and must not reorder, merge or
//! drop any of them.

use quokka_common::image::ImageHandle;
use serde::Serialize;

use crate::layout::Rect;
use crate::style::{BorderSide, BorderStyle, ColorValue, FontRef, Sides};

/// A single drawing command.
///
/// [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
///
/// Commands are added to the display list in painting order (back to front).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum DisplayCommand {
    /// Fill a rectangle with a solid color.
    ///
    /// Used for backgrounds, the canvas, and selection highlights.
    FillRect {
        /// Area to fill.
        rect: Rect,
        /// Fill color.
        color: ColorValue,
        /// Corner radius. Zero means sharp corners.
        radius: f32,
    },

    /// Draw the four borders of a box.
    ///
    /// [§ 8.5 Border properties](https://www.w3.org/TR/CSS2/box.html#border-properties)
    ///
    /// "The border properties specify the width, color, and style of the
    /// border area of a box."
    DrawBorder {
        /// Border box. Each side is drawn inward from its edge.
        rect: Rect,
        /// Used width, style and color of each side.
        sides: Sides<BorderSide>,
    },

    /// Draw text with its baseline origin at `(x, y)`.
    ///
    /// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
    /// Step 7: "the element's text"
    DrawText {
        /// Left edge of the run.
        x: f32,
        /// Baseline.
        y: f32,
        /// The text content to draw.
        text: String,
        /// Font to draw with.
        font: FontRef,
        /// Text color.
        color: ColorValue,
    },

    /// Draw an image scaled into a rectangle.
    ///
    /// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
    /// Step 5: "the replaced content of replaced inline-level elements"
    DrawImage {
        /// Destination rectangle.
        rect: Rect,
        /// Image obtained from the image provider during layout.
        image: ImageHandle,
        /// Part of the image to draw, in image pixels. `None` is the whole
        /// image.
        source: Option<Rect>,
    },

    /// Stroke a straight line that fills `rect`, in a border style.
    ///
    /// Used for text decorations and collapsed table borders.
    DrawLine {
        /// Area covered by the stroke.
        rect: Rect,
        /// Line style.
        style: BorderStyle,
        /// Line color.
        color: ColorValue,
    },

    /// Push a clip rectangle onto the clip stack.
    ///
    /// [§ 11.1.1 overflow](https://www.w3.org/TR/CSS2/visufx.html#overflow)
    ///
    /// All subsequent drawing commands are clipped to the intersection of
    /// all active clip rectangles until the matching [`Self::Restore`].
    PushClip {
        /// Clip rectangle: the padding box of the clipping box.
        rect: Rect,
    },

    /// Start a group composited at `alpha` when it is restored.
    ///
    /// [CSS Color 3 § 3.2 'opacity'](https://www.w3.org/TR/css-color-3/#transparency)
    PushOpacity {
        /// Group opacity, from 0 (invisible) to 1.
        alpha: f32,
    },

    /// Pop the most recent clip or opacity group.
    Restore,
}

/// A list of drawing commands in painting order.
///
/// [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
///
/// The display list contains all commands needed to render a page. Commands
/// are stored in back-to-front order, so the renderer can simply iterate
/// and execute each command.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayList {
    commands: Vec<DisplayCommand>,
}

impl DisplayList {
    /// Create an empty display list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Add a command to the display list.
    pub fn push(&mut self, command: DisplayCommand) {
        self.commands.push(command);
    }

    /// Get the commands in painting order.
    #[must_use]
    pub fn commands(&self) -> &[DisplayCommand] {
        &self.commands
    }

    /// Get the number of commands.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if the display list is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Iterate over the commands in painting order.
    pub fn iter(&self) -> std::slice::Iter<'_, DisplayCommand> {
        self.commands.iter()
    }
}

impl<'a> IntoIterator for &'a DisplayList {
    type Item = &'a DisplayCommand;
    type IntoIter = std::slice::Iter<'a, DisplayCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_keep_push_order() {
        let mut list = DisplayList::new();
        list.push(DisplayCommand::PushOpacity { alpha: 0.5 });
        list.push(DisplayCommand::Restore);
        assert_eq!(list.len(), 2);
        assert!(matches!(list.commands()[0], DisplayCommand::PushOpacity { .. }));
        assert!(matches!(list.commands()[1], DisplayCommand::Restore));
    }

    #[test]
    fn test_serializes_with_op_tag() {
        let command = DisplayCommand::PushClip {
            rect: Rect::new(0.0, 0.0, 10.0, 20.0),
        };
        let json = serde_json::to_string(&command).unwrap();
        assert!(json.starts_with(r#"{"op":"push-clip""#), "{json}");
    }
}
