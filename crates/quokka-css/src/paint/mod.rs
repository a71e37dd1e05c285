//! CSS Painting
//!
//! [CSS 2.1 Appendix E - Elaborate description of Stacking Contexts](https://www.w3.org/TR/CSS2/zindex.html)
//!
//! This module implements the painting phase, which converts a fragment tree
//! into a display list of drawing commands. The display list can then be
//! executed by any renderer (software, GPU, etc.).
//!
//! # Architecture
//!
//! The painting phase is separate from layout and rendering:
//!
//! ```text
//! Box tree → Layout → Paint → Render
//!                       ↓
//!                 DisplayList
//! ```
//!
//! Painting reads geometry only. It never changes the size or position of
//! a box, so a box hidden with `visibility` keeps the space layout gave it.

mod display_list;
mod painter;
mod stacking;

pub use display_list::{DisplayCommand, DisplayList};
pub use painter::Painter;

use crate::layout::{FragmentTree, LayoutOptions};

/// Paint `tree` with the selection color from `options`.
#[must_use]
pub fn paint(tree: &FragmentTree, options: &LayoutOptions) -> DisplayList {
    Painter::new(options).paint(tree)
}
