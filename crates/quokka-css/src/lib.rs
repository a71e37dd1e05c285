//! Computed style model, CSS 2.1 layout, and paint walker for the Quokka engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Computed Styles** ([CSS 2.1 § 6](https://www.w3.org/TR/CSS2/cascade.html))
//!   - Already cascaded values for every property layout reads
//!   - Keyword enums that (de)serialize the way CSS spells them
//!
//! - **Box Tree Normalization** ([§ 9.2](https://www.w3.org/TR/CSS2/visuren.html#box-gen),
//!   [§ 17.2.1](https://www.w3.org/TR/CSS2/tables.html#anonymous-boxes))
//!   - Anonymous block and inline boxes
//!   - Anonymous table objects
//!   - White space collapsing
//!
//! - **Layout Engine** ([CSS 2.1 § 8-10, 17](https://www.w3.org/TR/CSS2/visudet.html))
//!   - Block formatting contexts with margin collapsing
//!   - Inline formatting contexts with line breaking
//!   - Floats and clearance
//!   - Relative, absolute and fixed positioning
//!   - Fixed and automatic table layout, both border models
//!
//! - **Painting** ([CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html))
//!   - Stacking contexts
//!   - Canvas background propagation
//!   - Table background layers
//!
//! # Not Implemented
//!
//! - Parsing of CSS or markup, and the cascade
//! - Glyph shaping and rasterization
//! - Flexbox, grid and other post-2.1 layout modes

/// CSS backgrounds per [CSS 2.1 § 14.2](https://www.w3.org/TR/CSS2/colors.html#background).
pub mod backgrounds;
/// Box tree normalization and layout per [CSS 2.1 § 8-10](https://www.w3.org/TR/CSS2/visuren.html).
pub mod layout;
/// Display list generation per [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html).
pub mod paint;
/// Computed style values consumed by layout.
pub mod style;

pub use backgrounds::canvas_background;
pub use layout::{
    ApproximateFontMetrics, BoxDimensions, BoxKind, EdgeSizes, FontMetrics, Fragment,
    FragmentTree, LayoutOptions, Rect, StyledNode, layout, normalize,
};
pub use paint::{DisplayCommand, DisplayList, Painter, paint};
pub use style::{
    AutoLength, BorderSide, BorderStyle, ColorValue, ComputedStyle, Display, LengthValue,
    Position, Sides,
};
