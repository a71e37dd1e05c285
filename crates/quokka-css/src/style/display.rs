//! The CSS 2.1 `display` property
//!
//! [§ 9.2.4 The 'display' property](https://www.w3.org/TR/CSS2/visuren.html#display-prop)

use serde::{Deserialize, Serialize};
use strum_macros::Display as KeywordDisplay;

/// [§ 9.2.4 The 'display' property](https://www.w3.org/TR/CSS2/visuren.html#display-prop)
///
/// A closed set: every value maps to exactly one layout routine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, KeywordDisplay,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Display {
    /// "This value causes an element to generate one or more inline boxes."
    #[default]
    Inline,
    /// "This value causes an element to generate a block box."
    Block,
    /// "This value causes an element (e.g., LI in HTML) to generate a
    /// principal block box and a marker box."
    ListItem,
    /// "This value causes an element to generate an inline-level block
    /// container."
    InlineBlock,
    /// "Specifies that an element defines a block-level table."
    Table,
    /// "Specifies that an element defines an inline-level table."
    InlineTable,
    /// "Specifies that an element groups one or more rows."
    TableRowGroup,
    /// "Like 'table-row-group', but for visual formatting, the row group is
    /// always displayed before all other rows and row groups."
    TableHeaderGroup,
    /// "Like 'table-row-group', but for visual formatting, the row group is
    /// always displayed after all other rows and row groups."
    TableFooterGroup,
    /// "Specifies that an element is a row of cells."
    TableRow,
    /// "Specifies that an element groups one or more columns."
    TableColumnGroup,
    /// "Specifies that an element describes a column of cells."
    TableColumn,
    /// "Specifies that an element represents a table cell."
    TableCell,
    /// "Specifies a caption for the table."
    TableCaption,
    /// "This value causes an element to not appear in the formatting
    /// structure."
    None,
}

impl Display {
    /// [§ 9.2.1 Block-level elements and block boxes](https://www.w3.org/TR/CSS2/visuren.html#block-boxes)
    ///
    /// "The following values of the 'display' property make an element
    /// block-level: 'block', 'list-item', and 'table'."
    #[must_use]
    pub const fn is_block_level(self) -> bool {
        matches!(self, Self::Block | Self::ListItem | Self::Table)
    }

    /// [§ 9.2.2 Inline-level elements and inline boxes](https://www.w3.org/TR/CSS2/visuren.html#inline-boxes)
    ///
    /// "The following values of the 'display' property make an element
    /// inline-level: 'inline', 'inline-table', and 'inline-block'."
    #[must_use]
    pub const fn is_inline_level(self) -> bool {
        matches!(self, Self::Inline | Self::InlineBlock | Self::InlineTable)
    }

    /// Inline-level boxes laid out as a single unbreakable unit.
    #[must_use]
    pub const fn is_atomic_inline(self) -> bool {
        matches!(self, Self::InlineBlock | Self::InlineTable)
    }

    /// `table` or `inline-table`.
    #[must_use]
    pub const fn is_table(self) -> bool {
        matches!(self, Self::Table | Self::InlineTable)
    }

    /// Any of the three row group values.
    #[must_use]
    pub const fn is_row_group(self) -> bool {
        matches!(
            self,
            Self::TableRowGroup | Self::TableHeaderGroup | Self::TableFooterGroup
        )
    }

    /// Internal table boxes that need a table ancestor.
    ///
    /// [§ 17.2 The CSS table model](https://www.w3.org/TR/CSS2/tables.html#table-display)
    #[must_use]
    pub const fn is_internal_table(self) -> bool {
        matches!(
            self,
            Self::TableRowGroup
                | Self::TableHeaderGroup
                | Self::TableFooterGroup
                | Self::TableRow
                | Self::TableColumnGroup
                | Self::TableColumn
                | Self::TableCell
                | Self::TableCaption
        )
    }

    /// Children a table box accepts without an anonymous row around them.
    ///
    /// [§ 17.2.1 Anonymous table objects](https://www.w3.org/TR/CSS2/tables.html#anonymous-boxes)
    #[must_use]
    pub const fn is_proper_table_child(self) -> bool {
        matches!(
            self,
            Self::TableRowGroup
                | Self::TableHeaderGroup
                | Self::TableFooterGroup
                | Self::TableRow
                | Self::TableColumnGroup
                | Self::TableColumn
                | Self::TableCaption
        )
    }

    /// [§ 9.7 Relationships between 'display', 'position', and 'float'](https://www.w3.org/TR/CSS2/visuren.html#dis-pos-flo)
    ///
    /// The "computed value" column of the §9.7 table for floats, absolutely
    /// positioned boxes and the root element.
    #[must_use]
    pub const fn blockified(self) -> Self {
        match self {
            Self::InlineTable => Self::Table,
            Self::Inline
            | Self::InlineBlock
            | Self::TableRowGroup
            | Self::TableHeaderGroup
            | Self::TableFooterGroup
            | Self::TableRow
            | Self::TableColumnGroup
            | Self::TableColumn
            | Self::TableCell
            | Self::TableCaption => Self::Block,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blockify_table_inline() {
        assert_eq!(Display::InlineTable.blockified(), Display::Table);
        assert_eq!(Display::InlineBlock.blockified(), Display::Block);
        assert_eq!(Display::ListItem.blockified(), Display::ListItem);
        assert_eq!(Display::None.blockified(), Display::None);
    }

    #[test]
    fn test_keyword_spelling() {
        assert_eq!(Display::TableHeaderGroup.to_string(), "table-header-group");
        assert_eq!(Display::InlineBlock.to_string(), "inline-block");
    }
}
