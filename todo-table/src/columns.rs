//! Column schema for the todo table.
//!
//! The table always shows the same four columns, so the schema is a closed
//! enum with `const` descriptors rather than a runtime list.

use serde::Serialize;

/// Horizontal alignment of a column's header and cells
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// Flush left
    Left,
    /// Centered
    Center,
    /// Flush right
    Right,
}

/// Static description of one column
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    /// Stable identifier
    pub id: &'static str,
    /// Header label
    pub label: &'static str,
    /// Minimum width in pixels
    pub min_width: u16,
    /// Alignment
    pub align: Align,
}

/// The columns of the todo table, in display order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Column {
    /// Completion checkbox
    Completion,
    /// Item title, struck through when completed
    Title,
    /// Item description
    Description,
    /// Per-row action menu anchor
    Actions,
}

impl Column {
    /// Every column in display order
    pub const ALL: [Self; 4] = [Self::Completion, Self::Title, Self::Description, Self::Actions];

    /// Descriptor for this column
    #[must_use]
    pub const fn descriptor(self) -> ColumnDescriptor {
        match self {
            Self::Completion => ColumnDescriptor {
                id: "complete",
                label: "Completion",
                min_width: 100,
                align: Align::Left,
            },
            Self::Title => ColumnDescriptor {
                id: "title",
                label: "Title",
                min_width: 170,
                align: Align::Left,
            },
            Self::Description => ColumnDescriptor {
                id: "description",
                label: "Description",
                min_width: 170,
                align: Align::Left,
            },
            Self::Actions => ColumnDescriptor {
                id: "actions",
                label: "Actions",
                min_width: 170,
                align: Align::Center,
            },
        }
    }
}

/// Descriptors of every column in display order
pub const COLUMNS: [ColumnDescriptor; 4] = [
    Column::Completion.descriptor(),
    Column::Title.descriptor(),
    Column::Description.descriptor(),
    Column::Actions.descriptor(),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_in_display_order() {
        let labels: Vec<_> = COLUMNS.iter().map(|c| c.label).collect();
        assert_eq!(labels, ["Completion", "Title", "Description", "Actions"]);
    }

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<_> = COLUMNS.iter().map(|c| c.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), COLUMNS.len());
    }

    #[test]
    fn only_actions_is_centered() {
        for column in Column::ALL {
            let expected = if column == Column::Actions {
                Align::Center
            } else {
                Align::Left
            };
            assert_eq!(column.descriptor().align, expected);
        }
    }
}
