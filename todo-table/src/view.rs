//! View model for the todo table.
//!
//! [`render`] is a pure projection of [`TodoTableState`] into what a UI
//! draws: either an empty-state message or the rows plus a pagination
//! footer. [`TableView`]'s `Display` impl is a plain-text rendering used by
//! the demo binary and handy in logs.

use crate::columns::{Align, ColumnDescriptor, COLUMNS};
use crate::config::TableConfig;
use crate::types::{TodoId, TodoTableState};
use serde::Serialize;
use std::fmt;
use todo_table_core::paging::{PageIndex, PageSize, RowRange};

/// Anchor for the per-row action menu; the menu itself is supplied elsewhere
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RowActions {
    /// Item the menu acts on
    pub id: TodoId,
}

/// One rendered row
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RowView {
    /// Item identifier
    pub id: TodoId,
    /// Checkbox state
    pub checked: bool,
    /// Title text
    pub title: String,
    /// Whether the title is drawn struck through
    pub struck_through: bool,
    /// Description text
    pub description: String,
    /// Whether the row is drawn dimmed
    pub dimmed: bool,
    /// Action menu anchor
    pub actions: RowActions,
}

/// Pagination controls below the rows
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PaginationFooter {
    /// Total number of items across all pages
    pub total_count: u64,
    /// Selected 0-based page index
    pub page_index: PageIndex,
    /// Selected rows per page
    pub page_size: PageSize,
    /// Values offered by the page-size control
    pub page_size_options: Vec<PageSize>,
    /// First displayed row (1-based, 0 when nothing is displayed)
    pub from: u64,
    /// Last displayed row
    pub to: u64,
    /// Whether the "previous page" button is enabled
    pub can_go_back: bool,
    /// Whether the "next page" button is enabled
    pub can_go_forward: bool,
}

/// What the table draws
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableView {
    /// No items: a single informational message, no table and no footer
    Empty {
        /// Message to show
        message: String,
    },
    /// Column headers, one row per item and the pagination footer
    Table {
        /// Column headers in display order
        columns: Vec<ColumnDescriptor>,
        /// Rows in data-source order
        rows: Vec<RowView>,
        /// Pagination controls
        footer: PaginationFooter,
    },
}

impl TableView {
    /// Rendered rows (empty for [`TableView::Empty`])
    #[must_use]
    pub fn rows(&self) -> &[RowView] {
        match self {
            Self::Empty { .. } => &[],
            Self::Table { rows, .. } => rows,
        }
    }

    /// Pagination footer, if one is drawn
    #[must_use]
    pub const fn footer(&self) -> Option<&PaginationFooter> {
        match self {
            Self::Empty { .. } => None,
            Self::Table { footer, .. } => Some(footer),
        }
    }
}

/// Project the table state into its view.
#[must_use]
pub fn render(state: &TodoTableState, config: &TableConfig) -> TableView {
    if state.items().is_empty() {
        return TableView::Empty {
            message: config.empty_message.clone(),
        };
    }

    let rows = state
        .items()
        .iter()
        .map(|item| RowView {
            id: item.id,
            checked: item.is_completed,
            title: item.title.clone(),
            struck_through: item.is_completed,
            description: item.description.clone(),
            dimmed: item.is_completed,
            actions: RowActions { id: item.id },
        })
        .collect();

    let range = RowRange::for_page(
        state.total_count(),
        state.selected_page_index,
        state.selected_page_size,
    );

    TableView::Table {
        columns: COLUMNS.to_vec(),
        rows,
        footer: PaginationFooter {
            total_count: state.total_count(),
            page_index: state.selected_page_index,
            page_size: state.selected_page_size,
            page_size_options: config.page_size_options.clone(),
            from: range.from,
            to: range.to,
            can_go_back: state.can_go_back(),
            can_go_forward: state.can_go_forward(),
        },
    }
}

fn cell(f: &mut fmt::Formatter<'_>, text: &str, column: &ColumnDescriptor) -> fmt::Result {
    // Text columns are 1/10 of their pixel width wide
    let width = usize::from(column.min_width / 10);
    match column.align {
        Align::Left => write!(f, "{text:<width$}"),
        Align::Center => write!(f, "{text:^width$}"),
        Align::Right => write!(f, "{text:>width$}"),
    }
}

impl fmt::Display for TableView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { message } => writeln!(f, "{message}"),
            Self::Table {
                columns,
                rows,
                footer,
            } => {
                for (i, column) in columns.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    cell(f, column.label, column)?;
                }
                writeln!(f)?;

                for row in rows {
                    let checkbox = if row.checked { "[x]" } else { "[ ]" };
                    let title = if row.struck_through {
                        format!("~~{}~~", row.title)
                    } else {
                        row.title.clone()
                    };
                    let texts = [checkbox, title.as_str(), row.description.as_str(), "..."];
                    for (i, (text, column)) in texts.iter().zip(columns).enumerate() {
                        if i > 0 {
                            f.write_str(" | ")?;
                        }
                        cell(f, text, column)?;
                    }
                    writeln!(f)?;
                }

                write!(
                    f,
                    "{}-{} of {}  (page {}, {} per page",
                    footer.from,
                    footer.to,
                    footer.total_count,
                    u64::from(footer.page_index.get()) + 1,
                    footer.page_size,
                )?;
                if !footer.page_size_options.is_empty() {
                    let options: Vec<String> =
                        footer.page_size_options.iter().map(ToString::to_string).collect();
                    write!(f, "; options {}", options.join("/"))?;
                }
                let back = if footer.can_go_back { "<" } else { " " };
                let forward = if footer.can_go_forward { ">" } else { " " };
                writeln!(f, ")  {back} {forward}")
            },
        }
    }
}
