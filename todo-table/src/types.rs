//! Domain types for the todo table.
//!
//! The table owns very little: the latest snapshot the data source handed
//! it, the filter that snapshot was produced with, and two pieces of
//! transient UI state (selected page index and page size).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use todo_table_core::paging::{PageIndex, PageMeta, PageSize, page_count};

/// Unique identifier for a todo item
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    /// Creates a `TodoId` from its raw value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Unique identifier, stable across refetches
    pub id: TodoId,
    /// Short title
    pub title: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Whether the todo is completed
    pub is_completed: bool,
}

impl TodoItem {
    /// Creates a new, not yet completed, todo item
    #[must_use]
    pub fn new(id: TodoId, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            is_completed: false,
        }
    }

    /// Returns a copy with `is_completed` negated and every other field unchanged
    #[must_use]
    pub fn with_completion_toggled(&self) -> Self {
        Self {
            is_completed: !self.is_completed,
            ..self.clone()
        }
    }
}

/// Query criteria handed to the data source.
///
/// The table passes it through untouched; only data sources read its entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter(BTreeMap<String, String>);

impl Filter {
    /// An empty filter (no criteria)
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Adds or replaces one criterion
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Looks up one criterion
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Iterates criteria in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns `true` when there are no criteria
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One server-reported slice of todos plus pagination metadata
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPage {
    /// Items in data-source order
    #[serde(rename = "todos")]
    pub items: Vec<TodoItem>,
    /// Current page number and total count
    pub meta: PageMeta,
}

impl TodoPage {
    /// Creates a page
    #[must_use]
    pub const fn new(items: Vec<TodoItem>, meta: PageMeta) -> Self {
        Self { items, meta }
    }

    /// Returns `true` when the page holds no items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns an item on this page by ID
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

/// State of one mounted todo table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TodoTableState {
    /// Latest snapshot delivered by the data source
    pub page: TodoPage,
    /// Filter the snapshot was produced with
    pub filter: Filter,
    /// 0-based page index shown in the pagination controls
    pub selected_page_index: PageIndex,
    /// Rows per page shown in the pagination controls
    pub selected_page_size: PageSize,
}

impl TodoTableState {
    /// Mounts the table over an initial snapshot.
    ///
    /// The page index starts at the snapshot's `current_page - 1`.
    #[must_use]
    pub fn mount(page: TodoPage, filter: Filter, page_size: PageSize) -> Self {
        let selected_page_index = page.meta.current_page.to_index();
        Self {
            page,
            filter,
            selected_page_index,
            selected_page_size: page_size,
        }
    }

    /// Returns the items of the current page
    #[must_use]
    pub fn items(&self) -> &[TodoItem] {
        &self.page.items
    }

    /// Total number of items across all pages
    #[must_use]
    pub const fn total_count(&self) -> u64 {
        self.page.meta.total_count
    }

    /// Number of pages at the selected page size
    #[must_use]
    pub fn page_count(&self) -> u64 {
        page_count(self.page.meta.total_count, self.selected_page_size)
    }

    /// Whether a previous page exists
    #[must_use]
    pub const fn can_go_back(&self) -> bool {
        self.selected_page_index.get() > 0
    }

    /// Whether a next page exists
    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        u64::from(self.selected_page_index.get()) + 1 < self.page_count()
    }
}

/// Actions for the todo table
///
/// User intents come from the table's controls. Deliveries come from the
/// data source, either as the answer to an intent or pushed out of band.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TodoTableAction {
    // ========== User intents ==========
    /// The page-change control selected a 0-based page index
    ChangePage {
        /// Target page index
        index: PageIndex,
    },

    /// The "next page" button was pressed
    NextPage,

    /// The "previous page" button was pressed
    PreviousPage,

    /// The page-size control selected a value
    ChangePageSize {
        /// New rows per page
        size: PageSize,
    },

    /// A row's completion checkbox was toggled
    ToggleCompletion {
        /// Row whose checkbox changed
        id: TodoId,
    },

    /// Re-request the selected page
    Refresh,

    // ========== Data source deliveries ==========
    /// A new snapshot replaces the current one wholesale
    SnapshotDelivered {
        /// The delivered page
        page: TodoPage,
        /// The filter it was produced with
        filter: Filter,
    },

    /// The data source stored an updated item
    TodoUpdated {
        /// The item as stored
        item: TodoItem,
    },
}

impl TodoTableAction {
    /// Returns `true` for actions delivered by the data source
    #[must_use]
    pub const fn is_delivery(&self) -> bool {
        matches!(
            self,
            Self::SnapshotDelivered { .. } | Self::TodoUpdated { .. }
        )
    }
}
