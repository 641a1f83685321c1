//! In-memory data source
//!
//! Pages a seeded `Vec` of items and records every call it receives, so
//! tests can assert on exactly what the table asked for.

use super::{record_request, DataSourceError, DataSourceFuture, TodoDataSource};
use crate::types::{Filter, TodoItem, TodoPage};
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};
use todo_table_core::paging::{PageMeta, PageNumber, PageSize};

/// One call received by an [`InMemoryDataSource`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataSourceCall {
    /// `load_todos` was called
    LoadTodos {
        /// Requested page
        page: PageNumber,
        /// Filter passed along
        filter: Filter,
    },
    /// `update_todo` was called
    UpdateTodo {
        /// Item to store
        item: TodoItem,
    },
}

#[derive(Debug)]
struct Inner {
    items: Vec<TodoItem>,
    calls: Vec<DataSourceCall>,
    page_size: PageSize,
}

/// `Vec`-backed [`TodoDataSource`].
///
/// Understands two filter criteria:
/// - `status`: `completed` or `active`
/// - `search`: case-insensitive substring of title or description
///
/// Other criteria are ignored.
///
/// The page size lives on the source, like a real API's server-side
/// setting; [`set_page_size`](Self::set_page_size) changes it for every clone.
///
/// # Example
///
/// ```
/// use todo_table::data_source::{InMemoryDataSource, TodoDataSource};
/// use todo_table::types::{Filter, TodoId, TodoItem};
/// use todo_table_core::paging::PageNumber;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let source = InMemoryDataSource::seeded(vec![TodoItem::new(TodoId::new(1), "Buy milk", "")]);
///
/// let page = source.load_todos(PageNumber::FIRST, Filter::new()).await?;
/// assert_eq!(page.meta.total_count, 1);
/// assert_eq!(source.calls().len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct InMemoryDataSource {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryDataSource {
    /// Create an empty data source
    #[must_use]
    pub fn new() -> Self {
        Self::seeded(Vec::new())
    }

    /// Create a data source holding `items` in the given order
    #[must_use]
    pub fn seeded(items: Vec<TodoItem>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                items,
                calls: Vec::new(),
                page_size: PageSize::DEFAULT,
            })),
        }
    }

    /// Page with `page_size` rows instead of the default
    #[must_use]
    pub fn with_page_size(self, page_size: PageSize) -> Self {
        self.set_page_size(page_size);
        self
    }

    /// Rows per served page
    #[must_use]
    pub fn page_size(&self) -> PageSize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .page_size
    }

    /// Serve later pages with `page_size` rows
    pub fn set_page_size(&self, page_size: PageSize) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .page_size = page_size;
    }

    /// Every call received so far, oldest first
    #[must_use]
    pub fn calls(&self) -> Vec<DataSourceCall> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .calls
            .clone()
    }

    /// Forget recorded calls (items are kept)
    pub fn clear_calls(&self) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .calls
            .clear();
    }

    /// Snapshot of all stored items
    #[must_use]
    pub fn items(&self) -> Vec<TodoItem> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .items
            .clone()
    }

    fn lock(&self) -> Result<RwLockWriteGuard<'_, Inner>, DataSourceError> {
        self.inner
            .write()
            .map_err(|_| DataSourceError::Unavailable("store lock poisoned".to_string()))
    }

    fn page_of(&self, page: PageNumber, filter: Filter) -> Result<TodoPage, DataSourceError> {
        let mut inner = self.lock()?;
        inner.calls.push(DataSourceCall::LoadTodos {
            page,
            filter: filter.clone(),
        });

        let matching: Vec<&TodoItem> = inner
            .items
            .iter()
            .filter(|item| matches_filter(item, &filter))
            .collect();

        let size = usize::try_from(inner.page_size.get()).unwrap_or(usize::MAX);
        let skip = usize::try_from(page.get() - 1)
            .unwrap_or(usize::MAX)
            .saturating_mul(size);
        let items = matching.iter().skip(skip).take(size).map(|item| (*item).clone()).collect();
        let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);

        Ok(TodoPage::new(items, PageMeta::new(page, total)))
    }

    fn store(&self, item: TodoItem) -> Result<TodoItem, DataSourceError> {
        let mut inner = self.lock()?;
        inner.calls.push(DataSourceCall::UpdateTodo { item: item.clone() });

        let slot = inner
            .items
            .iter_mut()
            .find(|stored| stored.id == item.id)
            .ok_or(DataSourceError::NotFound(item.id))?;
        *slot = item.clone();

        Ok(item)
    }
}

impl Default for InMemoryDataSource {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_filter(item: &TodoItem, filter: &Filter) -> bool {
    let status_ok = match filter.get("status") {
        Some("completed") => item.is_completed,
        Some("active") => !item.is_completed,
        _ => true,
    };

    let search_ok = filter.get("search").is_none_or(|needle| {
        let needle = needle.to_lowercase();
        item.title.to_lowercase().contains(&needle)
            || item.description.to_lowercase().contains(&needle)
    });

    status_ok && search_ok
}

impl TodoDataSource for InMemoryDataSource {
    fn load_todos(&self, page: PageNumber, filter: Filter) -> DataSourceFuture<'_, TodoPage> {
        Box::pin(async move {
            let result = self.page_of(page, filter);
            record_request("load_todos", &result);
            result
        })
    }

    fn update_todo(&self, item: TodoItem) -> DataSourceFuture<'_, TodoItem> {
        Box::pin(async move {
            let result = self.store(item);
            record_request("update_todo", &result);
            result
        })
    }
}
