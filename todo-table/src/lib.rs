//! Paginated todo table with inline completion toggling.
//!
//! The table renders one page of todo items delivered by a
//! [`TodoDataSource`](data_source::TodoDataSource), forwards page and
//! page-size changes to it as page requests, and forwards checkbox toggles
//! as updated items. The data source does the fetching and persisting; the
//! table is a small state machine over whatever snapshot it was last given.
//!
//! - [`types`]: items, pages, filters, table state and actions
//! - [`reducer`]: the pagination and toggle state machine
//! - [`view`]: projection of the state into rows and a pagination footer
//! - [`columns`]: the fixed column schema
//! - [`data_source`]: the data source trait plus HTTP and in-memory sources
//! - [`config`]: environment-driven configuration
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use todo_table::config::TableConfig;
//! use todo_table::data_source::InMemoryDataSource;
//! use todo_table::{render, TodoTableAction, TodoTableEnvironment, TodoTableReducer, TodoTableState};
//! use todo_table_runtime::Store;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TableConfig::default();
//! let env = TodoTableEnvironment::new(Arc::new(InMemoryDataSource::new()), config.clone());
//! let state = TodoTableState::mount(Default::default(), Default::default(), config.default_page_size);
//! let store = Store::new(state, TodoTableReducer::new(), env);
//!
//! // Fetch the first page and wait for it to arrive
//! let mut handle = store.send(TodoTableAction::Refresh).await?;
//! handle.wait().await;
//!
//! let view = store.state(|s| render(s, &config)).await;
//! println!("{view}");
//! # Ok(())
//! # }
//! ```

pub mod columns;
pub mod config;
pub mod data_source;
pub mod reducer;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use reducer::{TodoTableEnvironment, TodoTableReducer};
pub use types::{Filter, TodoId, TodoItem, TodoPage, TodoTableAction, TodoTableState};
pub use view::{render, TableView};
