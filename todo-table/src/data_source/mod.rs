//! The data source the todo table reads from and writes through.
//!
//! The table never fetches or persists anything itself. It asks a
//! [`TodoDataSource`] for pages and hands it toggled items; what the source
//! answers is fed back to the table as a new snapshot.
//!
//! # Implementations
//!
//! - [`HttpDataSource`]: talks to the todo REST API
//! - [`InMemoryDataSource`]: seeded `Vec`, used by the demo and in tests

use crate::types::{Filter, TodoId, TodoItem, TodoPage};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;
use todo_table_core::paging::PageNumber;

mod http;
mod memory;

pub use http::HttpDataSource;
pub use memory::{DataSourceCall, InMemoryDataSource};

/// Boxed future returned by [`TodoDataSource`] methods
pub type DataSourceFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, DataSourceError>> + Send + 'a>>;

/// Errors that can occur while talking to a data source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataSourceError {
    /// The request never produced a response
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The response body could not be decoded
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// The item does not exist (any more)
    #[error("Todo {0} not found")]
    NotFound(TodoId),

    /// The API answered with an error status
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Body returned by the API
        message: String,
    },

    /// The source cannot serve requests right now
    #[error("Data source unavailable: {0}")]
    Unavailable(String),
}

/// Fetch, update and paging capability consumed by the todo table.
///
/// Uses explicit `Pin<Box<dyn Future>>` returns so the source can be shared
/// as `Arc<dyn TodoDataSource>` and captured by effects.
pub trait TodoDataSource: Send + Sync {
    /// Load one page of todos matching `filter`.
    ///
    /// # Errors
    ///
    /// Any [`DataSourceError`]; the table logs it and keeps its last snapshot.
    fn load_todos(&self, page: PageNumber, filter: Filter) -> DataSourceFuture<'_, TodoPage>;

    /// Store an updated item and return it as stored.
    ///
    /// # Errors
    ///
    /// Any [`DataSourceError`]; [`DataSourceError::NotFound`] when the item is gone.
    fn update_todo(&self, item: TodoItem) -> DataSourceFuture<'_, TodoItem>;
}

/// Record the outcome of one data source call.
fn record_request<T>(operation: &'static str, result: &Result<T, DataSourceError>) {
    let outcome = if result.is_ok() { "ok" } else { "error" };
    metrics::counter!(
        "todo_table.data_source.requests",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}
