//! Data source backed by the todo REST API

use super::{record_request, DataSourceError, DataSourceFuture, TodoDataSource};
use crate::config::DataSourceConfig;
use crate::types::{Filter, TodoItem, TodoPage};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use todo_table_core::paging::PageNumber;

/// Todo REST API client
///
/// - `GET {base}/todos?page={n}&{filter...}` answers a [`TodoPage`]
/// - `PATCH {base}/todos/{id}` with the item as JSON answers the stored item
#[derive(Clone, Debug)]
pub struct HttpDataSource {
    client: Client,
    base_url: String,
}

impl HttpDataSource {
    /// Create a client for the API rooted at `base_url`
    ///
    /// # Errors
    ///
    /// Returns [`DataSourceError::Unavailable`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DataSourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DataSourceError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from configuration, or `None` when no API URL is configured
    ///
    /// # Errors
    ///
    /// Returns [`DataSourceError::Unavailable`] if the HTTP client cannot be built.
    pub fn from_config(config: &DataSourceConfig) -> Result<Option<Self>, DataSourceError> {
        config
            .api_url
            .as_deref()
            .map(|url| Self::new(url, config.request_timeout))
            .transpose()
    }

    /// The API root this client talks to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_page(&self, page: PageNumber, filter: Filter) -> Result<TodoPage, DataSourceError> {
        // The page number is ours; a filter criterion must not override it
        let criteria: Vec<(&str, &str)> = filter.iter().filter(|(key, _)| *key != "page").collect();

        tracing::debug!(page = %page, criteria = criteria.len(), "GET todos");

        let response = self
            .client
            .get(format!("{}/todos", self.base_url))
            .query(&[("page", page.get())])
            .query(&criteria)
            .send()
            .await
            .map_err(|e| DataSourceError::RequestFailed(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .json::<TodoPage>()
                .await
                .map_err(|e| DataSourceError::ResponseParseFailed(e.to_string())),
            status => Err(api_error(status, response).await),
        }
    }

    async fn patch_todo(&self, item: TodoItem) -> Result<TodoItem, DataSourceError> {
        tracing::debug!(id = %item.id, is_completed = item.is_completed, "PATCH todo");

        let response = self
            .client
            .patch(format!("{}/todos/{}", self.base_url, item.id))
            .json(&item)
            .send()
            .await
            .map_err(|e| DataSourceError::RequestFailed(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .json::<TodoItem>()
                .await
                .map_err(|e| DataSourceError::ResponseParseFailed(e.to_string())),
            StatusCode::NOT_FOUND => Err(DataSourceError::NotFound(item.id)),
            status => Err(api_error(status, response).await),
        }
    }
}

async fn api_error(status: StatusCode, response: Response) -> DataSourceError {
    let message = response.text().await.unwrap_or_default();
    DataSourceError::Api {
        status: status.as_u16(),
        message,
    }
}

impl TodoDataSource for HttpDataSource {
    fn load_todos(&self, page: PageNumber, filter: Filter) -> DataSourceFuture<'_, TodoPage> {
        Box::pin(async move {
            let result = self.fetch_page(page, filter).await;
            record_request("load_todos", &result);
            result
        })
    }

    fn update_todo(&self, item: TodoItem) -> DataSourceFuture<'_, TodoItem> {
        Box::pin(async move {
            let result = self.patch_todo(item).await;
            record_request("update_todo", &result);
            result
        })
    }
}
