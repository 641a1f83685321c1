//! Configuration management for the todo table.
//!
//! Loads configuration from environment variables, optionally seeded from a
//! `.env` file, with sensible defaults. Invalid values fall back to the
//! default instead of failing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::time::Duration;
use todo_table_core::paging::PageSize;

/// Whether the selected page index follows page numbers reported by the data source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageIndexSync {
    /// Every delivered snapshot resets the index to `current_page - 1`
    #[default]
    Reconcile,
    /// The index is derived once at mount and then only follows user input
    MountOnly,
}

impl PageIndexSync {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reconcile" => Some(Self::Reconcile),
            "mount-only" | "mount_only" => Some(Self::MountOnly),
            _ => None,
        }
    }
}

/// Presentation and paging behaviour of the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Rows per page at mount
    pub default_page_size: PageSize,
    /// Values offered by the page-size control (empty by default)
    pub page_size_options: Vec<PageSize>,
    /// Message shown instead of the table when there are no items
    pub empty_message: String,
    /// Page index reconciliation policy
    pub page_index_sync: PageIndexSync,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            default_page_size: PageSize::DEFAULT,
            page_size_options: Vec::new(),
            empty_message: "No todos available".to_string(),
            page_index_sync: PageIndexSync::Reconcile,
        }
    }
}

/// Data source configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceConfig {
    /// Base URL of the todo REST API; `None` selects the in-memory source
    pub api_url: Option<String>,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Table behaviour
    pub table: TableConfig,
    /// Data source selection
    pub data_source: DataSourceConfig,
    /// Log filter (trace, debug, info, warn, error or a full directive)
    pub log_level: String,
    /// Graceful shutdown timeout
    pub shutdown_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            table: TableConfig::default(),
            data_source: DataSourceConfig::default(),
            log_level: "todo_table=info,todo_table_runtime=info".to_string(),
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

impl AppConfig {
    /// Load a `.env` file from the working directory, if there is one, then
    /// read the environment.
    ///
    /// Variables already set in the process environment are not overridden
    /// by the file.
    #[must_use]
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_env()
    }

    /// Load configuration from a dotenv file without touching the process
    /// environment. Variables set in the environment still take precedence.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains a malformed line.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, dotenvy::Error> {
        let mut file_vars = HashMap::new();
        for entry in dotenvy::from_path_iter(path)? {
            let (key, value) = entry?;
            file_vars.insert(key, value);
        }

        Ok(Self::from_lookup(|key| {
            env::var(key).ok().or_else(|| file_vars.get(key).cloned())
        }))
    }

    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// `from_env` is this with `std::env::var`; tests pass a map instead.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let default_page_size = lookup("TODO_TABLE_PAGE_SIZE")
            .and_then(|s| s.trim().parse::<u32>().ok())
            .and_then(|n| PageSize::new(n).ok())
            .unwrap_or(defaults.table.default_page_size);

        let page_size_options = lookup("TODO_TABLE_PAGE_SIZE_OPTIONS")
            .map(|s| {
                s.split(',')
                    .filter_map(|part| part.trim().parse::<u32>().ok())
                    .filter_map(|n| PageSize::new(n).ok())
                    .collect()
            })
            .unwrap_or(defaults.table.page_size_options);

        Self {
            table: TableConfig {
                default_page_size,
                page_size_options,
                empty_message: lookup("TODO_TABLE_EMPTY_MESSAGE")
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or(defaults.table.empty_message),
                page_index_sync: lookup("TODO_TABLE_PAGE_SYNC")
                    .and_then(|s| PageIndexSync::parse(&s))
                    .unwrap_or(defaults.table.page_index_sync),
            },
            data_source: DataSourceConfig {
                api_url: lookup("TODO_API_URL")
                    .map(|s| s.trim().trim_end_matches('/').to_string())
                    .filter(|s| !s.is_empty()),
                request_timeout: lookup("TODO_API_TIMEOUT_SECS")
                    .and_then(|s| s.trim().parse().ok())
                    .map_or(defaults.data_source.request_timeout, Duration::from_secs),
            },
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            shutdown_timeout: lookup("SHUTDOWN_TIMEOUT")
                .and_then(|s| s.trim().parse().ok())
                .map_or(defaults.shutdown_timeout, Duration::from_secs),
        }
    }
}
