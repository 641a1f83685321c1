//! Command-line demo of the todo table.
//!
//! Reads settings from the environment and an optional `.env` file. Uses
//! the HTTP data source when `TODO_API_URL` is set and a seeded in-memory
//! source otherwise, then walks through a few interactions and prints the
//! rendered table after each one.

use anyhow::Context;
use std::sync::Arc;
use todo_table::config::{AppConfig, TableConfig};
use todo_table::data_source::{HttpDataSource, InMemoryDataSource, TodoDataSource};
use todo_table::{render, TodoId, TodoItem, TodoTableAction, TodoTableEnvironment, TodoTableReducer, TodoTableState};
use todo_table_core::paging::PageSize;
use todo_table_runtime::{Store, StoreConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

type TableStore = Store<TodoTableState, TodoTableAction, TodoTableEnvironment, TodoTableReducer>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load();
    init_tracing(&config.log_level);

    let (data_source, in_memory) = select_data_source(&config)?;
    let env = TodoTableEnvironment::new(data_source, config.table.clone());
    let state = TodoTableState::mount(
        todo_table::TodoPage::default(),
        todo_table::Filter::default(),
        config.table.default_page_size,
    );
    let store = Store::with_config(
        state,
        TodoTableReducer::new(),
        env,
        StoreConfig::default().with_shutdown_timeout(config.shutdown_timeout),
    );

    step(&store, &config.table, "Initial fetch", TodoTableAction::Refresh).await?;
    step(&store, &config.table, "Next page", TodoTableAction::NextPage).await?;

    if let Some(id) = store.state(|s| s.items().first().map(|item| item.id)).await {
        step(
            &store,
            &config.table,
            &format!("Toggle todo {id}"),
            TodoTableAction::ToggleCompletion { id },
        )
        .await?;
    }

    let size = match config.table.page_size_options.first() {
        Some(size) => *size,
        None => PageSize::new(5)?,
    };
    // The source decides how many rows a page holds
    match &in_memory {
        Some(source) => source.set_page_size(size),
        None => tracing::info!(
            page_size = size.get(),
            "Page size is chosen by the remote API, rows per page may not change"
        ),
    }
    step(
        &store,
        &config.table,
        &format!("{size} rows per page"),
        TodoTableAction::ChangePageSize { size },
    )
    .await?;

    store
        .shutdown_gracefully()
        .await
        .context("Store did not shut down cleanly")?;

    Ok(())
}

/// Send one action, wait for the data source round trip and print the table.
async fn step(
    store: &TableStore,
    table: &TableConfig,
    title: &str,
    action: TodoTableAction,
) -> anyhow::Result<()> {
    tracing::info!(step = title, "Sending action");

    let mut handle = store.send(action).await?;
    handle.wait().await;

    let view = store.state(|s| render(s, table)).await;
    println!("=== {title} ===\n{view}");
    Ok(())
}

/// The chosen source, plus a handle on it when it is the in-memory one.
fn select_data_source(
    config: &AppConfig,
) -> anyhow::Result<(Arc<dyn TodoDataSource>, Option<InMemoryDataSource>)> {
    if let Some(source) = HttpDataSource::from_config(&config.data_source)? {
        tracing::info!(base_url = source.base_url(), "Using HTTP data source");
        return Ok((Arc::new(source), None));
    }

    tracing::info!("TODO_API_URL not set, using in-memory data source");
    let source =
        InMemoryDataSource::seeded(demo_items()).with_page_size(config.table.default_page_size);
    Ok((Arc::new(source.clone()), Some(source)))
}

fn demo_items() -> Vec<TodoItem> {
    const TITLES: [(&str, &str); 6] = [
        ("Buy milk", "Semi-skimmed, 2 litres"),
        ("Write report", "Quarterly numbers"),
        ("Call plumber", "Kitchen sink leaks"),
        ("Book flights", "Lisbon in May"),
        ("Water plants", ""),
        ("Renew passport", "Expires in August"),
    ];

    (1..=23u64)
        .zip(TITLES.iter().cycle())
        .map(|(n, (title, description))| {
            let mut item = TodoItem::new(TodoId::new(n), format!("{title} #{n}"), *description);
            item.is_completed = n % 3 == 0;
            item
        })
        .collect()
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
