//! Reducer logic for the todo table.
//!
//! The reducer owns the pagination state machine between the table and its
//! data source. Every intent that needs the data source produces exactly one
//! `Effect::Future`; what the source answers comes back as a delivery action.

use crate::config::{PageIndexSync, TableConfig};
use crate::data_source::TodoDataSource;
use crate::types::{Filter, TodoId, TodoTableAction, TodoTableState};
use std::sync::Arc;
use todo_table_core::paging::{PageIndex, PageNumber, PageSize};
use todo_table_core::{async_effect, effect::Effect, reducer::Reducer, smallvec, SmallVec};

/// Environment dependencies for the todo table reducer
#[derive(Clone)]
pub struct TodoTableEnvironment {
    /// Where pages come from and toggled items go to
    pub data_source: Arc<dyn TodoDataSource>,
    /// Table behaviour
    pub config: TableConfig,
}

impl TodoTableEnvironment {
    /// Creates a new `TodoTableEnvironment`
    #[must_use]
    pub fn new(data_source: Arc<dyn TodoDataSource>, config: TableConfig) -> Self {
        Self {
            data_source,
            config,
        }
    }
}

impl std::fmt::Debug for TodoTableEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoTableEnvironment")
            .field("data_source", &"<dyn TodoDataSource>")
            .field("config", &self.config)
            .finish()
    }
}

/// Reducer for the todo table
#[derive(Clone, Debug, Default)]
pub struct TodoTableReducer;

impl TodoTableReducer {
    /// Creates a new `TodoTableReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Selects `index` and requests the matching page
    fn change_page(
        state: &mut TodoTableState,
        index: PageIndex,
        env: &TodoTableEnvironment,
    ) -> SmallVec<[Effect<TodoTableAction>; 4]> {
        let Some(page) = index.to_page_number() else {
            tracing::warn!(index = %index, "Page index has no page number, ignoring");
            return SmallVec::new();
        };
        tracing::debug!(from = %state.selected_page_index, to = %index, "Changing page");
        state.selected_page_index = index;
        smallvec![Self::request_page(env, page, state.filter.clone())]
    }

    /// Effect loading `page` and delivering it as a snapshot.
    ///
    /// Failures are logged and produce no action, so the last snapshot stays.
    fn request_page(
        env: &TodoTableEnvironment,
        page: PageNumber,
        filter: Filter,
    ) -> Effect<TodoTableAction> {
        let source = Arc::clone(&env.data_source);
        async_effect! {
            match source.load_todos(page, filter.clone()).await {
                Ok(page) => Some(TodoTableAction::SnapshotDelivered { page, filter }),
                Err(error) => {
                    tracing::warn!(page = %page, error = %error, "Failed to load todos");
                    None
                }
            }
        }
    }

    /// Effect storing the toggled item and delivering it back
    fn toggle_completion(
        state: &TodoTableState,
        id: TodoId,
        env: &TodoTableEnvironment,
    ) -> SmallVec<[Effect<TodoTableAction>; 4]> {
        let Some(item) = state.page.get(id) else {
            tracing::debug!(id = %id, "Toggle for a row that is not on the current page");
            return SmallVec::new();
        };

        let toggled = item.with_completion_toggled();
        tracing::debug!(id = %id, is_completed = toggled.is_completed, "Toggling completion");

        let source = Arc::clone(&env.data_source);
        smallvec![async_effect! {
            match source.update_todo(toggled).await {
                Ok(item) => Some(TodoTableAction::TodoUpdated { item }),
                Err(error) => {
                    tracing::warn!(id = %id, error = %error, "Failed to update todo");
                    None
                }
            }
        }]
    }

    fn change_page_size(
        state: &mut TodoTableState,
        size: PageSize,
        env: &TodoTableEnvironment,
    ) -> SmallVec<[Effect<TodoTableAction>; 4]> {
        tracing::debug!(from = %state.selected_page_size, to = %size, "Changing page size");
        state.selected_page_size = size;
        state.selected_page_index = PageIndex::FIRST;
        smallvec![Self::request_page(env, PageNumber::FIRST, state.filter.clone())]
    }
}

impl Reducer for TodoTableReducer {
    type State = TodoTableState;
    type Action = TodoTableAction;
    type Environment = TodoTableEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== User intents ==========
            TodoTableAction::ChangePage { index } => Self::change_page(state, index, env),

            TodoTableAction::NextPage => {
                if !state.can_go_forward() {
                    return SmallVec::new();
                }
                let next = state.selected_page_index.next();
                Self::change_page(state, next, env)
            },

            TodoTableAction::PreviousPage => match state.selected_page_index.previous() {
                Some(previous) => Self::change_page(state, previous, env),
                None => SmallVec::new(),
            },

            TodoTableAction::ChangePageSize { size } => Self::change_page_size(state, size, env),

            TodoTableAction::ToggleCompletion { id } => Self::toggle_completion(state, id, env),

            TodoTableAction::Refresh => {
                let Some(page) = state.selected_page_index.to_page_number() else {
                    tracing::warn!(
                        index = %state.selected_page_index,
                        "Page index has no page number, not refreshing"
                    );
                    return SmallVec::new();
                };
                tracing::debug!(page = %page, "Refreshing");
                smallvec![Self::request_page(env, page, state.filter.clone())]
            },

            // ========== Data source deliveries ==========
            TodoTableAction::SnapshotDelivered { page, filter } => {
                tracing::debug!(
                    current_page = %page.meta.current_page,
                    total_count = page.meta.total_count,
                    items = page.items.len(),
                    "Snapshot delivered"
                );
                if env.config.page_index_sync == PageIndexSync::Reconcile {
                    state.selected_page_index = page.meta.current_page.to_index();
                }
                state.page = page;
                state.filter = filter;
                SmallVec::new()
            },

            TodoTableAction::TodoUpdated { item } => {
                match state.page.items.iter_mut().find(|row| row.id == item.id) {
                    Some(row) => {
                        tracing::debug!(id = %item.id, "Row updated");
                        *row = item;
                    },
                    None => tracing::debug!(id = %item.id, "Updated item is not on the current page"),
                }
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use crate::data_source::{DataSourceCall, InMemoryDataSource};
    use crate::types::{TodoItem, TodoPage};
    use todo_table_core::paging::PageMeta;
    use todo_table_testing::{assertions, ReducerTest};

    fn items(range: std::ops::RangeInclusive<u64>) -> Vec<TodoItem> {
        range
            .map(|n| TodoItem::new(TodoId::new(n), format!("Todo {n}"), format!("Description {n}")))
            .collect()
    }

    fn page_number(n: u32) -> PageNumber {
        PageNumber::new(n).unwrap()
    }

    fn environment(source: &InMemoryDataSource) -> TodoTableEnvironment {
        TodoTableEnvironment::new(Arc::new(source.clone()), TableConfig::default())
    }

    fn mount_only_environment(source: &InMemoryDataSource) -> TodoTableEnvironment {
        TodoTableEnvironment::new(
            Arc::new(source.clone()),
            TableConfig {
                page_index_sync: PageIndexSync::MountOnly,
                ..TableConfig::default()
            },
        )
    }

    /// Table mounted on page 3 of 25 items, 10 per page
    fn mounted(filter: Filter) -> TodoTableState {
        TodoTableState::mount(
            TodoPage::new(items(21..=25), PageMeta::new(page_number(3), 25)),
            filter,
            PageSize::DEFAULT,
        )
    }

    fn first_page_state() -> TodoTableState {
        TodoTableState::mount(
            TodoPage::new(items(1..=10), PageMeta::new(PageNumber::FIRST, 25)),
            Filter::new(),
            PageSize::DEFAULT,
        )
    }

    #[test]
    fn change_page_requests_index_plus_one_with_filter() {
        let source = InMemoryDataSource::seeded(items(1..=25));
        let journal = source.clone();
        let filter = Filter::new().with("search", "todo");

        ReducerTest::new(TodoTableReducer::new())
            .with_env(environment(&source))
            .given_state(mounted(filter.clone()))
            .when_action(TodoTableAction::ChangePage {
                index: PageIndex::new(1),
            })
            .then_state(|state| {
                assert_eq!(state.selected_page_index, PageIndex::new(1));
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .then_actions(move |actions| {
                assert_eq!(
                    journal.calls(),
                    vec![DataSourceCall::LoadTodos {
                        page: page_number(2),
                        filter,
                    }]
                );
                assert!(matches!(
                    actions,
                    [TodoTableAction::SnapshotDelivered { page, .. }]
                        if page.meta.current_page == page_number(2)
                ));
            })
            .run();
    }

    #[test]
    fn change_page_size_resets_to_first_page() {
        let source = InMemoryDataSource::seeded(items(1..=25));
        let journal = source.clone();
        let filter = Filter::new().with("status", "active");
        let size = PageSize::new(25).unwrap();

        ReducerTest::new(TodoTableReducer::new())
            .with_env(environment(&source))
            .given_state(mounted(filter.clone()))
            .when_action(TodoTableAction::ChangePageSize { size })
            .then_state(move |state| {
                assert_eq!(state.selected_page_size, size);
                assert_eq!(state.selected_page_index, PageIndex::FIRST);
            })
            .then_effects(|effects| assertions::assert_effects_count(effects, 1))
            .then_actions(move |_| {
                assert_eq!(
                    journal.calls(),
                    vec![DataSourceCall::LoadTodos {
                        page: PageNumber::FIRST,
                        filter,
                    }]
                );
            })
            .run();
    }

    #[test]
    fn toggle_sends_flipped_copy_once() {
        let source = InMemoryDataSource::seeded(items(1..=25));
        let journal = source.clone();
        let mut expected = items(22..=22).remove(0);
        expected.is_completed = true;
        let delivered = expected.clone();

        ReducerTest::new(TodoTableReducer::new())
            .with_env(environment(&source))
            .given_state(mounted(Filter::new()))
            .when_action(TodoTableAction::ToggleCompletion {
                id: TodoId::new(22),
            })
            .then_state(|state| {
                // The row only changes once the data source answers
                assert!(!state.page.get(TodoId::new(22)).unwrap().is_completed);
            })
            .then_effects(|effects| assertions::assert_effects_count(effects, 1))
            .then_actions(move |actions| {
                assert_eq!(
                    journal.calls(),
                    vec![DataSourceCall::UpdateTodo { item: expected }]
                );
                assert_eq!(actions, [TodoTableAction::TodoUpdated { item: delivered }]);
            })
            .run();
    }

    #[test]
    fn toggle_of_unknown_row_does_nothing() {
        let source = InMemoryDataSource::seeded(items(1..=25));

        ReducerTest::new(TodoTableReducer::new())
            .with_env(environment(&source))
            .given_state(mounted(Filter::new()))
            .when_action(TodoTableAction::ToggleCompletion { id: TodoId::new(1) })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn next_page_is_a_no_op_on_last_page() {
        let source = InMemoryDataSource::new();

        ReducerTest::new(TodoTableReducer::new())
            .with_env(environment(&source))
            .given_state(mounted(Filter::new()))
            .when_action(TodoTableAction::NextPage)
            .then_state(|state| assert_eq!(state.selected_page_index, PageIndex::new(2)))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn change_page_beyond_last_page_number_is_ignored() {
        let source = InMemoryDataSource::seeded(items(1..=25));
        let journal = source.clone();

        ReducerTest::new(TodoTableReducer::new())
            .with_env(environment(&source))
            .given_state(mounted(Filter::new()))
            .when_action(TodoTableAction::ChangePage {
                index: PageIndex::new(u32::MAX),
            })
            .then_state(|state| assert_eq!(state.selected_page_index, PageIndex::new(2)))
            .then_effects(assertions::assert_no_effects)
            .then_actions(move |_| assert!(journal.calls().is_empty()))
            .run();
    }

    #[test]
    fn next_page_advances() {
        let source = InMemoryDataSource::seeded(items(1..=25));
        let journal = source.clone();

        ReducerTest::new(TodoTableReducer::new())
            .with_env(environment(&source))
            .given_state(first_page_state())
            .when_action(TodoTableAction::NextPage)
            .then_state(|state| assert_eq!(state.selected_page_index, PageIndex::new(1)))
            .then_actions(move |_| {
                assert_eq!(
                    journal.calls(),
                    vec![DataSourceCall::LoadTodos {
                        page: page_number(2),
                        filter: Filter::new(),
                    }]
                );
            })
            .run();
    }

    #[test]
    fn previous_page_is_a_no_op_on_first_page() {
        let source = InMemoryDataSource::new();

        ReducerTest::new(TodoTableReducer::new())
            .with_env(environment(&source))
            .given_state(first_page_state())
            .when_action(TodoTableAction::PreviousPage)
            .then_state(|state| assert_eq!(state.selected_page_index, PageIndex::FIRST))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn previous_page_goes_back() {
        let source = InMemoryDataSource::seeded(items(1..=25));

        ReducerTest::new(TodoTableReducer::new())
            .with_env(environment(&source))
            .given_state(mounted(Filter::new()))
            .when_action(TodoTableAction::PreviousPage)
            .then_state(|state| assert_eq!(state.selected_page_index, PageIndex::new(1)))
            .then_effects(|effects| assertions::assert_effects_count(effects, 1))
            .run();
    }

    #[test]
    fn refresh_requests_selected_page() {
        let source = InMemoryDataSource::seeded(items(1..=25));
        let journal = source.clone();

        ReducerTest::new(TodoTableReducer::new())
            .with_env(environment(&source))
            .given_state(mounted(Filter::new()))
            .when_action(TodoTableAction::Refresh)
            .then_actions(move |actions| {
                assert_eq!(
                    journal.calls(),
                    vec![DataSourceCall::LoadTodos {
                        page: page_number(3),
                        filter: Filter::new(),
                    }]
                );
                assert_eq!(actions.len(), 1);
            })
            .run();
    }

    #[test]
    fn failed_update_produces_no_action() {
        // Row 99 is on screen but the source no longer has it
        let source = InMemoryDataSource::new();
        let mut state = mounted(Filter::new());
        state.page.items.push(TodoItem::new(TodoId::new(99), "stale", ""));

        ReducerTest::new(TodoTableReducer::new())
            .with_env(environment(&source))
            .given_state(state)
            .when_action(TodoTableAction::ToggleCompletion { id: TodoId::new(99) })
            .then_effects(|effects| assertions::assert_effects_count(effects, 1))
            .then_actions(|actions| assert!(actions.is_empty()))
            .run();
    }

    #[test]
    fn snapshot_replaces_page_and_reconciles_index() {
        let source = InMemoryDataSource::new();
        let filter = Filter::new().with("status", "completed");
        let snapshot = TodoPage::new(items(1..=10), PageMeta::new(PageNumber::FIRST, 12));

        ReducerTest::new(TodoTableReducer::new())
            .with_env(environment(&source))
            .given_state(mounted(Filter::new()))
            .when_action(TodoTableAction::SnapshotDelivered {
                page: snapshot.clone(),
                filter: filter.clone(),
            })
            .then_state(move |state| {
                assert_eq!(state.page, snapshot);
                assert_eq!(state.filter, filter);
                assert_eq!(state.selected_page_index, PageIndex::FIRST);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn mount_only_keeps_index_on_snapshot() {
        let source = InMemoryDataSource::new();

        ReducerTest::new(TodoTableReducer::new())
            .with_env(mount_only_environment(&source))
            .given_state(mounted(Filter::new()))
            .when_action(TodoTableAction::SnapshotDelivered {
                page: TodoPage::new(items(1..=10), PageMeta::new(PageNumber::FIRST, 25)),
                filter: Filter::new(),
            })
            .then_state(|state| {
                assert_eq!(state.selected_page_index, PageIndex::new(2));
                assert_eq!(state.items().len(), 10);
            })
            .run();
    }

    #[test]
    fn todo_updated_swaps_matching_row_only() {
        let source = InMemoryDataSource::new();
        let mut updated = items(23..=23).remove(0);
        updated.is_completed = true;
        let expected = updated.clone();

        ReducerTest::new(TodoTableReducer::new())
            .with_env(environment(&source))
            .given_state(mounted(Filter::new()))
            .when_action(TodoTableAction::TodoUpdated { item: updated })
            .then_state(move |state| {
                let completed: Vec<_> = state
                    .items()
                    .iter()
                    .filter(|item| item.is_completed)
                    .collect();
                assert_eq!(completed, vec![&expected]);
                assert_eq!(state.items().len(), 5);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn todo_updated_for_other_page_is_ignored() {
        let source = InMemoryDataSource::new();
        let before = mounted(Filter::new());
        let expected = before.clone();

        ReducerTest::new(TodoTableReducer::new())
            .with_env(environment(&source))
            .given_state(before)
            .when_action(TodoTableAction::TodoUpdated {
                item: TodoItem::new(TodoId::new(3), "elsewhere", ""),
            })
            .then_state(move |state| assert_eq!(state, &expected))
            .run();
    }
}
