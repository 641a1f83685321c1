//! # Todo Table Testing
//!
//! Testing utilities and helpers for reducers built on `todo-table-core`.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness for a single reducer step
//! - [`assertions`]: Assertion helpers for effect lists
//! - [`effects`]: Drivers that run effect descriptions and collect the actions they produce
//! - [`tracing_init`]: Opt-in log output for tests
//!
//! ## Example
//!
//! ```ignore
//! use todo_table_testing::{assertions, ReducerTest};
//!
//! ReducerTest::new(TodoTableReducer::new())
//!     .with_env(test_environment())
//!     .given_state(mounted_state())
//!     .when_action(TodoTableAction::ChangePage { index: PageIndex::new(1) })
//!     .then_state(|state| assert_eq!(state.selected_page_index, PageIndex::new(1)))
//!     .then_effects(|effects| assertions::assert_effects_count(effects, 1))
//!     .run();
//! ```


/// Running effect descriptions outside the store
pub mod effects {
    use todo_table_core::effect::Effect;

    /// Await every effect in order and collect the actions they produce.
    ///
    /// Effects run one after another, so the result follows declaration
    /// order rather than completion order.
    pub async fn collect_actions<A: Send + 'static>(effects: Vec<Effect<A>>) -> Vec<A> {
        let mut actions = Vec::new();
        for effect in effects {
            if let Effect::Future(fut) = effect {
                actions.extend(fut.await);
            }
        }
        actions
    }

    /// Blocking variant of [`collect_actions`] for synchronous tests.
    ///
    /// Runs the effects on a fresh current-thread tokio runtime.
    pub fn block_on_actions<A: Send + 'static>(
        effects: impl IntoIterator<Item = Effect<A>>,
    ) -> Vec<A> {
        tokio_test::block_on(collect_actions(effects.into_iter().collect()))
    }
}

/// Log output for tests
pub mod tracing_init {
    use tracing_subscriber::EnvFilter;

    /// Install a test-writer subscriber honouring `RUST_LOG`.
    ///
    /// Safe to call from every test; only the first call installs anything.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use effects::{block_on_actions, collect_actions};
pub use reducer_test::{assertions, ReducerTest};
pub use tracing_init::init_test_tracing;
