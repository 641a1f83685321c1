//! Declarative macros for ergonomic effect construction
//!
//! These macros reduce boilerplate when reducers hand work to the runtime.

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use todo_table_core::async_effect;
///
/// async_effect! {
///     let page = source.load_todos(page_number, filter).await.ok()?;
///     Some(TodoTableAction::SnapshotDelivered { page, filter })
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::Effect;

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        Loaded { page: u32 },
    }

    #[test]
    fn test_async_effect_macro() {
        let effect = async_effect! {
            Some(TestAction::Loaded { page: 2 })
        };

        assert!(matches!(effect, Effect::Future(_)));
    }

    #[test]
    fn test_async_effect_captures_by_move() {
        let page = 7;
        let effect = async_effect! {
            Some(TestAction::Loaded { page })
        };

        let Effect::Future(fut) = effect else {
            unreachable!("async_effect! always builds a future");
        };
        // Poll without a runtime: the block has no await points
        let waker = std::task::Waker::noop();
        let mut cx = std::task::Context::from_waker(waker);
        let mut fut = fut;
        assert_eq!(
            fut.as_mut().poll(&mut cx),
            std::task::Poll::Ready(Some(TestAction::Loaded { page: 7 }))
        );
    }
}
