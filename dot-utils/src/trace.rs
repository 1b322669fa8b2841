//! Function-level tracing.
//!
//! `trace_fn!` opens a `TRACE` span that lasts until the end of the enclosing
//! scope, `trace_log!` emits a `TRACE` event inside whatever span is current.
//! Both are no-ops unless a subscriber enables the `TRACE` level.

/// Macro to insert tracing into functions.
#[macro_export]
macro_rules! trace_fn {
    ($name:expr) => {
        let _trace_guard = $crate::__tracing::trace_span!("fn", func = $name).entered();
    };
    ($name:expr, $($tt:tt)*) => {
        let _trace_guard = $crate::__tracing::trace_span!(
            "fn",
            func = $name,
            detail = %format_args!($($tt)*)
        )
        .entered();
    };
}

#[macro_export]
macro_rules! trace_log {
    ($($tt:tt)*) => {
        $crate::__tracing::trace!($($tt)*)
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn macros_expand_without_subscriber() {
        fn traced(n: usize) -> usize {
            crate::trace_fn!("traced", "n = {}", n);
            crate::trace_log!("inside traced with {}", n);
            n * 2
        }

        assert_eq!(traced(21), 42);
    }
}
