mod trace;

use std::ops::{Deref, DerefMut};

#[doc(hidden)]
pub use tracing as __tracing;

/// Automatically calls a deferred function when the returned handle is dropped.
pub fn defer<T, F: FnOnce(&mut T)>(
    thing: &mut T,
    deferred: F,
) -> impl DerefMut<Target = T> {
    struct DeferHandle<'a, T, F: FnOnce(&mut T)> {
        thing: &'a mut T,
        deferred: Option<F>,
    }

    impl<'a, T, F: FnOnce(&mut T)> Drop for DeferHandle<'a, T, F> {
        fn drop(&mut self) {
            if let Some(deferred) = self.deferred.take() {
                deferred(self.thing);
            }
        }
    }

    impl<T, F: FnOnce(&mut T)> Deref for DeferHandle<'_, T, F> {
        type Target = T;

        fn deref(&self) -> &Self::Target {
            self.thing
        }
    }

    impl<T, F: FnOnce(&mut T)> DerefMut for DeferHandle<'_, T, F> {
        fn deref_mut(&mut self) -> &mut Self::Target {
            self.thing
        }
    }

    DeferHandle {
        thing,
        deferred: Some(deferred),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defer_runs_on_drop() {
        let mut scopes = vec![1];
        {
            let mut guard = defer(&mut scopes, |s| {
                s.pop();
            });
            guard.push(2);
            assert_eq!(guard.len(), 2);
        }
        assert_eq!(scopes, vec![1]);
    }
}
