//! Shared listener handles.
//!
//! A [`Listener`] wraps a callback in an `Arc` so the same handle can be
//! kept by the subscriber and stored in the registry. Unsubscribing compares
//! handles by identity, the same way a delegate is matched by reference.

use crate::events::event::Event;
use std::fmt;
use std::sync::Arc;

type ListenerFn<T> = dyn Fn(T) + Send + Sync;

/// Callback subscribed to the event kind `T`.
///
/// Cloning a listener clones the handle, not the closure: all clones compare
/// equal and any of them can be used to unsubscribe. Two listeners built from
/// separate closures are never equal, even if the closures are identical.
pub struct Listener<T: Event> {
    callback: Arc<ListenerFn<T>>,
}

impl<T: Event> Listener<T> {
    /// Wrap a closure into a listener handle.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Invoke the callback with `event`.
    pub fn call(&self, event: T) {
        (self.callback)(event)
    }

    /// Returns `true` if both handles point to the same callback.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.callback, &other.callback)
    }
}

impl<T: Event> Clone for Listener<T> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<T: Event> PartialEq for Listener<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T: Event> Eq for Listener<T> {}

impl<T: Event> fmt::Debug for Listener<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("event", &std::any::type_name::<T>())
            .field("callback", &Arc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};

    #[derive(Debug, Clone, Copy)]
    struct Damage(i32);

    #[test]
    fn call_forwards_payload() {
        let total = Arc::new(AtomicI32::new(0));
        let sink = total.clone();
        let listener = Listener::new(move |d: Damage| {
            sink.fetch_add(d.0, Ordering::SeqCst);
        });

        listener.call(Damage(3));
        listener.call(Damage(4));
        assert_eq!(total.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn clones_are_equal() {
        let listener = Listener::new(|_: Damage| {});
        let copy = listener.clone();
        assert_eq!(listener, copy);
        assert!(listener.ptr_eq(&copy));
    }

    #[test]
    fn separate_closures_are_not_equal() {
        let a = Listener::new(|_: Damage| {});
        let b = Listener::new(|_: Damage| {});
        assert_ne!(a, b);
    }
}
