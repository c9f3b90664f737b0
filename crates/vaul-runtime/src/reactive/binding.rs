#![forbid(unsafe_code)]

//! Read-through bindings and subscription scopes.
//!
//! A [`Binding<T>`] hands out a derived, read-only view of component state
//! without exposing the observable behind it. It re-evaluates on every
//! `get()`; use [`Computed`] when the derivation is worth caching.
//!
//! ```ignore
//! use vaul_runtime::reactive::{Observable, bind_mapped};
//!
//! let direction = Observable::new("bottom");
//! let vertical = bind_mapped(&direction, |d| matches!(*d, "top" | "bottom"));
//! assert!(vertical.get());
//!
//! direction.set("left");
//! assert!(!vertical.get());
//! ```
//!
//! [`Computed`]: super::Computed

use std::fmt;
use std::rc::Rc;

use super::observable::{Observable, Subscription};

/// Uncached derived value. Clones share the same source.
pub struct Binding<T> {
    eval: Rc<dyn Fn() -> T>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            eval: Rc::clone(&self.eval),
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Binding").field(&self.get()).finish()
    }
}

impl<T: 'static> Binding<T> {
    pub fn new(f: impl Fn() -> T + 'static) -> Self {
        Self { eval: Rc::new(f) }
    }

    #[must_use]
    pub fn get(&self) -> T {
        (self.eval)()
    }
}

/// `source` seen through `map`.
pub fn bind_mapped<S: Clone + PartialEq + 'static, T: 'static>(
    source: &Observable<S>,
    map: impl Fn(&S) -> T + 'static,
) -> Binding<T> {
    let source = source.clone();
    Binding::new(move || source.with(&map))
}

/// Owns the subscriptions of one attached component.
///
/// An attached drawer registers its effects here (open state, direction
/// mirroring, handle placement). Clearing or dropping the scope guarantees
/// none of them fires again; a cleared scope can be reused by the next
/// attach.
#[derive(Default)]
pub struct BindingScope {
    subscriptions: Vec<Subscription>,
}

impl BindingScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to `source` for as long as the scope holds.
    pub fn subscribe<T: Clone + PartialEq + 'static>(
        &mut self,
        source: &Observable<T>,
        callback: impl Fn(&T) + 'static,
    ) -> &mut Self {
        self.subscriptions.push(source.subscribe(callback));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }
}

impl fmt::Debug for BindingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingScope")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn mapped_binding_tracks_source() {
        let direction = Observable::new("bottom");
        let vertical = bind_mapped(&direction, |d| matches!(*d, "top" | "bottom"));
        assert!(vertical.get());

        direction.set("right");
        assert!(!vertical.get());
    }

    #[test]
    fn binding_is_uncached() {
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        let b = Binding::new(move || {
            c.set(c.get() + 1);
            c.get()
        });
        assert_eq!(b.get(), 1);
        assert_eq!(b.clone().get(), 2);
    }

    #[test]
    fn scope_clear_silences_effects() {
        let open = Observable::new(false);
        let locks = Rc::new(Cell::new(0));

        let mut scope = BindingScope::new();
        let l = Rc::clone(&locks);
        scope.subscribe(&open, move |v| {
            if *v {
                l.set(l.get() + 1);
            }
        });
        assert_eq!(scope.len(), 1);
        open.set(true);
        assert_eq!(locks.get(), 1);

        scope.clear();
        assert!(scope.is_empty());
        open.set(false);
        open.set(true);
        assert_eq!(locks.get(), 1);
    }

    #[test]
    fn dropped_scope_unsubscribes() {
        let open = Observable::new(false);
        let seen = Rc::new(Cell::new(false));
        {
            let mut scope = BindingScope::new();
            let s = Rc::clone(&seen);
            scope.subscribe(&open, move |v| s.set(*v));
            assert_eq!(open.subscriber_count(), 1);
        }
        open.set(true);
        assert!(!seen.get());
        assert_eq!(open.subscriber_count(), 0);
    }
}
