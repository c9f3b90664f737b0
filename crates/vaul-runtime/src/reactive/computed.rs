#![forbid(unsafe_code)]

//! Lazily evaluated, memoized derivations.
//!
//! A [`Computed`] watches its source observables and only marks itself
//! dirty when they change; the derivation runs on the next `get()`.
//!
//! Derivations may also read state that is not observable (for example a
//! host-tree query). Call [`Computed::invalidate`] when such state changes.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::observable::{Observable, Subscription};

struct Inner<T> {
    compute: Box<dyn Fn() -> T>,
    cached: RefCell<Option<T>>,
    dirty: Rc<Cell<bool>>,
    evaluations: Cell<u64>,
    _sources: Vec<Subscription>,
}

/// Memoized value derived from observables.
///
/// Clones share the same cache.
pub struct Computed<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for Computed<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> Computed<T> {
    fn with_sources(
        compute: Box<dyn Fn() -> T>,
        subscribe: impl FnOnce(Rc<Cell<bool>>) -> Vec<Subscription>,
    ) -> Self {
        let dirty = Rc::new(Cell::new(true));
        let sources = subscribe(Rc::clone(&dirty));
        Self {
            inner: Rc::new(Inner {
                compute,
                cached: RefCell::new(None),
                dirty,
                evaluations: Cell::new(0),
                _sources: sources,
            }),
        }
    }

    /// Derive from a single observable.
    pub fn from_observable<S: Clone + PartialEq + 'static>(
        source: &Observable<S>,
        map: impl Fn(&S) -> T + 'static,
    ) -> Self {
        let src = source.clone();
        Self::with_sources(Box::new(move || src.with(|v| map(v))), |dirty| {
            vec![source.subscribe(move |_| dirty.set(true))]
        })
    }

    /// Derive from two observables.
    pub fn from2<S1, S2>(
        s1: &Observable<S1>,
        s2: &Observable<S2>,
        map: impl Fn(&S1, &S2) -> T + 'static,
    ) -> Self
    where
        S1: Clone + PartialEq + 'static,
        S2: Clone + PartialEq + 'static,
    {
        let src1 = s1.clone();
        let src2 = s2.clone();
        Self::with_sources(
            Box::new(move || src1.with(|a| src2.with(|b| map(a, b)))),
            |dirty| {
                let d1 = Rc::clone(&dirty);
                vec![
                    s1.subscribe(move |_| d1.set(true)),
                    s2.subscribe(move |_| dirty.set(true)),
                ]
            },
        )
    }

    /// Current value, recomputing if any source changed since the last call.
    #[must_use]
    pub fn get(&self) -> T {
        if !self.inner.dirty.get()
            && let Some(value) = self.inner.cached.borrow().as_ref()
        {
            return value.clone();
        }
        let value = (self.inner.compute)();
        self.inner.evaluations.set(self.inner.evaluations.get() + 1);
        *self.inner.cached.borrow_mut() = Some(value.clone());
        self.inner.dirty.set(false);
        value
    }

    /// Force recomputation on the next `get()`.
    pub fn invalidate(&self) {
        self.inner.dirty.set(true);
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.inner.dirty.get()
    }

    /// How many times the derivation has run.
    #[must_use]
    pub fn evaluations(&self) -> u64 {
        self.inner.evaluations.get()
    }
}

impl<T: fmt::Debug> fmt::Debug for Computed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Computed")
            .field("cached", &self.inner.cached.borrow())
            .field("dirty", &self.inner.dirty.get())
            .finish()
    }
}
