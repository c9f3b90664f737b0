#![forbid(unsafe_code)]

//! Single-threaded reactive state.
//!
//! - [`Observable`]: shared value that notifies subscribers when it changes.
//! - [`Subscription`]: unsubscribes on drop.
//! - [`Computed`]: memoized derivation of one or two observables,
//!   recomputed lazily after a source changes.
//! - [`Binding`]: uncached read-through view.
//! - [`BindingScope`]: all subscriptions of one attached component.
//!
//! Everything is `Rc`-based and `!Send`. Subscribers are held weakly and
//! pruned during notification, so a dropped [`Subscription`] never fires.
//!
//! # Invariants
//!
//! 1. Setting an equal value is a no-op: no version bump, no notification.
//! 2. Subscribers run in registration order, after the new value is stored,
//!    so a subscriber may read or write the observable it was notified by.
//! 3. `Computed::get()` never returns a value derived from stale sources.

pub mod binding;
pub mod computed;
pub mod observable;

pub use binding::{Binding, BindingScope, bind_mapped};
pub use computed::Computed;
pub use observable::{Observable, Subscription};
