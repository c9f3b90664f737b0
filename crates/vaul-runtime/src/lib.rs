#![forbid(unsafe_code)]

//! Runtime services for the vaul drawer.
//!
//! - [`reactive`]: observable values, memoized derivations, and scoped
//!   subscriptions. The drawer's open/direction/dismissible state lives here
//!   and its side effects (surface attributes, background lock, handle
//!   placement) are subscriptions on it.
//! - [`deferred`]: zero-delay tasks postponed to the next event-loop turn.
//!   The host drains the queue once per turn.
//!
//! Everything is single-threaded (`Rc`, `RefCell`); no type here is `Send`.

pub mod deferred;
pub mod reactive;

pub use deferred::{DeferredQueue, TaskHandle};
pub use reactive::{Binding, BindingScope, Computed, Observable, Subscription};
