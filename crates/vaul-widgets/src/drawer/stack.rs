#![forbid(unsafe_code)]

//! Keyboard dispatch across open drawers.
//!
//! Escape is captured once for the whole page and routed to the drawer that
//! opened most recently. Lower drawers never see it, so one press closes one
//! drawer.
//!
//! # Invariants
//!
//! - Entries are ordered by open time: the last entry is on top.
//! - Only the top live entry receives Escape.
//! - Removing by id works from any position; removing an absent id is a
//!   no-op.
//! - The stack holds weak references. A drawer dropped without detaching is
//!   skipped and pruned on the next dispatch.
//!
//! # Failure Modes
//!
//! - `dispatch_key` on an empty stack returns an empty response.
//! - Non-Escape keys and key releases are never routed.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use vaul_core::{EventResponse, KeyEvent};

/// Global counter for unique drawer ids.
static DRAWER_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a drawer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawerId(u64);

impl DrawerId {
    pub(crate) fn next() -> Self {
        Self(DRAWER_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw id value.
    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Something that reacts to Escape while on top of the stack.
pub trait EscapeTarget {
    /// Handle one Escape press.
    fn handle_escape(&self) -> EventResponse;
}

struct StackEntry {
    id: DrawerId,
    target: Weak<dyn EscapeTarget>,
}

/// Open drawers in open order. Clones share the same stack.
#[derive(Clone, Default)]
pub struct DrawerStack {
    entries: Rc<RefCell<Vec<StackEntry>>>,
}

thread_local! {
    static GLOBAL: DrawerStack = DrawerStack::new();
}

impl DrawerStack {
    /// Create an empty, private stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// The page-wide stack for this thread.
    pub fn global() -> Self {
        GLOBAL.with(Clone::clone)
    }

    /// Put `id` on top. Pushing an id already present moves it to the top.
    pub fn push(&self, id: DrawerId, target: Weak<dyn EscapeTarget>) {
        let mut entries = self.entries.borrow_mut();
        entries.retain(|e| e.id != id);
        entries.push(StackEntry { id, target });
    }

    /// Remove `id` wherever it sits. Returns `true` if it was present.
    pub fn remove(&self, id: DrawerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        entries.len() != before
    }

    /// Id of the top entry, if any.
    pub fn top_id(&self) -> Option<DrawerId> {
        self.entries.borrow().last().map(|e| e.id)
    }

    /// Get the number of entries.
    #[inline]
    pub fn depth(&self) -> usize {
        self.entries.borrow().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn contains(&self, id: DrawerId) -> bool {
        self.entries.borrow().iter().any(|e| e.id == id)
    }

    /// Route a key event to the top drawer.
    pub fn dispatch_key(&self, event: &KeyEvent) -> EventResponse {
        if !event.is_escape_press() {
            return EventResponse::empty();
        }
        let top = {
            let mut entries = self.entries.borrow_mut();
            entries.retain(|e| e.target.strong_count() > 0);
            entries.last().and_then(|e| e.target.upgrade().map(|t| (e.id, t)))
        };
        // Borrow released: the target may remove itself while handling.
        match top {
            Some((id, target)) => {
                tracing::trace!(drawer = id.id(), "escape routed to top drawer");
                target.handle_escape()
            }
            None => EventResponse::empty(),
        }
    }
}

impl std::fmt::Debug for DrawerStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<u64> = self.entries.borrow().iter().map(|e| e.id.0).collect();
        f.debug_struct("DrawerStack").field("entries", &ids).finish()
    }
}
