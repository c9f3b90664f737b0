#![forbid(unsafe_code)]

//! Zero-delay deferred tasks.
//!
//! Work scheduled on a [`DeferredQueue`] runs on the host's next call to
//! [`DeferredQueue::run_pending`], after the current event handler has
//! returned. The gesture engine uses it to hold
//! the `Released` phase for one turn so dependents can observe it.
//!
//! # Invariants
//!
//! 1. Tasks run in scheduling order.
//! 2. A task scheduled while `run_pending` is draining runs on the next
//!    drain, not the current one.
//! 3. A cancelled task never runs. Cancelling an already-run task is a no-op.
//! 4. Dropping a [`TaskHandle`] does not cancel the task.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

type Task = Box<dyn FnOnce()>;

#[derive(Default)]
struct Queue {
    next_id: u64,
    tasks: VecDeque<(u64, Task)>,
}

/// Single-threaded FIFO of deferred closures. Clones share the queue.
#[derive(Clone, Default)]
pub struct DeferredQueue {
    inner: Rc<RefCell<Queue>>,
}

impl DeferredQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defer `task` to the next drain.
    pub fn schedule(&self, task: impl FnOnce() + 'static) -> TaskHandle {
        let mut queue = self.inner.borrow_mut();
        let id = queue.next_id;
        queue.next_id += 1;
        queue.tasks.push_back((id, Box::new(task)));
        TaskHandle {
            id,
            queue: Rc::downgrade(&self.inner),
        }
    }

    /// Run every task that was pending when the call began.
    ///
    /// Returns the number of tasks run.
    pub fn run_pending(&self) -> usize {
        let batch = self.inner.borrow().tasks.len();
        let mut ran = 0;
        for _ in 0..batch {
            // Release the borrow before running so tasks may schedule more.
            let next = self.inner.borrow_mut().tasks.pop_front();
            let Some((_, task)) = next else { break };
            task();
            ran += 1;
        }
        if ran > 0 {
            tracing::trace!(ran, "deferred tasks drained");
        }
        ran
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.borrow().tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }
}

impl fmt::Debug for DeferredQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredQueue")
            .field("pending", &self.pending())
            .finish()
    }
}

/// Cancellation handle for a scheduled task.
#[derive(Debug)]
pub struct TaskHandle {
    id: u64,
    queue: Weak<RefCell<Queue>>,
}

impl TaskHandle {
    /// Remove the task if it has not run yet.
    ///
    /// Returns `true` if the task was still pending.
    pub fn cancel(&self) -> bool {
        let Some(queue) = self.queue.upgrade() else {
            return false;
        };
        let mut queue = queue.borrow_mut();
        let before = queue.tasks.len();
        queue.tasks.retain(|(id, _)| *id != self.id);
        queue.tasks.len() != before
    }

    /// Whether the task is still waiting to run.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.queue
            .upgrade()
            .is_some_and(|q| q.borrow().tasks.iter().any(|(id, _)| *id == self.id))
    }
}
