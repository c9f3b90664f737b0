#![forbid(unsafe_code)]

//! Test harness for the vaul drawer.
//!
//! In-memory stand-ins for everything the drawer expects from its host:
//!
//! - [`FakeDocument`]: node tree, scroll containers, text selection, body
//!   styles and inert marks. Implements both
//!   [`DragEnvironment`](vaul_core::DragEnvironment) and
//!   [`LockDocument`](vaul_widgets::drawer::LockDocument).
//! - [`FakeSurface`]: records everything the controller does to the
//!   animated surface.
//! - [`RecordingLock`]: a [`BackgroundLock`](vaul_widgets::drawer::BackgroundLock)
//!   that logs its calls.
//! - [`DragScript`]: pointer sequences with explicit timestamps, so
//!   velocities are exact.
//! - [`capture_logs`]: run a closure under a capturing `tracing`
//!   subscriber.

mod document;
mod drag;
mod logs;
mod surface;

pub use document::FakeDocument;
pub use drag::{Drag, DragScript, run_drawer, run_gesture};
pub use logs::capture_logs;
pub use surface::{FakeSurface, LockCall, RecordingLock};
