#![forbid(unsafe_code)]

//! Draggable modal drawer.
//!
//! A drawer is a modal surface that slides in from one screen edge and can
//! be dragged back toward that edge to dismiss it.
//!
//! - [`GestureManager`] tracks one pointer drag and decides, on release,
//!   whether it was a dismissal.
//! - [`DrawerController`] owns the open/closed state and wires the gesture,
//!   keyboard, backdrop and animation-end events to it.
//! - [`DrawerSurface`], [`BackgroundLock`] and
//!   [`DragEnvironment`](vaul_core::DragEnvironment) are the host seams.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use vaul_widgets::drawer::{DrawerController, ScrollLock};
//!
//! let drawer = DrawerController::builder()
//!     .direction(Direction::Right)
//!     .build(Rc::new(ScrollLock::new(document)))?;
//! drawer.attach(Some(surface));
//!
//! // Host event loop
//! drawer.handle_pointer_down(&event, &env);
//! drawer.flush();
//! ```

pub mod attributes;
mod controller;
pub mod gesture;
mod handle;
mod lock;
pub mod permission;
mod stack;
mod surface;
mod trigger;

pub use attributes::{ContentAttributes, DrawerAttribute, DrawerAttributes};
pub use controller::{DrawerBuilder, DrawerController, DrawerPhase, WeakDrawer};
pub use gesture::{
    DEFAULT_CLOSE_THRESHOLD, DEFAULT_SCROLL_TOLERANCE, DEFAULT_VELOCITY_THRESHOLD, DragEnd,
    DragTransform, GestureConfig, GestureManager, GesturePhase, GestureSession, damp,
};
pub use handle::{HandleManager, placement_for};
pub use lock::{BackgroundLock, BodyChild, LockDocument, ScrollLock, ScrollLockOptions};
pub use permission::allows_drag;
pub use stack::{DrawerId, DrawerStack, EscapeTarget};
pub use surface::{DataState, DrawerSurface, HandlePlacement};
pub use trigger::DrawerTrigger;
