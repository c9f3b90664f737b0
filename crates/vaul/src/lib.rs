#![forbid(unsafe_code)]

//! Vaul public facade.
//!
//! A draggable modal drawer that slides in from any screen edge. Users
//! dismiss it by flicking or dragging toward its closing edge, by pressing
//! Escape, or by clicking the backdrop.
//!
//! # Crates
//!
//! - [`core`]: directions, geometry, events and the host contracts.
//! - [`runtime`]: observables, computed values and the deferred queue.
//! - [`widgets`]: the gesture manager, the drawer controller and the
//!   background lock.
//! - `harness` (feature `testing`): in-memory host fakes.
//!
//! Most applications only need the [`prelude`].

pub use vaul_core as core;
pub use vaul_runtime as runtime;
pub use vaul_widgets as widgets;

#[cfg(feature = "testing")]
pub use vaul_harness as harness;

pub use vaul_core::{ConfigError, Direction, DragEnvironment};
pub use vaul_widgets::drawer::{
    BackgroundLock, DrawerBuilder, DrawerController, DrawerSurface, DrawerTrigger, GestureConfig,
    GestureManager, ScrollLock,
};

/// Everything needed to build and drive a drawer.
pub mod prelude {
    pub use vaul_core::{
        AnimationEvent, ClickEvent, Direction, DragEnvironment, EventResponse, KeyCode, KeyEvent,
        NodeId, Point, PointerEvent, Size, TouchMoveEvent,
    };
    pub use vaul_runtime::{DeferredQueue, Observable, Subscription};
    pub use vaul_widgets::drawer::{
        BackgroundLock, DataState, DragEnd, DragTransform, DrawerController, DrawerPhase,
        DrawerStack, DrawerSurface, DrawerTrigger, GestureConfig, GestureManager, GesturePhase,
        LockDocument, ScrollLock, ScrollLockOptions,
    };
}
