#![forbid(unsafe_code)]

//! Drawer widgets for vaul.

pub mod drawer;

pub use drawer::{
    BackgroundLock, DataState, DragEnd, DragTransform, DrawerController, DrawerPhase,
    DrawerStack, DrawerSurface, DrawerTrigger, GestureConfig, GestureManager, GesturePhase,
    ScrollLock,
};
