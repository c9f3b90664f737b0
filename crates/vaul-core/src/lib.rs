#![forbid(unsafe_code)]

//! Core types for the vaul drawer.
//!
//! This crate carries no drawer behavior. It defines the vocabulary the
//! gesture engine and the interaction controller speak:
//!
//! - [`geometry`]: points, sizes, and the primary drag axis.
//! - [`direction`]: the side of the viewport a drawer slides in from.
//! - [`event`]: host-agnostic pointer, touch, key, click, and animation events.
//! - [`host`]: the [`DragEnvironment`](host::DragEnvironment) contract a UI
//!   binding layer implements to answer selection and scroll queries.
//! - [`error`]: configuration errors.

pub mod direction;
pub mod error;
pub mod event;
pub mod geometry;
pub mod host;

pub use direction::Direction;
pub use error::{ConfigError, ParseDirectionError};
pub use event::{
    AnimationEvent, ClickEvent, EventResponse, KeyCode, KeyEvent, KeyEventKind, NodeId,
    PointerEvent, PointerId, TouchMoveEvent,
};
pub use geometry::{Axis, Point, Size};
pub use host::{DragEnvironment, ScrollMetrics};
