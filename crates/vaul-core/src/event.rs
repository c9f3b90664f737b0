#![forbid(unsafe_code)]

//! Host-agnostic input events.
//!
//! The UI binding layer translates platform events (DOM pointer events,
//! keyboard events, `animationend`) into these types before handing them to
//! the drawer. Every event that can be hit-tested carries the [`NodeId`] of
//! its target so the drawer can ignore events bubbling up from descendants.
//!
//! Handlers report what they want done with the platform event through
//! [`EventResponse`] instead of mutating it.

use bitflags::bitflags;
use web_time::Instant;

use crate::geometry::Point;

/// Opaque identity of a node in the host's element tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Platform pointer identifier, used for pointer capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PointerId(pub i32);

/// Pointer down, move, up, or cancel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: PointerId,
    /// Page coordinates.
    pub position: Point,
    pub target: NodeId,
    pub timestamp: Instant,
}

impl PointerEvent {
    pub fn new(target: NodeId, position: Point, timestamp: Instant) -> Self {
        Self {
            pointer_id: PointerId::default(),
            position,
            target,
            timestamp,
        }
    }

    #[must_use]
    pub fn with_pointer_id(mut self, id: PointerId) -> Self {
        self.pointer_id = id;
        self
    }
}

/// A `touchmove` on the drawer surface. Only the target matters; positions
/// arrive through the companion pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchMoveEvent {
    pub target: NodeId,
}

impl TouchMoveEvent {
    pub const fn new(target: NodeId) -> Self {
        Self { target }
    }
}

/// Keys the drawer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Escape,
    Enter,
    Tab,
    Char(char),
    /// Any key the drawer does not care about.
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    #[default]
    Press,
    Repeat,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            kind: KeyEventKind::Press,
        }
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Escape pressed (or auto-repeated).
    pub const fn is_escape_press(&self) -> bool {
        matches!(self.code, KeyCode::Escape)
            && matches!(self.kind, KeyEventKind::Press | KeyEventKind::Repeat)
    }
}

/// A click whose target has already been hit-tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    pub target: NodeId,
}

impl ClickEvent {
    pub const fn new(target: NodeId) -> Self {
        Self { target }
    }
}

/// An `animationend` notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationEvent {
    pub animation_name: String,
    pub target: NodeId,
}

impl AnimationEvent {
    pub fn new(animation_name: impl Into<String>, target: NodeId) -> Self {
        Self {
            animation_name: animation_name.into(),
            target,
        }
    }
}

bitflags! {
    /// What the host should do with the platform event after a handler ran.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EventResponse: u8 {
        /// Call `preventDefault()`.
        const PREVENT_DEFAULT = 0b01;
        /// Call `stopImmediatePropagation()`.
        const STOP_PROPAGATION = 0b10;
        /// Both of the above.
        const CONSUMED = Self::PREVENT_DEFAULT.bits() | Self::STOP_PROPAGATION.bits();
    }
}

impl EventResponse {
    #[inline]
    pub const fn default_prevented(self) -> bool {
        self.contains(Self::PREVENT_DEFAULT)
    }
}
