#![forbid(unsafe_code)]

//! The animated drawer surface as seen by the controller.
//!
//! The surface is the modal element that slides in and out. Whatever owns
//! the real widget tree implements [`DrawerSurface`]; the controller only
//! drives it through this trait and never inspects the tree directly.

use std::fmt;

use vaul_core::{Direction, NodeId, Size};

use super::gesture::DragTransform;

/// Value of the surface's `data-state` attribute.
///
/// The styling layer keys `slide-from-<direction>` and
/// `slide-to-<direction>` keyframes off this together with
/// `data-direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataState {
    Open,
    #[default]
    Closed,
}

impl DataState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for DataState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an auto-injected grab handle sits within the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlePlacement {
    /// First child (top of a bottom drawer).
    Leading,
    /// Last child (bottom of a top drawer).
    Trailing,
}

/// Host-side handle to the animated surface.
///
/// Methods take `&self`; implementations use interior mutability, which
/// lets the controller call back into the surface from observer callbacks.
pub trait DrawerSurface {
    /// Node id of the surface element, used to match event targets.
    fn node(&self) -> NodeId;

    /// Show as a modal (top layer, backdrop).
    fn show_modal(&self);

    /// Hide the modal.
    fn close(&self);

    fn is_shown(&self) -> bool;

    fn set_data_state(&self, state: DataState);

    fn set_data_direction(&self, direction: Direction);

    /// Set the inline transform; `None` clears it.
    fn set_transform(&self, transform: Option<&DragTransform>);

    /// Enable or suppress the CSS transition on the surface.
    fn set_transition_enabled(&self, enabled: bool);

    /// Current box, if laid out.
    fn dimensions(&self) -> Option<Size>;

    /// Whether the content already carries a user-supplied handle.
    fn has_custom_handle(&self) -> bool;

    /// Insert the built-in handle. `direction` is reflected on the handle.
    fn insert_handle(&self, placement: HandlePlacement, direction: Direction);

    /// Remove the built-in handle if present.
    fn remove_handle(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_state_strings() {
        assert_eq!(DataState::Open.to_string(), "open");
        assert_eq!(DataState::Closed.as_str(), "closed");
        assert_eq!(DataState::default(), DataState::Closed);
    }
}
