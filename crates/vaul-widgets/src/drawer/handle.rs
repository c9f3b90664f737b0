#![forbid(unsafe_code)]

//! Built-in grab handle.
//!
//! Vertical drawers get a small handle at the edge the user grabs: the top
//! of a bottom drawer, the bottom of a top drawer. Horizontal drawers never
//! get one, and a handle supplied by the content author always wins.

use std::rc::Rc;

use vaul_core::Direction;
use vaul_runtime::{Computed, Observable};

use super::surface::{DrawerSurface, HandlePlacement};

/// Placement of the built-in handle for `direction`, if it gets one.
pub const fn placement_for(direction: Direction) -> Option<HandlePlacement> {
    match direction {
        Direction::Bottom => Some(HandlePlacement::Leading),
        Direction::Top => Some(HandlePlacement::Trailing),
        Direction::Left | Direction::Right => None,
    }
}

/// Keeps the built-in handle in sync with direction and the show flag.
pub struct HandleManager {
    direction: Observable<Direction>,
    wanted: Computed<bool>,
}

impl HandleManager {
    /// Track `direction` and `show_handle` for `surface`.
    ///
    /// The custom-handle probe is re-read only after
    /// [`content_changed`](Self::content_changed) or a change to either
    /// observable.
    pub fn new(
        surface: Rc<dyn DrawerSurface>,
        direction: &Observable<Direction>,
        show_handle: &Observable<bool>,
    ) -> Self {
        let wanted = Computed::from2(direction, show_handle, move |dir, show| {
            *show && placement_for(*dir).is_some() && !surface.has_custom_handle()
        });
        Self {
            direction: direction.clone(),
            wanted,
        }
    }

    /// Remove the handle, then re-insert it at the current edge if wanted.
    pub fn sync(&self, surface: &dyn DrawerSurface) {
        surface.remove_handle();
        let direction = self.direction.get();
        if self.wanted.get()
            && let Some(placement) = placement_for(direction)
        {
            surface.insert_handle(placement, direction);
            tracing::debug!(%direction, ?placement, "drawer handle inserted");
        }
    }

    /// The content subtree changed; a custom handle may have come or gone.
    pub fn content_changed(&self) {
        self.wanted.invalidate();
    }

    pub fn is_wanted(&self) -> bool {
        self.wanted.get()
    }
}

impl std::fmt::Debug for HandleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandleManager")
            .field("direction", &self.direction.get())
            .field("wanted", &self.wanted)
            .finish()
    }
}
