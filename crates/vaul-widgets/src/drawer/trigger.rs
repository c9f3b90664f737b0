#![forbid(unsafe_code)]

//! Button that opens its enclosing drawer.

use super::controller::{DrawerController, WeakDrawer};

/// Opens a drawer on click.
///
/// The trigger does not own the drawer. Wiring is usually done by the
/// binding layer once it finds the trigger's drawer ancestor; until then a
/// click only logs a warning.
#[derive(Debug, Clone, Default)]
pub struct DrawerTrigger {
    drawer: Option<WeakDrawer>,
}

impl DrawerTrigger {
    /// An unwired trigger.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_drawer(drawer: &DrawerController) -> Self {
        Self {
            drawer: Some(drawer.downgrade()),
        }
    }

    /// Wire (or rewire) to `drawer`; `None` unwires.
    pub fn connect(&mut self, drawer: Option<&DrawerController>) {
        self.drawer = drawer.map(DrawerController::downgrade);
    }

    pub fn drawer(&self) -> Option<DrawerController> {
        self.drawer.as_ref()?.upgrade()
    }

    /// Open the drawer. Returns `false` when no live drawer is wired.
    pub fn click(&self) -> bool {
        match self.drawer() {
            Some(drawer) => {
                drawer.set_open(true);
                true
            }
            None => {
                tracing::warn!("drawer trigger has no drawer ancestor");
                false
            }
        }
    }
}
