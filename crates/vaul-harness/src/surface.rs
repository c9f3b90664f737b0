#![forbid(unsafe_code)]

use std::cell::{Cell, RefCell};

use vaul_core::{Direction, NodeId, Size};
use vaul_widgets::drawer::{
    BackgroundLock, DataState, DragTransform, DrawerSurface, HandlePlacement,
};

/// Recording [`DrawerSurface`].
#[derive(Debug)]
pub struct FakeSurface {
    node: NodeId,
    shown: Cell<bool>,
    show_count: Cell<u32>,
    state: Cell<DataState>,
    direction: Cell<Option<Direction>>,
    transform: RefCell<Option<String>>,
    transition: Cell<bool>,
    dimensions: Cell<Option<Size>>,
    custom_handle: Cell<bool>,
    handle: Cell<Option<(HandlePlacement, Direction)>>,
}

impl FakeSurface {
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            shown: Cell::new(false),
            show_count: Cell::new(0),
            state: Cell::new(DataState::Closed),
            direction: Cell::new(None),
            transform: RefCell::new(None),
            transition: Cell::new(true),
            dimensions: Cell::new(None),
            custom_handle: Cell::new(false),
            handle: Cell::new(None),
        }
    }

    #[must_use]
    pub fn with_dimensions(self, width: f64, height: f64) -> Self {
        self.dimensions.set(Some(Size::new(width, height)));
        self
    }

    /// Simulate a user-supplied handle in the content.
    pub fn set_custom_handle(&self, present: bool) {
        self.custom_handle.set(present);
    }

    pub fn show_count(&self) -> u32 {
        self.show_count.get()
    }

    pub fn data_state(&self) -> DataState {
        self.state.get()
    }

    pub fn data_direction(&self) -> Option<Direction> {
        self.direction.get()
    }

    /// Inline transform as rendered.
    pub fn transform(&self) -> Option<String> {
        self.transform.borrow().clone()
    }

    pub fn transition_enabled(&self) -> bool {
        self.transition.get()
    }

    pub fn handle(&self) -> Option<(HandlePlacement, Direction)> {
        self.handle.get()
    }
}

impl DrawerSurface for FakeSurface {
    fn node(&self) -> NodeId {
        self.node
    }

    fn show_modal(&self) {
        self.shown.set(true);
        self.show_count.set(self.show_count.get() + 1);
    }

    fn close(&self) {
        self.shown.set(false);
    }

    fn is_shown(&self) -> bool {
        self.shown.get()
    }

    fn set_data_state(&self, state: DataState) {
        self.state.set(state);
    }

    fn set_data_direction(&self, direction: Direction) {
        self.direction.set(Some(direction));
    }

    fn set_transform(&self, transform: Option<&DragTransform>) {
        *self.transform.borrow_mut() = transform.map(ToString::to_string);
    }

    fn set_transition_enabled(&self, enabled: bool) {
        self.transition.set(enabled);
    }

    fn dimensions(&self) -> Option<Size> {
        self.dimensions.get()
    }

    fn has_custom_handle(&self) -> bool {
        self.custom_handle.get()
    }

    fn insert_handle(&self, placement: HandlePlacement, direction: Direction) {
        self.handle.set(Some((placement, direction)));
    }

    fn remove_handle(&self) {
        self.handle.set(None);
    }
}

/// One call observed by [`RecordingLock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockCall {
    Lock,
    Unlock,
}

/// [`BackgroundLock`] that records effective calls. Idempotent: a call that
/// changes nothing is not recorded.
#[derive(Debug, Default)]
pub struct RecordingLock {
    locked: Cell<bool>,
    calls: RefCell<Vec<LockCall>>,
}

impl RecordingLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<LockCall> {
        self.calls.borrow().clone()
    }
}

impl BackgroundLock for RecordingLock {
    fn lock(&self) {
        if !self.locked.replace(true) {
            self.calls.borrow_mut().push(LockCall::Lock);
        }
    }

    fn unlock(&self) {
        if self.locked.replace(false) {
            self.calls.borrow_mut().push(LockCall::Unlock);
        }
    }

    fn is_locked(&self) -> bool {
        self.locked.get()
    }
}
