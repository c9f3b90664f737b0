#![forbid(unsafe_code)]

//! Drawer interaction controller.
//!
//! Owns the reactive drawer state (`open`, `direction`, `dismissible`,
//! `show-handle`) and turns outside stimuli into state transitions:
//! trigger clicks, Escape, backdrop clicks, the end of the CSS slide
//! animation, and the gesture manager's release decision.
//!
//! # State machine
//!
//! ```text
//!            set_open(true)              slide-from-* ends
//!  Closed ──────────────────▶ Opening ─────────────────────▶ Open
//!    ▲                          │  ▲                           │
//!    │ slide-to-* ends          │  │ set_open(true)            │ Escape / backdrop /
//!    │                          ▼  │                           │ drag dismiss /
//!    └────────────────────── Closing ◀─────────────────────────┘ set_open(false)
//! ```
//!
//! Closing flips `data-state` to `closed`, which starts the exit animation;
//! the surface stays shown and the background stays locked until that
//! animation ends on the surface itself.
//!
//! # Invariants
//!
//! 1. The background is locked from the moment `open` becomes `true` until
//!    the exit animation completes or the controller detaches.
//! 2. While `open`, Escape is consumed (default prevented) whether or not
//!    the drawer is dismissible.
//! 3. The surface's inline transform is cleared whenever the drawer reaches
//!    `Closed`, reopens from `Closing`, or detaches mid-drag. The last two
//!    also re-enable the CSS transition.
//! 4. After [`DrawerController::detach`], no effect fires and no gesture
//!    callback runs.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Fallback |
//! |---------|-------|----------|
//! | No surface | `attach(None)` or not yet attached | Warning logged, state still tracked, nothing shown |
//! | Foreign `animationend` | Bubbled from a nested animated child | Ignored |
//! | Re-entrant pointer event | Host dispatches from inside a drag callback | Ignored |

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use vaul_core::{
    AnimationEvent, ClickEvent, ConfigError, Direction, DragEnvironment, EventResponse, KeyEvent,
    NodeId, PointerEvent, TouchMoveEvent,
};
use vaul_runtime::reactive::bind_mapped;
use vaul_runtime::{Binding, BindingScope, DeferredQueue, Observable, Subscription};

use super::attributes::{ContentAttributes, DrawerAttribute, DrawerAttributes};
use super::gesture::{
    DragEnd, GestureConfig, GestureManager, GesturePhase, validate_close_threshold,
    validate_velocity_threshold,
};
use super::handle::HandleManager;
use super::lock::BackgroundLock;
use super::stack::{DrawerId, DrawerStack, EscapeTarget};
use super::surface::{DataState, DrawerSurface};

const SLIDE_IN_PREFIX: &str = "slide-from-";
const SLIDE_OUT_PREFIX: &str = "slide-to-";

/// Where the drawer is in its open/close cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawerPhase {
    #[default]
    Closed,
    /// Shown, entry animation running.
    Opening,
    Open,
    /// `open` is false, exit animation running, surface still shown.
    Closing,
}

impl DrawerPhase {
    /// Shown on screen (any phase but `Closed`).
    pub const fn is_visible(self) -> bool {
        !matches!(self, Self::Closed)
    }
}

/// Builder for [`DrawerController`].
#[derive(Debug, Clone, Default)]
pub struct DrawerBuilder {
    attributes: DrawerAttributes,
    content: ContentAttributes,
    keys: Option<DrawerStack>,
    queue: Option<DeferredQueue>,
}

impl DrawerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attributes(mut self, attributes: DrawerAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn content(mut self, content: ContentAttributes) -> Self {
        self.content = content;
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.attributes.direction = direction;
        self
    }

    pub fn dismissible(mut self, dismissible: bool) -> Self {
        self.attributes.dismissible = dismissible;
        self
    }

    pub fn velocity_threshold(mut self, px_per_ms: f64) -> Self {
        self.attributes.velocity_threshold = px_per_ms;
        self
    }

    pub fn close_threshold(mut self, ratio: f64) -> Self {
        self.attributes.close_threshold = ratio;
        self
    }

    pub fn show_handle(mut self, show: bool) -> Self {
        self.content.show_handle = show;
        self
    }

    /// Route Escape through `stack` instead of the thread's global stack.
    pub fn key_stack(mut self, stack: DrawerStack) -> Self {
        self.keys = Some(stack);
        self
    }

    /// Share a deferred queue with the host.
    pub fn queue(mut self, queue: DeferredQueue) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Build the controller, rejecting out-of-range thresholds.
    pub fn build(self, lock: Rc<dyn BackgroundLock>) -> Result<DrawerController, ConfigError> {
        let attrs = self.attributes;
        validate_velocity_threshold(attrs.velocity_threshold)?;
        validate_close_threshold(attrs.close_threshold)?;

        Ok(DrawerController {
            inner: Rc::new(ControllerInner::new(
                attrs,
                self.content,
                self.keys.unwrap_or_else(DrawerStack::global),
                self.queue.unwrap_or_default(),
                lock,
            )),
        })
    }
}

struct ControllerInner {
    id: DrawerId,
    direction: Observable<Direction>,
    dismissible: Observable<bool>,
    open: Observable<bool>,
    show_handle: Observable<bool>,
    velocity_threshold: Cell<f64>,
    close_threshold: Cell<f64>,
    phase: Cell<DrawerPhase>,
    surface: RefCell<Option<Rc<dyn DrawerSurface>>>,
    lock: Rc<dyn BackgroundLock>,
    keys: DrawerStack,
    gesture: RefCell<Option<GestureManager>>,
    handles: RefCell<Option<HandleManager>>,
    scope: RefCell<BindingScope>,
    queue: DeferredQueue,
}

impl ControllerInner {
    fn new(
        attrs: DrawerAttributes,
        content: ContentAttributes,
        keys: DrawerStack,
        queue: DeferredQueue,
        lock: Rc<dyn BackgroundLock>,
    ) -> Self {
        Self {
            id: DrawerId::next(),
            direction: Observable::new(attrs.direction),
            dismissible: Observable::new(attrs.dismissible),
            open: Observable::new(false),
            show_handle: Observable::new(content.show_handle),
            velocity_threshold: Cell::new(attrs.velocity_threshold),
            close_threshold: Cell::new(attrs.close_threshold),
            phase: Cell::new(DrawerPhase::Closed),
            surface: RefCell::new(None),
            lock,
            keys,
            gesture: RefCell::new(None),
            handles: RefCell::new(None),
            scope: RefCell::new(BindingScope::new()),
            queue,
        }
    }

    fn surface(&self) -> Option<Rc<dyn DrawerSurface>> {
        self.surface.borrow().clone()
    }

    fn apply_open(this: &Rc<Self>, open: bool) {
        let Some(surface) = this.surface() else {
            tracing::warn!(drawer = this.id.id(), open, "drawer has no content surface");
            return;
        };
        if open {
            if this.phase.replace(DrawerPhase::Opening) == DrawerPhase::Closing {
                // Reopened before the exit animation finished: drop the
                // offset left by a dismissing drag.
                reset_inline_style(&*surface);
            }
            surface.show_modal();
            surface.set_data_state(DataState::Open);
            this.lock.lock();
            let target: Weak<dyn EscapeTarget> = Rc::downgrade(this) as Weak<dyn EscapeTarget>;
            this.keys.push(this.id, target);
            tracing::debug!(
                drawer = this.id.id(),
                direction = %this.direction.get(),
                "drawer opening"
            );
        } else if this.phase.get().is_visible() {
            this.phase.set(DrawerPhase::Closing);
            surface.set_data_state(DataState::Closed);
            tracing::debug!(drawer = this.id.id(), "drawer closing");
        }
    }

    fn finish_close(&self, surface: &dyn DrawerSurface) {
        surface.close();
        surface.set_transform(None);
        self.lock.unlock();
        self.keys.remove(self.id);
        self.phase.set(DrawerPhase::Closed);
        tracing::debug!(drawer = self.id.id(), "drawer closed");
    }

    fn sync_handle(&self) {
        let Some(surface) = self.surface() else { return };
        if let Some(handles) = self.handles.borrow().as_ref() {
            handles.sync(&*surface);
        }
    }

    /// Run `f` on the gesture manager with its configuration brought up to
    /// date. `None` when detached or when called re-entrantly from inside a
    /// gesture callback.
    fn with_gesture<R>(&self, f: impl FnOnce(&mut GestureManager) -> R) -> Option<R> {
        let Ok(mut slot) = self.gesture.try_borrow_mut() else {
            tracing::trace!(drawer = self.id.id(), "re-entrant pointer event ignored");
            return None;
        };
        let gesture = slot.as_mut()?;
        gesture.set_direction(self.direction.get());
        gesture.set_dismissible(self.dismissible.get());
        let velocity = gesture.set_velocity_threshold(self.velocity_threshold.get());
        let close = gesture.set_close_threshold(self.close_threshold.get());
        debug_assert!(
            velocity.is_ok() && close.is_ok(),
            "thresholds are validated before they are stored"
        );
        Some(f(gesture))
    }

    fn on_drag_end(&self, end: DragEnd) {
        let surface = self.surface();
        if let Some(surface) = &surface {
            surface.set_transition_enabled(true);
        }
        if end.should_dismiss {
            self.open.set(false);
        } else if let (Some(surface), Some(transform)) = (surface, end.transform) {
            surface.set_transform(Some(&transform));
        }
    }
}

/// Rest position with the CSS transition back on.
fn reset_inline_style(surface: &dyn DrawerSurface) {
    surface.set_transition_enabled(true);
    surface.set_transform(None);
}

impl EscapeTarget for ControllerInner {
    fn handle_escape(&self) -> EventResponse {
        if !self.open.get() {
            return EventResponse::empty();
        }
        if self.dismissible.get() {
            tracing::debug!(drawer = self.id.id(), "escape dismisses drawer");
            self.open.set(false);
        }
        EventResponse::CONSUMED
    }
}

impl Drop for ControllerInner {
    fn drop(&mut self) {
        self.keys.remove(self.id);
    }
}

/// Handle to one drawer. Clones share the same drawer.
#[derive(Clone)]
pub struct DrawerController {
    inner: Rc<ControllerInner>,
}

impl DrawerController {
    pub fn builder() -> DrawerBuilder {
        DrawerBuilder::new()
    }

    /// A drawer with default configuration on the global key stack.
    pub fn new(lock: Rc<dyn BackgroundLock>) -> Self {
        Self {
            inner: Rc::new(ControllerInner::new(
                DrawerAttributes::default(),
                ContentAttributes::default(),
                DrawerStack::global(),
                DeferredQueue::new(),
                lock,
            )),
        }
    }

    pub fn id(&self) -> DrawerId {
        self.inner.id
    }

    // --- Lifecycle ---

    /// Bind to the animated surface and start reacting to state changes.
    ///
    /// Returns `false` (and logs a warning) when no surface is supplied.
    /// Attaching an attached drawer detaches it first.
    pub fn attach(&self, surface: Option<Rc<dyn DrawerSurface>>) -> bool {
        if self.is_attached() {
            self.detach();
        }
        let Some(surface) = surface else {
            tracing::warn!(drawer = self.id().id(), "drawer attached without a content surface");
            return false;
        };
        let inner = &self.inner;
        *inner.surface.borrow_mut() = Some(Rc::clone(&surface));

        // Created before the observers below so its cache is invalidated
        // before the handle is re-synced.
        *inner.handles.borrow_mut() = Some(HandleManager::new(
            Rc::clone(&surface),
            &inner.direction,
            &inner.show_handle,
        ));
        *inner.gesture.borrow_mut() = self.build_gesture(surface.node());

        let mut scope = inner.scope.borrow_mut();
        let weak = Rc::downgrade(inner);
        scope.subscribe(&inner.open, move |open| {
            if let Some(inner) = weak.upgrade() {
                ControllerInner::apply_open(&inner, *open);
            }
        });
        let weak = Rc::downgrade(inner);
        scope.subscribe(&inner.direction, move |direction| {
            let Some(inner) = weak.upgrade() else { return };
            if let Some(surface) = inner.surface() {
                surface.set_data_direction(*direction);
            }
            inner.sync_handle();
        });
        let weak = Rc::downgrade(inner);
        scope.subscribe(&inner.show_handle, move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.sync_handle();
            }
        });
        drop(scope);

        surface.set_data_direction(inner.direction.get());
        surface.set_data_state(if inner.open.get() {
            DataState::Open
        } else {
            DataState::Closed
        });
        inner.sync_handle();
        if inner.open.get() {
            ControllerInner::apply_open(inner, true);
        }
        tracing::debug!(drawer = self.id().id(), surface = surface.node().raw(), "drawer attached");
        true
    }

    fn build_gesture(&self, boundary: NodeId) -> Option<GestureManager> {
        let inner = &self.inner;
        let config = GestureConfig::default()
            .direction(inner.direction.get())
            .dismissible(inner.dismissible.get())
            .velocity_threshold(inner.velocity_threshold.get())
            .close_threshold(inner.close_threshold.get())
            .boundary(boundary);
        let gesture = match GestureManager::new(config) {
            Ok(gesture) => gesture,
            Err(err) => {
                tracing::warn!(drawer = inner.id.id(), %err, "gesture manager not created");
                return None;
            }
        };

        let dims = Rc::downgrade(inner);
        let start = Rc::downgrade(inner);
        let drag = Rc::downgrade(inner);
        let end = Rc::downgrade(inner);
        Some(
            gesture
                .with_queue(inner.queue.clone())
                .with_target_dimensions(move || dims.upgrade()?.surface()?.dimensions())
                .on_drag_start(move || {
                    if let Some(surface) = start.upgrade().and_then(|i| i.surface()) {
                        surface.set_transition_enabled(false);
                    }
                })
                .on_drag(move |transform| {
                    if let Some(surface) = drag.upgrade().and_then(|i| i.surface()) {
                        surface.set_transform(Some(transform));
                    }
                })
                .on_drag_end(move |outcome| {
                    if let Some(inner) = end.upgrade() {
                        inner.on_drag_end(outcome);
                    }
                }),
        )
    }

    /// Stop reacting and release everything this drawer holds.
    pub fn detach(&self) {
        let inner = &self.inner;
        inner.scope.borrow_mut().clear();
        if let Some(mut gesture) = inner.gesture.borrow_mut().take() {
            if gesture.is_dragging()
                && let Some(surface) = inner.surface()
            {
                reset_inline_style(&*surface);
            }
            gesture.destroy();
        }
        inner.handles.borrow_mut().take();
        inner.keys.remove(inner.id);
        if inner.phase.get().is_visible() {
            inner.lock.unlock();
        }
        inner.phase.set(DrawerPhase::Closed);
        if inner.surface.borrow_mut().take().is_some() {
            tracing::debug!(drawer = inner.id.id(), "drawer detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.inner.surface.borrow().is_some()
    }

    // --- State ---

    pub fn set_open(&self, open: bool) {
        self.inner.open.set(open);
    }

    pub fn is_open(&self) -> bool {
        self.inner.open.get()
    }

    pub fn direction(&self) -> Direction {
        self.inner.direction.get()
    }

    pub fn set_direction(&self, direction: Direction) {
        if self.inner.direction.set(direction) {
            tracing::debug!(drawer = self.id().id(), %direction, "direction changed");
        }
    }

    pub fn dismissible(&self) -> bool {
        self.inner.dismissible.get()
    }

    pub fn set_dismissible(&self, dismissible: bool) {
        self.inner.dismissible.set(dismissible);
    }

    pub fn show_handle(&self) -> bool {
        self.inner.show_handle.get()
    }

    pub fn set_show_handle(&self, show: bool) {
        self.inner.show_handle.set(show);
    }

    pub fn velocity_threshold(&self) -> f64 {
        self.inner.velocity_threshold.get()
    }

    /// Rejects non-positive values, keeping the previous threshold.
    pub fn set_velocity_threshold(&self, px_per_ms: f64) -> Result<(), ConfigError> {
        self.inner
            .velocity_threshold
            .set(validate_velocity_threshold(px_per_ms)?);
        Ok(())
    }

    pub fn close_threshold(&self) -> f64 {
        self.inner.close_threshold.get()
    }

    /// Rejects values outside `(0, 1]`, keeping the previous threshold.
    pub fn set_close_threshold(&self, ratio: f64) -> Result<(), ConfigError> {
        self.inner
            .close_threshold
            .set(validate_close_threshold(ratio)?);
        Ok(())
    }

    pub fn is_vertical(&self) -> bool {
        self.direction().is_vertical()
    }

    /// Live view of whether the drawer is vertical.
    pub fn vertical(&self) -> Binding<bool> {
        bind_mapped(&self.inner.direction, |d| d.is_vertical())
    }

    pub fn subscribe_direction(&self, f: impl Fn(&Direction) + 'static) -> Subscription {
        self.inner.direction.subscribe(f)
    }

    pub fn subscribe_dismissible(&self, f: impl Fn(&bool) + 'static) -> Subscription {
        self.inner.dismissible.subscribe(f)
    }

    pub fn subscribe_open(&self, f: impl Fn(&bool) + 'static) -> Subscription {
        self.inner.open.subscribe(f)
    }

    pub fn phase(&self) -> DrawerPhase {
        self.inner.phase.get()
    }

    pub fn data_state(&self) -> DataState {
        if self.is_open() {
            DataState::Open
        } else {
            DataState::Closed
        }
    }

    /// Phase of the attached gesture manager, if any.
    pub fn gesture_phase(&self) -> Option<GesturePhase> {
        self.inner
            .gesture
            .try_borrow()
            .ok()?
            .as_ref()
            .map(GestureManager::phase)
    }

    /// Apply an attribute change from the binding layer.
    ///
    /// Returns `true` if the attribute is one the drawer observes and its
    /// value changed.
    pub fn attribute_changed(&self, name: &str, old: Option<&str>, new: Option<&str>) -> bool {
        if old == new {
            return false;
        }
        let Some(attribute) = DrawerAttribute::decode(name, new) else {
            return false;
        };
        match attribute {
            DrawerAttribute::Direction(d) => self.set_direction(d),
            DrawerAttribute::Dismissible(d) => self.set_dismissible(d),
            // Decoded values are already in range.
            DrawerAttribute::VelocityThreshold(v) => self.inner.velocity_threshold.set(v),
            DrawerAttribute::CloseThreshold(v) => self.inner.close_threshold.set(v),
            DrawerAttribute::ShowHandle(s) => self.set_show_handle(s),
        }
        true
    }

    /// The content subtree changed (a custom handle may have appeared).
    pub fn content_changed(&self) {
        if let Some(handles) = self.inner.handles.borrow().as_ref() {
            handles.content_changed();
        }
        self.inner.sync_handle();
    }

    // --- Input ---

    /// Page-level keydown (capture phase). Routed to the top open drawer on
    /// this drawer's key stack, which need not be this drawer.
    pub fn handle_key(&self, event: &KeyEvent) -> EventResponse {
        self.inner.keys.dispatch_key(event)
    }

    /// The surface's native `cancel` event. Always suppressed; dismissal is
    /// decided by [`handle_key`](Self::handle_key) alone.
    pub fn handle_cancel(&self) -> EventResponse {
        EventResponse::CONSUMED
    }

    /// Click on the surface. Closes only when the click landed on the
    /// backdrop (the surface node itself) and the drawer is dismissible.
    pub fn handle_surface_click(&self, event: &ClickEvent) -> bool {
        let inner = &self.inner;
        if !inner.open.get() || !inner.dismissible.get() {
            return false;
        }
        let Some(surface) = inner.surface() else {
            return false;
        };
        if event.target != surface.node() {
            return false;
        }
        tracing::debug!(drawer = inner.id.id(), "backdrop click dismisses drawer");
        inner.open.set(false);
        true
    }

    /// `animationend` on the surface or a descendant.
    ///
    /// Returns `true` if the event advanced the state machine.
    pub fn handle_animation_end(&self, event: &AnimationEvent) -> bool {
        let inner = &self.inner;
        let Some(surface) = inner.surface() else {
            return false;
        };
        if event.target != surface.node() {
            return false;
        }
        let name = event.animation_name.as_str();
        match inner.phase.get() {
            DrawerPhase::Closing if name.starts_with(SLIDE_OUT_PREFIX) => {
                inner.finish_close(&*surface);
                true
            }
            DrawerPhase::Opening if name.starts_with(SLIDE_IN_PREFIX) => {
                inner.phase.set(DrawerPhase::Open);
                true
            }
            _ => false,
        }
    }

    /// Pointer-down on the surface. Ignored unless open.
    pub fn handle_pointer_down(&self, event: &PointerEvent, env: &dyn DragEnvironment) -> bool {
        if !self.is_open() {
            return false;
        }
        self.inner
            .with_gesture(|g| g.handle_pointer_down(event, env))
            .unwrap_or(false)
    }

    pub fn handle_pointer_move(&self, event: &PointerEvent, env: &dyn DragEnvironment) -> bool {
        self.inner
            .with_gesture(|g| g.handle_pointer_move(event, env))
            .unwrap_or(false)
    }

    pub fn handle_pointer_up(&self, event: &PointerEvent) -> Option<DragEnd> {
        self.inner.with_gesture(|g| g.handle_pointer_up(event))?
    }

    /// Pointer left the window or a context menu opened.
    pub fn handle_pointer_cancel(&self) -> Option<DragEnd> {
        self.inner.with_gesture(GestureManager::handle_pointer_cancel)?
    }

    pub fn handle_touch_move(
        &self,
        event: &TouchMoveEvent,
        env: &dyn DragEnvironment,
    ) -> EventResponse {
        self.inner
            .with_gesture(|g| g.handle_touch_move(event, env))
            .unwrap_or_default()
    }

    /// Run deferred work (the post-release gesture reset). Hosts call this
    /// once per turn of their event loop.
    pub fn flush(&self) -> usize {
        self.inner.queue.run_pending()
    }

    pub fn queue(&self) -> &DeferredQueue {
        &self.inner.queue
    }

    pub fn key_stack(&self) -> &DrawerStack {
        &self.inner.keys
    }

    pub fn downgrade(&self) -> WeakDrawer {
        WeakDrawer {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl fmt::Debug for DrawerController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawerController")
            .field("id", &self.inner.id)
            .field("open", &self.inner.open.get())
            .field("direction", &self.inner.direction.get())
            .field("dismissible", &self.inner.dismissible.get())
            .field("phase", &self.inner.phase.get())
            .field("attached", &self.is_attached())
            .finish_non_exhaustive()
    }
}

/// Non-owning reference to a drawer.
#[derive(Clone, Default)]
pub struct WeakDrawer {
    inner: Weak<ControllerInner>,
}

impl WeakDrawer {
    pub fn upgrade(&self) -> Option<DrawerController> {
        self.inner.upgrade().map(|inner| DrawerController { inner })
    }
}

impl fmt::Debug for WeakDrawer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakDrawer")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}
