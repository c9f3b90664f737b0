#![forbid(unsafe_code)]

//! Drag tracking and the dismiss/bounce-back decision.
//!
//! [`GestureManager`] turns a `down → move* → up` pointer sequence into a
//! live [`DragTransform`] for visual feedback and, at release, a binary
//! decision: dismiss the drawer or let it spring back.
//!
//! # Decision rule
//!
//! ```text
//! dismiss = dismissible
//!           && !overdragging
//!           && (velocity >= velocity_threshold || distance >= close_threshold)
//! ```
//!
//! - `velocity` is the absolute primary-axis displacement at release divided
//!   by the time since pointer-down, in px/ms. Using the whole gesture's
//!   duration rather than the last sample interval keeps jittery input from
//!   producing spurious flicks.
//! - `distance` is the same displacement as a fraction of the drawer's size
//!   along its axis (falling back to the viewport).
//! - Overdragging means moving against the closing direction (pulling a
//!   bottom drawer up). It is rendered through [`damp`] and never dismisses.
//!
//! # Invariants
//!
//! 1. The session has an anchor point iff the phase is
//!    [`GesturePhase::Dragging`].
//! 2. `on_drag_start` fires once per accepted pointer-down; `on_drag_end`
//!    fires at most once per drag.
//! 3. Thresholds always satisfy `velocity > 0` and `0 < close <= 1`; a
//!    rejected setter leaves the previous value in place.
//! 4. After [`GestureManager::destroy`], no callback fires and no deferred
//!    reset runs.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Fallback |
//! |---------|-------|----------|
//! | Pointer-down ignored | Text selection active | No drag, no callbacks |
//! | Move ignored | Scrollable ancestor not at its edge, or selection | Content scrolls instead |
//! | Up without down | Stale event | Ignored |
//! | Zero-duration release | Down and up share a timestamp | Velocity reads as 0 |
//! | No target size | Accessor absent or returns `None` | Viewport size is used |

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use vaul_core::{
    Axis, ConfigError, Direction, DragEnvironment, EventResponse, NodeId, Point, PointerEvent,
    Size, TouchMoveEvent,
};
use vaul_runtime::{DeferredQueue, Observable, Subscription, TaskHandle};
use web_time::Instant;

use super::permission::allows_drag;

/// Release velocity at or above which a drag dismisses (px/ms).
pub const DEFAULT_VELOCITY_THRESHOLD: f64 = 0.4;
/// Fraction of the drawer's size a drag must cover to dismiss.
pub const DEFAULT_CLOSE_THRESHOLD: f64 = 0.25;
/// Pixels of slack when deciding a scroll container sits at its edge.
pub const DEFAULT_SCROLL_TOLERANCE: f64 = 1.0;

const DAMPING_SCALE: f64 = 8.0;
const DAMPING_OFFSET: f64 = 2.0;

/// Check a velocity threshold (finite, `> 0`).
pub fn validate_velocity_threshold(value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidVelocityThreshold(value))
    }
}

/// Check a close threshold (in `(0, 1]`).
pub fn validate_close_threshold(value: f64) -> Result<f64, ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidCloseThreshold(value))
    }
}

/// Check a scroll tolerance (finite, `>= 0`).
pub fn validate_scroll_tolerance(value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidScrollTolerance(value))
    }
}

/// Logarithmic overdrag damping: `sign(v) * 8 * (ln(|v| + 1) - 2)`.
///
/// Grows sub-linearly so a long overdrag yields a small, bounded nudge.
/// Below roughly 6.4px the result has the opposite sign of `v`.
pub fn damp(value: f64) -> f64 {
    if value == 0.0 {
        return 0.0;
    }
    value.signum() * DAMPING_SCALE * ((value.abs() + 1.0).ln() - DAMPING_OFFSET)
}

/// Where the gesture is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Dragging,
    /// Pointer released; returns to `Idle` on the next deferred drain.
    Released,
}

/// Visual offset to apply to the drawer surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragTransform {
    /// Rest position, `translate3d(0, 0, 0)`.
    Identity,
    /// Offset in pixels along the drawer's axis.
    Translate { axis: Axis, offset: f64 },
}

impl DragTransform {
    /// Offset along the drawer's axis (`0` for the identity).
    pub const fn offset(&self) -> f64 {
        match self {
            Self::Identity => 0.0,
            Self::Translate { offset, .. } => *offset,
        }
    }

    pub const fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }
}

impl fmt::Display for DragTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => f.write_str("translate3d(0, 0, 0)"),
            Self::Translate {
                axis: Axis::Vertical,
                offset,
            } => write!(f, "translate3d(0, {offset}px, 0)"),
            Self::Translate {
                axis: Axis::Horizontal,
                offset,
            } => write!(f, "translate3d({offset}px, 0, 0)"),
        }
    }
}

/// Outcome delivered to `on_drag_end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragEnd {
    pub should_dismiss: bool,
    /// `None` when dismissing (the exit animation owns the transform),
    /// otherwise the bounce-back target.
    pub transform: Option<DragTransform>,
}

impl DragEnd {
    fn bounce_back() -> Self {
        Self {
            should_dismiss: false,
            transform: Some(DragTransform::Identity),
        }
    }
}

/// Gesture configuration.
///
/// Threshold builders store values as given; [`GestureManager::new`]
/// rejects the configuration if any of them is out of range.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureConfig {
    direction: Direction,
    dismissible: bool,
    velocity_threshold: f64,
    close_threshold: f64,
    boundary: Option<NodeId>,
    scroll_tolerance: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            direction: Direction::Bottom,
            dismissible: true,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            close_threshold: DEFAULT_CLOSE_THRESHOLD,
            boundary: None,
            scroll_tolerance: DEFAULT_SCROLL_TOLERANCE,
        }
    }
}

impl GestureConfig {
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn dismissible(mut self, dismissible: bool) -> Self {
        self.dismissible = dismissible;
        self
    }

    pub fn velocity_threshold(mut self, px_per_ms: f64) -> Self {
        self.velocity_threshold = px_per_ms;
        self
    }

    pub fn close_threshold(mut self, ratio: f64) -> Self {
        self.close_threshold = ratio;
        self
    }

    /// Node at which the scroll-container walk stops (usually the surface).
    pub fn boundary(mut self, node: NodeId) -> Self {
        self.boundary = Some(node);
        self
    }

    pub fn scroll_tolerance(mut self, px: f64) -> Self {
        self.scroll_tolerance = px;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_velocity_threshold(self.velocity_threshold)?;
        validate_close_threshold(self.close_threshold)?;
        validate_scroll_tolerance(self.scroll_tolerance)?;
        Ok(())
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    pub fn is_dismissible(&self) -> bool {
        self.dismissible
    }

    pub fn get_velocity_threshold(&self) -> f64 {
        self.velocity_threshold
    }

    pub fn get_close_threshold(&self) -> f64 {
        self.close_threshold
    }

    pub fn get_boundary(&self) -> Option<NodeId> {
        self.boundary
    }

    pub fn get_scroll_tolerance(&self) -> f64 {
        self.scroll_tolerance
    }
}

/// Snapshot of one drag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureSession {
    /// Anchor point; `None` unless dragging.
    pub pointer_start: Option<Point>,
    pub current: Point,
    pub last: Point,
    pub drag_start: Option<Instant>,
    /// Time of the most recent accepted move.
    pub last_sample: Option<Instant>,
    pub release: Option<Instant>,
    /// Viewport size captured at pointer-down.
    pub viewport: Size,
}

impl GestureSession {
    /// Signed displacement from the anchor; zero when idle.
    pub fn displacement(&self) -> Point {
        match self.pointer_start {
            Some(start) => self.current - start,
            None => Point::ORIGIN,
        }
    }

    /// Milliseconds from pointer-down to release (or to the latest sample
    /// while still dragging).
    pub fn elapsed_ms(&self) -> f64 {
        let (Some(start), Some(end)) = (self.drag_start, self.release.or(self.last_sample)) else {
            return 0.0;
        };
        end.checked_duration_since(start)
            .map_or(0.0, |d| d.as_nanos() as f64 / 1_000_000.0)
    }
}

type DimensionsFn = dyn Fn() -> Option<Size>;

/// Stateful drag tracker for one drawer.
pub struct GestureManager {
    config: GestureConfig,
    target_dimensions: Option<Box<DimensionsFn>>,
    phase: Observable<GesturePhase>,
    session: Rc<Cell<GestureSession>>,
    on_drag_start: Option<Box<dyn FnMut()>>,
    on_drag: Option<Box<dyn FnMut(&DragTransform)>>,
    on_drag_end: Option<Box<dyn FnMut(DragEnd)>>,
    queue: DeferredQueue,
    pending_reset: Option<TaskHandle>,
    destroyed: bool,
}

impl GestureManager {
    /// Create a manager, rejecting out-of-range thresholds.
    pub fn new(config: GestureConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        tracing::debug!(direction = %config.direction, "gesture manager initialized");
        Ok(Self {
            config,
            target_dimensions: None,
            phase: Observable::new(GesturePhase::Idle),
            session: Rc::new(Cell::new(GestureSession::default())),
            on_drag_start: None,
            on_drag: None,
            on_drag_end: None,
            queue: DeferredQueue::new(),
            pending_reset: None,
            destroyed: false,
        })
    }

    /// Late-bound accessor for the drawer's current box.
    #[must_use]
    pub fn with_target_dimensions(mut self, f: impl Fn() -> Option<Size> + 'static) -> Self {
        self.target_dimensions = Some(Box::new(f));
        self
    }

    /// Schedule the post-release reset on a shared queue.
    #[must_use]
    pub fn with_queue(mut self, queue: DeferredQueue) -> Self {
        self.queue = queue;
        self
    }

    #[must_use]
    pub fn on_drag_start(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_drag_start = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_drag(mut self, f: impl FnMut(&DragTransform) + 'static) -> Self {
        self.on_drag = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_drag_end(mut self, f: impl FnMut(DragEnd) + 'static) -> Self {
        self.on_drag_end = Some(Box::new(f));
        self
    }

    // --- Event handling ---

    /// Start a drag. Returns `false` if the press was ignored.
    pub fn handle_pointer_down(&mut self, event: &PointerEvent, env: &dyn DragEnvironment) -> bool {
        if self.destroyed {
            return false;
        }
        if env.has_text_selection() {
            tracing::debug!("pointer down ignored: text selection active");
            return false;
        }

        self.cancel_pending_reset();
        env.capture_pointer(event.target, event.pointer_id);

        let at = event.position;
        self.session.set(GestureSession {
            pointer_start: Some(at),
            current: at,
            last: at,
            drag_start: Some(event.timestamp),
            last_sample: Some(event.timestamp),
            release: None,
            viewport: env.viewport(),
        });
        self.phase.set(GesturePhase::Dragging);

        tracing::debug!(x = at.x, y = at.y, pointer = event.pointer_id.0, "pointer down");
        if let Some(cb) = self.on_drag_start.as_mut() {
            cb();
        }
        true
    }

    /// Track a move. Returns `false` if the move was not applied.
    pub fn handle_pointer_move(&mut self, event: &PointerEvent, env: &dyn DragEnvironment) -> bool {
        if !self.is_dragging() {
            return false;
        }
        if !self.should_drag(event.target, env) {
            return false;
        }

        let mut session = self.session.get();
        session.last = session.current;
        session.current = event.position;
        session.last_sample = Some(event.timestamp);
        self.session.set(session);

        let transform = self.transform();
        tracing::trace!(%transform, overdrag = self.is_overdragging(), "dragging");
        if let Some(cb) = self.on_drag.as_mut() {
            cb(&transform);
        }
        true
    }

    /// Decide whether the browser's native touch scrolling should be
    /// suppressed for this `touchmove`.
    pub fn handle_touch_move(
        &self,
        event: &TouchMoveEvent,
        env: &dyn DragEnvironment,
    ) -> EventResponse {
        if !self.is_dragging() || !self.should_drag(event.target, env) {
            return EventResponse::empty();
        }
        if self.is_overdragging() {
            EventResponse::empty()
        } else {
            EventResponse::PREVENT_DEFAULT
        }
    }

    /// Finish a drag and decide its outcome.
    ///
    /// Returns `None` if no drag was in progress.
    pub fn handle_pointer_up(&mut self, event: &PointerEvent) -> Option<DragEnd> {
        if !self.is_dragging() {
            return None;
        }

        let mut session = self.session.get();
        session.release = Some(event.timestamp);
        self.session.set(session);

        let should_dismiss = self.should_dismiss();
        let end = if should_dismiss {
            DragEnd {
                should_dismiss,
                transform: None,
            }
        } else {
            DragEnd::bounce_back()
        };
        tracing::debug!(
            velocity = self.velocity(),
            distance = self.distance(),
            overdrag = self.is_overdragging(),
            should_dismiss,
            "pointer up"
        );

        session.pointer_start = None;
        self.session.set(session);
        self.phase.set(GesturePhase::Released);

        if let Some(cb) = self.on_drag_end.as_mut() {
            cb(end);
        }
        self.schedule_reset();
        Some(end)
    }

    /// Abort a drag (pointer left the window, context menu opened).
    ///
    /// The surface springs back; no dismissal is considered.
    pub fn handle_pointer_cancel(&mut self) -> Option<DragEnd> {
        if !self.is_dragging() {
            return None;
        }
        self.cancel_pending_reset();
        self.session.set(GestureSession::default());
        self.phase.set(GesturePhase::Idle);
        tracing::debug!("drag cancelled");

        let end = DragEnd::bounce_back();
        if let Some(cb) = self.on_drag_end.as_mut() {
            cb(end);
        }
        Some(end)
    }

    /// Whether a move on `target` may drag the drawer right now.
    pub fn should_drag(&self, target: NodeId, env: &dyn DragEnvironment) -> bool {
        allows_drag(
            env,
            target,
            self.config.direction,
            self.config.boundary,
            self.config.scroll_tolerance,
        )
    }

    /// Drop all callbacks and pending work. Idempotent.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.cancel_pending_reset();
        self.session.set(GestureSession::default());
        self.on_drag_start = None;
        self.on_drag = None;
        self.on_drag_end = None;
        tracing::debug!("gesture manager destroyed");
    }

    // --- Derived values ---

    /// Signed displacement from the anchor.
    pub fn position(&self) -> Point {
        self.session.get().displacement()
    }

    fn primary_offset(&self) -> f64 {
        self.position().along(self.config.direction.axis())
    }

    /// Moving against the closing direction.
    pub fn is_overdragging(&self) -> bool {
        self.primary_offset() * self.config.direction.closing_sign() < 0.0
    }

    /// Primary-axis displacement as a fraction of the drawer's size.
    pub fn distance(&self) -> f64 {
        let size = self
            .target_dimensions
            .as_ref()
            .and_then(|f| f())
            .unwrap_or(self.session.get().viewport);
        let extent = size.along(self.config.direction.axis());
        if extent > 0.0 && extent.is_finite() {
            self.primary_offset().abs() / extent
        } else {
            0.0
        }
    }

    /// Primary-axis displacement over total gesture time, in px/ms.
    pub fn velocity(&self) -> f64 {
        let elapsed = self.session.get().elapsed_ms();
        if elapsed <= 0.0 {
            return 0.0;
        }
        self.primary_offset().abs() / elapsed
    }

    /// Transform for the current displacement, damped when overdragging.
    pub fn transform(&self) -> DragTransform {
        if self.session.get().pointer_start.is_none() {
            return DragTransform::Identity;
        }
        let offset = self.primary_offset();
        let offset = if self.is_overdragging() {
            damp(offset)
        } else {
            offset
        };
        DragTransform::Translate {
            axis: self.config.direction.axis(),
            offset,
        }
    }

    pub fn should_dismiss(&self) -> bool {
        self.config.dismissible
            && !self.is_overdragging()
            && (self.velocity() >= self.config.velocity_threshold
                || self.distance() >= self.config.close_threshold)
    }

    // --- State ---

    pub fn phase(&self) -> GesturePhase {
        self.phase.get()
    }

    pub fn is_dragging(&self) -> bool {
        !self.destroyed
            && self.phase.get() == GesturePhase::Dragging
            && self.session.get().pointer_start.is_some()
    }

    /// Observe phase transitions, including the transient `Released`.
    pub fn subscribe_phase(&self, f: impl Fn(&GesturePhase) + 'static) -> Subscription {
        self.phase.subscribe(f)
    }

    pub fn session(&self) -> GestureSession {
        self.session.get()
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn is_vertical(&self) -> bool {
        self.config.direction.is_vertical()
    }

    pub fn direction(&self) -> Direction {
        self.config.direction
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn queue(&self) -> &DeferredQueue {
        &self.queue
    }

    // --- Setters ---

    pub fn set_direction(&mut self, direction: Direction) {
        if self.config.direction != direction {
            self.config.direction = direction;
            tracing::debug!(%direction, "gesture direction updated");
        }
    }

    pub fn set_dismissible(&mut self, dismissible: bool) {
        self.config.dismissible = dismissible;
    }

    pub fn set_velocity_threshold(&mut self, px_per_ms: f64) -> Result<(), ConfigError> {
        self.config.velocity_threshold = validate_velocity_threshold(px_per_ms)?;
        Ok(())
    }

    pub fn set_close_threshold(&mut self, ratio: f64) -> Result<(), ConfigError> {
        self.config.close_threshold = validate_close_threshold(ratio)?;
        Ok(())
    }

    pub fn set_boundary(&mut self, node: Option<NodeId>) {
        self.config.boundary = node;
    }

    fn schedule_reset(&mut self) {
        let session = Rc::clone(&self.session);
        let phase = self.phase.clone();
        self.pending_reset = Some(self.queue.schedule(move || {
            session.set(GestureSession::default());
            phase.set(GesturePhase::Idle);
        }));
    }

    fn cancel_pending_reset(&mut self) {
        if let Some(handle) = self.pending_reset.take() {
            handle.cancel();
        }
    }
}

impl Drop for GestureManager {
    fn drop(&mut self) {
        self.cancel_pending_reset();
    }
}

impl fmt::Debug for GestureManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureManager")
            .field("config", &self.config)
            .field("phase", &self.phase.get())
            .field("session", &self.session.get())
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}
