#![forbid(unsafe_code)]

use std::time::Duration;

use vaul_core::{DragEnvironment, NodeId, Point, PointerEvent, PointerId};
use vaul_widgets::drawer::{DragEnd, DrawerController, GestureManager};
use web_time::Instant;

/// Timestamped pointer events relative to a fixed origin.
#[derive(Debug, Clone, Copy)]
pub struct DragScript {
    origin: Instant,
    target: NodeId,
    pointer: PointerId,
}

/// A complete `down → move* → up` sequence.
#[derive(Debug, Clone)]
pub struct Drag {
    pub down: PointerEvent,
    pub moves: Vec<PointerEvent>,
    pub up: PointerEvent,
}

impl DragScript {
    pub fn new(target: NodeId) -> Self {
        Self {
            origin: Instant::now(),
            target,
            pointer: PointerId(1),
        }
    }

    #[must_use]
    pub fn pointer(mut self, pointer: PointerId) -> Self {
        self.pointer = pointer;
        self
    }

    /// Event at `ms` milliseconds after the origin.
    pub fn at(&self, ms: f64, position: Point) -> PointerEvent {
        let offset = Duration::from_nanos((ms * 1_000_000.0).round() as u64);
        PointerEvent::new(self.target, position, self.origin + offset).with_pointer_id(self.pointer)
    }

    /// Straight-line drag from `from` by `delta` over `duration_ms`, with
    /// `steps` evenly spaced moves. Release happens at the final move.
    pub fn linear(&self, from: Point, delta: Point, duration_ms: f64, steps: u32) -> Drag {
        let steps = steps.max(1);
        let moves = (1..=steps)
            .map(|i| {
                let f = f64::from(i) / f64::from(steps);
                let position = Point::new(from.x + delta.x * f, from.y + delta.y * f);
                self.at(duration_ms * f, position)
            })
            .collect();
        let end = Point::new(from.x + delta.x, from.y + delta.y);
        Drag {
            down: self.at(0.0, from),
            moves,
            up: self.at(duration_ms, end),
        }
    }

    /// Vertical drag of `dy` pixels over `duration_ms`.
    pub fn vertical(&self, dy: f64, duration_ms: f64) -> Drag {
        self.linear(Point::new(200.0, 300.0), Point::new(0.0, dy), duration_ms, 4)
    }

    /// Horizontal drag of `dx` pixels over `duration_ms`.
    pub fn horizontal(&self, dx: f64, duration_ms: f64) -> Drag {
        self.linear(Point::new(400.0, 300.0), Point::new(dx, 0.0), duration_ms, 4)
    }
}

/// Feed `drag` to a gesture manager.
pub fn run_gesture(
    gesture: &mut GestureManager,
    env: &dyn DragEnvironment,
    drag: &Drag,
) -> Option<DragEnd> {
    gesture.handle_pointer_down(&drag.down, env);
    for event in &drag.moves {
        gesture.handle_pointer_move(event, env);
    }
    gesture.handle_pointer_up(&drag.up)
}

/// Feed `drag` to a drawer.
pub fn run_drawer(
    drawer: &DrawerController,
    env: &dyn DragEnvironment,
    drag: &Drag,
) -> Option<DragEnd> {
    drawer.handle_pointer_down(&drag.down, env);
    for event in &drag.moves {
        drawer.handle_pointer_move(event, env);
    }
    drawer.handle_pointer_up(&drag.up)
}
