#![forbid(unsafe_code)]

//! Property tests for gesture decisions, damping and the scroll lock.

use std::rc::Rc;

use proptest::prelude::*;
use proptest::sample::select;
use vaul_core::{Axis, Direction, NodeId, Point, Size};
use vaul_harness::{DragScript, FakeDocument, run_gesture};
use vaul_widgets::drawer::attributes::parse_direction;
use vaul_widgets::drawer::{
    BackgroundLock, GestureConfig, GestureManager, ScrollLock, ScrollLockOptions, damp,
};

const SURFACE: NodeId = NodeId::new(1);

fn direction() -> impl Strategy<Value = Direction> {
    select(Direction::ALL.to_vec())
}

fn manager(direction: Direction, dismissible: bool) -> GestureManager {
    GestureManager::new(
        GestureConfig::default()
            .direction(direction)
            .dismissible(dismissible)
            .boundary(SURFACE),
    )
    .unwrap()
    .with_target_dimensions(|| Some(Size::new(360.0, 400.0)))
}

/// Drag of `amount` pixels along `direction`'s axis.
fn along(direction: Direction, amount: f64) -> Point {
    match direction.axis() {
        Axis::Vertical => Point::new(0.0, amount),
        Axis::Horizontal => Point::new(amount, 0.0),
    }
}

proptest! {
    /// A non-dismissible drawer never asks to close, whatever the drag.
    #[test]
    fn non_dismissible_never_dismisses(
        direction in direction(),
        amount in -800.0f64..800.0,
        duration in 1.0f64..2000.0,
    ) {
        let doc = FakeDocument::new();
        let mut gm = manager(direction, false);
        let drag = DragScript::new(SURFACE).linear(
            Point::new(400.0, 300.0),
            along(direction, amount),
            duration,
            4,
        );
        let end = run_gesture(&mut gm, &doc, &drag);
        prop_assert!(end.is_some_and(|e| !e.should_dismiss), "{direction} {amount} {duration}");
    }

    /// Dragging against the closing direction never dismisses, however fast.
    #[test]
    fn overdrag_never_dismisses(
        direction in direction(),
        magnitude in 1.0f64..800.0,
        duration in 1.0f64..2000.0,
    ) {
        let doc = FakeDocument::new();
        let mut gm = manager(direction, true);
        let delta = along(direction, -direction.closing_sign() * magnitude);
        let drag = DragScript::new(SURFACE).linear(Point::new(400.0, 300.0), delta, duration, 4);

        gm.handle_pointer_down(&drag.down, &doc);
        for event in &drag.moves {
            gm.handle_pointer_move(event, &doc);
        }
        prop_assert!(gm.is_overdragging());
        let end = gm.handle_pointer_up(&drag.up);
        prop_assert!(end.is_some_and(|e| !e.should_dismiss));
    }

    /// Past a few pixels, damping keeps the sign and shrinks the magnitude.
    #[test]
    fn damping_shrinks_overdrag(v in 7.0f64..3000.0, negative in any::<bool>()) {
        let v = if negative { -v } else { v };
        let d = damp(v);
        prop_assert!(d.abs() < v.abs(), "damp({v}) = {d}");
        prop_assert_eq!(d.signum(), v.signum());
    }

    /// Any sequence of lock/unlock calls leaves the page consistent with
    /// the final lock state.
    #[test]
    fn scroll_lock_tracks_final_state(
        ops in proptest::collection::vec(any::<bool>(), 0..16),
        offset in 0.0f64..5000.0,
    ) {
        let doc = Rc::new(FakeDocument::new());
        doc.add_body_child(NodeId::new(10), false)
            .add_body_child(NodeId::new(11), true)
            .add_body_child(NodeId::new(20), false);
        doc.set_page_scroll(offset, 15.0);
        let lock = ScrollLock::with_options(
            Rc::clone(&doc),
            ScrollLockOptions::new().exclude_from_inert(NodeId::new(20)),
        );

        let mut ever_unlocked = false;
        for &locked in &ops {
            if locked {
                lock.lock();
            } else {
                ever_unlocked |= lock.is_locked();
                lock.unlock();
            }
            prop_assert_eq!(doc.has_body_overrides(), lock.is_locked());
            prop_assert_eq!(doc.inert_count(), if lock.is_locked() { 1 } else { 0 });
        }
        if ever_unlocked {
            prop_assert_eq!(doc.scrolled_to(), Some(offset));
        } else {
            prop_assert_eq!(doc.scrolled_to(), None);
        }
    }

    /// Unknown direction values fall back to bottom.
    #[test]
    fn unknown_direction_falls_back_to_bottom(raw in "[a-zA-Z ]{0,12}") {
        prop_assume!(!Direction::ALL.iter().any(|d| d.as_str() == raw));
        prop_assert_eq!(parse_direction(Some(raw.as_str())), Direction::Bottom);
    }
}
