#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use vaul_core::{Direction, NodeId, Point, PointerEvent, ScrollMetrics, Size};
use vaul_harness::FakeDocument;
use vaul_widgets::drawer::{GestureConfig, GestureManager, GesturePhase};
use web_time::Instant;

#[derive(Debug, Arbitrary)]
enum Step {
    Down { x: i16, y: i16 },
    Move { x: i16, y: i16 },
    Up { x: i16, y: i16 },
    Cancel,
    Flush,
    Selection(bool),
    ListScroll(u16),
    Advance(u16),
}

#[derive(Debug, Arbitrary)]
struct Input {
    direction: u8,
    dismissible: bool,
    on_list: bool,
    steps: Vec<Step>,
}

const SURFACE: NodeId = NodeId::new(1);
const LIST: NodeId = NodeId::new(2);

fuzz_target!(|input: Input| {
    let direction = Direction::ALL[usize::from(input.direction) % Direction::ALL.len()];
    let doc = FakeDocument::new();
    doc.add_node(SURFACE, NodeId::new(0)).add_node(LIST, SURFACE);

    let Ok(gm) = GestureManager::new(
        GestureConfig::default()
            .direction(direction)
            .dismissible(input.dismissible)
            .boundary(SURFACE),
    ) else {
        return;
    };
    let mut gm = gm.with_target_dimensions(|| Some(Size::new(360.0, 400.0)));
    let target = if input.on_list { LIST } else { SURFACE };

    let origin = Instant::now();
    let mut elapsed = Duration::ZERO;
    let event = |elapsed: Duration, x: i16, y: i16| {
        PointerEvent::new(target, Point::new(f64::from(x), f64::from(y)), origin + elapsed)
    };

    for step in input.steps.into_iter().take(256) {
        match step {
            Step::Down { x, y } => {
                gm.handle_pointer_down(&event(elapsed, x, y), &doc);
            }
            Step::Move { x, y } => {
                gm.handle_pointer_move(&event(elapsed, x, y), &doc);
            }
            Step::Up { x, y } => {
                if let Some(end) = gm.handle_pointer_up(&event(elapsed, x, y)) {
                    assert!(!(end.should_dismiss && !input.dismissible));
                    assert_eq!(end.should_dismiss, end.transform.is_none());
                }
            }
            Step::Cancel => {
                if let Some(end) = gm.handle_pointer_cancel() {
                    assert!(!end.should_dismiss);
                }
            }
            Step::Flush => {
                gm.queue().run_pending();
            }
            Step::Selection(active) => doc.set_selection(active),
            Step::ListScroll(top) => doc.set_scroll(
                LIST,
                ScrollMetrics {
                    scroll_top: f64::from(top),
                    scroll_height: 2000.0,
                    client_height: 300.0,
                    ..ScrollMetrics::default()
                },
            ),
            Step::Advance(ms) => elapsed += Duration::from_millis(u64::from(ms)),
        }

        let position = gm.position();
        assert!(position.x.is_finite() && position.y.is_finite());
        assert!(gm.velocity().is_finite() && gm.velocity() >= 0.0);
        assert!(gm.transform().offset().is_finite());
        if gm.phase() == GesturePhase::Idle {
            assert!(!gm.is_dragging());
        }
    }
});
