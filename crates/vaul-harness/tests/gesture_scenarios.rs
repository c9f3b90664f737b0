#![forbid(unsafe_code)]

//! Integration tests: gesture decisions against scripted drags.

use vaul_core::{Direction, NodeId, Point, ScrollMetrics, Size};
use vaul_harness::{DragScript, FakeDocument, run_gesture};
use vaul_widgets::drawer::{DragTransform, GestureConfig, GestureManager, GesturePhase, damp};

const ROOT: NodeId = NodeId::new(0);
const SURFACE: NodeId = NodeId::new(1);
const LIST: NodeId = NodeId::new(2);
const ROW: NodeId = NodeId::new(3);

fn page() -> FakeDocument {
    let doc = FakeDocument::new().with_viewport(1024.0, 768.0);
    doc.add_node(SURFACE, ROOT)
        .add_node(LIST, SURFACE)
        .add_node(ROW, LIST);
    doc
}

fn manager(direction: Direction) -> GestureManager {
    GestureManager::new(
        GestureConfig::default()
            .direction(direction)
            .velocity_threshold(0.4)
            .close_threshold(0.25)
            .boundary(SURFACE),
    )
    .unwrap()
    .with_target_dimensions(|| Some(Size::new(360.0, 400.0)))
}

// ============================================================================
// Reference scenarios
// ============================================================================

#[test]
fn quick_flick_dismisses() {
    let doc = page();
    let mut gm = manager(Direction::Bottom);
    let end = run_gesture(&mut gm, &doc, &DragScript::new(SURFACE).vertical(50.0, 20.0)).unwrap();
    assert!(end.should_dismiss);
    assert_eq!(end.transform, None);
}

#[test]
fn slow_drag_at_exact_close_threshold_dismisses() {
    let doc = page();
    let mut gm = manager(Direction::Bottom);
    let drag = DragScript::new(SURFACE).vertical(100.0, 500.0);
    gm.handle_pointer_down(&drag.down, &doc);
    for event in &drag.moves {
        gm.handle_pointer_move(event, &doc);
    }
    assert_eq!(gm.distance(), 0.25);
    let end = gm.handle_pointer_up(&drag.up).unwrap();
    assert!(end.should_dismiss);
}

#[test]
fn short_slow_drag_bounces_back() {
    let doc = page();
    let mut gm = manager(Direction::Bottom);
    let end = run_gesture(&mut gm, &doc, &DragScript::new(SURFACE).vertical(50.0, 250.0)).unwrap();
    assert!(!end.should_dismiss);
    assert_eq!(end.transform, Some(DragTransform::Identity));
    assert_eq!(end.transform.unwrap().to_string(), "translate3d(0, 0, 0)");
}

#[test]
fn top_drawer_dragged_down_is_overdrag() {
    let doc = page();
    let mut gm = manager(Direction::Top);
    let drag = DragScript::new(SURFACE).vertical(100.0, 100.0);
    gm.handle_pointer_down(&drag.down, &doc);
    for event in &drag.moves {
        gm.handle_pointer_move(event, &doc);
    }
    assert!(gm.is_overdragging());
    assert_eq!(gm.transform().offset(), damp(100.0));
    let end = gm.handle_pointer_up(&drag.up).unwrap();
    assert!(!end.should_dismiss);
}

#[test]
fn left_drawer_dismisses_leftward() {
    let doc = page();
    let mut gm = manager(Direction::Left);
    let drag = DragScript::new(SURFACE).horizontal(-120.0, 1000.0);
    let end = run_gesture(&mut gm, &doc, &drag).unwrap();
    // 120 / 360 > 0.25
    assert!(end.should_dismiss);

    let mut gm = manager(Direction::Left);
    let drag = DragScript::new(SURFACE).horizontal(120.0, 1000.0);
    let end = run_gesture(&mut gm, &doc, &drag).unwrap();
    assert!(!end.should_dismiss, "rightward is overdrag for a left drawer");
}

#[test]
fn viewport_is_the_fallback_dimension() {
    let doc = page();
    let mut gm = GestureManager::new(GestureConfig::default()).unwrap();
    // 200 / 768 ≈ 0.26
    let drag = DragScript::new(SURFACE).vertical(200.0, 2000.0);
    let end = run_gesture(&mut gm, &doc, &drag).unwrap();
    assert!(end.should_dismiss);
}

// ============================================================================
// Scroll containers and selection
// ============================================================================

fn list_scrolled_to(doc: &FakeDocument, scroll_top: f64) {
    doc.set_scroll(
        LIST,
        ScrollMetrics {
            scroll_top,
            scroll_height: 1200.0,
            client_height: 300.0,
            ..ScrollMetrics::default()
        },
    );
}

#[test]
fn scrolled_content_scrolls_instead_of_dragging() {
    let doc = page();
    list_scrolled_to(&doc, 240.0);
    let mut gm = manager(Direction::Bottom);
    let end = run_gesture(&mut gm, &doc, &DragScript::new(ROW).vertical(200.0, 50.0)).unwrap();
    assert!(!end.should_dismiss);
}

#[test]
fn content_at_top_hands_over_to_drawer() {
    let doc = page();
    list_scrolled_to(&doc, 0.5);
    let mut gm = manager(Direction::Bottom);
    let end = run_gesture(&mut gm, &doc, &DragScript::new(ROW).vertical(200.0, 50.0)).unwrap();
    assert!(end.should_dismiss);
}

#[test]
fn selection_mid_drag_freezes_position() {
    let doc = page();
    let mut gm = manager(Direction::Bottom);
    let script = DragScript::new(SURFACE);
    gm.handle_pointer_down(&script.at(0.0, Point::new(0.0, 100.0)), &doc);
    gm.handle_pointer_move(&script.at(100.0, Point::new(0.0, 120.0)), &doc);
    doc.set_selection(true);
    assert!(!gm.handle_pointer_move(&script.at(200.0, Point::new(0.0, 400.0)), &doc));
    assert_eq!(gm.position(), Point::new(0.0, 20.0));
}

#[test]
fn pointer_is_captured_on_target() {
    let doc = page();
    let mut gm = manager(Direction::Bottom);
    let drag = DragScript::new(ROW).vertical(10.0, 100.0);
    gm.handle_pointer_down(&drag.down, &doc);
    assert_eq!(doc.captured_pointer(), Some((ROW, drag.down.pointer_id)));
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn released_is_observable_until_flush() {
    let doc = page();
    let mut gm = manager(Direction::Bottom);
    run_gesture(&mut gm, &doc, &DragScript::new(SURFACE).vertical(10.0, 500.0));
    assert_eq!(gm.phase(), GesturePhase::Released);
    gm.queue().run_pending();
    assert_eq!(gm.phase(), GesturePhase::Idle);
}

#[test]
fn destroyed_manager_ignores_everything() {
    let doc = page();
    let mut gm = manager(Direction::Bottom);
    gm.destroy();
    assert_eq!(
        run_gesture(&mut gm, &doc, &DragScript::new(SURFACE).vertical(300.0, 10.0)),
        None
    );
    assert!(gm.is_destroyed());
}
