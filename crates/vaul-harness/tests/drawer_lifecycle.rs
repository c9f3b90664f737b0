#![forbid(unsafe_code)]

//! Integration tests: drawer controller against the harness fakes.

use std::rc::Rc;

use vaul_core::{
    AnimationEvent, ClickEvent, Direction, EventResponse, KeyCode, KeyEvent, KeyEventKind, NodeId,
    Point,
};
use vaul_harness::{
    DragScript, FakeDocument, FakeSurface, LockCall, RecordingLock, capture_logs, run_drawer,
};
use vaul_widgets::drawer::{
    BackgroundLock, DataState, DrawerBuilder, DrawerController, DrawerPhase, DrawerStack,
    DrawerSurface, DrawerTrigger, GesturePhase, HandlePlacement, ScrollLock, ScrollLockOptions,
    damp,
};

const PAGE: NodeId = NodeId::new(10);
const DRAWER_ROOT: NodeId = NodeId::new(20);
const SURFACE: NodeId = NodeId::new(21);
const CONTENT: NodeId = NodeId::new(22);

struct Fixture {
    doc: FakeDocument,
    surface: Rc<FakeSurface>,
    lock: Rc<RecordingLock>,
    drawer: DrawerController,
}

fn fixture(builder: DrawerBuilder) -> Fixture {
    let doc = FakeDocument::new();
    doc.add_node(SURFACE, DRAWER_ROOT).add_node(CONTENT, SURFACE);
    let surface = Rc::new(FakeSurface::new(SURFACE).with_dimensions(360.0, 400.0));
    let lock = Rc::new(RecordingLock::new());
    let drawer = builder
        .key_stack(DrawerStack::new())
        .build(lock.clone())
        .unwrap();
    assert!(drawer.attach(Some(surface.clone())));
    Fixture {
        doc,
        surface,
        lock,
        drawer,
    }
}

fn opened(builder: DrawerBuilder) -> Fixture {
    let f = fixture(builder);
    f.drawer.set_open(true);
    assert!(f.drawer.handle_animation_end(&AnimationEvent::new("slide-from-bottom", SURFACE)));
    f
}

fn escape() -> KeyEvent {
    KeyEvent::new(KeyCode::Escape)
}

// ============================================================================
// Drag integration
// ============================================================================

#[test]
fn drag_dismissal_runs_exit_handshake() {
    let f = opened(DrawerController::builder());
    let drag = DragScript::new(SURFACE).vertical(50.0, 20.0);
    let end = run_drawer(&f.drawer, &f.doc, &drag).unwrap();
    assert!(end.should_dismiss);
    assert!(f.surface.transition_enabled());
    assert!(!f.drawer.is_open());
    assert_eq!(f.drawer.phase(), DrawerPhase::Closing);
    assert_eq!(f.surface.data_state(), DataState::Closed);
    assert!(f.surface.is_shown());
    assert!(f.lock.is_locked(), "background stays locked during exit animation");

    assert!(f.drawer.handle_animation_end(&AnimationEvent::new("slide-to-bottom", SURFACE)));
    assert!(!f.surface.is_shown());
    assert_eq!(f.surface.transform(), None);
    assert_eq!(f.lock.calls(), vec![LockCall::Lock, LockCall::Unlock]);
    assert_eq!(f.drawer.phase(), DrawerPhase::Closed);
}

#[test]
fn bounce_back_restores_rest_transform_and_stays_open() {
    let f = opened(DrawerController::builder());
    let drag = DragScript::new(SURFACE).vertical(50.0, 250.0);
    let end = run_drawer(&f.drawer, &f.doc, &drag).unwrap();
    assert!(!end.should_dismiss);
    assert_eq!(f.surface.transform().as_deref(), Some("translate3d(0, 0, 0)"));
    assert!(f.surface.transition_enabled());
    assert!(f.drawer.is_open());
    assert_eq!(f.drawer.phase(), DrawerPhase::Open);
}

#[test]
fn live_drag_disables_transition_and_tracks_pointer() {
    let f = opened(DrawerController::builder());
    let script = DragScript::new(CONTENT);
    assert!(f.drawer.handle_pointer_down(&script.at(0.0, Point::new(50.0, 100.0)), &f.doc));
    assert!(!f.surface.transition_enabled());
    assert!(f.drawer.handle_pointer_move(&script.at(40.0, Point::new(50.0, 130.0)), &f.doc));
    assert_eq!(f.surface.transform().as_deref(), Some("translate3d(0, 30px, 0)"));

    f.drawer.handle_pointer_move(&script.at(80.0, Point::new(50.0, 0.0)), &f.doc);
    let damped = format!("translate3d(0, {}px, 0)", damp(-100.0));
    assert_eq!(f.surface.transform(), Some(damped));
}

#[test]
fn pointer_cancel_springs_back() {
    let f = opened(DrawerController::builder());
    let script = DragScript::new(SURFACE);
    f.drawer.handle_pointer_down(&script.at(0.0, Point::new(0.0, 0.0)), &f.doc);
    f.drawer.handle_pointer_move(&script.at(10.0, Point::new(0.0, 250.0)), &f.doc);
    let end = f.drawer.handle_pointer_cancel().unwrap();
    assert!(!end.should_dismiss);
    assert!(f.drawer.is_open());
    assert_eq!(f.surface.transform().as_deref(), Some("translate3d(0, 0, 0)"));
}

#[test]
fn closed_drawer_ignores_pointer_down() {
    let f = fixture(DrawerController::builder());
    let drag = DragScript::new(SURFACE).vertical(200.0, 20.0);
    assert!(!f.drawer.handle_pointer_down(&drag.down, &f.doc));
    assert_eq!(f.drawer.handle_pointer_up(&drag.up), None);
}

#[test]
fn gesture_returns_to_idle_on_flush() {
    let f = opened(DrawerController::builder());
    run_drawer(&f.drawer, &f.doc, &DragScript::new(SURFACE).vertical(10.0, 400.0));
    assert_eq!(f.drawer.gesture_phase(), Some(GesturePhase::Released));
    assert_eq!(f.drawer.flush(), 1);
    assert_eq!(f.drawer.gesture_phase(), Some(GesturePhase::Idle));
}

#[test]
fn non_dismissible_drawer_never_drag_dismisses() {
    let f = opened(DrawerController::builder().dismissible(false));
    let drag = DragScript::new(SURFACE).vertical(390.0, 30.0);
    let end = run_drawer(&f.drawer, &f.doc, &drag).unwrap();
    assert!(!end.should_dismiss);
    assert!(f.drawer.is_open());
}

#[test]
fn runtime_dismissible_change_reaches_gesture() {
    let f = opened(DrawerController::builder());
    f.drawer.set_dismissible(false);
    let drag = DragScript::new(SURFACE).vertical(300.0, 20.0);
    let end = run_drawer(&f.drawer, &f.doc, &drag).unwrap();
    assert!(!end.should_dismiss);
}

#[test]
fn runtime_threshold_changes_reach_gesture() {
    let f = opened(DrawerController::builder());
    // 200px of 400px over 2s: distance 0.5, velocity 0.1.
    let drag = DragScript::new(SURFACE).vertical(200.0, 2000.0);

    f.drawer.set_close_threshold(0.6).unwrap();
    let end = run_drawer(&f.drawer, &f.doc, &drag).unwrap();
    assert!(!end.should_dismiss);
    f.drawer.flush();

    assert!(f.drawer.attribute_changed("close-threshold", Some("0.6"), Some("0.4")));
    let end = run_drawer(&f.drawer, &f.doc, &drag).unwrap();
    assert!(end.should_dismiss);
}

#[test]
fn right_drawer_dismisses_by_distance() {
    let f = opened(DrawerController::builder().direction(Direction::Right));
    let drag = DragScript::new(SURFACE).horizontal(200.0, 1000.0);
    let end = run_drawer(&f.drawer, &f.doc, &drag).unwrap();
    assert!(end.should_dismiss);
}

#[test]
fn reopen_does_not_inherit_stale_transform() {
    let f = opened(DrawerController::builder());
    run_drawer(&f.drawer, &f.doc, &DragScript::new(SURFACE).vertical(60.0, 20.0));
    f.drawer.handle_animation_end(&AnimationEvent::new("slide-to-bottom", SURFACE));
    f.drawer.set_open(true);
    assert_eq!(f.surface.transform(), None);
    assert_eq!(f.surface.show_count(), 2);
    assert_eq!(f.drawer.phase(), DrawerPhase::Opening);
}

#[test]
fn reopen_during_exit_animation_drops_drag_offset() {
    let f = opened(DrawerController::builder());
    let drag = DragScript::new(SURFACE).vertical(200.0, 20.0);
    let end = run_drawer(&f.drawer, &f.doc, &drag).unwrap();
    assert!(end.should_dismiss);
    assert_eq!(f.surface.transform().as_deref(), Some("translate3d(0, 200px, 0)"));
    assert_eq!(f.drawer.phase(), DrawerPhase::Closing);

    f.drawer.set_open(true);
    assert_eq!(f.surface.transform(), None);
    assert!(f.surface.transition_enabled());
    assert!(f.drawer.handle_animation_end(&AnimationEvent::new("slide-from-bottom", SURFACE)));
    assert_eq!(f.drawer.phase(), DrawerPhase::Open);
    assert_eq!(f.surface.transform(), None);
    assert!(f.lock.is_locked());
}

#[test]
fn detach_mid_drag_restores_surface_style() {
    let f = opened(DrawerController::builder());
    let script = DragScript::new(SURFACE);
    assert!(f.drawer.handle_pointer_down(&script.at(0.0, Point::new(50.0, 100.0)), &f.doc));
    f.drawer.handle_pointer_move(&script.at(30.0, Point::new(50.0, 150.0)), &f.doc);
    assert!(!f.surface.transition_enabled());
    assert_eq!(f.surface.transform().as_deref(), Some("translate3d(0, 50px, 0)"));

    f.drawer.detach();
    assert!(f.surface.transition_enabled());
    assert_eq!(f.surface.transform(), None);

    assert!(f.drawer.attach(Some(f.surface.clone())));
    assert!(f.surface.transition_enabled());
    assert_eq!(f.surface.transform(), None);
}

// ============================================================================
// Keyboard, backdrop, native cancel
// ============================================================================

#[test]
fn escape_twice_on_non_dismissible_drawer() {
    let f = opened(DrawerController::builder().dismissible(false));
    let first = f.drawer.handle_key(&escape());
    let second = f.drawer.handle_key(&escape().with_kind(KeyEventKind::Repeat));
    assert!(first.default_prevented());
    assert!(second.default_prevented());
    assert!(f.drawer.is_open());
}

#[test]
fn escape_closes_dismissible_drawer() {
    let f = opened(DrawerController::builder());
    assert_eq!(f.drawer.handle_key(&escape()), EventResponse::CONSUMED);
    assert!(!f.drawer.is_open());
    assert_eq!(f.drawer.phase(), DrawerPhase::Closing);
}

#[test]
fn escape_reaches_most_recent_drawer_only() {
    let stack = DrawerStack::new();
    let lock: Rc<dyn BackgroundLock> = Rc::new(RecordingLock::new());
    let make = |node: u64| {
        let drawer = DrawerController::builder()
            .key_stack(stack.clone())
            .build(lock.clone())
            .unwrap();
        let surface = Rc::new(FakeSurface::new(NodeId::new(node)));
        drawer.attach(Some(surface.clone()));
        (drawer, surface)
    };
    let (lower, _s1) = make(1);
    let (upper, _s2) = make(2);
    lower.set_open(true);
    upper.set_open(true);

    assert!(lower.handle_key(&escape()).default_prevented());
    assert!(!upper.is_open());
    assert!(lower.is_open());

    upper.handle_animation_end(&AnimationEvent::new("slide-to-bottom", NodeId::new(2)));
    stack.dispatch_key(&escape());
    assert!(!lower.is_open());
}

#[test]
fn backdrop_click_only_on_surface_itself() {
    let f = opened(DrawerController::builder());
    assert!(!f.drawer.handle_surface_click(&ClickEvent::new(CONTENT)));
    assert!(f.drawer.is_open());
    assert!(f.drawer.handle_surface_click(&ClickEvent::new(SURFACE)));
    assert!(!f.drawer.is_open());
}

#[test]
fn native_cancel_always_suppressed() {
    let f = opened(DrawerController::builder());
    assert_eq!(f.drawer.handle_cancel(), EventResponse::CONSUMED);
    assert!(f.drawer.is_open());
}

#[test]
fn nested_animation_end_is_ignored() {
    let f = opened(DrawerController::builder());
    f.drawer.set_open(false);
    assert!(!f.drawer.handle_animation_end(&AnimationEvent::new("slide-to-bottom", CONTENT)));
    assert!(f.surface.is_shown());
    assert!(f.lock.is_locked());
}

// ============================================================================
// Handle management
// ============================================================================

#[test]
fn builtin_handle_follows_direction() {
    let f = fixture(DrawerController::builder());
    assert_eq!(f.surface.handle(), Some((HandlePlacement::Leading, Direction::Bottom)));
    f.drawer.set_direction(Direction::Top);
    assert_eq!(f.surface.handle(), Some((HandlePlacement::Trailing, Direction::Top)));
    f.drawer.set_direction(Direction::Left);
    assert_eq!(f.surface.handle(), None);
    f.drawer.set_direction(Direction::Bottom);
    f.drawer.set_show_handle(false);
    assert_eq!(f.surface.handle(), None);
}

#[test]
fn custom_handle_suppresses_builtin_across_direction_changes() {
    let surface = Rc::new(FakeSurface::new(SURFACE));
    surface.set_custom_handle(true);
    let drawer = DrawerController::builder()
        .key_stack(DrawerStack::new())
        .build(Rc::new(RecordingLock::new()))
        .unwrap();
    drawer.attach(Some(surface.clone()));
    assert_eq!(surface.handle(), None);
    for direction in [Direction::Top, Direction::Bottom, Direction::Top] {
        drawer.set_direction(direction);
        assert_eq!(surface.handle(), None, "{direction}");
    }

    surface.set_custom_handle(false);
    drawer.content_changed();
    assert_eq!(surface.handle(), Some((HandlePlacement::Trailing, Direction::Top)));
}

// ============================================================================
// Wiring, attributes, diagnostics
// ============================================================================

#[test]
fn trigger_opens_drawer() {
    let f = fixture(DrawerController::builder());
    let trigger = DrawerTrigger::for_drawer(&f.drawer);
    assert!(trigger.click());
    assert!(f.drawer.is_open());
    assert!(f.surface.is_shown());
    assert_eq!(f.surface.data_state(), DataState::Open);
}

#[test]
fn unwired_trigger_warns() {
    let (clicked, logs) = capture_logs(|| DrawerTrigger::new().click());
    assert!(!clicked);
    assert!(logs.contains("WARN"), "{logs}");
    assert!(logs.contains("drawer trigger has no drawer ancestor"), "{logs}");
}

#[test]
fn attach_without_surface_warns() {
    let drawer = DrawerController::new(Rc::new(RecordingLock::new()));
    let (attached, logs) = capture_logs(|| drawer.attach(None));
    assert!(!attached);
    assert!(logs.contains("without a content surface"), "{logs}");
}

#[test]
fn invalid_direction_attribute_falls_back_with_warning() {
    let f = fixture(DrawerController::builder().direction(Direction::Left));
    let (changed, logs) =
        capture_logs(|| f.drawer.attribute_changed("direction", Some("left"), Some("diagonal")));
    assert!(changed);
    assert_eq!(f.drawer.direction(), Direction::Bottom);
    assert_eq!(f.surface.data_direction(), Some(Direction::Bottom));
    assert!(logs.contains("invalid attribute value"), "{logs}");
}

#[test]
fn direction_subscription_unsubscribes() {
    let f = fixture(DrawerController::builder());
    let seen = Rc::new(std::cell::RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    let sub = f.drawer.subscribe_direction(move |d| log.borrow_mut().push(*d));
    f.drawer.set_direction(Direction::Right);
    f.drawer.set_direction(Direction::Right);
    drop(sub);
    f.drawer.set_direction(Direction::Top);
    assert_eq!(*seen.borrow(), vec![Direction::Right]);
}

// ============================================================================
// Scroll lock end to end
// ============================================================================

#[test]
fn scroll_lock_protects_page_for_whole_open_cycle() {
    let doc = Rc::new(FakeDocument::new());
    doc.add_body_child(PAGE, false)
        .add_body_child(NodeId::new(11), true)
        .add_body_child(DRAWER_ROOT, false);
    doc.add_node(SURFACE, DRAWER_ROOT).add_node(CONTENT, SURFACE);
    doc.set_page_scroll(480.0, 12.0);

    let lock = Rc::new(ScrollLock::with_options(
        Rc::clone(&doc),
        ScrollLockOptions::new()
            .allow_scroll_within(SURFACE)
            .exclude_from_inert(DRAWER_ROOT),
    ));
    let drawer = DrawerController::builder()
        .key_stack(DrawerStack::new())
        .build(lock.clone())
        .unwrap();
    let surface = Rc::new(FakeSurface::new(SURFACE));
    drawer.attach(Some(surface));

    drawer.set_open(true);
    assert_eq!(doc.body_style("position").as_deref(), Some("fixed"));
    assert_eq!(doc.body_style("top").as_deref(), Some("-480px"));
    assert_eq!(doc.body_style("padding-right").as_deref(), Some("12px"));
    assert!(doc.is_inert(PAGE));
    assert!(!doc.is_inert(DRAWER_ROOT));
    assert!(lock.should_block_scroll(PAGE));
    assert!(!lock.should_block_scroll(CONTENT));

    drawer.handle_key(&escape());
    assert!(doc.has_body_overrides(), "still locked while sliding out");

    drawer.handle_animation_end(&AnimationEvent::new("slide-to-bottom", SURFACE));
    assert!(!doc.has_body_overrides());
    assert_eq!(doc.inert_count(), 0);
    assert_eq!(doc.scrolled_to(), Some(480.0));
    assert!(!lock.should_block_scroll(PAGE));
}

#[test]
fn detach_mid_open_releases_lock() {
    let f = opened(DrawerController::builder());
    f.drawer.detach();
    assert!(!f.lock.is_locked());
    assert!(!f.drawer.is_attached());
    f.drawer.set_open(false);
    assert_eq!(f.lock.calls(), vec![LockCall::Lock, LockCall::Unlock]);
}
