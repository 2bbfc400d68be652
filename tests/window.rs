mod common;

use common::{Recorder, log};
use surreal::{
    Connection, EventKind, NativeEventKind, Rect, Window, WindowCreateFlags, WindowError, ivec2,
    platform::HeadlessDisplay, uvec2,
};

fn open(flags: WindowCreateFlags) -> (Window, Connection, surreal::platform::HeadlessHandle) {
    let (display, handle) = HeadlessDisplay::full_hd();
    let connection = Connection::new(display);
    let window = Window::open(&connection, "test", flags).expect("headless window");
    (window, connection, handle)
}

#[test]
fn fullscreen_covers_the_screen() {
    let (window, _conn, _handle) = open(WindowCreateFlags::FULLSCREEN);
    assert_eq!(window.rect(), Rect::new(ivec2(0, 0), uvec2(1920, 1080)));
}

#[test]
fn windowed_is_centered_at_default_size() {
    let (window, _conn, handle) = open(WindowCreateFlags::VSYNC);
    let expected = Rect::new(
        ivec2((1920 - 1280) / 2, (1080 - 720) / 2),
        uvec2(1280, 720),
    );
    assert_eq!(window.rect(), expected);
    assert_eq!(window.size(), Window::DEFAULT_SIZE);

    let native = handle.window(window.native_id()).expect("window is registered");
    assert_eq!(native.rect, expected);
    assert_eq!(native.title, "test");
    assert_eq!(native.flags, WindowCreateFlags::VSYNC);
    assert!(native.visible);
}

#[test]
fn show_and_hide_reach_the_display() {
    let (window, _conn, handle) = open(WindowCreateFlags::empty());
    window.hide();
    assert!(!handle.window(window.native_id()).map_or(true, |w| w.visible));
    window.show();
    assert!(handle.window(window.native_id()).is_some_and(|w| w.visible));
}

#[test]
fn broken_connection_fails_construction() {
    let (display, handle) = HeadlessDisplay::full_hd();
    let connection = Connection::new(display);
    handle.break_connection();

    let err = Window::open(&connection, "test", WindowCreateFlags::empty()).unwrap_err();
    assert!(matches!(err, WindowError::Connection(_)));
    assert!(handle.windows().is_empty());
}

#[test]
fn invalid_native_id_fails_construction() {
    let (display, handle) = HeadlessDisplay::full_hd();
    let connection = Connection::new(display);
    handle.hand_out_invalid_ids();

    let err = Window::open(&connection, "test", WindowCreateFlags::empty()).unwrap_err();
    assert!(matches!(err, WindowError::InvalidWindowId));
    assert_eq!(err.to_string(), "display returned an invalid window id");
}

#[test]
fn handlers_run_newest_first() {
    let (mut window, _conn, handle) = open(WindowCreateFlags::empty());
    let log = log();
    let h1 = Recorder::new("h1", &log);
    let h2 = Recorder::new("h2", &log);
    window.push_event_handler(&h1);
    window.push_event_handler(&h2);
    assert_eq!(window.handler_count(), 2);

    handle.key_down(window.native_id(), 9);
    handle.key_up(window.native_id(), 9);
    window.on_update();

    assert_eq!(
        *log.borrow(),
        vec![
            ("h2", EventKind::KeyPress, false),
            ("h1", EventKind::KeyPress, false),
            ("h2", EventKind::KeyRelease, false),
            ("h1", EventKind::KeyRelease, false),
        ]
    );
}

#[test]
fn handled_does_not_stop_dispatch() {
    let (mut window, _conn, handle) = open(WindowCreateFlags::empty());
    let log = log();
    let h1 = Recorder::new("h1", &log);
    let h2 = Recorder::handling("h2", &log);
    window.push_event_handler(&h1);
    window.push_event_handler(&h2);

    handle.close(window.native_id());
    window.on_update();

    assert_eq!(
        *log.borrow(),
        vec![
            ("h2", EventKind::WindowClose, false),
            ("h1", EventKind::WindowClose, true),
        ]
    );
}

#[test]
fn geometry_change_sends_resize_then_position() {
    let (mut window, _conn, handle) = open(WindowCreateFlags::empty());
    let log = log();
    let h1 = Recorder::new("h1", &log);
    let h2 = Recorder::new("h2", &log);
    window.push_event_handler(&h1);
    window.push_event_handler(&h2);

    let moved = Rect::new(ivec2(10, 20), uvec2(800, 600));
    handle.move_resize(window.native_id(), moved);
    handle.key_down(window.native_id(), 38);
    window.on_update();

    assert_eq!(window.rect(), moved);
    assert_eq!(
        *log.borrow(),
        vec![
            ("h2", EventKind::WindowResize, false),
            ("h1", EventKind::WindowResize, false),
            ("h2", EventKind::WindowPosition, false),
            ("h1", EventKind::WindowPosition, false),
            ("h2", EventKind::KeyPress, false),
            ("h1", EventKind::KeyPress, false),
        ]
    );
}

#[test]
fn geometry_events_carry_the_new_rect() {
    use std::{cell::RefCell, rc::Rc};
    use surreal::{
        EventDispatcher, EventHandler, KeyEvent, WindowEvent, WindowPositionEvent,
        WindowResizeEvent,
    };

    #[derive(Default)]
    struct Geometry {
        size: Option<surreal::UVec2>,
        pos: Option<surreal::IVec2>,
    }

    impl EventHandler for Geometry {
        fn on_key_event(&mut self, _event: &mut KeyEvent) {}

        fn on_window_event(&mut self, event: &mut WindowEvent) {
            let mut d = EventDispatcher::new(event);
            d.dispatch(|e: &mut WindowResizeEvent| self.size = Some(e.size()));
            d.dispatch(|e: &mut WindowPositionEvent| self.pos = Some(e.position()));
        }
    }

    let (mut window, _conn, handle) = open(WindowCreateFlags::empty());
    let geometry = Rc::new(RefCell::new(Geometry::default()));
    window.push_event_handler(&geometry);

    handle.move_resize(window.native_id(), Rect::new(ivec2(-5, 7), uvec2(300, 200)));
    window.on_update();

    assert_eq!(geometry.borrow().size, Some(uvec2(300, 200)));
    assert_eq!(geometry.borrow().pos, Some(ivec2(-5, 7)));
}

#[test]
fn idle_update_changes_nothing() {
    let (mut window, _conn, handle) = open(WindowCreateFlags::empty());
    let log = log();
    let h = Recorder::new("h", &log);
    window.push_event_handler(&h);
    let before = window.rect();

    window.on_update();
    window.on_update();

    assert_eq!(window.rect(), before);
    assert!(log.borrow().is_empty());
    assert_eq!(handle.polls(), 2);
}

#[test]
fn pointer_buttons_and_unknown_events_do_not_reach_handlers() {
    let (mut window, _conn, handle) = open(WindowCreateFlags::empty());
    let log = log();
    let h = Recorder::new("h", &log);
    window.push_event_handler(&h);

    handle.button_down(window.native_id(), 1);
    handle.push(window.native_id(), NativeEventKind::ButtonUp(1));
    handle.push(window.native_id(), NativeEventKind::Unknown(33));
    window.on_update();

    assert!(log.borrow().is_empty());
    assert_eq!(handle.pending(), 0);
}

#[test]
fn close_and_geometry_for_other_windows_are_skipped() {
    let (display, handle) = HeadlessDisplay::full_hd();
    let connection = Connection::new(display);
    let mut first = Window::open(&connection, "first", WindowCreateFlags::empty()).unwrap();
    let second = Window::open(&connection, "second", WindowCreateFlags::empty()).unwrap();
    assert_ne!(first.id(), second.id());

    let log = log();
    let h = Recorder::new("h", &log);
    first.push_event_handler(&h);
    let before = first.rect();

    handle.close(second.native_id());
    handle.move_resize(second.native_id(), Rect::new(ivec2(1, 1), uvec2(2, 2)));
    handle.key_down(second.native_id(), 24);
    first.on_update();

    assert_eq!(first.rect(), before);
    assert_eq!(*log.borrow(), vec![("h", EventKind::KeyPress, false)]);
}

#[test]
fn dropped_handlers_are_skipped() {
    let (mut window, _conn, handle) = open(WindowCreateFlags::empty());
    let log = log();
    let kept = Recorder::new("kept", &log);
    let gone = Recorder::new("gone", &log);
    window.push_event_handler(&kept);
    window.push_event_handler(&gone);
    drop(gone);

    handle.key_down(window.native_id(), 9);
    window.on_update();

    assert_eq!(*log.borrow(), vec![("kept", EventKind::KeyPress, false)]);
    assert_eq!(window.handler_count(), 1);
}

#[test]
fn last_window_releases_the_connection() {
    let (display, handle) = HeadlessDisplay::full_hd();
    let connection = Connection::new(display);
    let first = Window::open(&connection, "first", WindowCreateFlags::empty()).unwrap();
    let second = Window::open(&connection, "second", WindowCreateFlags::empty()).unwrap();
    drop(connection);
    assert_eq!(handle.windows().len(), 2);

    drop(first);
    assert_eq!(handle.windows().len(), 1);
    assert!(handle.is_connected());

    drop(second);
    assert!(!handle.is_connected());
}
