//! In-memory display service with a scripted event queue.
//!
//! The display is handed to a [`Connection`](super::Connection) while a
//! [`HeadlessHandle`] stays with the caller to feed events and inspect what
//! the windows did.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use glam::{UVec2, uvec2};

use super::{ButtonCode, NativeDisplay, NativeEvent, NativeEventKind, NativeWindowId};
use crate::{WindowError, event::KeyCode, geometry::Rect, windowing::WindowCreateFlags};

/// X11 keycode for Escape.
pub const ESCAPE_KEY: KeyCode = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessWindow {
    pub id: NativeWindowId,
    pub title: String,
    pub rect: Rect,
    pub flags: WindowCreateFlags,
    pub visible: bool,
}

#[derive(Debug)]
struct State {
    screen: UVec2,
    queue: VecDeque<NativeEvent>,
    windows: Vec<HeadlessWindow>,
    next_id: u32,
    connected: bool,
    broken: bool,
    hand_out_invalid_ids: bool,
    polls: usize,
}

#[derive(Debug)]
pub struct HeadlessDisplay {
    state: Rc<RefCell<State>>,
}

#[derive(Debug, Clone)]
pub struct HeadlessHandle {
    state: Rc<RefCell<State>>,
}

impl HeadlessDisplay {
    pub fn new(screen: UVec2) -> (Self, HeadlessHandle) {
        let state = Rc::new(RefCell::new(State {
            screen,
            queue: VecDeque::new(),
            windows: Vec::new(),
            next_id: 1,
            connected: true,
            broken: false,
            hand_out_invalid_ids: false,
            polls: 0,
        }));

        (
            Self {
                state: state.clone(),
            },
            HeadlessHandle { state },
        )
    }

    /// A 1920x1080 screen.
    pub fn full_hd() -> (Self, HeadlessHandle) {
        Self::new(uvec2(1920, 1080))
    }
}

impl Drop for HeadlessDisplay {
    fn drop(&mut self) {
        self.state.borrow_mut().connected = false;
    }
}

impl NativeDisplay for HeadlessDisplay {
    fn has_error(&self) -> bool {
        self.state.borrow().broken
    }

    fn screen_size(&self) -> UVec2 {
        self.state.borrow().screen
    }

    fn create_window(
        &mut self,
        title: &str,
        rect: Rect,
        flags: WindowCreateFlags,
    ) -> Result<NativeWindowId, WindowError> {
        let mut state = self.state.borrow_mut();
        if state.hand_out_invalid_ids {
            return Ok(NativeWindowId::INVALID);
        }

        let id = NativeWindowId(state.next_id);
        state.next_id += 1;
        state.windows.push(HeadlessWindow {
            id,
            title: title.to_string(),
            rect,
            flags,
            visible: false,
        });
        Ok(id)
    }

    fn destroy_window(&mut self, window: NativeWindowId) {
        self.state.borrow_mut().windows.retain(|w| w.id != window);
    }

    fn show_window(&mut self, window: NativeWindowId) {
        self.state.borrow_mut().set_visible(window, true);
    }

    fn hide_window(&mut self, window: NativeWindowId) {
        self.state.borrow_mut().set_visible(window, false);
    }

    fn poll_event(&mut self) -> Option<NativeEvent> {
        let mut state = self.state.borrow_mut();
        state.polls += 1;
        state.queue.pop_front()
    }

    fn escape_key(&self) -> KeyCode {
        ESCAPE_KEY
    }
}

impl State {
    fn set_visible(&mut self, window: NativeWindowId, visible: bool) {
        if let Some(w) = self.windows.iter_mut().find(|w| w.id == window) {
            w.visible = visible;
        }
    }
}

impl HeadlessHandle {
    pub fn push(&self, window: NativeWindowId, kind: NativeEventKind) {
        self.state
            .borrow_mut()
            .queue
            .push_back(NativeEvent::new(window, kind));
    }

    pub fn close(&self, window: NativeWindowId) {
        self.push(window, NativeEventKind::CloseRequested);
    }

    pub fn move_resize(&self, window: NativeWindowId, rect: Rect) {
        self.push(window, NativeEventKind::GeometryChanged(rect));
    }

    pub fn key_down(&self, window: NativeWindowId, key: KeyCode) {
        self.push(window, NativeEventKind::KeyDown(key));
    }

    pub fn key_up(&self, window: NativeWindowId, key: KeyCode) {
        self.push(window, NativeEventKind::KeyUp(key));
    }

    pub fn button_down(&self, window: NativeWindowId, button: ButtonCode) {
        self.push(window, NativeEventKind::ButtonDown(button));
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().queue.len()
    }

    /// Number of `poll_event` calls the display has served.
    pub fn polls(&self) -> usize {
        self.state.borrow().polls
    }

    /// False once the display itself has been dropped.
    pub fn is_connected(&self) -> bool {
        self.state.borrow().connected
    }

    /// Makes the connection report an error from now on.
    pub fn break_connection(&self) {
        self.state.borrow_mut().broken = true;
    }

    /// Makes subsequent window creation return [`NativeWindowId::INVALID`].
    pub fn hand_out_invalid_ids(&self) {
        self.state.borrow_mut().hand_out_invalid_ids = true;
    }

    pub fn windows(&self) -> Vec<HeadlessWindow> {
        self.state.borrow().windows.clone()
    }

    pub fn window(&self, id: NativeWindowId) -> Option<HeadlessWindow> {
        self.state
            .borrow()
            .windows
            .iter()
            .find(|w| w.id == id)
            .cloned()
    }
}
