//! The native display/window service a [`Window`](crate::Window) talks to.
//!
//! Backends implement [`NativeDisplay`]. A [`Connection`] is a cheap shared
//! handle to one backend; every window keeps a clone, and the backend itself
//! is dropped (disconnected) once the last handle goes away.

pub mod desktop;
pub mod headless;

use std::{cell::RefCell, fmt, rc::Rc};

use glam::UVec2;

use crate::{event::KeyCode, geometry::Rect, windowing::WindowCreateFlags};

pub use desktop::DesktopDisplay;
pub use headless::{HeadlessDisplay, HeadlessHandle};

/// Identifier the native service assigns to a window it created.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeWindowId(pub u32);

impl NativeWindowId {
    /// Sentinel a service may hand back when it could not allocate an id.
    pub const INVALID: NativeWindowId = NativeWindowId(u32::MAX);

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

/// Pointer button number, X11 numbering (1 = left, 2 = middle, 3 = right).
pub type ButtonCode = u32;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NativeEventKind {
    CloseRequested,
    /// New position and size of the window.
    GeometryChanged(Rect),
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    ButtonDown(ButtonCode),
    ButtonUp(ButtonCode),
    /// Anything the service reports that has no translation.
    Unknown(u32),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NativeEvent {
    pub window: NativeWindowId,
    pub kind: NativeEventKind,
}

impl NativeEvent {
    pub fn new(window: NativeWindowId, kind: NativeEventKind) -> Self {
        Self { window, kind }
    }
}

pub trait NativeDisplay {
    /// Whether the connection to the service is broken.
    fn has_error(&self) -> bool;

    fn screen_size(&self) -> UVec2;

    fn create_window(
        &mut self,
        title: &str,
        rect: Rect,
        flags: WindowCreateFlags,
    ) -> Result<NativeWindowId, crate::WindowError>;

    fn destroy_window(&mut self, window: NativeWindowId);

    fn show_window(&mut self, window: NativeWindowId);

    fn hide_window(&mut self, window: NativeWindowId);

    /// Next pending event, or `None` right away when the queue is empty.
    /// Must never block.
    fn poll_event(&mut self) -> Option<NativeEvent>;

    /// Key code the platform reports for the Escape key.
    fn escape_key(&self) -> KeyCode;
}

#[derive(Clone)]
pub struct Connection {
    display: Rc<RefCell<dyn NativeDisplay>>,
}

impl Connection {
    pub fn new(display: impl NativeDisplay + 'static) -> Self {
        Self {
            display: Rc::new(RefCell::new(display)),
        }
    }

    /// Connects to the desktop windowing system.
    pub fn desktop() -> Result<Self, crate::WindowError> {
        Ok(Self::new(DesktopDisplay::connect()?))
    }

    /// Number of live handles, including this one.
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.display)
    }

    pub(crate) fn with<R>(&self, f: impl FnOnce(&mut dyn NativeDisplay) -> R) -> R {
        f(&mut *self.display.borrow_mut())
    }

    pub fn has_error(&self) -> bool {
        self.display.borrow().has_error()
    }

    pub fn screen_size(&self) -> UVec2 {
        self.display.borrow().screen_size()
    }

    pub fn escape_key(&self) -> KeyCode {
        self.display.borrow().escape_key()
    }

    pub fn poll_event(&self) -> Option<NativeEvent> {
        self.display.borrow_mut().poll_event()
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("handles", &self.handle_count())
            .finish_non_exhaustive()
    }
}
