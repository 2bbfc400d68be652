use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use glam::{IVec2, UVec2};

use super::{WindowCreateFlags, WindowError, WindowId};
use crate::{
    event::{
        EventHandler, KeyEvent, KeyPressEvent, KeyReleaseEvent, WindowCloseEvent, WindowEvent,
        WindowPositionEvent, WindowResizeEvent,
    },
    geometry::Rect,
    platform::{Connection, NativeEvent, NativeEventKind, NativeWindowId},
};

type HandlerRef = Weak<RefCell<dyn EventHandler>>;

/// A native window plus the handlers that receive its events.
///
/// Handlers are held weakly; whoever registers one keeps it alive. Dispatch
/// walks the handlers newest first, and every live handler sees every event
/// whether or not an earlier one marked it handled.
pub struct Window {
    id: WindowId,
    native: NativeWindowId,
    title: String,
    flags: WindowCreateFlags,
    rect: Rect,
    handlers: Vec<HandlerRef>,
    connection: Connection,
}

impl Window {
    /// Size of a window opened without [`WindowCreateFlags::FULLSCREEN`].
    pub const DEFAULT_SIZE: UVec2 = UVec2::new(1280, 720);

    pub fn open(
        connection: &Connection,
        title: impl Into<String>,
        flags: WindowCreateFlags,
    ) -> Result<Self, WindowError> {
        if connection.has_error() {
            return Err(WindowError::Connection(
                "display connection reported an error".to_string(),
            ));
        }

        let title = title.into();
        let screen = connection.screen_size();
        let rect = if flags.contains(WindowCreateFlags::FULLSCREEN) {
            Rect::covering(screen)
        } else {
            Rect::centered(screen, Self::DEFAULT_SIZE)
        };

        let native = connection.with(|display| display.create_window(&title, rect, flags))?;
        if !native.is_valid() {
            return Err(WindowError::InvalidWindowId);
        }

        let window = Self {
            id: WindowId::from(native),
            native,
            title,
            flags,
            rect,
            handlers: Vec::new(),
            connection: connection.clone(),
        };
        window.show();

        log::info!(
            "opened window {} \"{}\" at {:?} size {:?}",
            window.id,
            window.title,
            rect.pos,
            rect.size
        );
        Ok(window)
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn native_id(&self) -> NativeWindowId {
        self.native
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn flags(&self) -> WindowCreateFlags {
        self.flags
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn size(&self) -> UVec2 {
        self.rect.size
    }

    pub fn position(&self) -> IVec2 {
        self.rect.pos
    }

    pub fn show(&self) {
        self.connection.with(|display| display.show_window(self.native));
    }

    pub fn hide(&self) {
        self.connection.with(|display| display.hide_window(self.native));
    }

    /// Registers `handler` behind every handler already present.
    pub fn push_event_handler<H: EventHandler + 'static>(&mut self, handler: &Rc<RefCell<H>>) {
        let handler: HandlerRef = Rc::<RefCell<H>>::downgrade(handler);
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Drains every pending native event and dispatches the typed events
    /// built from them. Returns immediately when nothing is pending.
    pub fn on_update(&mut self) {
        self.handlers.retain(|h| {
            let alive = h.strong_count() > 0;
            if !alive {
                log::warn!("dropping dead event handler from window {}", self.id);
            }
            alive
        });

        while let Some(native) = self.connection.poll_event() {
            self.translate(native);
        }
    }

    fn translate(&mut self, native: NativeEvent) {
        let ours = native.window == self.native;

        match native.kind {
            NativeEventKind::CloseRequested if ours => {
                self.notify_window(WindowCloseEvent::new(self.id).into());
            }
            NativeEventKind::GeometryChanged(rect) if ours => {
                self.rect = rect;
                self.notify_window(WindowResizeEvent::new(self.id, rect.size).into());
                self.notify_window(WindowPositionEvent::new(self.id, rect.pos).into());
            }
            NativeEventKind::CloseRequested | NativeEventKind::GeometryChanged(_) => {
                log::trace!("window {} skipping {:?} for {:?}", self.id, native.kind, native.window);
            }
            NativeEventKind::KeyDown(key) => self.notify_key(KeyPressEvent::new(key).into()),
            NativeEventKind::KeyUp(key) => self.notify_key(KeyReleaseEvent::new(key).into()),
            NativeEventKind::ButtonDown(button) => log::debug!("button pressed: {button}"),
            NativeEventKind::ButtonUp(button) => log::debug!("button released: {button}"),
            NativeEventKind::Unknown(code) => log::debug!("unhandled native event {code}"),
        }
    }

    fn handlers_newest_first(&self) -> impl Iterator<Item = Rc<RefCell<dyn EventHandler>>> + '_ {
        self.handlers.iter().rev().filter_map(Weak::upgrade)
    }

    fn notify_window(&self, mut event: WindowEvent) {
        log::trace!("window {} dispatching {event}", self.id);
        for handler in self.handlers_newest_first() {
            handler.borrow_mut().on_window_event(&mut event);
        }
    }

    fn notify_key(&self, mut event: KeyEvent) {
        log::trace!("window {} dispatching {event}", self.id);
        for handler in self.handlers_newest_first() {
            handler.borrow_mut().on_key_event(&mut event);
        }
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        self.connection
            .with(|display| display.destroy_window(self.native));
        log::info!("closed window {} \"{}\"", self.id, self.title);
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("flags", &self.flags)
            .field("rect", &self.rect)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
