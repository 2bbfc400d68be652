//! Typed, categorized events and the handler contract.
//!
//! Every concrete event type declares a fixed [`EventKind`]; its category mask
//! and display name are looked up from that kind, so they can never differ
//! between two instances of the same type. Events are grouped into the
//! [`WindowEvent`] and [`KeyEvent`] families that handlers receive, and
//! [`AnyEvent`] covers both.
//!
//! Events are deliberately not `Clone`: the window builds one instance per
//! native notification and hands the same instance to every handler in turn.

use std::fmt;

use glam::{IVec2, UVec2};

use crate::windowing::WindowId;

/// Platform key code as reported by the native service.
pub type KeyCode = u32;

bitflags::bitflags! {
    /// Coarse event families an event belongs to.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct EventCategory: u32 {
        const WINDOW   = 1 << 0;
        const KEYBOARD = 1 << 1;
        const MOUSE    = 1 << 2;
    }
}

/// Discriminant identifying a concrete event type. One entry per type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyPress,
    KeyRelease,
    WindowClose,
    WindowPosition,
    WindowResize,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::KeyPress,
        EventKind::KeyRelease,
        EventKind::WindowClose,
        EventKind::WindowPosition,
        EventKind::WindowResize,
    ];

    pub const fn categories(self) -> EventCategory {
        match self {
            EventKind::KeyPress | EventKind::KeyRelease => EventCategory::KEYBOARD,
            EventKind::WindowClose | EventKind::WindowPosition | EventKind::WindowResize => {
                EventCategory::WINDOW
            }
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            EventKind::KeyPress => "KeyPress",
            EventKind::KeyRelease => "KeyRelease",
            EventKind::WindowClose => "WindowClose",
            EventKind::WindowPosition => "WindowPosition",
            EventKind::WindowResize => "WindowResize",
        }
    }
}

/// Behaviour shared by every event, concrete or grouped.
pub trait Event: fmt::Display + fmt::Debug {
    fn kind(&self) -> EventKind;

    fn categories(&self) -> EventCategory {
        self.kind().categories()
    }

    fn name(&self) -> &'static str {
        self.kind().name()
    }

    fn is_in_category(&self, category: EventCategory) -> bool {
        self.categories().intersects(category)
    }

    fn is_handled(&self) -> bool;

    fn set_handled(&mut self, handled: bool);
}

/// A concrete event type with a statically known kind.
pub trait StaticEvent: Event {
    const KIND: EventKind;
    const CATEGORIES: EventCategory = Self::KIND.categories();
}

#[derive(Debug, PartialEq, Eq)]
pub struct WindowCloseEvent {
    window: WindowId,
    pub handled: bool,
}

impl WindowCloseEvent {
    pub fn new(window: WindowId) -> Self {
        Self {
            window,
            handled: false,
        }
    }

    pub fn window(&self) -> WindowId {
        self.window
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct WindowPositionEvent {
    window: WindowId,
    position: IVec2,
    pub handled: bool,
}

impl WindowPositionEvent {
    pub fn new(window: WindowId, position: IVec2) -> Self {
        Self {
            window,
            position,
            handled: false,
        }
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn position(&self) -> IVec2 {
        self.position
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct WindowResizeEvent {
    window: WindowId,
    size: UVec2,
    pub handled: bool,
}

impl WindowResizeEvent {
    pub fn new(window: WindowId, size: UVec2) -> Self {
        Self {
            window,
            size,
            handled: false,
        }
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct KeyPressEvent {
    key: KeyCode,
    pub handled: bool,
}

impl KeyPressEvent {
    pub fn new(key: KeyCode) -> Self {
        Self {
            key,
            handled: false,
        }
    }

    pub fn key(&self) -> KeyCode {
        self.key
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct KeyReleaseEvent {
    key: KeyCode,
    pub handled: bool,
}

impl KeyReleaseEvent {
    pub fn new(key: KeyCode) -> Self {
        Self {
            key,
            handled: false,
        }
    }

    pub fn key(&self) -> KeyCode {
        self.key
    }
}

macro_rules! impl_event {
    ($ty:ident, $kind:ident) => {
        impl Event for $ty {
            fn kind(&self) -> EventKind {
                EventKind::$kind
            }

            fn is_handled(&self) -> bool {
                self.handled
            }

            fn set_handled(&mut self, handled: bool) {
                self.handled = handled;
            }
        }

        impl StaticEvent for $ty {
            const KIND: EventKind = EventKind::$kind;
        }
    };
}

impl_event!(WindowCloseEvent, WindowClose);
impl_event!(WindowPositionEvent, WindowPosition);
impl_event!(WindowResizeEvent, WindowResize);
impl_event!(KeyPressEvent, KeyPress);
impl_event!(KeyReleaseEvent, KeyRelease);

impl fmt::Display for WindowCloseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for WindowPositionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for WindowResizeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for KeyPressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name(), self.key)
    }
}

impl fmt::Display for KeyReleaseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name(), self.key)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum WindowEvent {
    Close(WindowCloseEvent),
    Position(WindowPositionEvent),
    Resize(WindowResizeEvent),
}

impl WindowEvent {
    /// Id of the window the event originates from.
    pub fn window(&self) -> WindowId {
        match self {
            WindowEvent::Close(e) => e.window(),
            WindowEvent::Position(e) => e.window(),
            WindowEvent::Resize(e) => e.window(),
        }
    }

    fn inner(&self) -> &dyn Event {
        match self {
            WindowEvent::Close(e) => e,
            WindowEvent::Position(e) => e,
            WindowEvent::Resize(e) => e,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Event {
        match self {
            WindowEvent::Close(e) => e,
            WindowEvent::Position(e) => e,
            WindowEvent::Resize(e) => e,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum KeyEvent {
    Press(KeyPressEvent),
    Release(KeyReleaseEvent),
}

impl KeyEvent {
    pub fn key(&self) -> KeyCode {
        match self {
            KeyEvent::Press(e) => e.key(),
            KeyEvent::Release(e) => e.key(),
        }
    }

    fn inner(&self) -> &dyn Event {
        match self {
            KeyEvent::Press(e) => e,
            KeyEvent::Release(e) => e,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Event {
        match self {
            KeyEvent::Press(e) => e,
            KeyEvent::Release(e) => e,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum AnyEvent {
    Window(WindowEvent),
    Key(KeyEvent),
}

impl AnyEvent {
    fn inner(&self) -> &dyn Event {
        match self {
            AnyEvent::Window(e) => e.inner(),
            AnyEvent::Key(e) => e.inner(),
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Event {
        match self {
            AnyEvent::Window(e) => e.inner_mut(),
            AnyEvent::Key(e) => e.inner_mut(),
        }
    }
}

macro_rules! impl_grouped_event {
    ($ty:ident) => {
        impl Event for $ty {
            fn kind(&self) -> EventKind {
                self.inner().kind()
            }

            fn is_handled(&self) -> bool {
                self.inner().is_handled()
            }

            fn set_handled(&mut self, handled: bool) {
                self.inner_mut().set_handled(handled);
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(self.inner(), f)
            }
        }
    };
}

impl_grouped_event!(WindowEvent);
impl_grouped_event!(KeyEvent);
impl_grouped_event!(AnyEvent);

/// Narrowing from a grouped event to one concrete type.
pub trait Narrow<E>: StaticEvent {
    fn narrow(event: &mut E) -> Option<&mut Self>;
}

macro_rules! impl_narrow {
    ($ty:ident => $family:ident :: $variant:ident in $any:ident) => {
        impl From<$ty> for $family {
            fn from(e: $ty) -> Self {
                $family::$variant(e)
            }
        }

        impl From<$ty> for AnyEvent {
            fn from(e: $ty) -> Self {
                AnyEvent::$any($family::$variant(e))
            }
        }

        impl Narrow<$family> for $ty {
            fn narrow(event: &mut $family) -> Option<&mut Self> {
                match event {
                    $family::$variant(e) => Some(e),
                    _ => None,
                }
            }
        }

        impl Narrow<AnyEvent> for $ty {
            fn narrow(event: &mut AnyEvent) -> Option<&mut Self> {
                match event {
                    AnyEvent::$any($family::$variant(e)) => Some(e),
                    _ => None,
                }
            }
        }
    };
}

impl_narrow!(WindowCloseEvent => WindowEvent::Close in Window);
impl_narrow!(WindowPositionEvent => WindowEvent::Position in Window);
impl_narrow!(WindowResizeEvent => WindowEvent::Resize in Window);
impl_narrow!(KeyPressEvent => KeyEvent::Press in Key);
impl_narrow!(KeyReleaseEvent => KeyEvent::Release in Key);

impl From<WindowEvent> for AnyEvent {
    fn from(e: WindowEvent) -> Self {
        AnyEvent::Window(e)
    }
}

impl From<KeyEvent> for AnyEvent {
    fn from(e: KeyEvent) -> Self {
        AnyEvent::Key(e)
    }
}

/// Runs a callback only when the wrapped event is of a given concrete type.
///
/// ```
/// use surreal::event::{AnyEvent, EventDispatcher, KeyPressEvent, WindowCloseEvent};
///
/// let mut event = AnyEvent::from(KeyPressEvent::new(9));
/// let mut dispatcher = EventDispatcher::new(&mut event);
///
/// assert!(!dispatcher.dispatch(|_: &mut WindowCloseEvent| unreachable!()));
/// assert!(dispatcher.dispatch(|e: &mut KeyPressEvent| e.handled = true));
/// ```
pub struct EventDispatcher<'a, E> {
    event: &'a mut E,
}

impl<'a, E: Event> EventDispatcher<'a, E> {
    pub fn new(event: &'a mut E) -> Self {
        Self { event }
    }

    /// Calls `f` if the event is a `T`. Returns whether `f` ran.
    pub fn dispatch<T, F>(&mut self, f: F) -> bool
    where
        T: Narrow<E>,
        F: FnOnce(&mut T),
    {
        if self.event.kind() != T::KIND {
            return false;
        }

        match T::narrow(self.event) {
            Some(e) => {
                f(e);
                true
            }
            None => false,
        }
    }
}

/// Receiver of events synthesized by a [`Window`](crate::Window).
pub trait EventHandler {
    fn on_key_event(&mut self, event: &mut KeyEvent);

    fn on_window_event(&mut self, event: &mut WindowEvent);

    fn on_event(&mut self, event: &mut AnyEvent) {
        match event {
            AnyEvent::Key(e) => self.on_key_event(e),
            AnyEvent::Window(e) => self.on_window_event(e),
        }
    }
}
