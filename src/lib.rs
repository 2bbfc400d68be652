pub mod app;
pub mod event;
pub mod flags;
pub mod geometry;
pub mod platform;
pub mod windowing;

pub use app::{AppConfig, AppDelegate, Application};
pub use event::{
    AnyEvent, Event, EventCategory, EventDispatcher, EventHandler, EventKind, KeyCode, KeyEvent,
    KeyPressEvent, KeyReleaseEvent, WindowCloseEvent, WindowEvent, WindowPositionEvent,
    WindowResizeEvent,
};
pub use flags::FlagsExt;
pub use geometry::Rect;
pub use platform::{Connection, NativeDisplay, NativeEvent, NativeEventKind, NativeWindowId};
pub use windowing::{Window, WindowCreateFlags, WindowError, WindowId};

pub use glam::{IVec2, UVec2, ivec2, uvec2};

pub fn init_logging() {
    let _ = env_logger::try_init();
}

/// Runs `delegate` in a desktop window until the user quits.
pub fn run(config: AppConfig, delegate: &mut impl AppDelegate) -> Result<(), WindowError> {
    init_logging();
    let connection = Connection::desktop()?;
    Application::new(config).run(connection, delegate)
}
