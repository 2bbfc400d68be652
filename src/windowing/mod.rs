pub mod window;

use std::fmt;

use crate::platform::NativeWindowId;

pub use window::Window;

bitflags::bitflags! {
    /// Options recognised when opening a window.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct WindowCreateFlags: u32 {
        const BORDERLESS = 1 << 0;
        /// Cover the whole screen instead of centering at the default size.
        const FULLSCREEN = 1 << 1;
        const VSYNC      = 1 << 2;
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("failed to connect to display: {0}")]
    Connection(String),
    #[error("display returned an invalid window id")]
    InvalidWindowId,
    #[error("failed to create window: {0}")]
    Creation(String),
}

/// Identifies a window in the events it emits.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u64);

impl WindowId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<NativeWindowId> for WindowId {
    fn from(id: NativeWindowId) -> Self {
        Self(u64::from(id.0))
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
