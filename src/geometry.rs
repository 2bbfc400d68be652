use glam::{IVec2, UVec2, ivec2};

/// Window geometry in physical pixels. Position may be negative on
/// multi-monitor setups.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub pos: IVec2,
    pub size: UVec2,
}

impl Rect {
    pub fn new(pos: IVec2, size: UVec2) -> Self {
        Self { pos, size }
    }

    /// Rect of `size` centered on a screen of `screen` size.
    pub fn centered(screen: UVec2, size: UVec2) -> Self {
        let half_screen = screen.as_ivec2() / 2;
        let half_window = size.as_ivec2() / 2;
        Self::new(half_screen - half_window, size)
    }

    /// Rect covering the whole screen.
    pub fn covering(screen: UVec2) -> Self {
        Self::new(ivec2(0, 0), screen)
    }
}
