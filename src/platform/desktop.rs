//! winit-backed display service.
//!
//! winit reports moves and resizes separately; both are folded into a
//! [`NativeEventKind::GeometryChanged`] carrying the window's full rect.

use std::{
    collections::{HashMap, VecDeque},
    time::Duration,
};

use glam::{UVec2, ivec2, uvec2};
use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, Event, MouseButton, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode as WinitKeyCode, PhysicalKey},
    platform::{
        pump_events::{EventLoopExtPumpEvents, PumpStatus},
        scancode::PhysicalKeyExtScancode,
    },
    window::{Fullscreen, Window as WinitWindow, WindowBuilder, WindowId as WinitWindowId},
};

use super::{ButtonCode, NativeDisplay, NativeEvent, NativeEventKind, NativeWindowId};
use crate::{WindowError, event::KeyCode, geometry::Rect, windowing::WindowCreateFlags};

const FALLBACK_SCREEN: UVec2 = UVec2::new(1920, 1080);
/// evdev scancode for Escape, used when winit cannot report one.
const FALLBACK_ESCAPE: KeyCode = 1;

struct Tracked {
    window: WinitWindow,
    rect: Rect,
}

pub struct DesktopDisplay {
    event_loop: EventLoop<()>,
    windows: HashMap<NativeWindowId, Tracked>,
    ids: HashMap<WinitWindowId, NativeWindowId>,
    queue: VecDeque<NativeEvent>,
    next_id: u32,
    exited: bool,
}

impl DesktopDisplay {
    pub fn connect() -> Result<Self, WindowError> {
        let event_loop = EventLoop::new().map_err(|e| WindowError::Connection(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);
        log::info!("connected to display");

        Ok(Self {
            event_loop,
            windows: HashMap::new(),
            ids: HashMap::new(),
            queue: VecDeque::new(),
            next_id: 1,
            exited: false,
        })
    }

    fn pump(&mut self) {
        let Self {
            event_loop,
            windows,
            ids,
            queue,
            ..
        } = self;

        let status = event_loop.pump_events(Some(Duration::ZERO), |event, _| {
            let Event::WindowEvent { window_id, event } = event else {
                return;
            };
            let Some(&id) = ids.get(&window_id) else {
                return;
            };
            let Some(tracked) = windows.get_mut(&id) else {
                return;
            };

            if let Some(kind) = translate(&event, tracked) {
                queue.push_back(NativeEvent::new(id, kind));
            }
        });

        if let PumpStatus::Exit(code) = status {
            log::warn!("display event loop exited with code {code}");
            self.exited = true;
        }
    }
}

fn translate(event: &WindowEvent, tracked: &mut Tracked) -> Option<NativeEventKind> {
    match event {
        WindowEvent::CloseRequested => Some(NativeEventKind::CloseRequested),
        WindowEvent::Resized(size) => {
            tracked.rect.size = uvec2(size.width, size.height);
            Some(NativeEventKind::GeometryChanged(tracked.rect))
        }
        WindowEvent::Moved(pos) => {
            tracked.rect.pos = ivec2(pos.x, pos.y);
            Some(NativeEventKind::GeometryChanged(tracked.rect))
        }
        WindowEvent::KeyboardInput { event, .. } => {
            let code = event.physical_key.to_scancode()?;
            Some(match event.state {
                ElementState::Pressed => NativeEventKind::KeyDown(code),
                ElementState::Released => NativeEventKind::KeyUp(code),
            })
        }
        WindowEvent::MouseInput { state, button, .. } => {
            let button = button_code(*button);
            Some(match state {
                ElementState::Pressed => NativeEventKind::ButtonDown(button),
                ElementState::Released => NativeEventKind::ButtonUp(button),
            })
        }
        _ => None,
    }
}

fn button_code(button: MouseButton) -> ButtonCode {
    match button {
        MouseButton::Left => 1,
        MouseButton::Middle => 2,
        MouseButton::Right => 3,
        MouseButton::Back => 8,
        MouseButton::Forward => 9,
        MouseButton::Other(n) => ButtonCode::from(n),
    }
}

impl NativeDisplay for DesktopDisplay {
    fn has_error(&self) -> bool {
        self.exited
    }

    fn screen_size(&self) -> UVec2 {
        self.event_loop
            .primary_monitor()
            .or_else(|| self.event_loop.available_monitors().next())
            .map(|m| {
                let size = m.size();
                uvec2(size.width, size.height)
            })
            .unwrap_or(FALLBACK_SCREEN)
    }

    fn create_window(
        &mut self,
        title: &str,
        rect: Rect,
        flags: WindowCreateFlags,
    ) -> Result<NativeWindowId, WindowError> {
        let mut builder = WindowBuilder::new()
            .with_title(title)
            .with_inner_size(PhysicalSize::new(rect.size.x, rect.size.y))
            .with_position(PhysicalPosition::new(rect.pos.x, rect.pos.y))
            .with_decorations(!flags.contains(WindowCreateFlags::BORDERLESS))
            .with_visible(false);

        if flags.contains(WindowCreateFlags::FULLSCREEN) {
            builder = builder.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = builder
            .build(&self.event_loop)
            .map_err(|e| WindowError::Creation(e.to_string()))?;

        let id = NativeWindowId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.ids.insert(window.id(), id);
        self.windows.insert(id, Tracked { window, rect });
        Ok(id)
    }

    fn destroy_window(&mut self, window: NativeWindowId) {
        if let Some(tracked) = self.windows.remove(&window) {
            self.ids.remove(&tracked.window.id());
        }
        self.queue.retain(|e| e.window != window);
    }

    fn show_window(&mut self, window: NativeWindowId) {
        if let Some(tracked) = self.windows.get(&window) {
            tracked.window.set_visible(true);
        }
    }

    fn hide_window(&mut self, window: NativeWindowId) {
        if let Some(tracked) = self.windows.get(&window) {
            tracked.window.set_visible(false);
        }
    }

    fn poll_event(&mut self) -> Option<NativeEvent> {
        if self.queue.is_empty() && !self.exited {
            self.pump();
        }
        self.queue.pop_front()
    }

    fn escape_key(&self) -> KeyCode {
        PhysicalKey::Code(WinitKeyCode::Escape)
            .to_scancode()
            .unwrap_or(FALLBACK_ESCAPE)
    }
}

impl Drop for DesktopDisplay {
    fn drop(&mut self) {
        log::info!("disconnected from display");
    }
}
