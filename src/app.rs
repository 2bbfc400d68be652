use std::{cell::RefCell, rc::Rc, time::Instant};

use crate::{
    event::{
        EventDispatcher, EventHandler, KeyCode, KeyEvent, KeyPressEvent, WindowCloseEvent,
        WindowEvent,
    },
    platform::Connection,
    windowing::{Window, WindowCreateFlags, WindowError, WindowId},
};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub flags: WindowCreateFlags,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Surreal Application".to_string(),
            flags: WindowCreateFlags::VSYNC,
        }
    }
}

impl AppConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_flags(mut self, flags: WindowCreateFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// Application-specific logic plugged into the frame loop.
pub trait AppDelegate {
    /// Called once the window is open, before the first frame. Register
    /// event handlers here; they are dispatched before the built-in quit
    /// handling.
    fn on_start(&mut self, _window: &mut Window) {}

    /// Called once per frame, before the window's events are processed.
    fn on_update(&mut self, _delta_time: f32) {}
}

impl AppDelegate for () {}

/// Quits on a close request for the application's window or on Escape.
#[derive(Debug)]
struct QuitPolicy {
    window: WindowId,
    escape: KeyCode,
    should_quit: bool,
}

impl EventHandler for QuitPolicy {
    fn on_key_event(&mut self, event: &mut KeyEvent) {
        EventDispatcher::new(event).dispatch(|e: &mut KeyPressEvent| {
            if e.key() == self.escape {
                log::info!("escape pressed, quitting");
                self.should_quit = true;
                e.handled = true;
            }
        });
    }

    fn on_window_event(&mut self, event: &mut WindowEvent) {
        EventDispatcher::new(event).dispatch(|e: &mut WindowCloseEvent| {
            if e.window() == self.window {
                log::info!("window {} close requested, quitting", e.window());
                self.should_quit = true;
                e.handled = true;
            }
        });
    }
}

pub struct Application {
    config: AppConfig,
    policy: Option<Rc<RefCell<QuitPolicy>>>,
    elapsed: f32,
}

impl Application {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            policy: None,
            elapsed: 0.0,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Seconds spent in the frame loop so far.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn should_quit(&self) -> bool {
        self.policy
            .as_ref()
            .is_some_and(|policy| policy.borrow().should_quit)
    }

    /// Opens the window on `connection` and runs frames until a quit is
    /// requested. The window, and with it the connection if nothing else
    /// holds it, is released before returning.
    pub fn run<D: AppDelegate + ?Sized>(
        &mut self,
        connection: Connection,
        delegate: &mut D,
    ) -> Result<(), WindowError> {
        log::info!("starting {}...", self.config.title);

        let mut window = Window::open(&connection, self.config.title.as_str(), self.config.flags)?;
        let policy = Rc::new(RefCell::new(QuitPolicy {
            window: window.id(),
            escape: connection.escape_key(),
            should_quit: false,
        }));
        drop(connection);

        window.push_event_handler(&policy);
        self.policy = Some(policy);
        delegate.on_start(&mut window);

        let mut start = Instant::now();
        while !self.should_quit() {
            let end = Instant::now();
            let delta_time = end.duration_since(start).as_secs_f32();

            delegate.on_update(delta_time);
            window.on_update();

            self.elapsed += delta_time;
            start = end;
        }

        drop(window);
        log::info!("{} stopped after {:.2}s", self.config.title, self.elapsed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::KeyReleaseEvent;

    fn policy() -> QuitPolicy {
        QuitPolicy {
            window: WindowId::new(3),
            escape: 9,
            should_quit: false,
        }
    }

    #[test]
    fn escape_press_quits_and_marks_handled() {
        let mut p = policy();
        let mut event = KeyEvent::from(KeyPressEvent::new(9));
        p.on_key_event(&mut event);
        assert!(p.should_quit);
        assert!(matches!(event, KeyEvent::Press(ref e) if e.handled));
    }

    #[test]
    fn other_keys_and_releases_are_ignored() {
        let mut p = policy();
        let mut press = KeyEvent::from(KeyPressEvent::new(10));
        let mut release = KeyEvent::from(KeyReleaseEvent::new(9));
        p.on_key_event(&mut press);
        p.on_key_event(&mut release);
        assert!(!p.should_quit);
        assert!(matches!(release, KeyEvent::Release(ref e) if !e.handled));
    }

    #[test]
    fn close_only_counts_for_own_window() {
        let mut p = policy();
        let mut foreign = WindowEvent::from(WindowCloseEvent::new(WindowId::new(4)));
        p.on_window_event(&mut foreign);
        assert!(!p.should_quit);

        let mut own = WindowEvent::from(WindowCloseEvent::new(WindowId::new(3)));
        p.on_window_event(&mut own);
        assert!(p.should_quit);
        assert!(matches!(own, WindowEvent::Close(ref e) if e.handled));
    }

    #[test]
    fn config_builder() {
        let config = AppConfig::default()
            .with_title("demo")
            .with_flags(WindowCreateFlags::FULLSCREEN | WindowCreateFlags::BORDERLESS);
        assert_eq!(config.title, "demo");
        assert!(config.flags.contains(WindowCreateFlags::FULLSCREEN));
        assert!(!config.flags.contains(WindowCreateFlags::VSYNC));
        assert_eq!(AppConfig::default().flags, WindowCreateFlags::VSYNC);
    }
}
