#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use surreal::{Event, EventHandler, EventKind, KeyEvent, WindowEvent};

/// (handler name, event kind, handled flag as seen on arrival)
pub type Log = Rc<RefCell<Vec<(&'static str, EventKind, bool)>>>;

pub fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub struct Recorder {
    name: &'static str,
    log: Log,
    mark_handled: bool,
}

impl Recorder {
    pub fn new(name: &'static str, log: &Log) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            name,
            log: log.clone(),
            mark_handled: false,
        }))
    }

    pub fn handling(name: &'static str, log: &Log) -> Rc<RefCell<Self>> {
        let recorder = Self::new(name, log);
        recorder.borrow_mut().mark_handled = true;
        recorder
    }

    fn record(&mut self, event: &mut dyn Event) {
        self.log
            .borrow_mut()
            .push((self.name, event.kind(), event.is_handled()));
        if self.mark_handled {
            event.set_handled(true);
        }
    }
}

impl EventHandler for Recorder {
    fn on_key_event(&mut self, event: &mut KeyEvent) {
        self.record(event);
    }

    fn on_window_event(&mut self, event: &mut WindowEvent) {
        self.record(event);
    }
}
