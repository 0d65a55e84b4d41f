//! Clock sources for elapsed-time computation.
//!
//! The timer only ever asks for "milliseconds since some fixed origin", so
//! any monotonic-ish source works. Browsers get `performance.now()` and tests
//! get a hand-driven clock.

use std::cell::Cell;
use std::rc::Rc;

/// A source of millisecond timestamps.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Browser clock backed by `performance.now()`.
///
/// Falls back to `Date.now()` when the page has no `Performance` object
/// (e.g. some embedded webviews).
#[derive(Debug, Clone, Copy, Default)]
pub struct WebClock;

impl Clock for WebClock {
    fn now_ms(&self) -> u64 {
        let now = web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now);
        now.max(0.0) as u64
    }
}

/// Clock that only moves when told to. Clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}
