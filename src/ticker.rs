//! Repeating callbacks with explicit, drop-to-cancel handles.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::{Rc, Weak};

use gloo_timers::callback::Interval;

/// Schedules a repeating callback on the host event loop.
///
/// The returned handle owns the schedule: dropping it cancels the callback
/// and no further invocation happens after the drop returns.
pub trait Ticker {
    type Handle;

    fn every(&self, period_ms: u32, tick: Box<dyn FnMut()>) -> Self::Handle;
}

/// Browser ticker built on `setInterval`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntervalTicker;

impl Ticker for IntervalTicker {
    type Handle = Interval;

    fn every(&self, period_ms: u32, mut tick: Box<dyn FnMut()>) -> Interval {
        Interval::new(period_ms, move || tick())
    }
}

type TickFn = Box<dyn FnMut()>;

#[derive(Default)]
struct Slots {
    next_id: u64,
    live: BTreeMap<u64, TickFn>,
    // cancelled while their callback was running
    dropped_in_flight: BTreeSet<u64>,
}

/// Ticker driven by hand, for tests. Clones share the same schedule.
#[derive(Clone, Default)]
pub struct ManualTicker {
    slots: Rc<RefCell<Slots>>,
}

/// Handle returned by [`ManualTicker::every`].
pub struct ManualHandle {
    id: u64,
    slots: Weak<RefCell<Slots>>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks that are still scheduled.
    pub fn active(&self) -> usize {
        self.slots.borrow().live.len()
    }

    /// Invoke every live callback once, in scheduling order.
    pub fn fire(&self) {
        let ids: Vec<u64> = self.slots.borrow().live.keys().copied().collect();
        for id in ids {
            let Some(mut tick) = self.slots.borrow_mut().live.remove(&id) else {
                continue;
            };
            tick();
            let mut slots = self.slots.borrow_mut();
            if !slots.dropped_in_flight.remove(&id) {
                slots.live.insert(id, tick);
            }
        }
    }
}

impl Ticker for ManualTicker {
    type Handle = ManualHandle;

    fn every(&self, _period_ms: u32, tick: Box<dyn FnMut()>) -> ManualHandle {
        let mut slots = self.slots.borrow_mut();
        let id = slots.next_id;
        slots.next_id += 1;
        slots.live.insert(id, tick);
        ManualHandle {
            id,
            slots: Rc::downgrade(&self.slots),
        }
    }
}

impl Drop for ManualHandle {
    fn drop(&mut self) {
        if let Some(slots) = self.slots.upgrade() {
            let mut slots = slots.borrow_mut();
            if slots.live.remove(&self.id).is_none() {
                slots.dropped_in_flight.insert(self.id);
            }
        }
    }
}
