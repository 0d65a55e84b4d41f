//! Stopwatch state machine and the controller that samples it.
//!
//! [`TimerState`] is the pure part: two states (stopped, running) and
//! arithmetic on millisecond readings handed in by the caller.
//! [`TimerController`] wires a state to a [`Clock`] and a [`Ticker`], owns
//! the single repeating sampling handle, and publishes [`Snapshot`]s to a
//! listener.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use log::debug;

use crate::clock::Clock;
use crate::config::SAMPLE_INTERVAL_MS;
use crate::ticker::Ticker;
use crate::DisplayTime;

/// Elapsed time plus the running flag, as consumed by the display surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub elapsed_ms: u64,
    pub running: bool,
}

impl Snapshot {
    pub fn display(&self) -> DisplayTime {
        DisplayTime::from_millis(self.elapsed_ms)
    }
}

/// Stopwatch state.
///
/// While running, elapsed time is `now - anchor`; while stopped it is the
/// frozen `elapsed_ms`. The anchor is signed so that `now - elapsed` never
/// underflows on a clock whose origin is recent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerState {
    elapsed_ms: u64,
    anchor_ms: Option<i64>,
}

impl TimerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.anchor_ms.is_some()
    }

    /// Last computed elapsed time.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn anchor_ms(&self) -> Option<i64> {
        self.anchor_ms
    }

    /// Elapsed time as of `now_ms`, without mutating anything.
    pub fn elapsed_at(&self, now_ms: u64) -> u64 {
        match self.anchor_ms {
            Some(anchor) => (now_ms as i64 - anchor).max(0) as u64,
            None => self.elapsed_ms,
        }
    }

    /// Stopped -> Running. Returns `false` if already running.
    pub fn start(&mut self, now_ms: u64) -> bool {
        if self.is_running() {
            return false;
        }
        self.anchor_ms = Some(now_ms as i64 - self.elapsed_ms as i64);
        true
    }

    /// Recompute elapsed time from the anchor. No-op while stopped.
    pub fn sample(&mut self, now_ms: u64) -> u64 {
        self.elapsed_ms = self.elapsed_at(now_ms);
        self.elapsed_ms
    }

    /// Running -> Stopped, freezing elapsed time at `now_ms`. Returns `false`
    /// if already stopped.
    pub fn stop(&mut self, now_ms: u64) -> bool {
        if !self.is_running() {
            return false;
        }
        self.sample(now_ms);
        self.anchor_ms = None;
        true
    }

    /// Any state -> Stopped with zero elapsed time.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            elapsed_ms: self.elapsed_ms,
            running: self.is_running(),
        }
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({})",
            DisplayTime::from_millis(self.elapsed_ms),
            if self.is_running() { "running" } else { "stopped" }
        )
    }
}

type Listener = Rc<dyn Fn(Snapshot)>;

struct Shared<C> {
    state: TimerState,
    clock: C,
    listener: Option<Listener>,
}

impl<C: Clock> Shared<C> {
    fn now(&self) -> u64 {
        self.clock.now_ms()
    }
}

/// Owns a [`TimerState`] and at most one live sampling handle.
pub struct TimerController<C: Clock + 'static, T: Ticker> {
    shared: Rc<RefCell<Shared<C>>>,
    ticker: T,
    sampler: Option<T::Handle>,
}

impl<C: Clock + 'static, T: Ticker> TimerController<C, T> {
    pub fn new(clock: C, ticker: T) -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared {
                state: TimerState::new(),
                clock,
                listener: None,
            })),
            ticker,
            sampler: None,
        }
    }

    /// Register the callback that receives every published snapshot.
    pub fn set_listener(&mut self, listener: impl Fn(Snapshot) + 'static) {
        self.shared.borrow_mut().listener = Some(Rc::new(listener));
    }

    pub fn is_running(&self) -> bool {
        self.shared.borrow().state.is_running()
    }

    /// Last published elapsed time.
    pub fn elapsed_ms(&self) -> u64 {
        self.shared.borrow().state.elapsed_ms()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.shared.borrow().state.snapshot()
    }

    pub fn state(&self) -> TimerState {
        self.shared.borrow().state
    }

    /// Number of live sampling handles (0 or 1).
    pub fn sampling(&self) -> usize {
        usize::from(self.sampler.is_some())
    }

    pub fn start(&mut self) {
        let started = {
            let mut shared = self.shared.borrow_mut();
            let now = shared.now();
            shared.state.start(now)
        };
        if !started {
            debug!("start ignored: already running");
            return;
        }

        let weak = Rc::downgrade(&self.shared);
        self.sampler = Some(
            self.ticker
                .every(SAMPLE_INTERVAL_MS, Box::new(move || tick(&weak))),
        );
        debug!("timer started at {}", self.state());
        self.publish();
    }

    pub fn stop(&mut self) {
        // cancel first so no tick lands after the freeze
        self.sampler = None;
        let stopped = {
            let mut shared = self.shared.borrow_mut();
            let now = shared.now();
            shared.state.stop(now)
        };
        if !stopped {
            debug!("stop ignored: not running");
            return;
        }
        debug!("timer stopped at {}", self.state());
        self.publish();
    }

    pub fn reset(&mut self) {
        self.sampler = None;
        self.shared.borrow_mut().state.reset();
        debug!("timer reset");
        self.publish();
    }

    fn publish(&self) {
        let (snapshot, listener) = {
            let shared = self.shared.borrow();
            (shared.state.snapshot(), shared.listener.clone())
        };
        if let Some(listener) = listener {
            listener(snapshot);
        }
    }
}

fn tick<C: Clock>(shared: &Weak<RefCell<Shared<C>>>) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    let (snapshot, listener) = {
        let mut shared = shared.borrow_mut();
        let now = shared.now();
        shared.state.sample(now);
        (shared.state.snapshot(), shared.listener.clone())
    };
    if let Some(listener) = listener {
        listener(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::ticker::ManualTicker;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    fn fixture() -> (
        TimerController<ManualClock, ManualTicker>,
        ManualClock,
        ManualTicker,
    ) {
        let clock = ManualClock::new(5_000);
        let ticker = ManualTicker::new();
        let controller = TimerController::new(clock.clone(), ticker.clone());
        (controller, clock, ticker)
    }

    #[test]
    fn new_controller_is_stopped_at_zero() {
        let (controller, _, ticker) = fixture();
        assert_eq!(
            controller.snapshot(),
            Snapshot {
                elapsed_ms: 0,
                running: false
            }
        );
        assert_eq!(ticker.active(), 0);
    }

    #[test]
    fn start_then_stop_after_500ms() {
        let (mut controller, clock, ticker) = fixture();
        controller.start();
        assert!(controller.is_running());
        assert_eq!(ticker.active(), 1);

        clock.advance(500);
        controller.stop();

        assert_eq!(controller.elapsed_ms(), 500);
        assert!(!controller.is_running());
        assert_eq!(ticker.active(), 0);
    }

    #[test]
    fn ticks_republish_elapsed_time() {
        let (mut controller, clock, ticker) = fixture();
        let published = Rc::new(RefCell::new(Vec::new()));
        let sink = published.clone();
        controller.set_listener(move |s| sink.borrow_mut().push(s));

        controller.start();
        for _ in 0..3 {
            clock.advance(10);
            ticker.fire();
        }

        let elapsed: Vec<u64> = published.borrow().iter().map(|s| s.elapsed_ms).collect();
        assert_eq!(elapsed, vec![0, 10, 20, 30]);
        assert!(published.borrow().iter().all(|s| s.running));
        assert_eq!(controller.elapsed_ms(), 30);
    }

    #[test]
    fn elapsed_accumulates_across_stop_start_pairs() {
        let (mut controller, clock, _) = fixture();
        controller.start();
        clock.advance(1_000);
        controller.stop();
        assert_eq!(controller.elapsed_ms(), 1_000);

        // time passing while stopped does not count
        clock.advance(7_000);
        controller.start();
        clock.advance(500);
        controller.stop();
        assert_eq!(controller.elapsed_ms(), 1_500);
    }

    #[test]
    fn start_while_running_keeps_anchor_and_sampler() {
        let (mut controller, clock, ticker) = fixture();
        controller.start();
        let anchor = controller.state().anchor_ms();

        clock.advance(200);
        controller.start();
        assert_eq!(controller.state().anchor_ms(), anchor);
        assert_eq!(ticker.active(), 1);
        assert_eq!(controller.sampling(), 1);

        clock.advance(100);
        ticker.fire();
        assert_eq!(controller.elapsed_ms(), 300);
    }

    #[test]
    fn stop_while_stopped_is_noop() {
        let (mut controller, clock, _) = fixture();
        controller.start();
        clock.advance(250);
        controller.stop();

        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        controller.set_listener(move |_| seen.set(seen.get() + 1));

        clock.advance(1_000);
        controller.stop();
        assert_eq!(controller.elapsed_ms(), 250);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn reset_zeroes_from_any_state() {
        let (mut controller, clock, ticker) = fixture();
        controller.reset();
        assert_eq!(controller.snapshot(), Snapshot::default());

        controller.start();
        clock.advance(900);
        ticker.fire();
        controller.reset();
        assert_eq!(controller.snapshot(), Snapshot::default());
        assert_eq!(ticker.active(), 0);

        controller.start();
        clock.advance(300);
        controller.stop();
        controller.reset();
        assert_eq!(controller.snapshot(), Snapshot::default());
    }

    #[test]
    fn no_updates_after_stop_or_reset() {
        let (mut controller, clock, ticker) = fixture();
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        controller.set_listener(move |_| seen.set(seen.get() + 1));

        controller.start();
        controller.stop();
        let after_stop = count.get();
        clock.advance(50);
        ticker.fire();
        assert_eq!(count.get(), after_stop);

        controller.start();
        controller.reset();
        let after_reset = count.get();
        clock.advance(50);
        ticker.fire();
        assert_eq!(count.get(), after_reset);
        assert_eq!(controller.elapsed_ms(), 0);
    }

    #[test]
    fn repeated_cycles_never_leak_samplers() {
        let (mut controller, clock, ticker) = fixture();
        for _ in 0..20 {
            controller.start();
            controller.start();
            clock.advance(10);
            ticker.fire();
            controller.stop();
        }
        assert_eq!(ticker.active(), 0);
        assert_eq!(controller.elapsed_ms(), 200);
    }

    #[test]
    fn dropping_controller_cancels_sampling() {
        let (mut controller, _, ticker) = fixture();
        controller.start();
        drop(controller);
        assert_eq!(ticker.active(), 0);
        ticker.fire();
    }

    #[test]
    fn state_never_goes_negative_on_young_clock() {
        let mut state = TimerState::new();
        state.start(10_000);
        state.stop(70_000);
        assert_eq!(state.elapsed_ms(), 60_000);

        // clock origin more recent than accumulated time
        assert!(state.start(1_000));
        assert_eq!(state.anchor_ms(), Some(-59_000));
        assert_eq!(state.sample(2_000), 61_000);

        let mut backwards = TimerState::new();
        backwards.start(5_000);
        assert_eq!(backwards.sample(4_000), 0);
    }

    #[test]
    fn display_reports_state() {
        let mut state = TimerState::new();
        assert_eq!(state.to_string(), "00:00:00 (stopped)");
        state.start(0);
        state.sample(61_234);
        assert_eq!(state.to_string(), "01:01:23 (running)");
    }
}
