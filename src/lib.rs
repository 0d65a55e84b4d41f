//! Core of the stopwatch widget: elapsed-time state machine, display
//! formatting, and the persisted light/dark preference.
//!
//! Nothing in here touches the DOM directly. Time, repeating callbacks and
//! key-value storage come in through the [`Clock`], [`Ticker`] and
//! [`PreferenceStore`] capabilities, so the whole core runs natively under
//! `cargo test` with in-memory fakes.

use std::fmt;

pub mod clock;
pub mod config;
pub mod logging;
pub mod theme;
pub mod ticker;
pub mod timer;

pub use clock::{Clock, ManualClock, WebClock};
pub use theme::{
    Lenient, LocalStore, MemoryStore, PreferenceStore, StorageError, Theme, ThemeToggle,
    TryPreferenceStore,
};
pub use ticker::{IntervalTicker, ManualTicker, Ticker};
pub use timer::{Snapshot, TimerController, TimerState};

/// Elapsed time split into the three display fields.
///
/// Minutes wrap at 60; there is no hour field, so 61 minutes shows as 01.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayTime {
    pub minutes: u8,
    pub seconds: u8,
    pub centiseconds: u8,
}

impl DisplayTime {
    pub fn from_millis(ms: u64) -> Self {
        Self {
            minutes: ((ms / 60_000) % 60) as u8,
            seconds: ((ms / 1_000) % 60) as u8,
            centiseconds: ((ms % 1_000) / 10) as u8,
        }
    }

    /// Zero-padded `[minutes, seconds, centiseconds]`.
    pub fn parts(&self) -> [String; 3] {
        [
            format!("{:02}", self.minutes),
            format!("{:02}", self.seconds),
            format!("{:02}", self.centiseconds),
        ]
    }
}

impl fmt::Display for DisplayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.minutes, self.seconds, self.centiseconds
        )
    }
}

/// Format elapsed milliseconds as `MM:SS:CC`.
pub fn format_elapsed(ms: u64) -> String {
    DisplayTime::from_millis(ms).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn formats_zero() {
        assert_eq!(format_elapsed(0), "00:00:00");
    }

    #[test]
    fn formats_minutes_seconds_centiseconds() {
        let time = DisplayTime::from_millis(61_234);
        assert_eq!(
            time,
            DisplayTime {
                minutes: 1,
                seconds: 1,
                centiseconds: 23
            }
        );
        assert_eq!(time.to_string(), "01:01:23");
    }

    #[test]
    fn minutes_wrap_at_sixty() {
        assert_eq!(format_elapsed(3_600_000), "00:00:00");
        assert_eq!(format_elapsed(61 * 60_000), "01:00:00");
        assert_eq!(format_elapsed(3_599_999), "59:59:99");
    }

    #[test]
    fn centiseconds_truncate() {
        assert_eq!(format_elapsed(9), "00:00:00");
        assert_eq!(format_elapsed(10), "00:00:01");
        assert_eq!(format_elapsed(999), "00:00:99");
        assert_eq!(format_elapsed(1_000), "00:01:00");
    }

    #[test]
    fn parts_are_zero_padded() {
        assert_eq!(
            DisplayTime::from_millis(5_070).parts(),
            ["00".to_string(), "05".to_string(), "07".to_string()]
        );
    }
}
