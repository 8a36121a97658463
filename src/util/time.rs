//! Time utilities for the game simulation and gesture pipeline

use std::time::{Duration, Instant};

/// Fixed simulation step, ~60 ticks per second
pub const TICK_DURATION_MS: u64 = 16;
pub const TICK_INTERVAL: Duration = Duration::from_millis(TICK_DURATION_MS);

/// Monotonic millisecond clock anchored at construction.
///
/// Every core operation takes `now_ms` explicitly; this clock is what the
/// runtime feeds them so the frame callback and the tick loop share one
/// timeline.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Milliseconds elapsed since the clock was created
    pub fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Milliseconds between `earlier` and `now`, zero if the clock went backwards
pub fn elapsed_since(now_ms: u64, earlier_ms: u64) -> u64 {
    now_ms.saturating_sub(earlier_ms)
}

/// Format a play duration as `HH:MM:SS.cc` (centiseconds)
pub fn format_elapsed(millis: u64) -> String {
    let total_secs = millis / 1000;
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    let centis = (millis % 1000) / 10;
    format!("{hours:02}:{mins:02}:{secs:02}.{centis:02}")
}
