//! Wall-Clock Timing
//!
//! One measurement contract for every backend: the caller starts a timer,
//! invokes the transform, and reads fractional milliseconds. Suspension
//! inside the call (worker IPC, network round-trip) is part of the
//! measured window on purpose.

use std::time::{Duration, Instant};

/// Timer for measuring one transform invocation.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer.
    #[inline]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed time since the timer was started.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Elapsed wall-clock time in fractional milliseconds.
    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        duration_ms(self.start.elapsed())
    }
}

/// Convert a duration to fractional milliseconds.
#[inline]
pub fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
