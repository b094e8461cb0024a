//! Simulation clock.
//!
//! All time values in the core are simulated seconds. The clock is owned by
//! the world and advanced explicitly, so tests can step it deterministically.

/// Monotonic simulated clock.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimClock {
    now: f64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock starting at `now`.
    pub fn starting_at(now: f64) -> Self {
        Self { now }
    }

    /// Current simulated time in seconds.
    #[inline]
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Advances the clock. Negative or non-finite steps are ignored.
    pub fn advance(&mut self, seconds: f64) {
        if seconds.is_finite() && seconds > 0.0 {
            self.now += seconds;
        }
    }

    /// Moves the clock forward to `time` if it lies in the future.
    pub fn advance_to(&mut self, time: f64) {
        if time > self.now {
            self.now = time;
        }
    }
}
