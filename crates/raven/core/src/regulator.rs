//! Rate limiter for periodic bot subsystems.

/// How often a [`Regulator`] fires.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Schedule {
    /// Ready on every call.
    Always,
    /// Never ready.
    Never,
    /// Ready once per period (seconds).
    Every(f64),
}

/// Answers "is it time to run this subsystem again".
///
/// A regulator configured with period `P` returns `true` at most once in any
/// half-open window of length `P`. Trigger times stay on the phase grid set by
/// the first trigger: after a late call the next trigger is the first grid point
/// at least a full period away. Comparisons allow a nanosecond of slack so
/// frame times that land on a grid point up to rounding still trigger.
#[derive(Clone, Debug, PartialEq)]
pub struct Regulator {
    schedule: Schedule,
    next_update: Option<f64>,
}

impl Regulator {
    /// Slack absorbing floating point jitter in frame timestamps.
    const TOLERANCE: f64 = 1e-9;

    /// Creates a regulator from an update frequency in updates per second.
    ///
    /// A frequency of zero means always ready and a negative frequency means
    /// never ready.
    pub fn new(updates_per_second: f64) -> Self {
        let schedule = if updates_per_second > 0.0 {
            Schedule::Every(1.0 / updates_per_second)
        } else if updates_per_second == 0.0 {
            Schedule::Always
        } else {
            Schedule::Never
        };
        Self {
            schedule,
            next_update: None,
        }
    }

    pub fn always() -> Self {
        Self {
            schedule: Schedule::Always,
            next_update: None,
        }
    }

    pub fn never() -> Self {
        Self {
            schedule: Schedule::Never,
            next_update: None,
        }
    }

    /// Delays the first trigger until `time`, staggering regulators that
    /// would otherwise fire on the same update.
    #[must_use]
    pub fn first_ready_at(mut self, time: f64) -> Self {
        self.next_update = Some(time);
        self
    }

    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    /// Period in seconds for periodic regulators.
    pub fn period(&self) -> Option<f64> {
        match self.schedule {
            Schedule::Every(period) => Some(period),
            Schedule::Always | Schedule::Never => None,
        }
    }

    /// Returns `true` if the subsystem may run at `now`, advancing the next
    /// trigger time when it does.
    pub fn is_ready(&mut self, now: f64) -> bool {
        let period = match self.schedule {
            Schedule::Always => return true,
            Schedule::Never => return false,
            Schedule::Every(period) => period,
        };

        let Some(next_update) = self.next_update else {
            self.next_update = Some(now + period);
            return true;
        };

        if now + Self::TOLERANCE < next_update {
            return false;
        }

        let earliest = now + period - Self::TOLERANCE;
        let mut next = next_update + period;
        if next < earliest {
            next += ((earliest - next) / period).ceil() * period;
        }
        self.next_update = Some(next);
        true
    }
}
