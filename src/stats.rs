/// Cumulative keystroke counters and the metrics derived from them.
///
/// Accuracy and speed are recomputed from the counters on every read, never
/// accumulated incrementally, so they are always consistent with each other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsTracker {
    correct: u64,
    attempts: u64,
    elapsed_secs: f64,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_correct(&mut self) {
        self.correct += 1;
        self.attempts += 1;
    }

    pub fn record_wrong(&mut self) {
        self.attempts += 1;
    }

    pub fn advance(&mut self, dt_secs: f64) {
        self.elapsed_secs += dt_secs;
    }

    pub fn correct(&self) -> u64 {
        self.correct
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    /// Percentage of attempts that matched; 100.0 before the first attempt.
    pub fn accuracy(&self) -> f64 {
        if self.attempts == 0 {
            100.0
        } else {
            self.correct as f64 / self.attempts as f64 * 100.0
        }
    }

    pub fn error_rate(&self) -> f64 {
        100.0 - self.accuracy()
    }

    /// Correct characters per minute; 0.0 until the clock has advanced.
    /// Unclamped — the display layer bounds it for presentation.
    pub fn chars_per_min(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            0.0
        } else {
            self.correct as f64 / self.elapsed_secs * 60.0
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
