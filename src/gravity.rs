//! Fixed-cadence gravity timer

use std::time::{Duration, Instant};

/// Slowest and fastest allowed gravity, in rows per second
const MIN_ROWS_PER_SECOND: f64 = 0.1;
const MAX_ROWS_PER_SECOND: f64 = 60.0;

/// Decides when the active piece is owed its next one-row fall
#[derive(Debug, Clone)]
pub struct Gravity {
    interval: Duration,
    last_fall: Instant,
}

impl Gravity {
    /// Gravity pulling `rows_per_second` rows each second
    pub fn new(rows_per_second: f64, now: Instant) -> Self {
        let rate = if rows_per_second.is_finite() {
            rows_per_second.clamp(MIN_ROWS_PER_SECOND, MAX_ROWS_PER_SECOND)
        } else {
            MIN_ROWS_PER_SECOND
        };
        Self {
            interval: Duration::from_secs_f64(1.0 / rate),
            last_fall: now,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a fall step is due at `now`
    pub fn due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_fall) >= self.interval
    }

    /// Restart the cadence from `now`
    pub fn reset(&mut self, now: Instant) {
        self.last_fall = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_from_rate() {
        let gravity = Gravity::new(2.0, Instant::now());
        assert_eq!(gravity.interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_due_after_interval() {
        let start = Instant::now();
        let mut gravity = Gravity::new(4.0, start);
        assert!(!gravity.due(start));
        assert!(!gravity.due(start + Duration::from_millis(200)));
        assert!(gravity.due(start + Duration::from_millis(250)));

        gravity.reset(start + Duration::from_millis(250));
        assert!(!gravity.due(start + Duration::from_millis(300)));
    }

    #[test]
    fn test_rate_is_clamped() {
        let now = Instant::now();
        assert_eq!(Gravity::new(0.0, now).interval(), Duration::from_secs(10));
        assert_eq!(Gravity::new(f64::NAN, now).interval(), Duration::from_secs(10));
        assert!(Gravity::new(1000.0, now).interval() >= Duration::from_millis(16));
    }
}
