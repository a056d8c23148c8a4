use std::time::{Duration, Instant};

/// Monotonic clock expressing time as seconds since the session started.
pub struct Time {
    start: Instant,
}

impl Time {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }

    pub fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    /// Converts a time from [`Time::now`]'s scale back into an [`Instant`] for the event loop.
    pub fn instant_at(&self, seconds: f64) -> Instant {
        if seconds.is_finite() && seconds > 0.0 {
            self.start + Duration::from_secs_f64(seconds)
        } else {
            self.start
        }
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
