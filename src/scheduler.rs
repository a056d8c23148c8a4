use tracing::{debug, trace};

/// Fixed-rate frame scheduler for the navigation loop.
///
/// The scheduler is either idle or holds the absolute time of the next frame. Late frames are
/// caught up by snapping the deadline to the next tick of the original phase instead of drifting.
#[derive(Debug, Clone)]
pub struct AnimationScheduler {
    next_frame: Option<f64>,
    last_frame: Option<f64>,
    frame_period: f64,
    max_catch_up: f64,
}

impl AnimationScheduler {
    pub fn new(fps: f64, max_catch_up: f64) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 { fps } else { 90.0 };
        Self { next_frame: None, last_frame: None, frame_period: 1.0 / fps, max_catch_up: max_catch_up.max(1.0) }
    }

    pub fn frame_period(&self) -> f64 {
        self.frame_period
    }

    pub fn is_animating(&self) -> bool {
        self.next_frame.is_some()
    }

    pub fn next_frame(&self) -> Option<f64> {
        self.next_frame
    }

    pub fn last_frame(&self) -> Option<f64> {
        self.last_frame
    }

    /// True when a frame is scheduled and `t` has reached its deadline.
    pub fn is_due(&self, t: f64) -> bool {
        self.next_frame.is_some_and(|deadline| t >= deadline)
    }

    /// Schedules the first frame one period from `now`. No-op when already scheduled.
    pub fn start(&mut self, now: f64) {
        if self.next_frame.is_none() {
            let deadline = now + self.frame_period;
            debug!(deadline, "animation loop scheduled");
            self.next_frame = Some(deadline);
        }
    }

    pub fn stop(&mut self) {
        if self.next_frame.take().is_some() {
            debug!("animation loop idle");
        }
    }

    /// Records that a frame was composited at `now`.
    pub fn mark_drawn(&mut self, now: f64) {
        self.last_frame = Some(now);
    }

    /// Elapsed time since the last drawn frame in nominal frames, clamped to `[1, max_catch_up]`.
    pub fn frame_delta(&self, t: f64) -> f64 {
        match self.last_frame {
            Some(last) => ((t - last) / self.frame_period).clamp(1.0, self.max_catch_up),
            None => 1.0,
        }
    }

    /// Moves the deadline past the frame just handled at `t`, aligned to the schedule's phase.
    pub fn reschedule(&mut self, t: f64, now: f64) {
        let Some(deadline) = self.next_frame else {
            return;
        };
        let period = self.frame_period;
        let required = now.max(t + period);
        let ticks = ((required - deadline) / period - 0.01).ceil().max(0.0);
        let next = deadline + period * ticks;
        trace!(t, next, ticks, "frame rescheduled");
        self.next_frame = Some(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FPS: f64 = 90.0;

    #[test]
    fn start_schedules_one_period_ahead_once() {
        let mut scheduler = AnimationScheduler::new(FPS, 5.0);
        assert!(!scheduler.is_animating());
        scheduler.start(10.0);
        let first = scheduler.next_frame().unwrap();
        assert!((first - (10.0 + 1.0 / FPS)).abs() < 1e-12);
        scheduler.start(11.0);
        assert_eq!(scheduler.next_frame(), Some(first));
        scheduler.stop();
        assert!(scheduler.next_frame().is_none());
    }

    #[test]
    fn frame_delta_is_clamped() {
        let mut scheduler = AnimationScheduler::new(FPS, 5.0);
        assert_eq!(scheduler.frame_delta(3.0), 1.0);
        scheduler.mark_drawn(1.0);
        assert_eq!(scheduler.frame_delta(1.0 + 0.1 / FPS), 1.0);
        assert!((scheduler.frame_delta(1.0 + 3.0 / FPS) - 3.0).abs() < 1e-9);
        assert_eq!(scheduler.frame_delta(100.0), 5.0);
    }

    #[test]
    fn on_time_frames_advance_by_one_period() {
        let mut scheduler = AnimationScheduler::new(FPS, 5.0);
        scheduler.start(0.0);
        let deadline = scheduler.next_frame().unwrap();
        scheduler.reschedule(deadline, deadline);
        let next = scheduler.next_frame().unwrap();
        assert!((next - deadline - 1.0 / FPS).abs() < 1e-12);
    }

    #[test]
    fn late_frames_keep_the_phase() {
        let mut scheduler = AnimationScheduler::new(FPS, 5.0);
        let period = scheduler.frame_period();
        scheduler.start(0.0);
        let deadline = scheduler.next_frame().unwrap();
        let late = deadline + 3.4 * period;
        scheduler.reschedule(deadline, late);
        let next = scheduler.next_frame().unwrap();
        let ticks = (next - deadline) / period;
        assert!((ticks - ticks.round()).abs() < 1e-9, "deadline stays on the original grid");
        assert!(next >= late - 0.01 * period);
        assert!(next > deadline);
    }
}
