//! Frames-per-second counter.

use std::time::{Duration, Instant};

/// How often the displayed rate is recomputed
pub const UPDATE_INTERVAL: Duration = Duration::from_millis(500);

/// Counts frames and reports the average rate over the last interval.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frames: u32,
    interval_start: Instant,
    fps: f32,
}

impl FpsCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            frames: 0,
            interval_start: now,
            fps: 0.0,
        }
    }

    /// Record one frame at `now`. Returns the current rate.
    pub fn tick(&mut self, now: Instant) -> f32 {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.interval_start);
        if elapsed >= UPDATE_INTERVAL {
            self.fps = self.frames as f32 / elapsed.as_secs_f32();
            self.frames = 0;
            self.interval_start = now;
        }
        self.fps
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Text shown by the counter.
    pub fn label(&self) -> String {
        format!("{:.1} fps", self.fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_updates_once_per_interval() {
        let start = Instant::now();
        let mut counter = FpsCounter::new(start);
        assert_eq!(counter.label(), "0.0 fps");

        for i in 1..30 {
            let fps = counter.tick(start + Duration::from_millis(i * 16));
            assert_eq!(fps, 0.0);
        }
        // 30th frame at 480ms is still inside the first interval
        counter.tick(start + Duration::from_millis(480));
        let fps = counter.tick(start + Duration::from_millis(500));
        assert!((fps - 62.0).abs() < 1e-3, "{fps}");
        assert_eq!(counter.label(), "62.0 fps");
    }

    #[test]
    fn clock_going_backwards_is_ignored() {
        let start = Instant::now() + Duration::from_secs(1);
        let mut counter = FpsCounter::new(start);
        assert_eq!(counter.tick(start - Duration::from_millis(10)), 0.0);
    }
}
