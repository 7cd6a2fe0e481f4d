//! Frame timing for the tick loop.
//!
//! Counts ticks and samples the tick rate every half second, like a frame
//! counter in a render loop.
//!
//! # Example
//!
//! ```ignore
//! use morphcloud::time::FrameClock;
//!
//! let mut clock = FrameClock::new();
//! loop {
//!     sim.tick(frame);
//!     if let Some(fps) = clock.tick() {
//!         log::info!("{:.1} ticks/s", fps);
//!     }
//! }
//! ```

use std::time::{Duration, Instant};

/// Tick counter with periodic rate sampling.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    frame_count: u64,
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_interval(Duration::from_millis(500))
    }

    /// Clock that samples the rate every `interval`.
    pub fn with_interval(interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            start: now,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: interval,
        }
    }

    /// Count one frame. Returns the new rate when a sample was taken.
    pub fn tick(&mut self) -> Option<f32> {
        self.frame_count += 1;

        let now = Instant::now();
        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed < self.fps_update_interval {
            return None;
        }

        let frames_since = self.frame_count - self.fps_frame_count;
        self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
        self.fps_frame_count = self.frame_count;
        self.fps_update_time = now;
        Some(self.fps)
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Latest sampled rate, 0 before the first sample.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Seconds since the clock was created.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_frames() {
        let mut clock = FrameClock::new();
        for _ in 0..10 {
            clock.tick();
        }
        assert_eq!(clock.frame(), 10);
    }

    #[test]
    fn test_samples_after_interval() {
        let mut clock = FrameClock::with_interval(Duration::ZERO);
        std::thread::sleep(Duration::from_millis(2));
        let fps = clock.tick().unwrap();
        assert!(fps > 0.0);
        assert_eq!(clock.fps(), fps);
    }

    #[test]
    fn test_no_sample_before_interval() {
        let mut clock = FrameClock::with_interval(Duration::from_secs(3600));
        assert_eq!(clock.tick(), None);
        assert_eq!(clock.fps(), 0.0);
    }
}
