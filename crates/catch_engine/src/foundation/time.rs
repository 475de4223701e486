//! Time management utilities

use std::time::Instant;

/// High-precision frame timer.
///
/// The first tick only captures the baseline timestamp and reports a
/// delta of zero; every subsequent tick reports the elapsed time since
/// the previous one in seconds.
#[derive(Debug)]
pub struct Timer {
    last_frame: Option<Instant>,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer with no baseline captured yet
    pub fn new() -> Self {
        Self {
            last_frame: None,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Advance the timer by one frame and return the delta in seconds
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> f32 {
        self.delta_time = match self.last_frame {
            Some(prev) => now.duration_since(prev).as_secs_f32(),
            None => 0.0,
        };
        self.last_frame = Some(now);
        self.total_time += self.delta_time;
        self.frame_count += 1;
        self.delta_time
    }

    /// Get the time reported by the most recent tick in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total time accumulated across all ticks
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the number of ticks so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
