//! Time management utilities

use std::time::Instant;

/// Monotonic frame timer
///
/// Call [`Timer::tick`] once at the top of every frame; the returned delta is
/// the wall time since the previous tick. No clamping or accumulation is
/// applied, so the simulation runs on a variable timestep.
pub struct Timer {
    last_frame: Instant,
    total_time: f64,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Restart timing from now without counting the elapsed gap as a frame
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
    }

    /// Advance one frame and return its delta time in seconds
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.total_time += f64::from(delta_time);
        self.last_frame = now;
        self.frame_count += 1;
        delta_time
    }

    /// Get the total elapsed time across all ticks
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since timer creation
    pub fn average_fps(&self) -> f64 {
        if self.total_time > 0.0 {
            self.frame_count as f64 / self.total_time
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_is_monotonic() {
        let mut timer = Timer::new();
        let first = timer.tick();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = timer.tick();

        assert!(first >= 0.0);
        assert!(second > 0.0);
        assert_eq!(timer.frame_count(), 2);
        assert!(timer.total_time() >= f64::from(second));
    }

    #[test]
    fn test_average_fps_without_frames() {
        let timer = Timer::new();
        assert!(timer.average_fps().abs() < f64::EPSILON);
    }
}
