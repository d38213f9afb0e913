//! Frame-timing instrumentation
//!
//! Wraps each renderer submission in begin/end and keeps a running average.
//! Every `log_interval` frames the average is written to the log.

use std::time::Duration;

use crate::foundation::time::Stopwatch;

/// Running frame-time statistics
pub struct FrameStats {
    stopwatch: Stopwatch,
    window_time: Duration,
    window_frames: u32,
    total_frames: u64,
    log_interval: u32,
    last_average: Option<Duration>,
}

impl FrameStats {
    /// Create stats that log every `log_interval` frames (0 disables logging)
    pub fn new(log_interval: u32) -> Self {
        Self {
            stopwatch: Stopwatch::new(),
            window_time: Duration::ZERO,
            window_frames: 0,
            total_frames: 0,
            log_interval,
            last_average: None,
        }
    }

    /// Mark the start of a frame
    pub fn begin(&mut self) {
        self.stopwatch.start();
    }

    /// Mark the end of a frame
    pub fn end(&mut self) {
        let Some(frame_time) = self.stopwatch.lap() else {
            return;
        };
        self.window_time += frame_time;
        self.window_frames += 1;
        self.total_frames += 1;

        if self.log_interval > 0 && self.window_frames >= self.log_interval {
            let average = self.window_time / self.window_frames;
            let fps = if average.is_zero() { 0.0 } else { 1.0 / average.as_secs_f64() };
            log::info!(
                "Frame time: {:.3} ms avg over {} frames ({:.1} fps)",
                average.as_secs_f64() * 1000.0,
                self.window_frames,
                fps
            );
            self.last_average = Some(average);
            self.window_time = Duration::ZERO;
            self.window_frames = 0;
        }
    }

    /// Frames measured since creation
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Average of the most recently completed logging window
    pub fn last_average(&self) -> Option<Duration> {
        self.last_average
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_without_begin_is_ignored() {
        let mut stats = FrameStats::new(2);
        stats.end();
        assert_eq!(stats.total_frames(), 0);
    }

    #[test]
    fn test_average_published_per_window() {
        let mut stats = FrameStats::new(2);
        stats.begin();
        stats.end();
        assert!(stats.last_average().is_none());
        stats.begin();
        stats.end();
        assert_eq!(stats.total_frames(), 2);
        assert!(stats.last_average().is_some());
    }
}
