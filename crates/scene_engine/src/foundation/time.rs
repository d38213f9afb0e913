//! Frame timing
//!
//! [`Stopwatch`] measures one span at a time (frame stats use it around each
//! submission). [`FrameClock`] paces a host loop at a fixed rate.

use std::time::{Duration, Instant};

/// Measures a single span between `start` and `lap`
#[derive(Debug, Default)]
pub struct Stopwatch {
    started: Option<Instant>,
}

impl Stopwatch {
    /// Create a stopped stopwatch
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a span, discarding any span in progress
    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    /// End the span and return its length; `None` when not running
    pub fn lap(&mut self) -> Option<Duration> {
        self.started.take().map(|start| start.elapsed())
    }

    /// Whether a span is in progress
    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }
}

/// Fixed-rate clock for a host frame loop
pub struct FrameClock {
    frame_time: Duration,
    created: Instant,
    frame_start: Instant,
    frames: u64,
}

impl FrameClock {
    /// Clock targeting `frames_per_second` (at least 1)
    pub fn new(frames_per_second: u32) -> Self {
        let now = Instant::now();
        Self {
            frame_time: Duration::from_secs(1) / frames_per_second.max(1),
            created: now,
            frame_start: now,
            frames: 0,
        }
    }

    /// Mark the start of a frame; returns the new frame number (from 1)
    pub fn begin_frame(&mut self) -> u64 {
        self.frame_start = Instant::now();
        self.frames += 1;
        self.frames
    }

    /// Sleep out whatever is left of the current frame's budget
    pub fn wait_for_next_frame(&self) {
        if let Some(remaining) = self.frame_time.checked_sub(self.frame_start.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    /// Target duration of one frame
    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }

    /// Seconds since the clock was created
    pub fn elapsed_secs(&self) -> f32 {
        self.created.elapsed().as_secs_f32()
    }

    /// Frames begun so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}
