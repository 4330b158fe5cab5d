use std::time::{Duration, Instant};

const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Counts frames and reports the rate once per interval.
#[derive(Debug)]
pub struct FrameCounter {
    window_start: Instant,
    frames: u32,
    fps: f32,
}

impl FrameCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
            fps: 0.0,
        }
    }

    /// Last reported rate.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Record a frame. Returns the new rate when a report is due.
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < REPORT_INTERVAL {
            return None;
        }
        self.fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.window_start = now;
        Some(self.fps)
    }
}

/// Reorder GL readback rows (bottom row first) into image order.
pub fn flip_rows(pixels: &[u8], width: usize, height: usize) -> Vec<u8> {
    let stride = width * 4;
    if stride == 0 || height == 0 {
        return Vec::new();
    }
    let mut flipped = Vec::with_capacity(stride * height);
    for row in pixels[..stride * height].chunks_exact(stride).rev() {
        flipped.extend_from_slice(row);
    }
    flipped
}
