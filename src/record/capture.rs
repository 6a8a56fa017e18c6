/// Fixed-rate sampler turning draw-loop elapsed time into encoder frame counts.
///
/// Frame `k` is due at `k * 1000 / fps` ms. A slow draw loop yields several frames per call
/// (the composite is repeated); a fast one yields zero on most calls.
#[derive(Clone, Debug)]
pub struct CaptureClock {
    fps: u32,
    emitted: u64,
}

impl CaptureClock {
    /// Sampler at `fps` frames per second (at least 1).
    pub fn new(fps: u32) -> Self {
        Self {
            fps: fps.max(1),
            emitted: 0,
        }
    }

    /// Configured rate.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Frames handed out so far.
    pub fn frames_emitted(&self) -> u64 {
        self.emitted
    }

    /// Number of frames to capture now, `elapsed_ms` after the first draw.
    ///
    /// Never goes backwards: a smaller `elapsed_ms` than before yields zero.
    pub fn frames_due(&mut self, elapsed_ms: f64) -> u64 {
        if !elapsed_ms.is_finite() || elapsed_ms < 0.0 {
            return 0;
        }
        let due = (elapsed_ms * f64::from(self.fps) / 1000.0).floor() as u64 + 1;
        let n = due.saturating_sub(self.emitted);
        self.emitted = self.emitted.max(due);
        n
    }
}

#[cfg(test)]
#[path = "../../tests/unit/record/capture.rs"]
mod tests;
