use crate::playback::clock::PlaybackClock;
use crate::playback::state::{Effects, PlaybackStatus};
use crate::schedule::{FrameRequestId, FrameScheduler};

/// Per-frame loop feeding wall-clock deltas into a [`PlaybackClock`].
///
/// At most one frame request is outstanding at any time. The first frame after `start` reports a
/// zero delta.
#[derive(Debug, Default)]
pub struct AnimationDriver {
    pending: Option<FrameRequestId>,
    last_frame_ms: Option<f64>,
}

impl AnimationDriver {
    /// Create a stopped driver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the loop. Idempotent.
    pub fn start(&mut self, scheduler: &mut dyn FrameScheduler) {
        if self.pending.is_some() {
            return;
        }
        self.last_frame_ms = None;
        self.pending = Some(scheduler.request_frame());
        tracing::trace!("animation driver started");
    }

    /// Stop the loop, cancelling the outstanding request. Idempotent.
    pub fn stop(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Some(id) = self.pending.take() {
            scheduler.cancel_frame(id);
            tracing::trace!("animation driver stopped");
        }
        self.last_frame_ms = None;
    }

    /// Return `true` while a frame request is outstanding.
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Return `true` when `id` is this driver's outstanding request.
    pub fn owns(&self, id: FrameRequestId) -> bool {
        self.pending == Some(id)
    }

    /// Handle a fired frame request.
    ///
    /// Ids that are not the outstanding request (stale or foreign) are ignored.
    pub fn on_frame(
        &mut self,
        id: FrameRequestId,
        frame_time_ms: f64,
        clock: &mut PlaybackClock,
        scheduler: &mut dyn FrameScheduler,
    ) -> Effects {
        if !self.owns(id) {
            return Effects::default();
        }
        self.pending = None;

        let delta = match self.last_frame_ms {
            Some(last) => (frame_time_ms - last).max(0.0),
            None => 0.0,
        };
        self.last_frame_ms = Some(frame_time_ms);

        let effects = clock.tick(delta);
        if clock.status() == PlaybackStatus::Playing {
            self.pending = Some(scheduler.request_frame());
        } else {
            self.last_frame_ms = None;
        }
        effects
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/driver.rs"]
mod tests;
