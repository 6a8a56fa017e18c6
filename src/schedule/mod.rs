//! Per-frame scheduling primitive shared by the playback driver and the recording draw loop.

use std::collections::BTreeSet;

/// Handle returned by [`FrameScheduler::request_frame`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameRequestId(pub u64);

/// Host per-frame callback scheduler (the `requestAnimationFrame` seam).
///
/// A request fires at most once. Cancelling an id that already fired, or was never issued, is a
/// no-op.
pub trait FrameScheduler {
    /// Request a callback on the next display frame.
    fn request_frame(&mut self) -> FrameRequestId;
    /// Cancel a pending request.
    fn cancel_frame(&mut self, id: FrameRequestId);
}

/// Deterministic scheduler: the host (or a test) decides when frames fire and with which
/// timestamp.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: BTreeSet<FrameRequestId>,
}

impl ManualScheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain every request issued so far, in issue order.
    ///
    /// Requests issued while the returned ids are being dispatched belong to the next frame.
    pub fn take_due(&mut self) -> Vec<FrameRequestId> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    /// Number of outstanding requests.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Return `true` when `id` is still outstanding.
    pub fn is_pending(&self, id: FrameRequestId) -> bool {
        self.pending.contains(&id)
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameRequestId {
        let id = FrameRequestId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.pending.insert(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        self.pending.remove(&id);
    }
}

/// Fixed-interval timestamp source for offline hosts.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    interval_ms: f64,
    now_ms: f64,
}

impl FrameClock {
    /// Clock ticking at `hz` display frames per second, starting at `start_ms`.
    pub fn new(hz: f64, start_ms: f64) -> Self {
        Self {
            interval_ms: 1000.0 / hz.max(1.0),
            now_ms: start_ms,
        }
    }

    /// Current timestamp.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Advance by one display frame and return the new timestamp.
    pub fn advance(&mut self) -> f64 {
        self.now_ms += self.interval_ms;
        self.now_ms
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/frame.rs"]
mod tests;
