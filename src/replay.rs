use std::path::{Path, PathBuf};

use crate::assets::cache::ImageCache;
use crate::foundation::core::GeoPosition;
use crate::foundation::error::TripReelResult;
use crate::map::MapView;
use crate::playback::clock::PlaybackClock;
use crate::playback::driver::AnimationDriver;
use crate::playback::state::{
    Effects, PlaybackEffect, PlaybackSnapshot, PlaybackStatus, TimelineEntry,
};
use crate::record::controller::{RecorderController, RecordingStatus};
use crate::record::session::RecordedVideo;
use crate::schedule::{FrameRequestId, FrameScheduler, ManualScheduler};
use crate::trajectory::builder::build_waypoints;
use crate::trajectory::waypoint::{PhotoItem, Waypoint};

/// The replay subsystem as a UI sees it: actions, selectors, and recording controls.
///
/// Owns the playback clock, its animation driver, the recorder, the map adapter, and the frame
/// scheduler. Every transition's [`Effects`] are executed here, in order. The host forwards
/// fired frame requests to [`TripReplay::on_animation_frame`].
pub struct TripReplay<M: MapView, S: FrameScheduler> {
    clock: PlaybackClock,
    driver: AnimationDriver,
    recorder: RecorderController,
    images: ImageCache,
    map: M,
    scheduler: S,
}

impl<M: MapView, S: FrameScheduler> std::fmt::Debug for TripReplay<M, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripReplay")
            .field("playback", &self.clock.snapshot())
            .field("recorder", &self.recorder)
            .finish()
    }
}

impl<M: MapView, S: FrameScheduler> TripReplay<M, S> {
    /// Assemble a replay around a map and a scheduler.
    pub fn new(map: M, scheduler: S, recorder: RecorderController, images: ImageCache) -> Self {
        Self {
            clock: PlaybackClock::new(),
            driver: AnimationDriver::new(),
            recorder,
            images,
            map,
            scheduler,
        }
    }

    // --- actions ---

    /// Build waypoints from `items` and start playing. `false` when fewer than two survive.
    pub fn start_replay(&mut self, items: &[PhotoItem]) -> bool {
        self.start_replay_with(items, false)
    }

    /// Like [`TripReplay::start_replay`], optionally starting paused.
    #[tracing::instrument(skip(self, items), fields(items = items.len()))]
    pub fn start_replay_with(&mut self, items: &[PhotoItem], begin_paused: bool) -> bool {
        let waypoints = build_waypoints(items);
        if waypoints.len() < crate::playback::clock::MIN_REPLAY_WAYPOINTS {
            tracing::info!(waypoints = waypoints.len(), "not enough waypoints to replay");
            return false;
        }
        if self.clock.status() != PlaybackStatus::Idle {
            self.exit_replay();
        }
        for wp in &waypoints {
            self.images.request(&wp.photo.thumbnail_url);
        }
        tracing::info!(waypoints = waypoints.len(), "replay starting");
        let fx = self.clock.start(waypoints, begin_paused);
        self.apply(fx);
        true
    }

    /// Play/pause, or restart from the beginning once completed.
    pub fn toggle_play_pause(&mut self) {
        let fx = self.clock.toggle_play_pause();
        self.apply(fx);
    }

    /// Back to the first waypoint, paused.
    pub fn reset_replay(&mut self) {
        let fx = self.clock.reset();
        self.apply(fx);
    }

    /// Jump to waypoint `index` (clamped).
    pub fn seek_to_waypoint(&mut self, index: usize) {
        let fx = self.clock.seek_to_waypoint(index);
        self.apply(fx);
    }

    /// Change playback speed; takes effect on the next tick.
    pub fn set_speed_multiplier(&mut self, speed: f64) {
        self.clock.set_speed_multiplier(speed);
    }

    /// Leave replay mode: clear waypoints, stop the driver, dispose any recording.
    pub fn exit_replay(&mut self) {
        let fx = self.clock.exit();
        self.apply(fx);
        self.recorder.teardown(&mut self.scheduler);
    }

    // --- recording controls ---

    /// Record the map with overlays until playback completes.
    pub fn start_auto_record(&mut self) -> bool {
        let count = self.clock.waypoints().len();
        self.recorder
            .start_auto_record(&self.map, count, &mut self.scheduler)
    }

    /// Stop recording early.
    pub fn stop_recording(&mut self) {
        self.recorder.stop();
    }

    /// Write the pending video into `dir`.
    pub fn save_video(&mut self, dir: impl AsRef<Path>) -> TripReelResult<Option<PathBuf>> {
        self.recorder.save_video(dir)
    }

    /// Drop the pending video.
    pub fn discard_video(&mut self) -> bool {
        self.recorder.discard_video()
    }

    /// Recorder state.
    pub fn recorder(&self) -> &RecorderController {
        &self.recorder
    }

    /// Recorder, mutably.
    pub fn recorder_mut(&mut self) -> &mut RecorderController {
        &mut self.recorder
    }

    /// `false` when the host cannot record.
    pub fn is_recording_supported(&self) -> bool {
        self.recorder.is_supported()
    }

    /// A recording is in progress.
    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    /// A recording is finishing.
    pub fn is_processing(&self) -> bool {
        self.recorder.is_processing()
    }

    /// Recorder status.
    pub fn recording_status(&self) -> RecordingStatus {
        self.recorder.status()
    }

    /// Finished video awaiting save or discard.
    pub fn pending_video(&self) -> Option<&RecordedVideo> {
        self.recorder.pending_video()
    }

    // --- selectors ---

    /// Playback status.
    pub fn status(&self) -> PlaybackStatus {
        self.clock.status()
    }

    /// Index of the waypoint the current segment starts from.
    pub fn current_waypoint_index(&self) -> usize {
        self.clock.current_waypoint_index()
    }

    /// Interpolated marker position.
    pub fn current_position(&self) -> Option<GeoPosition> {
        self.clock.current_position()
    }

    /// Waypoint sequence of the active replay.
    pub fn waypoints(&self) -> &[Waypoint] {
        self.clock.waypoints()
    }

    /// Scrub-timeline entries.
    pub fn timeline(&self) -> Vec<TimelineEntry> {
        self.clock.timeline()
    }

    /// Current speed multiplier.
    pub fn speed_multiplier(&self) -> f64 {
        self.clock.speed_multiplier()
    }

    /// Overall progress in `[0, 1]`.
    pub fn total_progress(&self) -> f64 {
        self.clock.total_progress()
    }

    /// Full playback state.
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.clock.snapshot()
    }

    /// Playback clock.
    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    // --- host plumbing ---

    /// Map adapter.
    pub fn map(&self) -> &M {
        &self.map
    }

    /// Map adapter, mutably.
    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    /// Frame scheduler.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Frame scheduler, mutably.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Shared thumbnail cache.
    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    /// Handle one fired frame request at host time `frame_time_ms`.
    ///
    /// Driver frames tick playback; recorder frames composite and encode. Unknown ids are
    /// ignored.
    pub fn on_animation_frame(&mut self, id: FrameRequestId, frame_time_ms: f64) {
        self.map.advance_to(frame_time_ms);
        if self.driver.owns(id) {
            let fx = self
                .driver
                .on_frame(id, frame_time_ms, &mut self.clock, &mut self.scheduler);
            self.apply(fx);
            return;
        }
        if self.recorder.owns(id) {
            let waypoint = self.clock.current_waypoint();
            self.recorder.on_frame(
                id,
                frame_time_ms,
                &mut self.map,
                waypoint,
                &mut self.scheduler,
            );
        }
    }

    /// Collect encoder output; call once per host turn.
    pub fn pump(&mut self) {
        self.recorder.pump(&mut self.scheduler);
    }

    fn apply(&mut self, fx: Effects) {
        for effect in fx {
            match effect {
                PlaybackEffect::StatusChanged { from, to } => {
                    tracing::debug!(?from, ?to, "playback status changed");
                    self.recorder.on_playback_status(to);
                }
                PlaybackEffect::StartDriver => self.driver.start(&mut self.scheduler),
                PlaybackEffect::StopDriver => self.driver.stop(&mut self.scheduler),
                PlaybackEffect::FlyTo {
                    index,
                    position,
                    duration_ms,
                } => {
                    tracing::trace!(index, duration_ms, "fly to waypoint");
                    self.map.fly_to(position, duration_ms);
                }
            }
        }
        if let Some(p) = self.clock.current_position() {
            self.map.set_marker(p);
        }
    }
}

impl<M: MapView> TripReplay<M, ManualScheduler> {
    /// Fire every due frame request at `now_ms`, then pump. Returns how many fired.
    pub fn step(&mut self, now_ms: f64) -> usize {
        let due = self.scheduler.take_due();
        for id in &due {
            self.on_animation_frame(*id, now_ms);
        }
        self.pump();
        due.len()
    }
}

#[cfg(test)]
#[path = "../tests/unit/replay.rs"]
mod tests;
