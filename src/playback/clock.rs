use crate::foundation::core::GeoPosition;
use crate::foundation::timing::{MAX_TICK_DELTA_MS, fly_to_duration_ms, segment_duration_ms};
use crate::playback::state::{
    Effects, PlaybackEffect, PlaybackSnapshot, PlaybackStatus, TimelineEntry,
};
use crate::trajectory::format::{display_title, format_capture_date};
use crate::trajectory::waypoint::Waypoint;

/// Minimum number of waypoints required to replay.
pub const MIN_REPLAY_WAYPOINTS: usize = 2;

#[derive(Clone, Copy)]
struct Observed {
    status: PlaybackStatus,
    index: usize,
}

/// Deterministic, seekable, variable-speed playback clock.
///
/// Owns the playback state exclusively. Every operation is a synchronous transition that returns
/// the [`Effects`] it requires (driver start/stop, camera moves, status notifications).
#[derive(Debug)]
pub struct PlaybackClock {
    waypoints: Vec<Waypoint>,
    status: PlaybackStatus,
    index: usize,
    segment_progress: f64,
    total_progress: f64,
    speed: f64,
    position: Option<GeoPosition>,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackClock {
    /// Create an idle clock at 1x speed.
    pub fn new() -> Self {
        Self {
            waypoints: Vec::new(),
            status: PlaybackStatus::Idle,
            index: 0,
            segment_progress: 0.0,
            total_progress: 0.0,
            speed: 1.0,
            position: None,
        }
    }

    /// Load a trajectory and begin at its first waypoint.
    ///
    /// Sequences shorter than [`MIN_REPLAY_WAYPOINTS`] leave the clock untouched.
    #[tracing::instrument(skip(self, waypoints), fields(len = waypoints.len()))]
    pub fn start(&mut self, waypoints: Vec<Waypoint>, begin_paused: bool) -> Effects {
        if waypoints.len() < MIN_REPLAY_WAYPOINTS {
            tracing::warn!("replay needs at least {MIN_REPLAY_WAYPOINTS} waypoints");
            return Effects::default();
        }
        let before = self.observe();
        self.waypoints = waypoints;
        self.status = if begin_paused {
            PlaybackStatus::Paused
        } else {
            PlaybackStatus::Playing
        };
        self.rewind();
        self.effects_since(before, true)
    }

    /// Advance by `delta_ms` of wall-clock time. No-op unless playing.
    pub fn tick(&mut self, delta_ms: f64) -> Effects {
        if self.status != PlaybackStatus::Playing {
            return Effects::default();
        }
        let before = self.observe();

        let delta = if delta_ms.is_finite() {
            delta_ms.clamp(0.0, MAX_TICK_DELTA_MS)
        } else {
            0.0
        };
        self.segment_progress += delta / segment_duration_ms(self.speed);

        let last_segment = self.waypoints.len().saturating_sub(2);
        while self.segment_progress >= 1.0 && self.index < last_segment {
            self.segment_progress -= 1.0;
            self.index += 1;
        }

        if self.segment_progress >= 1.0 {
            self.complete();
        } else {
            self.interpolate();
        }
        self.effects_since(before, false)
    }

    /// playing -> paused, paused -> playing, completed -> restart from the first waypoint.
    pub fn toggle_play_pause(&mut self) -> Effects {
        let before = self.observe();
        match self.status {
            PlaybackStatus::Idle => return Effects::default(),
            PlaybackStatus::Playing => self.status = PlaybackStatus::Paused,
            PlaybackStatus::Paused => self.status = PlaybackStatus::Playing,
            PlaybackStatus::Completed => {
                self.rewind();
                self.status = PlaybackStatus::Playing;
            }
        }
        self.effects_since(before, false)
    }

    /// Jump to an exact waypoint (no interpolation). The index is clamped into range.
    ///
    /// Seeking to the final waypoint completes playback; seeking elsewhere from `completed`
    /// demotes to `paused`. Any other status is kept.
    pub fn seek_to_waypoint(&mut self, index: usize) -> Effects {
        if self.status == PlaybackStatus::Idle {
            return Effects::default();
        }
        let before = self.observe();
        let last = self.waypoints.len() - 1;
        let index = index.min(last);

        if index == last {
            self.complete();
        } else {
            self.index = index;
            self.segment_progress = 0.0;
            self.total_progress = index as f64 / last as f64;
            self.position = Some(self.waypoints[index].position);
            if self.status == PlaybackStatus::Completed {
                self.status = PlaybackStatus::Paused;
            }
        }
        self.effects_since(before, true)
    }

    /// Change the speed multiplier; takes effect on the next tick without touching progress.
    ///
    /// Non-finite or non-positive values are ignored.
    pub fn set_speed_multiplier(&mut self, speed: f64) {
        if !speed.is_finite() || speed <= 0.0 {
            tracing::warn!(speed, "ignoring invalid speed multiplier");
            return;
        }
        self.speed = speed;
    }

    /// Return to the first waypoint, paused.
    pub fn reset(&mut self) -> Effects {
        if self.status == PlaybackStatus::Idle {
            return Effects::default();
        }
        let before = self.observe();
        self.rewind();
        self.status = PlaybackStatus::Paused;
        self.effects_since(before, true)
    }

    /// Drop the trajectory and return to idle.
    pub fn exit(&mut self) -> Effects {
        let before = self.observe();
        self.waypoints.clear();
        self.status = PlaybackStatus::Idle;
        self.index = 0;
        self.segment_progress = 0.0;
        self.total_progress = 0.0;
        self.position = None;
        self.effects_since(before, false)
    }

    /// Current status.
    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    /// Index of the waypoint the marker departed from.
    pub fn current_waypoint_index(&self) -> usize {
        self.index
    }

    /// Fraction of the current segment traversed.
    pub fn segment_progress(&self) -> f64 {
        self.segment_progress
    }

    /// Fraction of the trajectory traversed.
    pub fn total_progress(&self) -> f64 {
        self.total_progress
    }

    /// Speed multiplier.
    pub fn speed_multiplier(&self) -> f64 {
        self.speed
    }

    /// Interpolated marker position.
    pub fn current_position(&self) -> Option<GeoPosition> {
        self.position
    }

    /// Loaded waypoint sequence.
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Waypoint at the current index.
    pub fn current_waypoint(&self) -> Option<&Waypoint> {
        self.waypoints.get(self.index)
    }

    /// Value snapshot of the whole state.
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            status: self.status,
            current_waypoint_index: self.index,
            segment_progress: self.segment_progress,
            total_progress: self.total_progress,
            speed_multiplier: self.speed,
            current_position: self.position,
        }
    }

    /// Scrub timeline entries, one per waypoint.
    pub fn timeline(&self) -> Vec<TimelineEntry> {
        self.waypoints
            .iter()
            .map(|wp| TimelineEntry {
                index: wp.sequence_index,
                label: display_title(wp),
                date: format_capture_date(wp.timestamp),
            })
            .collect()
    }

    /// Remaining playback time at the current speed.
    pub fn estimated_remaining_ms(&self) -> f64 {
        if self.waypoints.len() < MIN_REPLAY_WAYPOINTS {
            return 0.0;
        }
        let segments = (self.waypoints.len() - 1) as f64;
        (1.0 - self.total_progress).max(0.0) * segments * segment_duration_ms(self.speed)
    }

    fn rewind(&mut self) {
        self.index = 0;
        self.segment_progress = 0.0;
        self.total_progress = 0.0;
        self.position = self.waypoints.first().map(|w| w.position);
    }

    fn complete(&mut self) {
        let last = self.waypoints.len() - 1;
        self.status = PlaybackStatus::Completed;
        self.index = last;
        self.segment_progress = 0.0;
        self.total_progress = 1.0;
        self.position = Some(self.waypoints[last].position);
    }

    fn interpolate(&mut self) {
        let from = self.waypoints[self.index].position;
        let to = self.waypoints[self.index + 1].position;
        self.position = Some(from.lerp(to, self.segment_progress));
        let segments = (self.waypoints.len() - 1) as f64;
        self.total_progress = ((self.index as f64 + self.segment_progress) / segments).min(1.0);
    }

    fn observe(&self) -> Observed {
        Observed {
            status: self.status,
            index: self.index,
        }
    }

    fn effects_since(&self, before: Observed, force_fly: bool) -> Effects {
        let mut fx = Effects::default();
        if before.status != self.status {
            tracing::debug!(from = ?before.status, to = ?self.status, "playback status");
            fx.push(PlaybackEffect::StatusChanged {
                from: before.status,
                to: self.status,
            });
            if self.status == PlaybackStatus::Playing {
                fx.push(PlaybackEffect::StartDriver);
            } else if before.status == PlaybackStatus::Playing {
                fx.push(PlaybackEffect::StopDriver);
            }
        }
        if (force_fly || before.index != self.index)
            && let Some(wp) = self.waypoints.get(self.index)
        {
            fx.push(PlaybackEffect::FlyTo {
                index: self.index,
                position: wp.position,
                duration_ms: fly_to_duration_ms(self.speed),
            });
        }
        fx
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/clock.rs"]
mod tests;
