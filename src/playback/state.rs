use crate::foundation::core::GeoPosition;

/// Playback status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackStatus {
    /// No trajectory loaded.
    #[default]
    Idle,
    /// Advancing on every tick.
    Playing,
    /// Trajectory loaded, clock frozen.
    Paused,
    /// Final waypoint reached.
    Completed,
}

/// Value snapshot of the playback state, read by the UI and the compositor each frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PlaybackSnapshot {
    /// Current status.
    pub status: PlaybackStatus,
    /// Index of the waypoint the marker departed from.
    pub current_waypoint_index: usize,
    /// Fraction of the current segment traversed, in `[0, 1)`.
    pub segment_progress: f64,
    /// Fraction of the whole trajectory traversed, in `[0, 1]`.
    pub total_progress: f64,
    /// Speed multiplier, always `> 0`.
    pub speed_multiplier: f64,
    /// Interpolated marker position; `None` while idle.
    pub current_position: Option<GeoPosition>,
}

/// One entry of the scrub timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TimelineEntry {
    /// Waypoint index (target of `seek_to_waypoint`).
    pub index: usize,
    /// Display title.
    pub label: String,
    /// Formatted capture date.
    pub date: String,
}

/// Side effect requested by a playback transition.
///
/// The clock never performs these itself; the effect runner executes them in order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlaybackEffect {
    /// Status moved from one value to another.
    StatusChanged {
        /// Previous status.
        from: PlaybackStatus,
        /// New status.
        to: PlaybackStatus,
    },
    /// Status entered `Playing`: start the animation driver.
    StartDriver,
    /// Status left `Playing`: stop the animation driver.
    StopDriver,
    /// The current waypoint changed: move the map camera.
    FlyTo {
        /// Waypoint index.
        index: usize,
        /// Camera target.
        position: GeoPosition,
        /// Camera animation duration.
        duration_ms: f64,
    },
}

/// Ordered effects emitted by one transition.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Effects(Vec<PlaybackEffect>);

impl Effects {
    pub(crate) fn push(&mut self, effect: PlaybackEffect) {
        self.0.push(effect);
    }

    /// Return `true` when the transition requested nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the effects in execution order.
    pub fn as_slice(&self) -> &[PlaybackEffect] {
        &self.0
    }

    /// Return `true` when `effect` was emitted.
    pub fn contains(&self, effect: &PlaybackEffect) -> bool {
        self.0.contains(effect)
    }

    /// Status change carried by this batch, if any.
    pub fn status_change(&self) -> Option<(PlaybackStatus, PlaybackStatus)> {
        self.0.iter().find_map(|e| match *e {
            PlaybackEffect::StatusChanged { from, to } => Some((from, to)),
            _ => None,
        })
    }

    /// Append every effect of `other`.
    pub fn extend(&mut self, other: Effects) {
        self.0.extend(other.0);
    }
}

impl IntoIterator for Effects {
    type Item = PlaybackEffect;
    type IntoIter = std::vec::IntoIter<PlaybackEffect>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
