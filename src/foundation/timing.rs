//! Timing contract shared by playback and recording.
//!
//! The playback clock and the video compositor both derive their pacing from these values, so a
//! tuned constant changes both sides at once.

/// Nominal time to traverse one waypoint-to-waypoint segment at 1x speed.
pub const BASE_SEGMENT_MS: f64 = 2000.0;

/// Upper bound applied to a single tick delta (absorbs stalls after the host was backgrounded).
pub const MAX_TICK_DELTA_MS: f64 = 200.0;

/// Intro card fade-in window.
pub const INTRO_FADE_IN_MS: f64 = 500.0;

/// Intro card fully opaque window.
pub const INTRO_HOLD_MS: f64 = 1800.0;

/// Intro card fade-out window.
pub const INTRO_FADE_OUT_MS: f64 = 500.0;

/// Total intro phase length.
pub const INTRO_DURATION_MS: f64 = INTRO_FADE_IN_MS + INTRO_HOLD_MS + INTRO_FADE_OUT_MS;

/// Fixed capture rate of the composite canvas.
pub const CAPTURE_FPS: u32 = 30;

/// Camera follow duration at 1x speed.
pub const FLY_TO_MS: f64 = 1500.0;

/// Speed multipliers offered to the UI.
pub const SPEED_OPTIONS: [f64; 4] = [0.5, 1.0, 2.0, 4.0];

/// Duration of one segment at `speed`.
pub fn segment_duration_ms(speed: f64) -> f64 {
    BASE_SEGMENT_MS / speed
}

/// Camera follow duration at `speed`.
pub fn fly_to_duration_ms(speed: f64) -> f64 {
    FLY_TO_MS / speed
}
