//! Playback clock state machine and the animation driver that feeds it.

pub(crate) mod clock;
pub(crate) mod driver;
pub(crate) mod state;
