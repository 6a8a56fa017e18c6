/// Convenience result type used across TripReel.
pub type TripReelResult<T> = Result<T, TripReelError>;

/// Top-level error taxonomy used by engine APIs.
///
/// The playback and recording state machines never surface these for degenerate input; they are
/// reserved for IO boundaries (config, encoder processes, artifact writes) and rendering setup.
#[derive(thiserror::Error, Debug)]
pub enum TripReelError {
    /// Invalid user-provided data or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while driving the playback state machine.
    #[error("playback error: {0}")]
    Playback(String),

    /// Errors while drawing overlays or preparing drawable resources.
    #[error("render error: {0}")]
    Render(String),

    /// Errors raised by a video encoder or its host process.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TripReelError {
    /// Build a [`TripReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TripReelError::Playback`] value.
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Build a [`TripReelError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`TripReelError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`TripReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
