//! Video encoding backends: codec negotiation, the encoder contract, ffmpeg and in-memory
//! implementations.

pub(crate) mod codec;
pub(crate) mod encoder;
pub(crate) mod ffmpeg;
