use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use crate::encode::codec::CodecProfile;
use crate::foundation::core::Canvas;
use crate::foundation::error::{TripReelError, TripReelResult};
use crate::render::surface::Surface;

/// Settings an encoder is opened with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Frame dimensions.
    pub canvas: Canvas,
    /// Constant input frame rate.
    pub fps: u32,
    /// Negotiated output format.
    pub codec: CodecProfile,
}

impl EncoderConfig {
    /// Reject configurations no backend can encode.
    pub fn validate(&self) -> TripReelResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(TripReelError::validation("encode width/height must be non-zero"));
        }
        if self.fps == 0 {
            return Err(TripReelError::validation("encode fps must be non-zero"));
        }
        if !self.canvas.width.is_multiple_of(2) || !self.canvas.height.is_multiple_of(2) {
            return Err(TripReelError::validation(
                "encode width/height must be even (required for yuv420p output)",
            ));
        }
        Ok(())
    }
}

/// Asynchronous notifications from an encoder, drained with [`VideoEncoder::poll_event`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncoderEvent {
    /// A chunk of encoded container bytes.
    DataAvailable(Vec<u8>),
    /// The encoder finished after a graceful stop; no more events follow.
    Stopped,
    /// The encoder died; no more events follow.
    Failed(String),
}

/// Stream encoder fed one composite frame at a time.
///
/// `stop` and `kill` are idempotent. After `kill` no further events are delivered.
pub trait VideoEncoder: Send {
    /// Begin accepting frames.
    fn start(&mut self) -> TripReelResult<()>;
    /// Encode one frame at the configured rate.
    fn push_frame(&mut self, frame: &Surface) -> TripReelResult<()>;
    /// Ask for any buffered output to be emitted as [`EncoderEvent::DataAvailable`].
    fn request_data(&mut self);
    /// Finish the stream; [`EncoderEvent::Stopped`] arrives later through `poll_event`.
    fn stop(&mut self);
    /// Abort immediately, discarding output.
    fn kill(&mut self);
    /// `true` between `start` and the end of the stream.
    fn is_active(&self) -> bool;
    /// Next pending event, without blocking.
    fn poll_event(&mut self) -> Option<EncoderEvent>;
}

/// Host capability probe and encoder factory.
pub trait EncoderBackend: Send {
    /// Whether composite frames can be captured at all.
    fn can_capture(&self) -> bool;
    /// Whether `codec` can be encoded.
    fn is_type_supported(&self, codec: &CodecProfile) -> bool;
    /// Create an encoder; it does nothing until `start`.
    fn open(&self, cfg: EncoderConfig) -> TripReelResult<Box<dyn VideoEncoder>>;
}

/// Counters shared between an [`InMemoryBackend`] and the encoders it opens.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EncoderLog {
    /// Encoders opened.
    pub opened: usize,
    /// Frames accepted across all encoders.
    pub frames: usize,
    /// `request_data` calls.
    pub flushes: usize,
    /// `stop` calls, including repeated ones.
    pub stops: usize,
    /// `kill` calls on active encoders.
    pub kills: usize,
}

/// Deterministic backend for tests and debugging.
///
/// Each accepted frame becomes a 5-byte record (`b'F'` + little-endian frame number) in the
/// output stream, so artifact sizes are predictable.
#[derive(Clone, Debug)]
pub struct InMemoryBackend {
    capture: bool,
    supported: Vec<&'static str>,
    fail_after_frames: Option<usize>,
    log: Arc<Mutex<EncoderLog>>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    /// Backend that supports every candidate codec.
    pub fn new() -> Self {
        Self {
            capture: true,
            supported: Vec::new(),
            fail_after_frames: None,
            log: Arc::default(),
        }
    }

    /// Backend without frame capture; negotiation always fails.
    pub fn without_capture() -> Self {
        Self {
            capture: false,
            ..Self::new()
        }
    }

    /// Restrict support to the given MIME types.
    pub fn supporting(mut self, mime_types: &[&'static str]) -> Self {
        self.supported = mime_types.to_vec();
        self
    }

    /// Opened encoders fail once they have accepted `frames` frames.
    pub fn failing_after(mut self, frames: usize) -> Self {
        self.fail_after_frames = Some(frames);
        self
    }

    /// Snapshot of the shared counters.
    pub fn log(&self) -> EncoderLog {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl EncoderBackend for InMemoryBackend {
    fn can_capture(&self) -> bool {
        self.capture
    }

    fn is_type_supported(&self, codec: &CodecProfile) -> bool {
        self.capture && (self.supported.is_empty() || self.supported.contains(&codec.mime_type))
    }

    fn open(&self, cfg: EncoderConfig) -> TripReelResult<Box<dyn VideoEncoder>> {
        cfg.validate()?;
        if !self.is_type_supported(&cfg.codec) {
            return Err(TripReelError::encode(format!(
                "unsupported codec {}",
                cfg.codec.mime_type
            )));
        }
        self.log.lock().unwrap_or_else(PoisonError::into_inner).opened += 1;
        Ok(Box::new(InMemoryEncoder {
            cfg,
            state: MemState::Idle,
            buffered: Vec::new(),
            events: VecDeque::new(),
            frames: 0,
            fail_after_frames: self.fail_after_frames,
            log: Arc::clone(&self.log),
        }))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MemState {
    Idle,
    Recording,
    Finished,
}

/// Encoder produced by [`InMemoryBackend`].
#[derive(Debug)]
pub struct InMemoryEncoder {
    cfg: EncoderConfig,
    state: MemState,
    buffered: Vec<u8>,
    events: VecDeque<EncoderEvent>,
    frames: u32,
    fail_after_frames: Option<usize>,
    log: Arc<Mutex<EncoderLog>>,
}

impl InMemoryEncoder {
    fn bump(&self, f: impl FnOnce(&mut EncoderLog)) {
        f(&mut self.log.lock().unwrap_or_else(PoisonError::into_inner));
    }

    fn flush(&mut self) {
        if !self.buffered.is_empty() {
            self.events
                .push_back(EncoderEvent::DataAvailable(std::mem::take(&mut self.buffered)));
        }
    }
}

impl VideoEncoder for InMemoryEncoder {
    fn start(&mut self) -> TripReelResult<()> {
        if self.state != MemState::Idle {
            return Err(TripReelError::encode("encoder already started"));
        }
        self.state = MemState::Recording;
        Ok(())
    }

    fn push_frame(&mut self, frame: &Surface) -> TripReelResult<()> {
        if self.state != MemState::Recording {
            return Err(TripReelError::encode("encoder is not recording"));
        }
        if frame.canvas() != self.cfg.canvas {
            return Err(TripReelError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.canvas().width,
                frame.canvas().height,
                self.cfg.canvas.width,
                self.cfg.canvas.height
            )));
        }
        if self
            .fail_after_frames
            .is_some_and(|limit| self.frames as usize >= limit)
        {
            self.state = MemState::Finished;
            self.buffered.clear();
            self.events
                .push_back(EncoderEvent::Failed("simulated encoder fault".to_owned()));
            return Ok(());
        }
        self.buffered.push(b'F');
        self.buffered.extend_from_slice(&self.frames.to_le_bytes());
        self.frames += 1;
        self.bump(|l| l.frames += 1);
        Ok(())
    }

    fn request_data(&mut self) {
        self.bump(|l| l.flushes += 1);
        if self.state == MemState::Recording {
            self.flush();
        }
    }

    fn stop(&mut self) {
        self.bump(|l| l.stops += 1);
        if self.state != MemState::Recording {
            return;
        }
        self.flush();
        self.events.push_back(EncoderEvent::Stopped);
        self.state = MemState::Finished;
    }

    fn kill(&mut self) {
        if self.state == MemState::Recording {
            self.bump(|l| l.kills += 1);
        }
        self.state = MemState::Finished;
        self.buffered.clear();
        self.events.clear();
    }

    fn is_active(&self) -> bool {
        self.state == MemState::Recording
    }

    fn poll_event(&mut self) -> Option<EncoderEvent> {
        self.events.pop_front()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/encoder.rs"]
mod tests;
