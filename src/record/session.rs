use crate::assets::cache::ImageCache;
use crate::encode::codec::CodecProfile;
use crate::encode::encoder::{EncoderBackend, EncoderConfig, EncoderEvent, VideoEncoder};
use crate::foundation::core::Canvas;
use crate::foundation::error::{TripReelError, TripReelResult};
use crate::foundation::timing::{CAPTURE_FPS, INTRO_DURATION_MS};
use crate::map::MapView;
use crate::record::capture::CaptureClock;
use crate::render::composer::{FrameComposer, Overlay};
use crate::render::surface::Surface;
use crate::schedule::{FrameRequestId, FrameScheduler};
use crate::trajectory::waypoint::Waypoint;

/// A finished recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedVideo {
    /// Encoded container bytes.
    pub data: Vec<u8>,
    /// Format the bytes are in.
    pub codec: CodecProfile,
    /// Composite frames handed to the encoder.
    pub frames: u64,
}

impl RecordedVideo {
    /// Payload size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Lifecycle of a [`RecordingSession`]. `disposed` is tracked separately.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// Built, draw loop not started.
    Constructing,
    /// Drawing and encoding.
    Recording,
    /// Stop requested; waiting for the encoder to finish.
    Stopping,
    /// Encoder finished, failed, or the session never started.
    Finished,
}

/// Per-frame collaborators a session reads from.
pub struct FrameInputs<'a> {
    /// Live map; only its surface is read.
    pub map: &'a mut dyn MapView,
    /// Overlay renderer.
    pub composer: &'a mut FrameComposer,
    /// Waypoint the playback clock is currently on.
    pub waypoint: Option<&'a Waypoint>,
    /// Thumbnail source.
    pub images: &'a ImageCache,
}

type CompletionFn = Box<dyn FnOnce(RecordedVideo) + Send>;

/// One recording: an offscreen composite canvas redrawn every display frame and sampled into a
/// video encoder.
///
/// The completion callback runs at most once, from [`RecordingSession::pump`] after the encoder
/// reports it has stopped, and never after [`RecordingSession::dispose`].
pub struct RecordingSession {
    phase: SessionPhase,
    disposed: bool,
    composite: Surface,
    codec: CodecProfile,
    encoder: Box<dyn VideoEncoder>,
    chunks: Vec<Vec<u8>>,
    on_complete: Option<CompletionFn>,
    pending_frame: Option<FrameRequestId>,
    first_frame_ms: Option<f64>,
    intro_done: bool,
    capture: CaptureClock,
}

impl std::fmt::Debug for RecordingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingSession")
            .field("phase", &self.phase)
            .field("disposed", &self.disposed)
            .field("codec", &self.codec.mime_type)
            .field("intro_done", &self.intro_done)
            .field("frames", &self.capture.frames_emitted())
            .finish()
    }
}

impl RecordingSession {
    /// Allocate a composite canvas of `source` size and open an encoder for `codec`.
    pub fn new(
        source: Canvas,
        codec: CodecProfile,
        backend: &dyn EncoderBackend,
        on_complete: impl FnOnce(RecordedVideo) + Send + 'static,
    ) -> TripReelResult<Self> {
        let composite = Surface::new(source)?;
        let encoder = backend.open(EncoderConfig {
            canvas: source,
            fps: CAPTURE_FPS,
            codec,
        })?;
        Ok(Self {
            phase: SessionPhase::Constructing,
            disposed: false,
            composite,
            codec,
            encoder,
            chunks: Vec::new(),
            on_complete: Some(Box::new(on_complete)),
            pending_frame: None,
            first_frame_ms: None,
            intro_done: false,
            capture: CaptureClock::new(CAPTURE_FPS),
        })
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Whether [`RecordingSession::dispose`] has been called.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Whether the intro window has been passed; once set it stays set.
    pub fn is_intro_latched(&self) -> bool {
        self.intro_done
    }

    /// Negotiated format.
    pub fn codec(&self) -> CodecProfile {
        self.codec
    }

    /// Frames handed to the encoder so far.
    pub fn frames_captured(&self) -> u64 {
        self.capture.frames_emitted()
    }

    /// Last composited frame.
    pub fn composite(&self) -> &Surface {
        &self.composite
    }

    /// Whether `id` is this session's outstanding draw request.
    pub fn owns(&self, id: FrameRequestId) -> bool {
        self.pending_frame == Some(id)
    }

    /// Start the encoder and the draw loop.
    #[tracing::instrument(skip_all, fields(codec = self.codec.mime_type))]
    pub fn start(&mut self, scheduler: &mut dyn FrameScheduler) -> TripReelResult<()> {
        if self.disposed || self.phase != SessionPhase::Constructing {
            return Err(TripReelError::encode("recording session cannot be restarted"));
        }
        self.encoder.start()?;
        self.phase = SessionPhase::Recording;
        self.pending_frame = Some(scheduler.request_frame());
        tracing::info!("recording started");
        Ok(())
    }

    /// Flush buffered data and ask the encoder to stop. Idempotent.
    ///
    /// Completion is reported later through [`RecordingSession::pump`].
    pub fn stop(&mut self) {
        match self.phase {
            SessionPhase::Recording => {
                self.encoder.request_data();
                self.encoder.stop();
                self.phase = SessionPhase::Stopping;
                tracing::info!(frames = self.capture.frames_emitted(), "recording stopping");
            }
            SessionPhase::Constructing => {
                self.phase = SessionPhase::Finished;
                self.on_complete = None;
            }
            SessionPhase::Stopping | SessionPhase::Finished => {}
        }
    }

    /// Abandon the session: cancel the draw loop, kill the encoder, and drop the callback.
    pub fn dispose(&mut self, scheduler: &mut dyn FrameScheduler) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.on_complete = None;
        if let Some(id) = self.pending_frame.take() {
            scheduler.cancel_frame(id);
        }
        if self.encoder.is_active() {
            self.encoder.kill();
        }
        self.chunks.clear();
        tracing::debug!(phase = ?self.phase, "recording session disposed");
    }

    /// Handle a fired draw request: composite one frame, feed the encoder, reschedule.
    ///
    /// Returns `Ok(false)` for ids this session does not own.
    pub fn on_frame(
        &mut self,
        id: FrameRequestId,
        frame_time_ms: f64,
        inputs: FrameInputs<'_>,
        scheduler: &mut dyn FrameScheduler,
    ) -> TripReelResult<bool> {
        if !self.owns(id) {
            return Ok(false);
        }
        self.pending_frame = None;
        if self.disposed {
            return Ok(true);
        }

        let t0 = *self.first_frame_ms.get_or_insert(frame_time_ms);
        let elapsed = frame_time_ms - t0;
        self.composite_frame(elapsed, inputs)?;

        if self.phase == SessionPhase::Recording {
            for _ in 0..self.capture.frames_due(elapsed) {
                if !self.encoder.is_active() {
                    break;
                }
                self.encoder.push_frame(&self.composite)?;
            }
        }

        if self.phase != SessionPhase::Finished {
            self.pending_frame = Some(scheduler.request_frame());
        }
        Ok(true)
    }

    /// Blit the map and draw the overlays for `elapsed_ms` into the composite canvas.
    pub(crate) fn composite_frame(
        &mut self,
        elapsed_ms: f64,
        inputs: FrameInputs<'_>,
    ) -> TripReelResult<()> {
        if !self.intro_done && elapsed_ms >= INTRO_DURATION_MS {
            self.intro_done = true;
            tracing::debug!(elapsed_ms, "intro finished");
        }
        let overlay = if self.intro_done {
            Overlay::Content {
                waypoint: inputs.waypoint,
                images: inputs.images,
            }
        } else {
            Overlay::Intro {
                elapsed_ms: elapsed_ms.max(0.0),
            }
        };

        let source = inputs.map.snapshot_surface()?;
        inputs
            .composer
            .render_frame(source, &mut self.composite, overlay)
    }

    /// Drain encoder events. Fires the completion callback when the encoder has stopped.
    ///
    /// An `Err` means the encoder failed; partial data has been dropped.
    pub fn pump(&mut self) -> TripReelResult<()> {
        while let Some(event) = self.encoder.poll_event() {
            match event {
                EncoderEvent::DataAvailable(bytes) => {
                    if !self.disposed && !bytes.is_empty() {
                        self.chunks.push(bytes);
                    }
                }
                EncoderEvent::Stopped => {
                    self.phase = SessionPhase::Finished;
                    let data = std::mem::take(&mut self.chunks).concat();
                    if self.disposed {
                        continue;
                    }
                    if let Some(done) = self.on_complete.take() {
                        tracing::info!(bytes = data.len(), "recording finished");
                        done(RecordedVideo {
                            data,
                            codec: self.codec,
                            frames: self.capture.frames_emitted(),
                        });
                    }
                }
                EncoderEvent::Failed(msg) => {
                    self.phase = SessionPhase::Finished;
                    self.chunks.clear();
                    self.on_complete = None;
                    tracing::error!(error = %msg, "encoder failed");
                    return Err(TripReelError::encode(msg));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/record/session.rs"]
mod tests;
