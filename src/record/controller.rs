use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use anyhow::Context;
use chrono::NaiveDateTime;

use crate::assets::cache::ImageCache;
use crate::encode::codec::{CodecProfile, negotiate_codec};
use crate::encode::encoder::EncoderBackend;
use crate::foundation::error::{TripReelError, TripReelResult};
use crate::map::MapView;
use crate::playback::clock::MIN_REPLAY_WAYPOINTS;
use crate::playback::state::PlaybackStatus;
use crate::record::session::{FrameInputs, RecordedVideo, RecordingSession};
use crate::render::composer::FrameComposer;
use crate::schedule::{FrameRequestId, FrameScheduler};
use crate::trajectory::waypoint::Waypoint;

/// Recorder lifecycle as shown to the UI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordingStatus {
    /// Ready to record.
    #[default]
    Idle,
    /// A session is drawing and encoding.
    Recording,
    /// Stop requested; waiting for the encoder to hand back the video.
    Processing,
    /// No capture/encode path on this host. Terminal.
    Unsupported,
}

/// Saved-artifact file name, e.g. `trip-replay-20240501-083000.webm`.
pub fn video_file_name(at: NaiveDateTime, codec: &CodecProfile) -> String {
    format!(
        "trip-replay-{}.{}",
        at.format("%Y%m%d-%H%M%S"),
        codec.extension
    )
}

/// Owns at most one [`RecordingSession`] and the finished video awaiting save or discard.
pub struct RecorderController {
    backend: Box<dyn EncoderBackend>,
    codec: Option<CodecProfile>,
    status: RecordingStatus,
    session: Option<RecordingSession>,
    composer: FrameComposer,
    images: ImageCache,
    done_tx: Sender<RecordedVideo>,
    done_rx: Receiver<RecordedVideo>,
    pending: Option<RecordedVideo>,
    last_error: Option<String>,
}

impl std::fmt::Debug for RecorderController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecorderController")
            .field("status", &self.status)
            .field("codec", &self.codec.map(|c| c.mime_type))
            .field("session", &self.session)
            .field("pending_bytes", &self.pending.as_ref().map(RecordedVideo::size))
            .finish()
    }
}

impl RecorderController {
    /// Probe `backend` once and settle on a codec, or on [`RecordingStatus::Unsupported`].
    pub fn new(
        backend: Box<dyn EncoderBackend>,
        composer: FrameComposer,
        images: ImageCache,
    ) -> Self {
        let codec = if backend.can_capture() {
            negotiate_codec(|c| backend.is_type_supported(c))
        } else {
            None
        };
        let status = match codec {
            Some(c) => {
                tracing::info!(codec = c.mime_type, "recording supported");
                RecordingStatus::Idle
            }
            None => {
                tracing::warn!("no supported capture/encode path; recording disabled");
                RecordingStatus::Unsupported
            }
        };
        let (done_tx, done_rx) = mpsc::channel();
        Self {
            backend,
            codec,
            status,
            session: None,
            composer,
            images,
            done_tx,
            done_rx,
            pending: None,
            last_error: None,
        }
    }

    /// Current status.
    pub fn status(&self) -> RecordingStatus {
        self.status
    }

    /// `false` only when the host cannot record at all.
    pub fn is_supported(&self) -> bool {
        self.status != RecordingStatus::Unsupported
    }

    /// A session is drawing and encoding.
    pub fn is_recording(&self) -> bool {
        self.status == RecordingStatus::Recording
    }

    /// Waiting for the encoder to finish.
    pub fn is_processing(&self) -> bool {
        self.status == RecordingStatus::Processing
    }

    /// Negotiated format, if any.
    pub fn codec(&self) -> Option<CodecProfile> {
        self.codec
    }

    /// Finished video awaiting save or discard.
    pub fn pending_video(&self) -> Option<&RecordedVideo> {
        self.pending.as_ref()
    }

    /// Message from the last failed session, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Active session, for inspection.
    pub fn session(&self) -> Option<&RecordingSession> {
        self.session.as_ref()
    }

    /// Overlay renderer used for recorded frames.
    pub fn composer_mut(&mut self) -> &mut FrameComposer {
        &mut self.composer
    }

    /// Whether `id` is the active session's draw request.
    pub fn owns(&self, id: FrameRequestId) -> bool {
        self.session.as_ref().is_some_and(|s| s.owns(id))
    }

    /// Start recording `map`. No-op (returns `false`) unless idle, a codec was negotiated, and
    /// the trajectory has at least two waypoints.
    pub fn start_auto_record(
        &mut self,
        map: &dyn MapView,
        waypoint_count: usize,
        scheduler: &mut dyn FrameScheduler,
    ) -> bool {
        if self.status != RecordingStatus::Idle || waypoint_count < MIN_REPLAY_WAYPOINTS {
            return false;
        }
        let Some(codec) = self.codec else {
            return false;
        };
        if self.pending.take().is_some() {
            tracing::debug!("unsaved video replaced by new recording");
        }

        let tx = self.done_tx.clone();
        let on_complete = move |v| {
            // Receiver is owned by this controller, which outlives the session.
            let _ = tx.send(v);
        };
        let built =
            RecordingSession::new(map.dimensions(), codec, self.backend.as_ref(), on_complete);
        let mut session = match built {
            Ok(s) => s,
            Err(err) => {
                self.record_failure(&err);
                return false;
            }
        };
        if let Err(err) = session.start(scheduler) {
            session.dispose(scheduler);
            self.record_failure(&err);
            return false;
        }

        self.session = Some(session);
        self.status = RecordingStatus::Recording;
        self.last_error = None;
        true
    }

    /// React to a playback status change: completion while recording stops the recording.
    pub fn on_playback_status(&mut self, status: PlaybackStatus) {
        if status == PlaybackStatus::Completed && self.status == RecordingStatus::Recording {
            tracing::debug!("playback completed; stopping recording");
            self.stop();
        }
    }

    /// Ask the active session to finish. The video arrives through [`RecorderController::pump`].
    pub fn stop(&mut self) {
        if self.status != RecordingStatus::Recording {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.stop();
            self.status = RecordingStatus::Processing;
        }
    }

    /// Route a fired frame request to the active session. Returns `false` for foreign ids.
    pub fn on_frame(
        &mut self,
        id: FrameRequestId,
        frame_time_ms: f64,
        map: &mut dyn MapView,
        waypoint: Option<&Waypoint>,
        scheduler: &mut dyn FrameScheduler,
    ) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let inputs = FrameInputs {
            map,
            composer: &mut self.composer,
            waypoint,
            images: &self.images,
        };
        let handled = match session.on_frame(id, frame_time_ms, inputs, scheduler) {
            Ok(handled) => handled,
            Err(err) => {
                self.abort(&err, scheduler);
                return true;
            }
        };
        if handled {
            self.pump(scheduler);
        }
        handled
    }

    /// Drain encoder events and collect a finished video, if any.
    pub fn pump(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Some(session) = self.session.as_mut()
            && let Err(err) = session.pump()
        {
            self.abort(&err, scheduler);
            return;
        }
        if let Ok(video) = self.done_rx.try_recv() {
            tracing::info!(bytes = video.size(), codec = video.codec.mime_type, "video ready");
            self.pending = Some(video);
            if let Some(mut session) = self.session.take() {
                // Finished sessions still hold a draw request.
                session.dispose(scheduler);
            }
            self.status = RecordingStatus::Idle;
        }
    }

    /// Write the pending video into `dir` and clear it. `Ok(None)` when nothing is pending.
    #[tracing::instrument(skip(self), fields(dir = %dir.as_ref().display()))]
    pub fn save_video(&mut self, dir: impl AsRef<Path>) -> TripReelResult<Option<PathBuf>> {
        let Some(video) = self.pending.take() else {
            return Ok(None);
        };
        let dir = dir.as_ref();
        let path = dir.join(video_file_name(
            chrono::Local::now().naive_local(),
            &video.codec,
        ));
        let written = std::fs::create_dir_all(dir)
            .with_context(|| format!("create output directory '{}'", dir.display()))
            .and_then(|()| {
                std::fs::write(&path, &video.data)
                    .with_context(|| format!("write video '{}'", path.display()))
            });
        if let Err(err) = written {
            self.pending = Some(video);
            return Err(TripReelError::from(err));
        }
        tracing::info!(path = %path.display(), bytes = video.size(), "video saved");
        Ok(Some(path))
    }

    /// Drop the pending video. Returns whether one existed.
    pub fn discard_video(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Dispose any live session so no encoder outlives the replay.
    pub fn teardown(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Some(mut session) = self.session.take() {
            session.dispose(scheduler);
        }
        if self.status != RecordingStatus::Unsupported {
            self.status = RecordingStatus::Idle;
        }
    }

    fn abort(&mut self, err: &TripReelError, scheduler: &mut dyn FrameScheduler) {
        if let Some(mut session) = self.session.take() {
            session.dispose(scheduler);
        }
        self.status = RecordingStatus::Idle;
        self.record_failure(err);
    }

    fn record_failure(&mut self, err: &TripReelError) {
        tracing::error!(error = %err, "recording failed");
        self.last_error = Some(err.to_string());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/record/controller.rs"]
mod tests;
