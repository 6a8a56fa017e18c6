use std::collections::HashSet;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::OnceLock;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use crate::encode::codec::CodecProfile;
use crate::encode::encoder::{EncoderBackend, EncoderConfig, EncoderEvent, VideoEncoder};
use crate::foundation::error::{TripReelError, TripReelResult};
use crate::foundation::math::flatten_premul_over_bg;
use crate::render::surface::Surface;

const STDOUT_CHUNK: usize = 64 * 1024;

/// Backend that encodes through the system `ffmpeg` binary.
///
/// Capability answers are probed once per backend and cached.
#[derive(Debug)]
pub struct FfmpegBackend {
    program: PathBuf,
    on_path: OnceLock<bool>,
    encoders: OnceLock<HashSet<String>>,
}

impl Default for FfmpegBackend {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FfmpegBackend {
    /// Backend invoking `program` (a name on `PATH` or a full path).
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            on_path: OnceLock::new(),
            encoders: OnceLock::new(),
        }
    }

    fn encoders(&self) -> &HashSet<String> {
        self.encoders.get_or_init(|| {
            if !self.can_capture() {
                return HashSet::new();
            }
            match Command::new(&self.program)
                .args(["-hide_banner", "-encoders"])
                .stdin(Stdio::null())
                .stderr(Stdio::null())
                .output()
            {
                Ok(out) if out.status.success() => {
                    parse_encoder_list(&String::from_utf8_lossy(&out.stdout))
                }
                Ok(out) => {
                    tracing::warn!(status = %out.status, "ffmpeg -encoders failed");
                    HashSet::new()
                }
                Err(err) => {
                    tracing::warn!(error = %err, "ffmpeg -encoders could not run");
                    HashSet::new()
                }
            }
        })
    }
}

impl EncoderBackend for FfmpegBackend {
    fn can_capture(&self) -> bool {
        *self.on_path.get_or_init(|| {
            Command::new(&self.program)
                .arg("-version")
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .map(|s| s.success())
                .unwrap_or(false)
        })
    }

    fn is_type_supported(&self, codec: &CodecProfile) -> bool {
        self.encoders().contains(codec.ffmpeg_encoder)
    }

    fn open(&self, cfg: EncoderConfig) -> TripReelResult<Box<dyn VideoEncoder>> {
        cfg.validate()?;
        Ok(Box::new(FfmpegEncoder::new(self.program.clone(), cfg)))
    }
}

/// Encoder names from `ffmpeg -encoders` output (rows after the `------` separator).
pub(crate) fn parse_encoder_list(text: &str) -> HashSet<String> {
    text.lines()
        .skip_while(|l| !l.trim_start().starts_with("---"))
        .skip(1)
        .filter_map(|l| l.split_whitespace().nth(1))
        .map(str::to_owned)
        .collect()
}

enum Pipe {
    Chunk(Vec<u8>),
    Eof,
    Error(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Recording,
    Stopping,
    Done,
}

/// Streams raw RGBA frames to `ffmpeg` stdin and reads container bytes back from stdout.
///
/// A drain thread forwards stdout in chunks over a channel; a second one collects stderr for
/// error reporting.
pub struct FfmpegEncoder {
    program: PathBuf,
    cfg: EncoderConfig,
    phase: Phase,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout_rx: Option<Receiver<Pipe>>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    scratch: Vec<u8>,
}

impl std::fmt::Debug for FfmpegEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfmpegEncoder")
            .field("program", &self.program)
            .field("cfg", &self.cfg)
            .field("phase", &self.phase)
            .finish()
    }
}

impl FfmpegEncoder {
    fn new(program: PathBuf, cfg: EncoderConfig) -> Self {
        Self {
            program,
            cfg,
            phase: Phase::Idle,
            child: None,
            stdin: None,
            stdout_rx: None,
            stderr_drain: None,
            scratch: Vec::new(),
        }
    }

    fn command(&self) -> Command {
        let EncoderConfig { canvas, fps, codec } = self.cfg;
        let mut cmd = Command::new(&self.program);
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        // Input: straight RGBA8; premultiplied frames are flattened in push_frame.
        cmd.args([
            "-hide_banner",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", canvas.width, canvas.height),
            "-framerate",
            &fps.to_string(),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            codec.ffmpeg_encoder,
            "-pix_fmt",
            "yuv420p",
        ]);
        cmd.args(codec.output_args);
        cmd.args(["-f", codec.ffmpeg_muxer, "pipe:1"]);
        cmd
    }

    fn fail(&mut self, msg: String) -> EncoderEvent {
        self.kill();
        EncoderEvent::Failed(msg)
    }

    fn finish(&mut self) -> EncoderEvent {
        drop(self.stdin.take());
        self.stdout_rx = None;
        self.phase = Phase::Done;
        let Some(mut child) = self.child.take() else {
            return EncoderEvent::Failed("ffmpeg encoder not started".to_owned());
        };
        let status = match child.wait() {
            Ok(s) => s,
            Err(e) => return EncoderEvent::Failed(format!("failed to wait for ffmpeg: {e}")),
        };
        let stderr_bytes = match self.stderr_drain.take().map(|h| h.join()) {
            Some(Ok(Ok(bytes))) => bytes,
            Some(Ok(Err(e))) => format!("ffmpeg stderr read failed: {e}").into_bytes(),
            Some(Err(_)) => b"ffmpeg stderr drain thread panicked".to_vec(),
            None => Vec::new(),
        };

        if status.success() {
            tracing::debug!("ffmpeg encoder finished");
            EncoderEvent::Stopped
        } else {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            EncoderEvent::Failed(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            ))
        }
    }
}

impl VideoEncoder for FfmpegEncoder {
    #[tracing::instrument(skip(self), fields(codec = self.cfg.codec.mime_type))]
    fn start(&mut self) -> TripReelResult<()> {
        if self.phase != Phase::Idle {
            return Err(TripReelError::encode("ffmpeg encoder already started"));
        }
        let mut child = self.command().spawn().map_err(|e| {
            TripReelError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| TripReelError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| TripReelError::encode("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| TripReelError::encode("failed to open ffmpeg stderr (unexpected)"))?;

        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let mut buf = vec![0u8; STDOUT_CHUNK];
            loop {
                let msg = match stdout.read(&mut buf) {
                    Ok(0) => Pipe::Eof,
                    Ok(n) => Pipe::Chunk(buf[..n].to_vec()),
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                    Err(e) => Pipe::Error(e.to_string()),
                };
                let last = !matches!(msg, Pipe::Chunk(_));
                if tx.send(msg).is_err() || last {
                    break;
                }
            }
        });
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        let canvas = self.cfg.canvas;
        self.scratch = vec![0u8; canvas.width as usize * canvas.height as usize * 4];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stdout_rx = Some(rx);
        self.stderr_drain = Some(stderr_drain);
        self.phase = Phase::Recording;
        tracing::info!(w = canvas.width, h = canvas.height, "ffmpeg encoder started");
        Ok(())
    }

    fn push_frame(&mut self, frame: &Surface) -> TripReelResult<()> {
        if self.phase != Phase::Recording {
            return Err(TripReelError::encode("ffmpeg encoder is not recording"));
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

        flatten_premul_over_bg(&mut self.scratch, frame.data(), [0, 0, 0]);

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(TripReelError::encode("ffmpeg encoder is already finalized"));
        };
        stdin.write_all(&self.scratch).map_err(|e| {
            TripReelError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })
    }

    fn request_data(&mut self) {
        if let Some(stdin) = self.stdin.as_mut()
            && let Err(err) = stdin.flush()
        {
            tracing::warn!(error = %err, "ffmpeg stdin flush failed");
        }
    }

    fn stop(&mut self) {
        if self.phase != Phase::Recording {
            return;
        }
        // Closing stdin lets ffmpeg drain, write the trailer, and exit.
        drop(self.stdin.take());
        self.phase = Phase::Stopping;
    }

    fn kill(&mut self) {
        drop(self.stdin.take());
        self.stdout_rx = None;
        if let Some(mut child) = self.child.take() {
            if let Err(err) = child.kill() {
                tracing::debug!(error = %err, "ffmpeg kill");
            }
            let _ = child.wait();
        }
        self.stderr_drain = None;
        self.phase = Phase::Done;
    }

    fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Recording | Phase::Stopping)
    }

    fn poll_event(&mut self) -> Option<EncoderEvent> {
        let rx = self.stdout_rx.as_ref()?;
        match rx.try_recv() {
            Ok(Pipe::Chunk(bytes)) => Some(EncoderEvent::DataAvailable(bytes)),
            Ok(Pipe::Eof) if self.phase == Phase::Stopping => Some(self.finish()),
            Ok(Pipe::Eof) => Some(self.fail("ffmpeg closed its output unexpectedly".to_owned())),
            Ok(Pipe::Error(e)) => Some(self.fail(format!("ffmpeg stdout read failed: {e}"))),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(self.fail("ffmpeg output drain ended".to_owned()))
            }
        }
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        if self.child.is_some() {
            self.kill();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
