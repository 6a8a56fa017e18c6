/// A container/codec pairing the recorder can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodecProfile {
    /// MIME-style identifier, e.g. `video/webm;codecs=vp9`.
    pub mime_type: &'static str,
    /// File extension for saved artifacts (no dot).
    pub extension: &'static str,
    /// ffmpeg muxer name (`-f`).
    pub ffmpeg_muxer: &'static str,
    /// ffmpeg encoder name (`-c:v`).
    pub ffmpeg_encoder: &'static str,
    /// Extra output arguments placed after the encoder selection.
    pub(crate) output_args: &'static [&'static str],
}

impl CodecProfile {
    /// Container part of the MIME type (`video/webm`).
    pub fn container(&self) -> &'static str {
        self.mime_type
            .split_once(';')
            .map_or(self.mime_type, |(c, _)| c)
    }
}

/// Ordered preference list probed at startup; the first supported entry wins.
pub const CODEC_CANDIDATES: [CodecProfile; 3] = [
    CodecProfile {
        mime_type: "video/webm;codecs=vp9",
        extension: "webm",
        ffmpeg_muxer: "webm",
        ffmpeg_encoder: "libvpx-vp9",
        output_args: &["-b:v", "0", "-crf", "32", "-deadline", "realtime", "-row-mt", "1"],
    },
    CodecProfile {
        mime_type: "video/webm;codecs=vp8",
        extension: "webm",
        ffmpeg_muxer: "webm",
        ffmpeg_encoder: "libvpx",
        output_args: &["-b:v", "4M", "-deadline", "realtime"],
    },
    CodecProfile {
        mime_type: "video/mp4;codecs=avc1",
        extension: "mp4",
        ffmpeg_muxer: "mp4",
        ffmpeg_encoder: "libx264",
        // Piped mp4 output cannot seek back to write the index.
        output_args: &["-preset", "veryfast", "-movflags", "frag_keyframe+empty_moov"],
    },
];

/// First candidate accepted by `is_supported`, or `None` when recording is impossible.
pub fn negotiate_codec(is_supported: impl Fn(&CodecProfile) -> bool) -> Option<CodecProfile> {
    CODEC_CANDIDATES.iter().copied().find(|c| is_supported(c))
}

/// Candidate with the given MIME type.
pub fn codec_by_mime(mime_type: &str) -> Option<CodecProfile> {
    CODEC_CANDIDATES
        .iter()
        .copied()
        .find(|c| c.mime_type == mime_type)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/codec.rs"]
mod tests;
