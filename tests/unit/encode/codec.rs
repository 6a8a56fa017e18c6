use super::*;

#[test]
fn first_supported_candidate_wins() {
    let picked = negotiate_codec(|_| true).unwrap();
    assert_eq!(picked.mime_type, "video/webm;codecs=vp9");

    let picked = negotiate_codec(|c| c.extension == "mp4").unwrap();
    assert_eq!(picked.ffmpeg_encoder, "libx264");

    let picked = negotiate_codec(|c| c.ffmpeg_encoder != "libvpx-vp9").unwrap();
    assert_eq!(picked.mime_type, "video/webm;codecs=vp8");
}

#[test]
fn nothing_supported_yields_none() {
    assert!(negotiate_codec(|_| false).is_none());
}

#[test]
fn container_strips_codec_parameter() {
    assert_eq!(CODEC_CANDIDATES[0].container(), "video/webm");
    assert_eq!(codec_by_mime("video/mp4;codecs=avc1").unwrap().container(), "video/mp4");
    assert!(codec_by_mime("video/ogg").is_none());
}
