use std::sync::Arc;

use super::*;
use crate::assets::cache::{FsFetcher, LoadMode};
use crate::encode::encoder::InMemoryBackend;
use crate::render::composer::{BrandingText, FrameComposer};
use crate::test_support::{SolidMap, sample_items};

fn replay(backend: InMemoryBackend) -> TripReplay<SolidMap, ManualScheduler> {
    let images = ImageCache::new(Arc::new(FsFetcher::default()), LoadMode::Inline);
    let recorder = RecorderController::new(
        Box::new(backend),
        FrameComposer::new(BrandingText {
            title: "T".to_owned(),
            tagline: "t".to_owned(),
            watermark: "w".to_owned(),
        }),
        images.clone(),
    );
    TripReplay::new(
        SolidMap::new(32, 18, [10, 20, 30, 255]),
        ManualScheduler::new(),
        recorder,
        images,
    )
}

#[test]
fn degenerate_trajectory_is_a_noop() {
    let mut r = replay(InMemoryBackend::new());
    assert!(!r.start_replay(&sample_items(1)));
    assert_eq!(r.status(), PlaybackStatus::Idle);
    assert!(!r.start_auto_record());
    assert_eq!(r.scheduler().pending_len(), 0);
}

#[test]
fn start_moves_camera_and_marker() {
    let mut r = replay(InMemoryBackend::new());
    assert!(r.start_replay(&sample_items(3)));
    assert_eq!(r.status(), PlaybackStatus::Playing);
    let first = r.waypoints()[0].position;
    assert_eq!(r.map().fly_to_calls.last().map(|c| c.0), Some(first));
    assert_eq!(r.map().marker, Some(first));
    assert_eq!(r.scheduler().pending_len(), 1);
}

#[test]
fn stepping_advances_and_pauses_stop_the_loop() {
    let mut r = replay(InMemoryBackend::new());
    r.start_replay(&sample_items(3));
    r.step(0.0);
    r.step(100.0);
    assert!(r.total_progress() > 0.0);
    assert_eq!(r.map().marker, r.current_position());

    r.toggle_play_pause();
    assert_eq!(r.status(), PlaybackStatus::Paused);
    assert_eq!(r.scheduler().pending_len(), 0);
    r.toggle_play_pause();
    assert_eq!(r.scheduler().pending_len(), 1);
}

#[test]
fn seek_flies_camera_to_target() {
    let mut r = replay(InMemoryBackend::new());
    r.start_replay(&sample_items(4));
    r.seek_to_waypoint(2);
    let target = r.waypoints()[2].position;
    assert_eq!(r.map().fly_to_calls.last().map(|c| c.0), Some(target));
    assert_eq!(r.current_waypoint_index(), 2);
}

#[test]
fn completion_while_recording_produces_video() {
    let mut r = replay(InMemoryBackend::new());
    r.start_replay(&sample_items(3));
    assert!(r.start_auto_record());
    assert!(r.is_recording());

    let mut t = 0.0;
    while r.status() == PlaybackStatus::Playing {
        r.step(t);
        t += 1000.0 / 60.0;
        assert!(t < 60_000.0);
    }
    assert_eq!(r.status(), PlaybackStatus::Completed);
    // In-memory encoders stop synchronously; one more pump collects the video.
    r.pump();
    assert_eq!(r.recording_status(), RecordingStatus::Idle);
    let video = r.pending_video().unwrap();
    // ~4 s of playback at 30 fps.
    assert!((110..=130).contains(&video.frames), "frames={}", video.frames);
    assert!(r.discard_video());
}

#[test]
fn exit_disposes_recording_and_clears_state() {
    let mut r = replay(InMemoryBackend::new());
    r.start_replay(&sample_items(3));
    r.start_auto_record();
    r.step(0.0);
    r.exit_replay();
    assert_eq!(r.status(), PlaybackStatus::Idle);
    assert!(r.waypoints().is_empty());
    assert_eq!(r.recording_status(), RecordingStatus::Idle);
    assert_eq!(r.scheduler().pending_len(), 0);
    assert!(r.pending_video().is_none());
}

#[test]
fn restarting_replay_replaces_the_sequence() {
    let mut r = replay(InMemoryBackend::new());
    r.start_replay(&sample_items(3));
    r.step(0.0);
    assert!(r.start_replay(&sample_items(5)));
    assert_eq!(r.waypoints().len(), 5);
    assert_eq!(r.scheduler().pending_len(), 1);
}
