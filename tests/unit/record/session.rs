use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::assets::cache::{FsFetcher, LoadMode};
use crate::encode::codec::CODEC_CANDIDATES;
use crate::encode::encoder::InMemoryBackend;
use crate::render::composer::BrandingText;
use crate::schedule::ManualScheduler;
use crate::test_support::{SolidMap, sample_waypoints};

struct Rig {
    map: SolidMap,
    composer: FrameComposer,
    images: ImageCache,
    sched: ManualScheduler,
    backend: InMemoryBackend,
    calls: Arc<AtomicUsize>,
    wps: Vec<Waypoint>,
}

impl Rig {
    fn new() -> Self {
        Self {
            map: SolidMap::new(64, 36, [40, 90, 160, 255]),
            composer: FrameComposer::new(BrandingText {
                title: "T".to_owned(),
                tagline: String::new(),
                watermark: "w".to_owned(),
            }),
            images: ImageCache::new(Arc::new(FsFetcher::default()), LoadMode::Inline),
            sched: ManualScheduler::new(),
            backend: InMemoryBackend::new(),
            calls: Arc::new(AtomicUsize::new(0)),
            wps: sample_waypoints(3),
        }
    }

    fn session(&self) -> RecordingSession {
        let calls = Arc::clone(&self.calls);
        RecordingSession::new(
            Canvas {
                width: 64,
                height: 36,
            },
            CODEC_CANDIDATES[0],
            &self.backend,
            move |_video| {
                calls.fetch_add(1, Ordering::SeqCst);
            },
        )
        .unwrap()
    }

    /// Fire every due request at `t`.
    fn frame(&mut self, s: &mut RecordingSession, t: f64) {
        for id in self.sched.take_due() {
            let inputs = FrameInputs {
                map: &mut self.map,
                composer: &mut self.composer,
                waypoint: self.wps.first(),
                images: &self.images,
            };
            s.on_frame(id, t, inputs, &mut self.sched).unwrap();
        }
    }
}

#[test]
fn draw_loop_reschedules_and_feeds_encoder() {
    let mut rig = Rig::new();
    let mut s = rig.session();
    s.start(&mut rig.sched).unwrap();
    assert_eq!(s.phase(), SessionPhase::Recording);

    let mut t = 1_000.0;
    for _ in 0..60 {
        rig.frame(&mut s, t);
        t += 1000.0 / 60.0;
    }
    assert_eq!(rig.sched.pending_len(), 1);
    // ~1 s of draws at 60 Hz => 30 capture frames (+1 for the first).
    assert!((30..=31).contains(&s.frames_captured()), "{}", s.frames_captured());
    assert_eq!(rig.backend.log().frames as u64, s.frames_captured());
}

#[test]
fn completion_fires_once_after_encoder_stops() {
    let mut rig = Rig::new();
    let mut s = rig.session();
    s.start(&mut rig.sched).unwrap();
    rig.frame(&mut s, 0.0);
    rig.frame(&mut s, 100.0);

    s.stop();
    assert_eq!(rig.calls.load(Ordering::SeqCst), 0, "stop must not complete synchronously");
    s.stop();
    s.pump().unwrap();
    s.pump().unwrap();
    assert_eq!(rig.calls.load(Ordering::SeqCst), 1);
    assert_eq!(s.phase(), SessionPhase::Finished);
    assert_eq!(rig.backend.log().flushes, 1);
}

#[test]
fn recorded_video_carries_all_chunks() {
    let mut rig = Rig::new();
    let got = Arc::new(std::sync::Mutex::new(None));
    let sink = Arc::clone(&got);
    let mut s = RecordingSession::new(
        Canvas {
            width: 64,
            height: 36,
        },
        CODEC_CANDIDATES[2],
        &rig.backend,
        move |v| *sink.lock().unwrap() = Some(v),
    )
    .unwrap();
    s.start(&mut rig.sched).unwrap();
    rig.frame(&mut s, 0.0);
    rig.frame(&mut s, 100.0);
    s.stop();
    s.pump().unwrap();

    let video = got.lock().unwrap().take().unwrap();
    assert_eq!(video.codec, CODEC_CANDIDATES[2]);
    assert_eq!(video.frames, 4);
    assert_eq!(video.size(), 4 * 5);
}

#[test]
fn dispose_before_stop_suppresses_completion() {
    let mut rig = Rig::new();
    let mut s = rig.session();
    s.start(&mut rig.sched).unwrap();
    rig.frame(&mut s, 0.0);
    s.dispose(&mut rig.sched);
    s.stop();
    s.pump().unwrap();
    assert_eq!(rig.calls.load(Ordering::SeqCst), 0);
    assert_eq!(rig.sched.pending_len(), 0);
    assert_eq!(rig.backend.log().kills, 1);
}

#[test]
fn dispose_between_stop_and_encoder_stop_suppresses_completion() {
    let mut rig = Rig::new();
    let mut s = rig.session();
    s.start(&mut rig.sched).unwrap();
    rig.frame(&mut s, 0.0);
    s.stop();
    s.dispose(&mut rig.sched);
    s.dispose(&mut rig.sched);
    s.pump().unwrap();
    assert_eq!(rig.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn disposed_session_stops_rescheduling() {
    let mut rig = Rig::new();
    let mut s = rig.session();
    s.start(&mut rig.sched).unwrap();
    let stale = rig.sched.take_due()[0];
    s.dispose(&mut rig.sched);
    let inputs = FrameInputs {
        map: &mut rig.map,
        composer: &mut rig.composer,
        waypoint: None,
        images: &rig.images,
    };
    assert!(!s.on_frame(stale, 0.0, inputs, &mut rig.sched).unwrap());
    assert_eq!(rig.sched.pending_len(), 0);
}

#[test]
fn intro_latch_survives_clock_skew_and_dispose() {
    let mut rig = Rig::new();
    let mut s = rig.session();
    s.start(&mut rig.sched).unwrap();
    rig.frame(&mut s, 10_000.0);
    rig.frame(&mut s, 11_000.0);
    assert!(!s.is_intro_latched());
    rig.frame(&mut s, 10_000.0 + INTRO_DURATION_MS + 1.0);
    assert!(s.is_intro_latched());

    // Skewed timestamp: elapsed drops back inside the intro window.
    rig.frame(&mut s, 10_500.0);
    assert!(s.is_intro_latched());

    s.dispose(&mut rig.sched);
    let inputs = FrameInputs {
        map: &mut rig.map,
        composer: &mut rig.composer,
        waypoint: rig.wps.first(),
        images: &rig.images,
    };
    s.composite_frame(100.0, inputs).unwrap();
    assert!(s.is_intro_latched());
}

#[test]
fn intro_frames_then_content_frames() {
    let mut rig = Rig::new();
    let mut s = rig.session();
    s.start(&mut rig.sched).unwrap();
    rig.frame(&mut s, 0.0);
    rig.frame(&mut s, 1_000.0);
    // Mid-intro: the dark wash covers the map.
    let px = &s.composite().data()[..4];
    assert!(px[2] < 100, "expected wash, got {px:?}");

    rig.frame(&mut s, INTRO_DURATION_MS + 100.0);
    let px = &s.composite().data()[..4];
    let map = [40u8, 90, 160, 255];
    assert!(px.iter().zip(map).all(|(a, b)| a.abs_diff(b) <= 2), "{px:?}");
}

#[test]
fn encoder_failure_surfaces_from_pump() {
    let mut rig = Rig::new();
    rig.backend = InMemoryBackend::new().failing_after(2);
    let mut s = rig.session();
    s.start(&mut rig.sched).unwrap();
    for t in [0.0, 100.0, 200.0] {
        rig.frame(&mut s, t);
    }
    assert!(s.pump().is_err());
    assert_eq!(s.phase(), SessionPhase::Finished);
    s.stop();
    assert_eq!(rig.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn start_twice_is_rejected() {
    let mut rig = Rig::new();
    let mut s = rig.session();
    s.start(&mut rig.sched).unwrap();
    assert!(s.start(&mut rig.sched).is_err());
}
