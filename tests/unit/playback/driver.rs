use super::*;
use crate::schedule::ManualScheduler;
use crate::test_support::sample_waypoints;

fn setup() -> (AnimationDriver, PlaybackClock, ManualScheduler) {
    let mut clock = PlaybackClock::new();
    clock.start(sample_waypoints(3), false);
    (AnimationDriver::new(), clock, ManualScheduler::new())
}

#[test]
fn first_frame_reports_zero_delta() {
    let (mut d, mut clock, mut s) = setup();
    d.start(&mut s);
    let id = s.take_due()[0];
    d.on_frame(id, 50_000.0, &mut clock, &mut s);
    assert_eq!(clock.segment_progress(), 0.0);

    let id = s.take_due()[0];
    d.on_frame(id, 50_100.0, &mut clock, &mut s);
    assert!((clock.segment_progress() - 0.05).abs() < 1e-9);
}

#[test]
fn start_twice_keeps_single_request() {
    let (mut d, _clock, mut s) = setup();
    d.start(&mut s);
    d.start(&mut s);
    assert_eq!(s.pending_len(), 1);
}

#[test]
fn stop_cancels_and_is_idempotent() {
    let (mut d, _clock, mut s) = setup();
    for _ in 0..5 {
        d.start(&mut s);
        d.stop(&mut s);
        d.stop(&mut s);
    }
    assert_eq!(s.pending_len(), 0);
    assert!(!d.is_running());
}

#[test]
fn stale_ids_are_ignored() {
    let (mut d, mut clock, mut s) = setup();
    d.start(&mut s);
    let stale = s.take_due()[0];
    d.stop(&mut s);
    d.start(&mut s);
    let fx = d.on_frame(stale, 1000.0, &mut clock, &mut s);
    assert!(fx.is_empty());
    assert!(d.is_running());
}

#[test]
fn loop_ends_when_clock_completes() {
    let (mut d, mut clock, mut s) = setup();
    d.start(&mut s);
    let mut t = 0.0;
    let mut saw_stop = false;
    for _ in 0..1000 {
        let due = s.take_due();
        if due.is_empty() {
            break;
        }
        for id in due {
            let fx = d.on_frame(id, t, &mut clock, &mut s);
            saw_stop |= fx.contains(&crate::playback::state::PlaybackEffect::StopDriver);
        }
        t += 16.0;
    }
    assert_eq!(clock.status(), PlaybackStatus::Completed);
    assert!(saw_stop);
    assert!(!d.is_running());
    assert_eq!(s.pending_len(), 0);
}
