use super::*;

#[test]
fn first_draw_captures_one_frame() {
    let mut c = CaptureClock::new(30);
    assert_eq!(c.frames_due(0.0), 1);
    assert_eq!(c.frames_due(10.0), 0);
    assert_eq!(c.frames_due(33.4), 1);
}

#[test]
fn frame_count_tracks_wall_time_at_any_draw_rate() {
    for step in [5.0, 16.0, 50.0, 250.0] {
        let mut c = CaptureClock::new(30);
        let mut t = 0.0;
        while t <= 2_000.0 {
            c.frames_due(t);
            t += step;
        }
        let last = t - step;
        let expected = (last * 30.0 / 1000.0).floor() as u64 + 1;
        assert_eq!(c.frames_emitted(), expected, "step={step}");
    }
}

#[test]
fn skewed_time_never_rewinds() {
    let mut c = CaptureClock::new(30);
    c.frames_due(1_000.0);
    let before = c.frames_emitted();
    assert_eq!(c.frames_due(500.0), 0);
    assert_eq!(c.frames_due(-1.0), 0);
    assert_eq!(c.frames_due(f64::NAN), 0);
    assert_eq!(c.frames_emitted(), before);
}

#[test]
fn zero_fps_is_clamped() {
    assert_eq!(CaptureClock::new(0).fps(), 1);
}
