use super::*;

#[test]
fn requests_fire_once_in_issue_order() {
    let mut s = ManualScheduler::new();
    let a = s.request_frame();
    let b = s.request_frame();
    assert_eq!(s.take_due(), vec![a, b]);
    assert!(s.take_due().is_empty());
}

#[test]
fn cancel_is_idempotent() {
    let mut s = ManualScheduler::new();
    let a = s.request_frame();
    s.cancel_frame(a);
    s.cancel_frame(a);
    s.cancel_frame(FrameRequestId(999));
    assert_eq!(s.pending_len(), 0);
}

#[test]
fn frame_clock_advances_by_interval() {
    let mut c = FrameClock::new(50.0, 100.0);
    assert!((c.advance() - 120.0).abs() < 1e-9);
    assert!((c.now_ms() - 120.0).abs() < 1e-9);
}
