use super::*;

#[test]
fn alpha_envelope_matches_phase_windows() {
    assert_eq!(intro_alpha(0.0), 0.0);
    assert!((intro_alpha(250.0) - 0.5).abs() < 1e-6);
    assert_eq!(intro_alpha(INTRO_FADE_IN_MS), 1.0);
    assert_eq!(intro_alpha(INTRO_FADE_IN_MS + INTRO_HOLD_MS - 1.0), 1.0);
    let mid_out = INTRO_FADE_IN_MS + INTRO_HOLD_MS + INTRO_FADE_OUT_MS / 2.0;
    assert!((intro_alpha(mid_out) - 0.5).abs() < 1e-6);
    assert_eq!(intro_alpha(INTRO_DURATION_MS), 0.0);
    assert_eq!(intro_alpha(INTRO_DURATION_MS + 10_000.0), 0.0);
}

#[test]
fn alpha_is_zero_for_bogus_elapsed() {
    assert_eq!(intro_alpha(-5.0), 0.0);
    assert_eq!(intro_alpha(f64::NAN), 0.0);
}

#[test]
fn default_logo_parses() {
    crate::assets::decode::parse_svg(DEFAULT_LOGO_SVG).unwrap();
}
