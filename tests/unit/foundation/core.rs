use super::*;

#[test]
fn lerp_clamps_t() {
    let a = GeoPosition::new(0.0, 0.0);
    let b = GeoPosition::new(10.0, -20.0);
    assert_eq!(a.lerp(b, 0.5), GeoPosition::new(5.0, -10.0));
    assert_eq!(a.lerp(b, 2.0), b);
    assert_eq!(a.lerp(b, -1.0), a);
}

#[test]
fn positions_outside_the_globe_are_invalid() {
    assert!(GeoPosition::new(180.0, -90.0).is_valid());
    assert!(!GeoPosition::new(181.0, 0.0).is_valid());
    assert!(!GeoPosition::new(0.0, f64::NAN).is_valid());
}

#[test]
fn canvas_rejects_zero_and_oversized() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    let c = Canvas::new(1280, 720).unwrap();
    assert_eq!(c.ui_scale(), 1.0);
    assert_eq!(Canvas::new(64, 36).unwrap().ui_scale(), 0.25);
}

#[test]
fn alpha_scaling_rounds_and_clamps() {
    let c = Rgba8::new(1, 2, 3, 200);
    assert_eq!(c.with_alpha_scaled(0.5).a, 100);
    assert_eq!(c.with_alpha_scaled(3.0).a, 200);
    assert_eq!(c.with_alpha_scaled(-1.0).a, 0);
}
