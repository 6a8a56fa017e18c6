use super::*;

#[test]
fn cover_crop_trims_the_long_axis() {
    // 400x200 into a square: keep full height, crop width to 200 centered.
    let (crop, scale) = cover_crop(400.0, 200.0, 100.0, 100.0);
    assert_eq!(crop, Rect::new(100.0, 0.0, 300.0, 200.0));
    assert!((scale - 0.5).abs() < 1e-12);

    // Tall source into a wide box crops height.
    let (crop, _) = cover_crop(100.0, 300.0, 200.0, 100.0);
    assert!((crop.width() - 100.0).abs() < 1e-9);
    assert!((crop.height() - 50.0).abs() < 1e-9);
    assert!((crop.y0 - 125.0).abs() < 1e-9);
}

#[test]
fn cover_crop_degenerate_inputs() {
    assert_eq!(cover_crop(0.0, 10.0, 10.0, 10.0).0, Rect::ZERO);
    assert_eq!(cover_crop(10.0, 10.0, 10.0, -1.0).0, Rect::ZERO);
}

#[test]
fn contain_rect_is_centered() {
    let r = contain_rect(2.0, 1.0, Rect::new(0.0, 0.0, 100.0, 100.0));
    assert_eq!(r, Rect::new(0.0, 25.0, 100.0, 75.0));
}
