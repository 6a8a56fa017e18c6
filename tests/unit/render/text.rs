use super::*;

#[test]
fn garbage_font_bytes_are_rejected() {
    let err = TextLayoutEngine::from_font_bytes(b"definitely not a font".to_vec()).unwrap_err();
    assert!(err.to_string().contains("font"));
}

#[test]
fn brush_from_color_keeps_channels() {
    let b = TextBrushRgba8::from(Rgba8::new(1, 2, 3, 4));
    assert_eq!(
        b,
        TextBrushRgba8 {
            r: 1,
            g: 2,
            b: 3,
            a: 4
        }
    );
}
