use super::*;

#[test]
fn card_is_anchored_top_right_inside_canvas() {
    let canvas = Canvas {
        width: 1280,
        height: 720,
    };
    let l = CaptionLayout::for_canvas(canvas);
    assert!((l.card.x1 - (1280.0 - 24.0)).abs() < 1e-9);
    assert!((l.card.y0 - 24.0).abs() < 1e-9);
    assert!(l.card.y1 < 720.0);
    assert!(l.thumb.x0 > l.card.x0 && l.thumb.x1 < l.card.x1);
    assert!(l.text_top > l.thumb.y1);
}

#[test]
fn narrow_canvas_shrinks_card() {
    let l = CaptionLayout::for_canvas(Canvas {
        width: 200,
        height: 720,
    });
    assert!(l.card.x0 >= 0.0);
    assert!(l.card.width() <= 200.0);
}

#[test]
fn layout_scales_with_height() {
    let small = CaptionLayout::for_canvas(Canvas {
        width: 1920,
        height: 360,
    });
    let large = CaptionLayout::for_canvas(Canvas {
        width: 1920,
        height: 1080,
    });
    assert!((large.card.width() / small.card.width() - 3.0).abs() < 1e-9);
}
