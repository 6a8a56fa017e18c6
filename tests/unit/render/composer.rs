use super::*;
use crate::assets::cache::{ImageFetcher, LoadMode};
use crate::foundation::core::Canvas;
use crate::render::caption::CaptionLayout;
use crate::render::watermark::pill_rect;
use crate::test_support::sample_waypoints;

const CANVAS: Canvas = Canvas {
    width: 320,
    height: 180,
};

fn branding() -> BrandingText {
    BrandingText {
        title: "TripReel".to_owned(),
        tagline: "Every photo, one journey".to_owned(),
        watermark: "tripreel".to_owned(),
    }
}

fn solid(rgba: [u8; 4]) -> Surface {
    let mut s = Surface::new(CANVAS).unwrap();
    s.fill(rgba);
    s
}

fn px(s: &Surface, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * s.canvas().width + x) * 4) as usize;
    let d = s.data();
    [d[i], d[i + 1], d[i + 2], d[i + 3]]
}

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= 2)
}

struct NoImages;

impl ImageFetcher for NoImages {
    fn fetch(&self, _url: &str) -> TripReelResult<Vec<u8>> {
        Err(TripReelError::validation("offline"))
    }
}

#[test]
fn plain_frame_copies_source() {
    let source = solid([200, 10, 10, 255]);
    let mut target = Surface::new(CANVAS).unwrap();
    let mut c = FrameComposer::new(branding());
    c.render_frame(&source, &mut target, Overlay::None).unwrap();
    assert!(close(px(&target, 0, 0), [200, 10, 10, 255]));
    assert!(close(px(&target, 319, 179), [200, 10, 10, 255]));
}

#[test]
fn intro_hold_covers_frame_with_wash() {
    let source = solid([200, 10, 10, 255]);
    let mut target = Surface::new(CANVAS).unwrap();
    let mut c = FrameComposer::new(branding());
    c.render_frame(&source, &mut target, Overlay::Intro { elapsed_ms: 1_000.0 })
        .unwrap();
    let w = palette::WASH;
    assert!(close(px(&target, 2, 2), [w.r, w.g, w.b, 255]));
}

#[test]
fn intro_before_first_fade_leaves_source() {
    let source = solid([200, 10, 10, 255]);
    let mut target = Surface::new(CANVAS).unwrap();
    let mut c = FrameComposer::new(branding());
    c.render_frame(&source, &mut target, Overlay::Intro { elapsed_ms: 0.0 })
        .unwrap();
    assert!(close(px(&target, 2, 2), [200, 10, 10, 255]));
}

#[test]
fn content_draws_card_and_pill_but_keeps_map_elsewhere() {
    let source = solid([200, 10, 10, 255]);
    let mut target = Surface::new(CANVAS).unwrap();
    let mut c = FrameComposer::new(branding());
    let images = ImageCache::new(Arc::new(NoImages), LoadMode::Inline);
    let wps = sample_waypoints(2);
    c.render_frame(
        &source,
        &mut target,
        Overlay::Content {
            waypoint: Some(&wps[0]),
            images: &images,
        },
    )
    .unwrap();

    // Unresolved thumbnail: the slot matches the surrounding card.
    let layout = CaptionLayout::for_canvas(CANVAS);
    let thumb = layout.thumb.center();
    let slot = px(&target, thumb.x as u32, thumb.y as u32);
    let card = px(&target, layout.card.x0 as u32 + 1, thumb.y as u32);
    assert!(close(slot, card), "slot={slot:?} card={card:?}");
    assert_ne!(slot, [200, 10, 10, 255]);

    let pill = pill_rect(CANVAS, 128.0 * CANVAS.ui_scale()).center();
    assert_ne!(px(&target, pill.x as u32, pill.y as u32), [200, 10, 10, 255]);

    assert!(close(px(&target, 1, 179), [200, 10, 10, 255]));
}

#[test]
fn logo_raster_is_cached_per_size() {
    let mut c = FrameComposer::new(branding());
    let a = c.logo_image(64).unwrap().unwrap();
    let b = c.logo_image(64).unwrap().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    let d = c.logo_image(32).unwrap().unwrap();
    assert_eq!(d.width(), 32);
}

#[test]
fn bad_logo_or_font_is_rejected() {
    assert!(FrameComposer::new(branding()).with_logo_svg(b"<svg").is_err());
    assert!(
        FrameComposer::new(branding())
            .with_font_bytes(vec![0u8; 16])
            .is_err()
    );
    assert!(!FrameComposer::new(branding()).has_font());
}
