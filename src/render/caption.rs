use kurbo::Rect;

use crate::assets::cache::ImageCache;
use crate::foundation::core::Canvas;
use crate::foundation::error::TripReelResult;
use crate::render::composer::{FrameComposer, palette};
use crate::render::shapes::{draw_image_cover, fill_rounded_rect};
use crate::trajectory::format::{display_title, format_capture_date, format_coordinate};
use crate::trajectory::waypoint::Waypoint;

/// Caption card geometry for a canvas, anchored top-right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct CaptionLayout {
    pub(crate) card: Rect,
    pub(crate) thumb: Rect,
    pub(crate) text_left: f64,
    pub(crate) text_top: f64,
    pub(crate) text_width: f64,
    pub(crate) scale: f64,
}

impl CaptionLayout {
    pub(crate) fn for_canvas(canvas: Canvas) -> Self {
        let s = canvas.ui_scale();
        let w = f64::from(canvas.width);
        let margin = 24.0 * s;
        let pad = 12.0 * s;
        let card_w = (320.0 * s).min((w - 2.0 * margin).max(0.0));
        let thumb_h = 168.0 * s;
        let text_h = 104.0 * s;

        let x1 = w - margin;
        let x0 = x1 - card_w;
        let y0 = margin;
        let card = Rect::new(x0, y0, x1, y0 + pad + thumb_h + text_h);
        let thumb = Rect::new(x0 + pad, y0 + pad, x1 - pad, y0 + pad + thumb_h);
        Self {
            card,
            thumb,
            text_left: x0 + pad,
            text_top: thumb.y1 + 10.0 * s,
            text_width: (card_w - 2.0 * pad).max(1.0),
            scale: s,
        }
    }
}

impl FrameComposer {
    /// Photo card for `waypoint`: cover-fit thumbnail, capture date, title, coordinates.
    ///
    /// The thumbnail is requested from `images` on first sight. Until it resolves the slot shows
    /// the bare card.
    pub(crate) fn draw_caption(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        canvas: Canvas,
        waypoint: &Waypoint,
        images: &ImageCache,
    ) -> TripReelResult<()> {
        let layout = CaptionLayout::for_canvas(canvas);
        let s = layout.scale;
        fill_rounded_rect(ctx, layout.card, 14.0 * s, palette::CARD);

        if let Some(img) = images.get_or_request(&waypoint.photo.thumbnail_url) {
            draw_image_cover(ctx, &img, layout.thumb);
        }

        let Some(engine) = self.text.as_mut() else {
            return Ok(());
        };
        let max_w = Some(layout.text_width as f32);
        let lines = [
            (format_capture_date(waypoint.timestamp), 14.0, palette::MUTED),
            (display_title(waypoint), 20.0, palette::TEXT),
            (format_coordinate(&waypoint.photo.coordinate), 13.0, palette::ACCENT),
        ];
        let mut y = layout.text_top;
        for (text, size, color) in lines {
            let tl = engine.layout(&text, (size * s) as f32, color, max_w)?;
            engine.draw(ctx, &tl, layout.text_left, y);
            y += f64::from(tl.height()) + 4.0 * s;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/caption.rs"]
mod tests;
