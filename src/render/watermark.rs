use kurbo::Rect;

use crate::foundation::core::Canvas;
use crate::foundation::error::TripReelResult;
use crate::render::composer::{FrameComposer, palette};
use crate::render::shapes::fill_rounded_rect;

/// Bottom-right pill rectangle for a label `text_w` pixels wide.
pub(crate) fn pill_rect(canvas: Canvas, text_w: f64) -> Rect {
    let s = canvas.ui_scale();
    let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
    let margin = 20.0 * s;
    let pill_h = 36.0 * s;
    let pill_w = (text_w + 32.0 * s).min(w - 2.0 * margin).max(pill_h);
    Rect::new(w - margin - pill_w, h - margin - pill_h, w - margin, h - margin)
}

impl FrameComposer {
    /// Semi-transparent rounded branding pill, bottom-right.
    pub(crate) fn draw_watermark(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        canvas: Canvas,
    ) -> TripReelResult<()> {
        let s = canvas.ui_scale();
        let label = self.branding.watermark.clone();
        let layout = match self.text.as_mut() {
            Some(engine) if !label.trim().is_empty() => {
                Some(engine.layout(&label, (16.0 * s) as f32, palette::WATERMARK_TEXT, None)?)
            }
            _ => None,
        };
        let text_w = layout
            .as_ref()
            .map_or(128.0 * s, |l| f64::from(l.width()));
        let pill = pill_rect(canvas, text_w);
        fill_rounded_rect(ctx, pill, pill.height() / 2.0, palette::PILL);

        if let (Some(engine), Some(layout)) = (self.text.as_ref(), layout.as_ref()) {
            let x = pill.center().x - f64::from(layout.width()) / 2.0;
            let y = pill.center().y - f64::from(layout.height()) / 2.0;
            engine.draw(ctx, layout, x, y);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/watermark.rs"]
mod tests;
