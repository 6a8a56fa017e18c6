use kurbo::Rect;

use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::TripReelResult;
use crate::foundation::timing::{
    INTRO_DURATION_MS, INTRO_FADE_IN_MS, INTRO_FADE_OUT_MS, INTRO_HOLD_MS,
};
use crate::render::composer::{FrameComposer, palette};
use crate::render::shapes::{contain_rect, draw_image, fill_rect};

/// Built-in map-pin mark used when no logo is configured.
pub(crate) const DEFAULT_LOGO_SVG: &[u8] = br##"<svg xmlns="http://www.w3.org/2000/svg" width="96" height="96" viewBox="0 0 96 96"><circle cx="48" cy="48" r="44" fill="#38bdf8"/><path d="M48 18c-12 0-21 9-21 21 0 16 21 39 21 39s21-23 21-39c0-12-9-21-21-21zm0 29a8 8 0 1 1 0-16 8 8 0 0 1 0 16z" fill="#0f172a"/></svg>"##;

/// Opacity of the intro card at `elapsed_ms` after recording started.
///
/// Ramps 0 -> 1 over the fade-in window, holds, then ramps back to 0; zero outside the intro.
pub fn intro_alpha(elapsed_ms: f64) -> f32 {
    if !elapsed_ms.is_finite() || elapsed_ms < 0.0 || elapsed_ms >= INTRO_DURATION_MS {
        return 0.0;
    }
    let a = if elapsed_ms < INTRO_FADE_IN_MS {
        elapsed_ms / INTRO_FADE_IN_MS
    } else if elapsed_ms < INTRO_FADE_IN_MS + INTRO_HOLD_MS {
        1.0
    } else {
        1.0 - (elapsed_ms - INTRO_FADE_IN_MS - INTRO_HOLD_MS) / INTRO_FADE_OUT_MS
    };
    a.clamp(0.0, 1.0) as f32
}

impl FrameComposer {
    /// Full-frame dark wash with centered logo, brand title, and tagline.
    pub(crate) fn draw_intro(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        canvas: Canvas,
        elapsed_ms: f64,
    ) -> TripReelResult<()> {
        let alpha = intro_alpha(elapsed_ms);
        if alpha <= 0.0 {
            return Ok(());
        }
        let s = canvas.ui_scale();
        let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
        let (cx, cy) = (w / 2.0, h / 2.0);

        ctx.push_opacity_layer(alpha);
        fill_rect(ctx, Rect::new(0.0, 0.0, w, h), palette::WASH);

        let logo_px = (112.0 * s).round().max(8.0);
        let logo_top = cy - 150.0 * s;
        if let Some(logo) = self.logo_image(logo_px as u32)? {
            let (lw, lh) = (f64::from(logo.width()), f64::from(logo.height()));
            let half = logo_px / 2.0;
            let slot = Rect::new(cx - half, logo_top, cx + half, logo_top + logo_px);
            draw_image(ctx, logo.paint(), lw, lh, contain_rect(lw, lh, slot));
        }

        let title = self.branding.title.clone();
        let tagline = self.branding.tagline.clone();
        let mut y = logo_top + logo_px + 24.0 * s;
        y += self.draw_centered_line(ctx, &title, 48.0 * s, palette::TEXT, cx, y)?;
        y += 10.0 * s;
        self.draw_centered_line(ctx, &tagline, 22.0 * s, palette::MUTED, cx, y)?;

        ctx.pop_layer();
        Ok(())
    }

    fn draw_centered_line(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        size_px: f64,
        color: Rgba8,
        cx: f64,
        top: f64,
    ) -> TripReelResult<f64> {
        let Some(engine) = self.text.as_mut() else {
            return Ok(0.0);
        };
        if text.trim().is_empty() {
            return Ok(0.0);
        }
        let layout = engine.layout(text, size_px as f32, color, None)?;
        let lw = f64::from(layout.width());
        engine.draw(ctx, &layout, cx - lw / 2.0, top);
        Ok(f64::from(layout.height()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/intro.rs"]
mod tests;
