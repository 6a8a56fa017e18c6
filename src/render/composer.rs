use std::sync::Arc;

use kurbo::Rect;

use crate::assets::cache::ImageCache;
use crate::assets::decode::{CachedImage, parse_svg};
use crate::assets::svg_raster::rasterize_svg;
use crate::config::BrandingConfig;
use crate::foundation::error::{TripReelError, TripReelResult};
use crate::render::intro::DEFAULT_LOGO_SVG;
use crate::render::shapes::draw_image;
use crate::render::surface::Surface;
use crate::render::text::TextLayoutEngine;
use crate::trajectory::waypoint::Waypoint;

pub(crate) mod palette {
    use crate::foundation::core::Rgba8;

    pub(crate) const WASH: Rgba8 = Rgba8::new(15, 23, 42, 255);
    pub(crate) const CARD: Rgba8 = Rgba8::new(15, 23, 42, 210);
    pub(crate) const PILL: Rgba8 = Rgba8::new(15, 23, 42, 150);
    pub(crate) const TEXT: Rgba8 = Rgba8::new(248, 250, 252, 255);
    pub(crate) const MUTED: Rgba8 = Rgba8::new(203, 213, 225, 255);
    pub(crate) const ACCENT: Rgba8 = Rgba8::new(56, 189, 248, 255);
    pub(crate) const WATERMARK_TEXT: Rgba8 = Rgba8::new(248, 250, 252, 220);
}

/// Text shown on the intro card and watermark.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrandingText {
    /// Intro headline.
    pub title: String,
    /// Intro subtitle.
    pub tagline: String,
    /// Watermark pill label.
    pub watermark: String,
}

impl From<&BrandingConfig> for BrandingText {
    fn from(cfg: &BrandingConfig) -> Self {
        Self {
            title: cfg.title.clone(),
            tagline: cfg.tagline.clone(),
            watermark: cfg.watermark.clone(),
        }
    }
}

/// Which overlays go on top of the blitted map for one frame.
#[derive(Clone, Copy, Debug)]
pub enum Overlay<'a> {
    /// Nothing but the source.
    None,
    /// Intro card at `elapsed_ms` into the recording.
    Intro {
        /// Time since the first composite frame.
        elapsed_ms: f64,
    },
    /// Caption card (when a waypoint is current) plus the watermark.
    Content {
        /// Current waypoint, if any.
        waypoint: Option<&'a Waypoint>,
        /// Thumbnail source.
        images: &'a ImageCache,
    },
}

/// Draws the intro card, caption card, and watermark over a copied map frame.
///
/// Holds only render resources (font, rasterized logo); everything time- or waypoint-dependent
/// arrives through [`Overlay`]. Text is skipped when no font is configured.
pub struct FrameComposer {
    pub(crate) branding: BrandingText,
    pub(crate) text: Option<TextLayoutEngine>,
    logo: Option<usvg::Tree>,
    logo_raster: Option<(u32, Arc<CachedImage>)>,
}

impl std::fmt::Debug for FrameComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameComposer")
            .field("branding", &self.branding)
            .field("has_font", &self.text.is_some())
            .field("has_logo", &self.logo.is_some())
            .finish()
    }
}

impl FrameComposer {
    /// Composer with the built-in logo and no font.
    pub fn new(branding: BrandingText) -> Self {
        let logo = match parse_svg(DEFAULT_LOGO_SVG) {
            Ok(tree) => Some(tree),
            Err(err) => {
                tracing::warn!(error = %err, "built-in logo failed to parse");
                None
            }
        };
        Self {
            branding,
            text: None,
            logo,
            logo_raster: None,
        }
    }

    /// Load font and logo files named by `cfg`.
    pub fn from_config(cfg: &BrandingConfig) -> TripReelResult<Self> {
        let mut composer = Self::new(BrandingText::from(cfg));
        if let Some(path) = &cfg.font_path {
            let bytes = std::fs::read(path).map_err(|e| {
                TripReelError::validation(format!("read font {}: {e}", path.display()))
            })?;
            composer = composer.with_font_bytes(bytes)?;
        }
        if let Some(path) = &cfg.logo_svg_path {
            let bytes = std::fs::read(path).map_err(|e| {
                TripReelError::validation(format!("read logo {}: {e}", path.display()))
            })?;
            composer = composer.with_logo_svg(&bytes)?;
        }
        Ok(composer)
    }

    /// Enable text using the given TTF/OTF bytes.
    pub fn with_font_bytes(mut self, font_bytes: Vec<u8>) -> TripReelResult<Self> {
        let engine = TextLayoutEngine::from_font_bytes(font_bytes)?;
        tracing::debug!(family = engine.family_name(), "overlay font registered");
        self.text = Some(engine);
        Ok(self)
    }

    /// Replace the intro logo.
    pub fn with_logo_svg(mut self, svg_bytes: &[u8]) -> TripReelResult<Self> {
        self.logo = Some(parse_svg(svg_bytes)?);
        self.logo_raster = None;
        Ok(self)
    }

    /// Whether text overlays will be drawn.
    pub fn has_font(&self) -> bool {
        self.text.is_some()
    }

    /// Branding strings in use.
    pub fn branding(&self) -> &BrandingText {
        &self.branding
    }

    /// Copy `source` onto `target` at full size, then draw `overlay` on top.
    pub fn render_frame(
        &mut self,
        source: &Surface,
        target: &mut Surface,
        overlay: Overlay<'_>,
    ) -> TripReelResult<()> {
        let canvas = target.canvas();
        let src = source.canvas();
        let mut ctx = target.render_context();

        let paint = source.to_image_paint()?;
        draw_image(
            &mut ctx,
            &paint,
            f64::from(src.width),
            f64::from(src.height),
            Rect::new(0.0, 0.0, f64::from(canvas.width), f64::from(canvas.height)),
        );

        match overlay {
            Overlay::None => {}
            Overlay::Intro { elapsed_ms } => self.draw_intro(&mut ctx, canvas, elapsed_ms)?,
            Overlay::Content { waypoint, images } => {
                if let Some(wp) = waypoint {
                    self.draw_caption(&mut ctx, canvas, wp, images)?;
                }
                self.draw_watermark(&mut ctx, canvas)?;
            }
        }

        target.commit(&mut ctx);
        Ok(())
    }

    /// Logo rasterized so its longer side is `size_px`, cached per size.
    pub(crate) fn logo_image(
        &mut self,
        size_px: u32,
    ) -> TripReelResult<Option<Arc<CachedImage>>> {
        let Some(tree) = &self.logo else {
            return Ok(None);
        };
        if let Some((px, img)) = &self.logo_raster
            && *px == size_px
        {
            return Ok(Some(Arc::clone(img)));
        }
        let size = tree.size();
        let scale = size_px as f32 / size.width().max(size.height()).max(f32::EPSILON);
        let w = ((size.width() * scale).round() as u32).max(1);
        let h = ((size.height() * scale).round() as u32).max(1);
        let img = Arc::new(rasterize_svg(tree, w, h)?);
        self.logo_raster = Some((size_px, Arc::clone(&img)));
        Ok(Some(img))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composer.rs"]
mod tests;
