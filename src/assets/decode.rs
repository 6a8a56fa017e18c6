use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::TripReelResult;
use crate::foundation::math::premultiply_rgba8_in_place;
use crate::render::surface::{image_paint, premul_bytes_to_pixmap};

/// Decoded, ready-to-draw raster image.
#[derive(Clone)]
pub struct CachedImage {
    width: u32,
    height: u32,
    rgba8_premul: Arc<Vec<u8>>,
    paint: vello_cpu::Image,
}

impl std::fmt::Debug for CachedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl CachedImage {
    /// Wrap premultiplied RGBA8 pixels.
    pub fn from_premul_rgba8(
        width: u32,
        height: u32,
        rgba8_premul: Vec<u8>,
    ) -> TripReelResult<Self> {
        let pixmap = premul_bytes_to_pixmap(&rgba8_premul, width, height)?;
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
            paint: image_paint(pixmap),
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied RGBA8 pixels.
    pub fn rgba8_premul(&self) -> &[u8] {
        &self.rgba8_premul
    }

    pub(crate) fn paint(&self) -> &vello_cpu::Image {
        &self.paint
    }
}

/// Decode any format `image` understands into a premultiplied image.
pub fn decode_image(bytes: &[u8]) -> TripReelResult<CachedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    CachedImage::from_premul_rgba8(width, height, rgba8_premul)
}

/// Parse an SVG document.
pub fn parse_svg(bytes: &[u8]) -> TripReelResult<usvg::Tree> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(tree)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
