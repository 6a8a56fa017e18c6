use crate::assets::decode::CachedImage;
use crate::foundation::error::{TripReelError, TripReelResult};

const MAX_DIM: u32 = 4_096;

/// Rasterize `tree` into a `width`x`height` premultiplied image, stretching to fit.
pub fn rasterize_svg(tree: &usvg::Tree, width: u32, height: u32) -> TripReelResult<CachedImage> {
    if width == 0 || height == 0 || width > MAX_DIM || height > MAX_DIM {
        return Err(TripReelError::render(format!(
            "svg raster size out of range: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }
    let size = tree.size();
    let usable = |v: f32| v.is_finite() && v > 0.0;
    if !usable(size.width()) || !usable(size.height()) {
        return Err(TripReelError::render("svg has invalid width/height"));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| TripReelError::render("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    resvg::render(
        tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    // tiny-skia pixmaps are already premultiplied RGBA8.
    CachedImage::from_premul_rgba8(width, height, pixmap.data().to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg_raster.rs"]
mod tests;
