use std::sync::Arc;

use crate::foundation::core::Canvas;
use crate::foundation::error::{TripReelError, TripReelResult};
use crate::foundation::math::flatten_premul_over_bg;

/// Owned frame readback.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 bytes.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Flatten over black into opaque straight RGBA8 (PNG/encoder friendly).
    pub fn to_opaque(&self) -> FrameRGBA {
        if !self.premultiplied {
            return self.clone();
        }
        let mut data = vec![0u8; self.data.len()];
        flatten_premul_over_bg(&mut data, &self.data, [0, 0, 0]);
        FrameRGBA {
            width: self.width,
            height: self.height,
            data,
            premultiplied: false,
        }
    }
}

/// Premultiplied RGBA8 drawing surface backed by a CPU pixmap.
pub struct Surface {
    canvas: Canvas,
    pixmap: vello_cpu::Pixmap,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface").field("canvas", &self.canvas).finish()
    }
}

impl Surface {
    /// Allocate a transparent surface.
    pub fn new(canvas: Canvas) -> TripReelResult<Self> {
        let (w, h) = pixmap_dims(canvas)?;
        Ok(Self {
            canvas,
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    /// Wrap premultiplied RGBA8 bytes.
    pub fn from_premul_rgba8(canvas: Canvas, rgba8_premul: &[u8]) -> TripReelResult<Self> {
        let pixmap = premul_bytes_to_pixmap(rgba8_premul, canvas.width, canvas.height)?;
        Ok(Self { canvas, pixmap })
    }

    /// Surface dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Fill every pixel with a premultiplied RGBA8 value.
    pub fn fill(&mut self, premul_rgba: [u8; 4]) {
        for px in self.pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
            px.copy_from_slice(&premul_rgba);
        }
    }

    /// Copy the pixels into an owned frame.
    pub fn to_frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.data().to_vec(),
            premultiplied: true,
        }
    }

    /// Snapshot the pixels as an image paint.
    pub(crate) fn to_image_paint(&self) -> TripReelResult<vello_cpu::Image> {
        let pixmap = premul_bytes_to_pixmap(self.data(), self.canvas.width, self.canvas.height)?;
        Ok(image_paint(pixmap))
    }

    /// New render context sized to this surface.
    pub(crate) fn render_context(&self) -> vello_cpu::RenderContext {
        vello_cpu::RenderContext::new(self.pixmap.width(), self.pixmap.height())
    }

    /// Rasterize a finished render context into this surface.
    pub(crate) fn commit(&mut self, ctx: &mut vello_cpu::RenderContext) {
        ctx.flush();
        ctx.render_to_pixmap(&mut self.pixmap);
    }
}

pub(crate) fn pixmap_dims(canvas: Canvas) -> TripReelResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| TripReelError::render("surface width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| TripReelError::render("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(TripReelError::render("surface width/height must be non-zero"));
    }
    Ok((w, h))
}

pub(crate) fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> TripReelResult<vello_cpu::Pixmap> {
    let (w, h) = pixmap_dims(Canvas { width, height })?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(TripReelError::render("premultiplied image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

pub(crate) fn image_paint(pixmap: vello_cpu::Pixmap) -> vello_cpu::Image {
    vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
