use kurbo::{Rect, Shape};

use crate::assets::decode::CachedImage;
use crate::foundation::core::Rgba8;

pub(crate) fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

pub(crate) fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

pub(crate) fn fill_rect(ctx: &mut vello_cpu::RenderContext, rect: Rect, color: Rgba8) {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(color_to_cpu(color));
    ctx.fill_rect(&rect_to_cpu(rect));
}

pub(crate) fn fill_path(
    ctx: &mut vello_cpu::RenderContext,
    path: &kurbo::BezPath,
    color: Rgba8,
) {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(color_to_cpu(color));
    ctx.fill_path(&bezpath_to_cpu(path));
}

pub(crate) fn fill_rounded_rect(
    ctx: &mut vello_cpu::RenderContext,
    rect: Rect,
    radius: f64,
    color: Rgba8,
) {
    let radius = radius.clamp(0.0, rect.width().min(rect.height()) / 2.0);
    fill_path(ctx, &rect.to_rounded_rect(radius).to_path(0.1), color);
}

/// Source-space crop that fills a `dest_w`x`dest_h` box while preserving aspect ratio.
///
/// Returns the centered crop rectangle in source pixels and the source->dest scale.
pub(crate) fn cover_crop(src_w: f64, src_h: f64, dest_w: f64, dest_h: f64) -> (Rect, f64) {
    if src_w <= 0.0 || src_h <= 0.0 || dest_w <= 0.0 || dest_h <= 0.0 {
        return (Rect::ZERO, 1.0);
    }
    let scale = (dest_w / src_w).max(dest_h / src_h);
    let crop_w = dest_w / scale;
    let crop_h = dest_h / scale;
    let x0 = (src_w - crop_w) / 2.0;
    let y0 = (src_h - crop_h) / 2.0;
    (Rect::new(x0, y0, x0 + crop_w, y0 + crop_h), scale)
}

/// Largest centered box of the source aspect ratio inside `dest`.
pub(crate) fn contain_rect(src_w: f64, src_h: f64, dest: Rect) -> Rect {
    if src_w <= 0.0 || src_h <= 0.0 {
        return Rect::ZERO;
    }
    let scale = (dest.width() / src_w).min(dest.height() / src_h);
    let w = src_w * scale;
    let h = src_h * scale;
    let c = dest.center();
    Rect::new(c.x - w / 2.0, c.y - h / 2.0, c.x + w / 2.0, c.y + h / 2.0)
}

/// Draw `img` cover-fitted into `dest`.
pub(crate) fn draw_image_cover(
    ctx: &mut vello_cpu::RenderContext,
    img: &CachedImage,
    dest: Rect,
) {
    let (crop, scale) = cover_crop(
        f64::from(img.width()),
        f64::from(img.height()),
        dest.width(),
        dest.height(),
    );
    if crop.area() <= 0.0 {
        return;
    }
    let xf = vello_cpu::kurbo::Affine::translate((dest.x0, dest.y0))
        * vello_cpu::kurbo::Affine::scale(scale)
        * vello_cpu::kurbo::Affine::translate((-crop.x0, -crop.y0));
    ctx.set_transform(xf);
    ctx.set_paint(img.paint().clone());
    ctx.fill_rect(&rect_to_cpu(crop));
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
}

/// Draw a `src_w`x`src_h` image paint stretched over `dest`.
pub(crate) fn draw_image(
    ctx: &mut vello_cpu::RenderContext,
    paint: &vello_cpu::Image,
    src_w: f64,
    src_h: f64,
    dest: Rect,
) {
    if src_w <= 0.0 || src_h <= 0.0 {
        return;
    }
    let xf = vello_cpu::kurbo::Affine::translate((dest.x0, dest.y0))
        * vello_cpu::kurbo::Affine::scale_non_uniform(dest.width() / src_w, dest.height() / src_h);
    ctx.set_transform(xf);
    ctx.set_paint(paint.clone());
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, src_w, src_h));
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
}

#[cfg(test)]
#[path = "../../tests/unit/render/shapes.rs"]
mod tests;
