use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::foundation::core::{Affine, Point, Viewport};
use crate::foundation::error::{CurtainError, CurtainResult};
use crate::geometry::hex::HEX_SIDES;

/// Cached `vello_cpu` render context, reused while the target size is unchanged.
#[derive(Default)]
pub(crate) struct Painter {
    ctx: Option<vello_cpu::RenderContext>,
}

impl Painter {
    pub(crate) fn new() -> Self {
        Self { ctx: None }
    }

    /// Record a scene with `f` and rasterize it into `dst`.
    ///
    /// `dst` is expected to be cleared by the caller; the scene is drawn over its contents.
    pub(crate) fn render(
        &mut self,
        dst: &mut vello_cpu::Pixmap,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> CurtainResult<()>,
    ) -> CurtainResult<()> {
        let width = dst.width();
        let height = dst.height();
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        f(&mut ctx)?;
        ctx.flush();
        ctx.render_to_pixmap(dst);
        self.ctx = Some(ctx);
        Ok(())
    }
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

pub(crate) fn color(rgba: [u8; 4]) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3])
}

/// Closed polygon through the six hexagon vertices.
pub(crate) fn hex_path(vertices: &[Point; HEX_SIDES]) -> vello_cpu::kurbo::BezPath {
    let mut path = vello_cpu::kurbo::BezPath::new();
    path.move_to(point_to_cpu(vertices[0]));
    for v in &vertices[1..] {
        path.line_to(point_to_cpu(*v));
    }
    path.close_path();
    path
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> CurtainResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CurtainError::surface("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CurtainError::surface("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(CurtainError::surface("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let pixels: Vec<vello_cpu::peniko::color::PremulRgba8> = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

pub(crate) fn image_paint(img: &PreparedImage) -> CurtainResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(&img.rgba8_premul, img.width, img.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// Transform mapping image space onto `viewport` so the image covers it, centered,
/// preserving aspect ratio. `None` for zero-sized images.
pub fn cover_fit(image_width: u32, image_height: u32, viewport: Viewport) -> Option<Affine> {
    if image_width == 0 || image_height == 0 {
        return None;
    }
    let iw = f64::from(image_width);
    let ih = f64::from(image_height);
    let scale = (viewport.width / iw).max(viewport.height / ih);
    let dx = (viewport.width - iw * scale) / 2.0;
    let dy = (viewport.height - ih * scale) / 2.0;
    Some(Affine::translate((dx, dy)) * Affine::scale(scale))
}

/// Radial darkening toward the viewport edges, as premultiplied RGBA8 at device resolution.
///
/// Transparent inside `inner_radius` around `(0.5w, 0.45h)`, ramping linearly to black at
/// `max_alpha` at `0.75 * max(w, h)`.
pub(crate) fn vignette_bytes(
    width_px: u32,
    height_px: u32,
    dpr: f64,
    viewport: Viewport,
    inner_radius: f64,
    max_alpha: f64,
) -> Vec<u8> {
    let mut bytes = vec![0u8; (width_px as usize) * (height_px as usize) * 4];
    let center = viewport.at_fraction(0.5, 0.45);
    let outer = viewport.width.max(viewport.height) * 0.75;
    let span = (outer - inner_radius).max(1e-6);
    for y in 0..height_px {
        for x in 0..width_px {
            let p = Point::new((f64::from(x) + 0.5) / dpr, (f64::from(y) + 0.5) / dpr);
            let t = ((p.distance(center) - inner_radius) / span).clamp(0.0, 1.0);
            let idx = ((y as usize) * (width_px as usize) + (x as usize)) * 4;
            bytes[idx + 3] = crate::foundation::math::unit_to_u8(t * max_alpha);
        }
    }
    bytes
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
