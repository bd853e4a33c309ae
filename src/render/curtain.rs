use crate::assets::decode::PreparedImage;
use crate::foundation::core::{Affine, Point, Viewport};
use crate::foundation::error::{CurtainError, CurtainResult};
use crate::geometry::hex::{STROKE_EDGES, edge, scale_about_centroid};
use crate::grid::builder::{Cell, Grid};
use crate::render::composite::dest_out_region;
use crate::render::raster::{
    Painter, affine_to_cpu, color, cover_fit, hex_path, image_paint, pixmap_from_premul_bytes,
    point_to_cpu, vignette_bytes,
};
use crate::render::surface::Surface;

/// Colors and stroke settings for the curtain. Colors are straight (non-premultiplied) RGBA8.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CurtainStyle {
    /// Opaque base under everything else.
    pub base_rgba: [u8; 4],
    pub background_opacity: f32,
    /// Fill of every hexagon interior.
    pub cell_fill_rgba: [u8; 4],
    pub line_rgba: [u8; 4],
    pub line_width: f64,
    /// Peak edge darkening, `0` disables the vignette.
    pub vignette_alpha: f64,
    pub vignette_inner_radius: f64,
    /// Erase polygon scale around the cell centroid.
    pub erase_expand: f64,
}

impl Default for CurtainStyle {
    fn default() -> Self {
        Self {
            base_rgba: [5, 9, 21, 255],
            background_opacity: 0.85,
            cell_fill_rgba: [5, 9, 21, 140],
            line_rgba: [120, 170, 255, 56],
            line_width: 1.15,
            vignette_alpha: 0.55,
            vignette_inner_radius: 40.0,
            erase_expand: 1.5,
        }
    }
}

impl CurtainStyle {
    pub fn validate(&self) -> CurtainResult<()> {
        if self.base_rgba[3] != 255 {
            return Err(CurtainError::validation(
                "style.base_rgba must be opaque (alpha 255)",
            ));
        }
        if !self.background_opacity.is_finite() || !(0.0..=1.0).contains(&self.background_opacity)
        {
            return Err(CurtainError::validation(
                "style.background_opacity must be in [0, 1]",
            ));
        }
        if !self.line_width.is_finite() || self.line_width < 0.0 {
            return Err(CurtainError::validation(
                "style.line_width must be finite and >= 0",
            ));
        }
        if !self.vignette_alpha.is_finite() || !(0.0..=1.0).contains(&self.vignette_alpha) {
            return Err(CurtainError::validation(
                "style.vignette_alpha must be in [0, 1]",
            ));
        }
        if !self.vignette_inner_radius.is_finite() || self.vignette_inner_radius < 0.0 {
            return Err(CurtainError::validation(
                "style.vignette_inner_radius must be finite and >= 0",
            ));
        }
        if !self.erase_expand.is_finite() || !(1.45..=1.55).contains(&self.erase_expand) {
            return Err(CurtainError::validation(
                "style.erase_expand must be in [1.45, 1.55]",
            ));
        }
        Ok(())
    }
}

/// The drawing surface the dissolve engine paints and erases.
///
/// Implemented by [`CpuCurtain`]; tests substitute recording mocks.
pub trait CurtainSurface {
    /// Resize to `viewport * clamp(dpr)`; clears the surface.
    fn fit(&mut self, viewport: Viewport, device_pixel_ratio: f64) -> CurtainResult<()>;

    /// Paint the full curtain for `grid`. Must complete before any erase.
    fn paint_curtain(&mut self, grid: &Grid, background: Option<&PreparedImage>)
    -> CurtainResult<()>;

    /// Cut a transparent hole for `cell`. Irreversible; a no-op when the surface has no pixels.
    fn erase_hex(&mut self, cell: &Cell) -> CurtainResult<()>;

    /// Release the surface; no further mutation is allowed.
    fn teardown(&mut self);
}

/// `vello_cpu`-backed curtain layer.
pub struct CpuCurtain {
    surface: Surface,
    style: CurtainStyle,
    painter: Painter,
    mask_painter: Painter,
    mask: Option<vello_cpu::Pixmap>,
    torn_down: bool,
}

impl CpuCurtain {
    pub fn new(style: CurtainStyle) -> Self {
        Self {
            surface: Surface::new(),
            style,
            painter: Painter::new(),
            mask_painter: Painter::new(),
            mask: None,
            torn_down: false,
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn style(&self) -> &CurtainStyle {
        &self.style
    }

    fn mask_pixmap(&mut self, w: u16, h: u16) -> vello_cpu::Pixmap {
        let mut pm = match self.mask.take() {
            Some(pm) if pm.width() == w && pm.height() == h => pm,
            _ => vello_cpu::Pixmap::new(w, h),
        };
        pm.data_as_u8_slice_mut().fill(0);
        pm
    }
}

impl CurtainSurface for CpuCurtain {
    fn fit(&mut self, viewport: Viewport, device_pixel_ratio: f64) -> CurtainResult<()> {
        self.torn_down = false;
        self.surface.fit(viewport, device_pixel_ratio)
    }

    #[tracing::instrument(skip_all, fields(cells = grid.len(), background = background.is_some()))]
    fn paint_curtain(
        &mut self,
        grid: &Grid,
        background: Option<&PreparedImage>,
    ) -> CurtainResult<()> {
        if self.torn_down {
            return Err(CurtainError::surface("curtain surface has been torn down"));
        }
        let viewport = self.surface.viewport();
        let dpr = self.surface.device_pixel_ratio();
        let base = affine_to_cpu(self.surface.transform());
        let (width_px, height_px) = (self.surface.width_px(), self.surface.height_px());
        let style = self.style.clone();

        let vignette = if style.vignette_alpha > 0.0 && width_px > 0 && height_px > 0 {
            let bytes = vignette_bytes(
                width_px,
                height_px,
                dpr,
                viewport,
                style.vignette_inner_radius,
                style.vignette_alpha,
            );
            let pixmap = pixmap_from_premul_bytes(&bytes, width_px, height_px)?;
            Some(vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(std::sync::Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            })
        } else {
            None
        };

        let background = match background {
            Some(img) => match (cover_fit(img.width, img.height, viewport), image_paint(img)) {
                (Some(fit), Ok(paint)) => Some((paint, fit, img.width, img.height)),
                (_, Err(e)) => {
                    tracing::warn!(error = %e, "skipping curtain background");
                    None
                }
                (None, _) => None,
            },
            None => None,
        };

        let Some(pixmap) = self.surface.pixmap_mut() else {
            // Zero-area viewport: nothing to cover.
            return Ok(());
        };
        pixmap.data_as_u8_slice_mut().fill(0);

        self.painter.render(pixmap, |ctx| {
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_transform(base);
            ctx.set_paint(color(style.base_rgba));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                viewport.width,
                viewport.height,
            ));

            if let Some((paint, fit, iw, ih)) = background {
                ctx.set_transform(base * affine_to_cpu(fit));
                ctx.set_paint(paint);
                let layered = style.background_opacity < 1.0;
                if layered {
                    ctx.push_opacity_layer(style.background_opacity);
                }
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(iw),
                    f64::from(ih),
                ));
                if layered {
                    ctx.pop_layer();
                }
                ctx.set_transform(base);
            }

            ctx.set_paint(color(style.cell_fill_rgba));
            for cell in grid.cells() {
                ctx.fill_path(&hex_path(&cell.vertices));
            }

            if let Some(vignette) = vignette {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(vignette);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(width_px),
                    f64::from(height_px),
                ));
                ctx.set_transform(base);
            }

            if style.line_width > 0.0 && !grid.is_empty() {
                let mut lines = vello_cpu::kurbo::BezPath::new();
                for cell in grid.cells() {
                    for i in STROKE_EDGES {
                        let (a, b) = edge(&cell.vertices, i);
                        lines.move_to(point_to_cpu(a));
                        lines.line_to(point_to_cpu(b));
                    }
                }
                ctx.set_stroke(
                    vello_cpu::kurbo::Stroke::new(style.line_width)
                        .with_join(vello_cpu::kurbo::Join::Round)
                        .with_caps(vello_cpu::kurbo::Cap::Round),
                );
                ctx.set_paint(color(style.line_rgba));
                ctx.stroke_path(&lines);
            }
            Ok(())
        })
    }

    fn erase_hex(&mut self, cell: &Cell) -> CurtainResult<()> {
        if self.torn_down {
            return Err(CurtainError::surface("curtain surface has been torn down"));
        }
        if !self.surface.is_allocated() {
            // Sub-pixel viewport: nothing was painted, so there is nothing to cut.
            return Ok(());
        }
        let dpr = self.surface.device_pixel_ratio();
        let (surf_w, surf_h) = (self.surface.width_px(), self.surface.height_px());
        let hole = scale_about_centroid(&cell.vertices, self.style.erase_expand);

        // Device-space bounding box of the hole, clipped to the surface.
        let (mut min, mut max) = (
            Point::new(f64::INFINITY, f64::INFINITY),
            Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        );
        for p in hole {
            min.x = min.x.min(p.x * dpr);
            min.y = min.y.min(p.y * dpr);
            max.x = max.x.max(p.x * dpr);
            max.y = max.y.max(p.y * dpr);
        }
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil().max(0.0) as u32).min(surf_w);
        let y1 = (max.y.ceil().max(0.0) as u32).min(surf_h);
        if x0 >= x1 || y0 >= y1 {
            return Ok(());
        }
        // Bounded by the surface size, which already fits in u16.
        let (mask_w, mask_h) = ((x1 - x0) as u16, (y1 - y0) as u16);

        let mut mask = self.mask_pixmap(mask_w, mask_h);
        let to_mask = Affine::translate((-f64::from(x0), -f64::from(y0))) * Affine::scale(dpr);
        let path = hex_path(&hole);
        self.mask_painter.render(&mut mask, |ctx| {
            ctx.set_transform(affine_to_cpu(to_mask));
            ctx.set_paint(color([255, 255, 255, 255]));
            ctx.fill_path(&path);
            Ok(())
        })?;

        if let Some(pixmap) = self.surface.pixmap_mut() {
            dest_out_region(
                pixmap.data_as_u8_slice_mut(),
                surf_w as usize,
                mask.data_as_u8_slice(),
                usize::from(mask_w),
                x0 as usize,
                y0 as usize,
            );
        }
        self.mask = Some(mask);
        Ok(())
    }

    fn teardown(&mut self) {
        self.torn_down = true;
        self.surface.release();
        self.mask = None;
        tracing::debug!("curtain surface torn down");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/curtain.rs"]
mod tests;
