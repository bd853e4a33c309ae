use crate::effects::pulse::PulseFrame;
use crate::foundation::core::Viewport;
use crate::foundation::error::CurtainResult;
use crate::foundation::math::unit_to_u8;
use crate::render::raster::{Painter, affine_to_cpu, color, point_to_cpu};
use crate::render::surface::Surface;

/// Transient effects layer drawn above the curtain.
pub struct FxLayer {
    surface: Surface,
    painter: Painter,
}

impl Default for FxLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl FxLayer {
    pub fn new() -> Self {
        Self {
            surface: Surface::new(),
            painter: Painter::new(),
        }
    }

    pub fn fit(&mut self, viewport: Viewport, device_pixel_ratio: f64) -> CurtainResult<()> {
        self.surface.fit(viewport, device_pixel_ratio)
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Replace the layer contents with `frame`, or clear it for `None`.
    pub fn draw_pulse(&mut self, frame: Option<&PulseFrame>) -> CurtainResult<()> {
        let base = affine_to_cpu(self.surface.transform());
        let Some(pixmap) = self.surface.pixmap_mut() else {
            return Ok(());
        };
        pixmap.data_as_u8_slice_mut().fill(0);
        let Some(frame) = frame else {
            return Ok(());
        };
        if frame.alpha <= 0.0 || frame.line_width <= 0.0 {
            return Ok(());
        }

        let ring = vello_cpu::kurbo::Circle::new(point_to_cpu(frame.center), frame.radius);
        let mut path = vello_cpu::kurbo::BezPath::new();
        for el in vello_cpu::kurbo::Shape::path_elements(&ring, 0.1) {
            path.push(el);
        }
        let [r, g, b] = frame.rgb;
        let a = unit_to_u8(frame.alpha);
        self.painter.render(pixmap, |ctx| {
            ctx.set_transform(base);
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(frame.line_width));
            ctx.set_paint(color([r, g, b, a]));
            ctx.stroke_path(&path);
            Ok(())
        })
    }
}
