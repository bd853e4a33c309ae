use crate::foundation::core::{Affine, Viewport, clamp_device_pixel_ratio};
use crate::foundation::error::{CurtainError, CurtainResult};

/// A device-pixel-ratio aware pixel buffer fitted to the viewport.
///
/// Logical size always equals the last fitted viewport; the buffer is
/// `floor(logical * dpr)` device pixels with `dpr` clamped to `[1, 2]`.
/// A zero-area viewport (or a released surface) holds no buffer.
pub struct Surface {
    viewport: Viewport,
    dpr: f64,
    pixmap: Option<vello_cpu::Pixmap>,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("viewport", &self.viewport)
            .field("dpr", &self.dpr)
            .field("width_px", &self.width_px())
            .field("height_px", &self.height_px())
            .finish()
    }
}

impl Surface {
    pub fn new() -> Self {
        Self {
            viewport: Viewport::new(0.0, 0.0),
            dpr: 1.0,
            pixmap: None,
        }
    }

    /// Resize the backing buffer to `viewport * clamp(dpr)`. Contents are cleared.
    pub fn fit(&mut self, viewport: Viewport, device_pixel_ratio: f64) -> CurtainResult<()> {
        let dpr = clamp_device_pixel_ratio(device_pixel_ratio);
        self.viewport = viewport;
        self.dpr = dpr;

        if viewport.is_degenerate() {
            self.pixmap = None;
            return Ok(());
        }

        let (w, h) = buffer_size(viewport, dpr)?;
        if w == 0 || h == 0 {
            self.pixmap = None;
            return Ok(());
        }
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        pixmap.data_as_u8_slice_mut().fill(0);
        self.pixmap = Some(pixmap);
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.dpr
    }

    /// Logical-to-device transform applied to every draw.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.dpr)
    }

    pub fn is_allocated(&self) -> bool {
        self.pixmap.is_some()
    }

    pub fn width_px(&self) -> u32 {
        self.pixmap.as_ref().map_or(0, |p| u32::from(p.width()))
    }

    pub fn height_px(&self) -> u32 {
        self.pixmap.as_ref().map_or(0, |p| u32::from(p.height()))
    }

    /// Premultiplied RGBA8 pixels, row-major.
    pub fn data(&self) -> Option<&[u8]> {
        self.pixmap.as_ref().map(|p| p.data_as_u8_slice())
    }

    pub fn alpha_at(&self, x: u32, y: u32) -> Option<u8> {
        let w = self.width_px();
        if x >= w || y >= self.height_px() {
            return None;
        }
        let idx = ((y as usize) * (w as usize) + (x as usize)) * 4 + 3;
        self.data().map(|d| d[idx])
    }

    pub fn clear(&mut self) {
        if let Some(p) = self.pixmap.as_mut() {
            p.data_as_u8_slice_mut().fill(0);
        }
    }

    pub fn is_fully_transparent(&self) -> bool {
        self.data()
            .is_none_or(|d| d.chunks_exact(4).all(|px| px[3] == 0))
    }

    /// Drop the buffer. Later draws report a surface error.
    pub fn release(&mut self) {
        self.pixmap = None;
    }

    pub(crate) fn pixmap_mut(&mut self) -> Option<&mut vello_cpu::Pixmap> {
        self.pixmap.as_mut()
    }
}

fn buffer_size(viewport: Viewport, dpr: f64) -> CurtainResult<(u16, u16)> {
    let w = (viewport.width * dpr).floor();
    let h = (viewport.height * dpr).floor();
    if w > f64::from(u16::MAX) || h > f64::from(u16::MAX) {
        return Err(CurtainError::surface(format!(
            "surface of {w}x{h} device pixels exceeds u16"
        )));
    }
    Ok((w as u16, h as u16))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
