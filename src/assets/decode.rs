use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{CurtainError, CurtainResult};
use crate::foundation::math::mul_div255_u8;

/// Decoded raster image ready for painting.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> CurtainResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(CurtainError::asset("image has zero width or height"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Read and decode an image file.
pub fn read_image(path: impl AsRef<Path>) -> CurtainResult<PreparedImage> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        CurtainError::asset(format!("failed to read image '{}': {e}", path.display()))
    })?;
    decode_image(&bytes)
}

/// Load the optional curtain background.
///
/// Failures are logged and swallowed: the curtain paints without a background.
pub fn load_background(path: impl AsRef<Path>) -> Option<PreparedImage> {
    let path = path.as_ref();
    match read_image(path) {
        Ok(img) => {
            tracing::debug!(
                path = %path.display(),
                width = img.width,
                height = img.height,
                "loaded curtain background"
            );
            Some(img)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "curtain background unavailable");
            None
        }
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        for c in &mut px[..3] {
            *c = mul_div255_u8(u16::from(*c), a);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
