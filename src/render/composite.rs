use crate::foundation::error::{CurtainError, CurtainResult};
use crate::foundation::math::mul_div255_u8;

pub type PremulRgba8 = [u8; 4];

/// Premultiplied source-over.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

/// Premultiplied destination-out: keep `dst` where the mask is transparent.
pub fn dest_out(dst: PremulRgba8, mask_alpha: u8) -> PremulRgba8 {
    if mask_alpha == 0 {
        return dst;
    }
    let keep = 255u16 - u16::from(mask_alpha);
    dst.map(|c| mul_div255_u8(u16::from(c), keep))
}

pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> CurtainResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(CurtainError::surface(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Apply destination-out of a `mask_w x mask_h` mask placed at `(x0, y0)` inside a
/// `dst_w`-wide RGBA8 buffer. Only the mask's alpha channel is read.
pub(crate) fn dest_out_region(
    dst: &mut [u8],
    dst_w: usize,
    mask: &[u8],
    mask_w: usize,
    x0: usize,
    y0: usize,
) {
    if mask_w == 0 {
        return;
    }
    for (my, mask_row) in mask.chunks_exact(mask_w * 4).enumerate() {
        let row_start = ((y0 + my) * dst_w + x0) * 4;
        let Some(dst_row) = dst.get_mut(row_start..row_start + mask_w * 4) else {
            break;
        };
        for (d, m) in dst_row.chunks_exact_mut(4).zip(mask_row.chunks_exact(4)) {
            let out = dest_out([d[0], d[1], d[2], d[3]], m[3]);
            d.copy_from_slice(&out);
        }
    }
}
