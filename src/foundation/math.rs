pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// `f` clamped to `[0, 1]`, mapped onto `0..=255`.
pub(crate) fn unit_to_u8(f: f64) -> u8 {
    (f.clamp(0.0, 1.0) * 255.0).round() as u8
}
