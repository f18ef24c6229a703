//! Packed vertex colors.
//!
//! Colors are stored as `i` values laid out `0xRRGGBBAA`.

/// Unpack a color into normalized `[r, g, b, a]` channels.
pub fn unpack_rgba(packed: u32) -> [f32; 4] {
    packed.to_be_bytes().map(|channel| channel as f32 / 255.0)
}

/// Pack normalized channels into a color. Channels are clamped to `0.0..=1.0`.
pub fn pack_rgba(rgba: [f32; 4]) -> u32 {
    u32::from_be_bytes(rgba.map(|channel| (channel.clamp(0.0, 1.0) * 255.0).round() as u8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpack() {
        assert_eq!(unpack_rgba(0xFF00_00FF), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(unpack_rgba(0), [0.0; 4]);
    }

    #[test]
    fn test_pack_clamps() {
        assert_eq!(pack_rgba([2.0, -1.0, 0.0, 1.0]), 0xFF00_00FF);
        assert_eq!(pack_rgba(unpack_rgba(0x1234_5678)), 0x1234_5678);
    }
}
