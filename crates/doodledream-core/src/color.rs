//! Colors, the coloring palette, and color distance.

use image::Rgba;

/// Opaque white, the color of an empty page.
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Opaque black, the color of outline art.
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Fully transparent pixel.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Brush color selected when the app starts.
pub const DEFAULT_COLOR: Rgba<u8> = Rgba([0xFF, 0x6B, 0x6B, 0xFF]);

/// A named entry in the coloring palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteColor {
    pub name: &'static str,
    pub color: Rgba<u8>,
}

impl PaletteColor {
    const fn rgb(name: &'static str, r: u8, g: u8, b: u8) -> Self {
        Self {
            name,
            color: Rgba([r, g, b, 255]),
        }
    }
}

/// Primary colors first, then secondaries, then neutrals.
pub const PALETTE: [PaletteColor; 10] = [
    PaletteColor::rgb("Red", 0xE5, 0x39, 0x35),
    PaletteColor::rgb("Yellow", 0xFD, 0xD8, 0x35),
    PaletteColor::rgb("Blue", 0x1E, 0x88, 0xE5),
    PaletteColor::rgb("Orange", 0xFB, 0x8C, 0x00),
    PaletteColor::rgb("Green", 0x43, 0xA0, 0x47),
    PaletteColor::rgb("Purple", 0x8E, 0x24, 0xAA),
    PaletteColor::rgb("Brown", 0x6D, 0x4C, 0x41),
    PaletteColor::rgb("Grey", 0x75, 0x75, 0x75),
    PaletteColor::rgb("Black", 0x00, 0x00, 0x00),
    PaletteColor::rgb("White", 0xFF, 0xFF, 0xFF),
];

/// Distance between two colors: the largest absolute difference over the
/// R, G, B and A channels.
pub fn color_distance(a: Rgba<u8>, b: Rgba<u8>) -> u8 {
    a.0.iter()
        .zip(b.0.iter())
        .map(|(x, y)| x.abs_diff(*y))
        .max()
        .unwrap_or(0)
}

/// Composite `src` over an opaque `dst` (straight alpha).
pub fn blend_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let a = src.0[3] as u32;
    if a == 255 {
        return src;
    }
    if a == 0 {
        return dst;
    }
    let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * (255 - a) + 127) / 255) as u8;
    Rgba([
        mix(src.0[0], dst.0[0]),
        mix(src.0[1], dst.0[1]),
        mix(src.0[2], dst.0[2]),
        255,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_opaque_and_distinct() {
        for (i, entry) in PALETTE.iter().enumerate() {
            assert_eq!(entry.color.0[3], 255, "{} is not opaque", entry.name);
            for other in &PALETTE[i + 1..] {
                assert_ne!(entry.color, other.color);
            }
        }
    }

    #[test]
    fn test_color_distance() {
        assert_eq!(color_distance(WHITE, WHITE), 0);
        assert_eq!(color_distance(WHITE, BLACK), 255);
        assert_eq!(
            color_distance(Rgba([10, 20, 30, 255]), Rgba([12, 15, 30, 255])),
            5
        );
    }

    #[test]
    fn test_blend_over() {
        assert_eq!(blend_over(WHITE, BLACK), BLACK);
        assert_eq!(blend_over(WHITE, TRANSPARENT), WHITE);
        let half = blend_over(WHITE, Rgba([0, 0, 0, 128]));
        assert_eq!(half.0[3], 255);
        assert!(half.0[0] > 120 && half.0[0] < 135);
    }
}
