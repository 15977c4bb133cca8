//! Flood fill (paint bucket).
//!
//! Region growing from a seed pixel over an explicit work-list. Pixels join
//! the region when their [`color_distance`] to the seed's original color is
//! within the tolerance, so anti-aliased edges of line art fill cleanly while
//! the dark outline itself stops the fill.

use crate::buffer::{PixelBuffer, PixelRect};
use crate::color::color_distance;
use image::Rgba;
use serde::{Deserialize, Serialize};

/// Default tolerance used by the bucket tool.
pub const DEFAULT_TOLERANCE: u8 = 32;

/// Which neighbors a filled pixel spreads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Connectivity {
    /// Left, right, up, down.
    #[default]
    Four,
    /// The four edges plus diagonals.
    Eight,
}

/// Result of a fill pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FillOutcome {
    /// Number of pixels recolored.
    pub filled: usize,
    /// Bounding box of recolored pixels (empty for a no-op).
    pub bounds: PixelRect,
}

impl FillOutcome {
    pub fn is_noop(&self) -> bool {
        self.filled == 0
    }
}

/// Recolor the region connected to `seed` whose colors lie within
/// `tolerance` of the seed color.
///
/// No-op when the seed is outside the buffer or when `fill_color` is already
/// within tolerance of the seed color.
pub fn flood_fill(
    buffer: &mut PixelBuffer,
    seed: (u32, u32),
    fill_color: Rgba<u8>,
    tolerance: u8,
    connectivity: Connectivity,
) -> FillOutcome {
    let (width, height) = buffer.dimensions();
    let (sx, sy) = seed;
    let Some(target) = buffer.get(sx, sy) else {
        return FillOutcome::default();
    };
    if color_distance(fill_color, target) <= tolerance {
        return FillOutcome::default();
    }

    let w = width as usize;
    let h = height as usize;
    let raw = buffer.as_raw_mut();

    let matches = |raw: &[u8], idx: usize| {
        let o = idx * 4;
        let px = Rgba([raw[o], raw[o + 1], raw[o + 2], raw[o + 3]]);
        color_distance(px, target) <= tolerance
    };

    // Visited mask; a pixel is marked when it is pushed so it is queued at
    // most once.
    let mut visited = vec![false; w * h];
    let mut stack: Vec<usize> = Vec::with_capacity(1024);
    let seed_idx = sy as usize * w + sx as usize;
    visited[seed_idx] = true;
    stack.push(seed_idx);

    let (mut min_x, mut min_y, mut max_x, mut max_y) = (sx, sy, sx, sy);
    let mut filled = 0usize;

    while let Some(idx) = stack.pop() {
        let x = idx % w;
        let y = idx / w;

        let o = idx * 4;
        raw[o..o + 4].copy_from_slice(&fill_color.0);
        filled += 1;

        min_x = min_x.min(x as u32);
        max_x = max_x.max(x as u32);
        min_y = min_y.min(y as u32);
        max_y = max_y.max(y as u32);

        let mut visit = |nx: usize, ny: usize, raw: &[u8]| {
            let ni = ny * w + nx;
            if !visited[ni] && matches(raw, ni) {
                visited[ni] = true;
                stack.push(ni);
            }
        };

        if x > 0 {
            visit(x - 1, y, raw);
        }
        if x + 1 < w {
            visit(x + 1, y, raw);
        }
        if y > 0 {
            visit(x, y - 1, raw);
        }
        if y + 1 < h {
            visit(x, y + 1, raw);
        }

        if connectivity == Connectivity::Eight {
            if x > 0 && y > 0 {
                visit(x - 1, y - 1, raw);
            }
            if x + 1 < w && y > 0 {
                visit(x + 1, y - 1, raw);
            }
            if x > 0 && y + 1 < h {
                visit(x - 1, y + 1, raw);
            }
            if x + 1 < w && y + 1 < h {
                visit(x + 1, y + 1, raw);
            }
        }
    }

    FillOutcome {
        filled,
        bounds: PixelRect::from_corners(min_x, min_y, max_x, max_y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BLACK, WHITE};

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    /// 10×10 white buffer with a black ring enclosing the 3×3 block at
    /// (4..=6, 4..=6).
    fn ringed_buffer() -> PixelBuffer {
        let mut buffer = PixelBuffer::new(10, 10);
        for i in 3..=7 {
            buffer.put(i, 3, BLACK);
            buffer.put(i, 7, BLACK);
            buffer.put(3, i, BLACK);
            buffer.put(7, i, BLACK);
        }
        buffer
    }

    #[test]
    fn test_fill_whole_white_buffer() {
        let mut buffer = PixelBuffer::new(10, 10);
        let outcome = flood_fill(&mut buffer, (5, 5), RED, 10, Connectivity::Four);
        assert_eq!(outcome.filled, 100);
        assert_eq!(outcome.bounds, buffer.bounds());
        assert!(buffer.image().pixels().all(|p| *p == RED));
    }

    #[test]
    fn test_fill_stays_inside_ring() {
        let mut buffer = ringed_buffer();
        let before = buffer.clone();
        let outcome = flood_fill(&mut buffer, (5, 5), BLUE, 10, Connectivity::Four);
        assert_eq!(outcome.filled, 9);
        assert_eq!(outcome.bounds, PixelRect::new(4, 4, 3, 3));

        for y in 0..10 {
            for x in 0..10 {
                let inside = (4..=6).contains(&x) && (4..=6).contains(&y);
                let expected = if inside {
                    BLUE
                } else {
                    before.get(x, y).unwrap()
                };
                assert_eq!(buffer.get(x, y), Some(expected), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_fill_same_color_is_noop() {
        let mut buffer = ringed_buffer();
        let before = buffer.clone();
        let outcome = flood_fill(&mut buffer, (5, 5), WHITE, 0, Connectivity::Four);
        assert!(outcome.is_noop());
        assert_eq!(buffer.as_raw(), before.as_raw());
    }

    #[test]
    fn test_fill_within_tolerance_is_noop() {
        let mut buffer = PixelBuffer::new(4, 4);
        let near_white = Rgba([250, 250, 250, 255]);
        let outcome = flood_fill(&mut buffer, (0, 0), near_white, 10, Connectivity::Four);
        assert!(outcome.is_noop());
        assert_eq!(buffer, PixelBuffer::new(4, 4));
    }

    #[test]
    fn test_seed_outside_is_noop() {
        let mut buffer = PixelBuffer::new(4, 4);
        let outcome = flood_fill(&mut buffer, (4, 0), RED, 10, Connectivity::Four);
        assert!(outcome.is_noop());
    }

    #[test]
    fn test_fill_on_outline_recolors_only_outline() {
        let mut buffer = ringed_buffer();
        let outcome = flood_fill(&mut buffer, (3, 3), RED, 10, Connectivity::Four);
        assert_eq!(outcome.filled, 16);
        assert_eq!(buffer.get(5, 5), Some(WHITE));
        assert_eq!(buffer.get(0, 0), Some(WHITE));
    }

    #[test]
    fn test_tolerance_absorbs_antialiased_edge() {
        let mut buffer = PixelBuffer::new(6, 1);
        buffer.put(2, 0, Rgba([240, 240, 240, 255]));
        buffer.put(4, 0, BLACK);

        flood_fill(&mut buffer, (0, 0), RED, 32, Connectivity::Four);
        assert_eq!(buffer.get(2, 0), Some(RED));
        assert_eq!(buffer.get(3, 0), Some(RED));
        assert_eq!(buffer.get(4, 0), Some(BLACK));
        assert_eq!(buffer.get(5, 0), Some(WHITE));
    }

    #[test]
    fn test_diagonal_gap_needs_eight_connectivity() {
        // Black checker diagonal splits the buffer for 4-connected fills.
        let mut four = PixelBuffer::new(2, 2);
        four.put(1, 0, BLACK);
        four.put(0, 1, BLACK);
        let mut eight = four.clone();

        assert_eq!(flood_fill(&mut four, (0, 0), RED, 0, Connectivity::Four).filled, 1);
        assert_eq!(four.get(1, 1), Some(WHITE));

        assert_eq!(flood_fill(&mut eight, (0, 0), RED, 0, Connectivity::Eight).filled, 2);
        assert_eq!(eight.get(1, 1), Some(RED));
    }

    #[test]
    fn test_large_region_does_not_overflow() {
        let mut buffer = PixelBuffer::new(1024, 1024);
        let outcome = flood_fill(&mut buffer, (0, 0), RED, 0, Connectivity::Four);
        assert_eq!(outcome.filled, 1024 * 1024);
    }
}
