//! Freehand strokes and their rasterization.

use crate::buffer::{PixelBuffer, PixelRect};
use crate::tools::ToolKind;
use image::Rgba;
use kurbo::Point;

/// A stroke in progress: the points seen so far plus the tool, color and
/// size captured when it began.
#[derive(Debug, Clone)]
pub struct Stroke {
    pub tool: ToolKind,
    pub color: Rgba<u8>,
    /// Brush diameter in pixels.
    pub size: f64,
    points: Vec<Point>,
    dirty: PixelRect,
}

impl Stroke {
    pub fn new(tool: ToolKind, color: Rgba<u8>, size: f64) -> Self {
        Self {
            tool,
            color,
            size,
            points: Vec::new(),
            dirty: PixelRect::EMPTY,
        }
    }

    pub fn radius(&self) -> f64 {
        self.size / 2.0
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn last_point(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Pixels written by this stroke so far.
    pub fn dirty(&self) -> PixelRect {
        self.dirty
    }

    pub(crate) fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    pub(crate) fn mark_dirty(&mut self, rect: PixelRect) {
        self.dirty = self.dirty.union(rect);
    }
}

/// Spacing between dabs along a segment: half the radius, at least half a
/// pixel.
pub fn dab_spacing(radius: f64) -> f64 {
    (radius / 2.0).max(0.5)
}

/// Points from `from` (exclusive) to `to` (inclusive) spaced at most
/// `spacing` apart.
pub fn interpolate(from: Point, to: Point, spacing: f64) -> impl Iterator<Item = Point> {
    let distance = from.distance(to);
    let steps = if distance > 0.0 {
        (distance / spacing).ceil() as usize
    } else {
        0
    };
    (1..=steps).map(move |i| from.lerp(to, i as f64 / steps as f64))
}

/// Stamp a single dab.
pub fn stamp(
    buffer: &mut PixelBuffer,
    center: Point,
    radius: f64,
    color_at: impl FnMut(u32, u32) -> Rgba<u8>,
) -> PixelRect {
    buffer
        .fill_circle_with(center, radius, color_at)
        .unwrap_or(PixelRect::EMPTY)
}

/// Stamp dabs along the segment `from`..`to` (the dab at `from` is assumed
/// already drawn). Returns the touched rectangle.
pub fn rasterize_segment(
    buffer: &mut PixelBuffer,
    from: Point,
    to: Point,
    radius: f64,
    mut color_at: impl FnMut(u32, u32) -> Rgba<u8>,
) -> PixelRect {
    let mut touched = PixelRect::EMPTY;
    for center in interpolate(from, to, dab_spacing(radius)) {
        touched = touched.union(stamp(buffer, center, radius, &mut color_at));
    }
    touched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BLACK, WHITE};

    #[test]
    fn test_interpolate_spacing() {
        let points: Vec<Point> =
            interpolate(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 1.0).collect();
        assert_eq!(points.len(), 10);
        assert_eq!(points.last().copied(), Some(Point::new(10.0, 0.0)));
        for pair in points.windows(2) {
            assert!(pair[0].distance(pair[1]) <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn test_interpolate_same_point() {
        assert_eq!(
            interpolate(Point::new(3.0, 3.0), Point::new(3.0, 3.0), 1.0).count(),
            0
        );
    }

    #[test]
    fn test_segment_has_no_gaps() {
        let mut buffer = PixelBuffer::new(40, 10);
        let from = Point::new(2.5, 5.5);
        let to = Point::new(37.5, 5.5);
        stamp(&mut buffer, from, 2.0, |_, _| BLACK);
        let rect = rasterize_segment(&mut buffer, from, to, 2.0, |_, _| BLACK);

        for x in 2..=37 {
            assert_eq!(buffer.get(x, 5), Some(BLACK), "gap at x = {x}");
        }
        assert!(rect.contains(37, 5));
        assert_eq!(buffer.get(0, 0), Some(WHITE));
    }

    #[test]
    fn test_stroke_dirty_union() {
        let mut stroke = Stroke::new(ToolKind::Brush, BLACK, 6.0);
        assert!(stroke.dirty().is_empty());
        stroke.mark_dirty(PixelRect::new(1, 1, 2, 2));
        stroke.mark_dirty(PixelRect::new(5, 5, 1, 1));
        assert_eq!(stroke.dirty(), PixelRect::new(1, 1, 5, 5));
        assert_eq!(stroke.radius(), 3.0);
    }
}
