//! Fixed-size RGBA pixel buffer.

use crate::color::WHITE;
use image::{Rgba, RgbaImage};
use kurbo::Point;

/// An axis-aligned pixel rectangle. Empty when width or height is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const EMPTY: Self = Self {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanning two inclusive corners.
    pub fn from_corners(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        Self::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: PixelRect) -> PixelRect {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        PixelRect::new(x, y, right - x, bottom - y)
    }
}

/// A width × height grid of RGBA pixels. Dimensions never change after
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    /// Create an opaque white buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, WHITE)
    }

    /// Create a buffer filled with one color.
    pub fn filled(width: u32, height: u32, color: Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, color),
        }
    }

    /// Wrap an existing image.
    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// The whole buffer as a rectangle.
    pub fn bounds(&self) -> PixelRect {
        PixelRect::new(0, 0, self.width(), self.height())
    }

    /// Underlying image.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub(crate) fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.image
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.image.get_pixel_checked(x, y).copied()
    }

    /// Write one pixel. Returns false when out of bounds.
    pub fn put(&mut self, x: u32, y: u32, color: Rgba<u8>) -> bool {
        match self.image.get_pixel_mut_checked(x, y) {
            Some(px) => {
                *px = color;
                true
            }
            None => false,
        }
    }

    /// Clip a rectangle to the buffer.
    pub fn clip(&self, rect: PixelRect) -> PixelRect {
        Self::clip_to(self.dimensions(), rect)
    }

    /// Clip a rectangle to `(width, height)`.
    pub fn clip_to((width, height): (u32, u32), rect: PixelRect) -> PixelRect {
        let x = rect.x.min(width);
        let y = rect.y.min(height);
        let right = rect.right().min(width);
        let bottom = rect.bottom().min(height);
        PixelRect::new(x, y, right.saturating_sub(x), bottom.saturating_sub(y))
    }

    /// Copy the raw bytes of a region (clipped to the buffer).
    pub fn copy_region(&self, rect: PixelRect) -> (PixelRect, Vec<u8>) {
        copy_region_from(&self.image, self.clip(rect))
    }

    /// Write raw bytes previously taken with [`copy_region`](Self::copy_region).
    pub fn write_region(&mut self, rect: PixelRect, bytes: &[u8]) {
        let row_len = rect.width as usize * 4;
        if rect.is_empty() || bytes.len() != row_len * rect.height as usize {
            log::warn!(
                "Ignoring region write with mismatched size ({:?}, {} bytes)",
                rect,
                bytes.len()
            );
            return;
        }
        let stride = self.width() as usize * 4;
        let raw = self.as_raw_mut();
        for (row, chunk) in bytes.chunks_exact(row_len).enumerate() {
            let start = (rect.y as usize + row) * stride + rect.x as usize * 4;
            raw[start..start + row_len].copy_from_slice(chunk);
        }
    }

    /// Replace every pixel with those of `image`. Returns false (and leaves
    /// the buffer untouched) when dimensions differ.
    pub fn overwrite(&mut self, image: &RgbaImage) -> bool {
        if image.dimensions() != self.dimensions() {
            return false;
        }
        self.image.copy_from_slice(image.as_raw());
        true
    }

    /// Paint a filled disc. `color_at` picks the color per pixel, which lets
    /// the eraser restore the background instead of a flat color. The pixel
    /// containing `center` is always painted, however small the radius.
    ///
    /// Returns the touched rectangle, or `None` when the disc misses the
    /// buffer entirely.
    pub fn fill_circle_with(
        &mut self,
        center: Point,
        radius: f64,
        mut color_at: impl FnMut(u32, u32) -> Rgba<u8>,
    ) -> Option<PixelRect> {
        let r = radius.max(0.5);
        let r_sq = r * r;

        let min_x = (center.x - r).floor().max(0.0);
        let min_y = (center.y - r).floor().max(0.0);
        let max_x = (center.x + r).ceil().min(self.width() as f64 - 1.0);
        let max_y = (center.y + r).ceil().min(self.height() as f64 - 1.0);
        if max_x < min_x || max_y < min_y {
            return None;
        }

        let (center_x, center_y) = (center.x.floor(), center.y.floor());
        let mut touched: Option<(u32, u32, u32, u32)> = None;
        for y in min_y as u32..=max_y as u32 {
            let dy = y as f64 + 0.5 - center.y;
            for x in min_x as u32..=max_x as u32 {
                let dx = x as f64 + 0.5 - center.x;
                let holds_center = x as f64 == center_x && y as f64 == center_y;
                if dx * dx + dy * dy > r_sq && !holds_center {
                    continue;
                }
                let color = color_at(x, y);
                self.image.put_pixel(x, y, color);
                touched = Some(match touched {
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                    None => (x, y, x, y),
                });
            }
        }

        touched.map(|(x0, y0, x1, y1)| PixelRect::from_corners(x0, y0, x1, y1))
    }
}

/// Copy a region of any RGBA image. `rect` must already be clipped.
pub(crate) fn copy_region_from(image: &RgbaImage, rect: PixelRect) -> (PixelRect, Vec<u8>) {
    let row_len = rect.width as usize * 4;
    let stride = image.width() as usize * 4;
    let raw = image.as_raw();
    let mut out = Vec::with_capacity(row_len * rect.height as usize);
    for row in 0..rect.height as usize {
        let start = (rect.y as usize + row) * stride + rect.x as usize * 4;
        out.extend_from_slice(&raw[start..start + row_len]);
    }
    (rect, out)
}
