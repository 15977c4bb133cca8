//! Raster canvas editor.
//!
//! The editor owns the page's pixel buffer and its undo history. Every
//! mutating operation saves the prior pixels first, so undo always restores
//! an exact earlier state:
//!
//! - strokes snapshot the buffer when they begin and shrink the snapshot to
//!   the stroke's bounding box when they end;
//! - fills snapshot before running and keep the filled bounding box.
//!
//! The decoded background (line art) is kept as its own layer. The eraser
//! paints from that layer, so erasing removes coloring but not outlines.

use crate::background::{fit_to_canvas, BackgroundResult, ImageSource};
use crate::buffer::{PixelBuffer, PixelRect};
use crate::color::WHITE;
use crate::export::{encode_png, ExportError};
use crate::fill::{flood_fill, Connectivity, FillOutcome, DEFAULT_TOLERANCE};
use crate::history::{History, HistoryEntry, PixelPatch};
use crate::stroke::{rasterize_segment, stamp, Stroke};
use crate::tools::{ToolKind, ToolSettings};
use image::{Rgba, RgbaImage};
use kurbo::Point;

/// Default canvas size.
pub const DEFAULT_CANVAS_WIDTH: u32 = 1024;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 768;

/// A stroke being drawn and the buffer as it was before it began.
#[derive(Debug)]
struct ActiveStroke {
    stroke: Stroke,
    snapshot: RgbaImage,
}

/// The coloring page editor.
#[derive(Debug)]
pub struct Editor {
    buffer: PixelBuffer,
    background: Option<RgbaImage>,
    history: History,
    active: Option<ActiveStroke>,
    tolerance: u8,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
    }
}

impl Editor {
    /// Create an editor with a blank white page.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_history(width, height, History::default())
    }

    /// Create an editor with custom history limits.
    pub fn with_history(width: u32, height: u32, history: History) -> Self {
        Self {
            buffer: PixelBuffer::new(width, height),
            background: None,
            history,
            active: None,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    /// The fitted background layer, if one is loaded.
    pub fn background(&self) -> Option<&RgbaImage> {
        self.background.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn tolerance(&self) -> u8 {
        self.tolerance
    }

    /// Set the bucket tolerance (maximum per-channel difference).
    pub fn set_tolerance(&mut self, tolerance: u8) {
        self.tolerance = tolerance;
    }

    /// Replace the page with a background image scaled to fit. Clears
    /// history. On error nothing changes.
    pub fn load_background(&mut self, source: &ImageSource) -> BackgroundResult<()> {
        let decoded = source.decode()?;
        let (width, height) = self.buffer.dimensions();
        let fitted = fit_to_canvas(&decoded, width, height);

        self.active = None;
        self.buffer.overwrite(&fitted);
        self.background = Some(fitted);
        self.history.clear();
        log::info!(
            "Loaded {}x{} background onto {}x{} canvas",
            decoded.width(),
            decoded.height(),
            width,
            height
        );
        Ok(())
    }

    /// Start a brush or eraser stroke at `point`. The first dab is painted
    /// immediately so a click leaves a dot. Returns false for tools that do
    /// not draw strokes.
    pub fn begin_stroke(&mut self, point: Point, tool: ToolKind, color: Rgba<u8>, size: f64) -> bool {
        if !tool.is_stroke() {
            log::debug!("Ignoring stroke for {:?}", tool);
            return false;
        }
        self.end_stroke();

        let mut stroke = Stroke::new(tool, color, size);
        stroke.push(point);
        let snapshot = self.buffer.image().clone();

        let background = self.background.as_ref();
        let touched = stamp(
            &mut self.buffer,
            point,
            stroke.radius(),
            stroke_color(&stroke, background),
        );
        stroke.mark_dirty(touched);

        self.active = Some(ActiveStroke { stroke, snapshot });
        true
    }

    /// Start a stroke using the current tool settings.
    pub fn begin_stroke_with(&mut self, point: Point, settings: &ToolSettings) -> bool {
        self.begin_stroke(
            point,
            settings.tool,
            settings.color,
            settings.brush_size() as f64,
        )
    }

    /// Extend the active stroke to `point`, filling in dabs along the way.
    pub fn continue_stroke(&mut self, point: Point) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let stroke = &mut active.stroke;
        let Some(from) = stroke.last_point() else {
            return;
        };
        stroke.push(point);

        let background = self.background.as_ref();
        let touched = rasterize_segment(
            &mut self.buffer,
            from,
            point,
            stroke.radius(),
            stroke_color(stroke, background),
        );
        stroke.mark_dirty(touched);
    }

    /// Finish the active stroke and record it. Returns false when no stroke
    /// was active.
    pub fn end_stroke(&mut self) -> bool {
        let Some(ActiveStroke { stroke, snapshot }) = self.active.take() else {
            return false;
        };
        let description = match stroke.tool {
            ToolKind::Eraser => "Erase",
            _ => "Brush stroke",
        };
        let patch = PixelPatch::from_snapshot(&snapshot, stroke.dirty());
        self.history.push(HistoryEntry::new(description, patch));
        log::trace!("{} with {} points", description, stroke.len());
        true
    }

    /// Whether a stroke is in progress.
    pub fn is_stroking(&self) -> bool {
        self.active.is_some()
    }

    /// Bucket-fill the region under `point` with `color`.
    ///
    /// The prior state is recorded even when the fill changes nothing; a
    /// point outside the page does nothing at all.
    pub fn fill_at(&mut self, point: Point, color: Rgba<u8>) -> FillOutcome {
        self.end_stroke();

        let Some(seed) = self.pixel_at(point) else {
            return FillOutcome::default();
        };

        let snapshot = self.buffer.image().clone();
        let outcome = flood_fill(
            &mut self.buffer,
            seed,
            color,
            self.tolerance,
            Connectivity::Four,
        );
        let patch = PixelPatch::from_snapshot(&snapshot, outcome.bounds);
        self.history.push(HistoryEntry::new("Fill", patch));
        log::debug!("Filled {} pixels at {:?}", outcome.filled, seed);
        outcome
    }

    /// Undo the most recent operation. Returns false when there is nothing
    /// to undo.
    pub fn undo(&mut self) -> bool {
        self.end_stroke();
        self.history.undo(&mut self.buffer).is_some()
    }

    /// Redo the most recently undone operation.
    pub fn redo(&mut self) -> bool {
        self.end_stroke();
        self.history.redo(&mut self.buffer).is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo() || self.active.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Encode the current page as PNG. Does not modify anything.
    pub fn save(&self) -> Result<Vec<u8>, ExportError> {
        encode_png(&self.buffer)
    }

    /// Pixel coordinate under a canvas-space point.
    pub fn pixel_at(&self, point: Point) -> Option<(u32, u32)> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let (x, y) = (point.x.floor() as u32, point.y.floor() as u32);
        self.buffer.bounds().contains(x, y).then_some((x, y))
    }

    /// Rectangle covering the whole page.
    pub fn bounds(&self) -> PixelRect {
        self.buffer.bounds()
    }
}

/// Per-pixel color for a stroke: the stroke color, or the background layer
/// for the eraser.
fn stroke_color<'a>(
    stroke: &Stroke,
    background: Option<&'a RgbaImage>,
) -> impl FnMut(u32, u32) -> Rgba<u8> + 'a {
    let erasing = stroke.tool == ToolKind::Eraser;
    let color = stroke.color;
    move |x, y| {
        if !erasing {
            return color;
        }
        background
            .and_then(|bg| bg.get_pixel_checked(x, y))
            .copied()
            .unwrap_or(WHITE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::to_data_uri;
    use crate::color::BLACK;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn png(image: &RgbaImage) -> Vec<u8> {
        let mut out = std::io::Cursor::new(Vec::new());
        image.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    /// A 10×10 outline page: black ring around the 3×3 block at (4..=6).
    fn ring_page() -> RgbaImage {
        let mut image = RgbaImage::from_pixel(10, 10, WHITE);
        for i in 3..=7 {
            image.put_pixel(i, 3, BLACK);
            image.put_pixel(i, 7, BLACK);
            image.put_pixel(3, i, BLACK);
            image.put_pixel(7, i, BLACK);
        }
        image
    }

    fn editor_with_ring() -> Editor {
        let mut editor = Editor::new(10, 10);
        editor
            .load_background(&ImageSource::Bytes(png(&ring_page())))
            .unwrap();
        editor
    }

    #[test]
    fn test_fill_then_undo_restores_exactly() {
        let mut editor = editor_with_ring();
        let before = editor.buffer().clone();

        let outcome = editor.fill_at(Point::new(5.5, 5.5), BLUE);
        assert_eq!(outcome.filled, 9);
        assert_ne!(editor.buffer(), &before);

        assert!(editor.undo());
        assert_eq!(editor.buffer().as_raw(), before.as_raw());
    }

    #[test]
    fn test_undo_with_empty_history() {
        let mut editor = Editor::new(4, 4);
        assert!(!editor.can_undo());
        assert!(!editor.undo());
        assert_eq!(editor.buffer(), &PixelBuffer::new(4, 4));
    }

    #[test]
    fn test_whole_page_fill_scenario() {
        let mut editor = Editor::new(10, 10);
        editor.set_tolerance(10);
        let outcome = editor.fill_at(Point::new(5.0, 5.0), RED);
        assert_eq!(outcome.filled, 100);
        assert!(editor.buffer().image().pixels().all(|p| *p == RED));
    }

    #[test]
    fn test_n_operations_then_n_undos() {
        let mut editor = editor_with_ring();
        let initial = editor.buffer().clone();

        editor.begin_stroke(Point::new(1.0, 1.0), ToolKind::Brush, RED, 2.0);
        editor.continue_stroke(Point::new(8.0, 1.0));
        editor.end_stroke();
        editor.fill_at(Point::new(5.0, 5.0), BLUE);
        editor.begin_stroke(Point::new(5.0, 5.0), ToolKind::Eraser, RED, 2.0);
        editor.continue_stroke(Point::new(5.0, 9.0));
        editor.end_stroke();
        editor.fill_at(Point::new(0.0, 9.0), RED);

        assert_eq!(editor.history().undo_count(), 4);
        for _ in 0..4 {
            assert!(editor.undo());
        }
        assert!(!editor.undo());
        assert_eq!(editor.buffer().as_raw(), initial.as_raw());
    }

    #[test]
    fn test_redo_reapplies_and_new_action_clears_it() {
        let mut editor = Editor::new(10, 10);
        editor.fill_at(Point::new(0.0, 0.0), RED);
        let filled = editor.buffer().clone();

        editor.undo();
        assert!(editor.can_redo());
        assert!(editor.redo());
        assert_eq!(editor.buffer(), &filled);

        editor.undo();
        editor.begin_stroke(Point::new(2.0, 2.0), ToolKind::Brush, BLUE, 4.0);
        editor.end_stroke();
        assert!(!editor.can_redo());
        assert!(!editor.redo());
    }

    #[test]
    fn test_fast_stroke_leaves_no_gap() {
        let mut editor = Editor::new(60, 20);
        editor.begin_stroke(Point::new(2.5, 10.5), ToolKind::Brush, RED, 4.0);
        // Far more than one brush diameter apart.
        editor.continue_stroke(Point::new(57.5, 10.5));
        editor.end_stroke();
        for x in 2..=57 {
            assert_eq!(editor.buffer().get(x, 10), Some(RED), "gap at x = {x}");
        }
    }

    #[test]
    fn test_click_leaves_dot() {
        let mut editor = Editor::new(10, 10);
        assert!(editor.begin_stroke(Point::new(5.5, 5.5), ToolKind::Brush, RED, 5.0));
        assert!(editor.end_stroke());
        assert_eq!(editor.buffer().get(5, 5), Some(RED));
        assert_eq!(editor.history().undo_count(), 1);
    }

    #[test]
    fn test_one_pixel_brush_on_pixel_corner() {
        let mut editor = Editor::new(10, 10);
        editor.begin_stroke(Point::new(5.0, 5.0), ToolKind::Brush, RED, 1.0);
        editor.end_stroke();
        let painted = editor.buffer().image().pixels().filter(|p| **p == RED).count();
        assert_eq!(painted, 1);
        assert_eq!(editor.buffer().get(5, 5), Some(RED));
        assert!(editor.undo());
        assert_eq!(editor.buffer().get(5, 5), Some(WHITE));
    }

    #[test]
    fn test_bucket_does_not_start_stroke() {
        let mut editor = Editor::new(10, 10);
        assert!(!editor.begin_stroke(Point::new(5.0, 5.0), ToolKind::Bucket, RED, 5.0));
        assert!(!editor.is_stroking());
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_eraser_restores_line_art() {
        let mut editor = editor_with_ring();
        let page = editor.buffer().clone();
        editor.fill_at(Point::new(0.0, 0.0), RED);

        editor.begin_stroke(Point::new(0.5, 3.5), ToolKind::Eraser, BLUE, 3.0);
        editor.continue_stroke(Point::new(9.5, 3.5));
        editor.end_stroke();

        // The erased row matches the original page, outline included.
        for x in 0..10 {
            assert_eq!(editor.buffer().get(x, 3), page.get(x, 3));
        }
        assert_eq!(editor.buffer().get(3, 3), Some(BLACK));
    }

    #[test]
    fn test_eraser_on_blank_page_paints_white() {
        let mut editor = Editor::new(10, 10);
        editor.fill_at(Point::new(0.0, 0.0), RED);
        editor.begin_stroke(Point::new(5.5, 5.5), ToolKind::Eraser, RED, 2.0);
        editor.end_stroke();
        assert_eq!(editor.buffer().get(5, 5), Some(WHITE));
    }

    #[test]
    fn test_failed_background_leaves_state() {
        let mut editor = Editor::new(10, 10);
        editor.fill_at(Point::new(0.0, 0.0), RED);
        let before = editor.buffer().clone();

        let result = editor.load_background(&ImageSource::DataUri(to_data_uri(
            "image/png",
            b"not an image",
        )));
        assert!(result.is_err());
        assert_eq!(editor.buffer(), &before);
        assert_eq!(editor.history().undo_count(), 1);
    }

    #[test]
    fn test_background_clears_history_and_fits() {
        let mut editor = Editor::new(20, 10);
        editor.fill_at(Point::new(0.0, 0.0), RED);

        let art = RgbaImage::from_pixel(10, 10, BLACK);
        editor
            .load_background(&ImageSource::DataUri(to_data_uri("image/png", &png(&art))))
            .unwrap();

        assert!(!editor.can_undo());
        assert_eq!(editor.dimensions(), (20, 10));
        // Square art centered in a wide page.
        assert_eq!(editor.buffer().get(0, 5), Some(WHITE));
        assert_eq!(editor.buffer().get(10, 5), Some(BLACK));
    }

    #[test]
    fn test_fill_outside_page_is_ignored() {
        let mut editor = Editor::new(10, 10);
        let outcome = editor.fill_at(Point::new(-1.0, 4.0), RED);
        assert!(outcome.is_noop());
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_save_is_pure() {
        let mut editor = Editor::new(8, 8);
        editor.fill_at(Point::new(0.0, 0.0), BLUE);
        let before = editor.buffer().clone();
        let bytes = editor.save().unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(editor.buffer(), &before);
        assert_eq!(editor.history().undo_count(), 1);
    }

    #[test]
    fn test_undo_during_stroke_commits_then_undoes() {
        let mut editor = Editor::new(10, 10);
        editor.begin_stroke(Point::new(5.0, 5.0), ToolKind::Brush, RED, 4.0);
        editor.continue_stroke(Point::new(7.0, 5.0));
        assert!(editor.undo());
        assert!(!editor.is_stroking());
        assert_eq!(editor.buffer(), &PixelBuffer::new(10, 10));
    }
}
