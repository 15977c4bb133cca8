//! Tool selection state.

use crate::color::DEFAULT_COLOR;
use image::Rgba;
use serde::{Deserialize, Serialize};

/// Smallest brush diameter offered by the size slider.
pub const MIN_BRUSH_SIZE: u32 = 5;
/// Largest brush diameter offered by the size slider.
pub const MAX_BRUSH_SIZE: u32 = 50;
/// Brush diameter at startup.
pub const DEFAULT_BRUSH_SIZE: u32 = 10;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Brush,
    Bucket,
    Eraser,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [ToolKind::Brush, ToolKind::Bucket, ToolKind::Eraser];

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            ToolKind::Brush => "Brush",
            ToolKind::Bucket => "Fill Bucket",
            ToolKind::Eraser => "Eraser",
        }
    }

    /// Keyboard shortcut.
    pub fn shortcut(&self) -> char {
        match self {
            ToolKind::Brush => 'B',
            ToolKind::Bucket => 'F',
            ToolKind::Eraser => 'E',
        }
    }

    /// Whether the tool paints strokes (as opposed to a single click).
    pub fn is_stroke(&self) -> bool {
        matches!(self, ToolKind::Brush | ToolKind::Eraser)
    }
}

/// Current tool, color and brush size, owned by the UI and read by the
/// editor per operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolSettings {
    pub tool: ToolKind,
    pub color: Rgba<u8>,
    brush_size: u32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tool: ToolKind::default(),
            color: DEFAULT_COLOR,
            brush_size: DEFAULT_BRUSH_SIZE,
        }
    }
}

impl ToolSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn brush_size(&self) -> u32 {
        self.brush_size
    }

    /// Set the brush diameter, clamped to the slider range.
    pub fn set_brush_size(&mut self, size: u32) {
        self.brush_size = size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tool = tool;
    }

    /// Pick a color. Picking a color while erasing switches back to the
    /// brush.
    pub fn select_color(&mut self, color: Rgba<u8>) {
        self.color = color;
        if self.tool == ToolKind::Eraser {
            self.tool = ToolKind::Brush;
        }
    }

    /// Whether the size slider applies to the current tool.
    pub fn shows_brush_size(&self) -> bool {
        self.tool.is_stroke()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PALETTE;

    #[test]
    fn test_defaults() {
        let settings = ToolSettings::new();
        assert_eq!(settings.tool, ToolKind::Brush);
        assert_eq!(settings.color, DEFAULT_COLOR);
        assert_eq!(settings.brush_size(), DEFAULT_BRUSH_SIZE);
    }

    #[test]
    fn test_brush_size_clamped() {
        let mut settings = ToolSettings::new();
        settings.set_brush_size(1);
        assert_eq!(settings.brush_size(), MIN_BRUSH_SIZE);
        settings.set_brush_size(500);
        assert_eq!(settings.brush_size(), MAX_BRUSH_SIZE);
    }

    #[test]
    fn test_color_pick_leaves_eraser() {
        let mut settings = ToolSettings::new();
        settings.set_tool(ToolKind::Eraser);
        settings.select_color(PALETTE[2].color);
        assert_eq!(settings.tool, ToolKind::Brush);

        settings.set_tool(ToolKind::Bucket);
        settings.select_color(PALETTE[0].color);
        assert_eq!(settings.tool, ToolKind::Bucket);
    }

    #[test]
    fn test_tool_serde_names() {
        assert_eq!(serde_json::to_string(&ToolKind::Bucket).unwrap(), "\"bucket\"");
        let tool: ToolKind = serde_json::from_str("\"eraser\"").unwrap();
        assert_eq!(tool, ToolKind::Eraser);
    }
}
