//! Kid-friendly egui widgets for DoodleDream.
//!
//! - **Buttons**: tool buttons, big action buttons, emoji preset buttons
//! - **Swatch**: round color swatches
//! - **Layout**: section labels, separators, panel frames

pub mod buttons;
pub mod layout;
pub mod swatch;

pub use buttons::{ActionButton, PresetButton, ToolButton};
pub use layout::{panel_frame, section_label, separator};
pub use swatch::{ColorSwatch, rgba_to_color32};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Tool button size
    pub const TOOL: f32 = 48.0;
    /// Color swatch diameter
    pub const SWATCH: f32 = 36.0;
    /// Preset button size
    pub const PRESET: f32 = 44.0;
    /// Action button height
    pub const ACTION_HEIGHT: f32 = 44.0;
    /// Button corner radius
    pub const CORNER_RADIUS: u8 = 12;
    /// Panel corner radius
    pub const PANEL_RADIUS: u8 = 16;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    /// Text color
    pub const TEXT: Color32 = Color32::from_rgb(85, 85, 85);
    /// Muted text color
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(102, 102, 102);
    /// Border color
    pub const BORDER: Color32 = Color32::from_rgb(221, 221, 221);
    /// Selected tool (coral)
    pub const PRIMARY: Color32 = Color32::from_rgb(255, 107, 107);
    /// Create button (teal)
    pub const SECONDARY: Color32 = Color32::from_rgb(78, 205, 196);
    /// Pressed edge under the create button
    pub const SECONDARY_SHADOW: Color32 = Color32::from_rgb(61, 177, 169);
    /// Undo button (sunshine)
    pub const UNDO: Color32 = Color32::from_rgb(255, 217, 61);
    /// Save button (leaf)
    pub const SAVE: Color32 = Color32::from_rgb(107, 203, 119);
    /// Unselected button background
    pub const IDLE_BG: Color32 = Color32::from_rgb(240, 240, 240);
    /// Hovered button background
    pub const HOVER_BG: Color32 = Color32::from_rgb(228, 228, 228);
    /// Disabled button background
    pub const DISABLED_BG: Color32 = Color32::from_rgb(204, 204, 204);
    /// Selected preset background
    pub const PRESET_SELECTED_BG: Color32 = Color32::from_rgb(212, 237, 218);
    /// Selected preset border
    pub const PRESET_SELECTED_BORDER: Color32 = Color32::from_rgb(40, 167, 69);
    /// Panel background
    pub const PANEL_BG: Color32 = Color32::from_rgb(255, 255, 255);
    /// Window background
    pub const APP_BG: Color32 = Color32::from_rgb(245, 247, 250);
}
