//! DoodleDream Core Library
//!
//! Platform-agnostic pieces of the DoodleDream coloring book: the raster
//! canvas editor with flood fill and undo, tool state, background decoding,
//! PNG export, preset pages, and the wire types of the generation proxy.

pub mod api;
pub mod assets;
pub mod background;
pub mod buffer;
pub mod color;
pub mod editor;
pub mod export;
pub mod fill;
pub mod history;
pub mod stroke;
pub mod tools;

pub use api::{Complexity, GenerateRequest, GenerateResponse, PromptError};
pub use assets::{Preset, PRESETS};
pub use background::{BackgroundError, ImageSource};
pub use buffer::{PixelBuffer, PixelRect};
pub use color::{PaletteColor, PALETTE};
pub use editor::Editor;
pub use export::ExportError;
pub use fill::{flood_fill, Connectivity, FillOutcome};
pub use history::{History, HistoryEntry, PixelPatch};
pub use stroke::Stroke;
pub use tools::{ToolKind, ToolSettings};

// Pixel and point types used throughout the public API.
pub use image::Rgba;
pub use kurbo::Point;
