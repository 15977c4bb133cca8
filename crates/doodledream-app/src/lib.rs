//! DoodleDream Application
//!
//! The desktop shell: page generator, tool controls and the paintable
//! canvas, wired to the core editor.

mod app;
mod config;
mod generator;
mod shortcuts;
mod ui;

pub use app::{DoodleDreamApp, fit_canvas_rect, screen_to_canvas};
pub use config::AppConfig;
pub use generator::{GenerationError, GenerationJob, GenerationRequest, fetch_page};
pub use shortcuts::{SHORTCUTS, Shortcut, ShortcutAction};
pub use ui::{UiAction, UiState, render_ui};
