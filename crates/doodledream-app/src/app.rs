//! Core application state and frame loop.

use doodledream_core::color::PALETTE;
use doodledream_core::export::DEFAULT_EXPORT_NAME;
use doodledream_core::{Editor, ImageSource, Point, ToolKind};
use egui::{Color32, ColorImage, Pos2, Rect, Sense, TextureHandle, TextureOptions};
use std::time::Duration;

use doodledream_widgets::theme;

use crate::config::AppConfig;
use crate::generator::{GenerationJob, GenerationRequest};
use crate::shortcuts::{self, ShortcutAction};
use crate::ui::{UiAction, UiState, render_ui};

mod file_ops {
    /// Save PNG bytes through a native save dialog. Returns false when the
    /// user cancelled.
    pub fn save_png(png_data: &[u8], name: &str) -> std::io::Result<bool> {
        let dialog = rfd::FileDialog::new()
            .set_title("Save Picture")
            .set_file_name(name)
            .add_filter("PNG Image", &["png"]);

        let Some(path) = dialog.save_file() else {
            return Ok(false);
        };
        std::fs::write(&path, png_data)?;
        log::info!("Saved picture to: {:?}", path);
        Ok(true)
    }
}

/// Map a screen position inside `rect` to canvas coordinates. `None` when
/// the canvas has no area on screen.
pub fn screen_to_canvas(pos: Pos2, rect: Rect, canvas: (u32, u32)) -> Option<Point> {
    if !(rect.width() > 0.0 && rect.height() > 0.0) {
        return None;
    }
    let x = (pos.x - rect.left()) / rect.width() * canvas.0 as f32;
    let y = (pos.y - rect.top()) / rect.height() * canvas.1 as f32;
    Some(Point::new(x as f64, y as f64))
}

/// Largest rectangle with the canvas aspect ratio that fits in `available`,
/// centered.
pub fn fit_canvas_rect(available: Rect, canvas: (u32, u32)) -> Rect {
    let aspect = canvas.0 as f32 / canvas.1.max(1) as f32;
    let mut size = available.size();
    if size.x / size.y.max(1.0) > aspect {
        size.x = size.y * aspect;
    } else {
        size.y = size.x / aspect;
    }
    Rect::from_center_size(available.center(), size)
}

/// The DoodleDream application.
pub struct DoodleDreamApp {
    config: AppConfig,
    editor: Editor,
    ui: UiState,
    texture: Option<TextureHandle>,
    texture_dirty: bool,
    job: Option<GenerationJob>,
}

impl DoodleDreamApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let mut visuals = egui::Visuals::light();
        visuals.panel_fill = theme::APP_BG;
        cc.egui_ctx.set_visuals(visuals);
        let editor = Editor::new(config.canvas_width, config.canvas_height);
        Self {
            config,
            editor,
            ui: UiState::default(),
            texture: None,
            texture_dirty: true,
            job: None,
        }
    }

    fn handle_action(&mut self, action: UiAction) {
        match action {
            UiAction::SetTool(tool) => self.ui.settings.set_tool(tool),
            UiAction::SelectColor(index) => {
                if let Some(entry) = PALETTE.get(index) {
                    self.ui.settings.select_color(entry.color);
                }
            }
            UiAction::SetBrushSize(size) => self.ui.settings.set_brush_size(size),
            UiAction::Undo => self.undo(),
            UiAction::Save => self.save(),
            UiAction::Generate => self.start_generation(),
            UiAction::DismissError => self.ui.error = None,
        }
    }

    fn handle_shortcut(&mut self, action: ShortcutAction) {
        match action {
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => {
                if self.editor.redo() {
                    self.texture_dirty = true;
                }
            }
            ShortcutAction::Save => self.save(),
            ShortcutAction::SelectTool(tool) => self.ui.settings.set_tool(tool),
        }
    }

    fn undo(&mut self) {
        if self.editor.undo() {
            self.texture_dirty = true;
        }
    }

    fn save(&mut self) {
        let result = self
            .editor
            .save()
            .map_err(|e| e.to_string())
            .and_then(|png| {
                file_ops::save_png(&png, DEFAULT_EXPORT_NAME).map_err(|e| e.to_string())
            });
        if let Err(e) = result {
            log::error!("Failed to save picture: {}", e);
            self.ui.error = Some(format!("Failed to save picture: {e}"));
        }
    }

    fn start_generation(&mut self) {
        let topic = self.ui.topic.trim().to_string();
        if topic.is_empty() {
            return;
        }
        if let Some(previous) = self.job.take() {
            previous.cancel();
        }
        let request = GenerationRequest {
            topic,
            complexity: self.ui.complexity,
        };
        self.job = Some(GenerationJob::spawn(
            request,
            self.config.api_url.clone(),
            self.config.assets_dir.clone(),
        ));
        self.ui.loading = true;
    }

    fn poll_generation(&mut self, ctx: &egui::Context) {
        let Some(job) = self.job.as_ref() else {
            return;
        };
        let Some(result) = job.poll() else {
            ctx.request_repaint_after(Duration::from_millis(100));
            return;
        };
        let topic = job.topic().to_string();
        self.job = None;
        self.ui.loading = false;

        match result.map_err(|e| e.to_string()).and_then(|source| self.apply_page(&source)) {
            Ok(()) => log::info!("Loaded page for '{}'", topic),
            Err(message) => {
                log::error!("Failed to generate image: {}", message);
                self.ui.error = Some(format!("Failed to generate image: {message}"));
            }
        }
    }

    fn apply_page(&mut self, source: &ImageSource) -> Result<(), String> {
        self.editor.load_background(source).map_err(|e| e.to_string())?;
        self.texture_dirty = true;
        Ok(())
    }

    fn sync_texture(&mut self, ctx: &egui::Context) -> TextureHandle {
        let buffer = self.editor.buffer();
        let size = [buffer.width() as usize, buffer.height() as usize];
        match &mut self.texture {
            Some(texture) => {
                if self.texture_dirty {
                    let image = ColorImage::from_rgba_unmultiplied(size, buffer.as_raw());
                    texture.set(image, TextureOptions::LINEAR);
                }
                self.texture_dirty = false;
                texture.clone()
            }
            None => {
                let image = ColorImage::from_rgba_unmultiplied(size, buffer.as_raw());
                let texture = ctx.load_texture("canvas", image, TextureOptions::LINEAR);
                self.texture = Some(texture.clone());
                self.texture_dirty = false;
                texture
            }
        }
    }

    fn render_canvas(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(theme::APP_BG)
                    .inner_margin(egui::Margin::same(12)),
            )
            .show(ctx, |ui| {
                let canvas = self.editor.dimensions();
                let rect = fit_canvas_rect(ui.available_rect_before_wrap(), canvas);
                let response = ui.allocate_rect(rect, Sense::click_and_drag());

                self.handle_pointer(&response, rect, canvas);

                let texture = self.sync_texture(ctx);
                let painter = ui.painter();
                painter.rect_filled(rect.expand(2.0), 8.0, Color32::from_gray(221));
                painter.image(
                    texture.id(),
                    rect,
                    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                    Color32::WHITE,
                );

                if self.ui.loading {
                    painter.rect_filled(rect, 0.0, Color32::from_white_alpha(160));
                    painter.text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        "Creating your page...",
                        egui::FontId::proportional(24.0),
                        Color32::from_gray(85),
                    );
                }

                if self.ui.settings.tool != ToolKind::Bucket {
                    response.on_hover_cursor(egui::CursorIcon::Crosshair);
                }
            });
    }

    fn handle_pointer(&mut self, response: &egui::Response, rect: Rect, canvas: (u32, u32)) {
        let settings = self.ui.settings;
        let target = response
            .interact_pointer_pos()
            .and_then(|pos| screen_to_canvas(pos, rect, canvas));

        if settings.tool == ToolKind::Bucket {
            if let (true, Some(point)) = (response.clicked(), target) {
                let outcome = self.editor.fill_at(point, settings.color);
                if !outcome.is_noop() {
                    self.texture_dirty = true;
                }
            }
            return;
        }

        let down = response.is_pointer_button_down_on();
        match (down, target) {
            (true, Some(point)) => {
                if self.editor.is_stroking() {
                    self.editor.continue_stroke(point);
                } else {
                    self.editor.begin_stroke_with(point, &settings);
                }
                self.texture_dirty = true;
            }
            _ => {
                if self.editor.end_stroke() {
                    self.texture_dirty = true;
                }
            }
        }
    }
}

impl eframe::App for DoodleDreamApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_generation(ctx);

        for action in shortcuts::collect(ctx) {
            self.handle_shortcut(action);
        }

        self.ui.can_undo = self.editor.can_undo();
        if let Some(action) = render_ui(ctx, &mut self.ui) {
            self.handle_action(action);
        }

        self.render_canvas(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Vec2;

    #[test]
    fn test_screen_to_canvas() {
        let rect = Rect::from_min_size(Pos2::new(100.0, 50.0), Vec2::new(512.0, 384.0));
        let point = screen_to_canvas(Pos2::new(356.0, 242.0), rect, (1024, 768));
        assert_eq!(point, Some(Point::new(512.0, 384.0)));
        let origin = screen_to_canvas(rect.min, rect, (1024, 768));
        assert_eq!(origin, Some(Point::ZERO));
    }

    #[test]
    fn test_screen_to_canvas_empty_rect() {
        let collapsed = Rect::from_min_size(Pos2::new(10.0, 10.0), Vec2::ZERO);
        assert_eq!(screen_to_canvas(Pos2::new(10.0, 10.0), collapsed, (1024, 768)), None);
        let flat = Rect::from_min_size(Pos2::ZERO, Vec2::new(300.0, 0.0));
        assert_eq!(screen_to_canvas(Pos2::new(5.0, 0.0), flat, (1024, 768)), None);
        assert_eq!(screen_to_canvas(Pos2::ZERO, Rect::NOTHING, (1024, 768)), None);
    }

    #[test]
    fn test_fit_canvas_rect_keeps_aspect() {
        let wide = Rect::from_min_size(Pos2::ZERO, Vec2::new(2000.0, 768.0));
        let fitted = fit_canvas_rect(wide, (1024, 768));
        assert_eq!(fitted.size(), Vec2::new(1024.0, 768.0));
        assert_eq!(fitted.center(), wide.center());

        let tall = Rect::from_min_size(Pos2::ZERO, Vec2::new(512.0, 2000.0));
        let fitted = fit_canvas_rect(tall, (1024, 768));
        assert_eq!(fitted.size(), Vec2::new(512.0, 384.0));
    }
}
