//! Panels around the canvas: header with the page generator, and the
//! controls panel with tools, colors and actions.

use doodledream_core::assets::{PRESETS, is_preset_label};
use doodledream_core::color::PALETTE;
use doodledream_core::tools::{MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};
use doodledream_core::{Complexity, ToolKind, ToolSettings};
use doodledream_widgets::{
    ActionButton, ColorSwatch, PresetButton, ToolButton, panel_frame, rgba_to_color32,
    section_label, separator, theme,
};
use egui::{Align, Context, Layout, RichText, Vec2};

/// Actions triggered from the UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiAction {
    SetTool(ToolKind),
    /// Pick a palette color (by index).
    SelectColor(usize),
    SetBrushSize(u32),
    Undo,
    Save,
    /// Generate a page for the current topic.
    Generate,
    DismissError,
}

/// UI state that lives outside the editor.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub settings: ToolSettings,
    pub topic: String,
    pub complexity: Complexity,
    pub loading: bool,
    pub can_undo: bool,
    pub error: Option<String>,
}

impl UiState {
    /// Whether the Create button is enabled.
    pub fn can_generate(&self) -> bool {
        !self.loading && !self.topic.trim().is_empty()
    }

    /// Whether the "custom images take time" hint is shown.
    pub fn is_custom_topic(&self) -> bool {
        !self.topic.trim().is_empty() && !is_preset_label(&self.topic)
    }
}

/// Glyph drawn on a tool button.
fn tool_glyph(tool: ToolKind) -> &'static str {
    match tool {
        ToolKind::Brush => "🖌",
        ToolKind::Bucket => "🎨",
        ToolKind::Eraser => "⌫",
    }
}

/// Render the header and controls panels. Must run before the canvas's
/// central panel.
pub fn render_ui(ctx: &Context, state: &mut UiState) -> Option<UiAction> {
    let header_action = render_header(ctx, state);
    let controls_action = render_controls(ctx, state);
    let error_action = render_error_window(ctx, state);
    header_action.or(controls_action).or(error_action)
}

fn render_header(ctx: &Context, state: &mut UiState) -> Option<UiAction> {
    let mut action = None;

    egui::TopBottomPanel::top("header")
        .frame(
            egui::Frame::new()
                .fill(theme::APP_BG)
                .inner_margin(egui::Margin::same(12)),
        )
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.vertical(|ui| {
                        ui.label(
                            RichText::new("☁ DoodleDream")
                                .size(28.0)
                                .strong()
                                .color(theme::PRIMARY),
                        );
                        ui.label(
                            RichText::new("Color your imagination")
                                .italics()
                                .color(theme::TEXT_MUTED),
                        );
                    });
                    ui.add_space(24.0);
                    if render_generator(ui, state) {
                        action = Some(UiAction::Generate);
                    }
                });
            });
        });

    action
}

/// Topic field, preset buttons, complexity toggle and the Create button.
/// Returns true when a generation is requested.
fn render_generator(ui: &mut egui::Ui, state: &mut UiState) -> bool {
    let mut generate = false;

    ui.vertical(|ui| {
        ui.horizontal(|ui| {
            let field = egui::TextEdit::singleline(&mut state.topic)
                .hint_text("Pick a character below or type one!")
                .desired_width(320.0)
                .font(egui::TextStyle::Heading);
            let response = ui.add_enabled(!state.loading, field);
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            ui.add_space(8.0);
            for complexity in [Complexity::Simple, Complexity::Detailed] {
                ui.selectable_value(&mut state.complexity, complexity, complexity.label());
            }

            ui.add_space(8.0);
            let label = if state.loading { "Creating..." } else { "🪄 Create!" };
            let clicked = ActionButton::new(label, theme::SECONDARY)
                .edge(theme::SECONDARY_SHADOW)
                .enabled(state.can_generate())
                .min_width(120.0)
                .show(ui);
            generate = (clicked || submitted) && state.can_generate();
        });

        if state.is_custom_topic() {
            ui.label(
                RichText::new("✨ Custom images take about 10 seconds to generate")
                    .italics()
                    .color(theme::TEXT_MUTED),
            );
        }

        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing = Vec2::new(8.0, 8.0);
            for preset in &PRESETS {
                if PresetButton::new(preset.icon, preset.label)
                    .selected(state.topic == preset.label)
                    .enabled(!state.loading)
                    .show(ui)
                {
                    state.topic = preset.label.to_string();
                }
            }
        });
    });

    generate
}

fn render_controls(ctx: &Context, state: &UiState) -> Option<UiAction> {
    let mut action = None;

    egui::SidePanel::left("controls")
        .resizable(false)
        .exact_width(260.0)
        .frame(
            egui::Frame::new()
                .fill(theme::APP_BG)
                .inner_margin(egui::Margin::same(12)),
        )
        .show(ctx, |ui| {
            panel_frame().show(ui, |ui| {
                ui.set_min_height(ui.available_height());
                ui.spacing_mut().item_spacing = Vec2::new(8.0, 8.0);

                ui.horizontal(|ui| {
                    for tool in ToolKind::ALL {
                        if ToolButton::new(tool_glyph(tool), tool.label())
                            .shortcut(tool.shortcut())
                            .selected(state.settings.tool == tool)
                            .show(ui)
                        {
                            action = Some(UiAction::SetTool(tool));
                        }
                    }
                });

                if state.settings.shows_brush_size() {
                    separator(ui);
                    section_label(ui, "Size");
                    let mut size = state.settings.brush_size();
                    let slider = egui::Slider::new(&mut size, MIN_BRUSH_SIZE..=MAX_BRUSH_SIZE)
                        .show_value(false);
                    if ui.add(slider).changed() {
                        action = Some(UiAction::SetBrushSize(size));
                    }
                }

                separator(ui);
                egui::Grid::new("palette")
                    .spacing(Vec2::new(8.0, 8.0))
                    .show(ui, |ui| {
                        for (index, entry) in PALETTE.iter().enumerate() {
                            let selected = state.settings.color == entry.color
                                && state.settings.tool != ToolKind::Eraser;
                            if ColorSwatch::new(rgba_to_color32(entry.color.0), entry.name)
                                .selected(selected)
                                .show(ui)
                            {
                                action = Some(UiAction::SelectColor(index));
                            }
                            if index % 5 == 4 {
                                ui.end_row();
                            }
                        }
                    });

                ui.with_layout(Layout::bottom_up(Align::Min), |ui| {
                    ui.horizontal(|ui| {
                        if ActionButton::new("↺ Undo", theme::UNDO)
                            .text_color(theme::TEXT)
                            .enabled(state.can_undo)
                            .min_width(108.0)
                            .show(ui)
                        {
                            action = Some(UiAction::Undo);
                        }
                        if ActionButton::new("💾 Save", theme::SAVE)
                            .min_width(108.0)
                            .show(ui)
                        {
                            action = Some(UiAction::Save);
                        }
                    });
                });
            });
        });

    action
}

fn render_error_window(ctx: &Context, state: &UiState) -> Option<UiAction> {
    let message = state.error.as_deref()?;
    let mut action = None;

    egui::Window::new("Oops!")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label(message);
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                action = Some(UiAction::DismissError);
            }
        });

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_generate() {
        let mut state = UiState::default();
        assert!(!state.can_generate());
        state.topic = "  ".into();
        assert!(!state.can_generate());
        state.topic = "owl".into();
        assert!(state.can_generate());
        state.loading = true;
        assert!(!state.can_generate());
    }

    #[test]
    fn test_custom_topic_hint() {
        let mut state = UiState::default();
        assert!(!state.is_custom_topic());
        state.topic = "Dragon".into();
        assert!(!state.is_custom_topic());
        state.topic = "a dragon on a bike".into();
        assert!(state.is_custom_topic());
    }
}
