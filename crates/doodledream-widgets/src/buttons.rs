//! Button components: tool buttons, action buttons, preset buttons.

use egui::{
    Align2, Color32, CornerRadius, CursorIcon, FontId, Rect, Sense, Stroke, StrokeKind, Ui, vec2,
};

use crate::{sizing, theme};

/// A square tool button with a glyph, filled with the primary color when
/// selected.
pub struct ToolButton<'a> {
    glyph: &'a str,
    tooltip: &'a str,
    shortcut: Option<char>,
    selected: bool,
}

impl<'a> ToolButton<'a> {
    pub fn new(glyph: &'a str, tooltip: &'a str) -> Self {
        Self {
            glyph,
            tooltip,
            shortcut: None,
            selected: false,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Set keyboard shortcut (shown in hover tooltip).
    pub fn shortcut(mut self, shortcut: char) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let size = vec2(sizing::TOOL, sizing::TOOL);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());

        if ui.is_rect_visible(rect) {
            let bg_color = if self.selected {
                theme::PRIMARY
            } else if response.hovered() {
                theme::HOVER_BG
            } else {
                theme::IDLE_BG
            };
            let text_color = if self.selected {
                Color32::WHITE
            } else {
                theme::TEXT
            };

            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg_color);
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                self.glyph,
                FontId::proportional(22.0),
                text_color,
            );
        }

        let clicked = response.clicked();
        let response = match self.shortcut {
            Some(key) => response.on_hover_text(format!("{} ({})", self.tooltip, key)),
            None => response.on_hover_text(self.tooltip),
        };
        response.on_hover_cursor(CursorIcon::PointingHand);
        clicked
    }
}

/// A wide, colored button with a label, e.g. Undo, Save or Create.
pub struct ActionButton<'a> {
    label: &'a str,
    fill: Color32,
    text_color: Color32,
    enabled: bool,
    min_width: f32,
    edge: Option<Color32>,
}

impl<'a> ActionButton<'a> {
    pub fn new(label: &'a str, fill: Color32) -> Self {
        Self {
            label,
            fill,
            text_color: Color32::WHITE,
            enabled: true,
            min_width: 0.0,
            edge: None,
        }
    }

    pub fn text_color(mut self, color: Color32) -> Self {
        self.text_color = color;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn min_width(mut self, width: f32) -> Self {
        self.min_width = width;
        self
    }

    /// Draw a darker raised edge under the button.
    pub fn edge(mut self, color: Color32) -> Self {
        self.edge = Some(color);
        self
    }

    /// Show the button and return true if clicked while enabled.
    pub fn show(self, ui: &mut Ui) -> bool {
        let font_id = FontId::proportional(16.0);
        let galley = ui
            .painter()
            .layout_no_wrap(self.label.to_string(), font_id.clone(), Color32::PLACEHOLDER);
        let width = (galley.size().x + 32.0).max(self.min_width);
        let size = vec2(width, sizing::ACTION_HEIGHT);
        let sense = if self.enabled {
            Sense::click()
        } else {
            Sense::hover()
        };
        let (rect, response) = ui.allocate_exact_size(size, sense);

        if ui.is_rect_visible(rect) {
            let radius = CornerRadius::same(sizing::CORNER_RADIUS);
            let (fill, text_color) = if self.enabled {
                (self.fill, self.text_color)
            } else {
                (theme::DISABLED_BG, Color32::WHITE)
            };

            let body = match self.edge {
                Some(edge) if self.enabled => {
                    ui.painter().rect_filled(rect, radius, edge);
                    Rect::from_min_max(rect.min, rect.max - vec2(0.0, 4.0))
                }
                _ => rect,
            };
            let fill = if self.enabled && response.hovered() {
                fill.gamma_multiply(0.92)
            } else {
                fill
            };
            ui.painter().rect_filled(body, radius, fill);
            ui.painter().text(
                body.center(),
                Align2::CENTER_CENTER,
                self.label,
                font_id,
                text_color,
            );
        }

        if self.enabled {
            let clicked = response.clicked();
            response.on_hover_cursor(CursorIcon::PointingHand);
            clicked
        } else {
            false
        }
    }
}

/// A square emoji button for a preset page.
pub struct PresetButton<'a> {
    icon: &'a str,
    label: &'a str,
    selected: bool,
    enabled: bool,
}

impl<'a> PresetButton<'a> {
    pub fn new(icon: &'a str, label: &'a str) -> Self {
        Self {
            icon,
            label,
            selected: false,
            enabled: true,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let size = vec2(sizing::PRESET, sizing::PRESET);
        let sense = if self.enabled {
            Sense::click()
        } else {
            Sense::hover()
        };
        let (rect, response) = ui.allocate_exact_size(size, sense);

        if ui.is_rect_visible(rect) {
            let radius = CornerRadius::same(sizing::CORNER_RADIUS);
            let (bg_color, border) = if self.selected {
                (
                    theme::PRESET_SELECTED_BG,
                    Stroke::new(2.0, theme::PRESET_SELECTED_BORDER),
                )
            } else if self.enabled && response.hovered() {
                (theme::HOVER_BG, Stroke::new(1.0, theme::BORDER))
            } else {
                (theme::IDLE_BG, Stroke::new(1.0, theme::BORDER))
            };

            ui.painter().rect_filled(rect, radius, bg_color);
            ui.painter()
                .rect_stroke(rect, radius, border, StrokeKind::Inside);
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                self.icon,
                FontId::proportional(24.0),
                theme::TEXT,
            );
        }

        let clicked = self.enabled && response.clicked();
        response
            .on_hover_text(self.label)
            .on_hover_cursor(CursorIcon::PointingHand);
        clicked
    }
}
