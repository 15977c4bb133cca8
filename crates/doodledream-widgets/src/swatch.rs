//! Round color swatches.

use egui::{Color32, CursorIcon, Sense, Stroke, Ui, vec2};

use crate::{sizing, theme};

/// Convert straight-alpha RGBA bytes to an egui color.
pub fn rgba_to_color32(rgba: [u8; 4]) -> Color32 {
    Color32::from_rgba_unmultiplied(rgba[0], rgba[1], rgba[2], rgba[3])
}

/// A circular color swatch with a ring when selected.
pub struct ColorSwatch<'a> {
    color: Color32,
    tooltip: &'a str,
    selected: bool,
}

impl<'a> ColorSwatch<'a> {
    pub fn new(color: Color32, tooltip: &'a str) -> Self {
        Self {
            color,
            tooltip,
            selected: false,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Show the swatch and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let size = vec2(sizing::SWATCH, sizing::SWATCH);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());

        if ui.is_rect_visible(rect) {
            let center = rect.center();
            let radius = rect.width().min(rect.height()) / 2.0;
            let painter = ui.painter();

            if self.selected {
                painter.circle_filled(center, radius, self.color);
                painter.circle_stroke(center, radius - 3.0, Stroke::new(3.0, theme::BORDER));
                painter.circle_stroke(center, radius, Stroke::new(2.0, theme::PRIMARY));
            } else {
                let inset = if response.hovered() { 1.0 } else { 2.0 };
                painter.circle_filled(center, radius - inset, self.color);
                // Light colors need an outline against the white panel.
                if is_light(self.color) {
                    painter.circle_stroke(center, radius - inset, Stroke::new(2.0, Color32::from_gray(204)));
                }
            }
        }

        let clicked = response.clicked();
        response
            .on_hover_text(self.tooltip)
            .on_hover_cursor(CursorIcon::PointingHand);
        clicked
    }
}

fn is_light(color: Color32) -> bool {
    color.r() > 230 && color.g() > 230 && color.b() > 230
}
