//! Keyboard shortcuts.

use doodledream_core::ToolKind;
use egui::{Key, Modifiers};

/// What a shortcut does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Undo,
    Redo,
    Save,
    SelectTool(ToolKind),
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub command: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        command: bool,
        shift: bool,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            command,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+S").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.command {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Every shortcut the app handles.
pub const SHORTCUTS: [Shortcut; 7] = [
    Shortcut::new("Z", true, false, "Undo"),
    Shortcut::new("Z", true, true, "Redo"),
    Shortcut::new("Y", true, false, "Redo"),
    Shortcut::new("S", true, false, "Save picture"),
    Shortcut::new("B", false, false, "Brush"),
    Shortcut::new("F", false, false, "Fill bucket"),
    Shortcut::new("E", false, false, "Eraser"),
];

/// Map a key press to an action. Tool keys only fire without modifiers,
/// and only when `typing` is false.
pub fn action_for(key: Key, modifiers: Modifiers, typing: bool) -> Option<ShortcutAction> {
    if modifiers.command {
        return match key {
            Key::Z if modifiers.shift => Some(ShortcutAction::Redo),
            Key::Z => Some(ShortcutAction::Undo),
            Key::Y => Some(ShortcutAction::Redo),
            Key::S => Some(ShortcutAction::Save),
            _ => None,
        };
    }
    if typing || modifiers.alt || modifiers.shift {
        return None;
    }
    match key {
        Key::B => Some(ShortcutAction::SelectTool(ToolKind::Brush)),
        Key::F => Some(ShortcutAction::SelectTool(ToolKind::Bucket)),
        Key::E => Some(ShortcutAction::SelectTool(ToolKind::Eraser)),
        _ => None,
    }
}

/// Collect the actions triggered by this frame's key presses.
pub fn collect(ctx: &egui::Context) -> Vec<ShortcutAction> {
    let typing = ctx.wants_keyboard_input();
    ctx.input(|input| {
        input
            .events
            .iter()
            .filter_map(|event| match event {
                egui::Event::Key {
                    key,
                    pressed: true,
                    repeat: false,
                    modifiers,
                    ..
                } => action_for(*key, *modifiers, typing),
                _ => None,
            })
            .collect()
    })
}
