//! Pre-rendered outline pages for well-known topics.
//!
//! Topics that mention one of the preset keywords are served from a static
//! image instead of going through the generation proxy.

use std::path::{Path, PathBuf};

/// A preset coloring page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    /// Button label, also the topic text it fills in.
    pub label: &'static str,
    /// Emoji shown on the preset button.
    pub icon: &'static str,
    /// Lowercase keyword matched against topics.
    pub keyword: &'static str,
}

impl Preset {
    const fn new(label: &'static str, icon: &'static str, keyword: &'static str) -> Self {
        Self {
            label,
            icon,
            keyword,
        }
    }

    /// File name of the outline image.
    pub fn file_name(&self) -> String {
        format!("{}-little.png", self.keyword)
    }

    /// Path of the outline image under an assets directory.
    pub fn path_in(&self, assets_dir: &Path) -> PathBuf {
        assets_dir.join(self.file_name())
    }
}

/// Lookup order matters: the first keyword contained in the topic wins.
pub const PRESETS: [Preset; 10] = [
    Preset::new("Dinosaur", "🦕", "dinosaur"),
    Preset::new("Unicorn", "🦄", "unicorn"),
    Preset::new("Robot", "🤖", "robot"),
    Preset::new("Butterfly", "🦋", "butterfly"),
    Preset::new("Car", "🚗", "car"),
    Preset::new("Flower", "🌸", "flower"),
    Preset::new("Spaceship", "🚀", "spaceship"),
    Preset::new("Castle", "🏰", "castle"),
    Preset::new("Dragon", "🐉", "dragon"),
    Preset::new("Cat", "🐱", "cat"),
];

/// Find the preset whose keyword appears in `topic` (case-insensitive).
pub fn lookup(topic: &str) -> Option<&'static Preset> {
    let topic = topic.to_lowercase();
    PRESETS.iter().find(|p| topic.contains(p.keyword))
}

/// Whether `topic` is exactly one of the preset labels.
pub fn is_preset_label(topic: &str) -> bool {
    PRESETS.iter().any(|p| p.label == topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_case_insensitive() {
        assert_eq!(lookup("A big DINOSAUR").map(|p| p.label), Some("Dinosaur"));
        assert_eq!(lookup("unicorn").map(|p| p.keyword), Some("unicorn"));
    }

    #[test]
    fn test_lookup_first_match_wins() {
        // "car" is checked before "cat".
        assert_eq!(lookup("a cat in a car").map(|p| p.label), Some("Car"));
        // Substring match: "scary" contains "car".
        assert_eq!(lookup("scary dragon").map(|p| p.label), Some("Car"));
    }

    #[test]
    fn test_lookup_miss() {
        assert_eq!(lookup("a friendly octopus"), None);
    }

    #[test]
    fn test_asset_path() {
        let preset = lookup("robot").unwrap();
        assert_eq!(
            preset.path_in(Path::new("assets")),
            PathBuf::from("assets").join("robot-little.png")
        );
    }

    #[test]
    fn test_preset_label() {
        assert!(is_preset_label("Castle"));
        assert!(!is_preset_label("castle"));
    }
}
