//! Application configuration.

use doodledream_core::editor::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use std::path::PathBuf;

/// Environment variable overriding the generation endpoint.
pub const API_URL_VAR: &str = "DOODLEDREAM_API_URL";
/// Environment variable overriding the preset assets directory.
pub const ASSETS_VAR: &str = "DOODLEDREAM_ASSETS";

const DEFAULT_API_URL: &str = "http://localhost:3001/api/generate";
const DEFAULT_ASSETS_DIR: &str = "assets";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub window_width: f32,
    pub window_height: f32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Full URL of the proxy's generate endpoint.
    pub api_url: String,
    /// Directory holding the preset outline images.
    pub assets_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "DoodleDream".to_string(),
            window_width: 1280.0,
            window_height: 900.0,
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            api_url: DEFAULT_API_URL.to_string(),
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
        }
    }
}

impl AppConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `lookup`; blank values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = value(API_URL_VAR) {
            config.api_url = url;
        }
        if let Some(dir) = value(ASSETS_VAR) {
            config.assets_dir = PathBuf::from(dir);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config.api_url, "http://localhost:3001/api/generate");
        assert_eq!(config.assets_dir, PathBuf::from("assets"));
        assert_eq!((config.canvas_width, config.canvas_height), (1024, 768));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(|key| match key {
            API_URL_VAR => Some("https://doodle.example/api/generate".into()),
            ASSETS_VAR => Some("  ".into()),
            _ => None,
        });
        assert_eq!(config.api_url, "https://doodle.example/api/generate");
        assert_eq!(config.assets_dir, PathBuf::from("assets"));
    }
}
