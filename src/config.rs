//! Configuration file parser for `~/.config/econ-atlas/config.toml`.
//!
//! The file is optional; a missing or empty file yields `Config::default()`.
//! Unknown keys are accepted but logged, since they are usually typos.
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::router::Page;
use crate::theme::ThemeVariant;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration
// ============================================================================

const KNOWN_KEYS: [&str; 8] = [
    "theme",
    "animations",
    "frame_interval_ms",
    "particle_count",
    "swipe_threshold",
    "start_page",
    "catalog_path",
    "keybindings",
];

/// Frame interval bounds, in milliseconds.
const MIN_FRAME_MS: u64 = 16;
const MAX_FRAME_MS: u64 = 1000;
/// Upper bound on live particles.
const MAX_PARTICLES: usize = 200;

/// Top-level configuration. Any subset of keys may be given.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Theme used until the user toggles one (`light` or `dark`).
    pub theme: String,

    /// Run the decorative animations.
    pub animations: bool,

    /// Delay between animation frames.
    pub frame_interval_ms: u64,

    /// Maximum live particles on the home page.
    pub particle_count: usize,

    /// Horizontal drag distance, in columns, that counts as a swipe.
    pub swipe_threshold: u16,

    /// Page shown at startup.
    pub start_page: String,

    /// Catalog JSON to load instead of the embedded one.
    pub catalog_path: Option<PathBuf>,

    /// Keybinding overrides: action name to key string.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: ThemeVariant::default().key().to_string(),
            animations: true,
            frame_interval_ms: 50,
            particle_count: 40,
            swipe_threshold: crate::gesture::DEFAULT_SWIPE_THRESHOLD,
            start_page: Page::Home.id().to_string(),
            catalog_path: None,
            keybindings: HashMap::new(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing, empty, or whitespace-only file: defaults
    /// - Invalid TOML or wrong value types: `ConfigError::Parse`
    /// - Unknown keys: accepted, logged as warnings
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys().filter(|k| !KNOWN_KEYS.contains(&k.as_str())) {
                tracing::warn!(key = %key, "Unknown key in config file, ignoring");
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            theme = %config.theme,
            animations = config.animations,
            "Loaded configuration"
        );
        Ok(config.sanitized())
    }

    /// Clamp numeric settings into their working ranges.
    fn sanitized(mut self) -> Self {
        let frame = self.frame_interval_ms.clamp(MIN_FRAME_MS, MAX_FRAME_MS);
        if frame != self.frame_interval_ms {
            tracing::warn!(
                requested = self.frame_interval_ms,
                using = frame,
                "frame_interval_ms out of range"
            );
            self.frame_interval_ms = frame;
        }
        if self.particle_count > MAX_PARTICLES {
            tracing::warn!(requested = self.particle_count, "particle_count capped at {}", MAX_PARTICLES);
            self.particle_count = MAX_PARTICLES;
        }
        self.swipe_threshold = self.swipe_threshold.max(1);
        self
    }

    /// Configured default theme, falling back to light for unknown names.
    pub fn theme_variant(&self) -> ThemeVariant {
        ThemeVariant::from_str_name(&self.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %self.theme, "Unknown theme in config, using light");
            ThemeVariant::default()
        })
    }

    /// Configured start page, falling back to home for unknown ids.
    pub fn start_page(&self) -> Page {
        Page::from_id(&self.start_page).unwrap_or_else(|| {
            tracing::warn!(page = %self.start_page, "Unknown start_page in config, using home");
            Page::Home
        })
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(name: &str, content: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(format!("econ_atlas_config_{}", name));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.theme, "light");
        assert!(config.animations);
        assert_eq!(config.frame_interval_ms, 50);
        assert_eq!(config.swipe_threshold, 8);
        assert_eq!(config.start_page(), Page::Home);
        assert!(config.catalog_path.is_none());
        assert!(config.keybindings.is_empty());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let config = Config::load(Path::new("/tmp/econ_atlas_no_such_config.toml")).unwrap();
        assert_eq!(config.theme, "light");
    }

    #[test]
    fn test_whitespace_file_returns_default() {
        let (dir, path) = write_config("whitespace", "  \n\n  ");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.particle_count, 40);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let (dir, path) = write_config(
            "full",
            r#"
theme = "dark"
animations = false
frame_interval_ms = 100
particle_count = 12
swipe_threshold = 5
start_page = "research"
catalog_path = "/srv/catalog.json"

[keybindings]
toggle_theme = "F2"
"#,
        );
        let config = Config::load(&path).unwrap();
        assert_eq!(config.theme_variant(), ThemeVariant::Dark);
        assert!(!config.animations);
        assert_eq!(config.frame_interval(), Duration::from_millis(100));
        assert_eq!(config.particle_count, 12);
        assert_eq!(config.swipe_threshold, 5);
        assert_eq!(config.start_page(), Page::Research);
        assert_eq!(config.catalog_path, Some(PathBuf::from("/srv/catalog.json")));
        assert_eq!(
            config.keybindings.get("toggle_theme").map(String::as_str),
            Some("F2")
        );
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_out_of_range_values_clamped() {
        let (dir, path) = write_config(
            "clamp",
            "frame_interval_ms = 1\nparticle_count = 5000\nswipe_threshold = 0\n",
        );
        let config = Config::load(&path).unwrap();
        assert_eq!(config.frame_interval_ms, MIN_FRAME_MS);
        assert_eq!(config.particle_count, MAX_PARTICLES);
        assert_eq!(config.swipe_threshold, 1);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_names_fall_back() {
        let config = Config {
            theme: "sepia".to_string(),
            start_page: "contact".to_string(),
            ..Config::default()
        };
        assert_eq!(config.theme_variant(), ThemeVariant::Light);
        assert_eq!(config.start_page(), Page::Home);
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let (dir, path) = write_config("unknown", "theme = \"dark\"\nsparkles = true\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.theme, "dark");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_parse_error() {
        let (dir, path) = write_config("invalid", "theme = [unterminated");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_wrong_type_returns_error() {
        let (dir, path) = write_config("wrongtype", "animations = \"yes\"\n");
        assert!(Config::load(&path).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_too_large_file_rejected() {
        let (dir, path) = write_config("too_large", &"#".repeat(1_048_577));
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        std::fs::remove_dir_all(&dir).ok();
    }
}
