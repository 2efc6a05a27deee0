//! Settings file and application paths.
//!
//! Path priority for the settings file:
//! 1. CLI `--config-dir` argument
//! 2. `SPRITED_CONFIG_DIR` environment variable
//! 3. Local folder IF a settings or log file already exists there
//! 4. Platform-specific directory from dirs-next (default)
//!
//! Platform paths:
//! - Linux: ~/.config/sprited/{name}
//! - macOS: ~/Library/Application Support/sprited/{name}
//! - Windows: %APPDATA%\sprited\{name}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::entities::frame::{BLACK, Color};
use crate::entities::tool::ToolKind;

/// Settings file name
pub const SETTINGS_FILE: &str = "sprited.json";

/// Log file name
pub const LOG_FILE: &str = "sprited.log";

/// Editor settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EditorSettings {
    // Canvas
    pub canvas_width: u32,
    pub canvas_height: u32,

    // Playback
    pub fps: i32,

    // History
    pub history_limit: usize, // Snapshots kept per stack, 0 = unbounded

    // Tools
    pub brush_size: u32,
    pub pen_color: [u8; 4],
    pub start_tool: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            canvas_width: 100,
            canvas_height: 100,
            fps: 12,
            history_limit: 0,
            brush_size: 0,
            pen_color: BLACK.0,
            start_tool: ToolKind::Pen.as_str().to_string(),
        }
    }
}

impl EditorSettings {
    pub fn pen_color(&self) -> Color {
        image::Rgba(self.pen_color)
    }

    /// Start tool, falling back to Pen on unknown names
    pub fn start_tool(&self) -> ToolKind {
        ToolKind::from_str(&self.start_tool).unwrap_or_else(|| {
            warn!("Unknown start tool '{}', using pen", self.start_tool);
            ToolKind::Pen
        })
    }

    /// Load settings from JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        let settings = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse settings: {}", path.display()))?;
        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, or defaults if the file is missing or broken
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            warn!("{:#}, using defaults", e);
            Self::default()
        })
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write settings: {}", path.display()))?;
        Ok(())
    }
}

/// Configuration for overriding default application paths
#[derive(Debug, Clone, Default)]
pub struct PathConfig {
    /// Custom config directory (from CLI or ENV)
    pub config_dir: Option<PathBuf>,
}

impl PathConfig {
    /// Create PathConfig from CLI arguments and environment variables
    ///
    /// Priority: CLI args → ENV var (SPRITED_CONFIG_DIR) → None (use defaults)
    pub fn from_env_and_cli(cli_dir: Option<PathBuf>) -> Self {
        let config_dir = cli_dir.or_else(|| std::env::var("SPRITED_CONFIG_DIR").ok().map(PathBuf::from));

        Self { config_dir }
    }
}

/// Get path to a configuration file
pub fn config_file(name: &str, config: &PathConfig) -> PathBuf {
    get_config_dir(config).join(name)
}

/// Get path to a data file (logs)
pub fn data_file(name: &str, config: &PathConfig) -> PathBuf {
    get_data_dir(config).join(name)
}

/// Ensure that configuration and data directories exist
pub fn ensure_dirs(config: &PathConfig) -> Result<()> {
    let config_dir = get_config_dir(config);
    let data_dir = get_data_dir(config);

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create config directory: {}", config_dir.display()))?;
    }

    // Only create data_dir if it's different from config_dir
    if data_dir != config_dir && !data_dir.exists() {
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    }

    Ok(())
}

fn has_local_config_files(dir: &Path) -> bool {
    [SETTINGS_FILE, LOG_FILE].iter().any(|f| dir.join(f).exists())
}

fn get_config_dir(config: &PathConfig) -> PathBuf {
    resolve_dir(config, dirs_next::config_dir())
}

fn get_data_dir(config: &PathConfig) -> PathBuf {
    resolve_dir(config, dirs_next::data_dir())
}

fn resolve_dir(config: &PathConfig, platform_dir: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = &config.config_dir {
        return dir.clone();
    }

    if let Ok(current_dir) = std::env::current_dir() {
        if has_local_config_files(&current_dir) {
            return current_dir;
        }
    }

    if let Some(dir) = platform_dir {
        return dir.join("sprited");
    }

    PathBuf::from(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_with_custom_dir() {
        let config = PathConfig {
            config_dir: Some(PathBuf::from("/custom")),
        };

        assert_eq!(config_file("test.json", &config), PathBuf::from("/custom/test.json"));
        assert_eq!(data_file("sprited.log", &config), PathBuf::from("/custom/sprited.log"));
    }

    #[test]
    fn test_cli_dir_wins() {
        let config = PathConfig::from_env_and_cli(Some(PathBuf::from("/from/cli")));
        assert_eq!(config.config_dir, Some(PathBuf::from("/from/cli")));
    }

    /// Test: Settings round trip through JSON
    #[test]
    fn test_settings_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);

        let settings = EditorSettings {
            canvas_width: 32,
            fps: 8,
            pen_color: [10, 20, 30, 255],
            start_tool: "bucket".into(),
            ..Default::default()
        };
        settings.save(&path).unwrap();

        let loaded = EditorSettings::load(&path).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.start_tool(), ToolKind::Bucket);
        assert_eq!(loaded.pen_color(), image::Rgba([10, 20, 30, 255]));
    }

    /// Test: Missing keys take defaults, broken file falls back
    #[test]
    fn test_settings_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);

        fs::write(&path, r#"{ "fps": 24 }"#).unwrap();
        let loaded = EditorSettings::load(&path).unwrap();
        assert_eq!(loaded.fps, 24);
        assert_eq!(loaded.canvas_width, 100);

        fs::write(&path, "not json").unwrap();
        assert_eq!(EditorSettings::load_or_default(&path), EditorSettings::default());
        assert_eq!(
            EditorSettings::load_or_default(&dir.path().join("missing.json")),
            EditorSettings::default()
        );
    }
}
