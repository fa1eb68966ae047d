//! Configuration module
//!
//! Handles loading and saving perch configuration. Every tunable is read at
//! tick time; values are only type-checked.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::screen::{Offset, Size, TaskbarDetectorConfig, WorldPoint};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// Docking and snap zone settings
    #[serde(default)]
    pub docking: DockingConfig,

    /// Candidate window filtering
    #[serde(default)]
    pub filter: FilterConfig,

    /// Screen to engine mapping
    #[serde(default)]
    pub render: RenderConfig,

    /// Taskbar sitting detection
    #[serde(default)]
    pub taskbar: TaskbarConfig,

    /// Debug visualization
    #[serde(default)]
    pub debug: DebugConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Exact title of the avatar window to drive
    pub avatar_title: Option<String>,
    /// Polling interval (ms)
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Enable verbose logging
    #[serde(default)]
    pub verbose: bool,
}

fn default_tick_interval() -> u64 {
    16
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            avatar_title: None,
            tick_interval_ms: default_tick_interval(),
            verbose: false,
        }
    }
}

/// Docking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DockingConfig {
    /// Vertical trim added to the follow position while docked (pixels)
    #[serde(default)]
    pub vertical_offset: i32,
    /// Height of the title-bar strip hit-tested on candidates (pixels)
    #[serde(default = "default_title_bar_height")]
    pub title_bar_height: i32,
    /// Scale snap zone offset and size by the monitor DPI
    #[serde(default = "default_true")]
    pub scale_with_dpi: bool,
    /// Snap zone offset from the avatar's bottom-center (pixels)
    #[serde(default = "default_snap_zone_offset")]
    pub snap_zone_offset: Offset,
    /// Snap zone size (pixels)
    #[serde(default = "default_snap_zone_size")]
    pub snap_zone_size: Size,
}

fn default_snap_zone_offset() -> Offset {
    Offset::new(0, -5)
}

fn default_snap_zone_size() -> Size {
    Size::new(100, 10)
}

fn default_title_bar_height() -> i32 {
    5
}

fn default_true() -> bool {
    true
}

impl Default for DockingConfig {
    fn default() -> Self {
        Self {
            vertical_offset: 0,
            title_bar_height: default_title_bar_height(),
            scale_with_dpi: default_true(),
            snap_zone_offset: default_snap_zone_offset(),
            snap_zone_size: default_snap_zone_size(),
        }
    }
}

/// Candidate window filtering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Minimum candidate width (pixels)
    #[serde(default = "default_min_extent")]
    pub min_width: i32,
    /// Minimum candidate height (pixels)
    #[serde(default = "default_min_extent")]
    pub min_height: i32,
    /// Class names rejected on exact match
    #[serde(default = "default_denied_classes")]
    pub denied_classes: Vec<String>,
    /// Class names rejected on prefix match
    #[serde(default = "default_denied_prefixes")]
    pub denied_class_prefixes: Vec<String>,
    /// Class names rejected on substring match
    #[serde(default = "default_denied_substrings")]
    pub denied_class_substrings: Vec<String>,
}

fn default_min_extent() -> i32 {
    100
}

fn default_denied_classes() -> Vec<String> {
    [
        "Shell_TrayWnd",
        "Shell_SecondaryTrayWnd",
        "Progman",
        "WorkerW",
        "IME",
        "MSCTFIME UI",
        "Windows.UI.Core.CoreWindow",
        "ApplicationManager_ImmersiveShellWindow",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_denied_prefixes() -> Vec<String> {
    vec!["#".to_string()]
}

fn default_denied_substrings() -> Vec<String> {
    vec!["Desktop".to_string()]
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_width: default_min_extent(),
            min_height: default_min_extent(),
            denied_classes: default_denied_classes(),
            denied_class_prefixes: default_denied_prefixes(),
            denied_class_substrings: default_denied_substrings(),
        }
    }
}

/// Screen to engine mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Screen pixels per engine unit at 96 DPI and desktop scale 1.0
    #[serde(default = "default_pixels_per_unit")]
    pub pixels_per_unit: f32,
    /// Avatar scale on the desktop
    #[serde(default = "default_desktop_scale")]
    pub desktop_scale: f32,
}

fn default_pixels_per_unit() -> f32 {
    100.0
}

fn default_desktop_scale() -> f32 {
    1.0
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            pixels_per_unit: default_pixels_per_unit(),
            desktop_scale: default_desktop_scale(),
        }
    }
}

/// Taskbar sitting detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskbarConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Sitting radius in engine units
    #[serde(default = "default_detection_radius")]
    pub detection_radius: f32,
    /// Body point in engine units, used when the host supplies none
    #[serde(default = "default_body_point")]
    pub body_point: WorldPoint,
}

fn default_detection_radius() -> f32 {
    0.5
}

fn default_body_point() -> WorldPoint {
    WorldPoint::new(0.0, -2.5)
}

impl Default for TaskbarConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            detection_radius: default_detection_radius(),
            body_point: default_body_point(),
        }
    }
}

impl TaskbarConfig {
    pub fn detector_config(&self) -> TaskbarDetectorConfig {
        TaskbarDetectorConfig {
            enabled: self.enabled,
            detection_radius: self.detection_radius,
        }
    }
}

/// Debug visualization
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Include snap zone, target and taskbar geometry in tick reports
    #[serde(default)]
    pub visualize: bool,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the default location
    pub fn load_default() -> ConfigResult<Self> {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("perch/config.toml")),
            Some(PathBuf::from("./perch.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                return Self::load(path);
            }
        }

        // Return default config if no file found
        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Generate a sample configuration file
pub fn generate_sample_config() -> ConfigResult<String> {
    let config = Config {
        general: GeneralConfig {
            avatar_title: Some("My Desktop Buddy".to_string()),
            ..Default::default()
        },
        docking: DockingConfig {
            vertical_offset: 2,
            ..Default::default()
        },
        ..Default::default()
    };

    Ok(toml::to_string_pretty(&config)?)
}
