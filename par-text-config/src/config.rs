//! The `Config` struct and its YAML persistence.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{FontConfig, LabelConfig, LogLevel, WindowConfig};

/// Largest pixel size accepted for any font
pub const MAX_PIXEL_SIZE: u32 = 512;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub font: FontConfig,

    #[serde(default)]
    pub window: WindowConfig,

    #[serde(default = "crate::defaults::labels")]
    pub labels: Vec<LabelConfig>,

    /// Draw a frames-per-second counter in the top-left corner
    #[serde(default = "crate::defaults::bool_true")]
    pub show_fps: bool,

    #[serde(default = "crate::defaults::fps_pixel_size")]
    pub fps_pixel_size: u32,

    /// One column of right-aligned digits per size, all sharing the
    /// main font's file
    #[serde(default = "crate::defaults::digit_sizes")]
    pub digit_sizes: Vec<u32>,

    /// Debug log verbosity
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            font: FontConfig::default(),
            window: WindowConfig::default(),
            labels: crate::defaults::labels(),
            show_fps: true,
            fps_pixel_size: crate::defaults::fps_pixel_size(),
            digit_sizes: crate::defaults::digit_sizes(),
            log_level: LogLevel::default(),
        }
    }
}

fn check_pixel_size(field: &str, size: u32) -> Result<(), ConfigError> {
    if size == 0 || size > MAX_PIXEL_SIZE {
        return Err(ConfigError::Validation(format!(
            "{field} must be between 1 and {MAX_PIXEL_SIZE}, got {size}"
        )));
    }
    Ok(())
}

fn check_color(field: &str, color: &[f32; 4]) -> Result<(), ConfigError> {
    if color.iter().any(|c| !(0.0..=1.0).contains(c)) {
        return Err(ConfigError::Validation(format!(
            "{field} components must be within 0.0-1.0, got {color:?}"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from the default path, creating it with default
    /// values if it does not exist.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        log::info!("Config path: {:?}", config_path);

        if config_path.exists() {
            log::info!("Loading existing config from {:?}", config_path);
            Ok(Self::load_from(&config_path)?)
        } else {
            log::info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            if let Err(e) = config.save_to(&config_path) {
                log::error!("Failed to save default config: {}", e);
                return Err(e.into());
            }
            Ok(config)
        }
    }

    /// Load and validate a config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_yaml_ng::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as YAML, replacing `path` atomically.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml_ng::to_string(self)?;

        // write to a temp file then rename so a crash never leaves a torn file
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml)?;
        fs::rename(&temp_path, path)?;

        log::info!("Config saved to {:?}", path);
        Ok(())
    }

    /// Check every field that has a restricted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_pixel_size("font.pixel_size", self.font.pixel_size)?;
        check_pixel_size("fps_pixel_size", self.fps_pixel_size)?;
        for (i, size) in self.digit_sizes.iter().enumerate() {
            check_pixel_size(&format!("digit_sizes[{i}]"), *size)?;
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Validation(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        check_color("window.background", &self.window.background)?;

        for (i, label) in self.labels.iter().enumerate() {
            check_color(&format!("labels[{i}].color"), &label.color)?;
            if !label.rotation_degrees.is_finite() {
                return Err(ConfigError::Validation(format!(
                    "labels[{i}].rotation_degrees must be finite"
                )));
            }
        }

        if let Some(path) = &self.font.path
            && path.as_os_str().is_empty()
        {
            return Err(ConfigError::Validation(
                "font.path must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Load from a font file, ignoring the family.
    pub fn with_font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font.path = Some(path.into());
        self
    }

    /// Load an installed family. Clears any font path.
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font.family = family.into();
        self.font.path = None;
        self
    }

    pub fn with_pixel_size(mut self, pixel_size: u32) -> Self {
        self.font.pixel_size = pixel_size;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.window.title = title.into();
        self
    }

    /// Get the configuration file path (using XDG convention)
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Get the configuration directory path
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("par-text")
            } else {
                PathBuf::from(".")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            // ~/.config/par-text on every unix, macOS included
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join("par-text")
            } else {
                PathBuf::from(".")
            }
        }
    }
}
