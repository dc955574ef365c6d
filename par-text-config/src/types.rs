//! Config section types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Log level for the debug log.
///
/// The `RUST_LOG` environment variable and the `--log-level` CLI flag take
/// precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No logging
    Off,
    /// Errors only
    Error,
    /// Warnings and errors
    #[default]
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Most verbose
    Trace,
}

impl LogLevel {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Which x coordinate of a label's box sits on its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAnchor {
    /// Pen origin of the first glyph
    #[default]
    Baseline,
    Left,
    Right,
    Center,
}

/// Which y coordinate of a label's box sits on its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAnchor {
    /// Baseline of the first line
    #[default]
    Baseline,
    Top,
    Bottom,
    Center,
}

/// Font selection. `path` wins over `family` when both are set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontConfig {
    /// Font file to load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Installed family name, or `serif` / `sans-serif` / `monospace`
    #[serde(default = "crate::defaults::font_family")]
    pub family: String,

    /// Pixel size of the main font
    #[serde(default = "crate::defaults::pixel_size")]
    pub pixel_size: u32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: None,
            family: crate::defaults::font_family(),
            pixel_size: crate::defaults::pixel_size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "crate::defaults::window_width")]
    pub width: u32,

    #[serde(default = "crate::defaults::window_height")]
    pub height: u32,

    #[serde(default = "crate::defaults::window_title")]
    pub title: String,

    /// Clear color, RGBA 0.0-1.0
    #[serde(default = "crate::defaults::background")]
    pub background: [f32; 4],
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: crate::defaults::window_width(),
            height: crate::defaults::window_height(),
            title: crate::defaults::window_title(),
            background: crate::defaults::background(),
        }
    }
}

/// One piece of text drawn every frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelConfig {
    pub text: String,

    /// Window pixels, origin top-left
    #[serde(default)]
    pub position: [f32; 2],

    /// RGBA 0.0-1.0
    #[serde(default = "crate::defaults::text_color")]
    pub color: [f32; 4],

    #[serde(default)]
    pub horizontal: HorizontalAnchor,

    #[serde(default)]
    pub vertical: VerticalAnchor,

    /// Clockwise on screen, about the anchor point
    #[serde(default)]
    pub rotation_degrees: f32,

    /// Build the geometry once instead of every frame
    #[serde(default = "crate::defaults::bool_true")]
    pub static_text: bool,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            position: [0.0, 0.0],
            color: crate::defaults::text_color(),
            horizontal: HorizontalAnchor::default(),
            vertical: VerticalAnchor::default(),
            rotation_degrees: 0.0,
            static_text: true,
        }
    }
}
