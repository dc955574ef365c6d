//! Configuration for the par-text demo.
//!
//! This crate provides YAML loading, saving and validation for:
//!
//! - The main font (file path or system family, pixel size)
//! - The window (size, title, clear color)
//! - The labels drawn every frame, with their alignment anchors
//! - Debug log verbosity

pub mod config;
pub mod defaults;
pub mod error;
mod types;

// Re-export main types for convenience
pub use config::{Config, MAX_PIXEL_SIZE};
pub use error::ConfigError;
pub use types::{FontConfig, HorizontalAnchor, LabelConfig, LogLevel, VerticalAnchor, WindowConfig};
