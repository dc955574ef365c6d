//! Default values for config fields.

use crate::types::{HorizontalAnchor, LabelConfig, VerticalAnchor};

pub fn bool_true() -> bool {
    true
}

pub fn font_family() -> String {
    "sans-serif".to_string()
}

pub fn pixel_size() -> u32 {
    32
}

pub fn window_width() -> u32 {
    1024
}

pub fn window_height() -> u32 {
    768
}

pub fn window_title() -> String {
    "par-text".to_string()
}

pub fn background() -> [f32; 4] {
    [0.08, 0.08, 0.1, 1.0] // Near-black with a blue tint
}

pub fn text_color() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

pub fn fps_pixel_size() -> u32 {
    16
}

/// Pixel sizes of the right-aligned digit columns
pub fn digit_sizes() -> Vec<u32> {
    vec![12, 18, 24]
}

pub fn labels() -> Vec<LabelConfig> {
    vec![
        LabelConfig {
            text: "Hello, world!".to_string(),
            position: [512.0, 300.0],
            horizontal: HorizontalAnchor::Center,
            vertical: VerticalAnchor::Center,
            ..LabelConfig::default()
        },
        LabelConfig {
            text: "Καλημέρα κόσμε\nAV WA To".to_string(),
            position: [512.0, 420.0],
            color: [0.55, 0.8, 1.0, 1.0],
            horizontal: HorizontalAnchor::Center,
            vertical: VerticalAnchor::Top,
            static_text: false,
            ..LabelConfig::default()
        },
        LabelConfig {
            text: "rotated".to_string(),
            position: [160.0, 560.0],
            color: [1.0, 0.75, 0.3, 1.0],
            rotation_degrees: -30.0,
            ..LabelConfig::default()
        },
    ]
}
