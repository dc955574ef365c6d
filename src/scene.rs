//! What the demo draws, independent of the window and GPU.

use par_text_config::{Config, FontConfig, LabelConfig};
use par_text_render::{Align, FontSource, Vec2};

use crate::cli::RuntimeOptions;

/// Gap between the window edge and the FPS counter or digit columns
pub const MARGIN: f32 = 8.0;

/// Rows in each digit column
pub const DIGIT_ROWS: u32 = 10;

/// Pixel size step for the resize keys
pub const SIZE_STEP: u32 = 4;

/// Where the configured font comes from.
pub fn font_source(font: &FontConfig) -> FontSource {
    match &font.path {
        Some(path) => FontSource::Path(path.clone()),
        None => FontSource::System(font.family.clone()),
    }
}

/// Apply command-line overrides on top of the loaded config.
pub fn apply_overrides(mut config: Config, options: &RuntimeOptions) -> Config {
    if let Some(path) = &options.font_path {
        config = config.with_font_path(path.clone());
    }
    if let Some(family) = &options.font_family {
        config = config.with_font_family(family.clone());
    }
    if let Some(size) = options.pixel_size {
        config = config.with_pixel_size(size);
    }
    config
}

pub fn label_align(label: &LabelConfig) -> Align {
    Align::new(label.horizontal.into(), label.vertical.into())
}

pub fn label_position(label: &LabelConfig) -> Vec2<f32> {
    Vec2::new(label.position[0], label.position[1])
}

/// Lines of one digit column: successive powers of seven, so each row is
/// a little wider than the one above and right alignment is visible.
pub fn digit_lines() -> Vec<String> {
    (0..DIGIT_ROWS).map(|i| 7_u64.pow(i).to_string()).collect()
}

/// Next main font size for a resize key press, clamped to `1..=max`.
pub fn stepped_size(current: u32, grow: bool, max: u32) -> u32 {
    if grow {
        current.saturating_add(SIZE_STEP).min(max)
    } else {
        current.saturating_sub(SIZE_STEP).max(1)
    }
}
