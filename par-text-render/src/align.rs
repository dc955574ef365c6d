//! Text block alignment.
//!
//! An alignment picks the point of the text's bounding box that is placed
//! at the requested screen position. Baseline alignment uses the pen origin
//! of the first glyph.

use par_text_config::{HorizontalAnchor, VerticalAnchor};
use par_text_fonts::{Bbox, Vec2};

/// Horizontal reference point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum HorizontalAlign {
    #[default]
    Baseline,
    Left,
    Right,
    Center,
}

/// Vertical reference point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum VerticalAlign {
    #[default]
    Baseline,
    Top,
    Bottom,
    Center,
}

/// Combined horizontal and vertical alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Align {
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
}

impl Align {
    /// Bits 0-1 of the packed flags
    pub const HORIZONTAL_MASK: u32 = 0x3;
    /// Bits 2-3 of the packed flags
    pub const VERTICAL_MASK: u32 = 0xC;

    pub const fn new(horizontal: HorizontalAlign, vertical: VerticalAlign) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub const TOP_LEFT: Self = Self::new(HorizontalAlign::Left, VerticalAlign::Top);
    pub const CENTER: Self = Self::new(HorizontalAlign::Center, VerticalAlign::Center);

    /// Decode packed flags: `0x0..=0x3` select baseline, left, right or
    /// center horizontally; `0x0`, `0x4`, `0x8` and `0xC` do the same
    /// vertically with top and bottom. Other bits are ignored.
    pub fn from_flags(flags: u32) -> Self {
        let horizontal = match flags & Self::HORIZONTAL_MASK {
            0x1 => HorizontalAlign::Left,
            0x2 => HorizontalAlign::Right,
            0x3 => HorizontalAlign::Center,
            _ => HorizontalAlign::Baseline,
        };
        let vertical = match flags & Self::VERTICAL_MASK {
            0x4 => VerticalAlign::Top,
            0x8 => VerticalAlign::Bottom,
            0xC => VerticalAlign::Center,
            _ => VerticalAlign::Baseline,
        };
        Self::new(horizontal, vertical)
    }

    pub fn to_flags(self) -> u32 {
        let horizontal = match self.horizontal {
            HorizontalAlign::Baseline => 0x0,
            HorizontalAlign::Left => 0x1,
            HorizontalAlign::Right => 0x2,
            HorizontalAlign::Center => 0x3,
        };
        let vertical = match self.vertical {
            VerticalAlign::Baseline => 0x0,
            VerticalAlign::Top => 0x4,
            VerticalAlign::Bottom => 0x8,
            VerticalAlign::Center => 0xC,
        };
        horizontal | vertical
    }
}

impl From<HorizontalAnchor> for HorizontalAlign {
    fn from(anchor: HorizontalAnchor) -> Self {
        match anchor {
            HorizontalAnchor::Baseline => Self::Baseline,
            HorizontalAnchor::Left => Self::Left,
            HorizontalAnchor::Right => Self::Right,
            HorizontalAnchor::Center => Self::Center,
        }
    }
}

impl From<VerticalAnchor> for VerticalAlign {
    fn from(anchor: VerticalAnchor) -> Self {
        match anchor {
            VerticalAnchor::Baseline => Self::Baseline,
            VerticalAnchor::Top => Self::Top,
            VerticalAnchor::Bottom => Self::Bottom,
            VerticalAnchor::Center => Self::Center,
        }
    }
}

/// Point of `bbox` that lands on the requested position.
///
/// `bbox` is the screen-space text box (y down), where
/// `upper_left.y <= lower_right.y`.
pub fn start_offset(bbox: &Bbox<f32>, align: Align) -> Vec2<f32> {
    let x = match align.horizontal {
        HorizontalAlign::Baseline => 0.0,
        HorizontalAlign::Left => bbox.upper_left.x,
        HorizontalAlign::Right => bbox.lower_right.x,
        HorizontalAlign::Center => bbox.upper_left.x + bbox.width() / 2.0,
    };
    let y = match align.vertical {
        VerticalAlign::Baseline => 0.0,
        VerticalAlign::Top => bbox.upper_left.y,
        VerticalAlign::Bottom => bbox.lower_right.y,
        // height() is negative in screen space, so this is the midpoint
        VerticalAlign::Center => bbox.lower_right.y + bbox.height() / 2.0,
    };
    Vec2::new(x, y)
}
