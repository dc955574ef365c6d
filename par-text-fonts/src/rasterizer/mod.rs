//! Outline font rasterization.
//!
//! The page cache only talks to the [`GlyphRasterizer`] trait. [`SwashFace`]
//! is the production implementation; tests drive the cache with an
//! in-memory rasterizer instead.
//!
//! All advance and kerning values crossing this boundary are 26.6 fixed
//! point (see [`SUBPIXELS_PER_PIXEL`]). Bitmap placement and face metrics are
//! whole pixels in font space (y grows upward).

mod font_data;
mod swash_face;

pub use font_data::FontData;
pub use swash_face::{FontLibrary, FontSource, SwashFace};

use crate::error::{FontError, GlyphError};
use crate::types::{Bbox, Vec2};

/// Fixed-point scale of advances and kerning (26.6 format).
pub const SUBPIXELS_PER_PIXEL: i32 = 64;

/// Face-wide metrics at the current pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaceMetrics {
    /// Union of every glyph's extent, in pixels, font space
    pub max_glyph_bbox: Bbox<i32>,
    /// Baseline-to-baseline distance in pixels
    pub line_height: i32,
    /// Whether kerning lookups can return non-zero values
    pub has_kerning: bool,
}

/// One rendered glyph: 8-bit coverage plus placement and advance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RasterizedGlyph {
    /// Bitmap width in pixels
    pub width: u32,
    /// Bitmap height in pixels
    pub height: u32,
    /// Horizontal offset from the pen to the bitmap's left edge
    pub left: i32,
    /// Vertical offset from the baseline up to the bitmap's top edge
    pub top: i32,
    /// Row-major coverage, `width * height` bytes
    pub pixels: Vec<u8>,
    /// Pen delta in 26.6 fixed point
    pub advance: Vec2<i32>,
    /// Glyph index used for kerning lookups
    pub glyph_index: u32,
}

impl RasterizedGlyph {
    /// A glyph that occupies no pixels but still advances the pen.
    pub fn empty(advance: Vec2<i32>, glyph_index: u32) -> Self {
        Self {
            advance,
            glyph_index,
            ..Self::default()
        }
    }
}

/// A loaded font face that can render individual code points.
pub trait GlyphRasterizer {
    /// Select the pixel size used by every later call and return the face
    /// metrics at that size.
    fn set_pixel_size(&mut self, pixel_size: u32) -> Result<FaceMetrics, FontError>;

    /// Metrics at the most recently set pixel size.
    fn face_metrics(&self) -> FaceMetrics;

    /// Render one code point.
    ///
    /// [`GlyphError::NotMapped`] means the face has no glyph; the caller
    /// records empty metrics for it.
    fn rasterize(&mut self, code_point: u32) -> Result<RasterizedGlyph, GlyphError>;

    /// Kerning adjustment between two glyph indices, 26.6 fixed point.
    fn kerning(&self, left: u32, right: u32) -> Result<Vec2<i32>, GlyphError>;
}

/// Convert font units to 26.6 fixed point at `pixel_size`, truncating.
pub(crate) fn units_to_subpixels(units: i32, pixel_size: u32, units_per_em: u16) -> i32 {
    if units_per_em == 0 {
        return 0;
    }
    let scaled = i64::from(units) * i64::from(pixel_size) * i64::from(SUBPIXELS_PER_PIXEL)
        / i64::from(units_per_em);
    scaled as i32
}

/// Round 26.6 fixed point to the nearest whole pixel, still in 26.6.
pub(crate) fn grid_fit(subpixels: i32) -> i32 {
    (subpixels + SUBPIXELS_PER_PIXEL / 2).div_euclid(SUBPIXELS_PER_PIXEL) * SUBPIXELS_PER_PIXEL
}
