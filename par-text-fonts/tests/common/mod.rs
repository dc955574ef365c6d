//! Shared integration test helpers for par-text-fonts.
//!
//! [`MockRasterizer`] renders deterministic box glyphs without any font
//! file, so layout and cache behaviour can be checked exactly.
//!
//! ```ignore
//! mod common;
//! use common::{MockRasterizer, RasterCounter};
//! ```

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use par_text_fonts::{
    Bbox, FaceMetrics, FontError, GlyphError, GlyphRasterizer, RasterizedGlyph, Vec2,
};

/// Number of `rasterize` calls made, shared with the test after the
/// rasterizer has been boxed.
pub type RasterCounter = Rc<Cell<usize>>;

/// Box-glyph rasterizer.
///
/// At pixel size `px` every mapped glyph is a solid `px/2` by `3px/4`
/// block sitting on the baseline, advancing `px/2 + 2` whole pixels.
/// Space is mapped but blank. Mapped ranges: printable ASCII, Latin-1,
/// Greek and U+FFFD. Glyph index is `code_point + 1`.
pub struct MockRasterizer {
    pixel_size: u32,
    has_kerning: bool,
    kerning: HashMap<(u32, u32), i32>,
    failing_kerning: bool,
    failing_code_point: Option<u32>,
    calls: RasterCounter,
}

impl MockRasterizer {
    pub fn new() -> Self {
        let mut kerning = HashMap::new();
        // "AV" pulls together by 3px
        kerning.insert((glyph_index('A'), glyph_index('V')), -3 * 64);
        Self {
            pixel_size: 0,
            has_kerning: true,
            kerning,
            failing_kerning: false,
            failing_code_point: None,
            calls: Rc::new(Cell::new(0)),
        }
    }

    pub fn without_kerning(mut self) -> Self {
        self.has_kerning = false;
        self
    }

    /// Every kerning lookup fails.
    pub fn with_failing_kerning(mut self) -> Self {
        self.failing_kerning = true;
        self
    }

    /// Rendering this code point fails with a render error.
    pub fn with_failing_glyph(mut self, code_point: char) -> Self {
        self.failing_code_point = Some(u32::from(code_point));
        self
    }

    pub fn counter(&self) -> RasterCounter {
        Rc::clone(&self.calls)
    }

    pub fn boxed(self) -> Box<dyn GlyphRasterizer> {
        Box::new(self)
    }

    fn ascent(&self) -> i32 {
        self.pixel_size as i32 * 3 / 4
    }

    fn descent(&self) -> i32 {
        self.pixel_size as i32 / 4
    }

    fn glyph_width(&self) -> i32 {
        self.pixel_size as i32 / 2
    }

    pub fn advance_pixels(&self) -> i32 {
        self.glyph_width() + 2
    }
}

pub fn glyph_index(ch: char) -> u32 {
    u32::from(ch) + 1
}

pub fn is_mapped(code_point: u32) -> bool {
    matches!(code_point, 0x20..=0x7E | 0xA0..=0xFF | 0x391..=0x3C9 | 0xFFFD)
}

impl GlyphRasterizer for MockRasterizer {
    fn set_pixel_size(&mut self, pixel_size: u32) -> Result<FaceMetrics, FontError> {
        if pixel_size == 0 {
            return Err(FontError::UnsupportedPixelSize(pixel_size));
        }
        self.pixel_size = pixel_size;
        Ok(self.face_metrics())
    }

    fn face_metrics(&self) -> FaceMetrics {
        FaceMetrics {
            max_glyph_bbox: Bbox::new(
                Vec2::new(0, self.ascent()),
                Vec2::new(self.glyph_width(), -self.descent()),
            ),
            line_height: self.pixel_size as i32 + self.descent(),
            has_kerning: self.has_kerning,
        }
    }

    fn rasterize(&mut self, code_point: u32) -> Result<RasterizedGlyph, GlyphError> {
        self.calls.set(self.calls.get() + 1);

        if !is_mapped(code_point) {
            return Err(GlyphError::NotMapped(code_point));
        }
        let glyph_index = code_point + 1;
        if self.failing_code_point == Some(code_point) {
            return Err(GlyphError::Render {
                code_point,
                glyph_index,
            });
        }

        let advance = Vec2::new(self.advance_pixels() * 64, 0);
        if code_point == 0x20 {
            return Ok(RasterizedGlyph::empty(advance, glyph_index));
        }

        let width = self.glyph_width() as u32;
        let height = self.ascent() as u32;
        Ok(RasterizedGlyph {
            width,
            height,
            left: 0,
            top: self.ascent(),
            pixels: vec![0xFF; (width * height) as usize],
            advance,
            glyph_index,
        })
    }

    fn kerning(&self, left: u32, right: u32) -> Result<Vec2<i32>, GlyphError> {
        if self.failing_kerning {
            return Err(GlyphError::Kerning { left, right });
        }
        let x = self.kerning.get(&(left, right)).copied().unwrap_or(0);
        Ok(Vec2::new(x, 0))
    }
}
