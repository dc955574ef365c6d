//! swash-backed glyph rasterizer.
//!
//! Bitmaps come from swash's hinted outline scaler. Face-wide metrics and
//! kerning come from ttf-parser (via rustybuzz), scaled into the 26.6
//! fixed-point convention used throughout the crate.

use std::cell::{RefCell, RefMut};
use std::path::PathBuf;
use std::rc::Rc;

use rustybuzz::ttf_parser::GlyphId;
use swash::scale::{Render, ScaleContext, Source};
use swash::zeno::Format;

use super::{
    FaceMetrics, FontData, GlyphRasterizer, RasterizedGlyph, SUBPIXELS_PER_PIXEL, grid_fit,
    units_to_subpixels,
};
use crate::error::{FontError, GlyphError};
use crate::types::{Bbox, Vec2};

/// Where to load a font face from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// Font file on disk
    Path(PathBuf),
    /// Font file contents already in memory
    Memory(Vec<u8>),
    /// Installed font family, resolved through the system font database.
    /// `serif`, `sans-serif` and `monospace` select the generic families.
    System(String),
}

struct LibraryInner {
    scale_context: RefCell<ScaleContext>,
    system_fonts: RefCell<Option<fontdb::Database>>,
}

/// Rasterizer state shared by every face opened through it.
///
/// Cloning is cheap and yields another handle to the same scaler cache and
/// system font database. The shared state is released when the last handle
/// (including the ones held by open faces) is dropped.
#[derive(Clone)]
pub struct FontLibrary {
    inner: Rc<LibraryInner>,
}

impl std::fmt::Debug for FontLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontLibrary")
            .field("handles", &self.handle_count())
            .finish()
    }
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl FontLibrary {
    pub fn new() -> Self {
        log::debug!("Creating font library");
        Self {
            inner: Rc::new(LibraryInner {
                scale_context: RefCell::new(ScaleContext::new()),
                system_fonts: RefCell::new(None),
            }),
        }
    }

    /// Number of live handles to this library.
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    fn scale_context(&self) -> RefMut<'_, ScaleContext> {
        self.inner.scale_context.borrow_mut()
    }

    /// Open a face. The pixel size is not set yet; call
    /// [`GlyphRasterizer::set_pixel_size`] before rasterizing.
    pub fn open_face(&self, source: &FontSource) -> Result<SwashFace, FontError> {
        let data = match source {
            FontSource::Path(path) => {
                log::info!("Loading font from {}", path.display());
                FontData::from_path(path)?
            }
            FontSource::Memory(bytes) => {
                log::info!("Loading font from {} bytes of memory", bytes.len());
                FontData::new(bytes.clone())?
            }
            FontSource::System(family) => {
                log::info!("Loading system font family '{}'", family);
                self.load_system_family(family)?
            }
        };
        SwashFace::new(self.clone(), data)
    }

    fn load_system_family(&self, family: &str) -> Result<FontData, FontError> {
        let mut fonts = self.inner.system_fonts.borrow_mut();
        let db = fonts.get_or_insert_with(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            log::debug!("Loaded {} system font faces", db.len());
            db
        });

        let lowered = family.to_ascii_lowercase();
        let wanted = match lowered.as_str() {
            "serif" => fontdb::Family::Serif,
            "sans-serif" | "sans" => fontdb::Family::SansSerif,
            "monospace" | "mono" => fontdb::Family::Monospace,
            _ => fontdb::Family::Name(family),
        };
        let query = fontdb::Query {
            families: &[wanted],
            ..fontdb::Query::default()
        };

        let id = db
            .query(&query)
            .ok_or_else(|| FontError::FontNotFound(family.to_string()))?;
        let (bytes, index) = db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or_else(|| FontError::FontNotFound(family.to_string()))?;

        FontData::new_with_index(bytes, index)
    }
}

/// A font face rendered through swash.
pub struct SwashFace {
    library: FontLibrary,
    font: FontData,
    pixel_size: u32,
    metrics: FaceMetrics,
}

impl std::fmt::Debug for SwashFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwashFace")
            .field("font", &self.font)
            .field("pixel_size", &self.pixel_size)
            .field("metrics", &self.metrics)
            .finish()
    }
}

impl SwashFace {
    /// Wrap parsed font data. Faces that cannot map Unicode are rejected.
    pub fn new(library: FontLibrary, font: FontData) -> Result<Self, FontError> {
        if !font.has_unicode_charmap() {
            return Err(FontError::NoUnicodeCharmap);
        }
        Ok(Self {
            library,
            font,
            pixel_size: 0,
            metrics: FaceMetrics::default(),
        })
    }

    pub fn font_data(&self) -> &FontData {
        &self.font
    }

    pub fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    fn to_pixels(&self, units: i32) -> i32 {
        units_to_subpixels(units, self.pixel_size, self.font.face().units_per_em())
            / SUBPIXELS_PER_PIXEL
    }

    fn glyph_id(&self, code_point: u32) -> Result<GlyphId, GlyphError> {
        let ch = char::from_u32(code_point).ok_or(GlyphError::InvalidCodePoint(code_point))?;
        self.font
            .face()
            .glyph_index(ch)
            .filter(|id| id.0 != 0)
            .ok_or(GlyphError::NotMapped(code_point))
    }
}

impl GlyphRasterizer for SwashFace {
    fn set_pixel_size(&mut self, pixel_size: u32) -> Result<FaceMetrics, FontError> {
        if pixel_size == 0 || pixel_size > u32::from(u16::MAX) {
            return Err(FontError::UnsupportedPixelSize(pixel_size));
        }
        if self.font.face().units_per_em() == 0 {
            return Err(FontError::UnsupportedPixelSize(pixel_size));
        }
        self.pixel_size = pixel_size;

        let face = self.font.face();
        let bbox = face.global_bounding_box();
        let max_glyph_bbox = Bbox::new(
            Vec2::new(self.to_pixels(bbox.x_min.into()), self.to_pixels(bbox.y_max.into())),
            Vec2::new(self.to_pixels(bbox.x_max.into()), self.to_pixels(bbox.y_min.into())),
        );
        let line_units = i32::from(face.height()) + i32::from(face.line_gap());

        self.metrics = FaceMetrics {
            max_glyph_bbox,
            line_height: self.to_pixels(line_units),
            has_kerning: face.tables().kern.is_some(),
        };
        log::info!(
            "Font size set to {}px: line height {}, glyph box {:?}, kerning {}",
            pixel_size,
            self.metrics.line_height,
            self.metrics.max_glyph_bbox,
            self.metrics.has_kerning
        );
        Ok(self.metrics)
    }

    fn face_metrics(&self) -> FaceMetrics {
        self.metrics
    }

    fn rasterize(&mut self, code_point: u32) -> Result<RasterizedGlyph, GlyphError> {
        let glyph_id = self.glyph_id(code_point)?;
        let glyph_index = u32::from(glyph_id.0);
        let size = self.pixel_size as f32;
        let font_ref = self.font.font_ref();

        // hinted advances land on whole pixels
        let advance_px = font_ref
            .glyph_metrics(&[])
            .scale(size)
            .advance_width(glyph_id.0);
        let advance = Vec2::new(advance_px.round() as i32 * SUBPIXELS_PER_PIXEL, 0);

        let mut context = self.library.scale_context();
        let mut scaler = context.builder(font_ref).size(size).hint(true).build();
        let image = Render::new(&[Source::Outline])
            .format(Format::Alpha)
            .render(&mut scaler, glyph_id.0);

        let Some(image) = image else {
            // blank glyphs such as space have no outline to render
            if self.font.face().glyph_bounding_box(glyph_id).is_some() {
                log::warn!(
                    "{}",
                    GlyphError::Render {
                        code_point,
                        glyph_index
                    }
                );
            }
            return Ok(RasterizedGlyph::empty(advance, glyph_index));
        };

        let placement = image.placement;
        let expected = placement.width as usize * placement.height as usize;
        if image.data.len() < expected {
            log::warn!(
                "Short bitmap for U+{:04X}: {} bytes for {}x{}",
                code_point,
                image.data.len(),
                placement.width,
                placement.height
            );
            return Ok(RasterizedGlyph::empty(advance, glyph_index));
        }

        Ok(RasterizedGlyph {
            width: placement.width,
            height: placement.height,
            left: placement.left,
            top: placement.top,
            pixels: image.data,
            advance,
            glyph_index,
        })
    }

    fn kerning(&self, left: u32, right: u32) -> Result<Vec2<i32>, GlyphError> {
        let error = GlyphError::Kerning { left, right };
        let left_id = u16::try_from(left).map_err(|_| error.clone())?;
        let right_id = u16::try_from(right).map_err(|_| error.clone())?;

        let face = self.font.face();
        let Some(kern) = face.tables().kern else {
            return Ok(Vec2::default());
        };

        let units = kern
            .subtables
            .into_iter()
            .filter(|s| s.horizontal && !s.variable && !s.has_cross_stream)
            .find_map(|s| s.glyphs_kerning(GlyphId(left_id), GlyphId(right_id)))
            .unwrap_or(0);

        let x = units_to_subpixels(i32::from(units), self.pixel_size, face.units_per_em());
        Ok(Vec2::new(grid_fit(x), 0))
    }
}
