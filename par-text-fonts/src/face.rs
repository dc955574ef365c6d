//! A font face at one pixel size, with its page cache.

use crate::error::FontError;
use crate::layout::{LayoutBuilder, TextLayout};
use crate::page_cache::{AtlasGeometry, Page, PageCache, PageUploader};
use crate::rasterizer::{FaceMetrics, GlyphRasterizer};
use crate::types::Vec2;
use crate::utf8::decode_utf8;

/// One rasterizer face, its current pixel size and every page built at
/// that size.
///
/// `T` is the texture handle type of the [`PageUploader`] pages are sent
/// to. The face itself never touches the GPU.
pub struct FontFace<T> {
    rasterizer: Box<dyn GlyphRasterizer>,
    pixel_size: u32,
    metrics: FaceMetrics,
    geometry: AtlasGeometry,
    pages: PageCache<T>,
    generation: u64,
}

impl<T> std::fmt::Debug for FontFace<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("pixel_size", &self.pixel_size)
            .field("metrics", &self.metrics)
            .field("geometry", &self.geometry)
            .field("pages", &self.pages.page_numbers())
            .field("generation", &self.generation)
            .finish()
    }
}

fn check_atlas(geometry: &AtlasGeometry, max: u32) -> Result<(), FontError> {
    if geometry.tex_width > max || geometry.tex_height > max {
        return Err(FontError::AtlasTooLarge {
            width: geometry.tex_width,
            height: geometry.tex_height,
            max,
        });
    }
    Ok(())
}

impl<T> FontFace<T> {
    /// Set the rasterizer to `pixel_size` and prepare an empty page cache.
    ///
    /// Fails if the rasterizer rejects the size or a page atlas would not
    /// fit the uploader's texture limit.
    pub fn new<U>(
        mut rasterizer: Box<dyn GlyphRasterizer>,
        pixel_size: u32,
        uploader: &U,
    ) -> Result<Self, FontError>
    where
        U: PageUploader<Texture = T> + ?Sized,
    {
        if pixel_size == 0 {
            return Err(FontError::UnsupportedPixelSize(pixel_size));
        }
        let metrics = rasterizer.set_pixel_size(pixel_size)?;
        let geometry = AtlasGeometry::from_metrics(&metrics);
        check_atlas(&geometry, uploader.max_texture_dimension())?;

        log::info!(
            "Font face ready at {}px ({}x{} page atlas)",
            pixel_size,
            geometry.tex_width,
            geometry.tex_height
        );

        Ok(Self {
            rasterizer,
            pixel_size,
            metrics,
            geometry,
            pages: PageCache::new(),
            generation: 0,
        })
    }

    /// Switch to a new pixel size, discarding every page.
    ///
    /// On failure the previous size and pages stay in place.
    pub fn resize<U>(&mut self, pixel_size: u32, uploader: &U) -> Result<(), FontError>
    where
        U: PageUploader<Texture = T> + ?Sized,
    {
        if pixel_size == 0 {
            return Err(FontError::UnsupportedPixelSize(pixel_size));
        }
        let metrics = self.rasterizer.set_pixel_size(pixel_size)?;
        let geometry = AtlasGeometry::from_metrics(&metrics);
        if let Err(e) = check_atlas(&geometry, uploader.max_texture_dimension()) {
            if let Err(restore) = self.rasterizer.set_pixel_size(self.pixel_size) {
                log::warn!(
                    "Failed to restore {}px after rejected resize: {}",
                    self.pixel_size,
                    restore
                );
            }
            return Err(e);
        }

        log::info!(
            "Resized font face {}px -> {}px, dropping {} pages",
            self.pixel_size,
            pixel_size,
            self.pages.len()
        );
        self.pixel_size = pixel_size;
        self.metrics = metrics;
        self.geometry = geometry;
        self.pages.clear();
        self.generation += 1;
        Ok(())
    }

    /// Lay out UTF-8 text, building any page it needs that is not cached.
    ///
    /// Malformed UTF-8 is laid out as U+FFFD. Glyphs the face lacks take no
    /// space. Identical text against an unchanged cache always produces
    /// identical output.
    pub fn build_text<U>(&mut self, text: impl AsRef<[u8]>, uploader: &mut U) -> TextLayout
    where
        U: PageUploader<Texture = T> + ?Sized,
    {
        let mut builder = LayoutBuilder::new();

        for code_point in decode_utf8(text.as_ref()) {
            if code_point == u32::from('\n') {
                builder.newline(self.metrics.line_height);
                continue;
            }

            let page = self.pages.get_or_build(
                code_point >> 8,
                &self.geometry,
                self.rasterizer.as_mut(),
                &mut *uploader,
            );
            let glyph = *page.glyph(code_point);

            let kerning = match builder.kerning_pair(&glyph) {
                Some((left, right)) if self.metrics.has_kerning => {
                    self.rasterizer.kerning(left, right).unwrap_or_else(|e| {
                        log::warn!("{} (U+{:04X})", e, code_point);
                        Vec2::default()
                    })
                }
                _ => Vec2::default(),
            };

            builder.place(code_point, &glyph, &self.geometry, kerning);
        }

        builder.finish()
    }

    /// Build the page holding `code_point` ahead of time.
    pub fn preload_page<U>(&mut self, code_point: u32, uploader: &mut U) -> &Page<T>
    where
        U: PageUploader<Texture = T> + ?Sized,
    {
        self.pages.get_or_build(
            code_point >> 8,
            &self.geometry,
            self.rasterizer.as_mut(),
            uploader,
        )
    }

    pub fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    pub fn line_height(&self) -> i32 {
        self.metrics.line_height
    }

    pub fn has_kerning(&self) -> bool {
        self.metrics.has_kerning
    }

    pub fn metrics(&self) -> &FaceMetrics {
        &self.metrics
    }

    pub fn geometry(&self) -> &AtlasGeometry {
        &self.geometry
    }

    /// Incremented by every successful resize.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn page(&self, page_no: u32) -> Option<&Page<T>> {
        self.pages.get(page_no)
    }

    pub fn pages(&self) -> &PageCache<T> {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
