//! Write-once glyph page atlases.
//!
//! A page covers 256 consecutive code points (`page_no = code_point >> 8`)
//! laid out as a 16×16 grid of equally sized cells. Every cell is large
//! enough for the face's largest glyph plus [`AtlasGeometry::CELL_PADDING`]
//! on each side, so the position of any code point's cell is a pure
//! function of the code point.
//!
//! Pages are built the first time one of their code points is laid out and
//! are never modified or evicted afterwards. Only a resize clears the cache.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::error::GlyphError;
use crate::rasterizer::{FaceMetrics, GlyphRasterizer, RasterizedGlyph};
use crate::types::{Bbox, GlyphMetrics, Vec2};

/// Code points per page.
pub const GLYPHS_PER_PAGE: usize = 256;

/// Cells per atlas row and column.
const GRID_SIZE: i32 = 16;

/// Cell and texture dimensions at one pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AtlasGeometry {
    /// Largest glyph box plus padding, font space, pixels
    pub cell_bbox: Bbox<i32>,
    pub tex_width: u32,
    pub tex_height: u32,
}

impl AtlasGeometry {
    /// Extra pixels around the nominal glyph box; antialiasing can spill
    /// slightly past the outline metrics.
    pub const CELL_PADDING: i32 = 2;

    pub fn from_metrics(metrics: &FaceMetrics) -> Self {
        let bbox = metrics.max_glyph_bbox;
        let cell_bbox = Bbox::new(
            Vec2::new(
                bbox.upper_left.x - Self::CELL_PADDING,
                bbox.upper_left.y + Self::CELL_PADDING,
            ),
            Vec2::new(
                bbox.lower_right.x + Self::CELL_PADDING,
                bbox.lower_right.y - Self::CELL_PADDING,
            ),
        );
        let tex_width = (cell_bbox.width().max(1) * GRID_SIZE) as u32;
        let tex_height = (cell_bbox.height().max(1) * GRID_SIZE) as u32;
        Self {
            cell_bbox,
            tex_width,
            tex_height,
        }
    }

    pub fn cell_width(&self) -> i32 {
        self.cell_bbox.width().max(1)
    }

    pub fn cell_height(&self) -> i32 {
        self.cell_bbox.height().max(1)
    }

    /// Texel of the glyph origin (pen position on the baseline) inside the
    /// code point's cell.
    pub fn cell_origin(&self, code_point: u32) -> Vec2<i32> {
        let row = ((code_point >> 4) & 0xF) as i32;
        let col = (code_point & 0xF) as i32;
        Vec2::new(
            col * self.cell_width() - self.cell_bbox.upper_left.x,
            row * self.cell_height() + self.cell_bbox.upper_left.y,
        )
    }

    /// Texel of the upper-left corner of the code point's cell.
    pub fn cell_corner(&self, code_point: u32) -> Vec2<i32> {
        let row = ((code_point >> 4) & 0xF) as i32;
        let col = (code_point & 0xF) as i32;
        Vec2::new(col * self.cell_width(), row * self.cell_height())
    }
}

/// Single-channel pixel data for one page, ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    pub page_no: u32,
    pub width: u32,
    pub height: u32,
    /// Row-major coverage, `width * height` bytes
    pub pixels: Vec<u8>,
}

impl PageImage {
    pub fn texel(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.pixels[(y * self.width + x) as usize]
    }
}

/// Destination for finished page images.
///
/// The GPU backend turns each image into a texture; [`CpuAtlas`] keeps the
/// pixels in memory.
pub trait PageUploader {
    /// Handle the page keeps for drawing.
    type Texture;

    fn upload_page(&mut self, image: PageImage) -> Self::Texture;

    /// Largest texture width or height the uploader accepts.
    fn max_texture_dimension(&self) -> u32 {
        u32::MAX
    }
}

/// In-memory page storage for headless layout.
#[derive(Debug, Default)]
pub struct CpuAtlas {
    pages: Vec<PageImage>,
    max_dimension: Option<u32>,
}

impl CpuAtlas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject atlases wider or taller than `max_dimension`.
    pub fn with_max_dimension(max_dimension: u32) -> Self {
        Self {
            pages: Vec::new(),
            max_dimension: Some(max_dimension),
        }
    }

    pub fn upload_count(&self) -> usize {
        self.pages.len()
    }

    /// Image behind a texture handle returned by [`PageUploader::upload_page`].
    pub fn image(&self, texture: usize) -> Option<&PageImage> {
        self.pages.get(texture)
    }
}

impl PageUploader for CpuAtlas {
    type Texture = usize;

    fn upload_page(&mut self, image: PageImage) -> usize {
        self.pages.push(image);
        self.pages.len() - 1
    }

    fn max_texture_dimension(&self) -> u32 {
        self.max_dimension.unwrap_or(u32::MAX)
    }
}

/// One built page: its texture and the metrics of all 256 code points.
#[derive(Debug)]
pub struct Page<T> {
    pub texture: T,
    glyphs: Box<[GlyphMetrics; GLYPHS_PER_PAGE]>,
}

impl<T> Page<T> {
    /// Metrics for any code point on this page.
    pub fn glyph(&self, code_point: u32) -> &GlyphMetrics {
        &self.glyphs[(code_point & 0xFF) as usize]
    }

    pub fn glyphs(&self) -> &[GlyphMetrics; GLYPHS_PER_PAGE] {
        &self.glyphs
    }
}

/// Rasterize all 256 code points of a page into one image.
///
/// Code points the face lacks, and glyphs that fail to render, get empty
/// metrics; the rest of the page is unaffected.
pub fn rasterize_page(
    page_no: u32,
    geometry: &AtlasGeometry,
    rasterizer: &mut dyn GlyphRasterizer,
) -> (PageImage, Box<[GlyphMetrics; GLYPHS_PER_PAGE]>) {
    let width = geometry.tex_width;
    let height = geometry.tex_height;
    let mut pixels = vec![0u8; width as usize * height as usize];
    let mut glyphs = Box::new([GlyphMetrics::default(); GLYPHS_PER_PAGE]);
    let mut mapped = 0usize;

    let first = page_no << 8;
    for code_point in first..first + GLYPHS_PER_PAGE as u32 {
        let glyph = match rasterizer.rasterize(code_point) {
            Ok(glyph) => glyph,
            Err(GlyphError::NotMapped(_)) => {
                log::trace!("No glyph for U+{:04X}", code_point);
                continue;
            }
            Err(e) => {
                log::warn!("{}", e);
                continue;
            }
        };
        mapped += 1;

        let metrics = glyph_metrics(geometry, &glyph);
        blit_glyph(&mut pixels, width, geometry, code_point, &metrics, &glyph);
        glyphs[(code_point & 0xFF) as usize] = metrics;
    }

    log::debug!(
        "Built page {:#x}: {}x{} atlas, {} mapped glyphs",
        page_no,
        width,
        height,
        mapped
    );

    let image = PageImage {
        page_no,
        width,
        height,
        pixels,
    };
    (image, glyphs)
}

fn glyph_metrics(geometry: &AtlasGeometry, glyph: &RasterizedGlyph) -> GlyphMetrics {
    let cell = geometry.cell_bbox;
    let width = glyph.width as i32;
    let height = glyph.height as i32;
    GlyphMetrics {
        origin: Vec2::new(glyph.left - cell.upper_left.x, cell.upper_left.y - glyph.top),
        advance: glyph.advance,
        bbox: Bbox::new(
            Vec2::new(glyph.left, glyph.top),
            Vec2::new(glyph.left + width, glyph.top - height),
        ),
        glyph_index: glyph.glyph_index,
    }
}

/// Copy a glyph bitmap into its cell. Pixels that fall outside the cell
/// are dropped so a misreported glyph cannot bleed into its neighbours.
fn blit_glyph(
    pixels: &mut [u8],
    tex_width: u32,
    geometry: &AtlasGeometry,
    code_point: u32,
    metrics: &GlyphMetrics,
    glyph: &RasterizedGlyph,
) {
    let corner = geometry.cell_corner(code_point);
    let cell_w = geometry.cell_width();
    let cell_h = geometry.cell_height();
    let src_w = glyph.width as usize;

    for y in 0..glyph.height as i32 {
        let cell_y = metrics.origin.y + y;
        if !(0..cell_h).contains(&cell_y) {
            continue;
        }
        for x in 0..glyph.width as i32 {
            let cell_x = metrics.origin.x + x;
            if !(0..cell_w).contains(&cell_x) {
                continue;
            }
            let Some(&coverage) = glyph.pixels.get(y as usize * src_w + x as usize) else {
                continue;
            };
            let tex_x = (corner.x + cell_x) as usize;
            let tex_y = (corner.y + cell_y) as usize;
            pixels[tex_y * tex_width as usize + tex_x] = coverage;
        }
    }
}

/// Page number to built page.
#[derive(Debug)]
pub struct PageCache<T> {
    pages: HashMap<u32, Page<T>>,
}

impl<T> Default for PageCache<T> {
    fn default() -> Self {
        Self {
            pages: HashMap::new(),
        }
    }
}

impl<T> PageCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, page_no: u32) -> Option<&Page<T>> {
        self.pages.get(&page_no)
    }

    /// Return the page, rasterizing and uploading it first if it has not
    /// been built yet.
    pub fn get_or_build<U>(
        &mut self,
        page_no: u32,
        geometry: &AtlasGeometry,
        rasterizer: &mut dyn GlyphRasterizer,
        uploader: &mut U,
    ) -> &Page<T>
    where
        U: PageUploader<Texture = T> + ?Sized,
    {
        match self.pages.entry(page_no) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let (image, glyphs) = rasterize_page(page_no, geometry, rasterizer);
                let texture = uploader.upload_page(image);
                entry.insert(Page { texture, glyphs })
            }
        }
    }

    pub fn contains(&self, page_no: u32) -> bool {
        self.pages.contains_key(&page_no)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Built page numbers, ascending.
    pub fn page_numbers(&self) -> Vec<u32> {
        let mut numbers: Vec<u32> = self.pages.keys().copied().collect();
        numbers.sort_unstable();
        numbers
    }

    /// Drop every page. Only valid when the pixel size changes.
    pub(crate) fn clear(&mut self) {
        self.pages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FontError;

    fn metrics() -> FaceMetrics {
        FaceMetrics {
            max_glyph_bbox: Bbox::new(Vec2::new(-1, 10), Vec2::new(7, -3)),
            line_height: 14,
            has_kerning: false,
        }
    }

    /// Renders every code point as a solid 2×2 block, except U+0041 which
    /// reports a bitmap far larger than its cell.
    struct Blocks;

    impl GlyphRasterizer for Blocks {
        fn set_pixel_size(&mut self, _: u32) -> Result<FaceMetrics, FontError> {
            Ok(metrics())
        }

        fn face_metrics(&self) -> FaceMetrics {
            metrics()
        }

        fn rasterize(&mut self, code_point: u32) -> Result<RasterizedGlyph, GlyphError> {
            if code_point == 0x42 {
                return Err(GlyphError::NotMapped(code_point));
            }
            let size = if code_point == 0x41 { 40 } else { 2 };
            Ok(RasterizedGlyph {
                width: size,
                height: size,
                left: 0,
                top: 2,
                pixels: vec![0xFF; (size * size) as usize],
                advance: Vec2::new(8 * 64, 0),
                glyph_index: code_point + 1,
            })
        }

        fn kerning(&self, _: u32, _: u32) -> Result<Vec2<i32>, GlyphError> {
            Ok(Vec2::default())
        }
    }

    #[test]
    fn geometry_pads_the_glyph_box() {
        let geometry = AtlasGeometry::from_metrics(&metrics());
        assert_eq!(geometry.cell_bbox, Bbox::new(Vec2::new(-3, 12), Vec2::new(9, -5)));
        assert_eq!(geometry.cell_width(), 12);
        assert_eq!(geometry.cell_height(), 17);
        assert_eq!(geometry.tex_width, 192);
        assert_eq!(geometry.tex_height, 272);
    }

    #[test]
    fn cell_position_comes_from_low_byte() {
        let geometry = AtlasGeometry::from_metrics(&metrics());
        // U+1234: row 3, column 4
        assert_eq!(geometry.cell_corner(0x1234), Vec2::new(48, 51));
        assert_eq!(geometry.cell_origin(0x1234), Vec2::new(48 + 3, 51 + 12));
        assert_eq!(geometry.cell_corner(0x34), geometry.cell_corner(0x1234));
    }

    #[test]
    fn page_records_metrics_and_pixels() {
        let geometry = AtlasGeometry::from_metrics(&metrics());
        let (image, glyphs) = rasterize_page(0, &geometry, &mut Blocks);

        assert_eq!(image.width, geometry.tex_width);
        assert_eq!(image.pixels.len(), (image.width * image.height) as usize);

        let c = glyphs[0x43];
        assert_eq!(c.glyph_index, 0x44);
        assert_eq!(c.origin, Vec2::new(3, 10));
        assert_eq!(c.bbox, Bbox::new(Vec2::new(0, 2), Vec2::new(2, 0)));
        assert_eq!(c.advance, Vec2::new(512, 0));

        let corner = geometry.cell_corner(0x43);
        let (x, y) = ((corner.x + 3) as u32, (corner.y + 10) as u32);
        assert_eq!(image.texel(x, y), 0xFF);
        assert_eq!(image.texel(x + 1, y + 1), 0xFF);
        assert_eq!(image.texel(x + 2, y), 0);
        assert_eq!(image.texel(x - 1, y), 0);
    }

    #[test]
    fn unmapped_code_point_gets_empty_metrics() {
        let geometry = AtlasGeometry::from_metrics(&metrics());
        let (_, glyphs) = rasterize_page(0, &geometry, &mut Blocks);
        assert_eq!(glyphs[0x42], GlyphMetrics::default());
    }

    #[test]
    fn oversized_bitmap_stays_inside_its_cell() {
        let geometry = AtlasGeometry::from_metrics(&metrics());
        let (image, _) = rasterize_page(0, &geometry, &mut Blocks);

        // U+0041 is row 4 column 1; its right neighbour U+0042 is unmapped
        // and must stay blank even though U+0041's bitmap spans 40 pixels.
        let neighbour = geometry.cell_corner(0x42);
        for y in 0..geometry.cell_height() as u32 {
            for x in 0..geometry.cell_width() as u32 {
                assert_eq!(
                    image.texel(neighbour.x as u32 + x, neighbour.y as u32 + y),
                    0
                );
            }
        }
        let below = geometry.cell_corner(0x51);
        assert_eq!(image.texel(below.x as u32, below.y as u32), 0);
    }

    #[test]
    fn cache_builds_each_page_once() {
        let geometry = AtlasGeometry::from_metrics(&metrics());
        let mut cache = PageCache::new();
        let mut atlas = CpuAtlas::new();

        let texture = cache.get_or_build(0, &geometry, &mut Blocks, &mut atlas).texture;
        assert_eq!(cache.get_or_build(0, &geometry, &mut Blocks, &mut atlas).texture, texture);
        assert_eq!(atlas.upload_count(), 1);

        cache.get_or_build(3, &geometry, &mut Blocks, &mut atlas);
        assert_eq!(atlas.upload_count(), 2);
        assert_eq!(cache.page_numbers(), vec![0, 3]);
        assert!(cache.contains(3));
        assert!(cache.get(1).is_none());

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn page_glyph_lookup_uses_low_byte() {
        let geometry = AtlasGeometry::from_metrics(&metrics());
        let mut cache = PageCache::new();
        let mut atlas = CpuAtlas::new();
        let page = cache.get_or_build(1, &geometry, &mut Blocks, &mut atlas);
        assert_eq!(page.glyph(0x143).glyph_index, 0x144);
        assert_eq!(atlas.image(page.texture).map(|i| i.page_no), Some(1));
    }
}
