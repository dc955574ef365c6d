//! Shared integration test helpers for par-text-render.
//!
//! [`RecordingBackend`] keeps page images in a [`CpuAtlas`] and records
//! every vertex upload and draw, so sessions can be exercised without a GPU.

#![allow(dead_code)]

use par_text_fonts::{
    Bbox, CpuAtlas, FaceMetrics, FontError, GlyphError, GlyphRasterizer, PageImage, PageUploader,
    RasterizedGlyph, Vec2, Vertex,
};
use par_text_render::{DrawBatch, GpuBackend, TextContext, TextUniforms};

pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

pub fn window() -> Vec2<f32> {
    Vec2::new(800.0, 600.0)
}

/// Block-glyph rasterizer: at `px` each printable ASCII or Greek glyph is
/// a solid `px/2` wide, `3px/4` tall box on the baseline, advancing
/// `px/2 + 2` pixels. Space is blank.
#[derive(Debug, Default)]
pub struct BlockRasterizer {
    pixel_size: u32,
}

impl BlockRasterizer {
    pub fn boxed() -> Box<dyn GlyphRasterizer> {
        Box::new(Self::default())
    }

    fn ascent(&self) -> i32 {
        self.pixel_size as i32 * 3 / 4
    }

    fn width(&self) -> i32 {
        self.pixel_size as i32 / 2
    }
}

impl GlyphRasterizer for BlockRasterizer {
    fn set_pixel_size(&mut self, pixel_size: u32) -> Result<FaceMetrics, FontError> {
        if pixel_size == 0 {
            return Err(FontError::UnsupportedPixelSize(pixel_size));
        }
        self.pixel_size = pixel_size;
        Ok(self.face_metrics())
    }

    fn face_metrics(&self) -> FaceMetrics {
        let descent = self.pixel_size as i32 / 4;
        FaceMetrics {
            max_glyph_bbox: Bbox::new(Vec2::new(0, self.ascent()), Vec2::new(self.width(), -descent)),
            line_height: self.pixel_size as i32 + descent,
            has_kerning: false,
        }
    }

    fn rasterize(&mut self, code_point: u32) -> Result<RasterizedGlyph, GlyphError> {
        if !matches!(code_point, 0x20..=0x7E | 0x391..=0x3C9 | 0xFFFD) {
            return Err(GlyphError::NotMapped(code_point));
        }
        let advance = Vec2::new((self.width() + 2) * 64, 0);
        if code_point == 0x20 {
            return Ok(RasterizedGlyph::empty(advance, code_point + 1));
        }
        let (width, height) = (self.width() as u32, self.ascent() as u32);
        Ok(RasterizedGlyph {
            width,
            height,
            left: 0,
            top: self.ascent(),
            pixels: vec![0xFF; (width * height) as usize],
            advance,
            glyph_index: code_point + 1,
        })
    }

    fn kerning(&self, _left: u32, _right: u32) -> Result<Vec2<i32>, GlyphError> {
        Ok(Vec2::default())
    }
}

/// Vertex storage that remembers what was uploaded.
#[derive(Debug, Default)]
pub struct RecordedBuffer {
    pub id: usize,
    pub vertices: Vec<Vertex>,
}

/// One draw call as the backend received it.
#[derive(Debug, Clone)]
pub struct RecordedDraw {
    pub buffer: usize,
    /// `(texture, start, count)` per batch
    pub batches: Vec<(usize, u32, u32)>,
    pub uniforms: TextUniforms,
    /// Buffer contents at the time of the draw
    pub vertices: Vec<Vertex>,
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub atlas: CpuAtlas,
    /// `(buffer, vertex count)` per upload
    pub uploads: Vec<(usize, usize)>,
    pub draws: Vec<RecordedDraw>,
    buffers_created: usize,
}

impl RecordingBackend {
    pub fn with_max_dimension(max_dimension: u32) -> Self {
        Self {
            atlas: CpuAtlas::with_max_dimension(max_dimension),
            ..Self::default()
        }
    }
}

impl PageUploader for RecordingBackend {
    type Texture = usize;

    fn upload_page(&mut self, image: PageImage) -> usize {
        self.atlas.upload_page(image)
    }

    fn max_texture_dimension(&self) -> u32 {
        self.atlas.max_texture_dimension()
    }
}

impl GpuBackend for RecordingBackend {
    type VertexBuffer = RecordedBuffer;

    fn create_vertex_buffer(&mut self) -> RecordedBuffer {
        self.buffers_created += 1;
        RecordedBuffer {
            id: self.buffers_created,
            vertices: Vec::new(),
        }
    }

    fn upload_vertices(&mut self, buffer: &mut RecordedBuffer, vertices: &[Vertex]) {
        buffer.vertices = vertices.to_vec();
        self.uploads.push((buffer.id, vertices.len()));
    }

    fn draw(
        &mut self,
        buffer: &RecordedBuffer,
        batches: &[DrawBatch<'_, usize>],
        uniforms: &TextUniforms,
    ) {
        self.draws.push(RecordedDraw {
            buffer: buffer.id,
            batches: batches
                .iter()
                .map(|b| (*b.texture, b.start, b.count))
                .collect(),
            uniforms: *uniforms,
            vertices: buffer.vertices.clone(),
        });
    }
}

pub fn context() -> TextContext<RecordingBackend> {
    TextContext::new(RecordingBackend::default())
}

/// Map a clip-space point back to window pixels.
pub fn clip_to_pixels(clip: Vec2<f32>, window: Vec2<f32>) -> Vec2<f32> {
    Vec2::new(
        (clip.x + 1.0) / 2.0 * window.x,
        (1.0 - clip.y) / 2.0 * window.y,
    )
}

pub fn assert_near(actual: Vec2<f32>, expected: Vec2<f32>) {
    assert!(
        (actual.x - expected.x).abs() < 1e-3 && (actual.y - expected.y).abs() < 1e-3,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}
