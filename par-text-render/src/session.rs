//! Immediate-mode text rendering through one font face.

use std::cell::RefCell;
use std::rc::Rc;

use par_text_fonts::{CoordRange, FontFace, FontSource, GlyphRasterizer, TextLayout, Vec2, Vertex};

use crate::align::{Align, start_offset};
use crate::backend::{DrawBatch, GpuBackend, TextUniforms};
use crate::context::TextContext;
use crate::error::RenderError;
use crate::transform::{Mat4, screen_transform};

/// A font face at one pixel size, bound to a [`TextContext`].
///
/// Each call to [`render`](Self::render) lays the string out again and
/// refills the session's vertex buffer; [`crate::StaticText`] keeps the
/// geometry of a string that does not change between frames.
pub struct FontSession<B: GpuBackend> {
    context: TextContext<B>,
    face: FontFace<B::Texture>,
    vertex_buffer: B::VertexBuffer,
}

impl<B: GpuBackend> std::fmt::Debug for FontSession<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontSession")
            .field("face", &self.face)
            .finish_non_exhaustive()
    }
}

impl<B: GpuBackend> FontSession<B> {
    /// Open `source` through the context's font library at `pixel_size`.
    pub fn new(
        context: &TextContext<B>,
        source: &FontSource,
        pixel_size: u32,
    ) -> Result<Self, RenderError> {
        let face = context.library().open_face(source)?;
        Self::with_rasterizer(context, Box::new(face), pixel_size)
    }

    /// Build a session around any rasterizer.
    pub fn with_rasterizer(
        context: &TextContext<B>,
        rasterizer: Box<dyn GlyphRasterizer>,
        pixel_size: u32,
    ) -> Result<Self, RenderError> {
        let (face, vertex_buffer) = {
            let mut backend = context.backend_mut();
            let face = FontFace::new(rasterizer, pixel_size, &*backend)?;
            (face, backend.create_vertex_buffer())
        };
        context.register_session();

        Ok(Self {
            context: context.clone(),
            face,
            vertex_buffer,
        })
    }

    /// Change the pixel size. Every page is rebuilt on demand afterward.
    pub fn resize(&mut self, pixel_size: u32) -> Result<(), RenderError> {
        let backend = self.context.backend();
        self.face.resize(pixel_size, &*backend)?;
        Ok(())
    }

    /// Lay out `text` without drawing it.
    pub fn build(&mut self, text: impl AsRef<[u8]>) -> TextLayout {
        let mut backend = self.context.backend_mut();
        self.face.build_text(text, &mut *backend)
    }

    /// Draw `text` with `align` choosing which point of its box lands on
    /// `position` (pixels, origin top-left).
    pub fn render(
        &mut self,
        text: impl AsRef<[u8]>,
        color: [f32; 4],
        window_size: Vec2<f32>,
        position: Vec2<f32>,
        align: Align,
    ) {
        self.render_rotated(text, color, window_size, position, align, 0.0);
    }

    /// Like [`render`](Self::render), rotating the block by `rotation`
    /// radians about the aligned point.
    pub fn render_rotated(
        &mut self,
        text: impl AsRef<[u8]>,
        color: [f32; 4],
        window_size: Vec2<f32>,
        position: Vec2<f32>,
        align: Align,
        rotation: f32,
    ) {
        let layout = self.build(text);
        let Some(bbox) = layout.bbox else {
            return;
        };
        let offset = start_offset(&bbox, align);
        let transform = screen_transform(window_size, position, rotation, offset);
        self.draw_layout(&layout, &transform, color);
    }

    /// Draw `text` with a caller-supplied transform from layout pixels
    /// (baseline origin, y down) to clip space.
    pub fn render_with_matrix(&mut self, text: impl AsRef<[u8]>, color: [f32; 4], transform: &Mat4) {
        let layout = self.build(text);
        if layout.is_empty() {
            return;
        }
        self.draw_layout(&layout, transform, color);
    }

    fn draw_layout(&mut self, layout: &TextLayout, transform: &Mat4, color: [f32; 4]) {
        self.context
            .backend_mut()
            .upload_vertices(&mut self.vertex_buffer, &layout.vertices);
        self.render_batch(&self.vertex_buffer, &layout.ranges, transform, color);
    }

    /// Draw previously built ranges from `buffer`.
    ///
    /// Ranges whose page is no longer cached (the session was resized
    /// since they were built) are skipped.
    pub fn render_batch(
        &self,
        buffer: &B::VertexBuffer,
        ranges: &[CoordRange],
        transform: &Mat4,
        color: [f32; 4],
    ) {
        let batches: Vec<DrawBatch<'_, B::Texture>> = ranges
            .iter()
            .filter_map(|range| match self.face.page(range.page_no) {
                Some(page) => Some(DrawBatch {
                    texture: &page.texture,
                    start: range.start,
                    count: range.count,
                }),
                None => {
                    log::warn!("Page {:#x} not cached, skipping its glyphs", range.page_no);
                    None
                }
            })
            .collect();
        if batches.is_empty() {
            return;
        }

        let uniforms = TextUniforms {
            transform: *transform,
            color,
        };
        self.context.backend_mut().draw(buffer, &batches, &uniforms);
    }

    /// A new vertex buffer from this session's backend.
    pub fn create_vertex_buffer(&self) -> B::VertexBuffer {
        self.context.backend_mut().create_vertex_buffer()
    }

    /// Replace the contents of `buffer`.
    pub fn upload(&self, buffer: &mut B::VertexBuffer, vertices: &[Vertex]) {
        self.context.backend_mut().upload_vertices(buffer, vertices);
    }

    pub fn pixel_size(&self) -> u32 {
        self.face.pixel_size()
    }

    pub fn line_height(&self) -> i32 {
        self.face.line_height()
    }

    pub fn has_kerning(&self) -> bool {
        self.face.has_kerning()
    }

    /// Changes whenever a resize invalidates previously built layouts.
    pub fn generation(&self) -> u64 {
        self.face.generation()
    }

    pub fn page_count(&self) -> usize {
        self.face.page_count()
    }

    pub fn face(&self) -> &FontFace<B::Texture> {
        &self.face
    }

    pub fn context(&self) -> &TextContext<B> {
        &self.context
    }

    /// Wrap the session for sharing with [`crate::StaticText`] objects.
    pub fn into_shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }
}

impl<B: GpuBackend> Drop for FontSession<B> {
    fn drop(&mut self) {
        self.context.release_session();
    }
}
