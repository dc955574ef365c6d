//! The GPU seam.
//!
//! A backend uploads page textures (through [`PageUploader`]), owns vertex
//! buffers and issues one draw per page run. [`crate::WgpuBackend`] is the
//! production implementation.

use bytemuck::{Pod, Zeroable};
use par_text_fonts::{PageUploader, Vertex};

use crate::transform::Mat4;

/// Per-draw shader parameters.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TextUniforms {
    /// Pixel space to clip space, column-major
    pub transform: Mat4,
    /// Straight (non-premultiplied) RGBA
    pub color: [f32; 4],
}

/// One page's run of vertices within a vertex buffer.
#[derive(Debug)]
pub struct DrawBatch<'a, T> {
    pub texture: &'a T,
    pub start: u32,
    pub count: u32,
}

/// Operations a renderer must provide to draw laid-out text.
pub trait GpuBackend: PageUploader {
    type VertexBuffer;

    /// A new, empty vertex buffer.
    fn create_vertex_buffer(&mut self) -> Self::VertexBuffer;

    /// Replace the buffer's contents.
    fn upload_vertices(&mut self, buffer: &mut Self::VertexBuffer, vertices: &[Vertex]);

    /// Draw each batch as a triangle list sampling its page texture.
    fn draw(
        &mut self,
        buffer: &Self::VertexBuffer,
        batches: &[DrawBatch<'_, Self::Texture>],
        uniforms: &TextUniforms,
    );
}
