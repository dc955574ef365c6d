//! Text whose geometry is built once and drawn every frame.

use std::cell::RefCell;
use std::rc::Rc;

use par_text_fonts::{Bbox, CoordRange, Vec2};

use crate::align::{Align, start_offset};
use crate::backend::GpuBackend;
use crate::session::FontSession;
use crate::transform::{Mat4, screen_transform};

/// One string laid out ahead of time, with its own vertex buffer.
///
/// The geometry is rebuilt when the text or font changes, and on the next
/// render after the font session is resized.
pub struct StaticText<B: GpuBackend> {
    font: Rc<RefCell<FontSession<B>>>,
    text: Vec<u8>,
    color: [f32; 4],
    ranges: Vec<CoordRange>,
    bbox: Option<Bbox<f32>>,
    vertex_buffer: B::VertexBuffer,
    built_generation: u64,
}

impl<B: GpuBackend> std::fmt::Debug for StaticText<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticText")
            .field("text", &String::from_utf8_lossy(&self.text))
            .field("color", &self.color)
            .field("ranges", &self.ranges)
            .field("bbox", &self.bbox)
            .finish_non_exhaustive()
    }
}

impl<B: GpuBackend> StaticText<B> {
    pub fn new(font: Rc<RefCell<FontSession<B>>>, text: impl AsRef<[u8]>, color: [f32; 4]) -> Self {
        let vertex_buffer = font.borrow().create_vertex_buffer();
        let mut static_text = Self {
            font,
            text: text.as_ref().to_vec(),
            color,
            ranges: Vec::new(),
            bbox: None,
            vertex_buffer,
            built_generation: 0,
        };
        static_text.rebuild();
        static_text
    }

    fn rebuild(&mut self) {
        let mut font = self.font.borrow_mut();
        let layout = font.build(&self.text);
        font.upload(&mut self.vertex_buffer, &layout.vertices);
        self.ranges = layout.ranges;
        self.bbox = layout.bbox;
        self.built_generation = font.generation();
    }

    fn refresh(&mut self) {
        let generation = self.font.borrow().generation();
        if generation != self.built_generation {
            log::debug!(
                "Font resized since static text was built (generation {} -> {}), rebuilding",
                self.built_generation,
                generation
            );
            self.rebuild();
        }
    }

    pub fn text(&self) -> &[u8] {
        &self.text
    }

    pub fn set_text(&mut self, text: impl AsRef<[u8]>) {
        let text = text.as_ref();
        if text == self.text.as_slice() {
            return;
        }
        self.text = text.to_vec();
        self.rebuild();
    }

    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    pub fn set_color(&mut self, color: [f32; 4]) {
        self.color = color;
    }

    pub fn font(&self) -> &Rc<RefCell<FontSession<B>>> {
        &self.font
    }

    /// Switch to another font session and rebuild.
    pub fn set_font(&mut self, font: Rc<RefCell<FontSession<B>>>) {
        self.vertex_buffer = font.borrow().create_vertex_buffer();
        self.font = font;
        self.rebuild();
    }

    /// Bounding box of the current geometry, `None` for empty text.
    pub fn bbox(&mut self) -> Option<Bbox<f32>> {
        self.refresh();
        self.bbox
    }

    pub fn render(&mut self, window_size: Vec2<f32>, position: Vec2<f32>, align: Align) {
        self.render_rotated(window_size, position, align, 0.0);
    }

    pub fn render_rotated(
        &mut self,
        window_size: Vec2<f32>,
        position: Vec2<f32>,
        align: Align,
        rotation: f32,
    ) {
        self.refresh();
        let Some(bbox) = self.bbox else {
            return;
        };
        let offset = start_offset(&bbox, align);
        let transform = screen_transform(window_size, position, rotation, offset);
        self.draw(&transform);
    }

    pub fn render_with_matrix(&mut self, transform: &Mat4) {
        self.refresh();
        if self.ranges.is_empty() {
            return;
        }
        self.draw(transform);
    }

    fn draw(&self, transform: &Mat4) {
        self.font
            .borrow()
            .render_batch(&self.vertex_buffer, &self.ranges, transform, self.color);
    }
}
