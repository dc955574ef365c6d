//! Text layout: code points to textured quads grouped by page.

use std::collections::HashMap;

use crate::page_cache::AtlasGeometry;
use crate::rasterizer::SUBPIXELS_PER_PIXEL;
use crate::types::{Bbox, CoordRange, GlyphMetrics, Vec2, Vertex};

/// Vertices emitted per glyph (two triangles).
pub const VERTICES_PER_GLYPH: usize = 6;

/// Draw-ready geometry for one string.
///
/// Positions are in pixels relative to the first glyph's origin on the
/// baseline, y growing downward. Every range covers the vertices of one
/// page; ranges appear in the order their pages were first used.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextLayout {
    pub vertices: Vec<Vertex>,
    pub ranges: Vec<CoordRange>,
    /// Union of all placed glyph boxes; `None` when nothing was placed
    pub bbox: Option<Bbox<f32>>,
}

impl TextLayout {
    /// Bounding box, or a zero-sized box at the origin for empty text.
    pub fn extent(&self) -> Bbox<f32> {
        self.bbox.unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn glyph_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_GLYPH
    }
}

fn to_pixels(subpixels: i32) -> f32 {
    subpixels as f32 / SUBPIXELS_PER_PIXEL as f32
}

/// Pen state while walking one string.
///
/// The pen is kept in 26.6 fixed point and only converted to pixels when
/// vertices are emitted, so long lines do not accumulate rounding error.
#[derive(Debug, Default)]
pub(crate) struct LayoutBuilder {
    pen: Vec2<i32>,
    prev_glyph: Option<u32>,
    runs: Vec<(u32, Vec<Vertex>)>,
    run_index: HashMap<u32, usize>,
    bbox: Option<Bbox<f32>>,
}

impl LayoutBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Start a new line `line_height` pixels further down.
    pub(crate) fn newline(&mut self, line_height: i32) {
        self.pen.x = 0;
        self.pen.y += line_height * SUBPIXELS_PER_PIXEL;
        self.prev_glyph = None;
    }

    /// Glyph pair to kern before placing `glyph`, if any.
    pub(crate) fn kerning_pair(&self, glyph: &GlyphMetrics) -> Option<(u32, u32)> {
        match self.prev_glyph {
            Some(prev) if glyph.glyph_index != 0 => Some((prev, glyph.glyph_index)),
            _ => None,
        }
    }

    /// Emit the quad for one glyph and advance the pen past it.
    ///
    /// `kerning` is in 26.6 with y growing upward, like the advance.
    pub(crate) fn place(
        &mut self,
        code_point: u32,
        glyph: &GlyphMetrics,
        geometry: &AtlasGeometry,
        kerning: Vec2<i32>,
    ) {
        self.pen.x += kerning.x;
        self.pen.y -= kerning.y;

        let pen_x = to_pixels(self.pen.x);
        let pen_y = to_pixels(self.pen.y);
        let bbox = glyph.bbox;

        let left = pen_x + bbox.upper_left.x as f32;
        let right = pen_x + bbox.lower_right.x as f32;
        let top = pen_y - bbox.upper_left.y as f32;
        let bottom = pen_y - bbox.lower_right.y as f32;

        let tex_origin = geometry.cell_origin(code_point);
        let tex_w = geometry.tex_width as f32;
        let tex_h = geometry.tex_height as f32;
        let u_left = (tex_origin.x + bbox.upper_left.x) as f32 / tex_w;
        let u_right = (tex_origin.x + bbox.lower_right.x) as f32 / tex_w;
        let v_top = (tex_origin.y - bbox.upper_left.y) as f32 / tex_h;
        let v_bottom = (tex_origin.y - bbox.lower_right.y) as f32 / tex_h;

        let lower_left = Vertex {
            position: [left, bottom],
            tex_coords: [u_left, v_bottom],
        };
        let lower_right = Vertex {
            position: [right, bottom],
            tex_coords: [u_right, v_bottom],
        };
        let upper_left = Vertex {
            position: [left, top],
            tex_coords: [u_left, v_top],
        };
        let upper_right = Vertex {
            position: [right, top],
            tex_coords: [u_right, v_top],
        };

        let page_no = code_point >> 8;
        let run = match self.run_index.get(&page_no) {
            Some(&index) => index,
            None => {
                self.runs.push((page_no, Vec::new()));
                self.run_index.insert(page_no, self.runs.len() - 1);
                self.runs.len() - 1
            }
        };
        self.runs[run].1.extend_from_slice(&[
            lower_left,
            lower_right,
            upper_left,
            upper_left,
            lower_right,
            upper_right,
        ]);

        let placed = Bbox::new(Vec2::new(left, top), Vec2::new(right, bottom));
        self.bbox = Some(match self.bbox {
            Some(total) => total.union(&placed),
            None => placed,
        });

        self.pen.x += glyph.advance.x;
        self.pen.y -= glyph.advance.y;
        self.prev_glyph = (glyph.glyph_index != 0).then_some(glyph.glyph_index);
    }

    /// Flatten the per-page runs into one vertex buffer.
    pub(crate) fn finish(self) -> TextLayout {
        let total = self.runs.iter().map(|(_, run)| run.len()).sum();
        let mut vertices = Vec::with_capacity(total);
        let mut ranges = Vec::with_capacity(self.runs.len());

        for (page_no, run) in self.runs {
            ranges.push(CoordRange {
                page_no,
                start: vertices.len() as u32,
                count: run.len() as u32,
            });
            vertices.extend(run);
        }

        TextLayout {
            vertices,
            ranges,
            bbox: self.bbox,
        }
    }
}
