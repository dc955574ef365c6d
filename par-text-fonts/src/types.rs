//! Geometry and per-glyph data types shared by the cache, layout and render layers.

use std::ops::{Add, Sub};

use bytemuck::{Pod, Zeroable};

/// 2D vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Vec2<T> {
    pub x: T,
    pub y: T,
}

impl<T> Vec2<T> {
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T: Add<Output = T>> Add for Vec2<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<T: Sub<Output = T>> Sub for Vec2<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned bounding box.
///
/// Glyph boxes are in font space (y grows upward), so `upper_left.y` is the
/// larger value and [`Bbox::height`] is positive. The aggregate text box is
/// in screen space (y grows downward); there `upper_left.y` is the smaller
/// value and `height()` is zero or negative. The alignment formulas are
/// written against `height()` as defined here and hold in both spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bbox<T> {
    /// Upper-left corner
    pub upper_left: Vec2<T>,
    /// Lower-right corner
    pub lower_right: Vec2<T>,
}

impl<T: Copy + Sub<Output = T>> Bbox<T> {
    pub const fn new(upper_left: Vec2<T>, lower_right: Vec2<T>) -> Self {
        Self {
            upper_left,
            lower_right,
        }
    }

    /// `lower_right.x - upper_left.x`
    pub fn width(&self) -> T {
        self.lower_right.x - self.upper_left.x
    }

    /// `upper_left.y - lower_right.y`
    pub fn height(&self) -> T {
        self.upper_left.y - self.lower_right.y
    }
}

impl Bbox<f32> {
    /// Smallest screen-space box containing both boxes.
    pub fn union(&self, other: &Bbox<f32>) -> Bbox<f32> {
        Bbox {
            upper_left: Vec2::new(
                self.upper_left.x.min(other.upper_left.x),
                self.upper_left.y.min(other.upper_left.y),
            ),
            lower_right: Vec2::new(
                self.lower_right.x.max(other.lower_right.x),
                self.lower_right.y.max(other.lower_right.y),
            ),
        }
    }
}

/// Per-code-point layout data, recorded once when the code point's page is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphMetrics {
    /// Offset from the cell's upper-left texel to the bitmap's upper-left texel
    pub origin: Vec2<i32>,
    /// Pen delta to the next glyph, in 26.6 fixed point (y grows upward)
    pub advance: Vec2<i32>,
    /// Bitmap extent relative to the glyph origin, in pixels, font space
    pub bbox: Bbox<i32>,
    /// Rasterizer glyph index (0 when the face has no glyph)
    pub glyph_index: u32,
}

/// One vertex of a glyph quad: screen-space pixel position plus
/// normalized atlas coordinate.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
}

/// Contiguous run of vertices that sample the same page texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordRange {
    /// Unicode code page (`code_point >> 8`)
    pub page_no: u32,
    /// Index of the first vertex of the run
    pub start: u32,
    /// Number of vertices in the run
    pub count: u32,
}
