//! Glyph page atlases and text layout for par-text.
//!
//! This crate provides:
//! - A lenient UTF-8 decoder that substitutes U+FFFD for malformed input
//! - An outline-font rasterizer adapter (swash + ttf-parser) behind the
//!   [`GlyphRasterizer`] trait
//! - A write-once page cache that packs 256 code points into one atlas
//! - The text layout builder that turns a string into per-page quads
//!
//! # Architecture
//!
//! Text flows through the crate in one direction:
//! 1. [`utf8::decode_utf8`] yields code points
//! 2. [`FontFace::build_text`] resolves each code point's page through the
//!    [`PageCache`], building (rasterizing and uploading) pages on first use
//! 3. The resulting [`TextLayout`] holds one vertex run per page plus the
//!    text bounding box
//!
//! Nothing here touches a GPU directly: page uploads go through the
//! [`PageUploader`] trait, implemented by the render crate for wgpu and by
//! [`CpuAtlas`] for headless use.

pub mod error;
pub mod face;
pub mod layout;
pub mod page_cache;
pub mod rasterizer;
pub mod types;
pub mod utf8;

// Re-export main types for convenience
pub use error::{FontError, GlyphError};
pub use face::FontFace;
pub use layout::TextLayout;
pub use page_cache::{AtlasGeometry, CpuAtlas, GLYPHS_PER_PAGE, Page, PageCache, PageImage, PageUploader};
pub use rasterizer::{
    FaceMetrics, FontData, FontLibrary, FontSource, GlyphRasterizer, RasterizedGlyph,
    SUBPIXELS_PER_PIXEL, SwashFace,
};
pub use types::{Bbox, CoordRange, GlyphMetrics, Vec2, Vertex};
pub use utf8::{REPLACEMENT_CHARACTER, Utf8Decoder, decode_utf8};
