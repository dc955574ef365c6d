//! Typed error types for par-text-fonts.
//!
//! Two classes of failure exist and they never mix:
//! - [`FontError`] is fatal for font creation or resize. It crosses the
//!   crate boundary and no partially built face survives it.
//! - [`GlyphError`] concerns a single code point or glyph pair. The page
//!   cache and layout builder absorb it, substituting an empty glyph or a
//!   zero kerning vector, so it never aborts a render.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors raised while opening a font or choosing its pixel size.
#[derive(Debug, Error)]
pub enum FontError {
    /// The font file could not be read from disk.
    #[error("Font file read failed for '{path}': {source}")]
    Io {
        /// Path of the font file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The data is not a font format the rasterizer understands.
    #[error("Unknown format for font data: {0}")]
    UnknownFormat(String),

    /// The face has no Unicode character map, so code points cannot be resolved.
    #[error("No unicode charmap in font")]
    NoUnicodeCharmap,

    /// A system font family was requested but is not installed.
    #[error("Font family '{0}' not found on this system")]
    FontNotFound(String),

    /// The rasterizer cannot produce glyphs at this size.
    #[error("Can't set font size: {0}")]
    UnsupportedPixelSize(u32),

    /// A page atlas at this size would exceed the backend's texture limit.
    #[error("Page atlas {width}x{height} exceeds the maximum texture dimension {max}")]
    AtlasTooLarge {
        /// Atlas width in texels.
        width: u32,
        /// Atlas height in texels.
        height: u32,
        /// Largest texture dimension the uploader supports.
        max: u32,
    },
}

/// Recoverable per-glyph failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GlyphError {
    /// The face has no glyph for this code point.
    #[error("No glyph for U+{0:04X}")]
    NotMapped(u32),

    /// The value is not a Unicode scalar value (surrogate or out of range).
    #[error("U+{0:04X} is not a Unicode scalar value")]
    InvalidCodePoint(u32),

    /// The glyph exists but could not be rendered to a bitmap.
    #[error("Err loading glyph {glyph_index} for U+{code_point:04X}")]
    Render {
        /// Code point being rasterized.
        code_point: u32,
        /// Rasterizer glyph index.
        glyph_index: u32,
    },

    /// The kerning lookup for a glyph pair failed.
    #[error("Can't load kerning for glyphs {left} and {right}")]
    Kerning {
        /// Left glyph index.
        left: u32,
        /// Right glyph index.
        right: u32,
    },
}
