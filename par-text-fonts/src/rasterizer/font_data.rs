//! Owned font bytes with borrowed parser views.

use std::path::Path;
use std::sync::Arc;

use rustybuzz::ttf_parser;
use swash::FontRef;

use crate::error::FontError;

/// Font bytes plus the swash and ttf-parser views into them.
///
/// Both views borrow from `data`; they are valid for as long as this
/// struct lives because the bytes sit behind an `Arc` that is never
/// mutated.
#[derive(Clone)]
pub struct FontData {
    data: Arc<Vec<u8>>,
    face_index: u32,
    font_ref: FontRef<'static>,
    face: ttf_parser::Face<'static>,
}

impl std::fmt::Debug for FontData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontData")
            .field("data_len", &self.data.len())
            .field("face_index", &self.face_index)
            .finish()
    }
}

impl FontData {
    /// Parse face 0 of `data`.
    pub fn new(data: Vec<u8>) -> Result<Self, FontError> {
        Self::new_with_index(data, 0)
    }

    /// Parse a specific face, for TrueType collections.
    pub fn new_with_index(data: Vec<u8>, face_index: u32) -> Result<Self, FontError> {
        let data = Arc::new(data);

        // SAFETY: The slice points into the Arc's heap allocation, which is
        // neither moved nor mutated while any clone of this FontData lives.
        // Both views are stored beside the Arc and dropped with it.
        let static_bytes: &'static [u8] =
            unsafe { std::mem::transmute::<&[u8], &'static [u8]>(data.as_slice()) };

        let face = ttf_parser::Face::parse(static_bytes, face_index)
            .map_err(|e| FontError::UnknownFormat(e.to_string()))?;
        let font_ref = FontRef::from_index(static_bytes, face_index as usize).ok_or_else(|| {
            FontError::UnknownFormat(format!("face {face_index} is not a supported font"))
        })?;

        Ok(Self {
            data,
            face_index,
            font_ref,
            face,
        })
    }

    /// Read and parse a font file.
    pub fn from_path(path: &Path) -> Result<Self, FontError> {
        let bytes = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(bytes)
    }

    pub fn font_ref(&self) -> FontRef<'_> {
        self.font_ref
    }

    pub fn face(&self) -> &ttf_parser::Face<'_> {
        &self.face
    }

    pub fn face_index(&self) -> u32 {
        self.face_index
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether the face has a cmap subtable that maps Unicode code points.
    pub fn has_unicode_charmap(&self) -> bool {
        self.face
            .tables()
            .cmap
            .map(|cmap| cmap.subtables.into_iter().any(|s| s.is_unicode()))
            .unwrap_or(false)
    }
}
