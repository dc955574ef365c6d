//! GPU text rendering for par-text.
//!
//! This crate turns the layouts produced by `par-text-fonts` into draw
//! calls:
//!
//! - [`align`] and [`transform`] compute where a text block lands on screen
//! - [`GpuBackend`] is the seam to the GPU; [`WgpuBackend`] implements it
//! - [`TextContext`] owns the resources every font shares
//! - [`FontSession`] renders strings immediately, [`StaticText`] caches
//!   the geometry of one string across frames
//!
//! Everything here is single-threaded. Sessions share their context through
//! `Rc`, so they are neither `Send` nor `Sync`.

pub mod align;
pub mod backend;
pub mod context;
pub mod error;
pub mod session;
pub mod static_text;
pub mod transform;
pub mod wgpu_backend;

// Re-export main public types
pub use align::{Align, HorizontalAlign, VerticalAlign, start_offset};
pub use backend::{DrawBatch, GpuBackend, TextUniforms};
pub use context::TextContext;
pub use error::RenderError;
pub use session::FontSession;
pub use static_text::StaticText;
pub use transform::{Mat4, screen_transform};
pub use wgpu_backend::WgpuBackend;

// Re-export the layout types callers handle directly
pub use par_text_fonts::{Bbox, CoordRange, FontSource, TextLayout, Vec2, Vertex};
