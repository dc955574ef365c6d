//! par-text demo application.
//!
//! Opens a window and renders the configured labels through
//! `par-text-render`: static labels cached across frames, immediate ones
//! laid out every frame, a frames-per-second counter and right-aligned
//! digit columns from several font sessions sharing one text context.
//!
//! Keys: `+` / `-` resize the main font, `Esc` quits.

pub mod app;
pub mod cli;
pub mod debug;
pub mod fps;
pub mod renderer;
pub mod scene;
