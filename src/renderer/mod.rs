//! Renderer module - 2D canvas overlay for the trace challenge
//! 
//! Re-exports only. All logic in submodules.

mod canvas;

pub use canvas::CanvasSurface;
