//! Scanner module - camera lifecycle and QR result handling
//!
//! Re-exports only. All logic in submodules.

mod camera;
mod controller;
mod decoder;
mod state;

pub use camera::{acquire_with_fallback, Camera, FacingMode, StreamHandle};
pub use controller::ScanController;
pub use decoder::{DecodeCallback, DecodeReport, Decoder, DecoderFactory};
pub use state::{ScanResult, ScanState};
