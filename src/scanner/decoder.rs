//! Decoder capability - turns video frames into code payloads
//!
//! One decoder is created per scan session and destroyed with it.

use crate::error::{AcquisitionError, DecodeTransientError};

/// Per-frame decode report
pub type DecodeReport = Result<String, DecodeTransientError>;

/// Callback the decoder invokes for every processed frame
pub type DecodeCallback = Box<dyn FnMut(DecodeReport)>;

/// A running decode loop bound to the session's video sink
pub trait Decoder {
    /// Begin continuous decode attempts
    fn start(&mut self) -> Result<(), AcquisitionError>;

    /// Pause decode attempts; the instance stays usable
    fn stop(&mut self);

    /// Release the instance. No callbacks fire afterwards.
    fn destroy(&mut self);
}

/// Builds decoders against the video sink
pub trait DecoderFactory {
    type Decoder: Decoder + 'static;

    fn create(&self, on_decode: DecodeCallback) -> Result<Self::Decoder, AcquisitionError>;
}
