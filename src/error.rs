//! Error types shared by the scanner, the challenge engine and the JS bridge

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Camera could not be brought up for a scan session.
///
/// Always recoverable: the controller falls back to `Idle` and the UI keeps
/// the start control available.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcquisitionError {
    #[error("camera permission denied")]
    PermissionDenied,
    #[error("no camera device matches the requested facing mode")]
    NoDevice,
    #[error("camera produced no usable video track")]
    NoVideoTrack,
    #[error("camera access is not supported in this context")]
    Unsupported,
    #[error("failed to attach stream to video sink: {0}")]
    Sink(String),
    #[error("failed to create decoder: {0}")]
    Decoder(String),
    #[error("camera error: {0}")]
    Platform(String),
}

impl AcquisitionError {
    /// Whether trying the next facing mode could still succeed
    pub fn allows_fallback(&self) -> bool {
        matches!(self, AcquisitionError::NoDevice | AcquisitionError::NoVideoTrack)
    }
}

/// A single frame did not contain a readable code.
///
/// Not a failure of the session; the decoder just keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no code found in frame")]
pub struct DecodeTransientError;

/// Errors raised by `#[wasm_bindgen]` entry points
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("{0} has not been initialised")]
    NotInitialised(&'static str),
    #[error("{0} is unavailable")]
    Unavailable(&'static str),
}

impl From<AcquisitionError> for JsValue {
    fn from(err: AcquisitionError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

impl From<BridgeError> for JsValue {
    fn from(err: BridgeError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
