//! Scan session state - what the controller owns between start and stop

use crate::timing::TimerHandle;

/// Lifecycle of a scan session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Acquiring,
    Active,
    Resulted,
    Stopping,
}

impl ScanState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanState::Idle => "idle",
            ScanState::Acquiring => "acquiring",
            ScanState::Active => "active",
            ScanState::Resulted => "resulted",
            ScanState::Stopping => "stopping",
        }
    }

    /// States in which the session holds a stream and a decoder
    pub fn owns_handles(&self) -> bool {
        matches!(self, ScanState::Active | ScanState::Resulted)
    }
}

/// A decoded payload waiting out its display time
#[derive(Clone, Debug, PartialEq)]
pub struct ScanResult {
    pub payload: String,
    /// Scheduler clock value at which the result is dropped
    pub expires_at_ms: f64,
}

/// Everything a live session holds
pub(crate) struct ScanSession<S, D> {
    pub state: ScanState,
    pub stream: Option<S>,
    pub decoder: Option<D>,
    pub last_result: Option<ScanResult>,
    pub expiry: Option<TimerHandle>,
    /// Bumped on every start/stop; stale callbacks compare against it
    pub generation: u64,
}

impl<S, D> ScanSession<S, D> {
    pub fn new() -> Self {
        Self {
            state: ScanState::Idle,
            stream: None,
            decoder: None,
            last_result: None,
            expiry: None,
            generation: 0,
        }
    }

    /// Whether `generation` still names the current session
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

impl<S, D> Default for ScanSession<S, D> {
    fn default() -> Self {
        Self::new()
    }
}
