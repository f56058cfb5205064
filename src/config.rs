//! Tunables for the scan session and the trace challenge
//!
//! Defaults match the shipped page. JS can override a subset through the
//! `configure_*` bridge entry points.

use crate::gesture::MatchCriteria;
use crate::scanner::FacingMode;

/// How long a decoded result stays on screen before the scanner resets
pub const DEFAULT_RESULT_TTL_MS: u32 = 15_000;

/// Playback position (seconds) that triggers the challenge
pub const DEFAULT_CUE_POINT_SECS: f64 = 24.0;

/// Seconds the user gets to trace the shape
pub const DEFAULT_TIME_BUDGET_SECS: u32 = 5;

/// Target circle radius in canvas pixels
pub const DEFAULT_TARGET_RADIUS: f64 = 50.0;

/// Angular step between sampled target points (degrees)
pub const DEFAULT_TARGET_STEP_DEGREES: u32 = 5;

/// Scan session settings
#[derive(Clone, Debug, PartialEq)]
pub struct ScanConfig {
    /// Delay before a shown result is cleared and the camera released
    pub result_ttl_ms: u32,
    /// Camera preference, tried in order
    pub facing_order: Vec<FacingMode>,
}

impl ScanConfig {
    /// Rear camera first, then the selfie camera
    pub fn rear_first() -> Self {
        Self {
            result_ttl_ms: DEFAULT_RESULT_TTL_MS,
            facing_order: vec![FacingMode::Environment, FacingMode::User],
        }
    }

    pub fn with_result_ttl_ms(mut self, result_ttl_ms: u32) -> Self {
        self.result_ttl_ms = result_ttl_ms;
        self
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::rear_first()
    }
}

/// Trace challenge settings
#[derive(Clone, Debug, PartialEq)]
pub struct ChallengeConfig {
    pub cue_point_secs: f64,
    pub time_budget_secs: u32,
    pub target_radius: f64,
    pub target_step_degrees: u32,
    /// Thresholds a drawing must meet to match the target
    pub criteria: MatchCriteria,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            cue_point_secs: DEFAULT_CUE_POINT_SECS,
            time_budget_secs: DEFAULT_TIME_BUDGET_SECS,
            target_radius: DEFAULT_TARGET_RADIUS,
            target_step_degrees: DEFAULT_TARGET_STEP_DEGREES,
            criteria: MatchCriteria::default(),
        }
    }
}
