//! Drawing verification - coverage heuristic
//!
//! A target point is covered when any drawn point lies strictly inside the
//! proximity radius. The drawing matches when the covered fraction is
//! strictly above the coverage threshold. Order of the drawn points is
//! irrelevant.

use nalgebra::distance_squared;

use super::path::GesturePath;

/// Fewer drawn points than this is not a deliberate trace
pub const MIN_DRAWN_POINTS: usize = 10;

/// Max distance (pixels, exclusive) from a target point to count it covered
pub const PROXIMITY_THRESHOLD: f64 = 10.0;

/// Covered fraction that must be exceeded
pub const COVERAGE_THRESHOLD: f64 = 0.8;

/// Thresholds for [`MatchCriteria::verify`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchCriteria {
    pub min_drawn_points: usize,
    pub proximity: f64,
    pub min_coverage: f64,
}

impl Default for MatchCriteria {
    fn default() -> Self {
        Self {
            min_drawn_points: MIN_DRAWN_POINTS,
            proximity: PROXIMITY_THRESHOLD,
            min_coverage: COVERAGE_THRESHOLD,
        }
    }
}

/// Result of comparing a drawing with its target
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Verification {
    pub covered: usize,
    pub total: usize,
    pub matched: bool,
}

impl Verification {
    pub fn coverage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.covered as f64 / self.total as f64
        }
    }

    pub fn is_match(&self) -> bool {
        self.matched
    }
}

impl MatchCriteria {
    pub fn verify(&self, drawn: &GesturePath, target: &GesturePath) -> Verification {
        let total = target.len();

        if drawn.len() < self.min_drawn_points || total == 0 {
            return Verification {
                covered: 0,
                total,
                matched: false,
            };
        }

        let limit = self.proximity * self.proximity;
        let covered = target
            .points()
            .iter()
            .filter(|t| drawn.points().iter().any(|d| distance_squared(*t, d) < limit))
            .count();

        Verification {
            covered,
            total,
            matched: covered as f64 / total as f64 > self.min_coverage,
        }
    }
}

/// Verify with the default thresholds
pub fn verify(drawn: &GesturePath, target: &GesturePath) -> Verification {
    MatchCriteria::default().verify(drawn, target)
}
