//! Collaborators the challenge engine drives but does not own

use super::path::{GesturePath, Point};
use super::verify::Verification;

/// The video player the challenge interrupts
pub trait Player {
    fn pause(&self);
    fn play(&self);
}

/// Canvas the target and the user's strokes are drawn on
pub trait DrawingSurface {
    /// Width and height in the same space as pointer coordinates
    fn size(&self) -> (f64, f64);
    fn clear(&self);
    /// Dashed outline of the target
    fn draw_guide(&self, target: &GesturePath);
    /// Solid segment of the user's trace
    fn draw_stroke(&self, from: Point, to: Point);
}

/// How a finished challenge went
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChallengeOutcome {
    Matched(Verification),
    Retry(Verification),
}

impl ChallengeOutcome {
    pub fn from_verification(verification: Verification) -> Self {
        if verification.is_match() {
            ChallengeOutcome::Matched(verification)
        } else {
            ChallengeOutcome::Retry(verification)
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, ChallengeOutcome::Matched(_))
    }

    pub fn verification(&self) -> Verification {
        match self {
            ChallengeOutcome::Matched(v) | ChallengeOutcome::Retry(v) => *v,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeOutcome::Matched(_) => "matched",
            ChallengeOutcome::Retry(_) => "retry",
        }
    }

    /// User-facing notice text
    pub fn message(&self) -> &'static str {
        match self {
            ChallengeOutcome::Matched(_) => "Great! You matched the figure!",
            ChallengeOutcome::Retry(_) => "Try again!",
        }
    }
}

/// Surfaces the outcome to the user
pub trait Notifier {
    fn announce(&self, outcome: &ChallengeOutcome);
}
