//! Gesture module - timed trace-the-shape challenge
//!
//! Re-exports only. All logic in submodules.

mod cue;
mod engine;
mod host;
mod path;
mod shapes;
mod timer;
mod verify;

pub use cue::CueTrigger;
pub use engine::ChallengeEngine;
pub use host::{ChallengeOutcome, DrawingSurface, Notifier, Player};
pub use path::{GesturePath, Point};
pub use shapes::{circle_path, CircleTarget, TargetGenerator};
pub use timer::{ChallengeTimer, Tick, TimerState};
pub use verify::{
    verify, MatchCriteria, Verification, COVERAGE_THRESHOLD, MIN_DRAWN_POINTS,
    PROXIMITY_THRESHOLD,
};
