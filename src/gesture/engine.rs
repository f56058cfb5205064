//! Trace challenge engine
//!
//! A challenge pauses the player, shows a dashed target, records the user's
//! strokes and, when the countdown reaches zero, verifies the drawing once.
//! A match resumes playback; a miss asks for a retry and leaves the player
//! paused until something triggers a new challenge.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use log::{debug, info};

use super::cue::CueTrigger;
use super::host::{ChallengeOutcome, DrawingSurface, Notifier, Player};
use super::path::{GesturePath, Point};
use super::shapes::{CircleTarget, TargetGenerator};
use super::timer::{ChallengeTimer, Tick};
use crate::config::ChallengeConfig;
use crate::timing::Scheduler;

const TICK: Duration = Duration::from_secs(1);

/// One challenge instance. Both paths die with it.
struct Challenge {
    id: u64,
    target: GesturePath,
    drawn: GesturePath,
    capturing: bool,
    /// Pointer-down position, anchor for the first stroke segment
    press: Option<Point>,
    timer: ChallengeTimer,
}

struct EngineState {
    active: Option<Challenge>,
    next_id: u64,
    cue: CueTrigger,
    last_outcome: Option<ChallengeOutcome>,
}

struct EngineShared {
    scheduler: Rc<dyn Scheduler>,
    player: Rc<dyn Player>,
    surface: Rc<dyn DrawingSurface>,
    notifier: Rc<dyn Notifier>,
    config: RefCell<ChallengeConfig>,
    state: RefCell<EngineState>,
}

/// Runs trace challenges against a player and a drawing surface.
///
/// Cloning yields another handle to the same engine.
#[derive(Clone)]
pub struct ChallengeEngine {
    shared: Rc<EngineShared>,
}

impl ChallengeEngine {
    pub fn new(
        scheduler: Rc<dyn Scheduler>,
        player: Rc<dyn Player>,
        surface: Rc<dyn DrawingSurface>,
        notifier: Rc<dyn Notifier>,
        config: ChallengeConfig,
    ) -> Self {
        let cue = CueTrigger::new(config.cue_point_secs);
        Self {
            shared: Rc::new(EngineShared {
                scheduler,
                player,
                surface,
                notifier,
                config: RefCell::new(config),
                state: RefCell::new(EngineState {
                    active: None,
                    next_id: 0,
                    cue,
                    last_outcome: None,
                }),
            }),
        }
    }

    /// Feed a player progress report; starts the default challenge when the
    /// cue point is crossed and none is running.
    pub fn on_progress(&self, played_secs: f64) {
        let fire = {
            let mut state = self.shared.state.borrow_mut();
            let crossed = state.cue.observe(played_secs);
            crossed && state.active.is_none()
        };

        if fire {
            info!("cue point reached at {:.1}s", played_secs);
            self.begin_default_challenge();
        }
    }

    /// Challenge with the configured circle and time budget
    pub fn begin_default_challenge(&self) {
        let config = self.shared.config.borrow().clone();
        let target = CircleTarget::new(config.target_radius, config.target_step_degrees);
        self.begin_challenge(&target, config.time_budget_secs);
    }

    /// Pause playback, show the target and start the countdown.
    ///
    /// A challenge already in progress is discarded first.
    pub fn begin_challenge(&self, generator: &dyn TargetGenerator, time_budget_secs: u32) {
        let shared = &self.shared;
        shared.discard_active();

        shared.player.pause();

        let (width, height) = shared.surface.size();
        let target = generator.generate(width, height);
        shared.surface.clear();
        shared.surface.draw_guide(&target);

        let id = {
            let mut state = shared.state.borrow_mut();
            state.next_id += 1;
            let id = state.next_id;
            let mut timer = ChallengeTimer::new();
            timer.start(time_budget_secs);
            state.active = Some(Challenge {
                id,
                target,
                drawn: GesturePath::new(),
                capturing: false,
                press: None,
                timer,
            });
            id
        };

        shared.schedule_tick(id);
        info!("challenge {} started, {}s to trace", id, time_budget_secs);
    }

    /// Start a fresh trace
    pub fn pointer_down(&self, x: f64, y: f64) {
        let mut state = self.shared.state.borrow_mut();
        if let Some(challenge) = state.active.as_mut() {
            challenge.drawn = GesturePath::new();
            challenge.capturing = true;
            challenge.press = Some(Point::new(x, y));
        }
    }

    /// Extend the trace and draw the new segment
    pub fn pointer_move(&self, x: f64, y: f64) {
        let segment = {
            let mut state = self.shared.state.borrow_mut();
            match state.active.as_mut() {
                Some(challenge) if challenge.capturing => {
                    let point = Point::new(x, y);
                    let from = challenge.drawn.last().or(challenge.press).unwrap_or(point);
                    challenge.drawn.push(point);
                    Some((from, point))
                }
                _ => None,
            }
        };

        if let Some((from, to)) = segment {
            self.shared.surface.draw_stroke(from, to);
        }
    }

    /// End the trace. Evaluation still waits for the countdown.
    pub fn pointer_up(&self) {
        let mut state = self.shared.state.borrow_mut();
        if let Some(challenge) = state.active.as_mut() {
            challenge.capturing = false;
        }
    }

    /// Abandon the current challenge without verifying it
    pub fn teardown(&self) {
        self.shared.discard_active();
    }

    pub fn is_challenge_visible(&self) -> bool {
        self.shared.state.borrow().active.is_some()
    }

    pub fn is_capturing(&self) -> bool {
        self.shared
            .state
            .borrow()
            .active
            .as_ref()
            .is_some_and(|c| c.capturing)
    }

    pub fn seconds_remaining(&self) -> Option<u32> {
        self.shared
            .state
            .borrow()
            .active
            .as_ref()
            .map(|c| c.timer.seconds_remaining())
    }

    pub fn drawn_len(&self) -> Option<usize> {
        self.shared.state.borrow().active.as_ref().map(|c| c.drawn.len())
    }

    pub fn target(&self) -> Option<GesturePath> {
        self.shared.state.borrow().active.as_ref().map(|c| c.target.clone())
    }

    pub fn last_outcome(&self) -> Option<ChallengeOutcome> {
        self.shared.state.borrow().last_outcome
    }

    /// Target and budget apply to the next challenge. The cue moves
    /// immediately and the match criteria apply from the next evaluation.
    pub fn set_config(&self, config: ChallengeConfig) {
        self.shared.state.borrow_mut().cue.set_cue_secs(config.cue_point_secs);
        *self.shared.config.borrow_mut() = config;
    }

    pub fn config(&self) -> ChallengeConfig {
        self.shared.config.borrow().clone()
    }
}

impl EngineShared {
    fn schedule_tick(self: &Rc<Self>, id: u64) {
        let weak: Weak<Self> = Rc::downgrade(self);
        let handle = self.scheduler.schedule(
            TICK,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.on_tick(id);
                }
            }),
        );

        let mut state = self.state.borrow_mut();
        match state.active.as_mut() {
            Some(challenge) if challenge.id == id => challenge.timer.set_pending(handle),
            _ => self.scheduler.cancel(handle),
        }
    }

    fn on_tick(self: &Rc<Self>, id: u64) {
        let tick = {
            let mut state = self.state.borrow_mut();
            match state.active.as_mut() {
                Some(challenge) if challenge.id == id => {
                    challenge.timer.clear_pending();
                    challenge.timer.tick()
                }
                _ => return,
            }
        };

        match tick {
            Tick::Countdown(left) => {
                debug!("challenge {}: {}s left", id, left);
                self.schedule_tick(id);
            }
            Tick::Expired => self.evaluate(id),
            Tick::Ignored => {}
        }
    }

    /// Verify once and end the challenge
    fn evaluate(&self, id: u64) {
        let criteria = self.config.borrow().criteria;
        let outcome = {
            let mut state = self.state.borrow_mut();
            let challenge = match state.active.take() {
                Some(challenge) if challenge.id == id => challenge,
                other => {
                    state.active = other;
                    return;
                }
            };
            let verification = criteria.verify(&challenge.drawn, &challenge.target);
            let outcome = ChallengeOutcome::from_verification(verification);
            state.last_outcome = Some(outcome);
            outcome
        };

        let verification = outcome.verification();
        info!(
            "challenge {} {}: {}/{} target points covered",
            id,
            outcome.as_str(),
            verification.covered,
            verification.total
        );

        self.surface.clear();
        self.notifier.announce(&outcome);
        if outcome.is_match() {
            self.player.play();
        }
    }

    fn discard_active(&self) {
        let discarded = self.state.borrow_mut().active.take();
        if let Some(mut challenge) = discarded {
            challenge.timer.stop(&*self.scheduler);
            self.surface.clear();
            debug!("challenge {} discarded", challenge.id);
        }
    }
}
