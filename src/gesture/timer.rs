//! Challenge countdown
//!
//! Counts whole seconds down to zero. The engine drives it with one-shot
//! scheduled ticks and keeps the pending handle here so every exit path can
//! cancel it.

use crate::timing::{cancel_slot, Scheduler, TimerHandle};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerState {
    Stopped,
    Running,
}

/// What a tick did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Still running with this many seconds left
    Countdown(u32),
    /// Just reached zero; evaluate now
    Expired,
    /// Timer was not running
    Ignored,
}

pub struct ChallengeTimer {
    seconds_remaining: u32,
    state: TimerState,
    pending: Option<TimerHandle>,
}

impl ChallengeTimer {
    pub fn new() -> Self {
        Self {
            seconds_remaining: 0,
            state: TimerState::Stopped,
            pending: None,
        }
    }

    pub fn start(&mut self, seconds: u32) {
        self.seconds_remaining = seconds;
        self.state = TimerState::Running;
    }

    /// Advance one second
    pub fn tick(&mut self) -> Tick {
        if self.state != TimerState::Running {
            return Tick::Ignored;
        }

        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining == 0 {
            self.state = TimerState::Stopped;
            Tick::Expired
        } else {
            Tick::Countdown(self.seconds_remaining)
        }
    }

    /// Stop and cancel the pending tick, if any
    pub fn stop(&mut self, scheduler: &dyn Scheduler) {
        cancel_slot(scheduler, &mut self.pending);
        self.state = TimerState::Stopped;
    }

    pub fn set_pending(&mut self, handle: TimerHandle) {
        self.pending = Some(handle);
    }

    /// The pending tick fired; forget its handle
    pub fn clear_pending(&mut self) {
        self.pending = None;
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn state(&self) -> TimerState {
        self.state
    }
}

impl Default for ChallengeTimer {
    fn default() -> Self {
        Self::new()
    }
}
