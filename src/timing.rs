//! Cancellable one-shot scheduling
//!
//! Both the result expiry and the challenge countdown are built on this.
//! Repeating work is expressed as a callback that schedules its successor,
//! so stopping is always "cancel the one pending handle".

use std::time::Duration;

/// Identifies a pending scheduled callback
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub i32);

/// Deferred one-shot callback, run at most once
pub type Task = Box<dyn FnOnce()>;

/// Clock + timer source
pub trait Scheduler {
    /// Milliseconds on a monotonic-enough clock
    fn now_ms(&self) -> f64;

    /// Run `task` once after `delay`. Never runs `task` synchronously.
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle;

    /// Drop a pending callback. Unknown or already-fired handles are ignored.
    fn cancel(&self, handle: TimerHandle);
}

/// Cancel the handle stored in `slot`, if any
pub fn cancel_slot(scheduler: &dyn Scheduler, slot: &mut Option<TimerHandle>) {
    if let Some(handle) = slot.take() {
        scheduler.cancel(handle);
    }
}
