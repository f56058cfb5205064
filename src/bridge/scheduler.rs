//! `setTimeout`-backed scheduler

use std::time::Duration;

use log::warn;
use wasm_bindgen::prelude::*;

use crate::error::BridgeError;
use crate::timing::{Scheduler, Task, TimerHandle};

/// Handle returned when the browser refused to schedule; cancelling it is a no-op
const NO_TIMER: TimerHandle = TimerHandle(-1);

pub struct BrowserScheduler {
    window: web_sys::Window,
}

impl BrowserScheduler {
    pub fn new() -> Result<Self, BridgeError> {
        let window = web_sys::window().ok_or(BridgeError::Unavailable("window"))?;
        Ok(Self { window })
    }
}

impl Scheduler for BrowserScheduler {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }

    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
        // freed by wasm-bindgen after the single call
        let callback = Closure::once_into_js(move || task());
        let delay_ms = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);

        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay_ms)
        {
            Ok(id) => TimerHandle(id),
            Err(err) => {
                warn!("setTimeout failed: {:?}", err);
                NO_TIMER
            }
        }
    }

    fn cancel(&self, handle: TimerHandle) {
        if handle != NO_TIMER {
            self.window.clear_timeout_with_handle(handle.0);
        }
    }
}
