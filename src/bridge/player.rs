//! JS video player and the outcome notice

use log::warn;
use wasm_bindgen::prelude::*;

use crate::gesture::{ChallengeOutcome, Notifier, Player};

#[wasm_bindgen]
extern "C" {
    /// Anything with `pause()` and `play()`, e.g. an `HTMLVideoElement`
    pub type JsPlayer;

    #[wasm_bindgen(method, catch, js_name = pause)]
    fn js_pause(this: &JsPlayer) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = play)]
    fn js_play(this: &JsPlayer) -> Result<JsValue, JsValue>;
}

pub struct WebPlayer {
    player: JsPlayer,
}

impl WebPlayer {
    pub fn new(player: JsPlayer) -> Self {
        Self { player }
    }
}

impl Player for WebPlayer {
    fn pause(&self) {
        if let Err(err) = self.player.js_pause() {
            warn!("player pause failed: {:?}", err);
        }
    }

    fn play(&self) {
        // may return a promise that rejects on autoplay policy; nothing to do then
        if let Err(err) = self.player.js_play() {
            warn!("player play failed: {:?}", err);
        }
    }
}

/// Blocking `window.alert` notice
pub struct AlertNotifier {
    window: web_sys::Window,
}

impl AlertNotifier {
    pub fn new(window: web_sys::Window) -> Self {
        Self { window }
    }
}

impl Notifier for AlertNotifier {
    fn announce(&self, outcome: &ChallengeOutcome) {
        if let Err(err) = self.window.alert_with_message(outcome.message()) {
            warn!("alert failed: {:?}", err);
        }
    }
}
