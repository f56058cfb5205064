//! Trace challenge entry points for the page
//!
//! The page forwards player progress and pointer events (canvas-relative
//! coordinates) and polls the getters to render the countdown overlay.

use std::cell::RefCell;
use std::rc::Rc;

use log::info;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use super::player::{AlertNotifier, JsPlayer, WebPlayer};
use super::scheduler::BrowserScheduler;
use crate::config::ChallengeConfig;
use crate::error::BridgeError;
use crate::gesture::{ChallengeEngine, CircleTarget, MatchCriteria};
use crate::renderer::CanvasSurface;

thread_local! {
    static CHALLENGE: RefCell<Option<ChallengeEngine>> = RefCell::new(None);
}

fn engine() -> Result<ChallengeEngine, BridgeError> {
    CHALLENGE.with(|cell| {
        cell.borrow()
            .clone()
            .ok_or(BridgeError::NotInitialised("challenge"))
    })
}

/// Run `f` on the engine outside the thread-local borrow
fn with_engine<T>(default: T, f: impl FnOnce(&ChallengeEngine) -> T) -> T {
    match engine() {
        Ok(engine) => f(&engine),
        Err(_) => default,
    }
}

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Bind the challenge to its overlay canvas and the video player.
/// A previously bound challenge is torn down.
#[wasm_bindgen]
pub fn init_challenge(canvas: HtmlCanvasElement, player: JsPlayer) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or(BridgeError::Unavailable("window"))?;
    let engine = ChallengeEngine::new(
        Rc::new(BrowserScheduler::new()?),
        Rc::new(WebPlayer::new(player)),
        Rc::new(CanvasSurface::new(canvas)?),
        Rc::new(AlertNotifier::new(window)),
        ChallengeConfig::default(),
    );

    let previous = CHALLENGE.with(|cell| cell.borrow_mut().replace(engine));
    if let Some(previous) = previous {
        previous.teardown();
    }

    info!("✅ Trace challenge ready");
    Ok(())
}

/// Player progress report (seconds played)
#[wasm_bindgen]
pub fn on_player_progress(played_secs: f64) {
    with_engine((), |engine| engine.on_progress(played_secs));
}

/// Start a challenge now, e.g. to retry after a miss.
/// Uses the configured budget when none is given.
#[wasm_bindgen]
pub fn begin_challenge(time_budget_secs: Option<u32>) -> Result<(), JsValue> {
    let engine = engine()?;
    let config = engine.config();
    let target = CircleTarget::new(config.target_radius, config.target_step_degrees);
    engine.begin_challenge(&target, time_budget_secs.unwrap_or(config.time_budget_secs));
    Ok(())
}

#[wasm_bindgen]
pub fn challenge_pointer_down(x: f64, y: f64) {
    with_engine((), |engine| engine.pointer_down(x, y));
}

#[wasm_bindgen]
pub fn challenge_pointer_move(x: f64, y: f64) {
    with_engine((), |engine| engine.pointer_move(x, y));
}

#[wasm_bindgen]
pub fn challenge_pointer_up() {
    with_engine((), |engine| engine.pointer_up());
}

#[wasm_bindgen]
pub fn is_challenge_visible() -> bool {
    with_engine(false, |engine| engine.is_challenge_visible())
}

#[wasm_bindgen]
pub fn get_seconds_remaining() -> Option<u32> {
    with_engine(None, |engine| engine.seconds_remaining())
}

/// Target outline of the running challenge as flat `[x0, y0, x1, y1, ...]`
#[wasm_bindgen]
pub fn get_challenge_target() -> Option<Vec<f64>> {
    with_engine(None, |engine| engine.target().map(|target| target.as_flat()))
}

/// "matched" or "retry" for the last finished challenge
#[wasm_bindgen]
pub fn get_last_outcome() -> Option<String> {
    with_engine(None, |engine| engine.last_outcome().map(|o| o.as_str().to_string()))
}

/// Abandon any running challenge and unbind; call on unmount
#[wasm_bindgen]
pub fn teardown_challenge() {
    let previous = CHALLENGE.with(|cell| cell.borrow_mut().take());
    if let Some(previous) = previous {
        previous.teardown();
    }
}

#[wasm_bindgen]
pub fn configure_challenge(cue_point_secs: f64, time_budget_secs: u32) -> Result<(), JsValue> {
    let engine = engine()?;
    engine.set_config(ChallengeConfig {
        cue_point_secs,
        time_budget_secs,
        ..engine.config()
    });
    Ok(())
}

/// Override the match thresholds; used from the next evaluation on.
/// `min_coverage` is the fraction (0..1) of target points that must be exceeded.
#[wasm_bindgen]
pub fn configure_match_criteria(
    min_drawn_points: u32,
    proximity_px: f64,
    min_coverage: f64,
) -> Result<(), JsValue> {
    let proximity_ok = proximity_px.is_finite() && proximity_px > 0.0;
    if !proximity_ok || !(0.0..=1.0).contains(&min_coverage) {
        return Err(JsValue::from_str("match criteria out of range"));
    }

    let engine = engine()?;
    engine.set_config(ChallengeConfig {
        criteria: MatchCriteria {
            min_drawn_points: min_drawn_points as usize,
            proximity: proximity_px,
            min_coverage,
        },
        ..engine.config()
    });
    Ok(())
}
