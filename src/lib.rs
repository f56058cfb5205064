//! Scan & Trace Web - QR scanner and trace-the-shape challenge
//! 
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules
//!
//! The scanner and challenge cores are platform-neutral and driven through
//! the traits in [`scanner`], [`gesture`] and [`timing`]; the browser
//! implementations live in the private `bridge` and `renderer` modules.

mod bridge;
pub mod config;
pub mod error;
pub mod gesture;
mod logging;
mod renderer;
pub mod scanner;
pub mod timing;

#[cfg(test)]
mod testing;

use log::{info, LevelFilter};
use wasm_bindgen::prelude::*;

// Re-export wasm_bindgen functions for JS access
pub use bridge::{
    begin_challenge, challenge_pointer_down, challenge_pointer_move, challenge_pointer_up,
    configure_challenge, configure_match_criteria, configure_scanner, get_challenge_target,
    get_last_outcome, get_scan_result, get_scan_state, get_seconds_remaining, init_challenge,
    init_scanner, is_challenge_visible, is_scanner_active, is_scanner_loading,
    on_player_progress, should_reveal_scene, start_scanner, stop_scanner, teardown_challenge,
    teardown_scanner,
};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    logging::init(LevelFilter::Info);
}

/// Change console verbosity: "off", "error", "warn", "info", "debug", "trace"
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter = logging::parse_level(level)
        .ok_or_else(|| JsValue::from_str(&format!("unknown log level: {}", level)))?;
    logging::init(filter);
    info!("log level set to {}", filter);
    Ok(())
}
