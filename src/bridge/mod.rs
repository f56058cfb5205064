//! Bridge module - JS ↔ Rust communication
//! 
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod camera;
mod challenge;
mod decoder;
mod player;
mod scanner;
mod scheduler;

pub use scanner::{
    init_scanner,
    start_scanner,
    stop_scanner,
    teardown_scanner,
    is_scanner_active,
    is_scanner_loading,
    get_scan_state,
    get_scan_result,
    should_reveal_scene,
    configure_scanner,
};

pub use challenge::{
    init_challenge,
    on_player_progress,
    begin_challenge,
    challenge_pointer_down,
    challenge_pointer_move,
    challenge_pointer_up,
    is_challenge_visible,
    get_seconds_remaining,
    get_challenge_target,
    get_last_outcome,
    teardown_challenge,
    configure_challenge,
    configure_match_criteria,
};
