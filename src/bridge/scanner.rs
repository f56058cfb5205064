//! Scanner entry points for the page
//!
//! The page owns the `<video>` element and the QR library; Rust owns the
//! session lifecycle. State getters are polled by the UI layer.

use std::cell::RefCell;
use std::rc::Rc;

use log::info;
use wasm_bindgen::prelude::*;
use web_sys::HtmlVideoElement;

use super::camera::WebCamera;
use super::decoder::JsDecoderFactory;
use super::scheduler::BrowserScheduler;
use crate::config::ScanConfig;
use crate::error::BridgeError;
use crate::scanner::{ScanController, ScanState};
use crate::timing::Scheduler;

type WebScanController = ScanController<WebCamera, JsDecoderFactory>;

// Thread-local storage (WASM is single-threaded)
thread_local! {
    static SCANNER: RefCell<Option<WebScanController>> = RefCell::new(None);
}

fn scanner() -> Result<WebScanController, BridgeError> {
    SCANNER.with(|cell| {
        cell.borrow()
            .clone()
            .ok_or(BridgeError::NotInitialised("scanner"))
    })
}

/// Run `f` on the controller outside the thread-local borrow
fn with_scanner<T>(default: T, f: impl FnOnce(&WebScanController) -> T) -> T {
    match scanner() {
        Ok(scanner) => f(&scanner),
        Err(_) => default,
    }
}

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Bind the scanner to a `<video>` element and a JS decoder factory.
/// A previously bound scanner is stopped.
#[wasm_bindgen]
pub fn init_scanner(video: HtmlVideoElement, decoder_factory: js_sys::Function) -> Result<(), JsValue> {
    let scheduler: Rc<dyn Scheduler> = Rc::new(BrowserScheduler::new()?);
    let controller = ScanController::new(
        WebCamera::new(video.clone()),
        JsDecoderFactory::new(video, decoder_factory),
        scheduler,
        ScanConfig::default(),
    );

    let previous = SCANNER.with(|cell| cell.borrow_mut().replace(controller));
    if let Some(previous) = previous {
        previous.stop();
    }

    info!("✅ QR scanner ready");
    Ok(())
}

/// Resolves once the camera is live, rejects with the acquisition error
#[wasm_bindgen]
pub async fn start_scanner() -> Result<(), JsValue> {
    let controller = scanner()?;
    controller.start().await?;
    Ok(())
}

#[wasm_bindgen]
pub fn stop_scanner() {
    with_scanner((), |scanner| scanner.stop());
}

/// Stop and unbind; call when the scanner view unmounts
#[wasm_bindgen]
pub fn teardown_scanner() {
    let previous = SCANNER.with(|cell| cell.borrow_mut().take());
    if let Some(previous) = previous {
        previous.stop();
    }
}

#[wasm_bindgen]
pub fn is_scanner_active() -> bool {
    with_scanner(false, |scanner| scanner.is_scanner_active())
}

#[wasm_bindgen]
pub fn is_scanner_loading() -> bool {
    with_scanner(false, |scanner| scanner.is_loading())
}

#[wasm_bindgen]
pub fn get_scan_state() -> String {
    with_scanner(ScanState::Idle, |scanner| scanner.state())
        .as_str()
        .to_string()
}

#[wasm_bindgen]
pub fn get_scan_result() -> Option<String> {
    with_scanner(None, |scanner| scanner.scan_result())
}

/// True while a result is shown; the page reveals its 3D scene then
#[wasm_bindgen]
pub fn should_reveal_scene() -> bool {
    with_scanner(false, |scanner| scanner.should_reveal_scene())
}

/// Override how long a result stays up (ms); applies to the next scan
#[wasm_bindgen]
pub fn configure_scanner(result_ttl_ms: u32) -> Result<(), JsValue> {
    let controller = scanner()?;
    controller.set_config(controller.config().with_result_ttl_ms(result_ttl_ms));
    Ok(())
}
