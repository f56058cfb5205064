//! Decoder backed by a JS factory
//!
//! QR decoding runs in JavaScript. The page hands over a factory
//! `(video, onDecode) => { start(), stop(), destroy() }`; `onDecode` receives
//! the payload string (or an object with a `data` string) per hit, and
//! `null`/`undefined` for frames without a code.

use log::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlVideoElement;

use crate::error::{AcquisitionError, DecodeTransientError};
use crate::scanner::{DecodeCallback, DecodeReport, Decoder, DecoderFactory};

#[wasm_bindgen]
extern "C" {
    /// Instance returned by the page's decoder factory
    pub type JsFrameDecoder;

    #[wasm_bindgen(method, catch)]
    fn start(this: &JsFrameDecoder) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn stop(this: &JsFrameDecoder) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn destroy(this: &JsFrameDecoder) -> Result<(), JsValue>;
}

/// Pull the payload out of whatever the JS decoder reported
fn read_report(value: &JsValue) -> DecodeReport {
    if let Some(payload) = value.as_string() {
        return Ok(payload);
    }
    if value.is_object() {
        if let Ok(data) = js_sys::Reflect::get(value, &"data".into()) {
            if let Some(payload) = data.as_string() {
                return Ok(payload);
            }
        }
    }
    Err(DecodeTransientError)
}

pub struct JsDecoder {
    instance: JsFrameDecoder,
    destroyed: bool,
    // must outlive `instance`; dropped after `destroy`
    _on_decode: Closure<dyn FnMut(JsValue)>,
}

impl Decoder for JsDecoder {
    fn start(&mut self) -> Result<(), AcquisitionError> {
        let started = self
            .instance
            .start()
            .map_err(|err| AcquisitionError::Decoder(format!("{:?}", err)))?;

        // async starters report failures later; log them
        if let Ok(promise) = started.dyn_into::<js_sys::Promise>() {
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(err) = JsFuture::from(promise).await {
                    warn!("decoder start rejected: {:?}", err);
                }
            });
        }
        Ok(())
    }

    fn stop(&mut self) {
        if let Err(err) = self.instance.stop() {
            warn!("decoder stop failed: {:?}", err);
        }
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        if let Err(err) = self.instance.destroy() {
            warn!("decoder destroy failed: {:?}", err);
        }
    }
}

impl Drop for JsDecoder {
    fn drop(&mut self) {
        self.destroy();
    }
}

pub struct JsDecoderFactory {
    video: HtmlVideoElement,
    factory: js_sys::Function,
}

impl JsDecoderFactory {
    pub fn new(video: HtmlVideoElement, factory: js_sys::Function) -> Self {
        Self { video, factory }
    }
}

impl DecoderFactory for JsDecoderFactory {
    type Decoder = JsDecoder;

    fn create(&self, mut on_decode: DecodeCallback) -> Result<JsDecoder, AcquisitionError> {
        let closure = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
            on_decode(read_report(&value));
        });

        let instance = self
            .factory
            .call2(&JsValue::NULL, &self.video, closure.as_ref().unchecked_ref())
            .map_err(|err| AcquisitionError::Decoder(format!("{:?}", err)))?;
        if instance.is_null() || instance.is_undefined() {
            return Err(AcquisitionError::Decoder("factory returned no decoder".into()));
        }

        Ok(JsDecoder {
            instance: instance.unchecked_into(),
            destroyed: false,
            _on_decode: closure,
        })
    }
}
