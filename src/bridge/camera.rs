//! getUserMedia camera and the `<video>` sink

use log::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{DomException, HtmlVideoElement, MediaStream, MediaStreamConstraints, MediaStreamTrack};

use crate::error::AcquisitionError;
use crate::scanner::{Camera, FacingMode, StreamHandle};

/// Owned `MediaStream`; tracks are stopped on release or drop
pub struct WebStream {
    stream: MediaStream,
    released: bool,
}

impl StreamHandle for WebStream {
    fn video_track_count(&self) -> usize {
        self.stream.get_video_tracks().length() as usize
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        for track in self.stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
        self.released = true;
    }
}

impl Drop for WebStream {
    fn drop(&mut self) {
        self.release();
    }
}

pub struct WebCamera {
    video: HtmlVideoElement,
}

impl WebCamera {
    pub fn new(video: HtmlVideoElement) -> Self {
        Self { video }
    }
}

/// `facingMode` constraint. The rear camera is requested as `exact` so a
/// device without one fails and the fallback kicks in; the selfie camera is
/// only `ideal` so plain webcams still qualify.
fn video_constraints(facing: FacingMode) -> Result<JsValue, AcquisitionError> {
    let facing_value: JsValue = match facing {
        FacingMode::Environment => {
            let exact = js_sys::Object::new();
            js_sys::Reflect::set(&exact, &"exact".into(), &facing.as_str().into())
                .map_err(platform_error)?;
            exact.into()
        }
        FacingMode::User => facing.as_str().into(),
    };

    let video = js_sys::Object::new();
    js_sys::Reflect::set(&video, &"facingMode".into(), &facing_value).map_err(platform_error)?;
    Ok(video.into())
}

/// Map a getUserMedia rejection onto the acquisition taxonomy
fn classify(err: JsValue) -> AcquisitionError {
    match err.dyn_ref::<DomException>().map(|e| e.name()) {
        Some(name) => match name.as_str() {
            "NotAllowedError" | "SecurityError" => AcquisitionError::PermissionDenied,
            "NotFoundError" | "OverconstrainedError" => AcquisitionError::NoDevice,
            "NotSupportedError" => AcquisitionError::Unsupported,
            _ => AcquisitionError::Platform(name),
        },
        None => platform_error(err),
    }
}

fn platform_error(err: JsValue) -> AcquisitionError {
    AcquisitionError::Platform(format!("{:?}", err))
}

impl Camera for WebCamera {
    type Stream = WebStream;

    async fn acquire(&self, facing: FacingMode) -> Result<WebStream, AcquisitionError> {
        let window = web_sys::window().ok_or(AcquisitionError::Unsupported)?;
        let devices = window
            .navigator()
            .media_devices()
            .map_err(|_| AcquisitionError::Unsupported)?;

        let constraints = MediaStreamConstraints::new();
        constraints.set_video(&video_constraints(facing)?);
        constraints.set_audio(&JsValue::FALSE);

        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(classify)?;
        let stream = JsFuture::from(promise).await.map_err(classify)?;
        let stream = stream
            .dyn_into::<MediaStream>()
            .map_err(|_| AcquisitionError::Platform("getUserMedia resolved to a non-stream".into()))?;

        debug!("getUserMedia granted ({})", facing.as_str());
        Ok(WebStream {
            stream,
            released: false,
        })
    }

    fn attach(&self, stream: &WebStream) -> Result<(), AcquisitionError> {
        self.video.set_src_object(Some(&stream.stream));
        // muted inline playback; the promise only rejects on autoplay policy
        self.video
            .play()
            .map(|_| ())
            .map_err(|err| AcquisitionError::Sink(format!("{:?}", err)))
    }

    fn detach(&self) {
        let _ = self.video.pause();
        self.video.set_src_object(None);
    }
}
