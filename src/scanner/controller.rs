//! Scan controller - camera + decoder lifecycle and result expiry
//!
//! ```text
//! Idle --start()--> Acquiring --(stream+decoder attached)--> Active
//! Active --(decode)--> Resulted --(expiry)--> Idle
//! Acquiring/Active/Resulted --stop()--> Idle
//! Acquiring --(failure)--> Idle
//! ```
//!
//! Every path into `Idle` releases the decoder and the stream first.
//! Async completions and callbacks carry the session generation they were
//! created under and do nothing once it is stale.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use log::{debug, info, warn};

use super::camera::{acquire_with_fallback, Camera, StreamHandle};
use super::decoder::{DecodeCallback, DecodeReport, Decoder, DecoderFactory};
use super::state::{ScanResult, ScanSession, ScanState};
use crate::config::ScanConfig;
use crate::error::AcquisitionError;
use crate::timing::Scheduler;

struct Shared<C: Camera, F: DecoderFactory> {
    camera: C,
    decoders: F,
    scheduler: Rc<dyn Scheduler>,
    config: RefCell<ScanConfig>,
    session: RefCell<ScanSession<C::Stream, F::Decoder>>,
}

/// Owns the camera stream and the decoder of at most one scan session.
///
/// Cloning yields another handle to the same controller.
pub struct ScanController<C: Camera, F: DecoderFactory> {
    shared: Rc<Shared<C, F>>,
}

impl<C: Camera, F: DecoderFactory> Clone for ScanController<C, F> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<C, F> ScanController<C, F>
where
    C: Camera + 'static,
    F: DecoderFactory + 'static,
{
    pub fn new(camera: C, decoders: F, scheduler: Rc<dyn Scheduler>, config: ScanConfig) -> Self {
        Self {
            shared: Rc::new(Shared {
                camera,
                decoders,
                scheduler,
                config: RefCell::new(config),
                session: RefCell::new(ScanSession::new()),
            }),
        }
    }

    /// Acquire a camera, attach it to the sink and start decoding.
    ///
    /// Any live session is released first. If a `stop()` or another
    /// `start()` lands while the camera request is in flight, whatever this
    /// call acquired is released and it resolves `Ok(())` without touching
    /// the newer state.
    pub async fn start(&self) -> Result<(), AcquisitionError> {
        let shared = &self.shared;
        shared.shutdown();

        let generation = {
            let mut session = shared.session.borrow_mut();
            session.state = ScanState::Acquiring;
            session.generation
        };
        let facing_order = shared.config.borrow().facing_order.clone();
        info!("starting scanner");

        let is_wanted = || shared.session.borrow().is_current(generation);
        let acquired = acquire_with_fallback(&shared.camera, &facing_order, &is_wanted).await;

        if !is_wanted() {
            if let Ok(Some((mut stream, _))) = acquired {
                stream.release();
            }
            debug!("camera request superseded, released late stream");
            return Ok(());
        }

        let (mut stream, facing) = match acquired {
            Ok(Some(acquired)) => acquired,
            // walk stopped early, only possible once superseded
            Ok(None) => return Ok(()),
            Err(err) => {
                shared.abandon(generation);
                return Err(err);
            }
        };

        if let Err(err) = shared.camera.attach(&stream) {
            warn!("camera sink failed: {}", err);
            shared.camera.detach();
            stream.release();
            shared.abandon(generation);
            return Err(err);
        }

        let weak = Rc::downgrade(shared);
        let on_decode: DecodeCallback = Box::new(move |report| {
            if let Some(shared) = weak.upgrade() {
                shared.handle_decode(generation, report);
            }
        });

        let decoder = shared
            .decoders
            .create(on_decode)
            .and_then(|mut decoder| match decoder.start() {
                Ok(()) => Ok(decoder),
                Err(err) => {
                    decoder.destroy();
                    Err(err)
                }
            });
        let decoder = match decoder {
            Ok(decoder) => decoder,
            Err(err) => {
                warn!("decoder unavailable: {}", err);
                shared.camera.detach();
                stream.release();
                shared.abandon(generation);
                return Err(err);
            }
        };

        let mut session = shared.session.borrow_mut();
        session.stream = Some(stream);
        session.decoder = Some(decoder);
        session.state = ScanState::Active;
        info!("scanner active ({} camera)", facing.as_str());
        Ok(())
    }

    /// Release everything and return to `Idle`. Safe from any state,
    /// any number of times.
    pub fn stop(&self) {
        self.shared.shutdown();
    }

    pub fn state(&self) -> ScanState {
        self.shared.session.borrow().state
    }

    /// Scanner UI should be shown
    pub fn is_scanner_active(&self) -> bool {
        self.state() != ScanState::Idle
    }

    /// Camera request in flight
    pub fn is_loading(&self) -> bool {
        self.state() == ScanState::Acquiring
    }

    pub fn scan_result(&self) -> Option<String> {
        self.shared
            .session
            .borrow()
            .last_result
            .as_ref()
            .map(|result| result.payload.clone())
    }

    pub fn result(&self) -> Option<ScanResult> {
        self.shared.session.borrow().last_result.clone()
    }

    /// The downstream scene is revealed while a result is on screen
    pub fn should_reveal_scene(&self) -> bool {
        self.shared.session.borrow().last_result.is_some()
    }

    /// Stream and decoder are both held
    pub fn holds_handles(&self) -> bool {
        let session = self.shared.session.borrow();
        session.stream.is_some() && session.decoder.is_some()
    }

    /// Stream or decoder is held
    pub fn holds_any_handle(&self) -> bool {
        let session = self.shared.session.borrow();
        session.stream.is_some() || session.decoder.is_some()
    }

    /// Applies to sessions started afterwards
    pub fn set_config(&self, config: ScanConfig) {
        *self.shared.config.borrow_mut() = config;
    }

    pub fn config(&self) -> ScanConfig {
        self.shared.config.borrow().clone()
    }
}

impl<C, F> Shared<C, F>
where
    C: Camera + 'static,
    F: DecoderFactory + 'static,
{
    /// Failed start: nothing is held yet, just fall back to Idle
    fn abandon(&self, generation: u64) {
        let mut session = self.session.borrow_mut();
        if session.is_current(generation) {
            session.state = ScanState::Idle;
        }
    }

    /// Invalidate the current session and release its handles.
    ///
    /// Handles are taken out before any collaborator is called so no borrow
    /// is held while the platform runs; `Idle` is set only once they are gone.
    fn shutdown(&self) {
        let (stream, decoder, expiry) = {
            let mut session = self.session.borrow_mut();
            session.generation += 1;
            session.state = ScanState::Stopping;
            (
                session.stream.take(),
                session.decoder.take(),
                session.expiry.take(),
            )
        };

        if let Some(handle) = expiry {
            self.scheduler.cancel(handle);
        }
        if let Some(mut decoder) = decoder {
            decoder.stop();
            decoder.destroy();
        }
        if let Some(mut stream) = stream {
            self.camera.detach();
            stream.release();
            debug!("camera released");
        }

        let mut session = self.session.borrow_mut();
        session.last_result = None;
        session.state = ScanState::Idle;
    }

    fn handle_decode(self: &Rc<Self>, generation: u64, report: DecodeReport) {
        let payload = match report {
            Ok(payload) => payload,
            Err(_) => return,
        };

        let Ok(mut session) = self.session.try_borrow_mut() else {
            warn!("decode callback re-entered the scanner, dropped");
            return;
        };
        if !session.is_current(generation) || session.state != ScanState::Active {
            debug!("decode ignored in {} state", session.state.as_str());
            return;
        }

        let ttl_ms = self.config.borrow().result_ttl_ms;
        session.last_result = Some(ScanResult {
            payload,
            expires_at_ms: self.scheduler.now_ms() + f64::from(ttl_ms),
        });
        session.state = ScanState::Resulted;
        if let Some(decoder) = session.decoder.as_mut() {
            decoder.stop();
        }

        let weak: Weak<Self> = Rc::downgrade(self);
        let handle = self.scheduler.schedule(
            Duration::from_millis(u64::from(ttl_ms)),
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.expire(generation);
                }
            }),
        );
        session.expiry = Some(handle);
        info!("code scanned, result held for {} ms", ttl_ms);
    }

    fn expire(&self, generation: u64) {
        {
            let mut session = self.session.borrow_mut();
            if !session.is_current(generation) || session.state != ScanState::Resulted {
                return;
            }
            // already fired, nothing to cancel
            session.expiry = None;
        }
        info!("scan result expired");
        self.shutdown();
    }
}
