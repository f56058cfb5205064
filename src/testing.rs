//! Test doubles for the platform capabilities
//!
//! Everything here is single-threaded and records what the code under test
//! did so assertions can inspect it afterwards.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;

use crate::error::AcquisitionError;
use crate::gesture::{ChallengeOutcome, DrawingSurface, GesturePath, Notifier, Player, Point};
use crate::scanner::{
    Camera, DecodeCallback, DecodeReport, Decoder, DecoderFactory, FacingMode, ScanController,
    StreamHandle,
};
use crate::timing::{Scheduler, Task, TimerHandle};

// ============================================================================
// SCHEDULER
// ============================================================================

/// Virtual clock; callbacks run only inside `advance`
pub struct ManualScheduler {
    now: Cell<f64>,
    next_id: Cell<i32>,
    queue: RefCell<Vec<(TimerHandle, f64, Task)>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            now: Cell::new(0.0),
            next_id: Cell::new(1),
            queue: RefCell::new(Vec::new()),
        }
    }

    /// Move the clock forward, running due callbacks in order
    pub fn advance(&self, ms: u64) {
        let target = self.now.get() + ms as f64;

        loop {
            let next = {
                let mut queue = self.queue.borrow_mut();
                let earliest = queue
                    .iter()
                    .enumerate()
                    .filter(|(_, entry)| entry.1 <= target)
                    .min_by(|(_, a), (_, b)| a.1.total_cmp(&b.1).then(a.0 .0.cmp(&b.0 .0)))
                    .map(|(index, _)| index);
                earliest.map(|index| queue.remove(index))
            };

            match next {
                Some((_, due, task)) => {
                    self.now.set(due);
                    task();
                }
                None => break,
            }
        }

        self.now.set(target);
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl Scheduler for ManualScheduler {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }

    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
        let handle = TimerHandle(self.next_id.get());
        self.next_id.set(handle.0 + 1);
        let due = self.now.get() + delay.as_millis() as f64;
        self.queue.borrow_mut().push((handle, due, task));
        handle
    }

    fn cancel(&self, handle: TimerHandle) {
        self.queue.borrow_mut().retain(|(h, _, _)| *h != handle);
    }
}

// ============================================================================
// CAMERA
// ============================================================================

/// Scripted answer to one camera request
pub enum Grant {
    Tracks(usize),
    Fail(AcquisitionError),
    /// Hold the request until `FakeCamera::resolve`
    Pending,
}

#[derive(Debug)]
pub struct FakeStream {
    tracks: usize,
    released: bool,
    live: Rc<Cell<usize>>,
}

impl FakeStream {
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl StreamHandle for FakeStream {
    fn video_track_count(&self) -> usize {
        self.tracks
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.live.set(self.live.get() - 1);
        }
    }
}

#[derive(Default)]
struct CameraLog {
    scripts: RefCell<Vec<(FacingMode, Grant)>>,
    requests: RefCell<Vec<FacingMode>>,
    pending: RefCell<Option<oneshot::Sender<Grant>>>,
    live: Rc<Cell<usize>>,
    attached: Cell<bool>,
    attach_failure: RefCell<Option<AcquisitionError>>,
}

/// Camera whose answers are scripted per facing mode. Unscripted requests
/// get a stream with one video track.
#[derive(Clone, Default)]
pub struct FakeCamera {
    log: Rc<CameraLog>,
}

impl FakeCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, facing: FacingMode, grant: Grant) {
        self.log.scripts.borrow_mut().push((facing, grant));
    }

    /// Answer the request parked by `Grant::Pending`
    pub fn resolve(&self, grant: Grant) {
        if let Some(sender) = self.log.pending.borrow_mut().take() {
            let _ = sender.send(grant);
        }
    }

    /// Next `attach` points the sink at the stream, then fails like a
    /// rejected `play()`
    pub fn fail_next_attach(&self, err: AcquisitionError) {
        *self.log.attach_failure.borrow_mut() = Some(err);
    }

    pub fn requests(&self) -> Vec<FacingMode> {
        self.log.requests.borrow().clone()
    }

    /// Streams handed out and not yet released
    pub fn live_streams(&self) -> usize {
        self.log.live.get()
    }

    pub fn is_attached(&self) -> bool {
        self.log.attached.get()
    }

    fn next_grant(&self, facing: FacingMode) -> Grant {
        let mut scripts = self.log.scripts.borrow_mut();
        match scripts.iter().position(|(f, _)| *f == facing) {
            Some(index) => scripts.remove(index).1,
            None => Grant::Tracks(1),
        }
    }
}

impl Camera for FakeCamera {
    type Stream = FakeStream;

    async fn acquire(&self, facing: FacingMode) -> Result<FakeStream, AcquisitionError> {
        self.log.requests.borrow_mut().push(facing);

        let grant = match self.next_grant(facing) {
            Grant::Pending => {
                let (sender, receiver) = oneshot::channel();
                *self.log.pending.borrow_mut() = Some(sender);
                receiver
                    .await
                    .unwrap_or(Grant::Fail(AcquisitionError::Platform("request dropped".into())))
            }
            grant => grant,
        };

        match grant {
            Grant::Tracks(tracks) => {
                self.log.live.set(self.log.live.get() + 1);
                Ok(FakeStream {
                    tracks,
                    released: false,
                    live: Rc::clone(&self.log.live),
                })
            }
            Grant::Fail(err) => Err(err),
            Grant::Pending => Err(AcquisitionError::Platform("nested pending grant".into())),
        }
    }

    fn attach(&self, _stream: &FakeStream) -> Result<(), AcquisitionError> {
        self.log.attached.set(true);
        match self.log.attach_failure.borrow_mut().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn detach(&self) {
        self.log.attached.set(false);
    }
}

// ============================================================================
// DECODER
// ============================================================================

#[derive(Default)]
struct DecoderLog {
    callback: RefCell<Option<DecodeCallback>>,
    created: Cell<usize>,
    destroyed: Cell<usize>,
    running: Cell<bool>,
    fail_next: RefCell<Option<AcquisitionError>>,
}

pub struct FakeDecoder {
    log: Rc<DecoderLog>,
    destroyed: bool,
}

impl Decoder for FakeDecoder {
    fn start(&mut self) -> Result<(), AcquisitionError> {
        self.log.running.set(true);
        Ok(())
    }

    fn stop(&mut self) {
        self.log.running.set(false);
    }

    fn destroy(&mut self) {
        if !self.destroyed {
            self.destroyed = true;
            self.log.running.set(false);
            self.log.destroyed.set(self.log.destroyed.get() + 1);
            self.log.callback.borrow_mut().take();
        }
    }
}

/// Decoder factory that lets tests push decode reports by hand
#[derive(Clone, Default)]
pub struct FakeDecoderFactory {
    log: Rc<DecoderLog>,
}

impl FakeDecoderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_create(&self, err: AcquisitionError) {
        *self.log.fail_next.borrow_mut() = Some(err);
    }

    /// Deliver a report through the live decoder's callback, if any
    pub fn emit(&self, report: DecodeReport) {
        let callback = self.log.callback.borrow_mut().take();
        let Some(mut callback) = callback else {
            return;
        };

        let epoch = (self.log.created.get(), self.log.destroyed.get());
        callback(report);

        // put it back unless the decoder was replaced or destroyed meanwhile
        let mut slot = self.log.callback.borrow_mut();
        if slot.is_none() && epoch == (self.log.created.get(), self.log.destroyed.get()) {
            *slot = Some(callback);
        }
    }

    /// Steal the live callback, e.g. to fire it after its session ended
    pub fn take_callback(&self) -> Option<DecodeCallback> {
        self.log.callback.borrow_mut().take()
    }

    pub fn created(&self) -> usize {
        self.log.created.get()
    }

    pub fn destroyed(&self) -> usize {
        self.log.destroyed.get()
    }

    pub fn live_decoders(&self) -> usize {
        self.created() - self.destroyed()
    }

    pub fn is_running(&self) -> bool {
        self.log.running.get()
    }
}

impl DecoderFactory for FakeDecoderFactory {
    type Decoder = FakeDecoder;

    fn create(&self, on_decode: DecodeCallback) -> Result<FakeDecoder, AcquisitionError> {
        if let Some(err) = self.log.fail_next.borrow_mut().take() {
            return Err(err);
        }
        self.log.created.set(self.log.created.get() + 1);
        *self.log.callback.borrow_mut() = Some(on_decode);
        Ok(FakeDecoder {
            log: Rc::clone(&self.log),
            destroyed: false,
        })
    }
}

/// Run `controller.start()` on `pool`; the slot fills when it resolves
pub fn spawn_start(
    pool: &LocalPool,
    controller: &ScanController<FakeCamera, FakeDecoderFactory>,
) -> Rc<RefCell<Option<Result<(), AcquisitionError>>>> {
    let slot = Rc::new(RefCell::new(None));
    let out = Rc::clone(&slot);
    let controller = controller.clone();
    pool.spawner()
        .spawn_local(async move {
            let result = controller.start().await;
            *out.borrow_mut() = Some(result);
        })
        .expect("spawn start");
    slot
}

// ============================================================================
// CHALLENGE COLLABORATORS
// ============================================================================

#[derive(Default)]
pub struct FakePlayer {
    pauses: Cell<usize>,
    plays: Cell<usize>,
}

impl FakePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pauses(&self) -> usize {
        self.pauses.get()
    }

    pub fn plays(&self) -> usize {
        self.plays.get()
    }
}

impl Player for FakePlayer {
    fn pause(&self) {
        self.pauses.set(self.pauses.get() + 1);
    }

    fn play(&self) {
        self.plays.set(self.plays.get() + 1);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCall {
    Clear,
    /// Guide drawn with this many points
    Guide(usize),
    Stroke(Point, Point),
}

pub struct FakeSurface {
    size: (f64, f64),
    calls: RefCell<Vec<SurfaceCall>>,
}

impl FakeSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: (width, height),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.borrow().clone()
    }
}

impl DrawingSurface for FakeSurface {
    fn size(&self) -> (f64, f64) {
        self.size
    }

    fn clear(&self) {
        self.calls.borrow_mut().push(SurfaceCall::Clear);
    }

    fn draw_guide(&self, target: &GesturePath) {
        self.calls.borrow_mut().push(SurfaceCall::Guide(target.len()));
    }

    fn draw_stroke(&self, from: Point, to: Point) {
        self.calls.borrow_mut().push(SurfaceCall::Stroke(from, to));
    }
}

#[derive(Default)]
pub struct FakeNotifier {
    outcomes: RefCell<Vec<ChallengeOutcome>>,
}

impl FakeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcomes(&self) -> Vec<ChallengeOutcome> {
        self.outcomes.borrow().clone()
    }
}

impl Notifier for FakeNotifier {
    fn announce(&self, outcome: &ChallengeOutcome) {
        self.outcomes.borrow_mut().push(*outcome);
    }
}
