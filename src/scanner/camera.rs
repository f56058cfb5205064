//! Camera capability and facing-mode fallback

use log::{debug, warn};

use crate::error::AcquisitionError;

/// Camera-selection preference
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FacingMode {
    /// Rear camera
    Environment,
    /// Selfie camera
    User,
}

impl FacingMode {
    /// Value of the `facingMode` media constraint
    pub fn as_str(&self) -> &'static str {
        match self {
            FacingMode::Environment => "environment",
            FacingMode::User => "user",
        }
    }
}

/// A live media stream owned by a scan session
pub trait StreamHandle {
    fn video_track_count(&self) -> usize;

    /// Stop every track. Must be safe to call twice.
    fn release(&mut self);
}

/// Platform camera plus the video sink the decoder reads from
#[allow(async_fn_in_trait)]
pub trait Camera {
    type Stream: StreamHandle + 'static;

    async fn acquire(&self, facing: FacingMode) -> Result<Self::Stream, AcquisitionError>;

    /// Route the stream into the video sink
    fn attach(&self, stream: &Self::Stream) -> Result<(), AcquisitionError>;

    /// Disconnect whatever stream the sink currently shows
    fn detach(&self);
}

/// Try each facing mode in order until one yields a video track.
///
/// A stream without video tracks is released before moving on. Permission
/// denial (and other non-device errors) stops the walk immediately.
///
/// `is_wanted` is checked before every request; once it turns false the walk
/// ends with `Ok(None)` and no further camera is requested.
pub async fn acquire_with_fallback<C: Camera>(
    camera: &C,
    order: &[FacingMode],
    is_wanted: &dyn Fn() -> bool,
) -> Result<Option<(C::Stream, FacingMode)>, AcquisitionError> {
    let mut last_err = AcquisitionError::NoVideoTrack;

    for &facing in order {
        if !is_wanted() {
            debug!("camera no longer wanted, skipping {} request", facing.as_str());
            return Ok(None);
        }

        match camera.acquire(facing).await {
            Ok(stream) if stream.video_track_count() > 0 => {
                debug!("camera acquired ({})", facing.as_str());
                return Ok(Some((stream, facing)));
            }
            Ok(mut stream) => {
                debug!("{} camera gave no video track, trying next", facing.as_str());
                stream.release();
                last_err = AcquisitionError::NoVideoTrack;
            }
            Err(err) if err.allows_fallback() => {
                debug!("{} camera unavailable: {}", facing.as_str(), err);
                last_err = err;
            }
            Err(err) => {
                warn!("camera acquisition failed: {}", err);
                return Err(err);
            }
        }
    }

    Err(last_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeCamera, Grant};
    use futures::executor::block_on;

    const BOTH: [FacingMode; 2] = [FacingMode::Environment, FacingMode::User];

    fn wanted() -> bool {
        true
    }

    #[test]
    fn test_rear_camera_preferred() {
        let camera = FakeCamera::new();
        camera.script(FacingMode::Environment, Grant::Tracks(1));

        let (_, facing) =
            block_on(acquire_with_fallback(&camera, &BOTH, &wanted)).unwrap().unwrap();
        assert_eq!(facing, FacingMode::Environment);
        assert_eq!(camera.requests(), vec![FacingMode::Environment]);
    }

    #[test]
    fn test_falls_back_when_rear_has_no_track() {
        let camera = FakeCamera::new();
        camera.script(FacingMode::Environment, Grant::Tracks(0));
        camera.script(FacingMode::User, Grant::Tracks(1));

        let (stream, facing) =
            block_on(acquire_with_fallback(&camera, &BOTH, &wanted)).unwrap().unwrap();
        assert_eq!(facing, FacingMode::User);
        assert!(!stream.is_released());
        // the empty rear stream was not leaked
        assert_eq!(camera.live_streams(), 1);
    }

    #[test]
    fn test_falls_back_when_rear_missing() {
        let camera = FakeCamera::new();
        camera.script(FacingMode::Environment, Grant::Fail(AcquisitionError::NoDevice));
        camera.script(FacingMode::User, Grant::Tracks(2));

        let (_, facing) =
            block_on(acquire_with_fallback(&camera, &BOTH, &wanted)).unwrap().unwrap();
        assert_eq!(facing, FacingMode::User);
    }

    #[test]
    fn test_permission_denied_skips_fallback() {
        let camera = FakeCamera::new();
        camera.script(FacingMode::Environment, Grant::Fail(AcquisitionError::PermissionDenied));
        camera.script(FacingMode::User, Grant::Tracks(1));

        let err = block_on(acquire_with_fallback(&camera, &BOTH, &wanted)).unwrap_err();
        assert_eq!(err, AcquisitionError::PermissionDenied);
        assert_eq!(camera.requests(), vec![FacingMode::Environment]);
    }

    #[test]
    fn test_no_track_anywhere() {
        let camera = FakeCamera::new();
        camera.script(FacingMode::Environment, Grant::Tracks(0));
        camera.script(FacingMode::User, Grant::Tracks(0));

        let err = block_on(acquire_with_fallback(&camera, &BOTH, &wanted)).unwrap_err();
        assert_eq!(err, AcquisitionError::NoVideoTrack);
        assert_eq!(camera.live_streams(), 0);
    }

    #[test]
    fn test_unwanted_walk_requests_nothing_more() {
        let camera = FakeCamera::new();
        camera.script(FacingMode::Environment, Grant::Tracks(0));
        // only the first request is still wanted
        let first = std::cell::Cell::new(true);
        let is_wanted = || first.replace(false);

        let acquired = block_on(acquire_with_fallback(&camera, &BOTH, &is_wanted)).unwrap();

        assert!(acquired.is_none());
        assert_eq!(camera.requests(), vec![FacingMode::Environment]);
        assert_eq!(camera.live_streams(), 0);
    }
}
