use image::RgbImage;
use std::sync::Arc;

use super::CameraError;
use crate::config::CameraConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    /// Rear camera, pointed at the issue
    Environment,
    User,
}

/// Requested stream shape. Ideal values; devices may deliver something else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConstraints {
    pub facing: Facing,
    pub ideal_width: u32,
    pub ideal_height: u32,
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self {
            facing: Facing::Environment,
            ideal_width: 1280,
            ideal_height: 720,
        }
    }
}

impl From<&CameraConfig> for StreamConstraints {
    fn from(config: &CameraConfig) -> Self {
        Self {
            facing: Facing::Environment,
            ideal_width: config.ideal_width,
            ideal_height: config.ideal_height,
        }
    }
}

/// A camera that can hand out video streams.
pub trait CameraDevice: Send + Sync {
    /// Acquire the hardware. May block.
    fn open(&self, constraints: &StreamConstraints) -> Result<Box<dyn VideoStream>, CameraError>;

    fn name(&self) -> String;
}

/// A live video stream holding the camera hardware.
pub trait VideoStream: Send {
    /// True once the first frame has decoded and playback has begun.
    fn poll_ready(&mut self) -> bool;

    /// Native resolution of the current frame; (0, 0) before the first frame.
    fn dimensions(&self) -> (u32, u32);

    /// Copy of the current frame at native resolution
    fn grab_frame(&mut self) -> Result<RgbImage, String>;

    /// Release the hardware. Safe to call more than once.
    fn stop(&mut self);
}

/// The one live stream, plus its readiness.
pub struct CameraSession {
    stream: Box<dyn VideoStream>,
    ready: bool,
    generation: u64,
}

impl CameraSession {
    fn new(stream: Box<dyn VideoStream>, generation: u64) -> Self {
        Self {
            stream,
            ready: false,
            generation,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.stream.dimensions()
    }

    pub fn grab_frame(&mut self) -> Result<RgbImage, String> {
        self.stream.grab_frame()
    }

    fn poll_ready(&mut self) -> bool {
        if !self.ready {
            self.ready = self.stream.poll_ready();
        }
        self.ready
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.stream.stop();
    }
}

/// Ticket for a stream request; the open runs elsewhere and its result is
/// handed back through [`CameraStreamManager::attach`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartTicket {
    pub generation: u64,
}

#[derive(Debug, PartialEq, Eq)]
pub enum AttachOutcome {
    /// Stream is now the live session
    Attached,
    /// Request was superseded; the stream has been released
    Stale,
    Failed(CameraError),
}

/// Sole owner of the camera hardware.
///
/// Holds at most one [`CameraSession`] and at most one request in flight.
/// Every stop bumps the generation, so a stream that arrives for an older
/// request is released on arrival instead of becoming a second session.
pub struct CameraStreamManager {
    device: Arc<dyn CameraDevice>,
    constraints: StreamConstraints,
    session: Option<CameraSession>,
    generation: u64,
    in_flight: Option<u64>,
}

impl CameraStreamManager {
    pub fn new(device: Arc<dyn CameraDevice>, constraints: StreamConstraints) -> Self {
        Self {
            device,
            constraints,
            session: None,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn device(&self) -> Arc<dyn CameraDevice> {
        self.device.clone()
    }

    pub fn constraints(&self) -> StreamConstraints {
        self.constraints
    }

    /// Begin a stream request.
    ///
    /// Returns `None` when a session is already live or a request is
    /// already in flight.
    pub fn begin_start(&mut self) -> Option<StartTicket> {
        if self.session.is_some() || self.in_flight.is_some() {
            return None;
        }

        self.generation += 1;
        self.in_flight = Some(self.generation);
        tracing::debug!(generation = self.generation, "Camera stream requested");
        Some(StartTicket {
            generation: self.generation,
        })
    }

    /// Deliver the result of the request identified by `generation`.
    pub fn attach(
        &mut self,
        generation: u64,
        result: Result<Box<dyn VideoStream>, CameraError>,
    ) -> AttachOutcome {
        if self.in_flight != Some(generation) {
            if let Ok(mut stream) = result {
                stream.stop();
            }
            tracing::debug!(generation, "Released stale camera stream");
            return AttachOutcome::Stale;
        }

        self.in_flight = None;
        match result {
            Ok(stream) => {
                self.session = Some(CameraSession::new(stream, generation));
                tracing::info!(generation, "Camera stream started");
                AttachOutcome::Attached
            }
            Err(e) => {
                tracing::warn!(generation, error = %e, "Camera stream failed");
                AttachOutcome::Failed(e)
            }
        }
    }

    /// Release the live session and abandon any request in flight.
    /// Returns true if a session was live.
    pub fn stop(&mut self) -> bool {
        self.in_flight = None;
        self.generation += 1;

        match self.session.take() {
            Some(session) => {
                tracing::info!(generation = session.generation(), "Camera stream stopped");
                drop(session);
                true
            }
            None => false,
        }
    }

    /// Advance readiness of the live session.
    pub fn poll_ready(&mut self) -> bool {
        self.session.as_mut().is_some_and(|s| s.poll_ready())
    }

    pub fn session_mut(&mut self) -> Option<&mut CameraSession> {
        self.session.as_mut()
    }

    pub fn is_live(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_ready(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_ready())
    }

    pub fn start_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.session.as_ref().map(|s| s.dimensions())
    }
}

impl Drop for CameraStreamManager {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Camera double that counts live streams and stop calls.
    pub(crate) struct FakeCamera {
        pub live: Arc<AtomicUsize>,
        pub opened: AtomicUsize,
        pub stops: Arc<AtomicUsize>,
        pub frame: Mutex<RgbImage>,
        pub ready: Arc<AtomicBool>,
        pub fail_with: Mutex<Option<CameraError>>,
        pub open_delay: Duration,
    }

    impl FakeCamera {
        pub(crate) fn new(frame: RgbImage) -> Self {
            Self {
                live: Arc::new(AtomicUsize::new(0)),
                opened: AtomicUsize::new(0),
                stops: Arc::new(AtomicUsize::new(0)),
                frame: Mutex::new(frame),
                ready: Arc::new(AtomicBool::new(true)),
                fail_with: Mutex::new(None),
                open_delay: Duration::ZERO,
            }
        }

        pub(crate) fn live_streams(&self) -> usize {
            self.live.load(Ordering::SeqCst)
        }
    }

    impl CameraDevice for FakeCamera {
        fn open(
            &self,
            _constraints: &StreamConstraints,
        ) -> Result<Box<dyn VideoStream>, CameraError> {
            if !self.open_delay.is_zero() {
                std::thread::sleep(self.open_delay);
            }
            if let Some(err) = self.fail_with.lock().unwrap().clone() {
                return Err(err);
            }

            self.opened.fetch_add(1, Ordering::SeqCst);
            self.live.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FakeStream {
                frame: self.frame.lock().unwrap().clone(),
                ready: self.ready.clone(),
                live: self.live.clone(),
                stops: self.stops.clone(),
                stopped: false,
            }))
        }

        fn name(&self) -> String {
            "fake".to_string()
        }
    }

    struct FakeStream {
        frame: RgbImage,
        ready: Arc<AtomicBool>,
        live: Arc<AtomicUsize>,
        stops: Arc<AtomicUsize>,
        stopped: bool,
    }

    impl VideoStream for FakeStream {
        fn poll_ready(&mut self) -> bool {
            !self.stopped && self.ready.load(Ordering::SeqCst)
        }

        fn dimensions(&self) -> (u32, u32) {
            self.frame.dimensions()
        }

        fn grab_frame(&mut self) -> Result<RgbImage, String> {
            if self.stopped {
                return Err("stream stopped".to_string());
            }
            Ok(self.frame.clone())
        }

        fn stop(&mut self) {
            if !self.stopped {
                self.stopped = true;
                self.live.fetch_sub(1, Ordering::SeqCst);
                self.stops.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn open_sync(manager: &mut CameraStreamManager) -> AttachOutcome {
        let ticket = manager.begin_start().unwrap();
        let result = manager.device().open(&manager.constraints());
        manager.attach(ticket.generation, result)
    }

    #[test]
    fn test_second_start_is_noop_while_live() {
        let camera = Arc::new(FakeCamera::new(RgbImage::new(4, 4)));
        let mut manager = CameraStreamManager::new(camera.clone(), StreamConstraints::default());

        assert_eq!(open_sync(&mut manager), AttachOutcome::Attached);
        assert!(manager.begin_start().is_none());
        assert_eq!(camera.live_streams(), 1);
    }

    #[test]
    fn test_stale_stream_released_on_arrival() {
        let camera = Arc::new(FakeCamera::new(RgbImage::new(4, 4)));
        let mut manager = CameraStreamManager::new(camera.clone(), StreamConstraints::default());

        let ticket = manager.begin_start().unwrap();
        manager.stop();
        let late = camera.open(&StreamConstraints::default());
        assert_eq!(manager.attach(ticket.generation, late), AttachOutcome::Stale);
        assert_eq!(camera.live_streams(), 0);
        assert!(!manager.is_live());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let camera = Arc::new(FakeCamera::new(RgbImage::new(4, 4)));
        let mut manager = CameraStreamManager::new(camera.clone(), StreamConstraints::default());
        open_sync(&mut manager);

        assert!(manager.stop());
        assert!(!manager.stop());
        assert_eq!(camera.stops.load(Ordering::SeqCst), 1);
        assert_eq!(camera.live_streams(), 0);
    }

    #[test]
    fn test_failed_open_leaves_no_session() {
        let camera = Arc::new(FakeCamera::new(RgbImage::new(4, 4)));
        *camera.fail_with.lock().unwrap() = Some(CameraError::PermissionDenied);
        let mut manager = CameraStreamManager::new(camera.clone(), StreamConstraints::default());

        assert_eq!(
            open_sync(&mut manager),
            AttachOutcome::Failed(CameraError::PermissionDenied)
        );
        assert!(!manager.is_live());
        assert!(!manager.start_in_flight());
        // a retry is accepted
        assert!(manager.begin_start().is_some());
    }

    #[test]
    fn test_readiness_follows_stream() {
        let camera = Arc::new(FakeCamera::new(RgbImage::new(4, 4)));
        camera.ready.store(false, Ordering::SeqCst);
        let mut manager = CameraStreamManager::new(camera.clone(), StreamConstraints::default());
        open_sync(&mut manager);

        assert!(!manager.poll_ready());
        camera.ready.store(true, Ordering::SeqCst);
        assert!(manager.poll_ready());
        assert!(manager.is_ready());
    }

    #[test]
    fn test_drop_releases_session() {
        let camera = Arc::new(FakeCamera::new(RgbImage::new(4, 4)));
        {
            let mut manager =
                CameraStreamManager::new(camera.clone(), StreamConstraints::default());
            open_sync(&mut manager);
            assert_eq!(camera.live_streams(), 1);
        }
        assert_eq!(camera.live_streams(), 0);
    }
}
