//! Capture workflow state machine.
//!
//! ```text
//! Idle --mount--> Starting --stream ready--> Ready --capture--> Captured
//!                    ^                                              |
//!                    +---------------- retake (after delay) --------+
//! ```
//!
//! Camera acquisition and geolocation run as independent tasks and report
//! back through a channel drained by [`CaptureWorkflow::poll`]. Neither
//! waits for the other. Unmounting (or dropping the workflow) releases the
//! camera and discards any location result that arrives afterwards.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::camera::{
    AttachOutcome, CameraDevice, CameraStreamManager, StreamConstraints, VideoStream,
};
use super::geo::{GeoFix, GeolocationProvider, Position, PositionOptions};
use super::pipeline::{self, CapturePolicy, CapturedImage};
use super::{CameraError, CaptureRejection, GeoFailure};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    Starting,
    Ready,
    Captured,
}

enum WorkflowEvent {
    StreamOpened {
        generation: u64,
        result: Result<Box<dyn VideoStream>, CameraError>,
    },
    Located {
        mount: u64,
        result: Result<Position, GeoFailure>,
    },
    RestartDue {
        retake: u64,
    },
}

pub struct CaptureWorkflow {
    cameras: CameraStreamManager,
    geolocation: Arc<dyn GeolocationProvider>,
    position_options: PositionOptions,
    policy: CapturePolicy,
    retake_delay: Duration,

    state: WorkflowState,
    geofix: GeoFix,
    captured: Option<CapturedImage>,
    camera_error: Option<CameraError>,
    last_rejection: Option<CaptureRejection>,
    mounted: bool,
    /// Bumped by every mount; location results from older mounts are dropped
    mount_count: u64,

    events_tx: mpsc::UnboundedSender<WorkflowEvent>,
    events_rx: mpsc::UnboundedReceiver<WorkflowEvent>,
    geo_task: Option<JoinHandle<()>>,
    geo_cancel: Arc<AtomicBool>,
    restart_task: Option<JoinHandle<()>>,
    /// Bumped by every retake; only the latest scheduled restart may run
    retake_count: u64,
    restart_pending: bool,
}

impl CaptureWorkflow {
    pub fn new(
        camera: Arc<dyn CameraDevice>,
        constraints: StreamConstraints,
        geolocation: Arc<dyn GeolocationProvider>,
        position_options: PositionOptions,
        policy: CapturePolicy,
        retake_delay: Duration,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            cameras: CameraStreamManager::new(camera, constraints),
            geolocation,
            position_options,
            policy,
            retake_delay,
            state: WorkflowState::Idle,
            geofix: GeoFix::pending(),
            captured: None,
            camera_error: None,
            last_rejection: None,
            mounted: false,
            mount_count: 0,
            events_tx,
            events_rx,
            geo_task: None,
            geo_cancel: Arc::new(AtomicBool::new(false)),
            restart_task: None,
            retake_count: 0,
            restart_pending: false,
        }
    }

    /// Start geolocation and the camera. Must run inside a Tokio runtime.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.mount_count += 1;
        tracing::debug!(mount = self.mount_count, "Capture workflow mounted");

        self.start_geolocation();
        self.start_camera();
    }

    /// Release the camera and ignore any results still in flight.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;

        self.geo_cancel.store(true, Ordering::SeqCst);
        if let Some(task) = self.geo_task.take() {
            task.abort();
        }
        if let Some(task) = self.restart_task.take() {
            task.abort();
        }
        self.restart_pending = false;

        if self.cameras.stop() {
            tracing::info!("Camera released on unmount");
        }
        if self.state != WorkflowState::Captured {
            self.state = WorkflowState::Idle;
        }
    }

    fn start_geolocation(&mut self) {
        self.geofix = GeoFix::pending();
        self.geo_cancel = Arc::new(AtomicBool::new(false));

        let provider = self.geolocation.clone();
        let options = self.position_options;
        let cancel = self.geo_cancel.clone();
        let tx = self.events_tx.clone();
        let mount = self.mount_count;

        self.geo_task = Some(tokio::spawn(async move {
            let lookup = tokio::task::spawn_blocking(move || provider.current_position(&options));
            let result = match tokio::time::timeout(options.timeout, lookup).await {
                Ok(Ok(result)) => result,
                Ok(Err(join_error)) => Err(GeoFailure::Unavailable(join_error.to_string())),
                Err(_) => Err(GeoFailure::Timeout),
            };

            if cancel.load(Ordering::SeqCst) {
                return;
            }
            let _ = tx.send(WorkflowEvent::Located { mount, result });
        }));
    }

    /// Request a stream unless one is live, requested, or an image is held.
    fn start_camera(&mut self) {
        if !self.mounted || self.captured.is_some() {
            return;
        }
        let Some(ticket) = self.cameras.begin_start() else {
            return;
        };

        self.state = WorkflowState::Starting;
        self.camera_error = None;

        let device = self.cameras.device();
        let constraints = self.cameras.constraints();
        let tx = self.events_tx.clone();

        tokio::task::spawn_blocking(move || {
            let result = device.open(&constraints);
            let event = WorkflowEvent::StreamOpened {
                generation: ticket.generation,
                result,
            };
            // Receiver gone: nobody will ever attach this stream
            if let Err(mpsc::error::SendError(WorkflowEvent::StreamOpened {
                result: Ok(mut stream),
                ..
            })) = tx.send(event)
            {
                stream.stop();
            }
        });
    }

    /// Apply results that arrived since the last call. Returns true if
    /// anything visible changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;

        while let Ok(event) = self.events_rx.try_recv() {
            changed = true;
            match event {
                WorkflowEvent::StreamOpened { generation, result } => {
                    match self.cameras.attach(generation, result) {
                        AttachOutcome::Attached | AttachOutcome::Stale => {}
                        AttachOutcome::Failed(e) => {
                            self.camera_error = Some(e);
                            self.state = WorkflowState::Idle;
                        }
                    }
                }
                WorkflowEvent::Located { mount, result } => {
                    if self.mounted && mount == self.mount_count && self.geofix.is_pending() {
                        match &result {
                            Ok(p) => tracing::info!(
                                lat = p.latitude,
                                lon = p.longitude,
                                "Location acquired"
                            ),
                            Err(e) => tracing::warn!(error = %e, "Location unavailable"),
                        }
                        self.geofix = GeoFix::from_result(result);
                    }
                }
                WorkflowEvent::RestartDue { retake } => {
                    if retake == self.retake_count {
                        self.restart_pending = false;
                        self.restart_task = None;
                        self.start_camera();
                    }
                }
            }
        }

        if self.state == WorkflowState::Starting && self.cameras.poll_ready() {
            tracing::debug!("Camera ready");
            self.state = WorkflowState::Ready;
            changed = true;
        }

        changed
    }

    /// Freeze the current frame. Rejections leave the workflow in `Ready`.
    pub fn capture(&mut self) -> Result<&CapturedImage, CaptureRejection> {
        if self.state != WorkflowState::Ready {
            return Err(CaptureRejection::NotReady);
        }

        match pipeline::capture(&mut self.cameras, &self.geofix, &self.policy) {
            Ok(image) => {
                self.last_rejection = None;
                self.state = WorkflowState::Captured;
                Ok(&*self.captured.insert(image))
            }
            Err(rejection) => {
                self.last_rejection = Some(rejection.clone());
                Err(rejection)
            }
        }
    }

    /// Discard the held image and restart the camera after the retake delay.
    pub fn retake(&mut self) {
        if !self.mounted {
            return;
        }

        self.captured = None;
        self.last_rejection = None;
        self.cameras.stop();
        self.state = WorkflowState::Starting;

        self.retake_count += 1;
        if let Some(task) = self.restart_task.take() {
            task.abort();
        }

        let retake = self.retake_count;
        let delay = self.retake_delay;
        let tx = self.events_tx.clone();
        self.restart_pending = true;
        self.restart_task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(WorkflowEvent::RestartDue { retake });
        }));
    }

    /// Try the camera again after an access error.
    pub fn retry_camera(&mut self) {
        if self.camera_error.is_some() {
            self.start_camera();
        }
    }

    /// Hand the held image to the caller, e.g. once it has been submitted.
    pub fn take_captured(&mut self) -> Option<CapturedImage> {
        let image = self.captured.take();
        if image.is_some() {
            self.state = WorkflowState::Idle;
        }
        image
    }

    /// Poll until no camera or location work is outstanding, or `limit`
    /// elapses.
    pub async fn settle(&mut self, limit: Duration) {
        let deadline = Instant::now() + limit;
        loop {
            self.poll();
            if self.is_settled() || Instant::now() >= deadline {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    fn is_settled(&self) -> bool {
        !self.cameras.start_in_flight()
            && !self.restart_pending
            && self.state != WorkflowState::Starting
            && !(self.mounted && self.geofix.is_pending())
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn geofix(&self) -> &GeoFix {
        &self.geofix
    }

    pub fn captured(&self) -> Option<&CapturedImage> {
        self.captured.as_ref()
    }

    pub fn camera_error(&self) -> Option<&CameraError> {
        self.camera_error.as_ref()
    }

    pub fn last_rejection(&self) -> Option<&CaptureRejection> {
        self.last_rejection.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn camera_live(&self) -> bool {
        self.cameras.is_live()
    }

    pub fn frame_dimensions(&self) -> Option<(u32, u32)> {
        self.cameras.dimensions()
    }

    pub fn camera_name(&self) -> String {
        self.cameras.device().name()
    }
}

impl Drop for CaptureWorkflow {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::camera::tests::FakeCamera;
    use crate::capture::pipeline::tests::{blank_frame, noisy_frame};
    use std::sync::atomic::AtomicUsize;

    const SETTLE: Duration = Duration::from_secs(2);

    struct FixedGeo(f64, f64);

    impl GeolocationProvider for FixedGeo {
        fn current_position(&self, _: &PositionOptions) -> Result<Position, GeoFailure> {
            Ok(Position::new(self.0, self.1))
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    /// Never answers within any reasonable timeout
    struct SilentGeo;

    impl GeolocationProvider for SilentGeo {
        fn current_position(&self, _: &PositionOptions) -> Result<Position, GeoFailure> {
            std::thread::sleep(Duration::from_millis(300));
            Ok(Position::new(1.0, 1.0))
        }

        fn name(&self) -> &str {
            "silent"
        }
    }

    struct DeniedGeo;

    impl GeolocationProvider for DeniedGeo {
        fn current_position(&self, _: &PositionOptions) -> Result<Position, GeoFailure> {
            Err(GeoFailure::PermissionDenied)
        }

        fn name(&self) -> &str {
            "denied"
        }
    }

    /// Answers after a delay, counting deliveries
    struct SlowGeo {
        delay: Duration,
        answered: Arc<AtomicUsize>,
    }

    impl GeolocationProvider for SlowGeo {
        fn current_position(&self, _: &PositionOptions) -> Result<Position, GeoFailure> {
            std::thread::sleep(self.delay);
            self.answered.fetch_add(1, Ordering::SeqCst);
            Ok(Position::new(2.0, 2.0))
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    fn workflow(
        camera: Arc<FakeCamera>,
        geo: Arc<dyn GeolocationProvider>,
        geo_timeout: Duration,
    ) -> CaptureWorkflow {
        CaptureWorkflow::new(
            camera,
            StreamConstraints::default(),
            geo,
            PositionOptions {
                timeout: geo_timeout,
                ..Default::default()
            },
            CapturePolicy::default(),
            Duration::from_millis(20),
        )
    }

    fn noisy_camera() -> Arc<FakeCamera> {
        Arc::new(FakeCamera::new(noisy_frame(128, 96)))
    }

    #[tokio::test]
    async fn test_location_attached_to_capture() {
        let camera = noisy_camera();
        let mut wf = workflow(
            camera.clone(),
            Arc::new(FixedGeo(15.3647, 75.1240)),
            Duration::from_secs(1),
        );

        wf.mount();
        wf.settle(SETTLE).await;
        assert_eq!(wf.state(), WorkflowState::Ready);
        assert_eq!(wf.geofix().coordinates(), Some((15.3647, 75.1240)));

        let image = wf.capture().unwrap();
        assert_eq!(image.coordinates(), Some((15.3647, 75.1240)));
        assert_eq!(wf.state(), WorkflowState::Captured);
        assert_eq!(camera.live_streams(), 0);
        assert_eq!(camera.stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_geolocation_timeout_still_captures() {
        let camera = noisy_camera();
        let mut wf = workflow(camera.clone(), Arc::new(SilentGeo), Duration::from_millis(30));

        wf.mount();
        wf.settle(SETTLE).await;
        assert_eq!(
            wf.geofix().status,
            crate::capture::GeoStatus::Failed(GeoFailure::Timeout)
        );

        let image = wf.capture().unwrap();
        assert_eq!(image.location, None);
    }

    #[tokio::test]
    async fn test_capture_before_location_resolves() {
        let camera = noisy_camera();
        let answered = Arc::new(AtomicUsize::new(0));
        let mut wf = workflow(
            camera.clone(),
            Arc::new(SlowGeo {
                delay: Duration::from_millis(150),
                answered: answered.clone(),
            }),
            Duration::from_secs(1),
        );

        wf.mount();
        while wf.state() != WorkflowState::Ready {
            wf.poll();
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        assert!(wf.geofix().is_pending());

        let image = wf.capture().unwrap();
        assert_eq!(image.location, None);

        // The fix still lands in workflow state afterwards
        wf.settle(SETTLE).await;
        assert_eq!(wf.geofix().coordinates(), Some((2.0, 2.0)));
        assert_eq!(wf.captured().unwrap().location, None);
    }

    #[tokio::test]
    async fn test_geolocation_denied_never_blocks_capture() {
        let camera = noisy_camera();
        let mut wf = workflow(camera, Arc::new(DeniedGeo), Duration::from_secs(1));

        wf.mount();
        wf.settle(SETTLE).await;
        assert_eq!(
            wf.geofix().status,
            crate::capture::GeoStatus::Failed(GeoFailure::PermissionDenied)
        );
        assert!(wf.capture().is_ok());
    }

    #[tokio::test]
    async fn test_capture_rejected_before_ready() {
        let camera = noisy_camera();
        camera.ready.store(false, Ordering::SeqCst);
        let mut wf = workflow(camera.clone(), Arc::new(DeniedGeo), Duration::from_secs(1));

        assert_eq!(wf.capture().unwrap_err(), CaptureRejection::NotReady);

        wf.mount();
        tokio::time::sleep(Duration::from_millis(50)).await;
        wf.poll();
        assert_eq!(wf.state(), WorkflowState::Starting);
        assert_eq!(wf.capture().unwrap_err(), CaptureRejection::NotReady);
        assert_eq!(camera.live_streams(), 1);

        camera.ready.store(true, Ordering::SeqCst);
        wf.settle(SETTLE).await;
        assert_eq!(wf.state(), WorkflowState::Ready);
    }

    #[tokio::test]
    async fn test_zero_sized_frame_rejected() {
        let camera = Arc::new(FakeCamera::new(image::RgbImage::new(0, 0)));
        let mut wf = workflow(camera.clone(), Arc::new(DeniedGeo), Duration::from_secs(1));

        wf.mount();
        wf.settle(SETTLE).await;
        assert_eq!(wf.capture().unwrap_err(), CaptureRejection::ZeroSizedFrame);
        assert_eq!(wf.state(), WorkflowState::Ready);
        assert_eq!(camera.live_streams(), 1);
    }

    #[tokio::test]
    async fn test_blank_frame_stays_ready() {
        let camera = Arc::new(FakeCamera::new(blank_frame()));
        let mut wf = workflow(camera.clone(), Arc::new(DeniedGeo), Duration::from_secs(1));

        wf.mount();
        wf.settle(SETTLE).await;
        assert!(matches!(
            wf.capture(),
            Err(CaptureRejection::PayloadTooSmall { .. })
        ));
        assert_eq!(wf.state(), WorkflowState::Ready);
        assert!(wf.captured().is_none());
        assert!(wf.last_rejection().is_some());
        assert_eq!(camera.live_streams(), 1);
    }

    #[tokio::test]
    async fn test_retake_reacquires_single_stream() {
        let camera = noisy_camera();
        let mut wf = workflow(camera.clone(), Arc::new(DeniedGeo), Duration::from_secs(1));

        wf.mount();
        wf.settle(SETTLE).await;
        wf.capture().unwrap();
        assert_eq!(camera.live_streams(), 0);

        wf.retake();
        assert!(wf.captured().is_none());
        assert_eq!(wf.state(), WorkflowState::Starting);

        wf.settle(SETTLE).await;
        assert_eq!(wf.state(), WorkflowState::Ready);
        assert_eq!(camera.live_streams(), 1);
        assert_eq!(camera.opened.load(Ordering::SeqCst), 2);

        assert!(wf.capture().is_ok());
        assert_eq!(camera.live_streams(), 0);
    }

    #[tokio::test]
    async fn test_double_retake_leaves_one_stream() {
        let camera = noisy_camera();
        let mut wf = workflow(camera.clone(), Arc::new(DeniedGeo), Duration::from_secs(1));

        wf.mount();
        wf.settle(SETTLE).await;
        wf.capture().unwrap();

        wf.retake();
        wf.retake();
        wf.settle(SETTLE).await;

        assert_eq!(wf.state(), WorkflowState::Ready);
        assert_eq!(camera.live_streams(), 1);
        assert_eq!(camera.opened.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_rapid_retake_while_opening_never_leaks() {
        let camera = Arc::new(FakeCamera {
            open_delay: Duration::from_millis(30),
            ..FakeCamera::new(noisy_frame(64, 64))
        });
        let mut wf = workflow(camera.clone(), Arc::new(DeniedGeo), Duration::from_secs(1));

        wf.mount();
        // open for the mount is still in flight
        wf.retake();
        tokio::time::sleep(Duration::from_millis(10)).await;
        wf.retake();

        wf.settle(SETTLE).await;
        // let the superseded open finish and be released
        tokio::time::sleep(Duration::from_millis(60)).await;
        wf.poll();

        assert_eq!(wf.state(), WorkflowState::Ready);
        assert_eq!(camera.live_streams(), 1);
    }

    #[tokio::test]
    async fn test_unmount_releases_live_session() {
        let camera = noisy_camera();
        let mut wf = workflow(camera.clone(), Arc::new(DeniedGeo), Duration::from_secs(1));

        wf.mount();
        wf.settle(SETTLE).await;
        assert_eq!(camera.live_streams(), 1);

        wf.unmount();
        assert_eq!(camera.live_streams(), 0);
        assert!(!wf.camera_live());

        wf.unmount();
        assert_eq!(camera.stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_drop_releases_live_session() {
        let camera = noisy_camera();
        {
            let mut wf = workflow(camera.clone(), Arc::new(DeniedGeo), Duration::from_secs(1));
            wf.mount();
            wf.settle(SETTLE).await;
            assert_eq!(camera.live_streams(), 1);
        }
        assert_eq!(camera.live_streams(), 0);
    }

    #[tokio::test]
    async fn test_location_after_unmount_ignored() {
        let camera = noisy_camera();
        let answered = Arc::new(AtomicUsize::new(0));
        let mut wf = workflow(
            camera,
            Arc::new(SlowGeo {
                delay: Duration::from_millis(40),
                answered: answered.clone(),
            }),
            Duration::from_secs(1),
        );

        wf.mount();
        wf.unmount();
        tokio::time::sleep(Duration::from_millis(100)).await;
        wf.poll();

        assert!(wf.geofix().is_pending());
    }

    /// Answers at once the first time, slowly after that
    struct FirstFastGeo {
        calls: AtomicUsize,
    }

    impl GeolocationProvider for FirstFastGeo {
        fn current_position(&self, _: &PositionOptions) -> Result<Position, GeoFailure> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                return Ok(Position::new(3.0, 3.0));
            }
            std::thread::sleep(Duration::from_millis(300));
            Ok(Position::new(4.0, 4.0))
        }

        fn name(&self) -> &str {
            "first-fast"
        }
    }

    #[tokio::test]
    async fn test_location_from_previous_mount_ignored() {
        let geo = Arc::new(FirstFastGeo {
            calls: AtomicUsize::new(0),
        });
        let mut wf = workflow(noisy_camera(), geo.clone(), Duration::from_secs(1));

        wf.mount();
        // let the first fix reach the channel without applying it
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(geo.calls.load(Ordering::SeqCst), 1);

        wf.unmount();
        wf.mount();
        wf.poll();
        assert!(wf.geofix().is_pending());

        wf.settle(SETTLE).await;
        assert_eq!(wf.geofix().coordinates(), Some((4.0, 4.0)));
    }

    #[tokio::test]
    async fn test_camera_error_then_retry() {
        let camera = noisy_camera();
        *camera.fail_with.lock().unwrap() = Some(CameraError::PermissionDenied);
        let mut wf = workflow(camera.clone(), Arc::new(DeniedGeo), Duration::from_secs(1));

        wf.mount();
        wf.settle(SETTLE).await;
        assert_eq!(wf.camera_error(), Some(&CameraError::PermissionDenied));
        assert_eq!(wf.state(), WorkflowState::Idle);
        assert_eq!(camera.live_streams(), 0);

        *camera.fail_with.lock().unwrap() = None;
        wf.retry_camera();
        wf.settle(SETTLE).await;
        assert_eq!(wf.camera_error(), None);
        assert_eq!(wf.state(), WorkflowState::Ready);
    }

    #[tokio::test]
    async fn test_held_image_blocks_restart() {
        let camera = noisy_camera();
        let mut wf = workflow(camera.clone(), Arc::new(DeniedGeo), Duration::from_secs(1));

        wf.mount();
        wf.settle(SETTLE).await;
        wf.capture().unwrap();

        wf.retry_camera();
        wf.poll();
        assert_eq!(wf.state(), WorkflowState::Captured);
        assert_eq!(camera.opened.load(Ordering::SeqCst), 1);
    }
}
