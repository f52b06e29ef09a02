//! Photo capture with an attached location fix.
//!
//! A [`CaptureWorkflow`] drives one camera stream (through
//! [`CameraStreamManager`]) and one geolocation lookup concurrently, and
//! freezes a frame into a [`CapturedImage`] on request. Devices are behind
//! the [`CameraDevice`] and [`GeolocationProvider`] traits; the concrete
//! implementations read from a directory of photos.

pub mod camera;
pub mod directory;
pub mod geo;
pub mod pipeline;
pub mod workflow;

pub use camera::{
    CameraDevice, CameraSession, CameraStreamManager, StreamConstraints, VideoStream,
};
pub use directory::DirectoryCamera;
pub use geo::{
    geolocation_from_config, CachedGeolocation, ExifGeolocation, GeoFix, GeoStatus,
    GeolocationProvider, NoGeolocation, Position, PositionOptions, StaticPosition,
};
pub use pipeline::{CapturePolicy, CapturedImage};
pub use workflow::{CaptureWorkflow, WorkflowState};

use thiserror::Error;

/// Failure to acquire the camera. Shown inline with a retry action.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CameraError {
    #[error("camera access denied")]
    PermissionDenied,

    #[error("no camera found at {0}")]
    NotFound(String),

    #[error("camera does not support the requested stream")]
    Unsupported,

    #[error("camera error: {0}")]
    Device(String),
}

/// Why a geolocation lookup produced no coordinates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeoFailure {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("location request timed out")]
    Timeout,

    #[error("geolocation not supported")]
    Unsupported,

    #[error("location unavailable: {0}")]
    Unavailable(String),
}

/// A capture attempt that did not produce an image. The workflow stays in
/// the state it was in.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CaptureRejection {
    #[error("camera is not ready")]
    NotReady,

    #[error("frame has no pixels")]
    ZeroSizedFrame,

    #[error("could not read frame: {0}")]
    FrameUnavailable(String),

    #[error("could not encode frame: {0}")]
    Encode(String),

    #[error("captured image looks blank ({len} bytes, expected at least {floor})")]
    PayloadTooSmall { len: usize, floor: usize },
}
