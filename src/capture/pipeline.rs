use chrono::{DateTime, Utc};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbImage};
use std::io::Cursor;

use super::camera::CameraStreamManager;
use super::geo::{GeoFix, Position};
use super::CaptureRejection;
use crate::config::CameraConfig;

/// Encoding and acceptance settings for a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapturePolicy {
    pub jpeg_quality: u8,
    /// Encoded payloads below this many bytes are treated as blank frames
    pub min_payload_bytes: usize,
}

impl Default for CapturePolicy {
    fn default() -> Self {
        Self {
            jpeg_quality: 80,
            min_payload_bytes: 2048,
        }
    }
}

impl From<&CameraConfig> for CapturePolicy {
    fn from(config: &CameraConfig) -> Self {
        Self {
            jpeg_quality: config.jpeg_quality.clamp(1, 100),
            min_payload_bytes: config.min_payload_bytes,
        }
    }
}

/// An encoded still plus the location known when it was taken.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedImage {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub location: Option<Position>,
    pub captured_at: DateTime<Utc>,
}

impl CapturedImage {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.location.map(|p| p.coordinates())
    }
}

/// Freeze the current frame of the live session.
///
/// Rejections leave the session untouched. On success the session is
/// released before returning. The fix is attached as-is, even if still
/// pending.
pub fn capture(
    cameras: &mut CameraStreamManager,
    geofix: &GeoFix,
    policy: &CapturePolicy,
) -> Result<CapturedImage, CaptureRejection> {
    let session = cameras.session_mut().ok_or(CaptureRejection::NotReady)?;
    if !session.is_ready() {
        return Err(CaptureRejection::NotReady);
    }

    let (width, height) = session.dimensions();
    if width == 0 || height == 0 {
        return Err(CaptureRejection::ZeroSizedFrame);
    }

    let frame = session
        .grab_frame()
        .map_err(CaptureRejection::FrameUnavailable)?;
    if frame.width() == 0 || frame.height() == 0 {
        return Err(CaptureRejection::ZeroSizedFrame);
    }

    let (width, height) = frame.dimensions();
    let jpeg = encode_jpeg(frame, policy.jpeg_quality)?;

    if jpeg.len() < policy.min_payload_bytes {
        tracing::info!(
            len = jpeg.len(),
            floor = policy.min_payload_bytes,
            "Rejected blank capture"
        );
        return Err(CaptureRejection::PayloadTooSmall {
            len: jpeg.len(),
            floor: policy.min_payload_bytes,
        });
    }

    cameras.stop();

    tracing::info!(
        width,
        height,
        bytes = jpeg.len(),
        located = geofix.position.is_some(),
        "Photo captured"
    );

    Ok(CapturedImage {
        jpeg,
        width,
        height,
        location: geofix.position,
        captured_at: Utc::now(),
    })
}

fn encode_jpeg(frame: RgbImage, quality: u8) -> Result<Vec<u8>, CaptureRejection> {
    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    DynamicImage::ImageRgb8(frame)
        .write_with_encoder(encoder)
        .map_err(|e| CaptureRejection::Encode(e.to_string()))?;
    Ok(buffer.into_inner())
}
