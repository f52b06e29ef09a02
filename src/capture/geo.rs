use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::directory::newest_image;
use super::GeoFailure;
use crate::config::{CameraConfig, GeolocationConfig, GeolocationProviderType};

/// A single position reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    /// Accuracy radius in metres, when the source reports one
    pub accuracy_m: Option<f64>,
    pub acquired_at: Instant,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_m: None,
            acquired_at: Instant::now(),
        }
    }

    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// A cached reading younger than this may be returned instead of a new one
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(60),
        }
    }
}

impl From<&GeolocationConfig> for PositionOptions {
    fn from(config: &GeolocationConfig) -> Self {
        Self {
            high_accuracy: config.high_accuracy,
            timeout: Duration::from_secs(config.timeout_secs),
            maximum_age: Duration::from_secs(config.maximum_age_secs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoStatus {
    Pending,
    Resolved,
    Failed(GeoFailure),
}

/// Outcome of the one-shot location lookup of a workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFix {
    pub status: GeoStatus,
    pub position: Option<Position>,
}

impl GeoFix {
    pub fn pending() -> Self {
        Self {
            status: GeoStatus::Pending,
            position: None,
        }
    }

    pub fn resolved(position: Position) -> Self {
        Self {
            status: GeoStatus::Resolved,
            position: Some(position),
        }
    }

    pub fn failed(reason: GeoFailure) -> Self {
        Self {
            status: GeoStatus::Failed(reason),
            position: None,
        }
    }

    pub fn from_result(result: Result<Position, GeoFailure>) -> Self {
        match result {
            Ok(position) => Self::resolved(position),
            Err(reason) => Self::failed(reason),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == GeoStatus::Pending
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.position.map(|p| p.coordinates())
    }
}

/// Source of device position readings.
///
/// Calls may block; the workflow runs them on the blocking pool under a
/// timeout.
pub trait GeolocationProvider: Send + Sync {
    fn current_position(&self, options: &PositionOptions) -> Result<Position, GeoFailure>;

    fn name(&self) -> &str;
}

/// Reuses the last reading while it is younger than `maximum_age`.
pub struct CachedGeolocation {
    inner: Arc<dyn GeolocationProvider>,
    last: Mutex<Option<Position>>,
}

impl CachedGeolocation {
    pub fn new(inner: Arc<dyn GeolocationProvider>) -> Self {
        Self {
            inner,
            last: Mutex::new(None),
        }
    }
}

impl GeolocationProvider for CachedGeolocation {
    fn current_position(&self, options: &PositionOptions) -> Result<Position, GeoFailure> {
        if let Ok(last) = self.last.lock() {
            if let Some(position) = *last {
                if position.acquired_at.elapsed() <= options.maximum_age {
                    tracing::debug!("Reusing cached position");
                    return Ok(position);
                }
            }
        }

        let position = self.inner.current_position(options)?;
        if let Ok(mut last) = self.last.lock() {
            *last = Some(position);
        }
        Ok(position)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Fixed coordinates from the config file.
pub struct StaticPosition {
    latitude: f64,
    longitude: f64,
    accuracy_m: Option<f64>,
}

impl StaticPosition {
    pub fn new(latitude: f64, longitude: f64, accuracy_m: Option<f64>) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_m,
        }
    }
}

impl GeolocationProvider for StaticPosition {
    fn current_position(&self, _options: &PositionOptions) -> Result<Position, GeoFailure> {
        Ok(Position {
            accuracy_m: self.accuracy_m,
            ..Position::new(self.latitude, self.longitude)
        })
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Reads the GPS tags of the newest photo in the camera directory.
pub struct ExifGeolocation {
    dir: PathBuf,
    extensions: Vec<String>,
}

impl ExifGeolocation {
    pub fn new(dir: PathBuf, extensions: Vec<String>) -> Self {
        Self { dir, extensions }
    }
}

impl GeolocationProvider for ExifGeolocation {
    fn current_position(&self, _options: &PositionOptions) -> Result<Position, GeoFailure> {
        let path = newest_image(&self.dir, &self.extensions)
            .map_err(|e| GeoFailure::Unavailable(e.to_string()))?
            .ok_or_else(|| GeoFailure::Unavailable("no photos in camera directory".to_string()))?;

        read_gps(&path)
            .map(|(lat, lon)| Position::new(lat, lon))
            .ok_or_else(|| GeoFailure::Unavailable(format!("{} has no GPS tags", path.display())))
    }

    fn name(&self) -> &str {
        "exif"
    }
}

/// Decimal (latitude, longitude) from a photo's EXIF GPS tags
pub fn read_gps(path: &Path) -> Option<(f64, f64)> {
    let file = File::open(path).ok()?;
    let mut bufreader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut bufreader).ok()?;

    let lat_field = exif.get_field(exif::Tag::GPSLatitude, exif::In::PRIMARY)?;
    let lat_ref = exif.get_field(exif::Tag::GPSLatitudeRef, exif::In::PRIMARY)?;
    let lon_field = exif.get_field(exif::Tag::GPSLongitude, exif::In::PRIMARY)?;
    let lon_ref = exif.get_field(exif::Tag::GPSLongitudeRef, exif::In::PRIMARY)?;

    let (exif::Value::Rational(lat_vals), exif::Value::Rational(lon_vals)) =
        (&lat_field.value, &lon_field.value)
    else {
        return None;
    };

    if lat_vals.len() < 3 || lon_vals.len() < 3 {
        return None;
    }

    let lat = dms_to_decimal(lat_vals[0].to_f64(), lat_vals[1].to_f64(), lat_vals[2].to_f64());
    let lon = dms_to_decimal(lon_vals[0].to_f64(), lon_vals[1].to_f64(), lon_vals[2].to_f64());

    let lat_ref = lat_ref.display_value().to_string();
    let lon_ref = lon_ref.display_value().to_string();

    Some((
        if lat_ref.contains('S') { -lat } else { lat },
        if lon_ref.contains('W') { -lon } else { lon },
    ))
}

fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64) -> f64 {
    degrees + minutes / 60.0 + seconds / 3600.0
}

/// Platform without any position source.
pub struct NoGeolocation;

impl GeolocationProvider for NoGeolocation {
    fn current_position(&self, _options: &PositionOptions) -> Result<Position, GeoFailure> {
        Err(GeoFailure::Unsupported)
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// Build the configured provider, wrapped in a [`CachedGeolocation`].
pub fn geolocation_from_config(
    config: &GeolocationConfig,
    camera: &CameraConfig,
) -> Arc<dyn GeolocationProvider> {
    let inner: Arc<dyn GeolocationProvider> = match config.provider {
        GeolocationProviderType::Static => match (config.latitude, config.longitude) {
            (Some(lat), Some(lon)) => Arc::new(StaticPosition::new(lat, lon, config.accuracy_m)),
            _ => {
                tracing::warn!("Static geolocation configured without latitude/longitude");
                Arc::new(NoGeolocation)
            }
        },
        GeolocationProviderType::Exif => Arc::new(ExifGeolocation::new(
            camera.source.clone(),
            camera.image_extensions.clone(),
        )),
        GeolocationProviderType::None => Arc::new(NoGeolocation),
    };

    tracing::info!(provider = inner.name(), "Geolocation provider selected");
    Arc::new(CachedGeolocation::new(inner))
}
