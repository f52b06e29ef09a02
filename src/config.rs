use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::i18n::Language;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub geocoding: GeocodingConfig,

    #[serde(default)]
    pub camera: CameraConfig,

    #[serde(default)]
    pub geolocation: GeolocationConfig,

    #[serde(default)]
    pub ui: UiConfig,

    /// Where this config was loaded from; `save()` writes back here.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project URL of the hosted backend, e.g. `https://xyz.supabase.co`
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Public (anon) API key sent with every request
    #[serde(default)]
    pub anon_key: String,

    #[serde(default = "default_image_bucket")]
    pub image_bucket: String,

    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,
}

fn default_backend_url() -> String {
    "http://127.0.0.1:54321".to_string()
}

fn default_image_bucket() -> String {
    "issue-images".to_string()
}

fn default_backend_timeout() -> u64 {
    15
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            anon_key: String::new(),
            image_bucket: default_image_bucket(),
            timeout_secs: default_backend_timeout(),
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Domain of the synthetic e-mail each username is mapped to
    #[serde(default = "default_email_domain")]
    pub email_domain: String,

    #[serde(default = "default_session_path")]
    pub session_path: PathBuf,

    /// Seed credentials granted the admin role on first sign-in.
    /// Demo mechanism only; leave unset in production.
    #[serde(default)]
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

fn default_email_domain() -> String {
    "nagarikvani.demo".to_string()
}

fn default_session_path() -> PathBuf {
    data_dir().join("session.json")
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            email_domain: default_email_domain(),
            session_path: default_session_path(),
            bootstrap_admin: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    #[serde(default = "default_geocoding_enabled")]
    pub enabled: bool,

    #[serde(default = "default_geocoding_endpoint")]
    pub endpoint: String,

    /// Nominatim's usage policy requires an identifying User-Agent
    #[serde(default = "default_geocoding_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_geocoding_timeout")]
    pub timeout_secs: u64,
}

fn default_geocoding_enabled() -> bool {
    true
}

fn default_geocoding_endpoint() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_geocoding_user_agent() -> String {
    "NagarikVani/1.0".to_string()
}

fn default_geocoding_timeout() -> u64 {
    10
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            enabled: default_geocoding_enabled(),
            endpoint: default_geocoding_endpoint(),
            user_agent: default_geocoding_user_agent(),
            timeout_secs: default_geocoding_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Directory acting as the camera device. The newest image in it is the
    /// current frame (phone sync folder, webcam snapshot output, ...).
    #[serde(default = "default_camera_source")]
    pub source: PathBuf,

    #[serde(default = "default_ideal_width")]
    pub ideal_width: u32,

    #[serde(default = "default_ideal_height")]
    pub ideal_height: u32,

    /// JPEG quality, 1-100
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    /// Encoded captures smaller than this are treated as blank frames
    #[serde(default = "default_min_payload_bytes")]
    pub min_payload_bytes: usize,

    #[serde(default = "default_retake_delay_ms")]
    pub retake_delay_ms: u64,

    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,
}

fn default_camera_source() -> PathBuf {
    dirs::picture_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("civic-eye-camera")
}

fn default_ideal_width() -> u32 {
    1280
}

fn default_ideal_height() -> u32 {
    720
}

fn default_jpeg_quality() -> u8 {
    80
}

fn default_min_payload_bytes() -> usize {
    2048
}

fn default_retake_delay_ms() -> u64 {
    100
}

fn default_image_extensions() -> Vec<String> {
    vec![
        "jpg".to_string(),
        "jpeg".to_string(),
        "png".to_string(),
        "webp".to_string(),
    ]
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            source: default_camera_source(),
            ideal_width: default_ideal_width(),
            ideal_height: default_ideal_height(),
            jpeg_quality: default_jpeg_quality(),
            min_payload_bytes: default_min_payload_bytes(),
            retake_delay_ms: default_retake_delay_ms(),
            image_extensions: default_image_extensions(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GeolocationProviderType {
    #[default]
    None,
    Static,
    Exif,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationConfig {
    #[serde(default)]
    pub provider: GeolocationProviderType,

    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,

    #[serde(default)]
    pub accuracy_m: Option<f64>,

    #[serde(default = "default_high_accuracy")]
    pub high_accuracy: bool,

    #[serde(default = "default_geolocation_timeout")]
    pub timeout_secs: u64,

    /// Age up to which a previously acquired fix may be reused
    #[serde(default = "default_maximum_age")]
    pub maximum_age_secs: u64,
}

fn default_high_accuracy() -> bool {
    true
}

fn default_geolocation_timeout() -> u64 {
    10
}

fn default_maximum_age() -> u64 {
    60
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            provider: GeolocationProviderType::default(),
            latitude: None,
            longitude: None,
            accuracy_m: None,
            high_accuracy: default_high_accuracy(),
            timeout_secs: default_geolocation_timeout(),
            maximum_age_secs: default_maximum_age(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub language: Language,

    /// Render the captured photo with terminal graphics when available
    #[serde(default = "default_preview_enabled")]
    pub preview: bool,

    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

fn default_preview_enabled() -> bool {
    true
}

fn default_export_dir() -> PathBuf {
    data_dir().join("exports")
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            preview: default_preview_enabled(),
            export_dir: default_export_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            auth: AuthConfig::default(),
            geocoding: GeocodingConfig::default(),
            camera: CameraConfig::default(),
            geolocation: GeolocationConfig::default(),
            ui: UiConfig::default(),
            source_path: None,
        }
    }
}

impl Config {
    /// Load from `CIVIC_EYE_CONFIG` or the default location, creating a
    /// default config file when none exists.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var_os("CIVIC_EYE_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(Self::config_path);
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str::<Config>(&content)?
        } else {
            let config = Config::default();
            config.save_to(path)?;
            config
        };
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = self
            .source_path
            .clone()
            .unwrap_or_else(Self::config_path);
        self.save_to(&path)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("civic-eye")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}

/// Per-user data directory (session, logs, exports)
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("civic-eye")
}
