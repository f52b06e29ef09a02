//! A directory of photos acting as a camera.
//!
//! The newest image in the directory is the current frame, so anything that
//! drops snapshots into a folder (a phone sync folder, a webcam capture
//! tool) can feed the report screen.

use image::imageops::FilterType;
use image::RgbImage;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

use super::camera::{CameraDevice, StreamConstraints, VideoStream};
use super::CameraError;

pub struct DirectoryCamera {
    dir: PathBuf,
    extensions: Vec<String>,
}

impl DirectoryCamera {
    pub fn new(dir: PathBuf, extensions: Vec<String>) -> Self {
        Self { dir, extensions }
    }
}

impl CameraDevice for DirectoryCamera {
    fn open(&self, constraints: &StreamConstraints) -> Result<Box<dyn VideoStream>, CameraError> {
        if !self.dir.exists() {
            return Err(CameraError::NotFound(self.dir.display().to_string()));
        }

        // Probe access now so a denied device fails here, not at first frame
        std::fs::read_dir(&self.dir).map_err(|e| match e.kind() {
            io::ErrorKind::PermissionDenied => CameraError::PermissionDenied,
            io::ErrorKind::NotFound => CameraError::NotFound(self.dir.display().to_string()),
            _ => CameraError::Device(e.to_string()),
        })?;

        tracing::info!(dir = %self.dir.display(), "Opened directory camera");

        Ok(Box::new(DirectoryStream {
            dir: self.dir.clone(),
            extensions: self.extensions.clone(),
            max_width: constraints.ideal_width,
            max_height: constraints.ideal_height,
            frame: None,
            source: None,
            stopped: false,
        }))
    }

    fn name(&self) -> String {
        self.dir.display().to_string()
    }
}

struct DirectoryStream {
    dir: PathBuf,
    extensions: Vec<String>,
    max_width: u32,
    max_height: u32,
    frame: Option<RgbImage>,
    /// Path and mtime the current frame was decoded from
    source: Option<(PathBuf, SystemTime)>,
    stopped: bool,
}

impl DirectoryStream {
    /// Decode the newest image if it differs from the current frame.
    fn refresh(&mut self) -> Result<(), String> {
        let Some(path) = newest_image(&self.dir, &self.extensions).map_err(|e| e.to_string())?
        else {
            return Err("no images in camera directory".to_string());
        };

        let modified = std::fs::metadata(&path)
            .and_then(|m| m.modified())
            .map_err(|e| e.to_string())?;

        if self.frame.is_some() && self.source.as_ref() == Some(&(path.clone(), modified)) {
            return Ok(());
        }

        let img = image::open(&path).map_err(|e| format!("{}: {}", path.display(), e))?;
        let img = if img.width() > self.max_width || img.height() > self.max_height {
            img.resize(self.max_width, self.max_height, FilterType::Triangle)
        } else {
            img
        };

        tracing::debug!(
            path = %path.display(),
            width = img.width(),
            height = img.height(),
            "Camera frame loaded"
        );

        self.frame = Some(img.to_rgb8());
        self.source = Some((path, modified));
        Ok(())
    }
}

impl VideoStream for DirectoryStream {
    fn poll_ready(&mut self) -> bool {
        if self.stopped {
            return false;
        }
        if self.frame.is_none() {
            if let Err(e) = self.refresh() {
                tracing::trace!(error = %e, "Camera not ready");
            }
        }
        self.frame.is_some()
    }

    fn dimensions(&self) -> (u32, u32) {
        self.frame
            .as_ref()
            .map(|f| f.dimensions())
            .unwrap_or((0, 0))
    }

    fn grab_frame(&mut self) -> Result<RgbImage, String> {
        if self.stopped {
            return Err("stream stopped".to_string());
        }
        if let Err(e) = self.refresh() {
            // Keep showing the last good frame
            tracing::warn!(error = %e, "Could not refresh camera frame");
        }
        self.frame
            .clone()
            .ok_or_else(|| "no frame available".to_string())
    }

    fn stop(&mut self) {
        self.stopped = true;
        self.frame = None;
        self.source = None;
    }
}

/// Most recently modified image directly inside `dir`
pub fn newest_image(dir: &Path, extensions: &[String]) -> io::Result<Option<PathBuf>> {
    if !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is not a directory", dir.display()),
        ));
    }

    let newest = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)))
                .unwrap_or(false)
        })
        .filter_map(|e| {
            let modified = e.metadata().ok()?.modified().ok()?;
            Some((modified, e.into_path()))
        })
        .max_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)))
        .map(|(_, path)| path);

    Ok(newest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extensions() -> Vec<String> {
        vec!["png".to_string(), "jpg".to_string()]
    }

    #[test]
    fn test_missing_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let camera = DirectoryCamera::new(dir.path().join("absent"), extensions());
        assert!(matches!(
            camera.open(&StreamConstraints::default()),
            Err(CameraError::NotFound(_))
        ));
    }

    #[test]
    fn test_ready_after_first_frame() {
        let dir = tempfile::tempdir().unwrap();
        let camera = DirectoryCamera::new(dir.path().to_path_buf(), extensions());
        let mut stream = camera.open(&StreamConstraints::default()).unwrap();

        assert!(!stream.poll_ready());
        assert_eq!(stream.dimensions(), (0, 0));

        RgbImage::new(64, 48).save(dir.path().join("a.png")).unwrap();
        assert!(stream.poll_ready());
        assert_eq!(stream.dimensions(), (64, 48));
    }

    #[test]
    fn test_large_frame_scaled_to_constraints() {
        let dir = tempfile::tempdir().unwrap();
        RgbImage::new(400, 200).save(dir.path().join("big.png")).unwrap();

        let camera = DirectoryCamera::new(dir.path().to_path_buf(), extensions());
        let constraints = StreamConstraints {
            ideal_width: 100,
            ideal_height: 100,
            ..Default::default()
        };
        let mut stream = camera.open(&constraints).unwrap();
        assert!(stream.poll_ready());
        assert_eq!(stream.dimensions(), (100, 50));
    }

    #[test]
    fn test_stopped_stream_yields_no_frames() {
        let dir = tempfile::tempdir().unwrap();
        RgbImage::new(8, 8).save(dir.path().join("a.png")).unwrap();

        let camera = DirectoryCamera::new(dir.path().to_path_buf(), extensions());
        let mut stream = camera.open(&StreamConstraints::default()).unwrap();
        assert!(stream.poll_ready());

        stream.stop();
        stream.stop();
        assert!(!stream.poll_ready());
        assert!(stream.grab_frame().is_err());
    }

    #[test]
    fn test_newest_image_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
        assert_eq!(newest_image(dir.path(), &extensions()).unwrap(), None);

        RgbImage::new(2, 2).save(dir.path().join("one.png")).unwrap();
        assert_eq!(
            newest_image(dir.path(), &extensions()).unwrap(),
            Some(dir.path().join("one.png"))
        );
    }
}
