//! New-report form and the submission flow.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::backend::{IssueStore, ObjectStore};
use crate::capture::CapturedImage;
use crate::error::{BackendError, ValidationError};
use crate::geocoding::ReverseGeocoder;
use crate::models::{Issue, IssueCategory, IssueStatus, NewIssue};

/// Form fields besides the photo
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportDraft {
    pub category: Option<IssueCategory>,
    pub description: String,
}

impl ReportDraft {
    pub fn validate(
        &self,
        image: Option<&CapturedImage>,
    ) -> Result<IssueCategory, ValidationError> {
        if image.is_none() {
            return Err(ValidationError::MissingPhoto);
        }
        let category = self.category.ok_or(ValidationError::MissingCategory)?;
        if self.description.trim().is_empty() {
            return Err(ValidationError::MissingDescription);
        }
        Ok(category)
    }

    pub fn is_complete(&self, image: Option<&CapturedImage>) -> bool {
        self.validate(image).is_ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStep {
    Uploading,
    Locating,
    Saving,
}

impl SubmitStep {
    pub const COUNT: usize = 3;

    pub fn index(&self) -> usize {
        match self {
            SubmitStep::Uploading => 0,
            SubmitStep::Locating => 1,
            SubmitStep::Saving => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SubmitStep::Uploading => "Uploading photo",
            SubmitStep::Locating => "Looking up address",
            SubmitStep::Saving => "Saving report",
        }
    }
}

/// Backend collaborators needed to file a report
pub struct ReportServices<'a> {
    pub issues: &'a dyn IssueStore,
    pub objects: &'a dyn ObjectStore,
    pub geocoder: &'a dyn ReverseGeocoder,
}

/// `{user or "anonymous"}/{millis}-{first 8 hex of sha256}.jpg`
pub fn object_key(user_id: Option<&str>, captured_at: DateTime<Utc>, jpeg: &[u8]) -> String {
    let digest = Sha256::digest(jpeg);
    let prefix: String = digest[..4].iter().map(|b| format!("{:02x}", b)).collect();
    format!(
        "{}/{}-{}.jpg",
        user_id.unwrap_or("anonymous"),
        captured_at.timestamp_millis(),
        prefix
    )
}

/// Upload the photo, geocode its fix and insert the issue row.
///
/// Geocoding is skipped when the capture has no location. `progress` is
/// called before each step.
pub fn submit_report(
    services: &ReportServices<'_>,
    draft: &ReportDraft,
    image: &CapturedImage,
    user_id: Option<&str>,
    mut progress: impl FnMut(SubmitStep),
) -> Result<Issue, SubmitError> {
    let category = draft.validate(Some(image))?;

    progress(SubmitStep::Uploading);
    let key = object_key(user_id, image.captured_at, &image.jpeg);
    let image_url = services.objects.upload(&key, "image/jpeg", &image.jpeg)?;

    progress(SubmitStep::Locating);
    let coordinates = image.coordinates();
    let place = coordinates.map(|(lat, lon)| services.geocoder.reverse(lat, lon));

    progress(SubmitStep::Saving);
    let new_issue = NewIssue {
        image_url,
        category,
        description: draft.description.trim().to_string(),
        latitude: coordinates.map(|c| c.0),
        longitude: coordinates.map(|c| c.1),
        area: place.as_ref().map(|p| p.area.clone()),
        city: place.map(|p| p.city),
        status: IssueStatus::Pending,
        likes: 0,
        reports: 0,
        assigned_to: category.department().name.to_string(),
        user_id: user_id.map(str::to_string),
    };

    let issue = services.issues.insert_issue(&new_issue)?;
    Ok(issue)
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::tests::MemoryBackend;
    use crate::capture::Position;
    use crate::geocoding::{LocationInfo, NoGeocoding};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedPlace {
        calls: AtomicUsize,
    }

    impl ReverseGeocoder for FixedPlace {
        fn reverse(&self, _latitude: f64, _longitude: f64) -> LocationInfo {
            self.calls.fetch_add(1, Ordering::SeqCst);
            LocationInfo {
                area: "Vidyanagar".to_string(),
                city: "Hubballi".to_string(),
                full_address: "Vidyanagar, Hubballi".to_string(),
            }
        }
    }

    fn captured(location: Option<Position>) -> CapturedImage {
        CapturedImage {
            jpeg: vec![0xff, 0xd8, 1, 2, 3, 0xff, 0xd9],
            width: 4,
            height: 4,
            location,
            captured_at: Utc::now(),
        }
    }

    fn draft() -> ReportDraft {
        ReportDraft {
            category: Some(IssueCategory::Drainage),
            description: "  Overflowing drain near market  ".to_string(),
        }
    }

    #[test]
    fn test_validation_order() {
        let empty = ReportDraft::default();
        assert_eq!(empty.validate(None), Err(ValidationError::MissingPhoto));

        let image = captured(None);
        assert_eq!(
            empty.validate(Some(&image)),
            Err(ValidationError::MissingCategory)
        );

        let blank = ReportDraft {
            category: Some(IssueCategory::Roads),
            description: "   ".to_string(),
        };
        assert_eq!(
            blank.validate(Some(&image)),
            Err(ValidationError::MissingDescription)
        );
        assert!(draft().is_complete(Some(&image)));
    }

    #[test]
    fn test_object_key_shape() {
        let at = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        let key = object_key(Some("user-1"), at, b"abc");
        // sha256("abc") starts with ba7816bf
        assert_eq!(key, "user-1/1700000000123-ba7816bf.jpg");
        assert!(object_key(None, at, b"abc").starts_with("anonymous/"));
    }

    #[test]
    fn test_submit_with_location() {
        let backend = MemoryBackend::default();
        let geocoder = FixedPlace {
            calls: AtomicUsize::new(0),
        };
        let services = ReportServices {
            issues: &backend,
            objects: &backend,
            geocoder: &geocoder,
        };

        let mut steps = Vec::new();
        let image = captured(Some(Position::new(15.3647, 75.124)));
        let issue = submit_report(&services, &draft(), &image, Some("user-1"), |s| steps.push(s))
            .unwrap();

        assert_eq!(
            steps,
            vec![SubmitStep::Uploading, SubmitStep::Locating, SubmitStep::Saving]
        );
        assert_eq!(issue.status, IssueStatus::Pending);
        assert_eq!(issue.description, "Overflowing drain near market");
        assert_eq!(issue.assigned_to.as_deref(), Some("Drainage & Sewage Dept."));
        assert_eq!(issue.address().as_deref(), Some("Vidyanagar, Hubballi"));
        assert_eq!(issue.user_id.as_deref(), Some("user-1"));
        assert!(issue.image_url.starts_with("memory://issue-images/user-1/"));
        assert_eq!(backend.objects.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_submit_without_location_skips_geocoding() {
        let backend = MemoryBackend::default();
        let geocoder = FixedPlace {
            calls: AtomicUsize::new(0),
        };
        let services = ReportServices {
            issues: &backend,
            objects: &backend,
            geocoder: &geocoder,
        };

        let issue = submit_report(&services, &draft(), &captured(None), None, |_| {}).unwrap();
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
        assert_eq!(issue.location, None);
        assert_eq!(issue.area, None);
    }

    #[test]
    fn test_upload_failure_stops_before_insert() {
        let backend = MemoryBackend {
            fail_uploads: true,
            ..Default::default()
        };
        let services = ReportServices {
            issues: &backend,
            objects: &backend,
            geocoder: &NoGeocoding,
        };

        let err = submit_report(&services, &draft(), &captured(None), None, |_| {}).unwrap_err();
        assert!(matches!(err, SubmitError::Backend(BackendError::Network(_))));
        assert!(backend.issues.lock().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_draft_makes_no_calls() {
        let backend = MemoryBackend::default();
        let services = ReportServices {
            issues: &backend,
            objects: &backend,
            geocoder: &NoGeocoding,
        };

        let err = submit_report(
            &services,
            &ReportDraft::default(),
            &captured(None),
            None,
            |_| {},
        )
        .unwrap_err();
        assert_eq!(err, SubmitError::Invalid(ValidationError::MissingCategory));
        assert!(backend.objects.lock().unwrap().is_empty());
    }
}
