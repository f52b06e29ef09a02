//! Error types shared across the client.
//!
//! Capture-specific failures live next to the capture workflow
//! (`capture::CameraError`, `capture::GeoFailure`,
//! `capture::CaptureRejection`); this module holds the backend and
//! form-validation errors.

use thiserror::Error;

/// Postgres unique-violation code as surfaced by the REST layer.
pub const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// Uniqueness conflict, e.g. a second feedback row for the same issue and user
    #[error("conflict: {message}")]
    Conflict { message: String },

    #[error("not authorized: {message}")]
    Unauthorized { message: String },

    #[error("backend returned {status}: {message}")]
    Http {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl BackendError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, BackendError::Conflict { .. })
    }

    /// Message suitable for a notification
    pub fn user_message(&self) -> String {
        match self {
            BackendError::Conflict { message }
            | BackendError::Unauthorized { message }
            | BackendError::Http { message, .. } => message.clone(),
            BackendError::Network(_) => "Network error. Please check your connection.".to_string(),
            BackendError::Decode(_) => "Unexpected response from server".to_string(),
        }
    }
}

impl From<ureq::Error> for BackendError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => {
                let body = response.into_string().unwrap_or_default();
                classify_error_body(status, &body)
            }
            ureq::Error::Transport(transport) => BackendError::Network(transport.to_string()),
        }
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::Decode(err.to_string())
    }
}

/// Turn an error response body into a typed error.
///
/// Understands the PostgREST shape (`code`, `message`), the auth service
/// shapes (`error_description`, `msg`, `error`) and plain text.
pub fn classify_error_body(status: u16, body: &str) -> BackendError {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();

    let field = |name: &str| -> Option<String> {
        parsed
            .as_ref()
            .and_then(|v| v.get(name))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    };

    let code = field("code").or_else(|| field("error_code"));
    let message = field("message")
        .or_else(|| field("error_description"))
        .or_else(|| field("msg"))
        .or_else(|| field("error"))
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("HTTP {}", status)
            } else {
                trimmed.to_string()
            }
        });

    // A bare 409 is a conflict; other coded 409s (e.g. foreign keys) are not
    let unique = match code.as_deref() {
        Some(code) => code == UNIQUE_VIOLATION,
        None => status == 409,
    };
    if unique {
        return BackendError::Conflict { message };
    }

    if status == 401 || status == 403 {
        return BackendError::Unauthorized { message };
    }

    BackendError::Http {
        status,
        code,
        message,
    }
}

/// Local validation failure; blocks the operation before any backend call.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please capture a photo of the issue")]
    MissingPhoto,

    #[error("Please select a category")]
    MissingCategory,

    #[error("Please describe the issue")]
    MissingDescription,

    #[error("Please rate every aspect from 1 to 5")]
    IncompleteRatings,

    #[error("Please enter your username")]
    MissingUsername,

    #[error("Please enter your password")]
    MissingPassword,

    #[error("Username must be at least 3 characters")]
    UsernameTooShort,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,
}
