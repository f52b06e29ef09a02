//! Client for the hosted backend (REST tables, auth, object storage).
//!
//! Calls are blocking and meant to run on background threads. The rest of
//! the app talks to the backend through the traits below so that flows can
//! be exercised against in-memory fakes.

pub mod auth;
pub mod rest;
pub mod storage;

pub use auth::{AuthService, AuthSession, AuthUser, Profile};

use std::sync::{Arc, RwLock};

use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::models::{Issue, IssuePatch, NewFeedback, NewIssue};

pub trait IssueStore: Send + Sync {
    /// All issues, newest first
    fn list_issues(&self) -> Result<Vec<Issue>, BackendError>;

    /// Issues reported by one user, newest first
    fn list_issues_by_user(&self, user_id: &str) -> Result<Vec<Issue>, BackendError>;

    fn insert_issue(&self, issue: &NewIssue) -> Result<Issue, BackendError>;

    fn update_issue(&self, id: &str, patch: &IssuePatch) -> Result<(), BackendError>;

    fn delete_issue(&self, id: &str) -> Result<(), BackendError>;
}

pub trait FeedbackStore: Send + Sync {
    /// Fails with [`BackendError::Conflict`] when the user already rated the issue.
    fn insert_feedback(&self, feedback: &NewFeedback) -> Result<(), BackendError>;
}

pub trait ObjectStore: Send + Sync {
    /// Upload `bytes` under `key` and return its public URL.
    fn upload(&self, key: &str, content_type: &str, bytes: &[u8]) -> Result<String, BackendError>;

    fn public_url(&self, key: &str) -> String;
}

/// Shared handle to the backend. Cheap to clone; clones share the access
/// token.
#[derive(Clone)]
pub struct SupabaseClient {
    agent: ureq::Agent,
    base_url: String,
    anon_key: String,
    bucket: String,
    access_token: Arc<RwLock<Option<String>>>,
}

impl SupabaseClient {
    pub fn new(base_url: &str, anon_key: &str, bucket: &str, timeout: std::time::Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            bucket: bucket.to_string(),
            access_token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        if config.anon_key.is_empty() {
            tracing::warn!("backend.anon_key is not set; requests will be rejected");
        }
        Self::new(
            &config.url,
            &config.anon_key,
            &config.image_bucket,
            config.timeout(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Token used for row-level access; `None` falls back to the anon key.
    pub fn set_access_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.access_token.write() {
            *guard = token;
        }
    }

    fn bearer(&self) -> String {
        let token = self
            .access_token
            .read()
            .ok()
            .and_then(|t| t.clone())
            .unwrap_or_else(|| self.anon_key.clone());
        format!("Bearer {}", token)
    }

    /// Request with the API key and current bearer token attached
    pub(crate) fn request(&self, method: &str, path: &str) -> ureq::Request {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(method, path, "Backend request");
        self.agent
            .request(method, &url)
            .set("apikey", &self.anon_key)
            .set("Authorization", &self.bearer())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// In-memory backend for flow tests
    #[derive(Default)]
    pub(crate) struct MemoryBackend {
        pub issues: Mutex<Vec<Issue>>,
        pub objects: Mutex<Vec<(String, usize)>>,
        pub feedback: Mutex<HashSet<(String, String)>>,
        pub fail_uploads: bool,
        pub fail_updates: bool,
    }

    impl IssueStore for MemoryBackend {
        fn list_issues(&self) -> Result<Vec<Issue>, BackendError> {
            let mut issues = self.issues.lock().unwrap().clone();
            issues.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(issues)
        }

        fn list_issues_by_user(&self, user_id: &str) -> Result<Vec<Issue>, BackendError> {
            Ok(self
                .list_issues()?
                .into_iter()
                .filter(|i| i.user_id.as_deref() == Some(user_id))
                .collect())
        }

        fn insert_issue(&self, new: &NewIssue) -> Result<Issue, BackendError> {
            let mut issues = self.issues.lock().unwrap();
            let now = chrono::Utc::now();
            let issue = Issue {
                id: format!("issue-{}", issues.len() + 1),
                image_url: new.image_url.clone(),
                category: new.category,
                description: new.description.clone(),
                location: new.latitude.zip(new.longitude),
                area: new.area.clone(),
                city: new.city.clone(),
                status: new.status,
                likes: new.likes,
                reports: new.reports,
                assigned_to: Some(new.assigned_to.clone()),
                created_at: now,
                updated_at: now,
                user_id: new.user_id.clone(),
            };
            issues.push(issue.clone());
            Ok(issue)
        }

        fn update_issue(&self, id: &str, patch: &IssuePatch) -> Result<(), BackendError> {
            if self.fail_updates {
                return Err(BackendError::Network("offline".to_string()));
            }
            let mut issues = self.issues.lock().unwrap();
            if let Some(issue) = issues.iter_mut().find(|i| i.id == id) {
                patch.apply(issue);
            }
            Ok(())
        }

        fn delete_issue(&self, id: &str) -> Result<(), BackendError> {
            self.issues.lock().unwrap().retain(|i| i.id != id);
            Ok(())
        }
    }

    impl FeedbackStore for MemoryBackend {
        fn insert_feedback(&self, feedback: &NewFeedback) -> Result<(), BackendError> {
            let key = (feedback.issue_id.clone(), feedback.user_id.clone());
            if !self.feedback.lock().unwrap().insert(key) {
                return Err(crate::error::classify_error_body(
                    409,
                    r#"{"code":"23505","message":"duplicate key value violates unique constraint"}"#,
                ));
            }
            Ok(())
        }
    }

    impl ObjectStore for MemoryBackend {
        fn upload(
            &self,
            key: &str,
            _content_type: &str,
            bytes: &[u8],
        ) -> Result<String, BackendError> {
            if self.fail_uploads {
                return Err(BackendError::Network("connection reset".to_string()));
            }
            self.objects
                .lock()
                .unwrap()
                .push((key.to_string(), bytes.len()));
            Ok(self.public_url(key))
        }

        fn public_url(&self, key: &str) -> String {
            format!("memory://issue-images/{}", key)
        }
    }

    #[test]
    fn test_request_uses_anon_key_until_signed_in() {
        let client = SupabaseClient::new(
            "https://x.supabase.co/",
            "anon",
            "issue-images",
            std::time::Duration::from_secs(1),
        );
        assert_eq!(client.base_url(), "https://x.supabase.co");
        assert_eq!(client.bearer(), "Bearer anon");

        let clone = client.clone();
        clone.set_access_token(Some("jwt".to_string()));
        assert_eq!(client.bearer(), "Bearer jwt");

        client.set_access_token(None);
        assert_eq!(clone.bearer(), "Bearer anon");
    }
}
