//! Signed-in user state.
//!
//! [`SessionManager`] owns the current auth session, persists it between
//! runs and broadcasts changes on a `watch` channel. It is created at app
//! start, restored from disk once, and cleared on sign-out.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::watch;

use crate::backend::{AuthService, AuthSession, Profile};
use crate::config::AuthConfig;
use crate::error::{BackendError, ValidationError};

pub const ADMIN_ROLE: &str = "admin";

/// Seconds before expiry at which a token is treated as expired
const EXPIRY_MARGIN_SECS: i64 = 30;

/// The signed-in user as the UI sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("{0}")]
    Invalid(#[from] ValidationError),

    #[error("This username is already taken")]
    UsernameTaken,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("{}", .0.user_message())]
    Backend(BackendError),
}

impl From<BackendError> for AuthFailure {
    fn from(err: BackendError) -> Self {
        let message = err.user_message();
        if message.contains("already registered") {
            AuthFailure::UsernameTaken
        } else if message.contains("Invalid login credentials") {
            AuthFailure::InvalidCredentials
        } else {
            AuthFailure::Backend(err)
        }
    }
}

/// Map a username to the e-mail identity the auth service stores.
///
/// Lowercased, everything outside `[a-z0-9]` dropped.
pub fn synthetic_email(username: &str, domain: &str) -> String {
    let local: String = username
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect();
    format!("{}@{}", local, domain)
}

pub fn validate_sign_up(
    username: &str,
    password: &str,
    confirm: &str,
) -> Result<(), ValidationError> {
    if username.trim().chars().count() < 3 {
        return Err(ValidationError::UsernameTooShort);
    }
    if password.chars().count() < 6 {
        return Err(ValidationError::PasswordTooShort);
    }
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

pub fn validate_sign_in(username: &str, password: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() {
        return Err(ValidationError::MissingUsername);
    }
    if password.is_empty() {
        return Err(ValidationError::MissingPassword);
    }
    Ok(())
}

/// `exp` claim of a JWT, without verifying the signature
pub fn token_expiry(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    claims.get("exp")?.as_i64()
}

fn is_expired(session: &AuthSession, now: i64) -> bool {
    let expiry = session
        .expires_at
        .or_else(|| token_expiry(&session.access_token));
    match expiry {
        Some(exp) => exp - EXPIRY_MARGIN_SECS <= now,
        None => true,
    }
}

pub struct SessionManager {
    auth: Arc<dyn AuthService>,
    config: AuthConfig,
    session: Mutex<Option<AuthSession>>,
    user_tx: watch::Sender<Option<CurrentUser>>,
}

impl SessionManager {
    pub fn new(auth: Arc<dyn AuthService>, config: AuthConfig) -> Self {
        if let Some(admin) = &config.bootstrap_admin {
            tracing::warn!(
                username = %admin.username,
                "Bootstrap admin credentials are configured; remove them outside demos"
            );
        }

        let (user_tx, _) = watch::channel(None);
        Self {
            auth,
            config,
            session: Mutex::new(None),
            user_tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<CurrentUser>> {
        self.user_tx.subscribe()
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.user_tx.borrow().clone()
    }

    fn session_path(&self) -> PathBuf {
        self.config.session_path.clone()
    }

    /// Pick up the session saved by a previous run.
    ///
    /// An expired token is refreshed; a session that cannot be refreshed is
    /// discarded.
    pub fn restore(&self) -> Result<Option<CurrentUser>, BackendError> {
        let path = self.session_path();
        let Ok(content) = std::fs::read_to_string(&path) else {
            return Ok(None);
        };

        let saved: AuthSession = match serde_json::from_str(&content) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable session file");
                self.forget();
                return Ok(None);
            }
        };

        let session = if is_expired(&saved, Utc::now().timestamp()) {
            match self.auth.refresh(&saved.refresh_token) {
                Ok(fresh) => fresh,
                Err(e) => {
                    tracing::info!(error = %e, "Saved session could not be refreshed");
                    self.forget();
                    return Ok(None);
                }
            }
        } else {
            saved
        };

        let user = self.establish(session)?;
        tracing::info!(user = %user.username, "Session restored");
        Ok(Some(user))
    }

    pub fn sign_up(
        &self,
        username: &str,
        password: &str,
        confirm: &str,
    ) -> Result<Option<CurrentUser>, AuthFailure> {
        validate_sign_up(username, password, confirm)?;

        let email = synthetic_email(username, &self.config.email_domain);
        let session = self.auth.sign_up(&email, password, username.trim())?;
        tracing::info!(%email, "Account created");

        match session {
            Some(session) => Ok(Some(self.establish(session)?)),
            None => Ok(None),
        }
    }

    pub fn sign_in(&self, username: &str, password: &str) -> Result<CurrentUser, AuthFailure> {
        validate_sign_in(username, password)?;

        let email = synthetic_email(username, &self.config.email_domain);
        let session = self.auth.sign_in(&email, password)?;

        if let Some(admin) = &self.config.bootstrap_admin {
            if admin.username == username && admin.password == password {
                if let Err(e) = self.bootstrap_admin(&session) {
                    tracing::warn!(error = %e, "Could not grant bootstrap admin role");
                }
            }
        }

        let user = self.establish(session)?;
        tracing::info!(user = %user.username, admin = user.is_admin, "Signed in");
        Ok(user)
    }

    /// Grant the admin role to the configured seed account if missing.
    fn bootstrap_admin(&self, session: &AuthSession) -> Result<(), BackendError> {
        self.auth.set_access_token(Some(session.access_token.clone()));
        if !self.auth.has_role(&session.user.id, ADMIN_ROLE)? {
            tracing::warn!(user_id = %session.user.id, "Granting admin role to bootstrap account");
            self.auth.grant_role(&session.user.id, ADMIN_ROLE)?;
        }
        Ok(())
    }

    /// Always clears local state, even if the backend call fails.
    pub fn sign_out(&self) -> Result<(), BackendError> {
        let session = self.session.lock().ok().and_then(|mut s| s.take());
        self.auth.set_access_token(None);
        self.forget();
        self.user_tx.send_replace(None);

        match session {
            Some(session) => {
                tracing::info!("Signed out");
                self.auth.sign_out(&session.access_token)
            }
            None => Ok(()),
        }
    }

    /// Make `session` current: token, profile, role, persistence, broadcast.
    fn establish(&self, session: AuthSession) -> Result<CurrentUser, BackendError> {
        self.auth.set_access_token(Some(session.access_token.clone()));

        let profile = match self.auth.fetch_profile(&session.user.id) {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(error = %e, "Could not load profile");
                None
            }
        };
        let is_admin = self.auth.has_role(&session.user.id, ADMIN_ROLE)?;

        let user = CurrentUser {
            id: session.user.id.clone(),
            username: username_for(&session, profile.as_ref()),
            is_admin,
        };

        self.persist(&session);
        if let Ok(mut current) = self.session.lock() {
            *current = Some(session);
        }
        self.user_tx.send_replace(Some(user.clone()));
        Ok(user)
    }

    fn persist(&self, session: &AuthSession) {
        let path = self.session_path();
        let result = path
            .parent()
            .map(std::fs::create_dir_all)
            .unwrap_or(Ok(()))
            .and_then(|_| {
                let json = serde_json::to_string(session).map_err(std::io::Error::other)?;
                std::fs::write(&path, json)
            });
        if let Err(e) = result {
            tracing::warn!(path = %path.display(), error = %e, "Could not save session");
        }
    }

    fn forget(&self) {
        let path = self.session_path();
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), error = %e, "Could not remove session file");
            }
        }
    }
}

fn username_for(session: &AuthSession, profile: Option<&Profile>) -> String {
    profile
        .and_then(|p| p.display_name.clone())
        .or_else(|| session.user.display_name().map(str::to_string))
        .or_else(|| {
            session
                .user
                .email
                .as_deref()
                .and_then(|e| e.split('@').next())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "citizen".to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::backend::AuthUser;
    use crate::config::BootstrapAdmin;
    use std::collections::{HashMap, HashSet};

    pub(crate) fn jwt_with_exp(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let claims = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"u1","exp":{}}}"#, exp));
        format!("{}.{}.sig", header, claims)
    }

    fn session_for(id: &str, email: &str, exp: i64) -> AuthSession {
        AuthSession {
            access_token: jwt_with_exp(exp),
            refresh_token: format!("refresh-{}", id),
            expires_in: Some(3600),
            expires_at: None,
            user: AuthUser {
                id: id.to_string(),
                email: Some(email.to_string()),
                user_metadata: serde_json::json!({}),
            },
        }
    }

    /// Auth double keyed by synthetic e-mail
    #[derive(Default)]
    pub(crate) struct FakeAuth {
        pub accounts: Mutex<HashMap<String, (String, String)>>,
        pub roles: Mutex<HashSet<(String, String)>>,
        pub token: Mutex<Option<String>>,
        pub refresh_ok: bool,
        pub deny_roles: bool,
    }

    impl AuthService for FakeAuth {
        fn sign_up(
            &self,
            email: &str,
            password: &str,
            _display_name: &str,
        ) -> Result<Option<AuthSession>, BackendError> {
            let mut accounts = self.accounts.lock().unwrap();
            if accounts.contains_key(email) {
                return Err(BackendError::Http {
                    status: 422,
                    code: None,
                    message: "User already registered".to_string(),
                });
            }
            let id = format!("user-{}", accounts.len() + 1);
            accounts.insert(email.to_string(), (id.clone(), password.to_string()));
            Ok(Some(session_for(&id, email, Utc::now().timestamp() + 3600)))
        }

        fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, BackendError> {
            let accounts = self.accounts.lock().unwrap();
            match accounts.get(email) {
                Some((id, pw)) if pw == password => {
                    Ok(session_for(id, email, Utc::now().timestamp() + 3600))
                }
                _ => Err(BackendError::Http {
                    status: 400,
                    code: None,
                    message: "Invalid login credentials".to_string(),
                }),
            }
        }

        fn refresh(&self, refresh_token: &str) -> Result<AuthSession, BackendError> {
            if !self.refresh_ok {
                return Err(BackendError::Http {
                    status: 400,
                    code: None,
                    message: "Invalid Refresh Token".to_string(),
                });
            }
            let id = refresh_token.trim_start_matches("refresh-");
            Ok(session_for(
                id,
                "restored@nagarikvani.demo",
                Utc::now().timestamp() + 3600,
            ))
        }

        fn sign_out(&self, _access_token: &str) -> Result<(), BackendError> {
            Ok(())
        }

        fn fetch_profile(&self, user_id: &str) -> Result<Option<Profile>, BackendError> {
            Ok(Some(Profile {
                id: format!("p-{}", user_id),
                user_id: user_id.to_string(),
                display_name: Some(format!("name-of-{}", user_id)),
            }))
        }

        fn has_role(&self, user_id: &str, role: &str) -> Result<bool, BackendError> {
            Ok(self
                .roles
                .lock()
                .unwrap()
                .contains(&(user_id.to_string(), role.to_string())))
        }

        fn grant_role(&self, user_id: &str, role: &str) -> Result<(), BackendError> {
            if self.deny_roles {
                return Err(BackendError::Unauthorized {
                    message: "new row violates row-level security policy".to_string(),
                });
            }
            self.roles
                .lock()
                .unwrap()
                .insert((user_id.to_string(), role.to_string()));
            Ok(())
        }

        fn set_access_token(&self, token: Option<String>) {
            *self.token.lock().unwrap() = token;
        }
    }

    fn config_in(dir: &std::path::Path) -> AuthConfig {
        AuthConfig {
            session_path: dir.join("session.json"),
            ..Default::default()
        }
    }

    #[test]
    fn test_synthetic_email() {
        assert_eq!(
            synthetic_email("Ravi.Kumar_42", "nagarikvani.demo"),
            "ravikumar42@nagarikvani.demo"
        );
        assert_eq!(synthetic_email("ರವಿ", "x.demo"), "@x.demo");
    }

    #[test]
    fn test_validation_rules() {
        assert_eq!(
            validate_sign_up("ab", "secret1", "secret1"),
            Err(ValidationError::UsernameTooShort)
        );
        assert_eq!(
            validate_sign_up("abc", "12345", "12345"),
            Err(ValidationError::PasswordTooShort)
        );
        assert_eq!(
            validate_sign_up("abc", "123456", "1234567"),
            Err(ValidationError::PasswordMismatch)
        );
        assert!(validate_sign_up("abc", "123456", "123456").is_ok());

        assert_eq!(validate_sign_in("  ", "x"), Err(ValidationError::MissingUsername));
        assert_eq!(validate_sign_in("abc", ""), Err(ValidationError::MissingPassword));
    }

    #[test]
    fn test_token_expiry_decoding() {
        assert_eq!(token_expiry(&jwt_with_exp(1_700_000_000)), Some(1_700_000_000));
        assert_eq!(token_expiry("not-a-jwt"), None);
    }

    #[test]
    fn test_sign_up_then_duplicate_is_taken() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SessionManager::new(Arc::new(FakeAuth::default()), config_in(dir.path()));

        let user = manager.sign_up("Ravi", "secret1", "secret1").unwrap().unwrap();
        assert_eq!(user.username, "name-of-user-1");
        assert!(!user.is_admin);

        let err = manager.sign_up("ravi", "another", "another").unwrap_err();
        assert_eq!(err, AuthFailure::UsernameTaken);
        assert_eq!(err.to_string(), "This username is already taken");
    }

    #[test]
    fn test_wrong_password_message() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SessionManager::new(Arc::new(FakeAuth::default()), config_in(dir.path()));
        manager.sign_up("Ravi", "secret1", "secret1").unwrap();

        let err = manager.sign_in("Ravi", "wrong!!").unwrap_err();
        assert_eq!(err.to_string(), "Invalid username or password");
    }

    #[test]
    fn test_session_changes_are_broadcast() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SessionManager::new(Arc::new(FakeAuth::default()), config_in(dir.path()));
        let rx = manager.subscribe();
        assert!(rx.borrow().is_none());

        manager.sign_up("Asha", "secret1", "secret1").unwrap();
        assert_eq!(rx.borrow().as_ref().map(|u| u.id.as_str()), Some("user-1"));
        assert!(dir.path().join("session.json").exists());

        manager.sign_out().unwrap();
        assert!(rx.borrow().is_none());
        assert!(!dir.path().join("session.json").exists());
    }

    #[test]
    fn test_bootstrap_admin_only_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let auth = Arc::new(FakeAuth::default());

        let manager = SessionManager::new(auth.clone(), config_in(dir.path()));
        manager.sign_up("Admin", "Admin@3142", "Admin@3142").unwrap();
        let user = manager.sign_in("Admin", "Admin@3142").unwrap();
        assert!(!user.is_admin);

        let config = AuthConfig {
            bootstrap_admin: Some(BootstrapAdmin {
                username: "Admin".to_string(),
                password: "Admin@3142".to_string(),
            }),
            ..config_in(dir.path())
        };
        let manager = SessionManager::new(auth.clone(), config);
        let user = manager.sign_in("Admin", "Admin@3142").unwrap();
        assert!(user.is_admin);

        // second sign-in does not duplicate the role
        manager.sign_in("Admin", "Admin@3142").unwrap();
        assert_eq!(auth.roles.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_failed_bootstrap_still_signs_in() {
        let dir = tempfile::tempdir().unwrap();
        let auth = Arc::new(FakeAuth {
            deny_roles: true,
            ..Default::default()
        });
        let config = AuthConfig {
            bootstrap_admin: Some(BootstrapAdmin {
                username: "Admin".to_string(),
                password: "Admin@3142".to_string(),
            }),
            ..config_in(dir.path())
        };
        let manager = SessionManager::new(auth.clone(), config);
        manager.sign_up("Admin", "Admin@3142", "Admin@3142").unwrap();

        let user = manager.sign_in("Admin", "Admin@3142").unwrap();
        assert!(!user.is_admin);
        assert!(auth.token.lock().unwrap().is_some());
        assert_eq!(manager.current_user().map(|u| u.id), Some(user.id));
    }

    #[test]
    fn test_restore_valid_session() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let saved = session_for("user-7", "x@nagarikvani.demo", Utc::now().timestamp() + 600);
        std::fs::write(&config.session_path, serde_json::to_string(&saved).unwrap()).unwrap();

        let auth = Arc::new(FakeAuth::default());
        let manager = SessionManager::new(auth.clone(), config);
        let user = manager.restore().unwrap().unwrap();
        assert_eq!(user.id, "user-7");
        assert_eq!(auth.token.lock().unwrap().as_deref(), Some(saved.access_token.as_str()));
    }

    #[test]
    fn test_restore_expired_session_refreshes() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let saved = session_for("user-7", "x@nagarikvani.demo", Utc::now().timestamp() - 10);
        std::fs::write(&config.session_path, serde_json::to_string(&saved).unwrap()).unwrap();

        let auth = Arc::new(FakeAuth {
            refresh_ok: true,
            ..Default::default()
        });
        let manager = SessionManager::new(auth, config);
        let user = manager.restore().unwrap().unwrap();
        assert_eq!(user.id, "user-7");
    }

    #[test]
    fn test_restore_discards_unrefreshable_session() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let path = config.session_path.clone();
        let saved = session_for("user-7", "x@nagarikvani.demo", Utc::now().timestamp() - 10);
        std::fs::write(&path, serde_json::to_string(&saved).unwrap()).unwrap();

        let manager = SessionManager::new(Arc::new(FakeAuth::default()), config);
        assert_eq!(manager.restore().unwrap(), None);
        assert!(!path.exists());
        assert_eq!(manager.current_user(), None);
    }
}
