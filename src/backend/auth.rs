//! Password auth, profiles and roles.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::rest::{eq, read_json, table_path};
use super::SupabaseClient;
use crate::error::BackendError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

impl AuthUser {
    /// Username chosen at sign-up
    pub fn display_name(&self) -> Option<&str> {
        self.user_metadata
            .get("display_name")
            .and_then(|v| v.as_str())
    }
}

/// Tokens returned by the auth service, persisted between runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Unix seconds
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

pub trait AuthService: Send + Sync {
    /// Returns a session when the project signs users in right away, `None`
    /// when it waits for confirmation.
    fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Option<AuthSession>, BackendError>;

    fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, BackendError>;

    fn refresh(&self, refresh_token: &str) -> Result<AuthSession, BackendError>;

    fn sign_out(&self, access_token: &str) -> Result<(), BackendError>;

    fn fetch_profile(&self, user_id: &str) -> Result<Option<Profile>, BackendError>;

    fn has_role(&self, user_id: &str, role: &str) -> Result<bool, BackendError>;

    fn grant_role(&self, user_id: &str, role: &str) -> Result<(), BackendError>;

    /// Token for subsequent table requests
    fn set_access_token(&self, token: Option<String>);
}

fn parse_session(value: serde_json::Value) -> Result<Option<AuthSession>, BackendError> {
    if value.get("access_token").is_none() {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| BackendError::Decode(e.to_string()))
}

impl SupabaseClient {
    fn token_grant(
        &self,
        grant_type: &str,
        body: serde_json::Value,
    ) -> Result<AuthSession, BackendError> {
        let response = self
            .request("POST", "/auth/v1/token")
            .query("grant_type", grant_type)
            .send_json(body)?;

        let value: serde_json::Value = read_json(response)?;
        parse_session(value)?
            .ok_or_else(|| BackendError::Decode("token response without access_token".to_string()))
    }
}

impl AuthService for SupabaseClient {
    fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Option<AuthSession>, BackendError> {
        let response = self.request("POST", "/auth/v1/signup").send_json(json!({
            "email": email,
            "password": password,
            "data": { "display_name": display_name },
        }))?;

        let value: serde_json::Value = read_json(response)?;
        parse_session(value)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, BackendError> {
        self.token_grant(
            "password",
            json!({ "email": email, "password": password }),
        )
    }

    fn refresh(&self, refresh_token: &str) -> Result<AuthSession, BackendError> {
        self.token_grant("refresh_token", json!({ "refresh_token": refresh_token }))
    }

    fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        self.request("POST", "/auth/v1/logout")
            .set("Authorization", &format!("Bearer {}", access_token))
            .call()?;
        Ok(())
    }

    fn fetch_profile(&self, user_id: &str) -> Result<Option<Profile>, BackendError> {
        let response = self
            .request("GET", &table_path("profiles"))
            .query("select", "*")
            .query("user_id", &eq(user_id))
            .query("limit", "1")
            .call()?;

        let profiles: Vec<Profile> = read_json(response)?;
        Ok(profiles.into_iter().next())
    }

    fn has_role(&self, user_id: &str, role: &str) -> Result<bool, BackendError> {
        let response = self
            .request("GET", &table_path("user_roles"))
            .query("select", "id")
            .query("user_id", &eq(user_id))
            .query("role", &eq(role))
            .call()?;

        let rows: Vec<serde_json::Value> = read_json(response)?;
        Ok(!rows.is_empty())
    }

    fn grant_role(&self, user_id: &str, role: &str) -> Result<(), BackendError> {
        self.request("POST", &table_path("user_roles"))
            .send_json(json!({ "user_id": user_id, "role": role }))?;
        tracing::info!(user_id, role, "Role granted");
        Ok(())
    }

    fn set_access_token(&self, token: Option<String>) {
        SupabaseClient::set_access_token(self, token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_up_without_session() {
        let value = json!({
            "id": "u1",
            "email": "ravi@nagarikvani.demo",
            "user_metadata": { "display_name": "Ravi" }
        });
        assert_eq!(parse_session(value).unwrap(), None);
    }

    #[test]
    fn test_session_parses() {
        let value = json!({
            "access_token": "a.b.c",
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": 1700003600,
            "refresh_token": "r1",
            "user": {
                "id": "u1",
                "email": "ravi@nagarikvani.demo",
                "user_metadata": { "display_name": "Ravi" }
            }
        });
        let session = parse_session(value).unwrap().unwrap();
        assert_eq!(session.refresh_token, "r1");
        assert_eq!(session.expires_at, Some(1_700_003_600));
        assert_eq!(session.user.display_name(), Some("Ravi"));
    }
}
