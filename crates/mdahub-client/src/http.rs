//! HTTP client for the portal API
//!
//! One reqwest client serves both session slots. Every request picks
//! its token by path shape: admin routes get the admin token, everything
//! else gets the user token, and at most one token rides along.

use std::time::Duration;

use parking_lot::RwLock;
use reqwest::{Client, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, warn};

use mdahub_api::model::{
    ADMIN_AUTH_PATH_PREFIX, ADMIN_PATH_PREFIX, AUTHORIZATION_HEADER, TOKEN_PREFIX,
};

use crate::session::{Session, SessionIdentity, SessionSlot, SessionStore};

const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;
const DEFAULT_READ_TIMEOUT_MS: u64 = 30000;

/// Pick the session slot a request path belongs to.
pub fn slot_for_path(path: &str) -> SessionSlot {
    if path.contains(ADMIN_PATH_PREFIX) || path.contains(ADMIN_AUTH_PATH_PREFIX) {
        SessionSlot::Admin
    } else {
        SessionSlot::User
    }
}

/// HTTP client holding both portal sessions.
pub struct PortalClient {
    client: Client,
    base_url: String,
    sessions: RwLock<SessionStore>,
}

impl PortalClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS))
            .timeout(Duration::from_millis(DEFAULT_READ_TIMEOUT_MS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            sessions: RwLock::new(SessionStore::new()),
        })
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------

    /// Sign in as a portal user. The identifier may be a username or a
    /// contact email. Failures are logged and reported as `false`.
    pub async fn login(&self, identifier: &str, password: &str) -> bool {
        self.establish_session(
            SessionSlot::User,
            "/api/auth/login",
            &serde_json::json!({ "username": identifier, "password": password }),
        )
        .await
    }

    /// Sign in as an administrator by email.
    pub async fn admin_login(&self, email: &str, password: &str) -> bool {
        self.establish_session(
            SessionSlot::Admin,
            "/api/auth/admin/login",
            &serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    async fn establish_session(&self, slot: SessionSlot, path: &str, body: &Value) -> bool {
        let url = self.build_url(path);
        let response = match self.client.post(&url).json(body).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("login request to {} failed: {}", path, e);
                return false;
            }
        };

        if !response.status().is_success() {
            warn!("login to {} rejected with status {}", path, response.status());
            return false;
        }

        let envelope: Value = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                warn!("login response from {} unreadable: {}", path, e);
                return false;
            }
        };
        let data = &envelope["data"];

        let Some(token) = data["accessToken"].as_str() else {
            warn!("login response from {} carried no token", path);
            return false;
        };
        let identity = SessionIdentity {
            id: data["id"].as_str().unwrap_or_default().to_string(),
            name: data["name"].as_str().unwrap_or_default().to_string(),
            role: data["role"].as_str().unwrap_or_default().to_string(),
            mda_id: data["mdaId"].as_str().map(str::to_string),
        };

        debug!(role = identity.role, "session established");
        self.sessions.write().set(
            slot,
            Session {
                identity,
                token: token.to_string(),
            },
        );

        true
    }

    /// End the user session, telling the server first so the token
    /// leaves its validation cache.
    pub async fn logout(&self) {
        self.end_session(SessionSlot::User, "/api/auth/logout").await;
    }

    pub async fn admin_logout(&self) {
        self.end_session(SessionSlot::Admin, "/api/auth/admin/logout")
            .await;
    }

    pub async fn logout_all(&self) {
        self.logout().await;
        self.admin_logout().await;
    }

    async fn end_session(&self, slot: SessionSlot, path: &str) {
        let token = self.sessions.read().usable_token(slot);

        // The slot is cleared regardless of what the server says
        if let Some(token) = token {
            let url = self.build_url(path);
            let result = self
                .client
                .post(&url)
                .header(AUTHORIZATION_HEADER, format!("{}{}", TOKEN_PREFIX, token))
                .send()
                .await;
            if let Err(e) = result {
                warn!("logout request to {} failed: {}", path, e);
            }
        }

        self.sessions.write().clear(slot);
    }

    /// Drop sessions whose tokens have expired; returns the slots that
    /// were cleared. Suitable for a periodic check.
    pub fn validate_sessions(&self) -> Vec<SessionSlot> {
        self.sessions.write().validate()
    }

    pub fn identity(&self, slot: SessionSlot) -> Option<SessionIdentity> {
        self.sessions.read().get(slot).map(|s| s.identity.clone())
    }

    /// Serialize both sessions for persistence.
    pub fn export_sessions(&self) -> anyhow::Result<String> {
        self.sessions.read().serialize()
    }

    /// Restore sessions persisted with [`PortalClient::export_sessions`].
    pub fn restore_sessions(&self, data: &str) -> anyhow::Result<()> {
        let store = SessionStore::deserialize(data)?;
        *self.sessions.write() = store;

        Ok(())
    }

    // ------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        self.request(reqwest::Method::GET, path, None::<&()>).await
    }

    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<T> {
        self.request(reqwest::Method::POST, path, Some(body)).await
    }

    pub async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<T> {
        self.request(reqwest::Method::PUT, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        self.request(reqwest::Method::DELETE, path, None::<&()>)
            .await
    }

    async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&B>,
    ) -> anyhow::Result<T> {
        let slot = slot_for_path(path);
        let token = self.sessions.read().usable_token(slot);

        let url = self.build_url(path);
        let mut builder = self.client.request(method, &url);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION_HEADER, format!("{}{}", TOKEN_PREFIX, token));
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            debug!(path, "request rejected as unauthorized, dropping session");
            self.sessions.write().clear(slot);
            anyhow::bail!("unauthorized: {}", path);
        }
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("request to {} failed with {}: {}", path, status, text);
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_for_path() {
        assert_eq!(slot_for_path("/api/admin/users"), SessionSlot::Admin);
        assert_eq!(slot_for_path("/api/auth/admin/login"), SessionSlot::Admin);
        assert_eq!(
            slot_for_path("/api/admin/export/combined"),
            SessionSlot::Admin
        );
        assert_eq!(slot_for_path("/api/auth/login"), SessionSlot::User);
        assert_eq!(slot_for_path("/api/profile"), SessionSlot::User);
        assert_eq!(slot_for_path("/api/mda"), SessionSlot::User);
    }

    #[test]
    fn test_base_url_trimmed() {
        let client = PortalClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.build_url("/api/profile"), "http://localhost:8080/api/profile");
    }
}
