//! Dual-slot session store
//!
//! A portal client can hold a user session and an admin session at the
//! same time; they never share a token. Persistence goes through the
//! explicit `serialize`/`deserialize` pair so callers decide where the
//! sessions live between runs.

use serde::{Deserialize, Serialize};

use crate::token;

/// Who a session belongs to, as reported by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    pub id: String,
    pub name: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mda_id: Option<String>,
}

/// An established session: the identity plus the bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub identity: SessionIdentity,
    pub token: String,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        !token::is_token_usable(&self.token)
    }
}

/// The two session slots the store manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSlot {
    User,
    Admin,
}

/// Holds at most one session per slot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStore {
    pub user: Option<Session>,
    pub admin: Option<Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: SessionSlot) -> Option<&Session> {
        match slot {
            SessionSlot::User => self.user.as_ref(),
            SessionSlot::Admin => self.admin.as_ref(),
        }
    }

    pub fn set(&mut self, slot: SessionSlot, session: Session) {
        match slot {
            SessionSlot::User => self.user = Some(session),
            SessionSlot::Admin => self.admin = Some(session),
        }
    }

    pub fn clear(&mut self, slot: SessionSlot) {
        match slot {
            SessionSlot::User => self.user = None,
            SessionSlot::Admin => self.admin = None,
        }
    }

    pub fn clear_all(&mut self) {
        self.user = None;
        self.admin = None;
    }

    /// A token for the slot that is still worth sending, if any.
    pub fn usable_token(&self, slot: SessionSlot) -> Option<String> {
        self.get(slot)
            .filter(|s| !s.is_expired())
            .map(|s| s.token.clone())
    }

    /// Drop sessions whose tokens have expired and report which slots
    /// were cleared. Safe to call repeatedly.
    pub fn validate(&mut self) -> Vec<SessionSlot> {
        let mut dropped = Vec::new();

        if self.user.as_ref().is_some_and(|s| s.is_expired()) {
            self.user = None;
            dropped.push(SessionSlot::User);
        }
        if self.admin.as_ref().is_some_and(|s| s.is_expired()) {
            self.admin = None;
            dropped.push(SessionSlot::Admin);
        }

        dropped
    }

    /// Serialize the store for persistence.
    pub fn serialize(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore a store persisted with [`SessionStore::serialize`].
    /// Expired sessions are dropped on the way in.
    pub fn deserialize(data: &str) -> anyhow::Result<Self> {
        let mut store: SessionStore = serde_json::from_str(data)?;
        store.validate();

        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: &str, token: &str) -> Session {
        Session {
            identity: SessionIdentity {
                id: "x-1".to_string(),
                name: "Test".to_string(),
                role: role.to_string(),
                mda_id: None,
            },
            token: token.to_string(),
        }
    }

    fn live_token() -> String {
        use base64::Engine;
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let exp = chrono::Utc::now().timestamp() + 3600;
        let payload = URL_SAFE_NO_PAD.encode(
            serde_json::json!({"sub": "x-1", "role": "user", "iat": 0, "exp": exp}).to_string(),
        );
        format!("h.{}.s", payload)
    }

    #[test]
    fn test_slots_are_independent() {
        let mut store = SessionStore::new();
        store.set(SessionSlot::User, session("user", &live_token()));
        store.set(SessionSlot::Admin, session("admin", &live_token()));

        store.clear(SessionSlot::User);
        assert!(store.get(SessionSlot::User).is_none());
        assert!(store.get(SessionSlot::Admin).is_some());
    }

    #[test]
    fn test_validate_drops_expired() {
        let mut store = SessionStore::new();
        store.set(SessionSlot::User, session("user", "not-a-jwt"));
        store.set(SessionSlot::Admin, session("admin", &live_token()));

        let dropped = store.validate();
        assert_eq!(dropped, vec![SessionSlot::User]);
        assert!(store.user.is_none());
        assert!(store.admin.is_some());

        // Idempotent
        assert!(store.validate().is_empty());
    }

    #[test]
    fn test_serialize_roundtrip() {
        let mut store = SessionStore::new();
        store.set(SessionSlot::Admin, session("admin", &live_token()));

        let data = store.serialize().unwrap();
        let restored = SessionStore::deserialize(&data).unwrap();
        assert!(restored.user.is_none());
        assert_eq!(restored.admin, store.admin);
    }

    #[test]
    fn test_deserialize_drops_expired() {
        let mut store = SessionStore::new();
        store.set(SessionSlot::User, session("user", "expired-blob"));
        let data = store.serialize().unwrap();

        let restored = SessionStore::deserialize(&data).unwrap();
        assert!(restored.user.is_none());
    }
}
