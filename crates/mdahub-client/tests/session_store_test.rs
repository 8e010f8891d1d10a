//! Session persistence behavior across client instances.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use mdahub_client::{PortalClient, Session, SessionIdentity, SessionSlot, SessionStore};

fn token_with_exp(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        serde_json::json!({"sub": "a-1", "role": "admin", "iat": 0, "exp": exp}).to_string(),
    );
    format!("{}.{}.sig", header, payload)
}

fn admin_session(exp: i64) -> Session {
    Session {
        identity: SessionIdentity {
            id: "a-1".to_string(),
            name: "Jane Admin".to_string(),
            role: "admin".to_string(),
            mda_id: None,
        },
        token: token_with_exp(exp),
    }
}

#[test]
fn sessions_survive_export_and_restore() {
    let mut store = SessionStore::new();
    let exp = chrono::Utc::now().timestamp() + 3600;
    store.set(SessionSlot::Admin, admin_session(exp));
    let data = store.serialize().unwrap();

    let client = PortalClient::new("http://localhost:8080").unwrap();
    client.restore_sessions(&data).unwrap();

    let identity = client.identity(SessionSlot::Admin).unwrap();
    assert_eq!(identity.id, "a-1");
    assert_eq!(identity.role, "admin");
    assert!(client.identity(SessionSlot::User).is_none());
}

#[test]
fn expired_sessions_are_dropped_on_restore() {
    let mut store = SessionStore::new();
    let exp = chrono::Utc::now().timestamp() - 60;
    store.set(SessionSlot::Admin, admin_session(exp));
    let data = store.serialize().unwrap();

    let client = PortalClient::new("http://localhost:8080").unwrap();
    client.restore_sessions(&data).unwrap();

    assert!(client.identity(SessionSlot::Admin).is_none());
}

#[test]
fn validate_sessions_reports_dropped_slots() {
    let client = PortalClient::new("http://localhost:8080").unwrap();

    let mut store = SessionStore::new();
    let exp = chrono::Utc::now().timestamp() + 3600;
    store.set(SessionSlot::Admin, admin_session(exp));
    client.restore_sessions(&store.serialize().unwrap()).unwrap();

    // A live session is untouched
    assert!(client.validate_sessions().is_empty());
    assert!(client.identity(SessionSlot::Admin).is_some());
}
