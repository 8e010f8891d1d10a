//! Local JWT payload inspection
//!
//! The client never verifies signatures; the server is the trust
//! boundary. These helpers only read the payload to decide whether a
//! stored token is still worth sending.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

/// Sessions this close to expiry are treated as expiring soon
pub const EXPIRING_SOON_SECONDS: i64 = 300;

/// Claims carried in a portal token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub role: String,
    #[serde(rename = "mdaId", skip_serializing_if = "Option::is_none")]
    pub mda_id: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl TokenClaims {
    pub fn is_expired(&self) -> bool {
        self.exp <= chrono::Utc::now().timestamp()
    }

    pub fn expires_within(&self, seconds: i64) -> bool {
        self.exp <= chrono::Utc::now().timestamp() + seconds
    }

    pub fn is_expiring_soon(&self) -> bool {
        self.expires_within(EXPIRING_SOON_SECONDS)
    }
}

/// Decode the payload segment of a JWT without verifying the signature.
/// Returns `None` for anything that does not look like a portal token.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;

    serde_json::from_slice(&bytes).ok()
}

/// A token is usable when it decodes and has not expired yet.
pub fn is_token_usable(token: &str) -> bool {
    decode_claims(token).is_some_and(|c| !c.is_expired())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_token(claims: &TokenClaims) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).unwrap());
        format!("{}.{}.fakesignature", header, payload)
    }

    fn claims_with_exp(exp: i64) -> TokenClaims {
        TokenClaims {
            sub: "u-1".to_string(),
            role: "user".to_string(),
            mda_id: Some("m-1".to_string()),
            iat: 0,
            exp,
        }
    }

    #[test]
    fn test_decode_claims_roundtrip() {
        let claims = claims_with_exp(chrono::Utc::now().timestamp() + 3600);
        let token = make_token(&claims);

        let decoded = decode_claims(&token).unwrap();
        assert_eq!(decoded.sub, "u-1");
        assert_eq!(decoded.role, "user");
        assert_eq!(decoded.mda_id.as_deref(), Some("m-1"));
    }

    #[test]
    fn test_decode_claims_rejects_garbage() {
        assert!(decode_claims("not-a-token").is_none());
        assert!(decode_claims("a.b.c").is_none());
        assert!(decode_claims("").is_none());
    }

    #[test]
    fn test_expiry_checks() {
        let now = chrono::Utc::now().timestamp();

        let fresh = claims_with_exp(now + 3600);
        assert!(!fresh.is_expired());
        assert!(!fresh.is_expiring_soon());

        let soon = claims_with_exp(now + 60);
        assert!(!soon.is_expired());
        assert!(soon.is_expiring_soon());

        let stale = claims_with_exp(now - 10);
        assert!(stale.is_expired());
        assert!(!is_token_usable(&make_token(&stale)));
    }
}
