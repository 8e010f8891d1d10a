//! JWT token service
//!
//! Sessions for users and admins are signed with different secrets, so
//! a token minted in one namespace never validates in the other.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::LazyLock;
use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use moka::sync::Cache;

use crate::model::PortalClaims;

/// Cached token data containing the full payload
#[derive(Clone)]
struct CachedTokenData {
    claims: PortalClaims,
    /// Fingerprint of the secret the token was validated under
    secret_fingerprint: u64,
}

fn secret_fingerprint(secret_key: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    secret_key.hash(&mut hasher);
    hasher.finish()
}

/// JWT token cache to avoid repeated validation of the same token
static TOKEN_CACHE: LazyLock<Cache<String, CachedTokenData>> = LazyLock::new(|| {
    Cache::builder()
        .max_capacity(10_000)
        .time_to_live(Duration::from_secs(300)) // 5 minutes TTL
        .build()
});

/// Decode and validate a session token with caching
pub fn decode_token_cached(
    token: &str,
    secret_key: &str,
) -> jsonwebtoken::errors::Result<jsonwebtoken::TokenData<PortalClaims>> {
    let fingerprint = secret_fingerprint(secret_key);

    // A hit only counts when the entry was validated under the same
    // secret; the user and admin namespaces share one cache.
    if let Some(cached) = TOKEN_CACHE.get(token)
        && cached.secret_fingerprint == fingerprint
    {
        let now = chrono::Utc::now().timestamp();
        if cached.claims.exp > now {
            return Ok(jsonwebtoken::TokenData {
                header: jsonwebtoken::Header::default(),
                claims: cached.claims,
            });
        }
        // Token expired in cache, invalidate it
        TOKEN_CACHE.invalidate(token);
    }

    let result = decode_token(token, secret_key)?;

    TOKEN_CACHE.insert(
        token.to_string(),
        CachedTokenData {
            claims: result.claims.clone(),
            secret_fingerprint: fingerprint,
        },
    );

    Ok(result)
}

/// Decode and validate a session token without caching
pub fn decode_token(
    token: &str,
    secret_key: &str,
) -> jsonwebtoken::errors::Result<jsonwebtoken::TokenData<PortalClaims>> {
    let decoding_key = DecodingKey::from_secret(secret_key.as_bytes());
    decode::<PortalClaims>(token, &decoding_key, &Validation::default())
}

/// Invalidate a token from the cache
pub fn invalidate_token(token: &str) {
    TOKEN_CACHE.invalidate(token);
}

/// Clear the entire token cache
#[allow(dead_code)]
pub fn clear_token_cache() {
    TOKEN_CACHE.invalidate_all();
}

/// Encode a session token for the given principal
pub fn encode_token(
    sub: &str,
    role: &str,
    mda_id: Option<&str>,
    secret_key: &str,
    expire_seconds: i64,
) -> jsonwebtoken::errors::Result<String> {
    let iat = chrono::Utc::now().timestamp();
    let exp = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::seconds(expire_seconds))
        .unwrap_or_else(chrono::Utc::now)
        .timestamp();

    let payload = PortalClaims {
        sub: sub.to_string(),
        role: role.to_string(),
        mda_id: mda_id.map(str::to_string),
        iat,
        exp,
    };

    let header = Header {
        typ: None,
        alg: Algorithm::HS256,
        ..Default::default()
    };

    let encoding_key = EncodingKey::from_secret(secret_key.as_bytes());
    encode(&header, &payload, &encoding_key)
}
