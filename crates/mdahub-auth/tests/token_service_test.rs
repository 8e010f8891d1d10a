// Integration tests for the token service
// Tests JWT encoding, decoding, caching and namespace separation

use mdahub_auth::model::{ROLE_ADMIN, ROLE_USER};
use mdahub_auth::service::token::{
    decode_token, decode_token_cached, encode_token, invalidate_token,
};

const USER_SECRET: &str = "user-secret-key-that-is-long-enough-for-hs256";
const ADMIN_SECRET: &str = "admin-secret-key-that-is-long-enough-for-hs256";

#[test]
fn test_encode_decode_token() {
    let token = encode_token("u-42", ROLE_USER, Some("mda-7"), USER_SECRET, 3600).unwrap();

    let decoded = decode_token(&token, USER_SECRET).unwrap();
    assert_eq!(decoded.claims.sub, "u-42");
    assert_eq!(decoded.claims.role, ROLE_USER);
    assert_eq!(decoded.claims.mda_id.as_deref(), Some("mda-7"));
    assert!(decoded.claims.exp > decoded.claims.iat);
}

#[test]
fn test_admin_token_has_no_mda() {
    let token = encode_token("a-1", ROLE_ADMIN, None, ADMIN_SECRET, 3600).unwrap();

    let decoded = decode_token(&token, ADMIN_SECRET).unwrap();
    assert_eq!(decoded.claims.role, ROLE_ADMIN);
    assert!(decoded.claims.mda_id.is_none());
}

#[test]
fn test_namespace_separation() {
    // A user-namespace token must never validate against the admin secret
    let token = encode_token("u-42", ROLE_USER, Some("mda-7"), USER_SECRET, 3600).unwrap();

    assert!(decode_token(&token, ADMIN_SECRET).is_err());
}

#[test]
fn test_token_expiration() {
    // Expired 2 minutes ago, beyond the default 60 second leeway
    let token = encode_token("u-42", ROLE_USER, None, USER_SECRET, -120).unwrap();

    assert!(
        decode_token(&token, USER_SECRET).is_err(),
        "Token expired beyond leeway should fail validation"
    );
}

#[test]
fn test_cached_token_validation() {
    let token = encode_token("cached-user", ROLE_USER, None, USER_SECRET, 3600).unwrap();

    // First call - cache miss, performs validation
    let result1 = decode_token_cached(&token, USER_SECRET);
    assert!(result1.is_ok());
    assert_eq!(result1.unwrap().claims.sub, "cached-user");

    // Second call - should hit cache
    let result2 = decode_token_cached(&token, USER_SECRET);
    assert!(result2.is_ok());
    assert_eq!(result2.unwrap().claims.sub, "cached-user");
}

#[test]
fn test_cached_validation_is_scoped_to_secret() {
    let token = encode_token("scoped-user", ROLE_USER, Some("mda-3"), USER_SECRET, 3600).unwrap();

    // Warm the cache under the user secret
    assert!(decode_token_cached(&token, USER_SECRET).is_ok());

    // The cached entry must not satisfy validation in the admin namespace
    assert!(decode_token_cached(&token, ADMIN_SECRET).is_err());

    // The original namespace still validates
    assert!(decode_token_cached(&token, USER_SECRET).is_ok());
}

#[test]
fn test_invalidate_token() {
    let token = encode_token("invalidate-user", ROLE_USER, None, USER_SECRET, 3600).unwrap();
    let _ = decode_token_cached(&token, USER_SECRET);

    invalidate_token(&token);

    // Should still work (re-validates)
    assert!(decode_token_cached(&token, USER_SECRET).is_ok());
}

#[test]
fn test_malformed_token() {
    assert!(decode_token("not.a.valid.token", USER_SECRET).is_err());
    assert!(decode_token("completely-invalid", USER_SECRET).is_err());
}

#[test]
fn test_special_characters_in_subject() {
    let sub = "user@example.gov/portal#test";
    let token = encode_token(sub, ROLE_USER, None, USER_SECRET, 3600).unwrap();

    let decoded = decode_token(&token, USER_SECRET).unwrap();
    assert_eq!(decoded.claims.sub, sub);
}

#[test]
fn test_concurrent_token_validation() {
    use std::sync::Arc;
    use std::thread;

    let token = Arc::new(encode_token("concurrent", ROLE_ADMIN, None, ADMIN_SECRET, 3600).unwrap());

    let mut handles = vec![];

    for _ in 0..10 {
        let token = token.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..100 {
                let result = decode_token_cached(&token, ADMIN_SECRET);
                assert!(result.is_ok());
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
}
