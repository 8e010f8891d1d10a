//! Authentication and account models
//!
//! Defines JWT claims, the per-request auth context, and the sanitized
//! view models returned by the account services.

use jsonwebtoken::errors::ErrorKind;
use serde::{Deserialize, Serialize};

use mdahub_persistence::entity::{admins, users};

// Roles carried inside tokens and admin rows
pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_SUPERADMIN: &str = "superadmin";

// Password policy
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 72;

// Token lifetimes
pub const DEFAULT_TOKEN_EXPIRE_SECONDS: i64 = 86400;
pub const TOKEN_EXPIRING_SOON_SECONDS: i64 = 300;

/// JWT payload for portal sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalClaims {
    /// Account id of the signed-in principal
    pub sub: String,
    /// `user`, `admin` or `superadmin`
    pub role: String,
    /// Owning MDA for user sessions, absent for admins
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mda_id: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl PortalClaims {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN || self.role == ROLE_SUPERADMIN
    }

    pub fn is_superadmin(&self) -> bool {
        self.role == ROLE_SUPERADMIN
    }
}

/// Auth context passed through request extensions
#[derive(Debug, Default, Clone)]
pub struct AuthContext {
    /// Account id from the validated token
    pub principal_id: String,
    /// Role from the validated token
    pub role: String,
    /// Owning MDA for user sessions
    pub mda_id: Option<String>,
    pub jwt_error: Option<jsonwebtoken::errors::Error>,
    pub token_provided: bool,
}

impl AuthContext {
    pub fn is_authenticated(&self) -> bool {
        self.token_provided && self.jwt_error.is_none() && !self.principal_id.is_empty()
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN || self.role == ROLE_SUPERADMIN
    }

    pub fn is_superadmin(&self) -> bool {
        self.role == ROLE_SUPERADMIN
    }

    pub fn jwt_error_string(&self) -> String {
        if let Some(e) = &self.jwt_error {
            match e.kind() {
                ErrorKind::ExpiredSignature => "token expired!".to_string(),
                _ => e.to_string(),
            }
        } else {
            String::default()
        }
    }
}

/// Sanitized user view, never carries the password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub username: String,
    pub contact_email: String,
    pub mda_id: String,
    pub enabled: bool,
    pub last_login: Option<chrono::NaiveDateTime>,
    pub gmt_create: chrono::NaiveDateTime,
    pub gmt_modified: chrono::NaiveDateTime,
}

impl From<users::Model> for UserInfo {
    fn from(value: users::Model) -> Self {
        Self {
            id: value.id,
            name: value.name,
            username: value.username,
            contact_email: value.contact_email,
            mda_id: value.mda_id,
            enabled: value.enabled,
            last_login: value.last_login,
            gmt_create: value.gmt_create,
            gmt_modified: value.gmt_modified,
        }
    }
}

/// Sanitized admin view, never carries the password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub can_be_deleted: bool,
    pub created_by: Option<String>,
    pub enabled: bool,
    pub last_login: Option<chrono::NaiveDateTime>,
    pub gmt_create: chrono::NaiveDateTime,
    pub gmt_modified: chrono::NaiveDateTime,
}

impl From<admins::Model> for AdminInfo {
    fn from(value: admins::Model) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            role: value.role,
            can_be_deleted: value.can_be_deleted,
            created_by: value.created_by,
            enabled: value.enabled,
            last_login: value.last_login,
            gmt_create: value.gmt_create,
            gmt_modified: value.gmt_modified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_constants() {
        assert_eq!(ROLE_USER, "user");
        assert_eq!(ROLE_ADMIN, "admin");
        assert_eq!(ROLE_SUPERADMIN, "superadmin");
        assert_eq!(MIN_PASSWORD_LENGTH, 8);
        assert_eq!(DEFAULT_TOKEN_EXPIRE_SECONDS, 86400);
    }

    #[test]
    fn test_claims_role_checks() {
        let mut claims = PortalClaims {
            sub: "u-1".to_string(),
            role: ROLE_USER.to_string(),
            mda_id: Some("m-1".to_string()),
            iat: 0,
            exp: 0,
        };
        assert!(!claims.is_admin());
        assert!(!claims.is_superadmin());

        claims.role = ROLE_ADMIN.to_string();
        assert!(claims.is_admin());
        assert!(!claims.is_superadmin());

        claims.role = ROLE_SUPERADMIN.to_string();
        assert!(claims.is_admin());
        assert!(claims.is_superadmin());
    }

    #[test]
    fn test_claims_omit_absent_mda() {
        let claims = PortalClaims {
            sub: "a-1".to_string(),
            role: ROLE_ADMIN.to_string(),
            mda_id: None,
            iat: 1,
            exp: 2,
        };
        let json = serde_json::to_string(&claims).unwrap();
        assert!(!json.contains("mdaId"));
    }

    #[test]
    fn test_auth_context_default() {
        let ctx = AuthContext::default();
        assert!(!ctx.is_authenticated());
        assert!(!ctx.is_admin());
        assert!(ctx.jwt_error.is_none());
        assert_eq!(ctx.jwt_error_string(), "");
    }

    #[test]
    fn test_auth_context_authenticated() {
        let ctx = AuthContext {
            principal_id: "a-1".to_string(),
            role: ROLE_ADMIN.to_string(),
            mda_id: None,
            jwt_error: None,
            token_provided: true,
        };
        assert!(ctx.is_authenticated());
        assert!(ctx.is_admin());
        assert!(!ctx.is_superadmin());
    }
}
