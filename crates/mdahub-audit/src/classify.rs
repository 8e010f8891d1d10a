//! Request classification
//!
//! Maps an HTTP method and path onto an audit action and resource type.
//! Reads are never audited, so GET and HEAD classify to nothing.

use crate::model::{action, resource};

/// Derive the audit action from the request shape. Password resets and
/// exports get their own action regardless of the HTTP verb.
pub fn action_for_request(method: &str, path: &str) -> Option<&'static str> {
    if path.ends_with("/reset-password") {
        return Some(action::RESET_PASSWORD);
    }
    if path.contains("/export/") || path.ends_with("/export") {
        return Some(action::EXPORT);
    }

    match method {
        "POST" => Some(action::CREATE),
        "PUT" | "PATCH" => Some(action::UPDATE),
        "DELETE" => Some(action::DELETE),
        _ => None,
    }
}

/// Derive the audited resource type from the request path.
pub fn resource_for_path(path: &str) -> Option<&'static str> {
    if path.contains("/export/") || path.ends_with("/export") {
        return Some(resource::EXPORT);
    }
    if path.contains("/users") {
        return Some(resource::USER);
    }
    if path.contains("/mdas") {
        return Some(resource::MDA);
    }
    if path.contains("/admins") {
        return Some(resource::ADMIN);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbs_map_to_actions() {
        assert_eq!(
            action_for_request("POST", "/api/admin/users"),
            Some(action::CREATE)
        );
        assert_eq!(
            action_for_request("PUT", "/api/admin/users/u-1"),
            Some(action::UPDATE)
        );
        assert_eq!(
            action_for_request("PATCH", "/api/admin/mdas/m-1"),
            Some(action::UPDATE)
        );
        assert_eq!(
            action_for_request("DELETE", "/api/admin/admins/a-2"),
            Some(action::DELETE)
        );
    }

    #[test]
    fn test_reads_are_not_audited() {
        assert_eq!(action_for_request("GET", "/api/admin/users"), None);
        assert_eq!(action_for_request("HEAD", "/api/admin/users"), None);
    }

    #[test]
    fn test_special_actions() {
        assert_eq!(
            action_for_request("PUT", "/api/admin/users/u-1/reset-password"),
            Some(action::RESET_PASSWORD)
        );
        // The override is path-shaped, not verb-shaped
        assert_eq!(
            action_for_request("POST", "/api/admin/admins/a-1/reset-password"),
            Some(action::RESET_PASSWORD)
        );
        assert_eq!(
            action_for_request("GET", "/api/admin/export/users"),
            Some(action::EXPORT)
        );
        assert_eq!(
            action_for_request("GET", "/api/admin/activities/export"),
            Some(action::EXPORT)
        );
    }

    #[test]
    fn test_paths_map_to_resources() {
        assert_eq!(resource_for_path("/api/admin/users/u-1"), Some(resource::USER));
        assert_eq!(resource_for_path("/api/admin/mdas"), Some(resource::MDA));
        assert_eq!(resource_for_path("/api/admin/admins/a-1"), Some(resource::ADMIN));
        assert_eq!(
            resource_for_path("/api/admin/export/combined"),
            Some(resource::EXPORT)
        );
        assert_eq!(
            resource_for_path("/api/admin/activities/export"),
            Some(resource::EXPORT)
        );
        assert_eq!(resource_for_path("/api/auth/login"), None);
    }
}
