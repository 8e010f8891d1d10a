//! Activity record model and builder

use serde::{Deserialize, Serialize};

/// Action constants
pub mod action {
    pub const CREATE: &str = "CREATE";
    pub const UPDATE: &str = "UPDATE";
    pub const DELETE: &str = "DELETE";
    pub const LOGIN: &str = "LOGIN";
    pub const LOGOUT: &str = "LOGOUT";
    pub const RESET_PASSWORD: &str = "RESET_PASSWORD";
    pub const EXPORT: &str = "EXPORT";
}

/// Resource type constants
pub mod resource {
    pub const USER: &str = "USER";
    pub const MDA: &str = "MDA";
    pub const ADMIN: &str = "ADMIN";
    pub const EXPORT: &str = "EXPORT";
}

/// One entry in the activity trail
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub id: Option<u64>,
    pub admin_id: String,
    pub admin_name: String,
    pub action: String,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub resource_name: Option<String>,
    pub details: Option<String>,
    pub source_ip: Option<String>,
    pub user_agent: Option<String>,
    pub gmt_create: Option<chrono::NaiveDateTime>,
}

impl Default for ActivityRecord {
    fn default() -> Self {
        Self {
            id: None,
            admin_id: String::new(),
            admin_name: "anonymous".to_string(),
            action: String::new(),
            resource_type: String::new(),
            resource_id: None,
            resource_name: None,
            details: None,
            source_ip: None,
            user_agent: None,
            gmt_create: None,
        }
    }
}

impl ActivityRecord {
    /// Create a new activity record builder
    pub fn builder() -> ActivityRecordBuilder {
        ActivityRecordBuilder::new()
    }
}

/// Builder for ActivityRecord
pub struct ActivityRecordBuilder {
    record: ActivityRecord,
}

impl ActivityRecordBuilder {
    pub fn new() -> Self {
        Self {
            record: ActivityRecord::default(),
        }
    }

    pub fn admin(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.record.admin_id = id.into();
        self.record.admin_name = name.into();
        self
    }

    pub fn action(mut self, action: &str) -> Self {
        self.record.action = action.to_string();
        self
    }

    pub fn resource_type(mut self, rt: &str) -> Self {
        self.record.resource_type = rt.to_string();
        self
    }

    pub fn resource_id(mut self, id: impl Into<String>) -> Self {
        self.record.resource_id = Some(id.into());
        self
    }

    pub fn resource_name(mut self, name: impl Into<String>) -> Self {
        self.record.resource_name = Some(name.into());
        self
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.record.details = Some(details.into());
        self
    }

    pub fn details_json<T: Serialize>(mut self, details: &T) -> Self {
        self.record.details = serde_json::to_string(details).ok();
        self
    }

    pub fn source_ip(mut self, ip: impl Into<String>) -> Self {
        self.record.source_ip = Some(ip.into());
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.record.user_agent = Some(ua.into());
        self
    }

    pub fn build(self) -> ActivityRecord {
        self.record
    }
}

impl Default for ActivityRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Search criteria for the activity trail
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySearch {
    pub action: Option<String>,
    pub resource_type: Option<String>,
    pub resource_id: Option<String>,
    pub admin_id: Option<String>,
    pub start_time: Option<chrono::NaiveDateTime>,
    pub end_time: Option<chrono::NaiveDateTime>,
}

/// Enrichment a handler publishes for the audit middleware to pick up
/// after the response completes.
#[derive(Debug, Clone, Default)]
pub struct AuditDetail {
    pub resource_id: Option<String>,
    pub resource_name: Option<String>,
    pub details: Option<String>,
}

impl AuditDetail {
    pub fn new(resource_id: impl Into<String>, resource_name: impl Into<String>) -> Self {
        Self {
            resource_id: Some(resource_id.into()),
            resource_name: Some(resource_name.into()),
            details: None,
        }
    }

    pub fn with_details<T: Serialize>(mut self, details: &T) -> Self {
        self.details = serde_json::to_string(details).ok();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let record = ActivityRecord::builder()
            .admin("a-1", "Jane Admin")
            .action(action::CREATE)
            .resource_type(resource::USER)
            .resource_id("u-9")
            .resource_name("John Citizen")
            .source_ip("10.0.0.5")
            .build();

        assert_eq!(record.admin_id, "a-1");
        assert_eq!(record.action, "CREATE");
        assert_eq!(record.resource_type, "USER");
        assert_eq!(record.resource_id.as_deref(), Some("u-9"));
        assert!(record.details.is_none());
        assert!(record.id.is_none());
    }

    #[test]
    fn test_builder_details_json() {
        let record = ActivityRecord::builder()
            .action(action::UPDATE)
            .resource_type(resource::MDA)
            .details_json(&serde_json::json!({"field": "name"}))
            .build();

        assert_eq!(record.details.as_deref(), Some(r#"{"field":"name"}"#));
    }

    #[test]
    fn test_default_operator_is_anonymous() {
        let record = ActivityRecord::default();
        assert_eq!(record.admin_name, "anonymous");
    }

    #[test]
    fn test_audit_detail() {
        let detail = AuditDetail::new("u-9", "John Citizen")
            .with_details(&serde_json::json!({"enabled": false}));
        assert_eq!(detail.resource_id.as_deref(), Some("u-9"));
        assert!(detail.details.unwrap().contains("enabled"));
    }
}
