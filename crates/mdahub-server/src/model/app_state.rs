//! Application state shared across all handlers

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::config::Configuration;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub configuration: Configuration,
    pub database_connection: Arc<DatabaseConnection>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("configuration", &self.configuration)
            .field("database_connection", &"<DatabaseConnection>")
            .finish()
    }
}

impl AppState {
    pub fn new(configuration: Configuration, database_connection: DatabaseConnection) -> Self {
        Self {
            configuration,
            database_connection: Arc::new(database_connection),
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.database_connection
    }

    /// Pick the token secret for a request path. Admin routes live under
    /// `/api/admin/` and `/api/auth/admin/`; everything else is user space.
    pub fn token_secret_for_path(&self, path: &str) -> String {
        if is_admin_path(path) {
            self.configuration.admin_token_secret_key()
        } else {
            self.configuration.user_token_secret_key()
        }
    }
}

pub fn is_admin_path(path: &str) -> bool {
    path.contains("/admin/") || path.ends_with("/admin")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_admin_path() {
        assert!(is_admin_path("/api/admin/users"));
        assert!(is_admin_path("/api/auth/admin/login"));
        assert!(is_admin_path("/api/admin/export/combined"));
        assert!(!is_admin_path("/api/auth/login"));
        assert!(!is_admin_path("/api/profile"));
        assert!(!is_admin_path("/api/mda"));
    }
}
