//! Common API models and constants
//!
//! Shared constants and data structures used across the server handlers
//! and the client SDK.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

// Header keys
pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const TOKEN_PREFIX: &str = "Bearer ";

// API paths
pub const ADMIN_PATH_PREFIX: &str = "/admin/";
pub const ADMIN_AUTH_PATH_PREFIX: &str = "/auth/admin/";

// Pagination
pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

// Export
pub const EXPORT_MAX_ROWS: u64 = 10_000;

/// Clamp a requested page size to the allowed window.
pub fn clamp_page_size(page_size: u64) -> u64 {
    page_size.clamp(1, MAX_PAGE_SIZE)
}

/// Parse a timestamp filter accepting both ISO 8601 `T` and space-separated forms.
pub fn parse_datetime(s: &str) -> Option<chrono::NaiveDateTime> {
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

/// Generic pagination wrapper for API responses
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total_count: u64,
    pub page_number: u64,
    pub pages_available: u64,
    pub page_items: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            total_count: 0,
            page_number: 1,
            pages_available: 0,
            page_items: vec![],
        }
    }
}

impl<T> Page<T> {
    pub fn new(total_count: u64, page_number: u64, page_size: u64, page_items: Vec<T>) -> Self {
        Self {
            total_count,
            page_number,
            pages_available: if page_size > 0 {
                (total_count as f64 / page_size as f64).ceil() as u64
            } else {
                0
            },
            page_items,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// Export format selector for CSV/JSON downloads
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
        }
    }
}

impl Display for ExportFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_math() {
        let page = Page::new(25, 2, 10, vec![1, 2, 3]);
        assert_eq!(page.total_count, 25);
        assert_eq!(page.page_number, 2);
        assert_eq!(page.pages_available, 3);
        assert_eq!(page.page_items.len(), 3);
    }

    #[test]
    fn test_page_zero_size() {
        let page: Page<i32> = Page::new(25, 1, 0, vec![]);
        assert_eq!(page.pages_available, 0);
    }

    #[test]
    fn test_page_empty() {
        let page: Page<String> = Page::empty();
        assert_eq!(page.total_count, 0);
        assert_eq!(page.page_number, 1);
        assert!(page.page_items.is_empty());
    }

    #[test]
    fn test_clamp_page_size() {
        assert_eq!(clamp_page_size(0), 1);
        assert_eq!(clamp_page_size(50), 50);
        assert_eq!(clamp_page_size(100), 100);
        assert_eq!(clamp_page_size(5000), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_parse_datetime_both_forms() {
        assert!(parse_datetime("2026-01-15T08:30:00").is_some());
        assert!(parse_datetime("2026-01-15 08:30:00").is_some());
        assert!(parse_datetime("15/01/2026").is_none());
    }

    #[test]
    fn test_export_format() {
        assert_eq!(ExportFormat::Csv.as_str(), "csv");
        assert_eq!(ExportFormat::Json.content_type(), "application/json");
        let parsed: ExportFormat = serde_json::from_str("\"csv\"").unwrap();
        assert_eq!(parsed, ExportFormat::Csv);
    }
}
