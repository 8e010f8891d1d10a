//! MDA (Ministry, Department, Agency) entity
//!
//! Each MDA carries an embedded list of report links stored as a JSON
//! column rather than a separate table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "mdas")]
pub struct Model {
    /// UUID string assigned at creation
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Official name, unique across the table
    pub name: String,
    /// Report links as a JSON array of `Report` objects
    pub reports: Json,
    pub enabled: bool,
    pub gmt_create: DateTime,
    pub gmt_modified: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Value object stored inside the `reports` JSON column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub url: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Model {
    /// Decode the JSON column into typed report entries. Entries that
    /// fail to decode are dropped rather than failing the whole row.
    pub fn report_list(&self) -> Vec<Report> {
        match &self.reports {
            Json::Array(items) => items
                .iter()
                .filter_map(|v| serde_json::from_value(v.clone()).ok())
                .collect(),
            _ => vec![],
        }
    }
}

/// Encode typed report entries back into the JSON column form.
pub fn reports_to_json(reports: &[Report]) -> Json {
    serde_json::to_value(reports).unwrap_or(Json::Array(vec![]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_roundtrip() {
        let reports = vec![
            Report {
                title: "Q1 Revenue".to_string(),
                url: "https://reports.example.gov/q1".to_string(),
                enabled: true,
            },
            Report {
                title: "Q2 Revenue".to_string(),
                url: "https://reports.example.gov/q2".to_string(),
                enabled: false,
            },
        ];

        let json = reports_to_json(&reports);
        let model = Model {
            id: "a1".to_string(),
            name: "Ministry of Finance".to_string(),
            reports: json,
            enabled: true,
            gmt_create: Default::default(),
            gmt_modified: Default::default(),
        };

        assert_eq!(model.report_list(), reports);
    }

    #[test]
    fn test_report_list_tolerates_bad_entries() {
        let model = Model {
            id: "a1".to_string(),
            name: "Ministry of Finance".to_string(),
            reports: serde_json::json!([
                {"title": "Valid", "url": "https://x"},
                {"unexpected": true},
            ]),
            enabled: true,
            gmt_create: Default::default(),
            gmt_modified: Default::default(),
        };

        let list = model.report_list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].title, "Valid");
        assert!(list[0].enabled);
    }
}
