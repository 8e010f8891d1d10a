//! Flattened export rows for the data download endpoints
//!
//! Users are exported with their MDA resolved to a display name so the
//! file is readable without a second lookup.

use std::collections::HashMap;

use mdahub_persistence::sea_orm::DatabaseConnection;
use serde::Serialize;

use mdahub_audit::service::csv_field;
use mdahub_auth::service::user;

use crate::service::mda;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserExportRow {
    pub id: String,
    pub name: String,
    pub username: String,
    pub contact_email: String,
    pub mda_id: String,
    pub mda_name: String,
    pub enabled: bool,
    pub last_login: Option<chrono::NaiveDateTime>,
    pub gmt_create: chrono::NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MdaExportRow {
    pub id: String,
    pub name: String,
    pub report_count: usize,
    pub enabled: bool,
    pub gmt_create: chrono::NaiveDateTime,
}

/// Both sections of the combined download.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedExport {
    pub users: Vec<UserExportRow>,
    pub mdas: Vec<MdaExportRow>,
}

pub async fn collect_users(db: &DatabaseConnection) -> anyhow::Result<Vec<UserExportRow>> {
    let mda_names: HashMap<String, String> = mda::find_all(db)
        .await?
        .into_iter()
        .map(|m| (m.id, m.name))
        .collect();

    let rows = user::find_all(db)
        .await?
        .into_iter()
        .map(|u| {
            let mda_name = mda_names.get(&u.mda_id).cloned().unwrap_or_default();
            UserExportRow {
                id: u.id,
                name: u.name,
                username: u.username,
                contact_email: u.contact_email,
                mda_id: u.mda_id,
                mda_name,
                enabled: u.enabled,
                last_login: u.last_login,
                gmt_create: u.gmt_create,
            }
        })
        .collect();

    Ok(rows)
}

pub async fn collect_mdas(db: &DatabaseConnection) -> anyhow::Result<Vec<MdaExportRow>> {
    let rows = mda::find_all(db)
        .await?
        .into_iter()
        .map(|m| {
            let report_count = m.report_list().len();
            MdaExportRow {
                id: m.id,
                name: m.name,
                report_count,
                enabled: m.enabled,
                gmt_create: m.gmt_create,
            }
        })
        .collect();

    Ok(rows)
}

pub async fn collect_combined(db: &DatabaseConnection) -> anyhow::Result<CombinedExport> {
    Ok(CombinedExport {
        users: collect_users(db).await?,
        mdas: collect_mdas(db).await?,
    })
}

fn format_time(t: &chrono::NaiveDateTime) -> String {
    t.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Render user rows as CSV. An empty input still yields the header row.
pub fn users_to_csv(rows: &[UserExportRow]) -> String {
    let mut out =
        String::from("id,name,username,contactEmail,mdaId,mdaName,enabled,lastLogin,created\n");

    for r in rows {
        let fields = [
            r.id.clone(),
            r.name.clone(),
            r.username.clone(),
            r.contact_email.clone(),
            r.mda_id.clone(),
            r.mda_name.clone(),
            r.enabled.to_string(),
            r.last_login.as_ref().map(format_time).unwrap_or_default(),
            format_time(&r.gmt_create),
        ];
        let line: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }

    out
}

pub fn mdas_to_csv(rows: &[MdaExportRow]) -> String {
    let mut out = String::from("id,name,reportCount,enabled,created\n");

    for r in rows {
        let fields = [
            r.id.clone(),
            r.name.clone(),
            r.report_count.to_string(),
            r.enabled.to_string(),
            format_time(&r.gmt_create),
        ];
        let line: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }

    out
}

/// The combined CSV download carries both tables in one file, each
/// introduced by a section marker line.
pub fn combined_to_csv(export: &CombinedExport) -> String {
    let mut out = String::from("# users\n");
    out.push_str(&users_to_csv(&export.users));
    out.push_str("\n# mdas\n");
    out.push_str(&mdas_to_csv(&export.mdas));

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> UserExportRow {
        UserExportRow {
            id: "u-1".to_string(),
            name: "Adaeze Obi, PhD".to_string(),
            username: "aobi".to_string(),
            contact_email: "aobi@finance.example.gov".to_string(),
            mda_id: "m-1".to_string(),
            mda_name: "Ministry of Finance".to_string(),
            enabled: true,
            last_login: None,
            gmt_create: Default::default(),
        }
    }

    fn sample_mda() -> MdaExportRow {
        MdaExportRow {
            id: "m-1".to_string(),
            name: "Ministry of Finance".to_string(),
            report_count: 3,
            enabled: true,
            gmt_create: Default::default(),
        }
    }

    #[test]
    fn test_users_csv_quotes_commas() {
        let csv = users_to_csv(&[sample_user()]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with("u-1,\"Adaeze Obi, PhD\",aobi"));
        assert!(row.contains("Ministry of Finance"));
    }

    #[test]
    fn test_users_csv_empty_has_header() {
        let csv = users_to_csv(&[]);
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.starts_with("id,name,username"));
    }

    #[test]
    fn test_combined_csv_sections() {
        let export = CombinedExport {
            users: vec![sample_user()],
            mdas: vec![sample_mda()],
        };
        let csv = combined_to_csv(&export);
        assert!(csv.starts_with("# users\n"));
        assert!(csv.contains("\n# mdas\n"));
        assert!(csv.contains("Ministry of Finance,3,true"));
    }
}
