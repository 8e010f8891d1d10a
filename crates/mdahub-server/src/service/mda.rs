//! MDA service
//!
//! MDAs sit at the center of the data model: users belong to exactly
//! one, so deletion is refused while any user still references it.

use mdahub_api::Page;
use mdahub_common::PortalError;
use mdahub_persistence::entity::mdas::{self, Report, reports_to_json};
use mdahub_persistence::sea_orm::sea_query::Asterisk;
use mdahub_persistence::sea_orm::*;
use serde::{Deserialize, Serialize};

use mdahub_auth::service::user;

/// Outward-facing MDA view with the JSON column decoded into typed
/// report entries.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MdaInfo {
    pub id: String,
    pub name: String,
    pub reports: Vec<Report>,
    pub enabled: bool,
    pub gmt_create: chrono::NaiveDateTime,
    pub gmt_modified: chrono::NaiveDateTime,
}

impl From<mdas::Model> for MdaInfo {
    fn from(model: mdas::Model) -> Self {
        let reports = model.report_list();
        Self {
            id: model.id,
            name: model.name,
            reports,
            enabled: model.enabled,
            gmt_create: model.gmt_create,
            gmt_modified: model.gmt_modified,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMdaParams {
    pub name: String,
    #[serde(default)]
    pub reports: Vec<Report>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMdaParams {
    pub name: Option<String>,
    pub reports: Option<Vec<Report>>,
    pub enabled: Option<bool>,
}

fn default_enabled() -> bool {
    true
}

pub async fn find_by_id(db: &DatabaseConnection, id: &str) -> anyhow::Result<mdas::Model> {
    mdas::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| PortalError::NotFound(format!("mda {}", id)).into())
}

pub async fn find_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> anyhow::Result<Option<mdas::Model>> {
    let mda = mdas::Entity::find()
        .filter(mdas::Column::Name.eq(name))
        .one(db)
        .await?;

    Ok(mda)
}

pub async fn search_page(
    db: &DatabaseConnection,
    keyword: &str,
    page_no: u64,
    page_size: u64,
) -> anyhow::Result<Page<MdaInfo>> {
    let mut count_select = mdas::Entity::find();
    let mut query_select = mdas::Entity::find().order_by_asc(mdas::Column::Name);

    if !keyword.is_empty() {
        count_select = count_select.filter(mdas::Column::Name.contains(keyword));
        query_select = query_select.filter(mdas::Column::Name.contains(keyword));
    }

    let total_count = count_select
        .select_only()
        .column_as(prelude::Expr::col(Asterisk).count(), "count")
        .into_tuple::<i64>()
        .one(db)
        .await?
        .unwrap_or_default() as u64;

    if total_count > 0 {
        let offset = (page_no - 1) * page_size;
        let page_items = query_select
            .offset(offset)
            .limit(page_size)
            .all(db)
            .await?
            .into_iter()
            .map(MdaInfo::from)
            .collect();

        return Ok(Page::<MdaInfo>::new(
            total_count,
            page_no,
            page_size,
            page_items,
        ));
    }

    Ok(Page::<MdaInfo>::default())
}

pub async fn find_all(db: &DatabaseConnection) -> anyhow::Result<Vec<mdas::Model>> {
    let items = mdas::Entity::find()
        .order_by_asc(mdas::Column::Name)
        .all(db)
        .await?;

    Ok(items)
}

/// Create an MDA. The name is pre-checked for a friendly conflict
/// message; the unique index remains authoritative.
pub async fn create(db: &DatabaseConnection, params: CreateMdaParams) -> anyhow::Result<mdas::Model> {
    if params.name.trim().is_empty() {
        return Err(PortalError::Validation("mda name must not be empty".to_string()).into());
    }
    if find_by_name(db, &params.name).await?.is_some() {
        return Err(PortalError::Conflict(format!("mda {}", params.name)).into());
    }

    let now = chrono::Utc::now().naive_utc();
    let entity = mdas::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        name: Set(params.name),
        reports: Set(reports_to_json(&params.reports)),
        enabled: Set(params.enabled),
        gmt_create: Set(now),
        gmt_modified: Set(now),
    };

    let model = entity.insert(db).await?;

    Ok(model)
}

pub async fn update(
    db: &DatabaseConnection,
    id: &str,
    params: UpdateMdaParams,
) -> anyhow::Result<mdas::Model> {
    let existing = find_by_id(db, id).await?;

    if let Some(name) = &params.name
        && name != &existing.name
        && find_by_name(db, name).await?.is_some()
    {
        return Err(PortalError::Conflict(format!("mda {}", name)).into());
    }

    let mut mda: mdas::ActiveModel = existing.into();
    if let Some(name) = params.name {
        mda.name = Set(name);
    }
    if let Some(reports) = params.reports {
        mda.reports = Set(reports_to_json(&reports));
    }
    if let Some(enabled) = params.enabled {
        mda.enabled = Set(enabled);
    }
    mda.gmt_modified = Set(chrono::Utc::now().naive_utc());

    let model = mda.update(db).await?;

    Ok(model)
}

/// Delete an MDA. Refused while any user account still belongs to it.
pub async fn delete(db: &DatabaseConnection, id: &str) -> anyhow::Result<mdas::Model> {
    let existing = find_by_id(db, id).await?;

    let user_count = user::count_by_mda(db, id).await?;
    if user_count > 0 {
        return Err(PortalError::InUse(format!(
            "mda {} ({} user accounts)",
            existing.name, user_count
        ))
        .into());
    }

    existing.clone().delete(db).await?;

    Ok(existing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdahub_persistence::sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;

    fn sample_mda(id: &str, name: &str) -> mdas::Model {
        let now = chrono::Utc::now().naive_utc();
        mdas::Model {
            id: id.to_string(),
            name: name.to_string(),
            reports: serde_json::json!([]),
            enabled: true,
            gmt_create: now,
            gmt_modified: now,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_name() {
        // The name pre-check finds an existing row
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![sample_mda("m-1", "Ministry of Finance")]])
            .into_connection();

        let err = create(
            &db,
            CreateMdaParams {
                name: "Ministry of Finance".to_string(),
                reports: Vec::new(),
                enabled: true,
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PortalError>(),
            Some(PortalError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();

        let err = create(
            &db,
            CreateMdaParams {
                name: "   ".to_string(),
                reports: Vec::new(),
                enabled: true,
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PortalError>(),
            Some(PortalError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_refused_while_users_reference_it() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![sample_mda("m-1", "Ministry of Finance")]])
            .append_query_results([vec![BTreeMap::from([(
                "count",
                Value::BigInt(Some(3)),
            )])]])
            .into_connection();

        let err = delete(&db, "m-1").await.unwrap_err();
        let portal = err.downcast_ref::<PortalError>().unwrap();
        assert!(matches!(portal, PortalError::InUse(_)));
        assert!(portal.to_string().contains("still in use"));
    }
}
