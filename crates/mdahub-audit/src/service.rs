//! Activity trail persistence, search, export and retention

use mdahub_api::Page;
use mdahub_api::model::EXPORT_MAX_ROWS;
use mdahub_common::PortalError;
use mdahub_persistence::entity::activity_log;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::model::{ActivityRecord, ActivitySearch};

/// Shortest retention the cleanup endpoint will accept
pub const MIN_RETENTION_DAYS: u32 = 30;

/// Metrics counter bumped whenever an audit write fails
pub const AUDIT_WRITE_FAILURES: &str = "mdahub_audit_write_failures_total";

fn model_to_record(m: activity_log::Model) -> ActivityRecord {
    ActivityRecord {
        id: Some(m.id),
        admin_id: m.admin_id,
        admin_name: m.admin_name,
        action: m.action,
        resource_type: m.resource_type,
        resource_id: m.resource_id,
        resource_name: m.resource_name,
        details: m.details,
        source_ip: m.source_ip,
        user_agent: m.user_agent,
        gmt_create: Some(m.gmt_create),
    }
}

/// Persist one activity record
pub async fn record(db: &DatabaseConnection, entry: ActivityRecord) -> anyhow::Result<u64> {
    let now = chrono::Utc::now().naive_utc();

    let active = activity_log::ActiveModel {
        admin_id: Set(entry.admin_id),
        admin_name: Set(entry.admin_name),
        action: Set(entry.action),
        resource_type: Set(entry.resource_type),
        resource_id: Set(entry.resource_id),
        resource_name: Set(entry.resource_name),
        details: Set(entry.details),
        source_ip: Set(entry.source_ip),
        user_agent: Set(entry.user_agent),
        gmt_create: Set(now),
        ..Default::default()
    };

    let inserted = active.insert(db).await?;
    Ok(inserted.id)
}

/// Persist one activity record without blocking the caller. A lost
/// record must never fail the request it describes, so failures are
/// logged and counted instead of propagated.
pub fn record_detached(db: std::sync::Arc<DatabaseConnection>, entry: ActivityRecord) {
    tokio::spawn(async move {
        let action = entry.action.clone();
        let resource_type = entry.resource_type.clone();
        if let Err(e) = record(&db, entry).await {
            metrics::counter!(AUDIT_WRITE_FAILURES).increment(1);
            tracing::error!(
                action = action,
                resource_type = resource_type,
                "failed to write activity record: {:?}",
                e
            );
        }
    });
}

fn apply_filters(
    mut query: sea_orm::Select<activity_log::Entity>,
    search: &ActivitySearch,
) -> sea_orm::Select<activity_log::Entity> {
    if let Some(ref action) = search.action {
        query = query.filter(activity_log::Column::Action.eq(action));
    }
    if let Some(ref rt) = search.resource_type {
        query = query.filter(activity_log::Column::ResourceType.eq(rt));
    }
    if let Some(ref rid) = search.resource_id {
        query = query.filter(activity_log::Column::ResourceId.like(format!("%{}%", rid)));
    }
    if let Some(ref admin_id) = search.admin_id {
        query = query.filter(activity_log::Column::AdminId.eq(admin_id));
    }
    if let Some(start) = search.start_time {
        query = query.filter(activity_log::Column::GmtCreate.gte(start));
    }
    if let Some(end) = search.end_time {
        query = query.filter(activity_log::Column::GmtCreate.lte(end));
    }

    query
}

/// Search the activity trail with pagination, newest first
pub async fn search_page(
    db: &DatabaseConnection,
    search: &ActivitySearch,
    page_number: u64,
    page_size: u64,
) -> anyhow::Result<Page<ActivityRecord>> {
    let query = apply_filters(activity_log::Entity::find(), search)
        .order_by(activity_log::Column::GmtCreate, Order::Desc);

    let total_count = query.clone().count(db).await?;

    if total_count == 0 {
        return Ok(Page::default());
    }

    let offset = page_number.saturating_sub(1) * page_size;
    let page_items = query
        .offset(offset)
        .limit(page_size)
        .all(db)
        .await?
        .into_iter()
        .map(model_to_record)
        .collect();

    Ok(Page::new(total_count, page_number, page_size, page_items))
}

/// Fetch records for a download, newest first, capped so one export
/// cannot drag the whole table through memory.
pub async fn export_records(
    db: &DatabaseConnection,
    search: &ActivitySearch,
) -> anyhow::Result<Vec<ActivityRecord>> {
    let records = apply_filters(activity_log::Entity::find(), search)
        .order_by(activity_log::Column::GmtCreate, Order::Desc)
        .limit(EXPORT_MAX_ROWS)
        .all(db)
        .await?
        .into_iter()
        .map(model_to_record)
        .collect();

    Ok(records)
}

/// Delete activity records older than the retention window. Retentions
/// shorter than the floor are rejected so a typo cannot wipe the trail.
pub async fn cleanup_old_records(
    db: &DatabaseConnection,
    retention_days: u32,
) -> anyhow::Result<u64> {
    if retention_days < MIN_RETENTION_DAYS {
        return Err(PortalError::Validation(format!(
            "retention must be at least {} days",
            MIN_RETENTION_DAYS
        ))
        .into());
    }

    let cutoff = chrono::Utc::now().naive_utc() - chrono::Duration::days(retention_days as i64);

    let result = activity_log::Entity::delete_many()
        .filter(activity_log::Column::GmtCreate.lt(cutoff))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Render records as CSV. An empty input still yields the header row.
pub fn to_csv(records: &[ActivityRecord]) -> String {
    let mut out = String::from(
        "id,adminId,adminName,action,resourceType,resourceId,resourceName,details,sourceIp,userAgent,timestamp\n",
    );

    for r in records {
        let fields = [
            r.id.map(|id| id.to_string()).unwrap_or_default(),
            r.admin_id.clone(),
            r.admin_name.clone(),
            r.action.clone(),
            r.resource_type.clone(),
            r.resource_id.clone().unwrap_or_default(),
            r.resource_name.clone().unwrap_or_default(),
            r.details.clone().unwrap_or_default(),
            r.source_ip.clone().unwrap_or_default(),
            r.user_agent.clone().unwrap_or_default(),
            r.gmt_create
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
        ];
        let line: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }

    out
}

/// Quote a CSV field when it contains a separator, quote or newline.
pub fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{action, resource};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_cleanup_rejects_short_retention() {
        // The floor is checked before any query reaches the database
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();

        let err = cleanup_old_records(&db, MIN_RETENTION_DAYS - 1)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PortalError>(),
            Some(PortalError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_cleanup_reports_deleted_rows() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 42,
            }])
            .into_connection();

        let removed = cleanup_old_records(&db, MIN_RETENTION_DAYS).await.unwrap();
        assert_eq!(removed, 42);
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn test_to_csv_empty_has_header() {
        let csv = to_csv(&[]);
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("id,adminId,adminName"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_to_csv_rows() {
        let record = ActivityRecord::builder()
            .admin("a-1", "Jane Admin")
            .action(action::DELETE)
            .resource_type(resource::USER)
            .resource_id("u-9")
            .resource_name("Doe, John")
            .build();

        let csv = to_csv(&[record]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains("a-1,Jane Admin,DELETE,USER,u-9"));
        assert!(row.contains("\"Doe, John\""));
    }
}
