//! Activity trail endpoints: search, download and retention cleanup

use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, delete, get, web};
use serde::Deserialize;

use mdahub_api::Page;
use mdahub_api::model::{DEFAULT_PAGE_SIZE, ExportFormat, clamp_page_size, parse_datetime};
use mdahub_audit::{ActivityRecord, ActivitySearch, AuditDetail, service as audit};
use mdahub_common::PortalError;

use crate::model::AppState;
use crate::model::response::{Result, error_response};
use crate::secured;
use crate::secured::Secured;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchParam {
    action: Option<String>,
    resource_type: Option<String>,
    resource_id: Option<String>,
    admin_id: Option<String>,
    start_time: Option<String>,
    end_time: Option<String>,
    page_no: Option<u64>,
    page_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportParam {
    #[serde(default)]
    format: ExportFormat,
    action: Option<String>,
    resource_type: Option<String>,
    resource_id: Option<String>,
    admin_id: Option<String>,
    start_time: Option<String>,
    end_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CleanupParam {
    days_to_keep: Option<u32>,
}

fn to_search(
    action: Option<String>,
    resource_type: Option<String>,
    resource_id: Option<String>,
    admin_id: Option<String>,
    start_time: Option<&str>,
    end_time: Option<&str>,
) -> ActivitySearch {
    ActivitySearch {
        action,
        resource_type,
        resource_id,
        admin_id,
        start_time: start_time.and_then(parse_datetime),
        end_time: end_time.and_then(parse_datetime),
    }
}

#[get("/activities")]
async fn search_page(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<SearchParam>,
) -> impl Responder {
    secured!(_ctx, Secured::builder(&req).admin().build());

    let params = params.into_inner();
    let page_no = params.page_no.unwrap_or(1).max(1);
    let page_size = clamp_page_size(params.page_size.unwrap_or(DEFAULT_PAGE_SIZE));
    let search = to_search(
        params.action,
        params.resource_type,
        params.resource_id,
        params.admin_id,
        params.start_time.as_deref(),
        params.end_time.as_deref(),
    );

    match audit::search_page(data.db(), &search, page_no, page_size).await {
        Ok(page) => Result::<Page<ActivityRecord>>::http_success(page),
        Err(e) => error_response(&e),
    }
}

#[get("/activities/export")]
async fn export(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<ExportParam>,
) -> impl Responder {
    secured!(_ctx, Secured::builder(&req).admin().build());

    let params = params.into_inner();
    let format = params.format;
    let search = to_search(
        params.action,
        params.resource_type,
        params.resource_id,
        params.admin_id,
        params.start_time.as_deref(),
        params.end_time.as_deref(),
    );

    let records = match audit::export_records(data.db(), &search).await {
        Ok(records) => records,
        Err(e) => return error_response(&e),
    };

    req.extensions_mut().insert(
        AuditDetail::new("activity-log", "activity log").with_details(&serde_json::json!({
            "format": format.as_str(),
            "rows": records.len(),
        })),
    );

    let filename = format!(
        "activity-log-{}.{}",
        chrono::Utc::now().format("%Y%m%d%H%M%S"),
        format.as_str()
    );
    let body = match format {
        ExportFormat::Csv => audit::to_csv(&records),
        ExportFormat::Json => match serde_json::to_string_pretty(&records) {
            Ok(json) => json,
            Err(e) => return error_response(&anyhow::Error::from(e)),
        },
    };

    HttpResponse::Ok()
        .content_type(format.content_type())
        .append_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(body)
}

#[delete("/activities/cleanup")]
async fn cleanup(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<CleanupParam>,
) -> impl Responder {
    secured!(_ctx, Secured::builder(&req).admin().build());

    let Some(days) = params.days_to_keep else {
        let e: anyhow::Error =
            PortalError::Validation("days_to_keep is required".to_string()).into();
        return error_response(&e);
    };

    match audit::cleanup_old_records(data.db(), days).await {
        Ok(removed) => Result::<serde_json::Value>::http_success(serde_json::json!({ "deletedCount": removed })),
        Err(e) => error_response(&e),
    }
}
