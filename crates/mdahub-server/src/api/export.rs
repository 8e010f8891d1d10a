//! Data download endpoints for users, MDAs and the combined set

use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, web};
use serde::{Deserialize, Serialize};

use mdahub_api::model::ExportFormat;
use mdahub_audit::AuditDetail;

use crate::model::AppState;
use crate::model::response::error_response;
use crate::secured;
use crate::secured::Secured;
use crate::service::export as export_service;

#[derive(Debug, Deserialize)]
struct FormatParam {
    #[serde(default)]
    format: ExportFormat,
}

#[get("/export/users")]
async fn export_users(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<FormatParam>,
) -> impl Responder {
    secured!(_ctx, Secured::builder(&req).admin().build());

    let rows = match export_service::collect_users(data.db()).await {
        Ok(rows) => rows,
        Err(e) => return error_response(&e),
    };

    publish_detail(&req, "users", params.format, rows.len());

    match params.format {
        ExportFormat::Csv => download(
            params.format,
            "users",
            export_service::users_to_csv(&rows),
        ),
        ExportFormat::Json => download_json(params.format, "users", &rows),
    }
}

#[get("/export/mdas")]
async fn export_mdas(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<FormatParam>,
) -> impl Responder {
    secured!(_ctx, Secured::builder(&req).admin().build());

    let rows = match export_service::collect_mdas(data.db()).await {
        Ok(rows) => rows,
        Err(e) => return error_response(&e),
    };

    publish_detail(&req, "mdas", params.format, rows.len());

    match params.format {
        ExportFormat::Csv => download(params.format, "mdas", export_service::mdas_to_csv(&rows)),
        ExportFormat::Json => download_json(params.format, "mdas", &rows),
    }
}

#[get("/export/combined")]
async fn export_combined(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<FormatParam>,
) -> impl Responder {
    secured!(_ctx, Secured::builder(&req).admin().build());

    let combined = match export_service::collect_combined(data.db()).await {
        Ok(combined) => combined,
        Err(e) => return error_response(&e),
    };

    publish_detail(
        &req,
        "combined",
        params.format,
        combined.users.len() + combined.mdas.len(),
    );

    match params.format {
        ExportFormat::Csv => download(
            params.format,
            "combined",
            export_service::combined_to_csv(&combined),
        ),
        ExportFormat::Json => download_json(params.format, "combined", &combined),
    }
}

fn publish_detail(req: &HttpRequest, dataset: &str, format: ExportFormat, rows: usize) {
    req.extensions_mut().insert(
        AuditDetail::new(dataset, format!("{} export", dataset)).with_details(
            &serde_json::json!({
                "format": format.as_str(),
                "rows": rows,
            }),
        ),
    );
}

fn download(format: ExportFormat, dataset: &str, body: String) -> HttpResponse {
    let filename = format!(
        "{}-{}.{}",
        dataset,
        chrono::Utc::now().format("%Y%m%d%H%M%S"),
        format.as_str()
    );

    HttpResponse::Ok()
        .content_type(format.content_type())
        .append_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(body)
}

fn download_json<T: Serialize>(format: ExportFormat, dataset: &str, value: &T) -> HttpResponse {
    match serde_json::to_string_pretty(value) {
        Ok(body) => download(format, dataset, body),
        Err(e) => error_response(&anyhow::Error::from(e)),
    }
}
