//! Administrator account endpoints
//!
//! Reads are open to any admin token; every mutation requires the
//! superadmin role.

use actix_web::{HttpMessage, HttpRequest, Responder, delete, get, post, put, web};
use serde::Deserialize;

use mdahub_api::Page;
use mdahub_api::model::{DEFAULT_PAGE_SIZE, clamp_page_size};
use mdahub_audit::AuditDetail;
use mdahub_auth::model::AdminInfo;
use mdahub_auth::service::admin::{self, CreateAdminParams, UpdateAdminParams};

use crate::model::AppState;
use crate::model::response::{Result, error_response};
use crate::secured;
use crate::secured::Secured;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchPageParam {
    keyword: Option<String>,
    page_no: Option<u64>,
    page_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResetPasswordData {
    new_password: String,
}

#[get("/admins")]
async fn search_page(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<SearchPageParam>,
) -> impl Responder {
    secured!(_ctx, Secured::builder(&req).admin().build());

    let keyword = params.keyword.clone().unwrap_or_default();
    let page_no = params.page_no.unwrap_or(1).max(1);
    let page_size = clamp_page_size(params.page_size.unwrap_or(DEFAULT_PAGE_SIZE));

    match admin::search_page(data.db(), &keyword, page_no, page_size).await {
        Ok(page) => Result::<Page<AdminInfo>>::http_success(page),
        Err(e) => error_response(&e),
    }
}

#[get("/admins/{id}")]
async fn get(req: HttpRequest, data: web::Data<AppState>, id: web::Path<String>) -> impl Responder {
    secured!(_ctx, Secured::builder(&req).admin().build());

    match admin::find_by_id(data.db(), &id).await {
        Ok(model) => Result::<AdminInfo>::http_success(AdminInfo::from(model)),
        Err(e) => error_response(&e),
    }
}

#[post("/admins")]
async fn create(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<CreateAdminParams>,
) -> impl Responder {
    secured!(ctx, Secured::builder(&req).admin().superadmin().build());

    match admin::create(data.db(), body.into_inner(), &ctx.principal_id).await {
        Ok(model) => {
            req.extensions_mut()
                .insert(AuditDetail::new(&model.id, &model.name));
            Result::<AdminInfo>::http_success(AdminInfo::from(model))
        }
        Err(e) => error_response(&e),
    }
}

#[put("/admins/{id}")]
async fn update(
    req: HttpRequest,
    data: web::Data<AppState>,
    id: web::Path<String>,
    body: web::Json<UpdateAdminParams>,
) -> impl Responder {
    secured!(_ctx, Secured::builder(&req).admin().superadmin().build());

    match admin::update(data.db(), &id, body.into_inner()).await {
        Ok(model) => {
            req.extensions_mut()
                .insert(AuditDetail::new(&model.id, &model.name));
            Result::<AdminInfo>::http_success(AdminInfo::from(model))
        }
        Err(e) => error_response(&e),
    }
}

#[put("/admins/{id}/reset-password")]
async fn reset_password(
    req: HttpRequest,
    data: web::Data<AppState>,
    id: web::Path<String>,
    body: web::Json<ResetPasswordData>,
) -> impl Responder {
    secured!(_ctx, Secured::builder(&req).admin().superadmin().build());

    match admin::reset_password(data.db(), &id, &body.new_password).await {
        Ok(()) => Result::<String>::http_success("password reset ok"),
        Err(e) => error_response(&e),
    }
}

#[delete("/admins/{id}")]
async fn delete(
    req: HttpRequest,
    data: web::Data<AppState>,
    id: web::Path<String>,
) -> impl Responder {
    secured!(ctx, Secured::builder(&req).admin().superadmin().build());

    match admin::delete(data.db(), &id, &ctx.principal_id).await {
        Ok(model) => {
            req.extensions_mut()
                .insert(AuditDetail::new(&model.id, &model.name));
            Result::<String>::http_success("delete admin ok")
        }
        Err(e) => error_response(&e),
    }
}
