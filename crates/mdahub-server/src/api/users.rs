//! User management endpoints (admin token)

use actix_web::{HttpMessage, HttpRequest, Responder, delete, get, post, put, web};
use serde::Deserialize;

use mdahub_api::Page;
use mdahub_api::model::{DEFAULT_PAGE_SIZE, clamp_page_size};
use mdahub_audit::AuditDetail;
use mdahub_auth::model::UserInfo;
use mdahub_auth::service::user::{self, CreateUserParams, UpdateUserParams};
use mdahub_common::PortalError;

use crate::model::AppState;
use crate::model::response::{Result, error_response};
use crate::secured;
use crate::secured::Secured;
use crate::service::mda;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchPageParam {
    keyword: Option<String>,
    mda_id: Option<String>,
    page_no: Option<u64>,
    page_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResetPasswordData {
    new_password: String,
}

#[get("/users")]
async fn search_page(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<SearchPageParam>,
) -> impl Responder {
    secured!(_ctx, Secured::builder(&req).admin().build());

    let keyword = params.keyword.clone().unwrap_or_default();
    let mda_id = params.mda_id.clone().unwrap_or_default();
    let page_no = params.page_no.unwrap_or(1).max(1);
    let page_size = clamp_page_size(params.page_size.unwrap_or(DEFAULT_PAGE_SIZE));

    match user::search_page(data.db(), &keyword, &mda_id, page_no, page_size).await {
        Ok(page) => Result::<Page<UserInfo>>::http_success(page),
        Err(e) => error_response(&e),
    }
}

#[get("/users/{id}")]
async fn get(req: HttpRequest, data: web::Data<AppState>, id: web::Path<String>) -> impl Responder {
    secured!(_ctx, Secured::builder(&req).admin().build());

    match user::find_by_id(data.db(), &id).await {
        Ok(model) => Result::<UserInfo>::http_success(UserInfo::from(model)),
        Err(e) => error_response(&e),
    }
}

#[post("/users")]
async fn create(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<CreateUserParams>,
) -> impl Responder {
    secured!(_ctx, Secured::builder(&req).admin().build());

    let params = body.into_inner();

    // A user must belong to an MDA that exists
    if mda::find_by_id(data.db(), &params.mda_id).await.is_err() {
        let e: anyhow::Error =
            PortalError::Validation(format!("mda {} does not exist", params.mda_id)).into();
        return error_response(&e);
    }

    match user::create(data.db(), params).await {
        Ok(model) => {
            req.extensions_mut()
                .insert(AuditDetail::new(&model.id, &model.name));
            Result::<UserInfo>::http_success(UserInfo::from(model))
        }
        Err(e) => error_response(&e),
    }
}

#[put("/users/{id}")]
async fn update(
    req: HttpRequest,
    data: web::Data<AppState>,
    id: web::Path<String>,
    body: web::Json<UpdateUserParams>,
) -> impl Responder {
    secured!(_ctx, Secured::builder(&req).admin().build());

    let params = body.into_inner();

    if let Some(mda_id) = &params.mda_id
        && mda::find_by_id(data.db(), mda_id).await.is_err()
    {
        let e: anyhow::Error =
            PortalError::Validation(format!("mda {} does not exist", mda_id)).into();
        return error_response(&e);
    }

    match user::update(data.db(), &id, params).await {
        Ok(model) => {
            req.extensions_mut()
                .insert(AuditDetail::new(&model.id, &model.name));
            Result::<UserInfo>::http_success(UserInfo::from(model))
        }
        Err(e) => error_response(&e),
    }
}

#[put("/users/{id}/reset-password")]
async fn reset_password(
    req: HttpRequest,
    data: web::Data<AppState>,
    id: web::Path<String>,
    body: web::Json<ResetPasswordData>,
) -> impl Responder {
    secured!(_ctx, Secured::builder(&req).admin().build());

    match user::reset_password(data.db(), &id, &body.new_password).await {
        Ok(()) => Result::<String>::http_success("password reset ok"),
        Err(e) => error_response(&e),
    }
}

#[delete("/users/{id}")]
async fn delete(
    req: HttpRequest,
    data: web::Data<AppState>,
    id: web::Path<String>,
) -> impl Responder {
    secured!(_ctx, Secured::builder(&req).admin().build());

    match user::delete(data.db(), &id).await {
        Ok(model) => {
            req.extensions_mut()
                .insert(AuditDetail::new(&model.id, &model.name));
            Result::<String>::http_success("delete user ok")
        }
        Err(e) => error_response(&e),
    }
}
