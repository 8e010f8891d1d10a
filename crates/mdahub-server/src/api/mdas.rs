//! MDA management endpoints (admin token) and the user-facing MDA view

use actix_web::{HttpMessage, HttpRequest, Responder, delete, get, post, put, web};
use serde::Deserialize;

use mdahub_api::Page;
use mdahub_api::model::{DEFAULT_PAGE_SIZE, clamp_page_size};
use mdahub_audit::AuditDetail;

use crate::model::AppState;
use crate::model::response::{Result, error_response};
use crate::secured;
use crate::secured::Secured;
use crate::service::mda::{self, CreateMdaParams, MdaInfo, UpdateMdaParams};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchPageParam {
    keyword: Option<String>,
    page_no: Option<u64>,
    page_size: Option<u64>,
}

/// A signed-in user sees their own MDA with its report links. Disabled
/// report entries are filtered out of this view.
#[get("/mda")]
async fn my_mda(req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    secured!(ctx, Secured::builder(&req).user().build());

    let Some(mda_id) = ctx.mda_id else {
        return crate::model::response::ErrorResult::http_response_forbidden(
            "token carries no mda",
            req.path(),
        );
    };

    match mda::find_by_id(data.db(), &mda_id).await {
        Ok(model) => {
            let mut info = MdaInfo::from(model);
            info.reports.retain(|r| r.enabled);
            Result::<MdaInfo>::http_success(info)
        }
        Err(e) => error_response(&e),
    }
}

#[get("/mdas")]
async fn search_page(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<SearchPageParam>,
) -> impl Responder {
    secured!(_ctx, Secured::builder(&req).admin().build());

    let keyword = params.keyword.clone().unwrap_or_default();
    let page_no = params.page_no.unwrap_or(1).max(1);
    let page_size = clamp_page_size(params.page_size.unwrap_or(DEFAULT_PAGE_SIZE));

    match mda::search_page(data.db(), &keyword, page_no, page_size).await {
        Ok(page) => Result::<Page<MdaInfo>>::http_success(page),
        Err(e) => error_response(&e),
    }
}

#[get("/mdas/{id}")]
async fn get(req: HttpRequest, data: web::Data<AppState>, id: web::Path<String>) -> impl Responder {
    secured!(_ctx, Secured::builder(&req).admin().build());

    match mda::find_by_id(data.db(), &id).await {
        Ok(model) => Result::<MdaInfo>::http_success(MdaInfo::from(model)),
        Err(e) => error_response(&e),
    }
}

#[post("/mdas")]
async fn create(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<CreateMdaParams>,
) -> impl Responder {
    secured!(_ctx, Secured::builder(&req).admin().build());

    match mda::create(data.db(), body.into_inner()).await {
        Ok(model) => {
            req.extensions_mut()
                .insert(AuditDetail::new(&model.id, &model.name));
            Result::<MdaInfo>::http_success(MdaInfo::from(model))
        }
        Err(e) => error_response(&e),
    }
}

#[put("/mdas/{id}")]
async fn update(
    req: HttpRequest,
    data: web::Data<AppState>,
    id: web::Path<String>,
    body: web::Json<UpdateMdaParams>,
) -> impl Responder {
    secured!(_ctx, Secured::builder(&req).admin().build());

    match mda::update(data.db(), &id, body.into_inner()).await {
        Ok(model) => {
            req.extensions_mut()
                .insert(AuditDetail::new(&model.id, &model.name));
            Result::<MdaInfo>::http_success(MdaInfo::from(model))
        }
        Err(e) => error_response(&e),
    }
}

#[delete("/mdas/{id}")]
async fn delete(
    req: HttpRequest,
    data: web::Data<AppState>,
    id: web::Path<String>,
) -> impl Responder {
    secured!(_ctx, Secured::builder(&req).admin().build());

    match mda::delete(data.db(), &id).await {
        Ok(model) => {
            req.extensions_mut()
                .insert(AuditDetail::new(&model.id, &model.name));
            Result::<String>::http_success("delete mda ok")
        }
        Err(e) => error_response(&e),
    }
}
