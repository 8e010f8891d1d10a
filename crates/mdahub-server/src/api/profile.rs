//! Self-service profile endpoints
//!
//! Users can see their own record, change contact details, and rotate
//! their password. Admins get a read-only view of their own account.

use actix_web::{HttpRequest, Responder, get, put, web};
use serde::{Deserialize, Serialize};

use mdahub_auth::model::{AdminInfo, UserInfo};
use mdahub_auth::service::admin;
use mdahub_auth::service::user::{self, UpdateUserParams};

use crate::model::AppState;
use crate::model::response::{Result, error_response};
use crate::secured;
use crate::secured::Secured;
use crate::service::mda;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileInfo {
    #[serde(flatten)]
    user: UserInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    mda_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileUpdateData {
    name: Option<String>,
    contact_email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordData {
    current_password: String,
    new_password: String,
}

#[get("/profile")]
async fn get_profile(req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    secured!(ctx, Secured::builder(&req).user().build());

    let model = match user::find_by_id(data.db(), &ctx.principal_id).await {
        Ok(model) => model,
        Err(e) => return error_response(&e),
    };

    let mda_name = mda::find_by_id(data.db(), &model.mda_id)
        .await
        .ok()
        .map(|m| m.name);

    Result::<ProfileInfo>::http_success(ProfileInfo {
        user: UserInfo::from(model),
        mda_name,
    })
}

/// A user may only edit their display name and contact email; the
/// username and MDA assignment stay under admin control.
#[put("/profile")]
async fn update_profile(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<ProfileUpdateData>,
) -> impl Responder {
    secured!(ctx, Secured::builder(&req).user().build());

    let body = body.into_inner();
    let params = UpdateUserParams {
        name: body.name,
        contact_email: body.contact_email,
        ..Default::default()
    };

    match user::update(data.db(), &ctx.principal_id, params).await {
        Ok(model) => Result::<UserInfo>::http_success(UserInfo::from(model)),
        Err(e) => error_response(&e),
    }
}

#[put("/profile/password")]
async fn change_password(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<ChangePasswordData>,
) -> impl Responder {
    secured!(ctx, Secured::builder(&req).user().build());

    match user::change_password(
        data.db(),
        &ctx.principal_id,
        &body.current_password,
        &body.new_password,
    )
    .await
    {
        Ok(()) => Result::<String>::http_success("password changed ok"),
        Err(e) => error_response(&e),
    }
}

#[get("/profile")]
async fn admin_profile(req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    secured!(ctx, Secured::builder(&req).admin().build());

    match admin::find_by_id(data.db(), &ctx.principal_id).await {
        Ok(model) => Result::<AdminInfo>::http_success(AdminInfo::from(model)),
        Err(e) => error_response(&e),
    }
}
