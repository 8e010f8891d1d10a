//! Login and logout endpoints for both token namespaces

use actix_web::{HttpRequest, HttpResponse, Responder, post, web};
use serde::{Deserialize, Serialize};

use mdahub_api::model::{AUTHORIZATION_HEADER, TOKEN_PREFIX};
use mdahub_audit::{ActivityRecord, action, resource};
use mdahub_auth::model::{ROLE_ADMIN, ROLE_USER};
use mdahub_auth::service::{admin, token, user};

use crate::model::AppState;
use crate::model::response::{Result, error_response};
use crate::secured::Secured;
use crate::secured;

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginResult {
    access_token: String,
    token_ttl: i64,
    id: String,
    name: String,
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    mda_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserLoginData {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct AdminLoginData {
    email: String,
    password: String,
}

#[post("/login")]
async fn login(data: web::Data<AppState>, body: web::Json<UserLoginData>) -> impl Responder {
    let user = match user::authenticate(data.db(), &body.username, &body.password).await {
        Ok(user) => user,
        Err(e) => {
            metrics::counter!(crate::metrics::LOGIN_FAILURES_TOTAL, "kind" => "user").increment(1);
            tracing::warn!(username = %body.username, "user login failed");
            return error_response(&e);
        }
    };

    let secret = data.configuration.user_token_secret_key();
    let token_ttl = data.configuration.token_expire_seconds();
    let access_token = match token::encode_token(
        &user.id,
        ROLE_USER,
        Some(&user.mda_id),
        &secret,
        token_ttl,
    ) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("failed to encode user token: {}", e);
            return HttpResponse::InternalServerError().body("Failed to generate token");
        }
    };

    token_response(LoginResult {
        access_token,
        token_ttl,
        id: user.id,
        name: user.name,
        role: ROLE_USER.to_string(),
        mda_id: Some(user.mda_id),
    })
}

#[post("/admin/login")]
async fn admin_login(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<AdminLoginData>,
) -> impl Responder {
    let admin = match admin::authenticate(data.db(), &body.email, &body.password).await {
        Ok(admin) => admin,
        Err(e) => {
            metrics::counter!(crate::metrics::LOGIN_FAILURES_TOTAL, "kind" => "admin").increment(1);
            tracing::warn!(email = %body.email, "admin login failed");
            return error_response(&e);
        }
    };

    let secret = data.configuration.admin_token_secret_key();
    let token_ttl = data.configuration.token_expire_seconds();
    let access_token = match token::encode_token(&admin.id, &admin.role, None, &secret, token_ttl) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("failed to encode admin token: {}", e);
            return HttpResponse::InternalServerError().body("Failed to generate token");
        }
    };

    // Superadmin sessions are intentionally absent from the trail
    if admin.role == ROLE_ADMIN {
        record_session_activity(&req, &data, action::LOGIN, &admin.id, &admin.name);
    }

    token_response(LoginResult {
        access_token,
        token_ttl,
        id: admin.id,
        name: admin.name,
        role: admin.role,
        mda_id: None,
    })
}

#[post("/logout")]
async fn logout(req: HttpRequest) -> impl Responder {
    secured!(_ctx, Secured::builder(&req).user().build());

    invalidate_request_token(&req);

    Result::<String>::http_success("logout ok")
}

#[post("/admin/logout")]
async fn admin_logout(req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    secured!(ctx, Secured::builder(&req).admin().build());

    invalidate_request_token(&req);

    // Same asymmetry as login: only plain admins leave a trace
    if ctx.role == ROLE_ADMIN {
        let name = admin::find_by_id(data.db(), &ctx.principal_id)
            .await
            .map(|a| a.name)
            .unwrap_or_else(|_| ctx.principal_id.clone());
        record_session_activity(&req, &data, action::LOGOUT, &ctx.principal_id, &name);
    }

    Result::<String>::http_success("logout ok")
}

fn token_response(result: LoginResult) -> HttpResponse {
    HttpResponse::Ok()
        .append_header((
            AUTHORIZATION_HEADER,
            format!("{}{}", TOKEN_PREFIX, result.access_token),
        ))
        .json(Result::success(&result))
}

/// Drop the presented token from the validation cache so a logout takes
/// effect before the cache TTL would expire it.
fn invalidate_request_token(req: &HttpRequest) {
    if let Some(raw) = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().strip_prefix(TOKEN_PREFIX))
    {
        token::invalidate_token(raw.trim());
    }
}

fn record_session_activity(
    req: &HttpRequest,
    data: &web::Data<AppState>,
    session_action: &str,
    admin_id: &str,
    admin_name: &str,
) {
    let mut builder = ActivityRecord::builder()
        .admin(admin_id, admin_name)
        .action(session_action)
        .resource_type(resource::ADMIN)
        .resource_id(admin_id)
        .resource_name(admin_name);
    if let Some(ip) = req.connection_info().realip_remote_addr() {
        builder = builder.source_ip(ip);
    }
    if let Some(ua) = req
        .headers()
        .get(actix_web::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
    {
        builder = builder.user_agent(ua);
    }

    mdahub_audit::service::record_detached(data.database_connection.clone(), builder.build());
}
