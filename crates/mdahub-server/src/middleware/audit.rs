// Activity audit middleware
//
// Observes completed responses and turns successful mutating admin
// requests into activity records. Handlers enrich the record by
// inserting an AuditDetail into the request extensions; the middleware
// never blocks the response on the database write.

use actix_service::forward_ready;
use actix_utils::future::{Ready, ok};
use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::USER_AGENT,
    web::Data,
};
use futures::future::LocalBoxFuture;

use mdahub_audit::service::AUDIT_WRITE_FAILURES;
use mdahub_audit::{ActivityRecord, AuditDetail, classify};

use crate::model::AppState;

// Activity audit middleware transformer
pub struct ActivityAudit;

impl<S, B> Transform<S, ServiceRequest> for ActivityAudit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ActivityAuditMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(ActivityAuditMiddleware { service })
    }
}

pub struct ActivityAuditMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for ActivityAuditMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let started = std::time::Instant::now();
        metrics::counter!(crate::metrics::HTTP_REQUESTS_TOTAL).increment(1);

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            metrics::histogram!(crate::metrics::HTTP_REQUEST_DURATION_SECONDS)
                .record(started.elapsed().as_secs_f64());
            observe(&res);
            Ok(res)
        })
    }
}

/// Inspect a completed response and, when it represents a successful
/// mutating admin request, persist an activity record off-task.
fn observe<B>(res: &ServiceResponse<B>) {
    let Some(entry) = audit_entry(res) else {
        return;
    };

    let Some(app_state) = res.request().app_data::<Data<AppState>>() else {
        tracing::error!("AppState not found in request app_data");
        return;
    };
    let db = app_state.database_connection.clone();

    persist_detached(db, entry);
}

/// Classify, gate and enrich a completed response into an activity
/// record. Returns None for anything that should not leave a trace:
/// failed responses, unclassifiable requests, anonymous principals.
fn audit_entry<B>(res: &ServiceResponse<B>) -> Option<ActivityRecord> {
    // Only successful requests leave a trace
    if !res.status().is_success() {
        return None;
    }

    let req = res.request();
    let method = req.method().as_str();
    let path = req.path();

    let action = classify::action_for_request(method, path)?;
    let resource_type = classify::resource_for_path(path)?;

    // Requests without an authenticated admin principal are skipped
    let extensions = req.extensions();
    let ctx = extensions
        .get::<crate::secured::AuthContext>()
        .filter(|c| c.is_authenticated() && c.is_admin())
        .cloned()?;
    let detail = extensions.get::<AuditDetail>().cloned().unwrap_or_default();
    drop(extensions);

    let resource_id = id_from_path(path).or(detail.resource_id);
    // Deletes often have nothing left to name, fall back to the id
    let resource_name = detail.resource_name.or_else(|| resource_id.clone());

    let mut builder = ActivityRecord::builder()
        .admin(ctx.principal_id, String::new())
        .action(action)
        .resource_type(resource_type);
    if let Some(id) = resource_id {
        builder = builder.resource_id(id);
    }
    if let Some(name) = resource_name {
        builder = builder.resource_name(name);
    }
    if let Some(details) = detail.details {
        builder = builder.details(details);
    }
    if let Some(ip) = req.connection_info().realip_remote_addr() {
        builder = builder.source_ip(ip);
    }
    if let Some(ua) = req.headers().get(USER_AGENT).and_then(|v| v.to_str().ok()) {
        builder = builder.user_agent(ua);
    }

    Some(builder.build())
}

/// Write the record on a detached task, resolving the admin's display
/// name on the way. A lost record never fails the request it describes.
fn persist_detached(db: std::sync::Arc<sea_orm::DatabaseConnection>, mut entry: ActivityRecord) {
    tokio::spawn(async move {
        entry.admin_name = match mdahub_auth::service::admin::find_by_id(&db, &entry.admin_id).await
        {
            Ok(admin) => admin.name,
            Err(_) => entry.admin_id.clone(),
        };

        let action = entry.action.clone();
        let resource_type = entry.resource_type.clone();
        if let Err(e) = mdahub_audit::service::record(&db, entry).await {
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

/// Pull the resource id out of the request path, skipping collection
/// names and the reset-password suffix.
fn id_from_path(path: &str) -> Option<String> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let mut last = *segments.last()?;

    if last == "reset-password" {
        if segments.len() < 2 {
            return None;
        }
        last = segments[segments.len() - 2];
    }

    match last {
        "users" | "mdas" | "admins" | "export" | "combined" | "activities" => None,
        _ => Some(last.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::HttpResponse;
    use actix_web::test::TestRequest;
    use mdahub_auth::model::{AuthContext, ROLE_ADMIN};

    fn admin_ctx() -> AuthContext {
        AuthContext {
            principal_id: "a-1".to_string(),
            role: ROLE_ADMIN.to_string(),
            mda_id: None,
            jwt_error: None,
            token_provided: true,
        }
    }

    #[test]
    fn test_successful_mutation_builds_record() {
        let req = TestRequest::delete()
            .uri("/api/admin/users/u-9")
            .to_srv_request();
        req.extensions_mut().insert(admin_ctx());
        let res = req.into_response(HttpResponse::Ok().finish());

        let entry = audit_entry(&res).expect("expected a record");
        assert_eq!(entry.admin_id, "a-1");
        assert_eq!(entry.action, "DELETE");
        assert_eq!(entry.resource_type, "USER");
        assert_eq!(entry.resource_id.as_deref(), Some("u-9"));
        // DELETE fallback: the id doubles as the name
        assert_eq!(entry.resource_name.as_deref(), Some("u-9"));
    }

    #[test]
    fn test_failed_responses_leave_no_trace() {
        let req = TestRequest::post()
            .uri("/api/admin/users")
            .to_srv_request();
        req.extensions_mut().insert(admin_ctx());
        let res = req.into_response(HttpResponse::BadRequest().finish());

        assert!(audit_entry(&res).is_none());
    }

    #[test]
    fn test_anonymous_requests_leave_no_trace() {
        let req = TestRequest::post()
            .uri("/api/admin/users")
            .to_srv_request();
        let res = req.into_response(HttpResponse::Ok().finish());

        assert!(audit_entry(&res).is_none());
    }

    #[test]
    fn test_reads_leave_no_trace() {
        let req = TestRequest::get()
            .uri("/api/admin/users")
            .to_srv_request();
        req.extensions_mut().insert(admin_ctx());
        let res = req.into_response(HttpResponse::Ok().finish());

        assert!(audit_entry(&res).is_none());
    }

    #[test]
    fn test_id_from_path() {
        assert_eq!(
            id_from_path("/api/admin/users/u-1").as_deref(),
            Some("u-1")
        );
        assert_eq!(
            id_from_path("/api/admin/users/u-1/reset-password").as_deref(),
            Some("u-1")
        );
        assert_eq!(id_from_path("/api/admin/users"), None);
        assert_eq!(id_from_path("/api/admin/export/users"), None);
        assert_eq!(id_from_path("/api/admin/export/combined"), None);
    }
}
