//! HTTP server setup.

use actix_web::{App, HttpServer, dev::Server, middleware::Logger, web};

use crate::{
    api,
    middleware::{audit::ActivityAudit, auth::Authentication},
    model::AppState,
};

/// Creates and binds the portal HTTP server.
///
/// The request pipeline is: access logging, then token validation, then
/// the audit observer that records successful mutating admin requests
/// after the handler has run.
pub fn portal_server(app_state: AppState, address: String, port: u16) -> Result<Server, std::io::Error> {
    Ok(HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(ActivityAudit)
            .wrap(Authentication)
            .app_data(web::Data::new(app_state.clone()))
            .service(api::route::routes())
    })
    .bind((address, port))?
    .run())
}
