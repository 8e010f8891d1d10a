//! Main entry point for the MDAHub administration portal server.

use std::time::Duration;

use mdahub_migration::{Migrator, MigratorTrait};
use mdahub_server::{
    model::{AppState, Configuration},
    startup::{self, GracefulShutdown},
};
use tracing::{error, info, warn};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let configuration = Configuration::new();

    let logging_config = configuration.logging_config();
    let _logging_guard = startup::init_logging(&logging_config)?;

    mdahub_server::metrics::init_metrics();

    let server_address = configuration.server_address();
    let server_port = configuration.server_port();

    let database_connection = configuration.database_connection().await?;
    info!("Database connection established");

    Migrator::up(&database_connection, None).await?;
    info!("Database migrations applied");

    if std::env::var("MDAHUB_SUPERADMIN_PASSWORD").is_err() {
        warn!(
            "MDAHUB_SUPERADMIN_PASSWORD is not set; if this is the first start, \
             the superadmin account uses the default password and must be rotated"
        );
    }

    let app_state = AppState::new(configuration, database_connection);

    let shutdown_signal = startup::wait_for_shutdown_signal().await;
    let graceful_shutdown = GracefulShutdown::new(shutdown_signal, Duration::from_secs(30));

    info!("Starting MDAHub server on {}:{}", server_address, server_port);
    let server = startup::portal_server(app_state, server_address, server_port)?;
    let server_handle = server.handle();

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        _ = graceful_shutdown.wait_for_shutdown(move || server_handle.stop(true)) => {
            info!("Server shutting down gracefully");
        }
    }

    info!("MDAHub server shutdown complete");
    Ok(())
}
