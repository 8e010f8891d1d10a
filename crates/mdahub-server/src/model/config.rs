//! Configuration management for the MDAHub server
//!
//! This module handles loading and accessing application configuration.

use std::time::Duration;

use clap::Parser;
use config::{Config, Environment};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use mdahub_auth::model::DEFAULT_TOKEN_EXPIRE_SECONDS;

use super::constants::{
    ADMIN_TOKEN_SECRET_KEY, DB_MAX_CONNECTIONS, DB_MIN_CONNECTIONS, DB_URL, DEFAULT_SERVER_PORT,
    LOGS_CONSOLE, LOGS_FILE, LOGS_LEVEL, LOGS_PATH, SERVER_ADDRESS, SERVER_PORT,
    TOKEN_EXPIRE_SECONDS, USER_TOKEN_SECRET_KEY,
};
use crate::startup::logging::LoggingConfig;

/// Command line arguments for the server
#[derive(Debug, Parser)]
#[command()]
struct Cli {
    #[arg(short = 'p', long = "port")]
    port: Option<u16>,
    #[arg(long = "db-url", env = "DATABASE_URL")]
    database_url: Option<String>,
}

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    pub fn new() -> Self {
        let args = Cli::parse();
        let mut config_builder = Config::builder()
            .add_source(
                Environment::with_prefix("mdahub")
                    .separator(".")
                    .try_parsing(true),
            )
            .add_source(config::File::with_name("conf/application.yml"));

        if let Some(v) = args.port {
            config_builder = config_builder
                .set_override(SERVER_PORT, i64::from(v))
                .expect("Failed to set server port override");
        }
        if let Some(v) = args.database_url {
            config_builder = config_builder
                .set_override(DB_URL, v)
                .expect("Failed to set database URL override");
        }

        let app_config = config_builder
            .build()
            .expect("Failed to build configuration - check conf/application.yml");

        Configuration { config: app_config }
    }

    // ========================================================================
    // Server Configuration
    // ========================================================================

    pub fn server_address(&self) -> String {
        self.config
            .get_string(SERVER_ADDRESS)
            .unwrap_or("0.0.0.0".to_string())
    }

    pub fn server_port(&self) -> u16 {
        self.config
            .get_int(SERVER_PORT)
            .unwrap_or(DEFAULT_SERVER_PORT.into()) as u16
    }

    // ========================================================================
    // Authentication Configuration
    // ========================================================================

    /// Secret for the user token namespace
    pub fn user_token_secret_key(&self) -> String {
        self.config
            .get_string(USER_TOKEN_SECRET_KEY)
            .unwrap_or_default()
    }

    /// Secret for the admin token namespace
    pub fn admin_token_secret_key(&self) -> String {
        self.config
            .get_string(ADMIN_TOKEN_SECRET_KEY)
            .unwrap_or_default()
    }

    pub fn token_expire_seconds(&self) -> i64 {
        self.config
            .get_int(TOKEN_EXPIRE_SECONDS)
            .unwrap_or(DEFAULT_TOKEN_EXPIRE_SECONDS)
    }

    // ========================================================================
    // Database Configuration
    // ========================================================================

    pub fn database_url(&self) -> String {
        self.config.get_string(DB_URL).unwrap_or_default()
    }

    pub async fn database_connection(&self) -> anyhow::Result<DatabaseConnection> {
        let max_connections = self.config.get_int(DB_MAX_CONNECTIONS).unwrap_or(20) as u32;
        let min_connections = self.config.get_int(DB_MIN_CONNECTIONS).unwrap_or(2) as u32;

        let mut options = ConnectOptions::new(self.database_url());
        options
            .max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        let connection = Database::connect(options).await?;

        Ok(connection)
    }

    // ========================================================================
    // Logging Configuration
    // ========================================================================

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::from_config(
            self.config.get_string(LOGS_PATH).ok(),
            self.config.get_bool(LOGS_CONSOLE).unwrap_or(true),
            self.config.get_bool(LOGS_FILE).unwrap_or(true),
            self.config
                .get_string(LOGS_LEVEL)
                .unwrap_or("info".to_string()),
        )
    }
}
