//! Configuration keys and server defaults

// Server
pub const SERVER_ADDRESS: &str = "server.address";
pub const SERVER_PORT: &str = "server.port";
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// Database
pub const DB_URL: &str = "db.url";
pub const DB_MAX_CONNECTIONS: &str = "db.maxConnections";
pub const DB_MIN_CONNECTIONS: &str = "db.minConnections";

// Auth
pub const USER_TOKEN_SECRET_KEY: &str = "mdahub.auth.user.token.secret.key";
pub const ADMIN_TOKEN_SECRET_KEY: &str = "mdahub.auth.admin.token.secret.key";
pub const TOKEN_EXPIRE_SECONDS: &str = "mdahub.auth.token.expire.seconds";

// Logging
pub const LOGS_PATH: &str = "mdahub.logs.path";
pub const LOGS_CONSOLE: &str = "mdahub.logs.console";
pub const LOGS_FILE: &str = "mdahub.logs.file";
pub const LOGS_LEVEL: &str = "mdahub.logs.level";
