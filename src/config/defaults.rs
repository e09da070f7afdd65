pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: i64 = 5000;
pub const DEFAULT_RUST_LOG: &str = "info,tower_http=info";
pub const DEFAULT_DB_MAX_CONNECTIONS: i64 = 10;
pub const DEFAULT_DB_MIN_IDLE: i64 = 2;
pub const DEFAULT_JWT_ISSUER: &str = "employee-portal";
pub const DEFAULT_JWT_AUDIENCE: &str = "employee-portal-clients";
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
pub const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:5001", "https://localhost:7001"];
