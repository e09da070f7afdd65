use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;

use crate::{
    config::{AppConfig, DatabaseConfig},
    db::connection,
    routes::app,
    state::AppState,
};

pub const TEST_SIGNING_KEY: &str = "test-signing-key-with-enough-length";

/// Defaults plus an in-memory SQLite database and a signing key.
pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.database = Some(DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        // one connection, otherwise every pooled connection gets its own empty database
        max_connections: 1,
        min_idle: 1,
    });
    cfg.jwt.key = Some(TEST_SIGNING_KEY.to_string());
    cfg
}

/// Fresh in-memory database with the schema synced from the entities.
pub async fn test_db() -> DatabaseConnection {
    let cfg = test_config();
    connection::connect(cfg.database.as_ref().expect("test config has a database"))
        .await
        .expect("connect to in-memory sqlite")
}

pub async fn test_state() -> Arc<AppState> {
    AppState::new(test_config(), test_db().await)
}

pub async fn test_app() -> Router {
    app(test_state().await)
}
