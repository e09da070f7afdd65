use anyhow::{Result, bail};
use axum::http::HeaderValue;

use super::AppConfig;

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    match cfg.database.as_ref() {
        Some(database) => {
            if database.url.trim().is_empty() {
                errors.push("database.url must not be empty".to_string());
            }

            if database.max_connections == 0 {
                errors.push("database.max_connections must be > 0".to_string());
            }

            if database.min_idle > database.max_connections {
                errors.push(format!(
                    "database.min_idle ({}) must be <= database.max_connections ({})",
                    database.min_idle, database.max_connections
                ));
            }
        }
        None => errors.push("database.url is required (set APP_DATABASE__URL)".to_string()),
    }

    match cfg.jwt.key.as_deref() {
        Some(key) if !key.trim().is_empty() => {}
        _ => errors.push("jwt.key must be set and non-empty (set APP_JWT__KEY)".to_string()),
    }

    if cfg.jwt.issuer.trim().is_empty() {
        errors.push("jwt.issuer must not be empty".to_string());
    }

    if cfg.jwt.audience.trim().is_empty() {
        errors.push("jwt.audience must not be empty".to_string());
    }

    if cfg.jwt.token_ttl_hours == 0 {
        errors.push("jwt.token_ttl_hours must be > 0".to_string());
    }

    for origin in &cfg.cors.allowed_origins {
        if origin != "*" && HeaderValue::from_str(origin).is_err() {
            errors.push(format!("cors.allowed_origins contains an invalid origin: {origin}"));
        }
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}
