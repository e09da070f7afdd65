use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{config::AppConfig, services::TokenService};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DatabaseConnection,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(config: AppConfig, db: DatabaseConnection) -> Arc<Self> {
        let tokens = TokenService::new(&config.jwt);
        Arc::new(Self { config, db, tokens })
    }
}
