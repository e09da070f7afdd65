use sea_orm::DatabaseConnection;

use crate::{
    db::dao::DaoContext,
    services::{account_service::AccountService, token_service::TokenService},
    state::AppState,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
    tokens: TokenService,
}

impl ServiceContext {
    pub fn new(db: &DatabaseConnection, tokens: &TokenService) -> Self {
        Self {
            daos: DaoContext::new(db),
            tokens: tokens.clone(),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(&state.db, &state.tokens)
    }

    pub fn account(&self) -> AccountService {
        AccountService::new(self.daos.db(), self.tokens.clone())
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub fn daos(&self) -> &DaoContext {
        &self.daos
    }
}
