use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::AppError,
    middleware::AuthGuard,
    response::ApiResult,
    services::ServiceContext,
    state::AppState,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub issued_at: usize,
    pub expires_at: usize,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/account/me", get(me))
        .with_state(state)
}

async fn me(State(state): State<Arc<AppState>>, claims: AuthGuard) -> ApiResult<AccountProfile> {
    let id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::unauthorized("Token subject is not a user id"))?;
    let services = ServiceContext::from_state(state.as_ref());
    let user = services
        .daos()
        .user()
        .find_by_id(id)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "profile lookup failed");
            AppError::internal("Database operation failed")
        })?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(AccountProfile {
        id: user.id.to_string(),
        name: user.name,
        email: user.email,
        role: claims.role,
        issued_at: claims.iat,
        expires_at: claims.exp,
    }))
}
