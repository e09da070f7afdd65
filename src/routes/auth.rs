use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};

use crate::{
    dto::{GeneralResponse, LoginRequest, LoginResponse, RefreshTokenRequest, RegisterRequest},
    error::AppError,
    response::ApiResult,
    services::{ServiceContext, SessionTokens},
    state::AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh-token", post(refresh_token))
        .with_state(state)
}

// Rejections become 400 with the usual body instead of axum's 415/422.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::bad_request(rejection.body_text()))
}

async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<GeneralResponse> {
    let req = body(payload)?;
    let message = ServiceContext::from_state(state.as_ref())
        .account()
        .register_account(&req)
        .await?;
    Ok(Json(GeneralResponse::success(message)))
}

async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let req = body(payload)?;
    let tokens = ServiceContext::from_state(state.as_ref())
        .account()
        .sign_in(&req)
        .await?;
    Ok(Json(tokens.into()))
}

async fn refresh_token(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let req = body(payload)?;
    let tokens = ServiceContext::from_state(state.as_ref())
        .account()
        .refresh_session(&req.refresh_token)
        .await?;
    Ok(Json(tokens.into()))
}

impl From<SessionTokens> for LoginResponse {
    fn from(tokens: SessionTokens) -> Self {
        LoginResponse::success(tokens.message, tokens.session_token, tokens.refresh_token)
    }
}
