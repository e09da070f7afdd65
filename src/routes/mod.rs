mod account;
mod auth;

use std::sync::Arc;

use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use crate::{
    middleware::{catch_panic_layer, cors_layer, json_error_middleware},
    state::AppState,
};

pub use account::AccountProfile;

pub const API_PREFIX: &str = "/api";
pub const AUTH_PREFIX: &str = "/api/authentication";

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest(AUTH_PREFIX, auth::router(state.clone()))
        .nest(API_PREFIX, account::router(state))
}

/// The router with the full middleware stack, as served by the binary.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors);
    router(state)
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
