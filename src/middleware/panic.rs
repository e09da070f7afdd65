use std::any::Any;

use axum::response::{IntoResponse, Response};
use tower_http::catch_panic::CatchPanicLayer;

use crate::{error::AppError, logging::panic_message};

type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

/// A panicking handler answers 500 with the usual `{flag: false}` body.
/// Debug builds echo the panic message; release builds do not.
pub fn catch_panic_layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(panic_response as PanicHandler)
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let details = panic_message(payload.as_ref());
    tracing::error!(panic = %details, "request handler panicked");

    let message = if cfg!(debug_assertions) {
        format!("Internal server error: {details}")
    } else {
        "Internal server error".to_string()
    };
    AppError::internal(message).into_response()
}
