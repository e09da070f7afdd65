use axum::{
    Json,
    body::{Body, to_bytes},
    extract::Request,
    http::{HeaderValue, StatusCode, header, response::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::dto::GeneralResponse;

const MAX_ERROR_BODY_BYTES: usize = 16 * 1024;

/// Gives axum's own error responses (unknown route, wrong method, extractor
/// rejections) the `{flag: false, message}` body. Status and headers are kept.
pub async fn json_error_middleware(req: Request, next: Next) -> Response {
    let response = next.run(req).await;
    if !needs_rewrite(&response) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let message = read_message(parts.status, body).await;
    rebuild(parts, message)
}

fn needs_rewrite(response: &Response) -> bool {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return false;
    }
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();
    !(content_type.starts_with("application/json") || content_type.contains("+json"))
}

async fn read_message(status: StatusCode, body: Body) -> String {
    let text = to_bytes(body, MAX_ERROR_BODY_BYTES)
        .await
        .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
        .unwrap_or_default();
    if text.is_empty() {
        status.canonical_reason().unwrap_or("Request failed").to_string()
    } else {
        text
    }
}

fn rebuild(mut parts: Parts, message: String) -> Response {
    let body = Json(GeneralResponse::failure(message)).into_response().into_body();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    Response::from_parts(parts, body)
}
