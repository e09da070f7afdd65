use std::{
    sync::Arc,
    task::{Context, Poll},
};

use axum::{
    body::{Body, to_bytes},
    http::{Request, Response, Uri},
};
use futures_util::future::BoxFuture;
use tower::Service;

use super::ClientError;

pub(crate) const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Sends buffered requests over reqwest. Relative URIs are resolved against
/// the base URL.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Arc<str>,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn resolve(&self, uri: &Uri) -> String {
        if uri.scheme().is_some() {
            return uri.to_string();
        }
        let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
        format!("{}{}", self.base_url, path)
    }
}

impl Service<Request<Body>> for HttpTransport {
    type Response = Response<Body>;
    type Error = ClientError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let client = self.client.clone();
        let url = self.resolve(req.uri());

        Box::pin(async move {
            let (parts, body) = req.into_parts();
            let bytes = to_bytes(body, MAX_BODY_BYTES)
                .await
                .map_err(|err| ClientError::Body(err.to_string()))?;

            tracing::debug!(method = %parts.method, %url, "sending request");
            let response = client
                .request(parts.method, url)
                .headers(parts.headers)
                .body(bytes)
                .send()
                .await?;

            let status = response.status();
            let headers = response.headers().clone();
            let body = response.bytes().await?;

            let mut out = Response::new(Body::from(body));
            *out.status_mut() = status;
            *out.headers_mut() = headers;
            Ok(out)
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Uri;

    use super::HttpTransport;

    #[test]
    fn resolves_relative_uris_against_base() {
        let transport = HttpTransport::new("http://localhost:5000/");

        assert_eq!(
            transport.resolve(&Uri::from_static("/api/account/me?x=1")),
            "http://localhost:5000/api/account/me?x=1"
        );
        assert_eq!(
            transport.resolve(&Uri::from_static("https://other.example/api/x")),
            "https://other.example/api/x"
        );
    }
}
