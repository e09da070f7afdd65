use std::task::{Context, Poll};

use axum::{
    body::{Body, Bytes, to_bytes},
    http::{HeaderMap, HeaderValue, Method, Request, Response, StatusCode, Uri, Version, header},
};
use futures_util::future::BoxFuture;
use tower::{Layer, Service, ServiceExt};

use super::{
    AuthenticationStateProvider, ClientError, LOGIN_PATH, LocalStorageProvider,
    REFRESH_TOKEN_PATH, REGISTER_PATH, transport::MAX_BODY_BYTES,
};
use crate::dto::{LoginResponse, RefreshTokenRequest, UserSession};

/// Renews an expired session and replays the request, at most once.
///
/// Requests to the login, register and refresh-token endpoints pass through
/// untouched. Built with [`SessionRefreshLayer::with_state`], subscribers of
/// the state provider hear about renewed and dropped sessions.
#[derive(Clone)]
pub struct SessionRefreshLayer {
    sessions: LocalStorageProvider,
    state: Option<AuthenticationStateProvider>,
}

impl SessionRefreshLayer {
    pub fn new(sessions: LocalStorageProvider) -> Self {
        Self {
            sessions,
            state: None,
        }
    }

    pub fn with_state(state: AuthenticationStateProvider) -> Self {
        Self {
            sessions: state.sessions().clone(),
            state: Some(state),
        }
    }
}

impl<S> Layer<S> for SessionRefreshLayer {
    type Service = SessionRefresh<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SessionRefresh {
            inner,
            sessions: self.sessions.clone(),
            state: self.state.clone(),
        }
    }
}

#[derive(Clone)]
pub struct SessionRefresh<S> {
    inner: S,
    sessions: LocalStorageProvider,
    state: Option<AuthenticationStateProvider>,
}

impl<S> Service<Request<Body>> for SessionRefresh<S>
where
    S: Service<Request<Body>, Response = Response<Body>, Error = ClientError>
        + Clone
        + Send
        + 'static,
    S::Future: Send + 'static,
{
    type Response = Response<Body>;
    type Error = ClientError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        // take the service that was driven to readiness
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let sessions = self.sessions.clone();
        let state = self.state.clone();

        Box::pin(async move {
            if is_auth_endpoint(req.uri().path()) {
                return inner.call(req).await;
            }

            let replay = ReplayableRequest::buffer(req).await?;
            let response = inner.call(replay.build(None)).await?;
            if response.status() != StatusCode::UNAUTHORIZED {
                return Ok(response);
            }

            let Some(session) = sessions.get_session().await? else {
                return Ok(response);
            };

            if !replay.had_authorization() {
                tracing::debug!(uri = %replay.uri, "retrying with stored session token");
                return inner.ready().await?.call(replay.build(Some(&session.token))).await;
            }

            match request_new_session(&mut inner, &replay.uri, &session).await {
                Some(renewed) => {
                    sessions.set_session(&renewed).await?;
                    announce(state.as_ref()).await?;
                    tracing::debug!(uri = %replay.uri, "retrying with renewed session token");
                    inner.ready().await?.call(replay.build(Some(&renewed.token))).await
                }
                None => {
                    sessions.remove_session().await?;
                    announce(state.as_ref()).await?;
                    tracing::info!("session refresh failed; signed out");
                    Ok(response)
                }
            }
        })
    }
}

/// Republishes the state derived from storage after the session changed.
async fn announce(state: Option<&AuthenticationStateProvider>) -> Result<(), ClientError> {
    if let Some(state) = state {
        state.get_authentication_state().await?;
    }
    Ok(())
}

fn is_auth_endpoint(path: &str) -> bool {
    let path = path.trim_end_matches('/');
    [LOGIN_PATH, REGISTER_PATH, REFRESH_TOKEN_PATH]
        .iter()
        .any(|endpoint| path.ends_with(endpoint))
}

/// Calls the refresh endpoint through the inner service. Any failure, in
/// transport or in the answer, yields `None`.
async fn request_new_session<S>(
    inner: &mut S,
    original: &Uri,
    session: &UserSession,
) -> Option<UserSession>
where
    S: Service<Request<Body>, Response = Response<Body>, Error = ClientError>,
{
    let body = serde_json::to_vec(&RefreshTokenRequest {
        refresh_token: session.refresh_token.clone(),
    })
    .ok()?;
    let req = Request::builder()
        .method(Method::POST)
        .uri(sibling_uri(original, REFRESH_TOKEN_PATH))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .ok()?;

    let response = match inner.ready().await {
        Ok(service) => service.call(req).await,
        Err(err) => Err(err),
    };
    let response = match response {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(error = %err, "refresh request failed");
            return None;
        }
    };

    if response.status() != StatusCode::OK {
        return None;
    }
    let bytes = to_bytes(response.into_body(), MAX_BODY_BYTES).await.ok()?;
    let parsed: LoginResponse = serde_json::from_slice(&bytes).ok()?;
    if !parsed.flag {
        return None;
    }
    parsed.session()
}

/// `path` on the same origin as `original`.
fn sibling_uri(original: &Uri, path: &'static str) -> Uri {
    match (original.scheme_str(), original.authority()) {
        (Some(scheme), Some(authority)) => format!("{scheme}://{authority}{path}")
            .parse()
            .unwrap_or_else(|_| Uri::from_static(path)),
        _ => Uri::from_static(path),
    }
}

/// Request parts kept so the same request can be sent twice.
struct ReplayableRequest {
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
}

impl ReplayableRequest {
    async fn buffer(req: Request<Body>) -> Result<Self, ClientError> {
        let (parts, body) = req.into_parts();
        let body = to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|err| ClientError::Body(err.to_string()))?;
        Ok(Self {
            method: parts.method,
            uri: parts.uri,
            version: parts.version,
            headers: parts.headers,
            body,
        })
    }

    fn had_authorization(&self) -> bool {
        self.headers.contains_key(header::AUTHORIZATION)
    }

    fn build(&self, bearer: Option<&str>) -> Request<Body> {
        let mut req = Request::new(Body::from(self.body.clone()));
        *req.method_mut() = self.method.clone();
        *req.uri_mut() = self.uri.clone();
        *req.version_mut() = self.version;
        *req.headers_mut() = self.headers.clone();
        if let Some(token) = bearer {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) {
                req.headers_mut().insert(header::AUTHORIZATION, value);
            }
        }
        req
    }
}
