use axum::{
    body::{Body, to_bytes},
    http::{Method, Request, Response, header},
};
use serde::{Serialize, de::DeserializeOwned};
use tower::{Service, ServiceExt};

use super::{
    ClientError, LOGIN_PATH, REFRESH_TOKEN_PATH, REGISTER_PATH, transport::MAX_BODY_BYTES,
};
use crate::dto::{
    GeneralResponse, LoginRequest, LoginResponse, RefreshTokenRequest, RegisterRequest,
};

const GENERIC_FAILURE: &str = "Error occurred";

/// Typed calls against the account endpoints.
///
/// The authentication methods never fail: transport and decoding problems
/// come back as `flag: false` responses.
#[derive(Clone)]
pub struct UserAccountClient<S> {
    service: S,
}

impl<S> UserAccountClient<S>
where
    S: Service<Request<Body>, Response = Response<Body>, Error = ClientError> + Clone,
{
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub async fn create_account(&self, req: &RegisterRequest) -> GeneralResponse {
        match self.post_json::<_, GeneralResponse>(REGISTER_PATH, req).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, "register call failed");
                GeneralResponse::failure(GENERIC_FAILURE)
            }
        }
    }

    pub async fn sign_in(&self, req: &LoginRequest) -> LoginResponse {
        match self.post_json::<_, LoginResponse>(LOGIN_PATH, req).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, "login call failed");
                LoginResponse::failure(GENERIC_FAILURE)
            }
        }
    }

    pub async fn refresh_token(&self, req: &RefreshTokenRequest) -> LoginResponse {
        match self
            .post_json::<_, LoginResponse>(REFRESH_TOKEN_PATH, req)
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, "refresh-token call failed");
                LoginResponse::failure(GENERIC_FAILURE)
            }
        }
    }

    /// GET a JSON resource. Unlike the account calls, errors are returned.
    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ClientError> {
        let req = Request::builder()
            .method(Method::GET)
            .uri(path)
            .header(header::ACCEPT, "application/json")
            .body(Body::empty())
            .map_err(|err| ClientError::InvalidRequest(err.to_string()))?;
        self.send_json(req).await
    }

    async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ClientError> {
        let req = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(body)?))
            .map_err(|err| ClientError::InvalidRequest(err.to_string()))?;
        self.send_json(req).await
    }

    // Error statuses still carry a `{flag, message}` body, so the body is
    // decoded whatever the status.
    async fn send_json<R: DeserializeOwned>(&self, req: Request<Body>) -> Result<R, ClientError> {
        let response = self.service.clone().oneshot(req).await?;
        let bytes = to_bytes(response.into_body(), MAX_BODY_BYTES)
            .await
            .map_err(|err| ClientError::Body(err.to_string()))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, Response, StatusCode},
    };
    use serde_json::json;
    use tower::service_fn;

    use super::UserAccountClient;
    use crate::{
        client::ClientError,
        dto::{LoginRequest, RegisterRequest},
    };

    fn json_response(status: StatusCode, value: serde_json::Value) -> Response<Body> {
        let mut response = Response::new(Body::from(value.to_string()));
        *response.status_mut() = status;
        response
    }

    #[tokio::test]
    async fn failure_body_is_passed_through() {
        let client = UserAccountClient::new(service_fn(|_req: Request<Body>| async {
            Ok::<_, ClientError>(json_response(
                StatusCode::BAD_REQUEST,
                json!({"flag": false, "message": "User already exists"}),
            ))
        }));

        let response = client.create_account(&RegisterRequest::default()).await;
        assert!(!response.flag);
        assert_eq!(response.message, "User already exists");
    }

    #[tokio::test]
    async fn transport_errors_become_flag_false() {
        let client = UserAccountClient::new(service_fn(|_req: Request<Body>| async {
            Err::<Response<Body>, _>(ClientError::Body("connection reset".to_string()))
        }));

        let response = client.sign_in(&LoginRequest::default()).await;
        assert!(!response.flag);
        assert!(response.token.is_none());
    }

    #[tokio::test]
    async fn unparseable_body_becomes_flag_false() {
        let client = UserAccountClient::new(service_fn(|_req: Request<Body>| async {
            Ok::<_, ClientError>(Response::new(Body::from("<html>gateway</html>")))
        }));

        let response = client.sign_in(&LoginRequest::default()).await;
        assert!(!response.flag);
    }
}
