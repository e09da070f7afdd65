use std::sync::Arc;

use anyhow::{Result, bail};
use serde_json::Value;
use tower::ServiceBuilder;

use employee_auth::{
    client::{
        AuthenticationStateProvider, FileStorage, HttpTransport, LocalStorageProvider,
        SessionRefreshLayer, UserAccountClient,
    },
    config::LoggingConfig,
    dto::{LoginRequest, RegisterRequest},
    logging::init_tracing,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(&LoggingConfig::default());

    // Defaults assume the server is running locally on :5000
    let base = std::env::var("BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:5000".to_string());
    let email = std::env::var("EMAIL").unwrap_or_else(|_| "jane.doe@example.com".to_string());
    let password = std::env::var("PASSWORD").unwrap_or_else(|_| "password123".to_string());
    let fullname = std::env::var("FULLNAME").unwrap_or_else(|_| "Jane Doe".to_string());
    let store_dir = std::env::var("SESSION_DIR").unwrap_or_else(|_| ".session".to_string());

    let sessions = LocalStorageProvider::new(Arc::new(FileStorage::new(store_dir)));
    let auth_state = AuthenticationStateProvider::new(sessions);
    let service = ServiceBuilder::new()
        .layer(SessionRefreshLayer::with_state(auth_state.clone()))
        .service(HttpTransport::new(base.clone()));
    let accounts = UserAccountClient::new(service);

    // 1) register (an existing account is fine)
    println!("\n==> POST {base}/api/authentication/register");
    let registered = accounts
        .create_account(&RegisterRequest {
            email_address: email.clone(),
            password: password.clone(),
            confirm_password: password.clone(),
            fullname,
        })
        .await;
    println!("flag={} message={}", registered.flag, registered.message);

    // 2) login -> token pair
    println!("\n==> POST {base}/api/authentication/login");
    let login = accounts
        .sign_in(&LoginRequest {
            email_address: email,
            password,
        })
        .await;
    println!("flag={} message={}", login.flag, login.message);
    let Some(session) = login.session() else {
        bail!("login failed: {}", login.message);
    };

    let state = auth_state
        .update_authentication_state(Some(session))
        .await?;
    if let Some(claims) = state.claims() {
        println!("signed in as {} <{}> ({})", claims.name, claims.email, claims.role);
    }

    // 3) protected call; an expired token is renewed transparently
    println!("\n==> GET {base}/api/account/me");
    let profile: Value = accounts.get_json("/api/account/me").await?;
    println!("{}", serde_json::to_string_pretty(&profile)?);

    Ok(())
}
