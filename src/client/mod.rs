//! Client side of the authentication flow: session storage, the HTTP
//! transport, the refresh-and-retry interceptor and typed account calls.

pub mod account;
pub mod auth_state;
mod error;
pub mod handler;
pub mod session;
pub mod storage;
pub mod transport;

pub use account::UserAccountClient;
pub use auth_state::{AuthState, AuthenticationStateProvider};
pub use error::ClientError;
pub use handler::{SessionRefresh, SessionRefreshLayer};
pub use session::{LocalStorageProvider, STORAGE_KEY};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use transport::HttpTransport;

/// Paths of the endpoints that never carry or renew a session.
pub const LOGIN_PATH: &str = "/api/authentication/login";
pub const REGISTER_PATH: &str = "/api/authentication/register";
pub const REFRESH_TOKEN_PATH: &str = "/api/authentication/refresh-token";
