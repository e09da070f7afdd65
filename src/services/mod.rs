pub mod account_service;
pub mod context;
pub mod token_service;

pub use account_service::{AccountService, SessionTokens};
pub use context::ServiceContext;
pub use token_service::TokenService;
