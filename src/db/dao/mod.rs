pub mod base;
mod context;
pub mod error;
pub mod refresh_token_dao;
pub mod role_dao;
pub mod user_dao;
pub mod user_role_dao;

pub use base::DaoBase;
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use refresh_token_dao::RefreshTokenDao;
pub use role_dao::RoleDao;
pub use user_dao::UserDao;
pub use user_role_dao::UserRoleDao;
