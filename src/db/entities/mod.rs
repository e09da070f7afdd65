#[allow(unused_imports)]
pub mod prelude {
    pub use super::refresh_token_info::Entity as RefreshTokenInfo;
    pub use super::system_role::Entity as SystemRole;
    pub use super::user::Entity as User;
    pub use super::user_role::Entity as UserRole;
}

pub mod refresh_token_info;
pub mod system_role;
pub mod user;
pub mod user_role;
