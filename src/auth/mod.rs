pub mod jwt;
pub mod password;
mod types;

pub use types::{ADMIN_DISPLAY_NAME, Claims, Role};
