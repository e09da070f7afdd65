use serde::{Deserialize, Serialize};

/// Display name that qualifies a registration for the admin role.
pub const ADMIN_DISPLAY_NAME: &str = "admin";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
        }
    }

    /// Role requested by a new registration. Whether an admin request is
    /// honoured depends on the store.
    pub fn requested_for(display_name: &str) -> Self {
        if display_name.trim().eq_ignore_ascii_case(ADMIN_DISPLAY_NAME) {
            Role::Admin
        } else {
            Role::User
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String, // user id
    pub name: String,
    pub email: String,
    pub role: String,
    pub iss: String,
    pub aud: String,
    pub iat: usize,
    pub exp: usize,
}

#[cfg(test)]
mod tests {
    use super::Role;

    #[test]
    fn role_names_match_stored_records() {
        assert_eq!(Role::Admin.as_str(), "Admin");
        assert_eq!(Role::User.as_str(), "User");
    }

    #[test]
    fn admin_display_name_is_case_insensitive() {
        assert_eq!(Role::requested_for("admin"), Role::Admin);
        assert_eq!(Role::requested_for(" ADMIN "), Role::Admin);
        assert_eq!(Role::requested_for("administrator"), Role::User);
        assert_eq!(Role::requested_for("alice"), Role::User);
    }
}
