//! Wire types shared by the HTTP handlers and the client library.
//!
//! Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

pub const MIN_FULLNAME_LEN: usize = 5;
pub const MAX_FULLNAME_LEN: usize = 100;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub email_address: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default)]
    pub fullname: String,
}

impl RegisterRequest {
    /// Field-level checks. Password confirmation is checked separately by the
    /// account service so that a mismatch is reported first.
    pub fn validate(&self) -> Result<(), String> {
        let email = self.email_address.trim();
        if email.is_empty() {
            return Err("Email address is required".to_string());
        }
        if !looks_like_email(email) {
            return Err("Email address is not valid".to_string());
        }
        if self.password.is_empty() {
            return Err("Password is required".to_string());
        }

        let fullname_len = self.fullname.trim().chars().count();
        if fullname_len < MIN_FULLNAME_LEN {
            return Err(format!(
                "Fullname must be at least {MIN_FULLNAME_LEN} characters"
            ));
        }
        if fullname_len > MAX_FULLNAME_LEN {
            return Err(format!(
                "Fullname must be at most {MAX_FULLNAME_LEN} characters"
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email_address: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneralResponse {
    pub flag: bool,
    pub message: String,
}

impl GeneralResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            flag: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            flag: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub flag: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl LoginResponse {
    pub fn success(message: impl Into<String>, token: String, refresh_token: String) -> Self {
        Self {
            flag: true,
            message: message.into(),
            token: Some(token),
            refresh_token: Some(refresh_token),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            flag: false,
            message: message.into(),
            token: None,
            refresh_token: None,
        }
    }

    /// The token pair, when both halves are present and non-empty.
    pub fn session(&self) -> Option<UserSession> {
        match (self.token.as_deref(), self.refresh_token.as_deref()) {
            (Some(token), Some(refresh)) if !token.is_empty() && !refresh.is_empty() => {
                Some(UserSession {
                    token: token.to_string(),
                    refresh_token: refresh.to_string(),
                })
            }
            _ => None,
        }
    }
}

/// Token pair persisted on the client between requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub token: String,
    pub refresh_token: String,
}

fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}
