use thiserror::Error;

use crate::db::dao::DaoLayerError;

/// HTTP-facing error. Rendered as `{flag: false, message}` by `response`.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(message)
            | Self::Unauthorized(message)
            | Self::NotFound(message)
            | Self::Internal(message) => message.as_str(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Outcome of a failed account operation.
///
/// Every variant carries the message shown to the caller. `Internal` never
/// carries driver details; those are logged where the failure happens.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Auth(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Integrity(String),
    #[error("{0}")]
    Config(String),
    #[error("{0}")]
    Internal(String),
}

pub type AccountResult<T> = Result<T, AccountError>;

impl From<DaoLayerError> for AccountError {
    fn from(err: DaoLayerError) -> Self {
        if err.is_unique_violation() {
            return AccountError::Conflict("Record already exists".to_string());
        }
        tracing::error!(error = %err, "persistence failure");
        AccountError::Internal("Database operation failed".to_string())
    }
}

// Every account failure is a 400 at the HTTP boundary.
impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        AppError::bad_request(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::DbErr;

    use super::{AccountError, AppError};
    use crate::db::dao::DaoLayerError;

    #[test]
    fn account_errors_become_bad_requests_with_same_message() {
        let err = AppError::from(AccountError::Auth("Invalid password".to_string()));

        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(err.message(), "Invalid password");
    }

    #[test]
    fn database_errors_hide_driver_details() {
        let err = AccountError::from(DaoLayerError::Db(DbErr::Custom(
            "connection reset by peer".to_string(),
        )));

        assert_eq!(
            err,
            AccountError::Internal("Database operation failed".to_string())
        );
    }
}
