use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaoLayerError {
    #[error("Database error: {0}")]
    Db(DbErr),
}

pub type DaoResult<T> = Result<T, DaoLayerError>;

impl DaoLayerError {
    /// True when the store rejected a write because of a unique constraint.
    pub fn is_unique_violation(&self) -> bool {
        let DaoLayerError::Db(err) = self;
        matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
    }
}
