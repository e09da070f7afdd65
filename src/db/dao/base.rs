use chrono::Utc;
use sea_orm::{ConnectionTrait, entity::prelude::DateTimeWithTimeZone};

/// Shared plumbing for DAOs that borrow a connection.
///
/// `C` is either the pooled `DatabaseConnection` or a `DatabaseTransaction`,
/// so the same DAO serves plain reads and multi-step writes. Queries live on
/// each DAO as inherent methods so their futures stay `Send`.
pub trait DaoBase<'c, C>: Sized
where
    C: ConnectionTrait + 'c,
{
    fn new(conn: &'c C) -> Self;
}

pub(crate) fn now() -> DateTimeWithTimeZone {
    Utc::now().fixed_offset()
}
