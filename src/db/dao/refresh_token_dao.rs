use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult, base::now};
use crate::db::entities::refresh_token_info::{self, Entity as RefreshTokenInfo};

pub struct RefreshTokenDao<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> DaoBase<'c, C> for RefreshTokenDao<'c, C> {
    fn new(conn: &'c C) -> Self {
        Self { conn }
    }
}

impl<'c, C: ConnectionTrait> RefreshTokenDao<'c, C> {
    pub async fn find_by_token(&self, token: &str) -> DaoResult<Option<refresh_token_info::Model>> {
        RefreshTokenInfo::find()
            .filter(refresh_token_info::Column::Token.eq(token))
            .one(self.conn)
            .await
            .map_err(DaoLayerError::Db)
    }

    /// Stores `token` as the user's only refresh token, replacing any previous one
    /// in a single statement.
    pub async fn upsert_for_user(&self, user_id: &Uuid, token: &str) -> DaoResult<()> {
        let now = now();
        let model = refresh_token_info::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(*user_id),
            token: Set(token.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        RefreshTokenInfo::insert(model)
            .on_conflict(
                OnConflict::column(refresh_token_info::Column::UserId)
                    .update_columns([
                        refresh_token_info::Column::Token,
                        refresh_token_info::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(())
    }

    /// Replaces `current` with `next` only if `current` is still the stored
    /// token. Returns false when another rotation got there first.
    pub async fn rotate(&self, current: &str, next: &str) -> DaoResult<bool> {
        let result = RefreshTokenInfo::update_many()
            .col_expr(refresh_token_info::Column::Token, Expr::value(next))
            .col_expr(refresh_token_info::Column::UpdatedAt, Expr::value(now()))
            .filter(refresh_token_info::Column::Token.eq(current))
            .exec(self.conn)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected == 1)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use super::RefreshTokenDao;
    use crate::db::{
        dao::{DaoBase, DaoLayerError},
        entities::refresh_token_info,
    };

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn token_model(token: &str, user_id: Uuid) -> refresh_token_info::Model {
        refresh_token_info::Model {
            id: Uuid::new_v4(),
            user_id,
            token: token.to_string(),
            created_at: ts(),
            updated_at: ts(),
        }
    }

    #[tokio::test]
    async fn find_by_token_returns_record_when_present() {
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[token_model("token-1", user_id)]])
            .into_connection();
        let dao = RefreshTokenDao::new(&db);

        let record = dao
            .find_by_token("token-1")
            .await
            .expect("query should succeed")
            .expect("record should exist");
        assert_eq!(record.user_id, user_id);
    }

    #[tokio::test]
    async fn find_by_token_returns_none_when_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<refresh_token_info::Model>::new()])
            .into_connection();
        let dao = RefreshTokenDao::new(&db);

        let record = dao
            .find_by_token("missing-token")
            .await
            .expect("query should succeed");
        assert!(record.is_none());
    }

    #[tokio::test]
    async fn upsert_issues_single_on_conflict_statement() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let dao = RefreshTokenDao::new(&db);

        dao.upsert_for_user(&Uuid::new_v4(), "token-2")
            .await
            .expect("upsert should succeed");

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
        let statement = format!("{:?}", log[0]);
        assert!(statement.contains("ON CONFLICT"), "unexpected sql: {statement}");
    }

    #[tokio::test]
    async fn rotate_reports_lost_race() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let dao = RefreshTokenDao::new(&db);

        let rotated = dao
            .rotate("stale-token", "new-token")
            .await
            .expect("update should run");
        assert!(!rotated);
    }

    #[tokio::test]
    async fn rotate_maps_database_errors() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_errors([DbErr::Custom("update failed".to_string())])
            .into_connection();
        let dao = RefreshTokenDao::new(&db);

        let err = dao
            .rotate("token-1", "token-2")
            .await
            .expect_err("update should fail");
        assert!(matches!(err, DaoLayerError::Db(_)));
    }
}
