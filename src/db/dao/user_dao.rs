use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult, base::now};
use crate::db::entities::user::{self, Entity as User};

pub struct UserDao<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> DaoBase<'c, C> for UserDao<'c, C> {
    fn new(conn: &'c C) -> Self {
        Self { conn }
    }
}

/// Canonical form used for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl<'c, C: ConnectionTrait> UserDao<'c, C> {
    pub async fn find_by_id(&self, id: Uuid) -> DaoResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.conn)
            .await
            .map_err(DaoLayerError::Db)
    }

    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Email.eq(normalize_email(email)))
            .one(self.conn)
            .await
            .map_err(DaoLayerError::Db)
    }

    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> DaoResult<user::Model> {
        let now = now();
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.trim().to_string()),
            email: Set(normalize_email(email)),
            password_hash: Set(password_hash.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        model.insert(self.conn).await.map_err(DaoLayerError::Db)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
    use uuid::Uuid;

    use super::{UserDao, normalize_email};
    use crate::db::{
        dao::{DaoBase, DaoLayerError},
        entities::user,
    };

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn user_model(id: Uuid, email: &str) -> user::Model {
        user::Model {
            id,
            name: "alice".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            created_at: ts(),
            updated_at: ts(),
        }
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  Alice@X.COM "), "alice@x.com");
    }

    #[tokio::test]
    async fn find_by_email_queries_normalized_address() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user_model(id, "alice@x.com")]])
            .into_connection();
        let dao = UserDao::new(&db);

        let found = dao
            .find_by_email("ALICE@x.com")
            .await
            .expect("query should succeed");
        assert_eq!(found.map(|u| u.id), Some(id));

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
        assert!(format!("{:?}", log[0]).contains("alice@x.com"));
    }

    #[tokio::test]
    async fn find_by_email_returns_none_when_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let dao = UserDao::new(&db);

        let result = dao
            .find_by_email("missing@x.com")
            .await
            .expect("query should succeed");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn find_by_id_returns_none_for_unknown_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let dao = UserDao::new(&db);

        let found = dao
            .find_by_id(Uuid::new_v4())
            .await
            .expect("query should succeed");
        assert!(found.is_none());
    }

    fn assert_send<T: Send>(_: &T) {}

    #[tokio::test]
    async fn lookup_futures_are_send() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let dao = UserDao::new(&db);

        let lookup = dao.find_by_id(Uuid::new_v4());
        assert_send(&lookup);
        assert!(lookup.await.expect("query should succeed").is_none());
    }

    #[tokio::test]
    async fn create_user_maps_database_errors() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("insert failed".to_string())])
            .into_connection();
        let dao = UserDao::new(&db);

        let err = dao
            .create_user("alice", "alice@x.com", "hash")
            .await
            .expect_err("insert should fail");
        assert!(matches!(err, DaoLayerError::Db(_)));
        assert!(!err.is_unique_violation());
    }
}
