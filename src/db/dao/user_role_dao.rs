use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult, base::now};
use crate::db::entities::user_role::{self, Entity as UserRole};

pub struct UserRoleDao<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> DaoBase<'c, C> for UserRoleDao<'c, C> {
    fn new(conn: &'c C) -> Self {
        Self { conn }
    }
}

impl<'c, C: ConnectionTrait> UserRoleDao<'c, C> {
    pub async fn find_by_user(&self, user_id: &Uuid) -> DaoResult<Option<user_role::Model>> {
        UserRole::find()
            .filter(user_role::Column::UserId.eq(*user_id))
            .one(self.conn)
            .await
            .map_err(DaoLayerError::Db)
    }

    pub async fn assign(&self, user_id: &Uuid, role_id: &Uuid) -> DaoResult<user_role::Model> {
        let model = user_role::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(*user_id),
            role_id: Set(*role_id),
            created_at: Set(now()),
            ..Default::default()
        };
        model.insert(self.conn).await.map_err(DaoLayerError::Db)
    }
}
