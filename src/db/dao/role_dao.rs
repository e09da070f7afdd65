use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult, base::now};
use crate::db::entities::system_role::{self, Entity as SystemRole};

pub struct RoleDao<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> DaoBase<'c, C> for RoleDao<'c, C> {
    fn new(conn: &'c C) -> Self {
        Self { conn }
    }
}

impl<'c, C: ConnectionTrait> RoleDao<'c, C> {
    pub async fn find_by_id(&self, id: Uuid) -> DaoResult<Option<system_role::Model>> {
        SystemRole::find_by_id(id)
            .one(self.conn)
            .await
            .map_err(DaoLayerError::Db)
    }

    pub async fn find_by_name(&self, name: &str) -> DaoResult<Option<system_role::Model>> {
        SystemRole::find()
            .filter(system_role::Column::Name.eq(name))
            .one(self.conn)
            .await
            .map_err(DaoLayerError::Db)
    }

    pub async fn create_role(&self, name: &str) -> DaoResult<system_role::Model> {
        let model = system_role::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            created_at: Set(now()),
            ..Default::default()
        };
        model.insert(self.conn).await.map_err(DaoLayerError::Db)
    }

    /// Returns the role record with this name, creating it on first use.
    pub async fn find_or_create(&self, name: &str) -> DaoResult<system_role::Model> {
        match self.find_by_name(name).await? {
            Some(role) => Ok(role),
            None => self.create_role(name).await,
        }
    }
}
