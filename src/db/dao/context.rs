use sea_orm::DatabaseConnection;

use super::{DaoBase, RefreshTokenDao, RoleDao, UserDao, UserRoleDao};

#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn user(&self) -> UserDao<'_, DatabaseConnection> {
        DaoBase::new(&self.db)
    }

    pub fn role(&self) -> RoleDao<'_, DatabaseConnection> {
        DaoBase::new(&self.db)
    }

    pub fn user_role(&self) -> UserRoleDao<'_, DatabaseConnection> {
        DaoBase::new(&self.db)
    }

    pub fn refresh_token(&self) -> RefreshTokenDao<'_, DatabaseConnection> {
        DaoBase::new(&self.db)
    }
}
