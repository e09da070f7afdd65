use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tracing::{error, info, warn};

use crate::{
    auth::{
        Role,
        password::{hash_password, verify_password},
    },
    db::{
        dao::{DaoBase, DaoContext, DaoLayerError, RoleDao, UserDao, UserRoleDao},
        entities::{system_role, user},
    },
    dto::{LoginRequest, RegisterRequest},
    error::{AccountError, AccountResult},
    services::token_service::TokenService,
};

pub const ACCOUNT_CREATED: &str = "Account created successfully";
pub const ACCOUNT_CREATION_FAILED: &str = "Account creation failed";
pub const LOGIN_SUCCESSFUL: &str = "Login successful";
pub const TOKEN_REFRESHED: &str = "Token refresh successfully";

/// A freshly issued token pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTokens {
    pub message: String,
    pub session_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct AccountService {
    db: DatabaseConnection,
    tokens: TokenService,
}

impl AccountService {
    pub fn new(db: &DatabaseConnection, tokens: TokenService) -> Self {
        Self {
            db: db.clone(),
            tokens,
        }
    }

    fn daos(&self) -> DaoContext {
        DaoContext::new(&self.db)
    }

    pub async fn register_account(&self, req: &RegisterRequest) -> AccountResult<String> {
        // plaintext comparison, before anything is hashed or stored
        if req.password != req.confirm_password {
            return Err(AccountError::Validation(
                "Passwords do not match".to_string(),
            ));
        }
        req.validate().map_err(AccountError::Validation)?;

        let daos = self.daos();
        if daos.user().find_by_email(&req.email_address).await?.is_some() {
            return Err(AccountError::Conflict("User already exists".to_string()));
        }

        let password_hash = hash_password(&req.password)?;

        let txn = self.db.begin().await.map_err(|err| {
            error!(error = %err, "failed to open registration transaction");
            AccountError::Internal(ACCOUNT_CREATION_FAILED.to_string())
        })?;

        match create_account_records(&txn, req, &password_hash).await {
            Ok((user, role)) => {
                txn.commit().await.map_err(|err| {
                    error!(error = %err, email = %user.email, "registration commit failed");
                    AccountError::Internal(ACCOUNT_CREATION_FAILED.to_string())
                })?;
                info!(email = %user.email, role = %role.name, "account registered");
                Ok(ACCOUNT_CREATED.to_string())
            }
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    error!(error = %rollback_err, "registration rollback failed");
                }
                warn!(error = %err, "registration rolled back");
                Err(err)
            }
        }
    }

    pub async fn sign_in(&self, req: &LoginRequest) -> AccountResult<SessionTokens> {
        if req.email_address.trim().is_empty() || req.password.is_empty() {
            return Err(AccountError::Validation(
                "Email address and password are required".to_string(),
            ));
        }

        let daos = self.daos();
        let user = daos
            .user()
            .find_by_email(&req.email_address)
            .await?
            .ok_or_else(|| AccountError::NotFound("User not found".to_string()))?;

        if !verify_password(&req.password, &user.password_hash)? {
            info!(email = %user.email, "sign-in rejected: wrong password");
            return Err(AccountError::Auth("Invalid password".to_string()));
        }

        let role = resolve_role(daos.db(), &user).await?;
        let session_token = self.tokens.issue_session_token(&user, &role.name)?;
        let refresh_token = TokenService::issue_refresh_token();
        daos.refresh_token()
            .upsert_for_user(&user.id, &refresh_token)
            .await?;

        info!(email = %user.email, role = %role.name, "user signed in");
        Ok(SessionTokens {
            message: LOGIN_SUCCESSFUL.to_string(),
            session_token,
            refresh_token,
        })
    }

    pub async fn refresh_session(&self, refresh_token: &str) -> AccountResult<SessionTokens> {
        let daos = self.daos();
        let record = self
            .tokens
            .validate_refresh_token(daos.db(), refresh_token)
            .await?
            .ok_or_else(refresh_token_not_found)?;

        let user = daos
            .user()
            .find_by_id(record.user_id)
            .await?
            .ok_or_else(|| AccountError::NotFound("User not found".to_string()))?;
        let role = resolve_role(daos.db(), &user).await?;

        let session_token = self.tokens.issue_session_token(&user, &role.name)?;
        let next_refresh = TokenService::issue_refresh_token();
        if !daos
            .refresh_token()
            .rotate(refresh_token, &next_refresh)
            .await?
        {
            warn!(email = %user.email, "refresh token was rotated concurrently");
            return Err(refresh_token_not_found());
        }

        info!(email = %user.email, "session refreshed");
        Ok(SessionTokens {
            message: TOKEN_REFRESHED.to_string(),
            session_token,
            refresh_token: next_refresh,
        })
    }
}

fn refresh_token_not_found() -> AccountError {
    AccountError::Auth("Refresh token not found".to_string())
}

/// Maps a failed write inside the registration transaction. Unique
/// violations are conflicts; anything else is logged and hidden.
fn registration_write_failure(err: DaoLayerError, conflict: &str) -> AccountError {
    if err.is_unique_violation() {
        return AccountError::Conflict(conflict.to_string());
    }
    error!(error = %err, "registration write failed");
    AccountError::Internal(ACCOUNT_CREATION_FAILED.to_string())
}

async fn create_account_records(
    txn: &DatabaseTransaction,
    req: &RegisterRequest,
    password_hash: &str,
) -> AccountResult<(user::Model, system_role::Model)> {
    let user = UserDao::new(txn)
        .create_user(&req.fullname, &req.email_address, password_hash)
        .await
        .map_err(|err| registration_write_failure(err, "User already exists"))?;

    let roles = RoleDao::new(txn);
    let admin_name = Role::Admin.as_str();
    let user_name = Role::User.as_str();
    let role = match Role::requested_for(&req.fullname) {
        Role::Admin => match roles.find_by_name(admin_name).await {
            Ok(None) => roles.create_role(admin_name).await,
            Ok(Some(_)) => roles.find_or_create(user_name).await,
            Err(err) => Err(err),
        },
        Role::User => roles.find_or_create(user_name).await,
    }
    .map_err(|err| registration_write_failure(err, "Role already exists"))?;

    UserRoleDao::new(txn)
        .assign(&user.id, &role.id)
        .await
        .map_err(|err| registration_write_failure(err, "User role already assigned"))?;

    Ok((user, role))
}

async fn resolve_role(
    conn: &DatabaseConnection,
    user: &user::Model,
) -> AccountResult<system_role::Model> {
    let link = UserRoleDao::new(conn)
        .find_by_user(&user.id)
        .await?
        .ok_or_else(|| {
            error!(email = %user.email, "user has no role link");
            AccountError::Integrity("User role not found".to_string())
        })?;

    RoleDao::new(conn)
        .find_by_id(link.role_id)
        .await?
        .ok_or_else(|| {
            error!(email = %user.email, role_id = %link.role_id, "role link points at no role");
            AccountError::Integrity("System role not found".to_string())
        })
}
