use base64::{Engine, engine::general_purpose::STANDARD};
use rand::{RngCore, rngs::OsRng};
use sea_orm::ConnectionTrait;

use crate::{
    auth::{
        Claims,
        jwt::{JwtKeys, decode_token, encode_token, now_unix},
    },
    config::JwtConfig,
    db::{
        dao::{DaoBase, DaoResult, RefreshTokenDao},
        entities::{refresh_token_info, user},
    },
    error::{AccountError, AccountResult},
};

pub const REFRESH_TOKEN_BYTES: usize = 64;

/// Issues session tokens and opaque refresh tokens.
///
/// The signing key is optional here; a missing key is reported per call as a
/// configuration error instead of failing construction.
#[derive(Clone)]
pub struct TokenService {
    keys: Option<JwtKeys>,
    issuer: String,
    audience: String,
    ttl_secs: usize,
}

impl TokenService {
    pub fn new(cfg: &JwtConfig) -> Self {
        let keys = cfg
            .key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| JwtKeys::from_secret(key.as_bytes()));

        Self {
            keys,
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl_secs: cfg.token_ttl_hours as usize * 60 * 60,
        }
    }

    fn keys(&self) -> AccountResult<&JwtKeys> {
        self.keys.as_ref().ok_or_else(|| {
            tracing::error!("session token requested but no signing key is configured");
            AccountError::Config("Token signing key is not configured".to_string())
        })
    }

    pub fn issue_session_token(&self, user: &user::Model, role_name: &str) -> AccountResult<String> {
        let keys = self.keys()?;
        let iat = now_unix();
        let claims = Claims {
            sub: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: role_name.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat,
            exp: iat + self.ttl_secs,
        };

        encode_token(keys, &claims).map_err(|err| {
            tracing::error!(error = %err, "session token encoding failed");
            AccountError::Internal("Token generation failed".to_string())
        })
    }

    pub fn issue_refresh_token() -> String {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        STANDARD.encode(bytes)
    }

    /// Exact-match lookup of a stored refresh token.
    pub async fn validate_refresh_token<C: ConnectionTrait>(
        &self,
        conn: &C,
        token: &str,
    ) -> DaoResult<Option<refresh_token_info::Model>> {
        if token.is_empty() {
            return Ok(None);
        }
        RefreshTokenDao::new(conn).find_by_token(token).await
    }

    pub fn verify_session_token(&self, token: &str) -> AccountResult<Claims> {
        let keys = self.keys()?;
        decode_token(keys, token, &self.issuer, &self.audience)
            .map_err(|err| AccountError::Auth(format!("Invalid or expired token: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use base64::{Engine, engine::general_purpose::STANDARD};
    use chrono::Utc;
    use uuid::Uuid;

    use super::{REFRESH_TOKEN_BYTES, TokenService};
    use crate::{config::JwtConfig, db::entities::user, error::AccountError};

    fn config(key: Option<&str>) -> JwtConfig {
        JwtConfig {
            key: key.map(str::to_string),
            ..JwtConfig::default()
        }
    }

    fn user_model() -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            name: "alice".to_string(),
            email: "alice@x.com".to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now().fixed_offset(),
            updated_at: Utc::now().fixed_offset(),
        }
    }

    #[test]
    fn session_token_carries_identity_and_role() {
        let service = TokenService::new(&config(Some("unit-test-signing-key")));
        let user = user_model();

        let token = service
            .issue_session_token(&user, "User")
            .expect("token should issue");
        let claims = service
            .verify_session_token(&token)
            .expect("token should verify");

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.name, "alice");
        assert_eq!(claims.email, "alice@x.com");
        assert_eq!(claims.role, "User");
        assert_eq!(claims.iss, JwtConfig::default().issuer);
        assert_eq!(claims.aud, JwtConfig::default().audience);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn missing_key_is_a_config_error() {
        for key in [None, Some(""), Some("   ")] {
            let service = TokenService::new(&config(key));

            let err = service
                .issue_session_token(&user_model(), "User")
                .expect_err("issuing without a key should fail");
            assert!(matches!(err, AccountError::Config(_)));
        }
    }

    #[test]
    fn rejects_token_from_other_issuer_config() {
        let issuing = TokenService::new(&config(Some("shared-key")));
        let mut other_cfg = config(Some("shared-key"));
        other_cfg.audience = "someone-else".to_string();
        let verifying = TokenService::new(&other_cfg);

        let token = issuing
            .issue_session_token(&user_model(), "Admin")
            .expect("token should issue");
        let err = verifying
            .verify_session_token(&token)
            .expect_err("audience mismatch should fail");

        assert!(matches!(err, AccountError::Auth(_)));
    }

    #[test]
    fn refresh_tokens_are_64_random_bytes_base64() {
        let first = TokenService::issue_refresh_token();
        let second = TokenService::issue_refresh_token();

        let decoded = STANDARD.decode(&first).expect("token should be base64");
        assert_eq!(decoded.len(), REFRESH_TOKEN_BYTES);
        assert_ne!(first, second);
    }
}
