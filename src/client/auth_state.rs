use std::sync::Arc;

use tokio::sync::watch;

use super::{ClientError, LocalStorageProvider};
use crate::{
    auth::{Claims, jwt::decode_unverified},
    dto::UserSession,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated(Claims),
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn claims(&self) -> Option<&Claims> {
        match self {
            AuthState::Authenticated(claims) => Some(claims),
            AuthState::Anonymous => None,
        }
    }
}

/// Derives the signed-in user from the stored session and announces changes.
///
/// Claims are read without verifying the signature; the server remains the
/// only authority on whether a token is valid. Clones share one channel.
#[derive(Clone)]
pub struct AuthenticationStateProvider {
    sessions: LocalStorageProvider,
    tx: Arc<watch::Sender<AuthState>>,
}

impl AuthenticationStateProvider {
    pub fn new(sessions: LocalStorageProvider) -> Self {
        let (tx, _rx) = watch::channel(AuthState::Anonymous);
        Self {
            sessions,
            tx: Arc::new(tx),
        }
    }

    pub fn sessions(&self) -> &LocalStorageProvider {
        &self.sessions
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }

    pub async fn get_authentication_state(&self) -> Result<AuthState, ClientError> {
        let state = match self.sessions.get_session().await? {
            Some(session) => state_for(&session.token),
            None => AuthState::Anonymous,
        };
        self.publish(state.clone());
        Ok(state)
    }

    /// Persists a new session, or clears it when `None` or unreadable.
    pub async fn update_authentication_state(
        &self,
        session: Option<UserSession>,
    ) -> Result<AuthState, ClientError> {
        let state = match session {
            Some(session) if !session.token.is_empty() => {
                let state = state_for(&session.token);
                if state.is_authenticated() {
                    self.sessions.set_session(&session).await?;
                } else {
                    self.sessions.remove_session().await?;
                }
                state
            }
            _ => {
                self.sessions.remove_session().await?;
                AuthState::Anonymous
            }
        };
        self.publish(state.clone());
        Ok(state)
    }

    pub async fn sign_out(&self) -> Result<(), ClientError> {
        self.update_authentication_state(None).await.map(|_| ())
    }

    fn publish(&self, state: AuthState) {
        self.tx.send_if_modified(|current| {
            if *current == state {
                return false;
            }
            *current = state;
            true
        });
    }
}

fn state_for(token: &str) -> AuthState {
    match decode_unverified(token) {
        Ok(claims) => AuthState::Authenticated(claims),
        Err(err) => {
            tracing::warn!(error = %err, "stored session token is unreadable");
            AuthState::Anonymous
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use uuid::Uuid;

    use super::{AuthState, AuthenticationStateProvider};
    use crate::{
        client::{LocalStorageProvider, MemoryStorage},
        config::JwtConfig,
        db::entities::user,
        dto::UserSession,
        services::TokenService,
    };

    fn issued_session() -> UserSession {
        let cfg = JwtConfig {
            key: Some("state-provider-key".to_string()),
            ..JwtConfig::default()
        };
        let user = user::Model {
            id: Uuid::new_v4(),
            name: "alice".to_string(),
            email: "alice@x.com".to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now().fixed_offset(),
            updated_at: Utc::now().fixed_offset(),
        };
        UserSession {
            token: TokenService::new(&cfg)
                .issue_session_token(&user, "User")
                .expect("token should issue"),
            refresh_token: "refresh".to_string(),
        }
    }

    fn provider() -> (AuthenticationStateProvider, LocalStorageProvider) {
        let sessions = LocalStorageProvider::new(Arc::new(MemoryStorage::new()));
        (AuthenticationStateProvider::new(sessions.clone()), sessions)
    }

    #[tokio::test]
    async fn empty_storage_is_anonymous() {
        let (provider, _) = provider();

        let state = provider
            .get_authentication_state()
            .await
            .expect("state should load");
        assert_eq!(state, AuthState::Anonymous);
    }

    #[tokio::test]
    async fn update_persists_session_and_notifies() {
        let (provider, sessions) = provider();
        let mut rx = provider.subscribe();
        let session = issued_session();

        let state = provider
            .update_authentication_state(Some(session.clone()))
            .await
            .expect("update should succeed");

        let claims = state.claims().expect("should be authenticated");
        assert_eq!(claims.email, "alice@x.com");
        assert_eq!(claims.role, "User");
        assert!(rx.has_changed().expect("sender alive"));
        assert!(rx.borrow_and_update().is_authenticated());
        assert_eq!(sessions.get_session().await.expect("load"), Some(session));
    }

    #[tokio::test]
    async fn sign_out_clears_session() {
        let (provider, sessions) = provider();
        provider
            .update_authentication_state(Some(issued_session()))
            .await
            .expect("update should succeed");

        provider.sign_out().await.expect("sign out should succeed");

        assert_eq!(sessions.get_session().await.expect("load"), None);
        assert_eq!(*provider.subscribe().borrow(), AuthState::Anonymous);
    }

    #[tokio::test]
    async fn unreadable_token_is_not_stored() {
        let (provider, sessions) = provider();

        let state = provider
            .update_authentication_state(Some(UserSession {
                token: "garbage".to_string(),
                refresh_token: "refresh".to_string(),
            }))
            .await
            .expect("update should succeed");

        assert_eq!(state, AuthState::Anonymous);
        assert_eq!(sessions.get_session().await.expect("load"), None);
    }
}
