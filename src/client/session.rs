use std::sync::Arc;

use crate::dto::UserSession;

use super::{ClientError, KeyValueStorage};

/// Fixed key of the persisted token pair.
pub const STORAGE_KEY: &str = "authentication-token";

/// Reads and writes the serialized `UserSession` under [`STORAGE_KEY`].
#[derive(Clone)]
pub struct LocalStorageProvider {
    storage: Arc<dyn KeyValueStorage>,
}

impl LocalStorageProvider {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// A blob that no longer parses is treated as signed out.
    pub async fn get_session(&self) -> Result<Option<UserSession>, ClientError> {
        let Some(raw) = self.storage.get(STORAGE_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<UserSession>(&raw) {
            Ok(session) if !session.token.is_empty() => Ok(Some(session)),
            Ok(_) => Ok(None),
            Err(err) => {
                tracing::warn!(error = %err, "discarding unreadable stored session");
                Ok(None)
            }
        }
    }

    pub async fn set_session(&self, session: &UserSession) -> Result<(), ClientError> {
        let raw = serde_json::to_string(session)?;
        self.storage.set(STORAGE_KEY, &raw).await
    }

    pub async fn remove_session(&self) -> Result<(), ClientError> {
        self.storage.remove(STORAGE_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{LocalStorageProvider, STORAGE_KEY};
    use crate::{
        client::{KeyValueStorage, MemoryStorage},
        dto::UserSession,
    };

    #[tokio::test]
    async fn stores_camel_case_pair_under_fixed_key() {
        let storage = Arc::new(MemoryStorage::new());
        let sessions = LocalStorageProvider::new(storage.clone());
        let session = UserSession {
            token: "t1".to_string(),
            refresh_token: "r1".to_string(),
        };

        sessions.set_session(&session).await.expect("save");

        let raw = storage
            .get(STORAGE_KEY)
            .await
            .expect("get")
            .expect("blob should exist");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("blob is json");
        assert_eq!(value["token"], "t1");
        assert_eq!(value["refreshToken"], "r1");
        assert_eq!(sessions.get_session().await.expect("load"), Some(session));

        sessions.remove_session().await.expect("remove");
        assert_eq!(sessions.get_session().await.expect("load"), None);
    }

    #[tokio::test]
    async fn corrupt_blob_reads_as_signed_out() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(STORAGE_KEY, "{not json").await.expect("set");

        let sessions = LocalStorageProvider::new(storage);
        assert_eq!(sessions.get_session().await.expect("load"), None);
    }
}
