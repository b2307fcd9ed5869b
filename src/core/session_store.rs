//! Persisted identity + credential pair.
//!
//! The pair is stored as two entries under fixed keys: [`TOKEN_KEY`] holds
//! the raw bearer token and [`USER_KEY`] holds the identity as JSON. Both
//! are written in one backend call and both must be present and parseable
//! for [`SessionStore::load`] to report a session.

use crate::api::{Credential, Identity};
use crate::core::kv::{KvBackend, KvError};
use thiserror::Error;
use tracing::{debug, warn};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub identity: Identity,
    pub credential: Credential,
}

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("Failed to encode identity: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Backend(#[from] KvError),
}

impl SessionStoreError {
    /// The OS keyring is locked or missing, as opposed to refusing the data.
    pub fn is_keyring_unavailable(&self) -> bool {
        matches!(self, SessionStoreError::Backend(KvError::Keyring(err)) if err.is_unavailable())
    }
}

pub struct SessionStore {
    backend: Box<dyn KvBackend>,
}

impl SessionStore {
    pub fn new(backend: Box<dyn KvBackend>) -> Self {
        Self { backend }
    }

    pub fn location(&self) -> String {
        self.backend.describe()
    }

    pub fn save(
        &self,
        identity: &Identity,
        credential: &Credential,
    ) -> Result<(), SessionStoreError> {
        let user_json = serde_json::to_string(identity)?;
        self.backend
            .set_many(&[(TOKEN_KEY, credential.as_str()), (USER_KEY, user_json.as_str())])?;
        debug!(user_id = %identity.id, "session saved");
        Ok(())
    }

    /// The stored pair, or `None` when absent, partial or unreadable.
    pub fn load(&self) -> Option<StoredSession> {
        let token = self.read_entry(TOKEN_KEY)?;
        let user_json = self.read_entry(USER_KEY)?;

        if token.trim().is_empty() {
            warn!("stored session has an empty token; ignoring it");
            return None;
        }

        match serde_json::from_str::<Identity>(&user_json) {
            Ok(identity) => Some(StoredSession {
                identity,
                credential: Credential::new(token),
            }),
            Err(err) => {
                warn!(error = %err, "stored identity is malformed; ignoring it");
                None
            }
        }
    }

    pub fn clear(&self) -> Result<(), SessionStoreError> {
        self.backend.remove_many(&[TOKEN_KEY, USER_KEY])?;
        debug!("session cleared");
        Ok(())
    }

    fn read_entry(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(Some(value)) => Some(value),
            Ok(None) => {
                debug!(key, "no stored session entry");
                None
            }
            Err(err) => {
                warn!(key, error = %err, "failed to read stored session entry");
                None
            }
        }
    }
}
