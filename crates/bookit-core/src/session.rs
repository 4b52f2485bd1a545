// ── Session token persistence ──
//
// The auth token is the only client state that outlives the process.
// Embedders choose where it lives; the CLI backs this with the OS keyring.

use std::sync::{PoisonError, RwLock};

use secrecy::SecretString;

use crate::error::CoreError;

/// Where the bearer token is persisted between runs.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<SecretString>, CoreError>;
    fn save(&self, token: &SecretString) -> Result<(), CoreError>;
    /// Removing an absent token is not an error.
    fn clear(&self) -> Result<(), CoreError>;
}

/// Process-local token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<SecretString>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: SecretString) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<SecretString>, CoreError> {
        Ok(self.token.read().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, token: &SecretString) -> Result<(), CoreError> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
