use thiserror::Error;

/// Why the OS keyring refused a session read or write.
#[derive(Debug, Error)]
pub enum KeyringError {
    /// The keychain is locked or the platform service is not running.
    #[error("system keyring unavailable: {0}")]
    Unavailable(#[source] keyring::Error),
    #[error("system keyring rejected the entry: {0}")]
    Rejected(#[source] keyring::Error),
}

impl KeyringError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, KeyringError::Unavailable(_))
    }
}

impl From<keyring::Error> for KeyringError {
    fn from(err: keyring::Error) -> Self {
        if matches!(
            err,
            keyring::Error::PlatformFailure(_) | keyring::Error::NoStorageAccess(_)
        ) {
            KeyringError::Unavailable(err)
        } else {
            KeyringError::Rejected(err)
        }
    }
}
