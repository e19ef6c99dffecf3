use thiserror::Error;

/// Result type for link store operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors raised by a link store backend.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("short code already exists: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage is misconfigured: {0}")]
    Config(String),
}

/// Errors surfaced by the link registry to its callers.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid short code: {0}")]
    InvalidCodeFormat(String),
    #[error("short code already taken: {0}")]
    CodeTaken(String),
    #[error("could not generate a free short code after {attempts} attempts")]
    GenerationExhausted { attempts: usize },
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(
        #[from]
        #[source]
        StorageError,
    ),
}

impl RegistryError {
    /// Whether the caller can fix the request and try again.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            RegistryError::InvalidUrl(_)
                | RegistryError::InvalidCodeFormat(_)
                | RegistryError::CodeTaken(_)
                | RegistryError::NotFound(_)
        )
    }

    /// Whether repeating the same request later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            RegistryError::GenerationExhausted { .. } => true,
            RegistryError::Storage(StorageError::Unavailable(_) | StorageError::Timeout(_)) => {
                true
            }
            _ => false,
        }
    }
}
