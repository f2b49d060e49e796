use thiserror::Error;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Storage-level failure. Domain failures are reported as `DomainError` instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Another thread panicked while holding the store lock.
    #[error("store lock poisoned: {0}")]
    LockPoisoned(&'static str),

    /// Backend-specific failure (connection, constraint, ...).
    #[error("storage backend failure: {0}")]
    Backend(String),
}
