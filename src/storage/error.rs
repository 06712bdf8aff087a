use thiserror::Error;

/// Failures surfaced by the feedback store.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to prepare database location: {0}")]
    Io(#[from] std::io::Error),

    #[error("database connection lock poisoned")]
    Poisoned,

    #[error("storage task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
