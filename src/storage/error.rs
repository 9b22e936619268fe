use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Another process holds the preference database.
    #[error("Another instance of econ-atlas appears to be running. Please close it and try again.")]
    InstanceLocked,

    #[error("Database migration failed: {0}")]
    Migration(String),

    #[error("Database error: {0}")]
    Other(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Classify a sqlx error, mapping SQLite lock failures to `InstanceLocked`.
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        if is_lock_message(&err.to_string()) {
            DatabaseError::InstanceLocked
        } else {
            DatabaseError::Other(err)
        }
    }
}

/// SQLITE_BUSY, SQLITE_LOCKED and SQLITE_CANTOPEN all surface as one of these.
pub(crate) fn is_lock_message(message: &str) -> bool {
    let message = message.to_lowercase();
    [
        "database is locked",
        "database table is locked",
        "sqlite_busy",
        "sqlite_locked",
        "unable to open database file",
    ]
    .iter()
    .any(|needle| message.contains(needle))
}
