use thiserror::Error;

/// Store failures, split so callers can tell a rejected write from a
/// broken connection.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Duplicate key or missing foreign key. Carries the engine's detail
    /// string (e.g. which UNIQUE column collided).
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// Any other engine failure, including failure to open the database.
    #[error(transparent)]
    Sqlite(rusqlite::Error),

    /// Credential hashing or verification could not run.
    #[error("credential hashing failed: {0}")]
    Credential(String),

    /// A previous caller panicked while holding the connection.
    #[error("connection lock poisoned")]
    LockPoisoned,
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, msg)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Self::Constraint(msg.clone().unwrap_or_else(|| e.to_string()))
            }
            _ => Self::Sqlite(err),
        }
    }
}

impl From<argon2::password_hash::Error> for StoreError {
    fn from(err: argon2::password_hash::Error) -> Self {
        Self::Credential(err.to_string())
    }
}
