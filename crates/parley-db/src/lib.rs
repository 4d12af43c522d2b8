pub mod error;
pub mod migrations;
pub mod models;
pub mod password;
pub mod queries;

pub use error::StoreError;
pub use models::{ConversationRow, NewUser, UserRow};

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use tracing::info;

/// Sole owner of the SQLite connection. All access goes through the
/// internal mutex, so concurrent callers are serialized per operation.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (or create) the database at `path` and apply the schema.
    /// Bootstrap is idempotent; opening an existing file changes nothing.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let fresh = !path.exists();
        let conn = Connection::open(path)?;
        let store = Self::init(conn)?;
        if fresh {
            info!("created database at {}", path.display());
        } else {
            info!("opened database at {}", path.display());
        }
        Ok(store)
    }

    /// In-memory store, used by tests and throwaway sessions.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        // Cascade deletes depend on this pragma; SQLite defaults it off.
        conn.pragma_update(None, "foreign_keys", "ON")?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` against the connection while holding the lock. Escape hatch
    /// for callers that need SQL the typed operations do not cover.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError>,
    {
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        f(&conn)
    }
}
