use rusqlite::Connection;
use tracing::info;

use crate::error::StoreError;

/// Schema bootstrap. Table and column names are a compatibility surface
/// shared with existing database files, so they stay exactly as-is
/// (`v_from`/`v_when` included).
pub fn run(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS Users (
            id          INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT UNIQUE,
            username    TEXT NOT NULL UNIQUE,
            bio         TEXT,
            email       TEXT NOT NULL UNIQUE,
            pass        TEXT NOT NULL,
            hashkey     TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS Bindings (
            ida         INTEGER NOT NULL,
            idb         INTEGER NOT NULL,
            PRIMARY KEY (ida, idb),
            FOREIGN KEY (ida) REFERENCES Users(id) ON DELETE CASCADE,
            FOREIGN KEY (idb) REFERENCES Users(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS Messages (
            ida         INTEGER NOT NULL,
            idb         INTEGER NOT NULL,
            text        TEXT NOT NULL,
            v_from      INTEGER NOT NULL,
            v_when      INTEGER NOT NULL,
            PRIMARY KEY (ida, idb, v_when),
            FOREIGN KEY (ida) REFERENCES Users(id) ON DELETE CASCADE,
            FOREIGN KEY (idb) REFERENCES Users(id) ON DELETE CASCADE
        );
        ",
    )?;

    info!("schema bootstrap complete");
    Ok(())
}
