use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use parley_types::{Binding, Message};

use crate::Store;
use crate::error::StoreError;
use crate::models::{ConversationRow, NewUser, UserRow};
use crate::password;

impl Store {
    // -- Users --

    /// Insert a new account and return its storage-assigned id. The
    /// cleartext `pass` is hashed before it touches the row. A duplicate
    /// username or email comes back as [`StoreError::Constraint`].
    pub fn add_user(&self, user: &NewUser) -> Result<i64, StoreError> {
        let pass_hash = password::hash(&user.pass)?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO Users (username, bio, email, pass, hashkey)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    user.username,
                    // Legacy rows use "-" for an absent bio; keep writing it.
                    user.bio.as_deref().unwrap_or("-"),
                    user.email,
                    pass_hash,
                    user.hashkey
                ],
            )?;
            let id = conn.last_insert_rowid();
            debug!(username = %user.username, id, "user added");
            Ok(id)
        })
    }

    /// Exact-match lookup. `None` means no such user, never an empty row.
    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>, StoreError> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    /// Check a login attempt against the stored argon2id hash. `None`
    /// when the user does not exist.
    pub fn verify_password(
        &self,
        username: &str,
        candidate: &str,
    ) -> Result<Option<bool>, StoreError> {
        match self.get_user_by_username(username)? {
            Some(user) => Ok(Some(password::verify(candidate, &user.pass)?)),
            None => Ok(None),
        }
    }

    /// Remove a user; bindings and messages referencing them go with the
    /// row via cascade. Returns whether a row existed.
    pub fn delete_user(&self, id: i64) -> Result<bool, StoreError> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM Users WHERE id = ?1", [id])?;
            debug!(id, deleted, "user delete");
            Ok(deleted > 0)
        })
    }

    // -- Bindings --

    /// Record a mutual link. The pair is normalized (smaller id first)
    /// before insert, so (a, b) and (b, a) land on the same row and a
    /// reversed re-insert collides on the primary key.
    pub fn add_binding(&self, binding: &Binding) -> Result<(), StoreError> {
        let (ida, idb) = if binding.ida <= binding.idb {
            (binding.ida, binding.idb)
        } else {
            (binding.idb, binding.ida)
        };
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO Bindings (ida, idb) VALUES (?1, ?2)",
                params![ida, idb],
            )?;
            debug!(ida, idb, "binding added");
            Ok(())
        })
    }

    /// Usernames bound to `username`, regardless of which side of the
    /// stored pair they sit on. Deduplicated by the UNION.
    pub fn get_user_bindings(&self, username: &str) -> Result<Vec<String>, StoreError> {
        self.with_conn(|conn| query_user_bindings(conn, username))
    }

    // -- Messages --

    /// Insert one message. Two messages for the same pair in the same
    /// second collide on the primary key and the second is rejected.
    pub fn add_message(&self, message: &Message) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO Messages (ida, idb, text, v_from, v_when)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    message.ida,
                    message.idb,
                    message.text,
                    message.sender,
                    message.sent_at
                ],
            )?;
            debug!(ida = message.ida, idb = message.idb, "message added");
            Ok(())
        })
    }

    /// The conversation between two users, joined with each sender's
    /// username, ascending by timestamp. Rendering is the caller's move,
    /// via [`ConversationRow::display_line`].
    pub fn get_messages_between(
        &self,
        usr0: &str,
        usr1: &str,
    ) -> Result<Vec<ConversationRow>, StoreError> {
        self.with_conn(|conn| query_messages_between(conn, usr0, usr1))
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, username, bio, email, pass, hashkey FROM Users WHERE username = ?1",
    )?;

    let row = stmt
        .query_row([username], |row| {
            let bio: Option<String> = row.get(2)?;
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                bio: bio.filter(|b| b != "-"),
                email: row.get(3)?,
                pass: row.get(4)?,
                hashkey: row.get(5)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_user_bindings(conn: &Connection, username: &str) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT username FROM Users
         WHERE id IN (SELECT ida FROM Bindings INNER JOIN Users
                          ON Bindings.idb = Users.id
                      WHERE username = ?1)
         UNION
         SELECT username FROM Users
         WHERE id IN (SELECT idb FROM Bindings INNER JOIN Users
                          ON Bindings.ida = Users.id
                      WHERE username = ?1)",
    )?;

    let rows = stmt
        .query_map([username], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;

    Ok(rows)
}

fn query_messages_between(
    conn: &Connection,
    usr0: &str,
    usr1: &str,
) -> Result<Vec<ConversationRow>, StoreError> {
    // Both endpoints must resolve into the {usr0, usr1} pair; a message to
    // anyone else fails one of the IN filters.
    let mut stmt = conn.prepare(
        "SELECT username, v_when, text
         FROM Messages INNER JOIN Users ON Messages.v_from = Users.id
         WHERE ida IN (SELECT id FROM Users WHERE username = ?1 OR username = ?2)
           AND idb IN (SELECT id FROM Users WHERE username = ?1 OR username = ?2)
         ORDER BY v_when",
    )?;

    let rows = stmt
        .query_map(params![usr0, usr1], |row| {
            Ok(ConversationRow {
                sender_username: row.get(0)?,
                sent_at: row.get(1)?,
                text: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}
