/// Store row types — these map directly to SQLite rows. Kept separate from
/// the parley-types wire models so the store layer stands on its own.
use chrono::DateTime;

/// Input for [`Store::add_user`](crate::Store::add_user). `pass` is the
/// cleartext credential; the store hashes it before the row is written.
pub struct NewUser {
    pub username: String,
    pub bio: Option<String>,
    pub email: String,
    pub pass: String,
    pub hashkey: String,
}

/// A Users row. `pass` is the argon2id hash, never the cleartext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub bio: Option<String>,
    pub email: String,
    pub pass: String,
    pub hashkey: String,
}

/// One fetched conversation entry: the Messages row joined with the
/// sender's username, already in timestamp order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationRow {
    pub sender_username: String,
    pub sent_at: i64,
    pub text: String,
}

impl ConversationRow {
    /// Render the legacy transcript line: sender, bracketed human-readable
    /// timestamp, then the body on its own line. Presentation only; fetch
    /// and render stay layered apart.
    pub fn display_line(&self) -> String {
        let when = DateTime::from_timestamp(self.sent_at, 0)
            .map(|dt| dt.format("%a %b %-d %H:%M:%S %Y").to_string())
            .unwrap_or_else(|| format!("@{}", self.sent_at));
        format!("{} [{}]\n{}", self.sender_username, when, self.text)
    }
}
