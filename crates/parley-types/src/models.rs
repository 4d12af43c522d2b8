use serde::{Deserialize, Serialize};

/// A registered account. `pass` holds the argon2id hash once the user has
/// been persisted; the store never hands back a cleartext credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub bio: Option<String>,
    pub email: String,
    pub pass: String,
    pub hashkey: String,
}

/// A mutual friend link between two users. Stored as one ordered pair,
/// queried in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub ida: i64,
    pub idb: i64,
}

/// One message in the conversation between the pair (ida, idb).
/// `sender` is one of the two ids; `sent_at` is unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub ida: i64,
    pub idb: i64,
    pub text: String,
    pub sender: i64,
    pub sent_at: i64,
}
