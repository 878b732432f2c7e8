//! Domain model for an administrator account.
use chrono::{DateTime, Utc};

/// Administrator account used by the login path. The password is only ever
/// stored as an argon2id hash.
#[derive(Debug, Clone, PartialEq)]
pub struct Admin {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
