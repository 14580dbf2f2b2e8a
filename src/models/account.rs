use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered user account
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Contact phone number
    pub phone: String,
    /// Email address, unique across accounts
    pub email: String,
    /// Login name, unique when present
    pub username: Option<String>,
    /// Argon2 PHC string, never exposed in JSON
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Signup data before the account exists
///
/// Carries the raw password; the store hashes it before anything is written.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub username: Option<String>,
    pub password: String,
}
