use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, SaltString},
    Argon2, PasswordHasher, PasswordVerifier,
};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Account, NewAccount},
};

/// Persistent account storage capability
///
/// Injected into handlers as a trait object so the web layer is testable
/// without a live database.
#[async_trait::async_trait]
pub trait AccountStore: Send + Sync {
    /// Creates an account, hashing the password before anything is written
    ///
    /// Fails with `DuplicateAccount` when the username or email is already
    /// taken; a failed creation leaves no partial record.
    async fn create(&self, new: NewAccount) -> AppResult<Account>;

    /// Looks up an account by credentials
    ///
    /// Any mismatch, unknown username or wrong password alike, fails with
    /// the same `InvalidCredentials` error.
    async fn authenticate(&self, username: &str, password: &str) -> AppResult<Account>;

    /// Fetches an account by id
    async fn find(&self, id: Uuid) -> AppResult<Option<Account>>;
}

/// Hashes a password into an Argon2id PHC string with a random salt
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;
    Ok(hash.to_string())
}

/// Verifies a password against a stored PHC string in constant time
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// PostgreSQL-backed account store
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl AccountStore for PgAccountStore {
    async fn create(&self, new: NewAccount) -> AppResult<Account> {
        let password_hash = hash_password(&new.password)?;

        let mut tx = self.pool.begin().await?;

        let taken: Option<i32> = sqlx::query_scalar(
            "SELECT 1 FROM accounts WHERE email = $1 OR (username IS NOT NULL AND username = $2)",
        )
        .bind(&new.email)
        .bind(&new.username)
        .fetch_optional(&mut *tx)
        .await?;

        if taken.is_some() {
            return Err(AppError::DuplicateAccount);
        }

        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (id, name, phone, email, username, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, phone, email, username, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.phone)
        .bind(&new.email)
        .bind(&new.username)
        .bind(&password_hash)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            // Concurrent signups can slip past the pre-check; the unique
            // constraints are the source of truth.
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::DuplicateAccount,
            _ => AppError::Database(e),
        })?;

        tx.commit().await?;

        tracing::info!(account_id = %account.id, "Account created");
        Ok(account)
    }

    async fn authenticate(&self, username: &str, password: &str) -> AppResult<Account> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, name, phone, email, username, password_hash, created_at \
             FROM accounts WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        match account {
            Some(account) if verify_password(password, &account.password_hash) => Ok(account),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, name, phone, email, username, password_hash, created_at \
             FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }
}
