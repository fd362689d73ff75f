//! User repository: local identity rows keyed by OIDC subject.

use sqlx::PgPool;

use merch_core::{Email, UserId};

use super::RepositoryError;

/// Repository for user identity resolution.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Resolve the local surrogate id for an external identity assertion,
    /// creating the user row on first contact.
    ///
    /// Idempotent: the insert is a no-op when a row for `subject` already
    /// exists (unique constraint, `ON CONFLICT DO NOTHING`), and the
    /// follow-up lookup always returns the same id for the same subject.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either statement fails.
    /// Returns `RepositoryError::Inconsistent` if the lookup after insert
    /// finds no row; that should be impossible and indicates storage-level
    /// inconsistency.
    pub async fn ensure(&self, subject: &str, email: &Email) -> Result<UserId, RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO users (subject, email)
            VALUES ($1, $2)
            ON CONFLICT (subject) DO NOTHING
            ",
        )
        .bind(subject)
        .bind(email.as_str())
        .execute(self.pool)
        .await?;

        let id: Option<i32> = sqlx::query_scalar(
            r"
            SELECT id FROM users WHERE subject = $1
            ",
        )
        .bind(subject)
        .fetch_optional(self.pool)
        .await?;

        id.map(UserId::new).ok_or_else(|| {
            RepositoryError::Inconsistent(format!("user row missing after insert: {subject}"))
        })
    }
}
