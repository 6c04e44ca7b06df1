//! # User Repository
//!
//! Read-mostly directory of guests. Accounts live in the identity provider;
//! this table only carries what reservations need: a name and a phone number
//! to join into views and hand to notifiers.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::DbResult;
use mesa_core::User;

/// Repository for the guest directory.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a guest into the directory.
    pub async fn insert(&self, full_name: &str, phone: &str) -> DbResult<User> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO users (full_name, phone, created_at) VALUES (?1, ?2, ?3)",
        )
        .bind(full_name)
        .bind(phone)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(User {
            id: result.last_insert_rowid(),
            full_name: full_name.to_string(),
            phone: phone.to_string(),
            created_at: now,
        })
    }

    /// Gets a guest by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, full_name, phone, created_at FROM users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Checks whether a guest id exists.
    pub async fn exists(&self, id: i64) -> DbResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Counts all guests in the directory.
    pub async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
